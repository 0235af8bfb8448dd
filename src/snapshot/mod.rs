pub mod loader;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

pub use loader::{load_snapshot, save_snapshot, LoadError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeaponRecord {
    pub name: String,
    #[serde(default)]
    pub stats: BTreeMap<String, f64>,
}

impl WeaponRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stats: BTreeMap::new(),
        }
    }

    pub fn with_stat(mut self, metric: &str, value: f64) -> Self {
        self.stats.insert(metric.to_string(), value);
        self
    }

    pub fn stat(&self, metric: &str) -> Option<f64> {
        self.stats.get(metric).copied()
    }
}

/// One patch's weapons, keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    weapons: BTreeMap<String, WeaponRecord>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later records replace earlier ones with the same name.
    pub fn from_records(records: impl IntoIterator<Item = WeaponRecord>) -> Self {
        let mut snapshot = Self::new();
        for record in records {
            snapshot.insert(record);
        }
        snapshot
    }

    pub fn insert(&mut self, record: WeaponRecord) -> Option<WeaponRecord> {
        self.weapons.insert(record.name.clone(), record)
    }

    pub fn get(&self, name: &str) -> Option<&WeaponRecord> {
        self.weapons.get(name)
    }

    pub fn stat(&self, weapon: &str, metric: &str) -> Option<f64> {
        self.get(weapon).and_then(|w| w.stat(metric))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.weapons.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = &WeaponRecord> {
        self.weapons.values()
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    /// Builds a snapshot from the `{"weapons": [...]}` document shape.
    ///
    /// A missing `weapons` key yields an empty snapshot. Stat values that are
    /// not numbers are dropped so they surface as missing in a comparison.
    pub fn from_document(document: SnapshotDocument) -> Self {
        let mut snapshot = Self::new();
        for raw in document.weapons {
            let mut record = WeaponRecord::new(raw.name);
            for (metric, value) in raw.stats {
                match value.as_f64() {
                    Some(v) => {
                        record.stats.insert(metric, v);
                    }
                    None => debug!(
                        weapon = %record.name,
                        metric = %metric,
                        "dropping non-numeric stat value"
                    ),
                }
            }
            if let Some(previous) = snapshot.insert(record) {
                warn!(weapon = %previous.name, "duplicate weapon name, keeping the later entry");
            }
        }
        snapshot
    }

    pub fn to_document(&self) -> SnapshotDocument {
        SnapshotDocument {
            weapons: self
                .records()
                .map(|record| RawWeapon {
                    name: record.name.clone(),
                    stats: record
                        .stats
                        .iter()
                        .map(|(k, v)| (k.clone(), Value::from(*v)))
                        .collect(),
                })
                .collect(),
        }
    }
}

/// On-disk shape of a snapshot file. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotDocument {
    #[serde(default)]
    pub weapons: Vec<RawWeapon>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWeapon {
    pub name: String,
    #[serde(default)]
    pub stats: BTreeMap<String, Value>,
}
