use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::compare::{ChangeKind, ChangeRecord};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricTotal {
    pub metric: String,
    pub net_delta: f64,
}

/// Aggregate counts over a full comparison.
///
/// `missing` is tracked on its own and never folded into the other three
/// buckets. `mixed` counts weapons with at least one buff and one nerf.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatchSummary {
    pub buffs: usize,
    pub nerfs: usize,
    pub no_change: usize,
    pub missing: usize,
    pub mixed: usize,
    pub mixed_weapons: Vec<String>,
    pub totals: Vec<MetricTotal>,
}

impl PatchSummary {
    pub fn net_delta(&self, metric: &str) -> Option<f64> {
        self.totals
            .iter()
            .find(|t| t.metric == metric)
            .map(|t| t.net_delta)
    }

    pub fn changed(&self) -> usize {
        self.buffs + self.nerfs
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct WeaponState {
    buff: bool,
    nerf: bool,
}

impl WeaponState {
    fn is_mixed(self) -> bool {
        self.buff && self.nerf
    }
}

/// Single pass over the records. Totals keep first-appearance metric order.
pub fn summarize(records: &[ChangeRecord]) -> PatchSummary {
    let mut summary = PatchSummary::default();
    let mut states: BTreeMap<&str, WeaponState> = BTreeMap::new();
    let mut total_index: BTreeMap<&str, usize> = BTreeMap::new();

    for record in records {
        match record.kind {
            ChangeKind::Buff => {
                summary.buffs += 1;
                states.entry(record.weapon.as_str()).or_default().buff = true;
            }
            ChangeKind::Nerf => {
                summary.nerfs += 1;
                states.entry(record.weapon.as_str()).or_default().nerf = true;
            }
            ChangeKind::NoChange => summary.no_change += 1,
            ChangeKind::Missing => summary.missing += 1,
        }

        let Some(delta) = record.delta else {
            continue;
        };
        match total_index.get(record.metric.as_str()) {
            Some(&idx) => summary.totals[idx].net_delta += delta,
            None => {
                total_index.insert(record.metric.as_str(), summary.totals.len());
                summary.totals.push(MetricTotal {
                    metric: record.metric.clone(),
                    net_delta: delta,
                });
            }
        }
    }

    summary.mixed_weapons = states
        .into_iter()
        .filter(|(_, state)| state.is_mixed())
        .map(|(name, _)| name.to_string())
        .collect();
    summary.mixed = summary.mixed_weapons.len();
    summary
}

/// Names of weapons that were both buffed and nerfed, sorted.
pub fn mixed_weapons(records: &[ChangeRecord]) -> BTreeSet<String> {
    let mut states: BTreeMap<&str, WeaponState> = BTreeMap::new();
    for record in records {
        match record.kind {
            ChangeKind::Buff => states.entry(record.weapon.as_str()).or_default().buff = true,
            ChangeKind::Nerf => states.entry(record.weapon.as_str()).or_default().nerf = true,
            ChangeKind::NoChange | ChangeKind::Missing => {}
        }
    }
    states
        .into_iter()
        .filter(|(_, state)| state.is_mixed())
        .map(|(name, _)| name.to_string())
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TopChanges {
    pub buffs: Vec<ChangeRecord>,
    pub nerfs: Vec<ChangeRecord>,
}

/// Largest buffs and nerfs by absolute delta, ties kept in comparator order.
pub fn top_changes(records: &[ChangeRecord], limit: usize) -> TopChanges {
    TopChanges {
        buffs: largest_of_kind(records, ChangeKind::Buff, limit),
        nerfs: largest_of_kind(records, ChangeKind::Nerf, limit),
    }
}

fn largest_of_kind(records: &[ChangeRecord], kind: ChangeKind, limit: usize) -> Vec<ChangeRecord> {
    let mut picked: Vec<&ChangeRecord> = records.iter().filter(|r| r.kind == kind).collect();
    picked.sort_by(|a, b| {
        let a = a.abs_delta().unwrap_or(0.0);
        let b = b.abs_delta().unwrap_or(0.0);
        b.total_cmp(&a)
    });
    picked.into_iter().take(limit).cloned().collect()
}
