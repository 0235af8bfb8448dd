use std::collections::BTreeSet;

use tracing::debug;

use crate::compare::{severity, ChangeKind, ChangeRecord, Severity};
use crate::metrics::{MetricCatalog, MetricDef};
use crate::snapshot::Snapshot;

/// Compares two snapshots metric by metric.
///
/// Weapons come out sorted by name (byte order, so `"Beta"` precedes
/// `"alpha"`); within a weapon, metrics follow the catalog order. A weapon or
/// stat present on only one side produces [`ChangeKind::Missing`] rows rather
/// than an error.
pub fn compare(old: &Snapshot, new: &Snapshot, catalog: &MetricCatalog) -> Vec<ChangeRecord> {
    let mut names = BTreeSet::new();
    names.extend(old.names());
    names.extend(new.names());

    let mut records = Vec::with_capacity(names.len() * catalog.metrics.len());
    for name in names {
        for def in &catalog.metrics {
            let old_value = old.stat(name, &def.name);
            let new_value = new.stat(name, &def.name);
            records.push(classify(name, def, old_value, new_value, catalog));
        }
    }
    debug!(rows = records.len(), "comparison complete");
    records
}

pub fn classify(
    weapon: &str,
    def: &MetricDef,
    old: Option<f64>,
    new: Option<f64>,
    catalog: &MetricCatalog,
) -> ChangeRecord {
    let (delta, kind, marker) = match (old, new) {
        (Some(o), Some(n)) => {
            let delta = n - o;
            if delta == 0.0 {
                (Some(delta), ChangeKind::NoChange, Severity::None)
            } else {
                let kind = if def.polarity.is_favorable(delta) {
                    ChangeKind::Buff
                } else {
                    ChangeKind::Nerf
                };
                (Some(delta), kind, severity(delta.abs(), &def.name, catalog))
            }
        }
        _ => (None, ChangeKind::Missing, Severity::None),
    };

    ChangeRecord {
        weapon: weapon.to_string(),
        metric: def.name.clone(),
        old,
        new,
        delta,
        kind,
        severity: marker,
    }
}
