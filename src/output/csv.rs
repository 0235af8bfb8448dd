use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::compare::{format_delta, format_value, ChangeRecord, PatchSummary};

pub const COMPARISON_HEADER: [&str; 6] = ["Weapon", "Metric", "Old", "New", "Δ", "Status"];

pub fn comparison_to_csv(records: &[ChangeRecord]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(COMPARISON_HEADER)?;
    for r in records {
        writer.write_record([
            r.weapon.clone(),
            r.metric.clone(),
            format_value(r.old),
            format_value(r.new),
            format_delta(r.delta),
            r.change_label(),
        ])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn totals_to_csv(summary: &PatchSummary) -> Result<String> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.write_record(["metric", "net_delta"])?;
    for total in &summary.totals {
        writer.write_record([total.metric.clone(), format!("{:+.2}", total.net_delta)])?;
    }
    let data = writer.into_inner()?;
    Ok(String::from_utf8_lossy(&data).to_string())
}

pub fn export_csv(records: &[ChangeRecord], path: &Path) -> Result<()> {
    let data = comparison_to_csv(records)?;
    fs::write(path, data).with_context(|| format!("failed writing CSV: {}", path.display()))?;
    info!(path = %path.display(), rows = records.len(), "CSV exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{comparison_to_csv, totals_to_csv};
    use crate::compare::{compare, summarize};
    use crate::metrics::{MetricCatalog, MetricDef, Polarity};
    use crate::snapshot::{Snapshot, WeaponRecord};

    fn catalog() -> MetricCatalog {
        MetricCatalog::new(
            vec![
                MetricDef::new("bodyDamage", Polarity::HigherIsBetter),
                MetricDef::new("magSize", Polarity::HigherIsBetter),
            ],
            MetricCatalog::default().thresholds,
        )
    }

    #[test]
    fn writes_header_and_rows_in_comparator_order() {
        let old = Snapshot::from_records([WeaponRecord::new("Ferro, Mk II")
            .with_stat("bodyDamage", 40.0)
            .with_stat("magSize", 6.0)]);
        let new = Snapshot::from_records([WeaponRecord::new("Ferro, Mk II").with_stat("bodyDamage", 38.5)]);
        let records = compare(&old, &new, &catalog());

        let csv = comparison_to_csv(&records).expect("csv");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Weapon,Metric,Old,New,Δ,Status");
        assert_eq!(lines[1], "\"Ferro, Mk II\",bodyDamage,40,38.5,-1.50,Nerf •");
        assert_eq!(lines[2], "\"Ferro, Mk II\",magSize,6,,–,Missing");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn totals_csv_has_signed_values() {
        let old = Snapshot::from_records([WeaponRecord::new("Anvil").with_stat("magSize", 6.0)]);
        let new = Snapshot::from_records([WeaponRecord::new("Anvil").with_stat("magSize", 8.0)]);
        let summary = summarize(&compare(&old, &new, &catalog()));
        let csv = totals_to_csv(&summary).expect("csv");
        assert!(csv.contains("magSize,+2.00"));
    }
}
