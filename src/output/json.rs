use anyhow::Result;
use serde::Serialize;

use crate::compare::{ChangeRecord, PatchSummary, TopChanges};

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Debug, Serialize)]
pub struct ComparisonReport<'a> {
    pub summary: &'a PatchSummary,
    pub changes: &'a [ChangeRecord],
}

pub fn render_report_json(records: &[ChangeRecord], summary: &PatchSummary) -> Result<String> {
    render_json(&ComparisonReport {
        summary,
        changes: records,
    })
}

#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub summary: &'a PatchSummary,
    pub top: &'a TopChanges,
}

pub fn render_summary_json(summary: &PatchSummary, top: &TopChanges) -> Result<String> {
    render_json(&SummaryReport { summary, top })
}

#[cfg(test)]
mod tests {
    use super::render_report_json;
    use crate::compare::{compare, summarize};
    use crate::metrics::MetricCatalog;
    use crate::snapshot::{Snapshot, WeaponRecord};

    #[test]
    fn report_contains_summary_and_rows() {
        let old = Snapshot::from_records([WeaponRecord::new("Ferro").with_stat("bodyDamage", 40.0)]);
        let new = Snapshot::from_records([WeaponRecord::new("Ferro").with_stat("bodyDamage", 42.0)]);
        let records = compare(&old, &new, &MetricCatalog::default());
        let summary = summarize(&records);

        let json = render_report_json(&records, &summary).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["summary"]["buffs"], 1);
        assert_eq!(value["changes"][0]["kind"], "buff");
        assert_eq!(value["changes"][0]["severity"], "moderate");
        assert_eq!(value["summary"]["missing"], 6);
    }
}
