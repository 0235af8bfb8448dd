use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use html_escape::encode_text;
use tracing::info;

use crate::compare::{format_delta, format_value, ChangeRecord, PatchSummary};

const STYLE: &str = "body { background-color:#0f1115; color:white; font-family:Segoe UI, sans-serif; }
table { width:100%; border-collapse:collapse; }
td,th { border:1px solid #333; padding:6px; }
tr:nth-child(even) { background:#151a22; }
.meta { color:#999; }";

pub fn render_html_report(
    records: &[ChangeRecord],
    summary: &PatchSummary,
    generated_at: DateTime<Utc>,
) -> String {
    let mut rows = String::new();
    for r in records {
        let _ = writeln!(
            rows,
            "<tr style='color:{}'><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            r.status().html_color(),
            encode_text(&r.weapon),
            encode_text(&r.metric),
            format_value(r.old),
            format_value(r.new),
            format_delta(r.delta),
            encode_text(&r.change_label()),
        );
    }

    format!(
        "<html><head><meta charset='utf-8'><title>PatchForge Report</title><style>
{STYLE}
</style></head>
<body><h2>PatchForge Report</h2>
<p class='meta'>Generated {generated}</p>
<p>Buffs: {buffs} &middot; Nerfs: {nerfs} &middot; No Change: {no_change} &middot; Missing: {missing} &middot; Mixed weapons: {mixed}</p>
<table>
<tr><th>Weapon</th><th>Metric</th><th>Old</th><th>New</th><th>Δ</th><th>Status</th></tr>
{rows}</table></body></html>
",
        generated = generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
        buffs = summary.buffs,
        nerfs = summary.nerfs,
        no_change = summary.no_change,
        missing = summary.missing,
        mixed = summary.mixed,
    )
}

pub fn export_html(records: &[ChangeRecord], summary: &PatchSummary, path: &Path) -> Result<()> {
    let html = render_html_report(records, summary, Utc::now());
    fs::write(path, html).with_context(|| format!("failed writing HTML: {}", path.display()))?;
    info!(path = %path.display(), rows = records.len(), "HTML exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::render_html_report;
    use crate::compare::{compare, summarize};
    use crate::metrics::{MetricCatalog, MetricDef, Polarity};
    use crate::snapshot::{Snapshot, WeaponRecord};

    #[test]
    fn rows_are_colored_and_escaped() {
        let catalog = MetricCatalog::new(
            vec![MetricDef::new("timeToKill", Polarity::LowerIsBetter)],
            MetricCatalog::default().thresholds,
        );
        let old = Snapshot::from_records([
            WeaponRecord::new("<Rattler>").with_stat("timeToKill", 0.5),
            WeaponRecord::new("Torrente").with_stat("timeToKill", 0.5),
        ]);
        let new = Snapshot::from_records([
            WeaponRecord::new("<Rattler>").with_stat("timeToKill", 0.25),
            WeaponRecord::new("Torrente").with_stat("timeToKill", 0.75),
        ]);
        let records = compare(&old, &new, &catalog);
        let summary = summarize(&records);
        let generated = Utc.with_ymd_and_hms(2025, 11, 4, 12, 0, 0).unwrap();

        let html = render_html_report(&records, &summary, generated);
        assert!(html.contains("&lt;Rattler&gt;"));
        assert!(!html.contains("<Rattler>"));
        assert!(html.contains("<tr style='color:#6fdc8c'><td>&lt;Rattler&gt;</td><td>timeToKill</td><td>0.5</td><td>0.25</td><td>-0.25</td><td>Buff ●</td></tr>"));
        assert!(html.contains("style='color:#f28b82'"));
        assert!(html.contains("Generated 2025-11-04 12:00:00 UTC"));
        assert!(html.contains("<th>Δ</th><th>Status</th>"));
    }
}
