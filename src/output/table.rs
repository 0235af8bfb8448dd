use std::collections::BTreeSet;

use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

use crate::compare::{
    format_delta, format_value, ChangeRecord, PatchSummary, StatusTone, TopChanges,
};

pub const OVERALL_METRIC: &str = "— overall —";

#[derive(Debug, Clone, Copy, Default)]
pub struct TableOptions {
    /// Only the first `limit` comparison rows are drawn.
    pub limit: Option<usize>,
    /// Append a "Mixed" row after each weapon that was both buffed and nerfed.
    pub show_mixed: bool,
}

fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Success => Color::Green,
        StatusTone::Danger => Color::Red,
        StatusTone::Warning => Color::Yellow,
        StatusTone::Secondary => Color::Grey,
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}

pub fn render_comparison_table(
    records: &[ChangeRecord],
    mixed: &BTreeSet<String>,
    options: TableOptions,
) -> String {
    let mut table = new_table(vec!["Weapon", "Metric", "Old", "New", "Δ", "Status"]);
    let shown = options.limit.unwrap_or(records.len()).min(records.len());

    for (idx, r) in records[..shown].iter().enumerate() {
        let color = tone_color(r.status());
        table.add_row(Row::from(vec![
            Cell::new(&r.weapon),
            Cell::new(&r.metric),
            Cell::new(format_value(r.old)),
            Cell::new(format_value(r.new)),
            Cell::new(format_delta(r.delta)).fg(color),
            Cell::new(r.change_label()).fg(color),
        ]));

        let last_of_weapon = records
            .get(idx + 1)
            .map(|next| next.weapon != r.weapon)
            .unwrap_or(true);
        if options.show_mixed && last_of_weapon && mixed.contains(&r.weapon) {
            let warn = tone_color(StatusTone::Warning);
            table.add_row(Row::from(vec![
                Cell::new(&r.weapon),
                Cell::new(OVERALL_METRIC),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new("Mixed").fg(warn),
            ]));
        }
    }

    let mut out = table.to_string();
    if shown < records.len() {
        out.push_str(&format!("\n... ({} total rows)", records.len()));
    }
    out
}

pub fn render_summary_table(summary: &PatchSummary) -> String {
    let mut table = new_table(vec!["Buffs", "Nerfs", "No Change", "Missing", "Mixed"]);
    table.add_row(Row::from(vec![
        Cell::new(summary.buffs).fg(Color::Green),
        Cell::new(summary.nerfs).fg(Color::Red),
        Cell::new(summary.no_change),
        Cell::new(summary.missing).fg(Color::Grey),
        Cell::new(summary.mixed).fg(Color::Yellow),
    ]));
    table.to_string()
}

pub fn render_totals_table(summary: &PatchSummary) -> String {
    let mut table = new_table(vec!["Metric", "Net Δ"]);
    for total in &summary.totals {
        let cell = Cell::new(format!("{:+.2}", total.net_delta));
        let cell = if total.net_delta > 0.0 {
            cell.fg(Color::Green)
        } else if total.net_delta < 0.0 {
            cell.fg(Color::Red)
        } else {
            cell
        };
        table.add_row(Row::from(vec![Cell::new(&total.metric), cell]));
    }
    table.to_string()
}

pub fn render_top_changes_table(top: &TopChanges) -> String {
    let mut table = new_table(vec!["Kind", "Rank", "Weapon", "Metric", "Δ", "Severity"]);
    for (label, rows, color) in [
        ("Buff", &top.buffs, Color::Green),
        ("Nerf", &top.nerfs, Color::Red),
    ] {
        for (idx, r) in rows.iter().enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(label).fg(color),
                Cell::new(idx + 1),
                Cell::new(&r.weapon),
                Cell::new(&r.metric),
                Cell::new(format_delta(r.delta)),
                Cell::new(r.severity.label()),
            ]));
        }
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{render_comparison_table, render_summary_table, TableOptions, OVERALL_METRIC};
    use crate::compare::{compare, mixed_weapons, summarize};
    use crate::metrics::MetricCatalog;
    use crate::snapshot::{Snapshot, WeaponRecord};

    fn fixture() -> (Snapshot, Snapshot) {
        let old = Snapshot::from_records([
            WeaponRecord::new("Anvil")
                .with_stat("bodyDamage", 30.0)
                .with_stat("timeToKill", 0.5),
            WeaponRecord::new("Ferro").with_stat("bodyDamage", 40.0),
        ]);
        let new = Snapshot::from_records([
            WeaponRecord::new("Anvil")
                .with_stat("bodyDamage", 35.0)
                .with_stat("timeToKill", 0.6),
            WeaponRecord::new("Ferro").with_stat("bodyDamage", 40.0),
        ]);
        (old, new)
    }

    #[test]
    fn truncates_with_total_note() {
        let (old, new) = fixture();
        let records = compare(&old, &new, &MetricCatalog::default());
        let out = render_comparison_table(
            &records,
            &BTreeSet::new(),
            TableOptions {
                limit: Some(3),
                show_mixed: false,
            },
        );
        assert!(out.contains(&format!("... ({} total rows)", records.len())));
        assert!(!out.contains("Ferro"));
    }

    #[test]
    fn marks_mixed_weapons_when_asked() {
        let (old, new) = fixture();
        let records = compare(&old, &new, &MetricCatalog::default());
        let mixed = mixed_weapons(&records);
        let out = render_comparison_table(
            &records,
            &mixed,
            TableOptions {
                limit: None,
                show_mixed: true,
            },
        );
        assert!(out.contains(OVERALL_METRIC));
        assert!(out.contains("Mixed"));
        assert!(!out.contains("total rows"));
    }

    #[test]
    fn summary_table_lists_counts() {
        let (old, new) = fixture();
        let summary = summarize(&compare(&old, &new, &MetricCatalog::default()));
        let out = render_summary_table(&summary);
        assert!(out.contains("Buffs"));
        assert!(out.contains("Mixed"));
    }
}
