pub mod engine;
pub mod severity;
pub mod summary;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub use engine::compare;
pub use severity::{severity, Severity};
pub use summary::{mixed_weapons, summarize, top_changes, MetricTotal, PatchSummary, TopChanges};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Missing,
    NoChange,
    Buff,
    Nerf,
}

impl ChangeKind {
    pub fn status(self) -> StatusTone {
        match self {
            Self::Buff => StatusTone::Success,
            Self::Nerf => StatusTone::Danger,
            Self::NoChange | Self::Missing => StatusTone::Secondary,
        }
    }
}

impl Display for ChangeKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Missing => "Missing",
            Self::NoChange => "No Change",
            Self::Buff => "Buff",
            Self::Nerf => "Nerf",
        };
        write!(f, "{display}")
    }
}

/// Presentation tone shared by the table, CSV and HTML renderers.
///
/// `Warning` never comes out of the comparator; it marks the synthesized
/// per-weapon "mixed" row some renderers add.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StatusTone {
    Success,
    Danger,
    Warning,
    Secondary,
}

impl StatusTone {
    pub fn html_color(self) -> &'static str {
        match self {
            Self::Success => "#6fdc8c",
            Self::Danger => "#f28b82",
            Self::Warning => "#fdd388",
            Self::Secondary => "#cccccc",
        }
    }
}

/// One (weapon, metric) comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChangeRecord {
    pub weapon: String,
    pub metric: String,
    pub old: Option<f64>,
    pub new: Option<f64>,
    pub delta: Option<f64>,
    pub kind: ChangeKind,
    pub severity: Severity,
}

impl ChangeRecord {
    pub fn status(&self) -> StatusTone {
        self.kind.status()
    }

    /// `Buff •`, `Nerf ●`, `No Change` or `Missing`.
    pub fn change_label(&self) -> String {
        match self.kind {
            ChangeKind::Buff | ChangeKind::Nerf if self.severity != Severity::None => {
                format!("{} {}", self.kind, self.severity.glyph())
            }
            kind => kind.to_string(),
        }
    }

    pub fn abs_delta(&self) -> Option<f64> {
        self.delta.map(f64::abs)
    }
}

/// Signed two-decimal delta, or an en dash when either side is missing.
pub fn format_delta(delta: Option<f64>) -> String {
    delta
        .map(|d| format!("{d:+.2}"))
        .unwrap_or_else(|| "–".to_string())
}

pub fn format_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
