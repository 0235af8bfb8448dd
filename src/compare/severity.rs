use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::metrics::MetricCatalog;

/// Qualitative magnitude of a buff or nerf.
///
/// Renderers pick their own presentation through [`Severity::glyph`] or
/// [`Severity::label`]; the thresholds themselves only live in [`severity`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    None,
    Small,
    Moderate,
    Large,
}

impl Severity {
    pub fn glyph(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Small => "·",
            Self::Moderate => "•",
            Self::Large => "●",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Small => "small",
            Self::Moderate => "moderate",
            Self::Large => "large",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

pub fn severity(abs_delta: f64, metric: &str, catalog: &MetricCatalog) -> Severity {
    let bounds = catalog.thresholds_for(metric);
    if abs_delta >= bounds.large {
        Severity::Large
    } else if abs_delta >= bounds.small {
        Severity::Moderate
    } else if abs_delta > 0.0 {
        Severity::Small
    } else {
        Severity::None
    }
}
