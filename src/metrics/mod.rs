use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which direction of change is favorable for a metric.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl Polarity {
    /// A nonzero delta is favorable when it moves in the metric's good direction.
    pub fn is_favorable(self, delta: f64) -> bool {
        match self {
            Self::HigherIsBetter => delta > 0.0,
            Self::LowerIsBetter => delta < 0.0,
        }
    }
}

impl Display for Polarity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::HigherIsBetter => "higher_is_better",
            Self::LowerIsBetter => "lower_is_better",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown polarity: {0}")]
pub struct PolarityParseError(pub String);

impl FromStr for Polarity {
    type Err = PolarityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "higher_is_better" | "higher" | "up" => Ok(Self::HigherIsBetter),
            "lower_is_better" | "lower" | "down" => Ok(Self::LowerIsBetter),
            _ => Err(PolarityParseError(s.to_string())),
        }
    }
}

impl TryFrom<String> for Polarity {
    type Error = PolarityParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MetricDef {
    pub name: String,
    pub polarity: Polarity,
}

impl MetricDef {
    pub fn new(name: impl Into<String>, polarity: Polarity) -> Self {
        Self {
            name: name.into(),
            polarity,
        }
    }
}

/// Absolute-delta bounds separating small, moderate and large changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Thresholds {
    pub small: f64,
    pub large: f64,
}

impl Thresholds {
    pub const DEFAULT: Thresholds = Thresholds {
        small: 1.0,
        large: 5.0,
    };

    pub fn new(small: f64, large: f64) -> Self {
        Self { small, large }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// The ordered metric list and severity bounds a comparison runs against.
///
/// Metric order here is the order rows come out of the comparator for each
/// weapon. Stats present in the data but absent from `metrics` are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricCatalog {
    pub metrics: Vec<MetricDef>,
    #[serde(default)]
    pub thresholds: BTreeMap<String, Thresholds>,
}

impl MetricCatalog {
    pub fn new(metrics: Vec<MetricDef>, thresholds: BTreeMap<String, Thresholds>) -> Self {
        Self {
            metrics,
            thresholds,
        }
    }

    pub fn thresholds_for(&self, metric: &str) -> Thresholds {
        self.thresholds
            .get(metric)
            .copied()
            .unwrap_or(Thresholds::DEFAULT)
    }

    pub fn metric(&self, name: &str) -> Option<&MetricDef> {
        self.metrics.iter().find(|m| m.name == name)
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.iter().map(|m| m.name.as_str())
    }
}

impl Default for MetricCatalog {
    fn default() -> Self {
        let defaults: [(&str, Polarity, f64, f64); 7] = [
            ("bodyDamage", Polarity::HigherIsBetter, 1.0, 5.0),
            ("headDamage", Polarity::HigherIsBetter, 2.0, 8.0),
            ("fireRate", Polarity::HigherIsBetter, 0.2, 1.0),
            ("magSize", Polarity::HigherIsBetter, 1.0, 5.0),
            ("timeToKill", Polarity::LowerIsBetter, 0.05, 0.2),
            ("bodyDamageAfterFirstHit", Polarity::HigherIsBetter, 1.0, 5.0),
            ("headDamageAfterFirstHit", Polarity::HigherIsBetter, 2.0, 8.0),
        ];
        let mut metrics = Vec::with_capacity(defaults.len());
        let mut thresholds = BTreeMap::new();
        for (name, polarity, small, large) in defaults {
            metrics.push(MetricDef::new(name, polarity));
            thresholds.insert(name.to_string(), Thresholds::new(small, large));
        }
        Self {
            metrics,
            thresholds,
        }
    }
}
