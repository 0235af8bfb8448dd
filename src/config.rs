use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::metrics::{MetricCatalog, MetricDef, Thresholds};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Ordered metric list. Empty means the built-in Arc Raiders set.
    #[serde(default)]
    pub metrics: Vec<MetricDef>,
    /// Per-metric severity bounds, merged over the built-in table.
    #[serde(default)]
    pub thresholds: BTreeMap<String, Thresholds>,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default)]
    pub show_mixed_rows: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_settings_path")]
    pub settings_path: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub preview_rows: Option<usize>,
    pub top_n: Option<usize>,
    pub show_mixed_rows: Option<bool>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/patchforge/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        let parsed: Self = toml::from_str(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))?;
        Ok(parsed)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(rows) = overrides.preview_rows {
            self.report.preview_rows = rows;
        }
        if let Some(top_n) = overrides.top_n {
            self.report.top_n = top_n;
        }
        if let Some(show) = overrides.show_mixed_rows {
            self.report.show_mixed_rows = show;
        }
    }

    /// Metric list and thresholds to compare with, configured values winning.
    pub fn catalog(&self) -> MetricCatalog {
        let mut catalog = MetricCatalog::default();
        if !self.metrics.is_empty() {
            catalog.metrics = self.metrics.clone();
        }
        for (metric, bounds) in &self.thresholds {
            catalog.thresholds.insert(metric.clone(), *bounds);
        }
        catalog
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_settings_path(&self) -> PathBuf {
        expand_tilde(&self.storage.settings_path)
    }

    pub fn default_template() -> String {
        let template = r#"# Metrics are compared in the order listed here.
[[metrics]]
name = "bodyDamage"
polarity = "higher_is_better"

[[metrics]]
name = "headDamage"
polarity = "higher_is_better"

[[metrics]]
name = "fireRate"
polarity = "higher_is_better"

[[metrics]]
name = "magSize"
polarity = "higher_is_better"

[[metrics]]
name = "timeToKill"
polarity = "lower_is_better"

[[metrics]]
name = "bodyDamageAfterFirstHit"
polarity = "higher_is_better"

[[metrics]]
name = "headDamageAfterFirstHit"
polarity = "higher_is_better"

# Absolute-delta bounds: below small is "small", from small is "moderate",
# from large is "large". Unlisted metrics use small = 1, large = 5.
[thresholds]
bodyDamage = { small = 1.0, large = 5.0 }
headDamage = { small = 2.0, large = 8.0 }
fireRate = { small = 0.2, large = 1.0 }
magSize = { small = 1.0, large = 5.0 }
timeToKill = { small = 0.05, large = 0.2 }
bodyDamageAfterFirstHit = { small = 1.0, large = 5.0 }
headDamageAfterFirstHit = { small = 2.0, large = 8.0 }

[report]
preview_rows = 10
top_n = 5
show_mixed_rows = false

[storage]
settings_path = "~/.config/patchforge/settings.json"
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
            top_n: default_top_n(),
            show_mixed_rows: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            settings_path: default_settings_path(),
        }
    }
}

fn default_preview_rows() -> usize {
    10
}

fn default_top_n() -> usize {
    5
}

fn default_settings_path() -> String {
    "~/.config/patchforge/settings.json".to_string()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{Config, ConfigOverrides};
    use crate::metrics::{MetricCatalog, Polarity, Thresholds};

    #[test]
    fn template_parses_to_default_catalog() {
        let parsed: Config = toml::from_str(&Config::default_template()).expect("template parses");
        assert_eq!(parsed.catalog(), MetricCatalog::default());
        assert_eq!(parsed.report.preview_rows, 10);
        assert_eq!(parsed.report.top_n, 5);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = Config::load(Some(&dir.path().join("absent.toml"))).expect("load");
        assert!(config.metrics.is_empty());
        assert_eq!(config.catalog(), MetricCatalog::default());
    }

    #[test]
    fn configured_metrics_replace_defaults_and_thresholds_merge() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[[metrics]]
name = "reloadTime"
polarity = "lower"

[thresholds]
reloadTime = { small = 0.1, large = 0.5 }

[report]
preview_rows = 3
"#,
        )
        .expect("write");

        let config = Config::load(Some(&path)).expect("load");
        let catalog = config.catalog();
        assert_eq!(catalog.metrics.len(), 1);
        assert_eq!(catalog.metrics[0].polarity, Polarity::LowerIsBetter);
        assert_eq!(catalog.thresholds_for("reloadTime"), Thresholds::new(0.1, 0.5));
        assert_eq!(catalog.thresholds_for("headDamage"), Thresholds::new(2.0, 8.0));
        assert_eq!(config.report.preview_rows, 3);
        assert_eq!(config.report.top_n, 5);
    }

    #[test]
    fn overrides_apply() {
        let mut config = Config::default();
        config.apply_overrides(ConfigOverrides {
            preview_rows: Some(25),
            top_n: None,
            show_mixed_rows: Some(true),
        });
        assert_eq!(config.report.preview_rows, 25);
        assert_eq!(config.report.top_n, 5);
        assert!(config.report.show_mixed_rows);
    }

    #[test]
    fn write_template_creates_parent_dirs() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested/patchforge/config.toml");
        Config::write_template(&path).expect("write");
        assert!(Config::load(Some(&path)).is_ok());
    }
}
