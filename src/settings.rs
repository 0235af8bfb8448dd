use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Last-used snapshot paths, remembered between runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_json: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_json: Option<PathBuf>,
}

impl Settings {
    /// Never fails: an absent or unreadable file means fresh settings.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "no settings file");
            return Self::default();
        }
        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|data| serde_json::from_str::<Self>(&data).map_err(anyhow::Error::from));
        match parsed {
            Ok(settings) => settings,
            Err(err) => {
                warn!(path = %path.display(), "ignoring unreadable settings: {err}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating settings directory: {}", parent.display())
            })?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)
            .with_context(|| format!("failed writing settings: {}", path.display()))
    }
}
