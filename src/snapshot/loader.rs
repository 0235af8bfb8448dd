use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use thiserror::Error;
use tracing::info;

use crate::snapshot::{Snapshot, SnapshotDocument};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed reading {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed parsing {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let data = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let document: SnapshotDocument =
        serde_json::from_str(&data).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let snapshot = Snapshot::from_document(document);
    info!(path = %path.display(), weapons = snapshot.len(), "loaded snapshot");
    Ok(snapshot)
}

pub fn save_snapshot(snapshot: &Snapshot, path: &Path) -> anyhow::Result<()> {
    let data = serde_json::to_string_pretty(&snapshot.to_document())?;
    fs::write(path, data)
        .with_context(|| format!("failed writing snapshot: {}", path.display()))
}
