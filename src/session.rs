//! User-facing workflow state: which snapshots are loaded, the last
//! comparison, and the remembered file paths.
//!
//! Front ends drive it by dispatching [`Action`]s; the comparison core never
//! sees the settings or any of this state.

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::compare::{compare, summarize, top_changes, ChangeRecord, PatchSummary, TopChanges};
use crate::metrics::MetricCatalog;
use crate::output::csv::export_csv;
use crate::output::html::export_html;
use crate::settings::Settings;
use crate::snapshot::{load_snapshot, LoadError, Snapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Old,
    New,
}

impl Display for Side {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Old => write!(f, "OLD"),
            Self::New => write!(f, "NEW"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    LoadOld(PathBuf),
    LoadNew(PathBuf),
    Compare,
    Summarize,
    ExportCsv(PathBuf),
    ExportHtml(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded {
        side: Side,
        path: PathBuf,
        weapons: usize,
    },
    Compared {
        rows: usize,
    },
    Summarized(PatchSummary),
    Exported {
        format: ExportFormat,
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Html,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "CSV"),
            Self::Html => write!(f, "HTML"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("please load both OLD and NEW JSON files first")]
    MissingSnapshots,
    #[error("run a comparison first")]
    NoComparison,
    #[error("could not load {side} file: {source}")]
    Load {
        side: Side,
        #[source]
        source: LoadError,
    },
    #[error("export failed: {0:#}")]
    Export(anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct Comparison {
    pub records: Vec<ChangeRecord>,
    pub summary: PatchSummary,
}

#[derive(Debug)]
pub struct Session {
    catalog: MetricCatalog,
    settings: Settings,
    settings_path: Option<PathBuf>,
    old: Option<Snapshot>,
    new: Option<Snapshot>,
    last: Option<Comparison>,
}

impl Session {
    /// `settings_path` of `None` keeps settings in memory only.
    pub fn new(catalog: MetricCatalog, settings_path: Option<PathBuf>) -> Self {
        let settings = settings_path
            .as_deref()
            .map(Settings::load)
            .unwrap_or_default();
        Self {
            catalog,
            settings,
            settings_path,
            old: None,
            new: None,
            last: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn catalog(&self) -> &MetricCatalog {
        &self.catalog
    }

    pub fn last_comparison(&self) -> Option<&Comparison> {
        self.last.as_ref()
    }

    pub fn records(&self) -> &[ChangeRecord] {
        self.last.as_ref().map(|c| c.records.as_slice()).unwrap_or(&[])
    }

    pub fn top_changes(&self, limit: usize) -> Result<TopChanges, SessionError> {
        let last = self.last.as_ref().ok_or(SessionError::NoComparison)?;
        Ok(top_changes(&last.records, limit))
    }

    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, SessionError> {
        match action {
            Action::LoadOld(path) => self.load(Side::Old, path),
            Action::LoadNew(path) => self.load(Side::New, path),
            Action::Compare => self.compare(),
            Action::Summarize => {
                let last = self.last.as_ref().ok_or(SessionError::NoComparison)?;
                Ok(Outcome::Summarized(last.summary.clone()))
            }
            Action::ExportCsv(path) => {
                let last = self.last.as_ref().ok_or(SessionError::NoComparison)?;
                export_csv(&last.records, &path).map_err(SessionError::Export)?;
                Ok(Outcome::Exported {
                    format: ExportFormat::Csv,
                    path,
                })
            }
            Action::ExportHtml(path) => {
                let last = self.last.as_ref().ok_or(SessionError::NoComparison)?;
                export_html(&last.records, &last.summary, &path).map_err(SessionError::Export)?;
                Ok(Outcome::Exported {
                    format: ExportFormat::Html,
                    path,
                })
            }
        }
    }

    fn load(&mut self, side: Side, path: PathBuf) -> Result<Outcome, SessionError> {
        let snapshot = load_snapshot(&path).map_err(|source| SessionError::Load { side, source })?;
        let weapons = snapshot.len();
        match side {
            Side::Old => {
                self.old = Some(snapshot);
                self.settings.old_json = Some(path.clone());
            }
            Side::New => {
                self.new = Some(snapshot);
                self.settings.new_json = Some(path.clone());
            }
        }
        self.persist_settings();
        Ok(Outcome::Loaded {
            side,
            path,
            weapons,
        })
    }

    fn compare(&mut self) -> Result<Outcome, SessionError> {
        let (Some(old), Some(new)) = (self.old.as_ref(), self.new.as_ref()) else {
            return Err(SessionError::MissingSnapshots);
        };
        let records = compare(old, new, &self.catalog);
        let summary = summarize(&records);
        info!(
            rows = records.len(),
            buffs = summary.buffs,
            nerfs = summary.nerfs,
            mixed = summary.mixed,
            "compared snapshots"
        );
        let rows = records.len();
        self.last = Some(Comparison { records, summary });
        Ok(Outcome::Compared { rows })
    }

    fn persist_settings(&self) {
        let Some(path) = self.settings_path.as_deref() else {
            return;
        };
        if let Err(err) = self.settings.save(path) {
            warn!("failed saving settings: {err:#}");
        }
    }

    /// Path remembered for `side` from an earlier run.
    pub fn remembered_path(&self, side: Side) -> Option<&Path> {
        match side {
            Side::Old => self.settings.old_json.as_deref(),
            Side::New => self.settings.new_json.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::{Action, Outcome, Session, SessionError, Side};
    use crate::metrics::MetricCatalog;
    use crate::settings::Settings;

    const OLD: &str = r#"{"weapons":[{"name":"Ferro","stats":{"bodyDamage":40,"timeToKill":0.5}}]}"#;
    const NEW: &str = r#"{"weapons":[{"name":"Ferro","stats":{"bodyDamage":44,"timeToKill":0.6}}]}"#;

    #[test]
    fn compare_requires_both_snapshots() {
        let mut session = Session::new(MetricCatalog::default(), None);
        let err = session.dispatch(Action::Compare).expect_err("no data loaded");
        assert!(matches!(err, SessionError::MissingSnapshots));
        let err = session.dispatch(Action::Summarize).expect_err("nothing compared");
        assert!(matches!(err, SessionError::NoComparison));
    }

    #[test]
    fn full_workflow_persists_paths_and_exports() {
        let dir = TempDir::new().expect("tempdir");
        let old_path = dir.path().join("old.json");
        let new_path = dir.path().join("new.json");
        let settings_path = dir.path().join("settings.json");
        fs::write(&old_path, OLD).expect("write old");
        fs::write(&new_path, NEW).expect("write new");

        let mut session = Session::new(MetricCatalog::default(), Some(settings_path.clone()));
        session
            .dispatch(Action::LoadOld(old_path.clone()))
            .expect("load old");
        session
            .dispatch(Action::LoadNew(new_path.clone()))
            .expect("load new");

        let outcome = session.dispatch(Action::Compare).expect("compare");
        assert_eq!(outcome, Outcome::Compared { rows: 7 });

        let Outcome::Summarized(summary) = session.dispatch(Action::Summarize).expect("summary")
        else {
            panic!("expected summary outcome");
        };
        assert_eq!(summary.buffs, 1);
        assert_eq!(summary.nerfs, 1);
        assert_eq!(summary.mixed, 1);

        let csv_path = dir.path().join("diff.csv");
        session
            .dispatch(Action::ExportCsv(csv_path.clone()))
            .expect("export csv");
        assert!(fs::read_to_string(&csv_path)
            .expect("read csv")
            .starts_with("Weapon,Metric,Old,New,Δ,Status"));

        let saved = Settings::load(&settings_path);
        assert_eq!(saved.old_json.as_deref(), Some(old_path.as_path()));
        assert_eq!(saved.new_json.as_deref(), Some(new_path.as_path()));

        let reopened = Session::new(MetricCatalog::default(), Some(settings_path));
        assert_eq!(reopened.remembered_path(Side::New), Some(new_path.as_path()));
    }

    #[test]
    fn load_failure_names_the_side() {
        let dir = TempDir::new().expect("tempdir");
        let mut session = Session::new(MetricCatalog::default(), None);
        let err = session
            .dispatch(Action::LoadNew(dir.path().join("missing.json")))
            .expect_err("missing file");
        assert!(err.to_string().starts_with("could not load NEW file"));
    }
}
