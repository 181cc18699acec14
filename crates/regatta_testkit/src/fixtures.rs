//! Test fixtures and workspace helpers.
//!
//! Provides a temporary directory wired to an editor and a backup ledger,
//! plus a few ready-made records.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regatta_codec::{BoatRecord, ClassRecord, EventRecord, RaceRecord, ScoringCode, YachtClass};
use regatta_core::{
    BackupLedger, DocumentEditor, LedgerConfig, NewDocument, SteppingClock, StoreConfig,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with an editor and a ledger rooted in it.
pub struct TestWorkspace {
    /// The editor.
    pub editor: DocumentEditor,
    /// The backup ledger, on a clock that advances one second per snapshot.
    pub ledger: BackupLedger,
    /// The temporary directory (kept alive to prevent cleanup).
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a workspace with the default editor configuration.
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Creates a workspace with a custom editor configuration.
    pub fn with_config(config: StoreConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let ledger = BackupLedger::with_clock(
            LedgerConfig::new(temp_dir.path()),
            SteppingClock::new(ledger_epoch(), Duration::seconds(1)),
        )
        .expect("Failed to open backup ledger");

        Self {
            editor: DocumentEditor::new(config),
            ledger,
            temp_dir,
        }
    }

    /// The workspace root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// A path inside the workspace.
    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    /// Creates a document at `name` from the template.
    pub fn create(&self, name: &str, content: &NewDocument) -> PathBuf {
        self.editor
            .create_from_template(self.path(name), content)
            .expect("Failed to create document")
    }

    /// Creates a document with the sample event and no classes.
    pub fn empty_document(&self, name: &str) -> PathBuf {
        self.create(name, &NewDocument::new(sample_event()))
    }

    /// Creates a document with the sample event and classes.
    pub fn sample_document(&self, name: &str) -> PathBuf {
        self.create(
            name,
            &NewDocument::new(sample_event()).classes(sample_classes()),
        )
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs a test with a fresh workspace.
pub fn with_workspace<F, R>(f: F) -> R
where
    F: FnOnce(&TestWorkspace) -> R,
{
    let ws = TestWorkspace::new();
    f(&ws)
}

/// First timestamp handed out by workspace ledgers.
pub fn ledger_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .and_then(|d| d.and_hms_opt(10, 15, 0))
        .expect("valid date")
}

/// A two-day event.
pub fn sample_event() -> EventRecord {
    let start = ledger_epoch();
    EventRecord::new(
        "Winter Series",
        start,
        start + Duration::days(1),
        "Haifa",
        "CYC",
    )
}

/// One ORC class and one one-design class.
pub fn sample_classes() -> Vec<ClassRecord> {
    vec![
        ClassRecord::new("O1", "ORC1", YachtClass::Orc),
        ClassRecord::new("Z", "Amami", YachtClass::OneDesign),
    ]
}

/// A windward-leeward race for class `O1`.
pub fn sample_race(name: &str) -> RaceRecord {
    RaceRecord::new(
        name,
        ledger_epoch() + Duration::hours(1),
        "O1",
        ScoringCode::WindwardLeeward,
    )
}

/// A boat in class `O1` with a GPH allowance.
pub fn sample_boat(name: &str, sail_no: &str) -> BoatRecord {
    let mut boat = BoatRecord::new(name, sail_no, "O1");
    boat.set_handicap("GPH", 612.4);
    boat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_document() {
        with_workspace(|ws| {
            let path = ws.sample_document("event.orcsc");
            let summary = ws.editor.summary(&path).unwrap();
            assert_eq!(summary.event_title.as_deref(), Some("Winter Series"));
            assert_eq!(summary.classes, 2);
            assert_eq!(summary.reports, 6);
        });
    }

    #[test]
    fn test_empty_document() {
        let ws = TestWorkspace::new();
        let path = ws.empty_document("empty.orcsc");
        let summary = ws.editor.summary(&path).unwrap();
        assert_eq!(summary.classes, 0);
        assert_eq!(summary.races, 0);
        assert_eq!(summary.boats, 0);
        assert!(path.starts_with(ws.root()));
    }
}
