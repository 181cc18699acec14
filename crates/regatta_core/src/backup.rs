//! File-level backup ledger.
//!
//! Snapshots of a document are plain copies kept under a backup tree that
//! mirrors the document's location below the base directory:
//!
//! ```text
//! <base>/backups/<sub/dir>/<stem>_<YYYYMMDD_HHMMSS><ext>
//! <base>/backups/<sub/dir>/<stem>_<YYYYMMDD_HHMMSS>.json
//! ```
//!
//! The timestamp is fixed width, so comparing timestamps as strings orders
//! snapshots chronologically. History is linear: restoring a snapshot
//! deletes every newer snapshot of the same file.
//!
//! ## Usage
//!
//! ```ignore
//! use regatta_core::{BackupLedger, LedgerConfig};
//!
//! let ledger = BackupLedger::new(LedgerConfig::new("/srv/events"))?;
//! let snapshot = ledger.create_backup("/srv/events/winter.orcsc", "added races")?;
//! let history = ledger.list_backups("/srv/events/winter.orcsc")?;
//! ledger.restore_backup(&history[1].path)?;
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::LedgerConfig;
use crate::error::{CoreError, CoreResult};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Format of snapshot timestamps in file names and metadata.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
/// Length of a formatted timestamp.
const TIMESTAMP_LEN: usize = 15;

/// Contents of a snapshot's metadata sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Snapshot time in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Free-text description of the change that was backed up.
    #[serde(default)]
    pub change_summary: String,
    /// Path of the document relative to the base directory.
    pub original_path: String,
}

/// One snapshot as reported by [`BackupLedger::list_backups`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupEntry {
    /// Path of the snapshot copy.
    pub path: PathBuf,
    /// Snapshot time.
    pub timestamp: NaiveDateTime,
    /// File name of the snapshot copy.
    pub filename: String,
    /// Change summary from the sidecar.
    pub change_summary: String,
}

/// Creates, lists and restores snapshots below a base directory.
pub struct BackupLedger {
    config: LedgerConfig,
    base_dir: PathBuf,
    backup_root: PathBuf,
    clock: Box<dyn Clock>,
}

impl BackupLedger {
    /// Creates a ledger using the system clock.
    ///
    /// The base directory and the backup tree are created if missing.
    pub fn new(config: LedgerConfig) -> CoreResult<Self> {
        Self::with_clock(config, SystemClock)
    }

    /// Creates a ledger with an explicit time source.
    pub fn with_clock(config: LedgerConfig, clock: impl Clock + 'static) -> CoreResult<Self> {
        fs::create_dir_all(&config.base_dir)?;
        let base_dir = config.base_dir.canonicalize()?;
        let backup_root = base_dir.join(&config.backup_dir_name);
        fs::create_dir_all(&backup_root)?;
        Ok(Self {
            config,
            base_dir,
            backup_root,
            clock: Box::new(clock),
        })
    }

    /// The resolved base directory.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// The root of the snapshot tree.
    #[must_use]
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Copies `path` into the snapshot tree and writes its metadata sidecar.
    ///
    /// Returns the path of the new snapshot.
    ///
    /// # Errors
    ///
    /// - `DocumentNotFound` if `path` does not exist
    /// - `Validation` if `path` is outside the base directory
    /// - `Conflict` if a snapshot with the same timestamp already exists
    pub fn create_backup(&self, path: impl AsRef<Path>, change_summary: &str) -> CoreResult<PathBuf> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(CoreError::DocumentNotFound {
                path: path.to_path_buf(),
            });
        }
        let relative = self.relative_to_base(path)?;
        let (stem, ext) = stem_and_ext(&relative)?;
        self.reject_metadata_extension(&ext)?;

        let dir = self.mirror_dir(&relative);
        fs::create_dir_all(&dir)?;

        let timestamp = self.clock.now().format(TIMESTAMP_FORMAT).to_string();
        let snapshot = dir.join(format!("{stem}_{timestamp}{ext}"));
        if snapshot.exists() {
            return Err(CoreError::conflict(format!(
                "snapshot {} already exists",
                snapshot.display()
            )));
        }

        let metadata = SnapshotMetadata {
            timestamp,
            change_summary: change_summary.to_string(),
            original_path: relative.to_string_lossy().into_owned(),
        };
        fs::copy(path, &snapshot)?;
        fs::write(self.sidecar(&snapshot), serde_json::to_string_pretty(&metadata)?)?;

        info!(
            snapshot = %snapshot.display(),
            summary = change_summary,
            "created backup"
        );
        Ok(snapshot)
    }

    /// Lists the snapshots of `path`, newest first.
    ///
    /// Snapshots without a readable sidecar are skipped.
    pub fn list_backups(&self, path: impl AsRef<Path>) -> CoreResult<Vec<BackupEntry>> {
        let relative = self.relative_to_base(path.as_ref())?;
        let (stem, ext) = stem_and_ext(&relative)?;
        let dir = self.mirror_dir(&relative);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<BackupEntry> = self
            .snapshots_in(&dir, &stem, &ext)?
            .into_iter()
            .filter_map(|(snapshot, _)| self.read_entry(snapshot))
            .collect();

        entries.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.filename.cmp(&a.filename))
        });
        Ok(entries)
    }

    /// Restores the live document from `snapshot`.
    ///
    /// Every newer snapshot of the same document is deleted with its
    /// sidecar before the copy, so the restored snapshot becomes the newest.
    /// Returns the path of the restored document.
    ///
    /// # Errors
    ///
    /// - `SnapshotNotFound` if `snapshot` does not exist
    /// - `Validation` if it is not a snapshot inside the backup tree, or is
    ///   a metadata sidecar
    pub fn restore_backup(&self, snapshot: impl AsRef<Path>) -> CoreResult<PathBuf> {
        let snapshot = snapshot.as_ref();
        if !snapshot.is_file() {
            return Err(CoreError::SnapshotNotFound {
                path: snapshot.to_path_buf(),
            });
        }
        let snapshot = snapshot.canonicalize()?;
        let relative = snapshot
            .strip_prefix(&self.backup_root)
            .map_err(|_| {
                CoreError::validation(format!(
                    "{} is not inside {}",
                    snapshot.display(),
                    self.backup_root.display()
                ))
            })?
            .to_path_buf();

        let filename = file_name(&relative)?;
        let ext = extension_of(&relative);
        self.reject_metadata_extension(&ext)?;
        let (stem, chosen) = split_snapshot_name(&filename, &ext).ok_or_else(|| {
            CoreError::validation(format!("{filename} is not a snapshot file name"))
        })?;

        let dir = snapshot.parent().unwrap_or(&self.backup_root).to_path_buf();
        let mut pruned = 0usize;
        for (newer, timestamp) in self.snapshots_in(&dir, stem, &ext)? {
            if timestamp.as_str() > chosen {
                fs::remove_file(&newer)?;
                let sidecar = self.sidecar(&newer);
                if sidecar.exists() {
                    fs::remove_file(&sidecar)?;
                }
                info!(snapshot = %newer.display(), "deleted newer backup");
                pruned += 1;
            }
        }

        let parent = relative.parent().unwrap_or_else(|| Path::new(""));
        let original = self.base_dir.join(parent).join(format!("{stem}{ext}"));
        if let Some(dir) = original.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::copy(&snapshot, &original)?;

        info!(
            restored = %original.display(),
            from = %snapshot.display(),
            pruned,
            "restored backup"
        );
        Ok(original)
    }

    fn relative_to_base(&self, path: &Path) -> CoreResult<PathBuf> {
        let absolute = resolve(path)?;
        absolute
            .strip_prefix(&self.base_dir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                CoreError::validation(format!(
                    "{} is outside {}",
                    absolute.display(),
                    self.base_dir.display()
                ))
            })
    }

    fn reject_metadata_extension(&self, ext: &str) -> CoreResult<()> {
        if ext.trim_start_matches('.') == self.config.metadata_extension {
            return Err(CoreError::validation(format!(
                ".{} files are backup metadata, not documents",
                self.config.metadata_extension
            )));
        }
        Ok(())
    }

    fn mirror_dir(&self, relative: &Path) -> PathBuf {
        match relative.parent() {
            Some(parent) => self.backup_root.join(parent),
            None => self.backup_root.clone(),
        }
    }

    fn sidecar(&self, snapshot: &Path) -> PathBuf {
        snapshot.with_extension(&self.config.metadata_extension)
    }

    /// Snapshot files of `stem`/`ext` in `dir`, with their timestamps.
    fn snapshots_in(&self, dir: &Path, stem: &str, ext: &str) -> CoreResult<Vec<(PathBuf, String)>> {
        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some((s, timestamp)) = split_snapshot_name(name, ext) {
                if s == stem {
                    let timestamp = timestamp.to_string();
                    found.push((path, timestamp));
                }
            }
        }
        Ok(found)
    }

    fn read_entry(&self, snapshot: PathBuf) -> Option<BackupEntry> {
        let sidecar = self.sidecar(&snapshot);
        if !sidecar.is_file() {
            return None;
        }
        let metadata: SnapshotMetadata = match fs::read_to_string(&sidecar)
            .map_err(CoreError::from)
            .and_then(|text| serde_json::from_str(&text).map_err(CoreError::from))
        {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(snapshot = %snapshot.display(), error = %e, "skipping backup with invalid metadata");
                return None;
            }
        };
        let timestamp = match NaiveDateTime::parse_from_str(&metadata.timestamp, TIMESTAMP_FORMAT) {
            Ok(ts) => ts,
            Err(e) => {
                warn!(snapshot = %snapshot.display(), error = %e, "skipping backup with invalid timestamp");
                return None;
            }
        };
        let filename = snapshot.file_name()?.to_string_lossy().into_owned();
        Some(BackupEntry {
            path: snapshot,
            timestamp,
            filename,
            change_summary: metadata.change_summary,
        })
    }
}

/// Absolute form of `path`, which need not exist.
///
/// The nearest existing ancestor is canonicalized and the missing
/// components are joined onto it as written.
fn resolve(path: &Path) -> CoreResult<PathBuf> {
    let mut existing = path;
    let mut missing = Vec::new();
    loop {
        if existing.as_os_str().is_empty() {
            existing = Path::new(".");
        }
        if existing.exists() {
            break;
        }
        let name = existing
            .file_name()
            .ok_or_else(|| CoreError::validation(format!("cannot resolve {}", path.display())))?;
        missing.push(name);
        existing = existing.parent().unwrap_or_else(|| Path::new(""));
    }

    let mut absolute = existing.canonicalize()?;
    for name in missing.into_iter().rev() {
        absolute.push(name);
    }
    Ok(absolute)
}

fn file_name(path: &Path) -> CoreResult<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| CoreError::validation(format!("{} has no file name", path.display())))
}

/// Extension including the leading dot, or empty.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

fn stem_and_ext(path: &Path) -> CoreResult<(String, String)> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| CoreError::validation(format!("{} has no file name", path.display())))?;
    Ok((stem.to_string(), extension_of(path)))
}

/// Splits `<stem>_<timestamp><ext>` into stem and timestamp.
///
/// The timestamp is taken from the fixed-width tail, so stems may contain
/// underscores.
fn split_snapshot_name<'a>(name: &'a str, ext: &str) -> Option<(&'a str, &'a str)> {
    let body = name.strip_suffix(ext)?;
    let split = body.len().checked_sub(TIMESTAMP_LEN)?;
    if !body.is_char_boundary(split) {
        return None;
    }
    let (head, timestamp) = body.split_at(split);
    let stem = head.strip_suffix('_')?;
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?;
    Some((stem, timestamp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, SteppingClock};
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(10, 15, 0)
            .unwrap()
    }

    fn setup() -> (TempDir, BackupLedger, PathBuf) {
        let dir = TempDir::new().unwrap();
        let ledger = BackupLedger::with_clock(
            LedgerConfig::new(dir.path()),
            SteppingClock::new(start(), Duration::seconds(1)),
        )
        .unwrap();
        let file = dir.path().join("events").join("winter_2024.orcsc");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "<ROOT>v1</ROOT>").unwrap();
        (dir, ledger, file)
    }

    #[test]
    fn snapshot_layout_mirrors_source() {
        let (_dir, ledger, file) = setup();
        let snapshot = ledger.create_backup(&file, "init").unwrap();

        let expected = ledger
            .backup_root()
            .join("events")
            .join("winter_2024_20240315_101500.orcsc");
        assert_eq!(snapshot, expected);

        let meta: SnapshotMetadata =
            serde_json::from_str(&fs::read_to_string(snapshot.with_extension("json")).unwrap())
                .unwrap();
        assert_eq!(meta.timestamp, "20240315_101500");
        assert_eq!(meta.change_summary, "init");
        assert_eq!(
            PathBuf::from(meta.original_path),
            Path::new("events").join("winter_2024.orcsc")
        );
    }

    #[test]
    fn list_is_newest_first() {
        let (_dir, ledger, file) = setup();
        ledger.create_backup(&file, "init").unwrap();
        ledger.create_backup(&file, "edit").unwrap();

        let summaries: Vec<_> = ledger
            .list_backups(&file)
            .unwrap()
            .into_iter()
            .map(|e| e.change_summary)
            .collect();
        assert_eq!(summaries, ["edit", "init"]);
    }

    #[test]
    fn list_skips_snapshots_without_sidecar() {
        let (_dir, ledger, file) = setup();
        let first = ledger.create_backup(&file, "init").unwrap();
        ledger.create_backup(&file, "edit").unwrap();
        fs::remove_file(first.with_extension("json")).unwrap();

        assert_eq!(ledger.list_backups(&file).unwrap().len(), 1);
    }

    #[test]
    fn list_ignores_other_stems_with_shared_prefix() {
        let (dir, ledger, file) = setup();
        let other = dir.path().join("events").join("winter_2024_final.orcsc");
        fs::write(&other, "<ROOT/>").unwrap();
        ledger.create_backup(&other, "other").unwrap();
        ledger.create_backup(&file, "mine").unwrap();

        let entries = ledger.list_backups(&file).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].change_summary, "mine");
    }

    #[test]
    fn restore_prunes_newer_and_copies_content() {
        let (_dir, ledger, file) = setup();
        let init = ledger.create_backup(&file, "init").unwrap();
        fs::write(&file, "<ROOT>v2</ROOT>").unwrap();
        ledger.create_backup(&file, "edit").unwrap();
        fs::write(&file, "<ROOT>v3</ROOT>").unwrap();
        ledger.create_backup(&file, "more").unwrap();

        let restored = ledger.restore_backup(&init).unwrap();

        assert_eq!(restored, file.canonicalize().unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), "<ROOT>v1</ROOT>");
        let remaining = ledger.list_backups(&file).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].change_summary, "init");
    }

    #[test]
    fn same_second_backup_conflicts() {
        let dir = TempDir::new().unwrap();
        let ledger =
            BackupLedger::with_clock(LedgerConfig::new(dir.path()), FixedClock(start())).unwrap();
        let file = dir.path().join("a.orcsc");
        fs::write(&file, "<ROOT/>").unwrap();

        ledger.create_backup(&file, "one").unwrap();
        let err = ledger.create_backup(&file, "two").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Conflict);
    }

    #[test]
    fn outside_base_is_rejected() {
        let (_dir, ledger, _file) = setup();
        let elsewhere = TempDir::new().unwrap();
        let stray = elsewhere.path().join("x.orcsc");
        fs::write(&stray, "<ROOT/>").unwrap();

        let err = ledger.create_backup(&stray, "nope").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }

    #[test]
    fn missing_snapshot_is_not_found() {
        let (_dir, ledger, _file) = setup();
        let err = ledger
            .restore_backup(ledger.backup_root().join("gone_20240101_000000.orcsc"))
            .unwrap_err();
        assert!(matches!(err, CoreError::SnapshotNotFound { .. }));
    }

    #[test]
    fn list_for_file_without_history_is_empty() {
        let (dir, ledger, _file) = setup();
        let fresh = dir.path().join("fresh.orcsc");
        assert!(ledger.list_backups(&fresh).unwrap().is_empty());
    }

    #[test]
    fn list_under_missing_directory_is_empty() {
        let (dir, ledger, _file) = setup();
        let unborn = dir.path().join("newdir").join("deeper").join("x.orcsc");
        assert!(ledger.list_backups(&unborn).unwrap().is_empty());
    }

    #[test]
    fn restoring_a_sidecar_is_rejected_before_pruning() {
        let (dir, ledger, file) = setup();
        let init = ledger.create_backup(&file, "init").unwrap();
        fs::write(&file, "<ROOT>v2</ROOT>").unwrap();
        ledger.create_backup(&file, "edit").unwrap();
        ledger.create_backup(&file, "more").unwrap();

        let err = ledger.restore_backup(init.with_extension("json")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);

        assert_eq!(ledger.list_backups(&file).unwrap().len(), 3);
        assert!(!dir.path().join("events").join("winter_2024.json").exists());
        assert_eq!(fs::read_to_string(&file).unwrap(), "<ROOT>v2</ROOT>");
    }

    proptest! {
        #[test]
        fn snapshot_names_split_back(stem in "[A-Za-z0-9_.-]{1,24}", secs in 0i64..4_000_000_000) {
            let ts = chrono::DateTime::from_timestamp(secs, 0).unwrap().naive_utc();
            let name = format!("{stem}_{}.orcsc", ts.format(TIMESTAMP_FORMAT));
            let (s, t) = split_snapshot_name(&name, ".orcsc").unwrap();
            prop_assert_eq!(s, stem.as_str());
            prop_assert_eq!(t, ts.format(TIMESTAMP_FORMAT).to_string());
        }
    }

    #[test]
    fn snapshot_name_parsing() {
        assert_eq!(
            split_snapshot_name("winter_2024_20240315_101500.orcsc", ".orcsc"),
            Some(("winter_2024", "20240315_101500"))
        );
        assert_eq!(split_snapshot_name("winter_2024.orcsc", ".orcsc"), None);
        assert_eq!(split_snapshot_name("x_20241315_101500.orcsc", ".orcsc"), None);
        assert_eq!(
            split_snapshot_name("notes_20240315_101500", ""),
            Some(("notes", "20240315_101500"))
        );
    }
}
