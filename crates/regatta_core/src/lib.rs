//! # Regatta Core
//!
//! File-level operations on ORCSC scoring documents.
//!
//! This crate provides:
//! - [`ScoringDocument`], a loaded document with section and keyed-row access
//! - [`DocumentEditor`], the load-modify-save operations: append with id
//!   assignment, update and delete by key, event and logo replacement, and
//!   creation from a template
//! - [`ReportBinder`], which keeps report directives in step with classes
//! - [`BackupLedger`], timestamped snapshots with linear restore
//!
//! Every mutation reads the input file, applies the change in memory and
//! writes the full document to the output path. Nothing is written when an
//! operation fails.
//!
//! ## Usage
//!
//! ```ignore
//! use regatta_codec::{ClassRecord, EventRecord, RaceRecord, ScoringCode, YachtClass};
//! use regatta_core::{DocumentEditor, NewDocument};
//!
//! let editor = DocumentEditor::with_defaults();
//! let event = EventRecord::new("Winter Series", start, end, "Haifa", "CYC");
//! let doc = NewDocument::new(event)
//!     .classes(vec![ClassRecord::new("O1", "ORC1", YachtClass::Orc)]);
//! let path = editor.create_from_template("winter.orcsc", &doc)?;
//!
//! let race = RaceRecord::new("R1", start, "O1", ScoringCode::WindwardLeeward);
//! let ids = editor.append_races(&path, &path, &[race])?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backup;
mod certificate;
mod clock;
mod config;
mod document;
mod editor;
mod error;
mod reports;

pub use backup::{BackupEntry, BackupLedger, SnapshotMetadata, TIMESTAMP_FORMAT};
pub use certificate::boat_from_certificate;
pub use clock::{Clock, FixedClock, SteppingClock, SystemClock};
pub use config::{default_logos, IdBase, LedgerConfig, StoreConfig, DEFAULT_TEMPLATE};
pub use document::{ScoringDocument, Section};
pub use editor::{DocumentEditor, DocumentSummary, NewDocument};
pub use error::{CoreError, CoreResult, ErrorKind};
pub use reports::{
    BindOutcome, ReportBinder, ENTRY_LIST, EVENT_RESULTS, PER_CLASS_REPORTS, RACE_RESULTS,
    SCRATCH_SHEET,
};
