//! The event singleton row.

use super::{opt_bool, opt_datetime, opt_integer, opt_string, Record};
use crate::error::CodecResult;
use crate::row::Row;
use crate::schema::{FieldDefault, FieldKind, FieldSpec, RecordSchema};
use chrono::NaiveDateTime;

/// Schema of an `Event/ROW` element.
pub const EVENT_SCHEMA: RecordSchema = RecordSchema {
    kind: "event",
    element: "ROW",
    fields: &[
        FieldSpec::child("EventName", FieldKind::Text),
        FieldSpec::child("EventFolder", FieldKind::Text),
        FieldSpec::child("EventId", FieldKind::Text),
        FieldSpec::child("Status", FieldKind::Integer),
        FieldSpec::child("StartDate", FieldKind::DateTime),
        FieldSpec::child("EndDate", FieldKind::DateTime),
        FieldSpec::child("DoubleScoring", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("AlternativeRMS", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("TZAbbr", FieldKind::Text).with_default(FieldDefault::Text("GMT+03")),
        FieldSpec::child("UTCOffset", FieldKind::Integer).with_default(FieldDefault::Integer(10800)),
        FieldSpec::child("EventTitle", FieldKind::Text),
        FieldSpec::child("EventCode", FieldKind::Text),
        FieldSpec::child("DSFormula", FieldKind::Text)
            .with_default(FieldDefault::Text("CorrDelay1+CorrDelay2")),
        FieldSpec::child("Venue", FieldKind::Text),
        FieldSpec::child("Organizer", FieldKind::Text),
    ],
};

/// Event details. Exactly one logical row per document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EventRecord {
    /// Internal event name.
    pub event_name: Option<String>,
    /// Folder name used by the scoring program.
    pub event_folder: Option<String>,
    /// Event identifier.
    pub event_id: Option<String>,
    /// Event status code.
    pub status: Option<i64>,
    /// First day of the event.
    pub start_date: Option<NaiveDateTime>,
    /// Last day of the event.
    pub end_date: Option<NaiveDateTime>,
    /// Whether races are scored twice.
    pub double_scoring: Option<bool>,
    /// Whether the alternative rating set is used.
    pub alternative_rms: Option<bool>,
    /// Timezone abbreviation, e.g. `GMT+03`.
    pub tz_abbr: Option<String>,
    /// Offset from UTC in seconds.
    pub utc_offset: Option<i64>,
    /// Title printed on reports.
    pub event_title: Option<String>,
    /// Short event code.
    pub event_code: Option<String>,
    /// Double-scoring formula.
    pub ds_formula: Option<String>,
    /// Venue name.
    pub venue: Option<String>,
    /// Organizing authority.
    pub organizer: Option<String>,
}

impl EventRecord {
    /// Creates an event with the fields a new document is seeded with.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        venue: impl Into<String>,
        organizer: impl Into<String>,
    ) -> Self {
        Self {
            event_title: Some(title.into()),
            start_date: Some(start_date),
            end_date: Some(end_date),
            venue: Some(venue.into()),
            organizer: Some(organizer.into()),
            ..Self::default()
        }
    }
}

impl Record for EventRecord {
    const SCHEMA: &'static RecordSchema = &EVENT_SCHEMA;

    fn to_row(&self) -> Row {
        Row::new()
            .with_opt("EventName", self.event_name.clone())
            .with_opt("EventFolder", self.event_folder.clone())
            .with_opt("EventId", self.event_id.clone())
            .with_opt("Status", self.status)
            .with_opt("StartDate", self.start_date)
            .with_opt("EndDate", self.end_date)
            .with_opt("DoubleScoring", self.double_scoring)
            .with_opt("AlternativeRMS", self.alternative_rms)
            .with_opt("TZAbbr", self.tz_abbr.clone())
            .with_opt("UTCOffset", self.utc_offset)
            .with_opt("EventTitle", self.event_title.clone())
            .with_opt("EventCode", self.event_code.clone())
            .with_opt("DSFormula", self.ds_formula.clone())
            .with_opt("Venue", self.venue.clone())
            .with_opt("Organizer", self.organizer.clone())
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        Ok(Self {
            event_name: opt_string(row, "EventName"),
            event_folder: opt_string(row, "EventFolder"),
            event_id: opt_string(row, "EventId"),
            status: opt_integer(row, "Status")?,
            start_date: opt_datetime(row, "StartDate")?,
            end_date: opt_datetime(row, "EndDate")?,
            double_scoring: opt_bool(row, "DoubleScoring")?,
            alternative_rms: opt_bool(row, "AlternativeRMS")?,
            tz_abbr: opt_string(row, "TZAbbr"),
            utc_offset: opt_integer(row, "UTCOffset")?,
            event_title: opt_string(row, "EventTitle"),
            event_code: opt_string(row, "EventCode"),
            ds_formula: opt_string(row, "DSFormula"),
            venue: opt_string(row, "Venue"),
            organizer: opt_string(row, "Organizer"),
        })
    }
}
