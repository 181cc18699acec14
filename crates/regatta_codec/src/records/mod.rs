//! Typed record kinds of the scoring document.
//!
//! Each kind pairs a static [`RecordSchema`] with a plain struct. Struct
//! fields are `Option`s; `None` fields are omitted from the encoded row and
//! only filled from schema defaults when a record is appended as new.

mod class;
mod event;
mod fleet;
mod logo;
mod race;
mod report;

pub use class::{ClassRecord, YachtClass, CLASS_SCHEMA};
pub use event::{EventRecord, EVENT_SCHEMA};
pub use fleet::{BoatRecord, FLEET_SCHEMA, HANDICAP_FIELDS};
pub use logo::{LogoRecord, LOGO_SCHEMA};
pub use race::{RaceRecord, ScoringCode, RACE_SCHEMA, SCORING_CODES};
pub use report::{ReportDirective, REPORT_SCHEMA};

use crate::element::XmlElement;
use crate::error::{CodecError, CodecResult};
use crate::row::{decode, encode, Row};
use crate::schema::RecordSchema;

/// A record kind with a static schema.
///
/// Implementors convert between the typed struct and a generic [`Row`];
/// the element form is derived from the row through the schema.
pub trait Record: Sized {
    /// The schema describing this kind.
    const SCHEMA: &'static RecordSchema;

    /// Converts to a row carrying only the fields that are set.
    fn to_row(&self) -> Row;

    /// Builds the typed record from a (possibly raw) row.
    ///
    /// # Errors
    ///
    /// Returns a codec error if a present field cannot be coerced.
    fn from_row(row: &Row) -> CodecResult<Self>;

    /// Encodes as a new element, filling schema defaults.
    fn to_element(&self) -> XmlElement {
        let mut row = self.to_row();
        row.apply_defaults(Self::SCHEMA);
        encode(Self::SCHEMA, &row)
    }

    /// Decodes from an element.
    fn from_element(element: &XmlElement) -> CodecResult<Self> {
        Self::from_row(&decode(Self::SCHEMA, element))
    }
}

pub(crate) fn opt_string(row: &Row, name: &str) -> Option<String> {
    row.text(name).filter(|s| !s.is_empty())
}

pub(crate) fn required_string(
    row: &Row,
    record: &'static str,
    name: &'static str,
) -> CodecResult<String> {
    opt_string(row, name).ok_or_else(|| CodecError::missing_field(record, name))
}

// Empty elements read back as empty text; typed getters treat them as unset.
fn is_blank(row: &Row, name: &str) -> bool {
    row.get(name)
        .and_then(|v| v.as_text())
        .is_some_and(|s| s.trim().is_empty())
}

pub(crate) fn opt_integer(row: &Row, name: &str) -> CodecResult<Option<i64>> {
    if is_blank(row, name) {
        return Ok(None);
    }
    row.integer(name)
}

pub(crate) fn opt_float(row: &Row, name: &str) -> CodecResult<Option<f64>> {
    if is_blank(row, name) {
        return Ok(None);
    }
    row.float(name)
}

pub(crate) fn opt_bool(row: &Row, name: &str) -> CodecResult<Option<bool>> {
    if is_blank(row, name) {
        return Ok(None);
    }
    row.boolean(name)
}

pub(crate) fn opt_datetime(row: &Row, name: &str) -> CodecResult<Option<chrono::NaiveDateTime>> {
    if is_blank(row, name) {
        return Ok(None);
    }
    row.datetime(name)
}
