//! Report directives of the `reports` section.

use super::{opt_string, required_string, Record};
use crate::error::CodecResult;
use crate::row::Row;
use crate::schema::{FieldKind, FieldSpec, RecordSchema};

/// Schema of a `reports/report` element.
pub const REPORT_SCHEMA: RecordSchema = RecordSchema {
    kind: "report",
    element: "report",
    fields: &[
        FieldSpec::attribute("name"),
        FieldSpec::attribute("id"),
        FieldSpec::attribute("title"),
        FieldSpec::child("Layout", FieldKind::Text),
        FieldSpec::child("Orientation", FieldKind::Text),
        FieldSpec::child("Columns", FieldKind::Text),
        FieldSpec::child("SortBy", FieldKind::Text),
    ],
};

/// A report directive keyed by `(name, id)`.
///
/// `id` is the class id for per-class directives and empty for the
/// event-wide ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportDirective {
    /// Report name, e.g. `TEntryList`.
    pub name: String,
    /// Class key, empty for event-wide reports.
    pub id: String,
    /// Printed title.
    pub title: Option<String>,
    /// Layout family the directive was generated from.
    pub layout: Option<String>,
    /// Page orientation.
    pub orientation: Option<String>,
    /// Comma-separated column list.
    pub columns: Option<String>,
    /// Sort column.
    pub sort_by: Option<String>,
}

impl ReportDirective {
    /// Creates a directive with the given key.
    #[must_use]
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            ..Self::default()
        }
    }

    /// The `(name, id)` key.
    #[must_use]
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.id)
    }
}

impl Record for ReportDirective {
    const SCHEMA: &'static RecordSchema = &REPORT_SCHEMA;

    fn to_row(&self) -> Row {
        let mut row = Row::new()
            .with_attribute("name", self.name.clone())
            .with_attribute("id", self.id.clone());
        if let Some(title) = &self.title {
            row = row.with_attribute("title", title.clone());
        }
        row.with_opt("Layout", self.layout.clone())
            .with_opt("Orientation", self.orientation.clone())
            .with_opt("Columns", self.columns.clone())
            .with_opt("SortBy", self.sort_by.clone())
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        Ok(Self {
            name: required_string(row, REPORT_SCHEMA.kind, "name")?,
            id: row.text("id").unwrap_or_default(),
            title: opt_string(row, "title"),
            layout: opt_string(row, "Layout"),
            orientation: opt_string(row, "Orientation"),
            columns: opt_string(row, "Columns"),
            sort_by: opt_string(row, "SortBy"),
        })
    }
}
