//! Logo entries of the `reports` section.

use super::{opt_string, required_string, Record};
use crate::error::CodecResult;
use crate::row::Row;
use crate::schema::{FieldSpec, RecordSchema};

/// Schema of a `reports/logo` element.
pub const LOGO_SCHEMA: RecordSchema = RecordSchema {
    kind: "logo",
    element: "logo",
    fields: &[
        FieldSpec::attribute("name"),
        FieldSpec::attribute("filename"),
        FieldSpec::attribute("mediatype"),
        FieldSpec::text("data"),
    ],
};

/// A logo printed on reports, with its image payload inline.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LogoRecord {
    /// Slot: `center`, `right` or `left`.
    pub name: String,
    /// Image file name.
    pub filename: String,
    /// Media type prefix, e.g. `image/`.
    pub mediatype: String,
    /// Encoded image data.
    pub data: Option<String>,
}

impl LogoRecord {
    /// Creates a logo without payload.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        mediatype: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            mediatype: mediatype.into(),
            data: None,
        }
    }

    /// Builder: sets the payload.
    #[must_use]
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }
}

impl Record for LogoRecord {
    const SCHEMA: &'static RecordSchema = &LOGO_SCHEMA;

    fn to_row(&self) -> Row {
        let row = Row::new()
            .with_attribute("name", self.name.clone())
            .with_attribute("filename", self.filename.clone())
            .with_attribute("mediatype", self.mediatype.clone());
        match &self.data {
            Some(data) => row.with_text("data", data.clone()),
            None => row,
        }
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        Ok(Self {
            name: required_string(row, LOGO_SCHEMA.kind, "name")?,
            filename: row.text("filename").unwrap_or_default(),
            mediatype: row.text("mediatype").unwrap_or_default(),
            data: opt_string(row, "data"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logo_is_attributes_plus_text() {
        let logo = LogoRecord::new("center", "cyc.png", "image/").with_data("iVBORw0KGgo=");
        let el = logo.to_element();

        assert_eq!(el.name, "logo");
        assert_eq!(el.attribute("filename"), Some("cyc.png"));
        assert_eq!(el.text.as_deref(), Some("iVBORw0KGgo="));
        assert!(el.children.is_empty());
        assert_eq!(LogoRecord::from_element(&el).unwrap(), logo);
    }

    #[test]
    fn empty_slot_keeps_empty_filename() {
        let el = LogoRecord::new("right", "", "image/").to_element();
        assert_eq!(el.attribute("filename"), Some(""));
        assert!(el.text.is_none());

        let back = LogoRecord::from_element(&el).unwrap();
        assert_eq!(back.filename, "");
        assert_eq!(back.data, None);
    }
}
