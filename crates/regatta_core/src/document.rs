//! Loading, navigating and saving a scoring document.
//!
//! A [`ScoringDocument`] lives only for the duration of one operation: it
//! is read from disk, transformed, and written back in full.

use crate::error::{CoreError, CoreResult};
use regatta_codec::{
    decode, parse_document, write_document, RecordSchema, Row, XmlDocument, XmlElement,
    CLASS_SCHEMA, EVENT_SCHEMA, FLEET_SCHEMA, RACE_SCHEMA, REPORT_SCHEMA,
};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// A top-level section of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// The event singleton.
    Event,
    /// Classes.
    Cls,
    /// Races.
    Race,
    /// Boats.
    Fleet,
    /// Report directives and logos.
    Reports,
}

impl Section {
    /// All sections in document order.
    pub const ALL: [Section; 5] = [
        Self::Event,
        Self::Cls,
        Self::Race,
        Self::Fleet,
        Self::Reports,
    ];

    /// Element name of the section.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::Event => "Event",
            Self::Cls => "Cls",
            Self::Race => "Race",
            Self::Fleet => "Fleet",
            Self::Reports => "reports",
        }
    }

    /// Schema of the rows held by the section.
    #[must_use]
    pub const fn schema(self) -> &'static RecordSchema {
        match self {
            Self::Event => &EVENT_SCHEMA,
            Self::Cls => &CLASS_SCHEMA,
            Self::Race => &RACE_SCHEMA,
            Self::Fleet => &FLEET_SCHEMA,
            Self::Reports => &REPORT_SCHEMA,
        }
    }

    /// Element name of the rows held by the section.
    #[must_use]
    pub const fn row_element(self) -> &'static str {
        self.schema().element
    }

    /// The store-assigned or caller-assigned key field, if any.
    #[must_use]
    pub const fn key_field(self) -> Option<&'static str> {
        match self {
            Self::Cls => Some("ClassId"),
            Self::Race => Some("RaceId"),
            Self::Fleet => Some("YID"),
            Self::Event | Self::Reports => None,
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// An in-memory scoring document.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringDocument {
    inner: XmlDocument,
}

impl ScoringDocument {
    /// Reads and parses a document file.
    ///
    /// # Errors
    ///
    /// Returns `DocumentNotFound` if the file does not exist and a codec
    /// error if it is not well-formed XML.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(CoreError::DocumentNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => return Err(e.into()),
        };
        let doc = Self::parse(&text)?;
        debug!(path = %path.display(), bytes = text.len(), "parsed document");
        Ok(doc)
    }

    /// Parses a document from text.
    pub fn parse(text: &str) -> CoreResult<Self> {
        Ok(Self {
            inner: parse_document(text)?,
        })
    }

    /// Serializes the whole document with tab indentation.
    pub fn to_xml_string(&self) -> CoreResult<String> {
        Ok(write_document(&self.inner)?)
    }

    /// Re-indents and writes the whole document.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        let text = self.to_xml_string()?;
        fs::write(path, &text)?;
        debug!(path = %path.display(), bytes = text.len(), "wrote document");
        Ok(())
    }

    /// The root element.
    #[must_use]
    pub fn root(&self) -> &XmlElement {
        &self.inner.root
    }

    /// Returns a section element.
    ///
    /// # Errors
    ///
    /// Returns `SectionNotFound` if the root has no such child.
    pub fn section(&self, section: Section) -> CoreResult<&XmlElement> {
        self.inner
            .root
            .child(section.element_name())
            .ok_or_else(|| CoreError::section_not_found(section.element_name()))
    }

    /// Returns a section element for mutation.
    pub fn section_mut(&mut self, section: Section) -> CoreResult<&mut XmlElement> {
        self.inner
            .root
            .child_mut(section.element_name())
            .ok_or_else(|| CoreError::section_not_found(section.element_name()))
    }

    /// Row elements of a section.
    pub fn row_elements(&self, section: Section) -> CoreResult<Vec<&XmlElement>> {
        let row_name = section.row_element();
        Ok(self
            .section(section)?
            .children
            .iter()
            .filter(|c| c.name == row_name)
            .collect())
    }

    /// Rows of a section, decoded as raw text.
    pub fn rows(&self, section: Section) -> CoreResult<Vec<Row>> {
        let schema = section.schema();
        Ok(self
            .row_elements(section)?
            .into_iter()
            .map(|el| decode(schema, el))
            .collect())
    }

    /// Largest integer value of `key_field` among a section's rows.
    ///
    /// Rows without the field are skipped.
    ///
    /// # Errors
    ///
    /// Returns a codec error if a present key is not an integer.
    pub fn max_key(&self, section: Section, key_field: &str) -> CoreResult<Option<i64>> {
        let mut max = None;
        for row in self.row_elements(section)? {
            let Some(raw) = row.child_text(key_field) else {
                continue;
            };
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let id = regatta_codec::parse_integer(key_field, raw)?;
            max = Some(max.map_or(id, |m: i64| m.max(id)));
        }
        Ok(max)
    }

    /// Appends an element to a section.
    pub fn push(&mut self, section: Section, element: XmlElement) -> CoreResult<()> {
        self.section_mut(section)?.push(element);
        Ok(())
    }

    /// Removes the first row whose `key_field` text equals `key_value`.
    ///
    /// # Errors
    ///
    /// Returns `RowNotFound` if no row matches.
    pub fn remove_by_key(
        &mut self,
        section: Section,
        key_field: &str,
        key_value: &str,
    ) -> CoreResult<XmlElement> {
        let row_name = section.row_element();
        let parent = self.section_mut(section)?;
        let index = parent
            .children
            .iter()
            .position(|c| c.name == row_name && c.child_text(key_field) == Some(key_value))
            .ok_or_else(|| CoreError::row_not_found(section.element_name(), key_field, key_value))?;
        Ok(parent.children.remove(index))
    }

    /// Returns the first row whose `key_field` text equals `key_value`.
    pub fn find_by_key_mut(
        &mut self,
        section: Section,
        key_field: &str,
        key_value: &str,
    ) -> CoreResult<&mut XmlElement> {
        let row_name = section.row_element();
        self.section_mut(section)?
            .children
            .iter_mut()
            .find(|c| c.name == row_name && c.child_text(key_field) == Some(key_value))
            .ok_or_else(|| CoreError::row_not_found(section.element_name(), key_field, key_value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "<ROOT>\n\t<Event/>\n\t<Cls/>\n\t<Race>\n\t\t<ROW>\n\t\t\t<RaceId>3</RaceId>\n\t\t</ROW>\n\t\t<ROW>\n\t\t\t<RaceId>7</RaceId>\n\t\t</ROW>\n\t</Race>\n\t<Fleet/>\n\t<reports/>\n</ROOT>\n";

    #[test]
    fn max_key_over_rows() {
        let doc = ScoringDocument::parse(SAMPLE).unwrap();
        assert_eq!(doc.max_key(Section::Race, "RaceId").unwrap(), Some(7));
        assert_eq!(doc.max_key(Section::Fleet, "YID").unwrap(), None);
    }

    #[test]
    fn non_integer_key_is_malformed() {
        let doc = ScoringDocument::parse(
            "<ROOT><Race><ROW><RaceId>x</RaceId></ROW></Race></ROOT>",
        )
        .unwrap();
        let err = doc.max_key(Section::Race, "RaceId").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Malformed);
    }

    #[test]
    fn missing_section_is_not_found() {
        let doc = ScoringDocument::parse("<ROOT><Event/></ROOT>").unwrap();
        assert!(matches!(
            doc.section(Section::Fleet),
            Err(CoreError::SectionNotFound { .. })
        ));
    }

    #[test]
    fn remove_by_key_takes_first_match() {
        let mut doc = ScoringDocument::parse(SAMPLE).unwrap();
        doc.remove_by_key(Section::Race, "RaceId", "3").unwrap();
        assert_eq!(doc.rows(Section::Race).unwrap().len(), 1);
        assert!(doc.remove_by_key(Section::Race, "RaceId", "3").is_err());
    }

    #[test]
    fn save_then_load_is_byte_stable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("event.orcsc");

        ScoringDocument::parse(SAMPLE).unwrap().save(&path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, SAMPLE);

        ScoringDocument::load(&path).unwrap().save(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), SAMPLE);
    }

    #[test]
    fn load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ScoringDocument::load(&dir.path().join("nope.orcsc")).unwrap_err();
        assert!(matches!(err, CoreError::DocumentNotFound { .. }));
    }
}
