//! # Regatta Codec
//!
//! Record schemas and the XML codec for ORCSC regatta scoring documents.
//!
//! This crate provides:
//! - An owned XML element tree with a reader and a tab-indenting writer
//! - Static schema descriptors for each record kind
//! - A generic [`Row`] and the schema-driven `encode`/`decode` pair
//! - Typed records for events, classes, races, boats, logos and report
//!   directives
//!
//! ## Encoding Rules
//!
//! - Child fields become child elements, in schema order
//! - Attribute fields become attributes of the row element
//! - The text field becomes the row element's inline text
//! - Booleans are written as `true`/`false`
//! - Date-times use a fixed format with microseconds and a trailing `Z`
//! - Absent fields are omitted
//!
//! Decoding keeps every value as raw text. Typed getters coerce on demand,
//! which is where malformed values surface.
//!
//! ## Usage
//!
//! ```
//! use regatta_codec::{parse_document, write_element_string, ClassRecord, Record, YachtClass};
//!
//! let class = ClassRecord::new("O1", "ORC1", YachtClass::Orc);
//! let xml = write_element_string(&class.to_element()).unwrap();
//! assert!(xml.contains("<ClassId>O1</ClassId>"));
//!
//! let doc = parse_document(&xml).unwrap();
//! let back = ClassRecord::from_element(&doc.root).unwrap();
//! assert_eq!(back.class_id, "O1");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod element;
mod error;
mod reader;
mod records;
mod row;
mod schema;
mod value;
mod writer;

pub use element::{Declaration, XmlDocument, XmlElement};
pub use error::{CodecError, CodecResult};
pub use reader::parse_document;
pub use records::{
    BoatRecord, ClassRecord, EventRecord, LogoRecord, RaceRecord, Record, ReportDirective,
    ScoringCode, YachtClass, CLASS_SCHEMA, EVENT_SCHEMA, FLEET_SCHEMA, HANDICAP_FIELDS,
    LOGO_SCHEMA, RACE_SCHEMA, REPORT_SCHEMA, SCORING_CODES,
};
pub use row::{apply_patch, decode, encode, Field, Row};
pub use schema::{FieldDefault, FieldKind, FieldRole, FieldSpec, RecordSchema};
pub use value::{
    parse_bool, parse_datetime, parse_float, parse_integer, FieldValue, DATETIME_FORMAT,
};
pub use writer::{write_document, write_element_string};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn leaf_text() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 &<>'.]{0,16}[A-Za-z0-9]"
    }

    fn field_name() -> impl Strategy<Value = String> {
        "[A-Z][A-Za-z0-9_]{0,10}"
    }

    proptest! {
        #[test]
        fn row_survives_write_and_parse(
            fields in proptest::collection::btree_map(field_name(), leaf_text(), 1..12)
        ) {
            let mut row = Row::new();
            for (name, value) in &fields {
                row = row.with(name.clone(), value.clone());
            }

            let xml = write_element_string(&encode(&RACE_SCHEMA, &row)).unwrap();
            let doc = parse_document(&xml).unwrap();
            let back = decode(&RACE_SCHEMA, &doc.root);

            prop_assert!(back.same_text(&row));
        }

        #[test]
        fn rewriting_a_parsed_document_is_stable(
            names in proptest::collection::vec(leaf_text(), 0..5)
        ) {
            let mut fleet = XmlElement::new("Fleet");
            for (i, name) in names.iter().enumerate() {
                let mut boat = BoatRecord::new(name.clone(), format!("ISR {i}"), "O1");
                boat.yid = Some(i as i64 + 1);
                fleet.push(boat.to_element());
            }
            let root = XmlElement::new("ROOT").with_child(fleet);

            let first = write_document(&XmlDocument::new(root)).unwrap();
            let second = write_document(&parse_document(&first).unwrap()).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn logo_payload_round_trips_through_text() {
        let logo = LogoRecord::new("center", "cyc.png", "image/").with_data("AAAA/+==");
        let xml = write_element_string(&logo.to_element()).unwrap();
        let doc = parse_document(&xml).unwrap();
        assert_eq!(LogoRecord::from_element(&doc.root).unwrap(), logo);
    }
}
