//! Class rows.

use super::{opt_bool, opt_integer, opt_string, required_string, Record};
use crate::error::{CodecError, CodecResult};
use crate::row::Row;
use crate::schema::{FieldDefault, FieldKind, FieldSpec, RecordSchema};
use std::fmt;
use std::str::FromStr;

/// Schema of a `Cls/ROW` element.
pub const CLASS_SCHEMA: RecordSchema = RecordSchema {
    kind: "class",
    element: "ROW",
    fields: &[
        FieldSpec::child("ClassId", FieldKind::Text),
        FieldSpec::child("ClassName", FieldKind::Text),
        FieldSpec::child("Discards", FieldKind::Integer).with_default(FieldDefault::Integer(0)),
        FieldSpec::child("DivFromOverall", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("TimeLimitFormulae", FieldKind::Text),
        FieldSpec::child("ResultScoring", FieldKind::Integer).with_default(FieldDefault::Integer(0)),
        FieldSpec::child("UseBoatIW", FieldKind::Bool).with_default(FieldDefault::Bool(false)),
        FieldSpec::child("EnableA9", FieldKind::Text),
        FieldSpec::child("HeatState", FieldKind::Text),
        FieldSpec::child("DayNo", FieldKind::Text),
    ],
};

/// Scoring family of a class. Selects the report templates bound to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum YachtClass {
    /// Handicap class scored with ORC certificates.
    #[default]
    Orc,
    /// One-design class scored with a custom time-on-time factor.
    OneDesign,
}

impl YachtClass {
    /// The canonical label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orc => "ORC",
            Self::OneDesign => "OneDesign",
        }
    }
}

impl fmt::Display for YachtClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for YachtClass {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "orc" => Ok(Self::Orc),
            "onedesign" | "od" => Ok(Self::OneDesign),
            _ => Err(CodecError::invalid_value("YachtClass", s, "yacht class")),
        }
    }
}

/// A class row.
///
/// `yacht_class` is not part of the ORCSC row; it only drives report
/// binding. It is read back from a `YachtClass` child when a document
/// carries one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClassRecord {
    /// Caller-assigned class key.
    pub class_id: String,
    /// Display name.
    pub class_name: Option<String>,
    /// Number of discarded races.
    pub discards: Option<i64>,
    /// Whether divisions are scored separately from overall.
    pub div_from_overall: Option<bool>,
    /// Time limit formula.
    pub time_limit_formulae: Option<String>,
    /// Result scoring mode.
    pub result_scoring: Option<i64>,
    /// Whether the boat's inshore/windward rating is used.
    pub use_boat_iw: Option<bool>,
    /// A9 scoring flag.
    pub enable_a9: Option<String>,
    /// Heat state.
    pub heat_state: Option<String>,
    /// Day number.
    pub day_no: Option<String>,
    /// Scoring family used by the report binder.
    pub yacht_class: Option<YachtClass>,
}

impl ClassRecord {
    /// Creates a class with id, name and family.
    #[must_use]
    pub fn new(
        class_id: impl Into<String>,
        class_name: impl Into<String>,
        yacht_class: YachtClass,
    ) -> Self {
        Self {
            class_id: class_id.into(),
            class_name: Some(class_name.into()),
            yacht_class: Some(yacht_class),
            ..Self::default()
        }
    }

    /// The family, defaulting to ORC when unknown.
    #[must_use]
    pub fn family(&self) -> YachtClass {
        self.yacht_class.unwrap_or_default()
    }
}

impl Record for ClassRecord {
    const SCHEMA: &'static RecordSchema = &CLASS_SCHEMA;

    fn to_row(&self) -> Row {
        Row::new()
            .with("ClassId", self.class_id.clone())
            .with_opt("ClassName", self.class_name.clone())
            .with_opt("Discards", self.discards)
            .with_opt("DivFromOverall", self.div_from_overall)
            .with_opt("TimeLimitFormulae", self.time_limit_formulae.clone())
            .with_opt("ResultScoring", self.result_scoring)
            .with_opt("UseBoatIW", self.use_boat_iw)
            .with_opt("EnableA9", self.enable_a9.clone())
            .with_opt("HeatState", self.heat_state.clone())
            .with_opt("DayNo", self.day_no.clone())
    }

    fn from_row(row: &Row) -> CodecResult<Self> {
        let yacht_class = opt_string(row, "YachtClass")
            .map(|s| s.parse::<YachtClass>())
            .transpose()?;
        Ok(Self {
            class_id: required_string(row, CLASS_SCHEMA.kind, "ClassId")?,
            class_name: opt_string(row, "ClassName"),
            discards: opt_integer(row, "Discards")?,
            div_from_overall: opt_bool(row, "DivFromOverall")?,
            time_limit_formulae: opt_string(row, "TimeLimitFormulae"),
            result_scoring: opt_integer(row, "ResultScoring")?,
            use_boat_iw: opt_bool(row, "UseBoatIW")?,
            enable_a9: opt_string(row, "EnableA9"),
            heat_state: opt_string(row, "HeatState"),
            day_no: opt_string(row, "DayNo"),
            yacht_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::XmlElement;

    #[test]
    fn family_is_not_written() {
        let el = ClassRecord::new("Z", "Amami", YachtClass::OneDesign).to_element();
        assert!(el.child("YachtClass").is_none());
        assert_eq!(el.child_text("Discards"), Some("0"));
        assert_eq!(el.children.first().map(|c| c.name.as_str()), Some("ClassId"));
    }

    #[test]
    fn family_read_back_when_present() {
        let el = XmlElement::new("ROW")
            .with_child(XmlElement::new("ClassId").with_text("SN"))
            .with_child(XmlElement::new("YachtClass").with_text("One-Design"));
        let class = ClassRecord::from_element(&el).unwrap();
        assert_eq!(class.family(), YachtClass::OneDesign);
    }

    #[test]
    fn missing_class_id_is_an_error() {
        let el = XmlElement::new("ROW").with_child(XmlElement::new("ClassName").with_text("X"));
        assert!(matches!(
            ClassRecord::from_element(&el),
            Err(CodecError::MissingField { field: "ClassId", .. })
        ));
    }

    #[test]
    fn yacht_class_parsing() {
        assert_eq!("ORC".parse::<YachtClass>().unwrap(), YachtClass::Orc);
        assert_eq!("OneDesign".parse::<YachtClass>().unwrap(), YachtClass::OneDesign);
        assert!("Laser".parse::<YachtClass>().is_err());
    }
}
