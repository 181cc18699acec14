//! Static record schemas.
//!
//! Each record kind is described by an ordered list of [`FieldSpec`]s that
//! fixes field order, XML role, semantic type and default. The codec in
//! [`crate::row`] is driven entirely by these tables.

use crate::value::FieldValue;

/// Where a field lives in the row element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldRole {
    /// A child element whose text is the value.
    Child,
    /// An attribute on the row element.
    Attribute,
    /// The row element's own text.
    Text,
}

/// Semantic type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Signed integer.
    Integer,
    /// Decimal number.
    Float,
    /// Boolean.
    Bool,
    /// Date-time.
    DateTime,
    /// Text restricted to a known set of codes.
    Enum(&'static [&'static str]),
}

impl FieldKind {
    /// Human-readable type name, used in coercion errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Float => "number",
            Self::Bool => "boolean",
            Self::DateTime => "date-time",
            Self::Enum(_) => "code",
        }
    }
}

/// A constant default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    /// Text default.
    Text(&'static str),
    /// Integer default.
    Integer(i64),
    /// Boolean default.
    Bool(bool),
}

impl FieldDefault {
    /// Converts to a field value.
    #[must_use]
    pub fn to_value(self) -> FieldValue {
        match self {
            Self::Text(s) => FieldValue::Text(s.to_string()),
            Self::Integer(i) => FieldValue::Integer(i),
            Self::Bool(b) => FieldValue::Bool(b),
        }
    }
}

/// Descriptor for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// Field name; also the child element or attribute name.
    pub name: &'static str,
    /// XML role.
    pub role: FieldRole,
    /// Semantic type.
    pub kind: FieldKind,
    /// Default applied when a new record omits the field.
    pub default: Option<FieldDefault>,
}

impl FieldSpec {
    /// A child-element field without default.
    #[must_use]
    pub const fn child(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            role: FieldRole::Child,
            kind,
            default: None,
        }
    }

    /// An attribute field without default.
    #[must_use]
    pub const fn attribute(name: &'static str) -> Self {
        Self {
            name,
            role: FieldRole::Attribute,
            kind: FieldKind::Text,
            default: None,
        }
    }

    /// The element-text field.
    #[must_use]
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            role: FieldRole::Text,
            kind: FieldKind::Text,
            default: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub const fn with_default(mut self, default: FieldDefault) -> Self {
        self.default = Some(default);
        self
    }
}

/// Describes one record kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordSchema {
    /// Record kind name, used in errors and logs.
    pub kind: &'static str,
    /// Tag of the row element (`ROW`, `logo`, `report`).
    pub element: &'static str,
    /// Fields in canonical order.
    pub fields: &'static [FieldSpec],
}

impl RecordSchema {
    /// Looks up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Role of a field, defaulting to [`FieldRole::Child`] for unknown names.
    #[must_use]
    pub fn role_of(&self, name: &str) -> FieldRole {
        self.field(name).map_or(FieldRole::Child, |f| f.role)
    }

    /// Canonical position of a field, `None` for unknown names.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Name of the element-text field, if the schema has one.
    #[must_use]
    pub fn text_field(&self) -> Option<&'static str> {
        self.fields
            .iter()
            .find(|f| f.role == FieldRole::Text)
            .map(|f| f.name)
    }
}
