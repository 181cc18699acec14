//! Generic rows and the schema-driven element codec.

use crate::element::XmlElement;
use crate::error::CodecResult;
use crate::schema::{FieldRole, RecordSchema};
use crate::value::FieldValue;
use chrono::NaiveDateTime;

/// One named field of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Where the field lives in the element.
    pub role: FieldRole,
    /// The value.
    pub value: FieldValue,
}

/// A generic record: an ordered mapping of field name to value.
///
/// Rows decoded from a document hold raw text. Callers coerce explicitly
/// through the typed getters, which is where malformed values surface.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    fields: Vec<Field>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: sets a child-element field.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, FieldRole::Child, value);
        self
    }

    /// Builder: sets an optional child-element field, skipping `None`.
    #[must_use]
    pub fn with_opt<V: Into<FieldValue>>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.set(name, FieldRole::Child, value);
        }
        self
    }

    /// Builder: sets an attribute field.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, FieldRole::Attribute, value.into());
        self
    }

    /// Builder: sets the element-text field.
    #[must_use]
    pub fn with_text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, FieldRole::Text, value.into());
        self
    }

    /// Sets a field, replacing an existing one of the same name in place.
    pub fn set(&mut self, name: impl Into<String>, role: FieldRole, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(field) => {
                field.role = role;
                field.value = value;
            }
            None => self.fields.push(Field { name, role, value }),
        }
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let index = self.fields.iter().position(|f| f.name == name)?;
        Some(self.fields.remove(index).value)
    }

    /// Returns a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.field(name).map(|f| &f.value)
    }

    /// Returns the textual form of a value.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_xml_text().into_owned())
    }

    /// Coerces a field to an integer.
    pub fn integer(&self, name: &str) -> CodecResult<Option<i64>> {
        self.get(name).map(|v| v.to_integer(name)).transpose()
    }

    /// Coerces a field to a float.
    pub fn float(&self, name: &str) -> CodecResult<Option<f64>> {
        self.get(name).map(|v| v.to_float(name)).transpose()
    }

    /// Coerces a field to a boolean.
    pub fn boolean(&self, name: &str) -> CodecResult<Option<bool>> {
        self.get(name).map(|v| v.to_bool(name)).transpose()
    }

    /// Coerces a field to a date-time.
    pub fn datetime(&self, name: &str) -> CodecResult<Option<NaiveDateTime>> {
        self.get(name).map(|v| v.to_datetime(name)).transpose()
    }

    /// Fields in row order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the row has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Copies every field of `patch` onto this row.
    ///
    /// Fields absent from `patch` are left untouched; existing fields keep
    /// their position.
    pub fn overlay(&mut self, patch: &Row) {
        for field in &patch.fields {
            self.set(field.name.clone(), field.role, field.value.clone());
        }
    }

    /// Fills in schema defaults for fields the row does not carry.
    pub fn apply_defaults(&mut self, schema: &RecordSchema) {
        for spec in schema.fields {
            if let Some(default) = spec.default {
                if self.field(spec.name).is_none() {
                    self.set(spec.name, spec.role, default.to_value());
                }
            }
        }
    }

    /// Compares two rows by field name and textual value, ignoring typing.
    #[must_use]
    pub fn same_text(&self, other: &Row) -> bool {
        self.len() == other.len()
            && self.fields.iter().all(|f| {
                other
                    .field(&f.name)
                    .is_some_and(|o| o.role == f.role && o.value.to_xml_text() == f.value.to_xml_text())
            })
    }
}

/// Encodes a row into an element tagged `schema.element`.
///
/// Child fields follow schema order (unknown fields last, in row order).
/// Attribute fields become attributes and the text field becomes the
/// element's text.
#[must_use]
pub fn encode(schema: &RecordSchema, row: &Row) -> XmlElement {
    let mut ordered: Vec<&Field> = row.fields.iter().collect();
    ordered.sort_by_key(|f| schema.position(&f.name).unwrap_or(usize::MAX));

    let mut element = XmlElement::new(schema.element);
    for field in ordered {
        let text = field.value.to_xml_text().into_owned();
        match field.role {
            FieldRole::Child => element.push(XmlElement::new(field.name.clone()).with_text(text)),
            FieldRole::Attribute => element.set_attribute(field.name.clone(), text),
            FieldRole::Text => element.text = Some(text),
        }
    }
    element
}

/// Writes the fields of `patch` into an existing element in place.
///
/// Children and attributes not named by `patch` are left exactly as they
/// are. A child that does not exist yet is inserted before the first
/// existing child the schema orders after it.
pub fn apply_patch(schema: &RecordSchema, element: &mut XmlElement, patch: &Row) {
    for field in &patch.fields {
        let text = field.value.to_xml_text().into_owned();
        match field.role {
            FieldRole::Attribute => element.set_attribute(field.name.clone(), text),
            FieldRole::Text => element.text = Some(text),
            FieldRole::Child => {
                if let Some(child) = element.child_mut(&field.name) {
                    child.text = Some(text);
                    continue;
                }
                let child = XmlElement::new(field.name.clone()).with_text(text);
                let insert_at = schema.position(&field.name).and_then(|pos| {
                    element.children.iter().position(|c| {
                        schema.position(&c.name).is_some_and(|other| other > pos)
                    })
                });
                match insert_at {
                    Some(index) => element.children.insert(index, child),
                    None => element.push(child),
                }
            }
        }
    }
}

/// Decodes an element into a raw row.
///
/// Every child becomes a child field, every attribute an attribute field,
/// and non-empty element text becomes the schema's text field (or `text`
/// when the schema declares none). Values are kept as raw text.
#[must_use]
pub fn decode(schema: &RecordSchema, element: &XmlElement) -> Row {
    let mut row = Row::new();
    for child in &element.children {
        let text = child.text.clone().unwrap_or_default();
        row.set(child.name.clone(), FieldRole::Child, FieldValue::Text(text));
    }
    for (key, value) in &element.attributes {
        row.set(key.clone(), FieldRole::Attribute, FieldValue::Text(value.clone()));
    }
    if let Some(text) = element.text.as_deref().filter(|t| !t.is_empty()) {
        let name = schema.text_field().unwrap_or("text");
        row.set(name, FieldRole::Text, FieldValue::Text(text.to_string()));
    }
    row
}
