//! In-memory XML element tree.
//!
//! The tree keeps what the scoring format needs: element names, ordered
//! attributes, leading text, trailing text between siblings, and children.
//! Comments and processing instructions are not retained.

/// The `<?xml ...?>` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// XML version, normally `1.0`.
    pub version: String,
    /// Declared encoding, if any.
    pub encoding: Option<String>,
    /// Declared standalone flag, if any.
    pub standalone: Option<String>,
}

impl Default for Declaration {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: Some("utf-8".to_string()),
            standalone: None,
        }
    }
}

/// A parsed document: optional declaration plus the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    /// Declaration found at the top of the input.
    pub declaration: Option<Declaration>,
    /// The root element.
    pub root: XmlElement,
}

impl XmlDocument {
    /// Wraps a root element without a declaration.
    #[must_use]
    pub fn new(root: XmlElement) -> Self {
        Self {
            declaration: None,
            root,
        }
    }
}

/// One XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Text before the first child.
    pub text: Option<String>,
    /// Text after this element's end tag, before the next sibling.
    pub tail: Option<String>,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Builder: sets the text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Builder: appends a child.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Returns an attribute value.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns the first child with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    /// Iterates over children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the text of the first child with the given name.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }

    /// Appends a child.
    ///
    /// Whitespace-only text of a formerly childless element is dropped.
    pub fn push(&mut self, child: XmlElement) {
        if self.text.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.text = None;
        }
        self.children.push(child);
    }

    /// Removes every child matching the predicate, returning how many were removed.
    pub fn remove_children<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(&XmlElement) -> bool,
    {
        let before = self.children.len();
        self.children.retain(|c| !predicate(c));
        before - self.children.len()
    }

    /// Returns true if the element has neither children nor text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.text.as_deref().map_or(true, str::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_attribute_replaces_in_place() {
        let mut el = XmlElement::new("report")
            .with_attribute("name", "TEntryList")
            .with_attribute("id", "O1");
        el.set_attribute("name", "TRaceResults");

        assert_eq!(el.attributes.len(), 2);
        assert_eq!(el.attributes[0], ("name".to_string(), "TRaceResults".to_string()));
    }

    #[test]
    fn push_clears_blank_text() {
        let mut el = XmlElement::new("Fleet").with_text("\n  ");
        el.push(XmlElement::new("ROW"));
        assert_eq!(el.text, None);

        let mut leaf = XmlElement::new("Note").with_text("keep");
        leaf.push(XmlElement::new("b"));
        assert_eq!(leaf.text.as_deref(), Some("keep"));
    }

    #[test]
    fn remove_children_counts_removed() {
        let mut section = XmlElement::new("Race")
            .with_child(XmlElement::new("ROW"))
            .with_child(XmlElement::new("ROW"))
            .with_child(XmlElement::new("other"));

        assert_eq!(section.remove_children(|c| c.name == "ROW"), 2);
        assert_eq!(section.children.len(), 1);
    }

    #[test]
    fn child_text_reads_first_match() {
        let row = XmlElement::new("ROW")
            .with_child(XmlElement::new("ClassId").with_text("O1"))
            .with_child(XmlElement::new("ClassId").with_text("O2"));

        assert_eq!(row.child_text("ClassId"), Some("O1"));
        assert_eq!(row.children_named("ClassId").count(), 2);
    }
}
