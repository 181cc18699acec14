//! Indenting XML writer.
//!
//! Output is fully determined by the tree: one element per line, one tab
//! per nesting level, leaf text inline, childless and textless elements
//! self-closed. Two trees that compare equal serialize to identical bytes.

use crate::element::{XmlDocument, XmlElement};
use crate::error::{CodecError, CodecResult};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

/// Serializes a document with tab indentation.
///
/// # Errors
///
/// Returns [`CodecError::WriteFailed`] if the writer rejects an event.
pub fn write_document(doc: &XmlDocument) -> CodecResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);

    if let Some(decl) = &doc.declaration {
        let event = BytesDecl::new(
            &decl.version,
            decl.encoding.as_deref(),
            decl.standalone.as_deref(),
        );
        emit(&mut writer, Event::Decl(event))?;
    }
    write_element(&mut writer, &doc.root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)
}

/// Serializes a single element (and its subtree) with tab indentation.
pub fn write_element_string(element: &XmlElement) -> CodecResult<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b'\t', 1);
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(|_| CodecError::InvalidUtf8)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &XmlElement) -> CodecResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.is_empty() {
        emit(writer, Event::Empty(start))?;
    } else {
        emit(writer, Event::Start(start))?;
        // Blank text ahead of children is stale indentation.
        let has_children = !element.children.is_empty();
        if let Some(text) = element
            .text
            .as_deref()
            .filter(|t| !t.is_empty() && !(has_children && t.trim().is_empty()))
        {
            emit(writer, Event::Text(BytesText::new(text)))?;
        }
        for child in &element.children {
            write_element(writer, child)?;
        }
        emit(writer, Event::End(BytesEnd::new(element.name.as_str())))?;
    }

    if let Some(tail) = element.tail.as_deref().filter(|t| !t.trim().is_empty()) {
        emit(writer, Event::Text(BytesText::new(tail)))?;
    }
    Ok(())
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> CodecResult<()> {
    writer
        .write_event(event)
        .map_err(|e| CodecError::write_failed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Declaration;
    use crate::reader::parse_document;

    #[test]
    fn indents_with_tabs_and_keeps_leaf_text_inline() {
        let root = XmlElement::new("ROOT").with_child(
            XmlElement::new("Race").with_child(
                XmlElement::new("ROW")
                    .with_child(XmlElement::new("RaceId").with_text("1"))
                    .with_child(XmlElement::new("RaceName").with_text("R1")),
            ),
        );
        let out = write_document(&XmlDocument::new(root)).unwrap();

        assert_eq!(
            out,
            "<ROOT>\n\t<Race>\n\t\t<ROW>\n\t\t\t<RaceId>1</RaceId>\n\t\t\t<RaceName>R1</RaceName>\n\t\t</ROW>\n\t</Race>\n</ROOT>\n"
        );
    }

    #[test]
    fn empty_elements_self_close() {
        let root = XmlElement::new("ROOT").with_child(XmlElement::new("Fleet"));
        let out = write_document(&XmlDocument::new(root)).unwrap();
        assert_eq!(out, "<ROOT>\n\t<Fleet/>\n</ROOT>\n");
    }

    #[test]
    fn reindenting_is_idempotent() {
        let messy = "<ROOT><Cls>\n  <ROW><ClassId>O1</ClassId></ROW></Cls>\n<Race/></ROOT>";
        let once = write_document(&parse_document(messy).unwrap()).unwrap();
        let twice = write_document(&parse_document(&once).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn blank_text_before_new_children_is_dropped() {
        let mut doc = parse_document("<ROOT>\n  <Race>\n  </Race>\n</ROOT>").unwrap();
        let race = doc.root.child_mut("Race").unwrap();
        race.children
            .push(XmlElement::new("ROW").with_child(XmlElement::new("RaceId").with_text("1")));

        let out = write_document(&doc).unwrap();
        assert_eq!(
            out,
            "<ROOT>\n\t<Race>\n\t\t<ROW>\n\t\t\t<RaceId>1</RaceId>\n\t\t</ROW>\n\t</Race>\n</ROOT>\n"
        );
        assert_eq!(write_document(&parse_document(&out).unwrap()).unwrap(), out);
    }

    #[test]
    fn escapes_attribute_and_text() {
        let root = XmlElement::new("logo")
            .with_attribute("name", "a\"b")
            .with_text("x<y");
        let doc = XmlDocument {
            declaration: Some(Declaration::default()),
            root,
        };
        let out = write_document(&doc).unwrap();
        let back = parse_document(&out).unwrap();

        assert_eq!(back.root.attribute("name"), Some("a\"b"));
        assert_eq!(back.root.text.as_deref(), Some("x<y"));
        assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<logo"));
    }
}
