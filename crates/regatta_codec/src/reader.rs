//! XML document reader.

use crate::element::{Declaration, XmlDocument, XmlElement};
use crate::error::{CodecError, CodecResult};
use quick_xml::events::{BytesDecl, BytesStart, Event};
use quick_xml::Reader;

/// Parses a complete document.
///
/// Whitespace-only text inside elements that have children is treated as
/// indentation and dropped. Leaf text is kept verbatim.
///
/// # Errors
///
/// Returns [`CodecError::Xml`] if the input is not well-formed or has no
/// root element.
pub fn parse_document(input: &str) -> CodecResult<XmlDocument> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;
    let mut declaration = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| CodecError::xml(position, e.to_string()))?;

        match event {
            Event::Decl(decl) => declaration = Some(read_declaration(&decl, position)?),
            Event::Start(start) => stack.push(open_element(&start, position)?),
            Event::Empty(start) => {
                let element = open_element(&start, position)?;
                attach(&mut stack, &mut root, element, position)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| CodecError::xml(position, "unexpected end tag"))?;
                attach(&mut stack, &mut root, close_element(element), position)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| CodecError::xml(position, e.to_string()))?;
                push_text(&mut stack, &text, position)?;
            }
            Event::CData(data) => {
                let raw = data.into_inner();
                let text = std::str::from_utf8(&raw).map_err(|_| CodecError::InvalidUtf8)?;
                push_text(&mut stack, text, position)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(CodecError::xml(
            reader.buffer_position() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }

    let root = root.ok_or_else(|| CodecError::xml(0, "document has no root element"))?;
    Ok(XmlDocument { declaration, root })
}

fn read_declaration(decl: &BytesDecl<'_>, position: u64) -> CodecResult<Declaration> {
    let version = decl
        .version()
        .map_err(|e| CodecError::xml(position, e.to_string()))?;
    let encoding = match decl.encoding() {
        Some(Ok(enc)) => Some(utf8_string(&enc)?),
        Some(Err(e)) => return Err(CodecError::xml(position, e.to_string())),
        None => None,
    };
    let standalone = match decl.standalone() {
        Some(Ok(sa)) => Some(utf8_string(&sa)?),
        Some(Err(e)) => return Err(CodecError::xml(position, e.to_string())),
        None => None,
    };

    Ok(Declaration {
        version: utf8_string(&version)?,
        encoding,
        standalone,
    })
}

fn utf8_string(bytes: &[u8]) -> CodecResult<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| CodecError::InvalidUtf8)
}

fn open_element(start: &BytesStart<'_>, position: u64) -> CodecResult<XmlElement> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|_| CodecError::InvalidUtf8)?
        .to_string();
    let mut element = XmlElement::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| CodecError::xml(position, e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|_| CodecError::InvalidUtf8)?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| CodecError::xml(position, e.to_string()))?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn close_element(mut element: XmlElement) -> XmlElement {
    let is_blank = |t: &Option<String>| t.as_deref().map_or(true, |s| s.trim().is_empty());
    if !element.children.is_empty() && is_blank(&element.text) {
        element.text = None;
    }
    if element.text.as_deref() == Some("") {
        element.text = None;
    }
    element
}

fn push_text(stack: &mut [XmlElement], text: &str, position: u64) -> CodecResult<()> {
    let Some(current) = stack.last_mut() else {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(CodecError::xml(position, "text outside the root element"));
    };

    match current.children.last_mut() {
        // Text after a child belongs to that child's tail; indentation is dropped.
        Some(last) => {
            if !text.trim().is_empty() {
                last.tail.get_or_insert_with(String::new).push_str(text);
            }
        }
        None => current.text.get_or_insert_with(String::new).push_str(text),
    }
    Ok(())
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
    position: u64,
) -> CodecResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(CodecError::xml(position, "multiple root elements")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_rows() {
        let doc = parse_document(
            "<ROOT>\n\t<Cls>\n\t\t<ROW>\n\t\t\t<ClassId>O1</ClassId>\n\t\t</ROW>\n\t</Cls>\n</ROOT>",
        )
        .unwrap();

        let cls = doc.root.child("Cls").unwrap();
        assert!(cls.text.is_none());
        let row = cls.child("ROW").unwrap();
        assert_eq!(row.child_text("ClassId"), Some("O1"));
    }

    #[test]
    fn keeps_declaration() {
        let doc = parse_document("<?xml version=\"1.0\" encoding=\"utf-8\"?><ROOT/>").unwrap();
        let decl = doc.declaration.unwrap();
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("utf-8"));
    }

    #[test]
    fn unescapes_attributes_and_text() {
        let doc =
            parse_document("<r><logo name=\"a&amp;b\">x &lt; y</logo></r>").unwrap();
        let logo = doc.root.child("logo").unwrap();
        assert_eq!(logo.attribute("name"), Some("a&b"));
        assert_eq!(logo.text.as_deref(), Some("x < y"));
    }

    #[test]
    fn rejects_mismatched_tags() {
        let err = parse_document("<ROOT><Cls></Race></ROOT>").unwrap_err();
        assert!(matches!(err, CodecError::Xml { .. }));
    }

    #[test]
    fn rejects_unclosed_root() {
        assert!(parse_document("<ROOT><Cls>").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_document("   ").is_err());
    }
}
