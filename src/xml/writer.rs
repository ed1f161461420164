//! Element tree to markup text.
//!
//! quick-xml does the escaping and indentation; this module fixes the line
//! endings afterwards. Every output line ends with CRLF regardless of host
//! platform, including the trailing newline.

use std::io::Cursor;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{Document, Element, XmlNode};
use crate::error::EncodeError;

/// Serializer options.
#[derive(Clone, Copy, Debug)]
pub struct EncodeOptions {
    /// Indentation character for nested elements.
    pub indent_char: u8,
    /// Number of indentation characters per nesting level.
    pub indent_size: usize,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent_char: b'\t',
            indent_size: 1,
        }
    }
}

/// Serialize a [`Document`] to markup text with CRLF line endings.
pub fn serialize(document: &Document, options: &EncodeOptions) -> Result<String, EncodeError> {
    let root = document
        .root
        .as_ref()
        .ok_or_else(|| EncodeError::xml("document has no root element"))?;

    let mut buffer = Cursor::new(Vec::new());
    let mut writer = Writer::new_with_indent(&mut buffer, options.indent_char, options.indent_size);

    if let Some(decl) = &document.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new(
                &decl.version,
                decl.encoding.as_deref(),
                None,
            )))
            .map_err(|e| EncodeError::xml(format!("write error: {e}")))?;
    }

    write_element(&mut writer, root)?;

    let output = String::from_utf8(buffer.into_inner())
        .map_err(|e| EncodeError::xml(format!("output is not valid UTF-8: {e}")))?;

    // Normalize whatever the writer produced to CRLF, then terminate the file.
    let mut output = output.replace("\r\n", "\n").replace('\n', "\r\n");
    output.push_str("\r\n");
    Ok(output)
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    element: &Element,
) -> Result<(), EncodeError> {
    let attrs: Vec<(&str, String)> = element
        .attrs
        .iter()
        .map(|(name, value)| (name.as_str(), value.to_string()))
        .collect();

    let mut start = BytesStart::new(element.name.as_str());
    for (name, value) in &attrs {
        start.push_attribute((*name, value.as_str()));
    }

    if element.children.is_empty() {
        writer
            .write_event(Event::Empty(start))
            .map_err(|e| EncodeError::xml(format!("write error: {e}")))?;
        return Ok(());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| EncodeError::xml(format!("write error: {e}")))?;

    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(t) => writer
                .write_event(Event::Text(BytesText::new(t)))
                .map_err(|e| EncodeError::xml(format!("write error: {e}")))?,
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| EncodeError::xml(format!("write error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Declaration;

    fn doc_with_root(root: Element) -> Document {
        Document {
            declaration: Some(Declaration {
                version: "1.0".to_string(),
                encoding: Some("Shift_JIS".to_string()),
            }),
            root: Some(root),
        }
    }

    #[test]
    fn writes_declaration_and_crlf_endings() {
        let mut root = Element::new("ModuleData");
        root.push_attr("Name", "GM");
        root.push_element(Element::new("InstrumentList"));

        let text = serialize(&doc_with_root(root), &EncodeOptions::default()).expect("serialize");
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="Shift_JIS"?>"#));
        assert!(text.ends_with("\r\n"));
        // No bare LF anywhere.
        assert_eq!(text.matches('\n').count(), text.matches("\r\n").count());
    }

    #[test]
    fn empty_element_is_self_closing() {
        let mut root = Element::new("ModuleData");
        root.push_attr("Name", "GM");

        let text = serialize(&doc_with_root(root), &EncodeOptions::default()).expect("serialize");
        assert!(text.contains(r#"<ModuleData Name="GM"/>"#));
    }

    #[test]
    fn text_children_stay_inline() {
        let mut memo = Element::new("Memo");
        memo.push_text("bend range");
        let mut root = Element::new("CCM");
        root.push_element(memo);

        let text = serialize(&doc_with_root(root), &EncodeOptions::default()).expect("serialize");
        assert!(text.contains("<Memo>bend range</Memo>"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let mut root = Element::new("ModuleData");
        root.push_attr("Name", "A&B <C>");

        let text = serialize(&doc_with_root(root), &EncodeOptions::default()).expect("serialize");
        assert!(text.contains(r#"Name="A&amp;B &lt;C&gt;""#));
    }

    #[test]
    fn round_trips_through_the_reader() {
        let mut bank = Element::new("Bank");
        bank.push_attr("Name", "Drum");
        bank.push_attr("LSB", 0i64);
        let mut root = Element::new("ModuleData");
        root.push_attr("Name", "GM");
        root.push_element(bank);
        let document = doc_with_root(root);

        let text = serialize(&document, &EncodeOptions::default()).expect("serialize");
        let reparsed = crate::xml::parse(&text).expect("parse");
        assert_eq!(reparsed, document);
    }
}
