//! Markup text to element tree, via the quick-xml event loop.

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};

use super::{AttrValue, Declaration, Document, Element, XmlNode};
use crate::error::DecodeError;

/// Parse markup text into a [`Document`].
///
/// Text nodes are trimmed; attribute values are type-coerced (see
/// [`AttrValue::coerce`]). Only the first root element is kept.
pub fn parse(text: &str) -> Result<Document, DecodeError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut document = Document::default();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Decl(ref d)) => {
                document.declaration = Some(read_declaration(d)?);
            }
            Ok(Event::Start(ref e)) => {
                stack.push(element_from_start(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e)?;
                attach(&mut document, &mut stack, element);
            }
            Ok(Event::End(_)) => {
                if let Some(element) = stack.pop() {
                    attach(&mut document, &mut stack, element);
                }
            }
            Ok(Event::Text(ref t)) => {
                let text = t
                    .unescape()
                    .map_err(|e| DecodeError::xml(format!("text error: {e}")))?;
                if !text.is_empty() {
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(XmlNode::Text(text.into_owned()));
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(DecodeError::xml(format!(
                    "parse error at position {}: {e}",
                    reader.error_position()
                )));
            }
            // Comments, CDATA, processing instructions and doctypes carry no
            // module data.
            Ok(_) => {}
        }
    }

    Ok(document)
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<Declaration, DecodeError> {
    let version = decl
        .version()
        .map_err(|e| DecodeError::xml(format!("declaration error: {e}")))?;
    let version = String::from_utf8_lossy(&version).into_owned();

    let encoding = match decl.encoding() {
        Some(Ok(enc)) => Some(String::from_utf8_lossy(&enc).into_owned()),
        Some(Err(e)) => return Err(DecodeError::xml(format!("declaration error: {e}"))),
        None => None,
    };

    Ok(Declaration { version, encoding })
}

fn element_from_start(e: &BytesStart<'_>) -> Result<Element, DecodeError> {
    let qname = e.name();
    let name = std::str::from_utf8(qname.as_ref())
        .map_err(|e| DecodeError::xml(format!("invalid tag name: {e}")))?;
    let mut element = Element::new(name);

    for attr_result in e.attributes() {
        let attr =
            attr_result.map_err(|e| DecodeError::xml(format!("attribute error: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| DecodeError::xml(format!("attribute key error: {e}")))?;
        let value = attr
            .unescape_value()
            .map_err(|e| DecodeError::xml(format!("attribute value error: {e}")))?;
        element.push_attr(key, AttrValue::coerce(&value));
    }

    Ok(element)
}

fn attach(document: &mut Document, stack: &mut Vec<Element>, element: Element) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(XmlNode::Element(element));
    } else if document.root.is_none() {
        document.root = Some(element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declaration_and_root() {
        let doc = parse(r#"<?xml version="1.0" encoding="Shift_JIS"?><ModuleData Name="GM"/>"#)
            .expect("parse");

        let decl = doc.declaration.expect("declaration");
        assert_eq!(decl.version, "1.0");
        assert_eq!(decl.encoding.as_deref(), Some("Shift_JIS"));

        let root = doc.root.expect("root");
        assert_eq!(root.name, "ModuleData");
        assert_eq!(root.attr("Name"), Some(&AttrValue::Text("GM".to_string())));
    }

    #[test]
    fn parses_nested_children_in_order() {
        let doc = parse(
            r#"<List><PC Name="Piano" PC="1"><Bank Name="A" LSB="0"/><Bank Name="B"/></PC></List>"#,
        )
        .expect("parse");

        let root = doc.root.expect("root");
        let pc = root.elements().next().expect("PC child");
        assert_eq!(pc.attr("PC"), Some(&AttrValue::Int(1)));
        let banks: Vec<_> = pc.elements().map(|e| e.name.as_str()).collect();
        assert_eq!(banks, ["Bank", "Bank"]);
    }

    #[test]
    fn captures_text_children() {
        let doc = parse("<CCM><Memo>pitch bend range</Memo></CCM>").expect("parse");
        let root = doc.root.expect("root");
        let memo = root.elements().next().expect("Memo");
        assert_eq!(memo.text().as_deref(), Some("pitch bend range"));
    }

    #[test]
    fn tag_names_survive_for_start_and_self_closing_elements() {
        let doc = parse(r#"<ControlChangeMacroList><CCM ID="7" Name="Volume"/></ControlChangeMacroList>"#)
            .expect("parse");
        let root = doc.root.expect("root");
        assert_eq!(root.name, "ControlChangeMacroList");
        let ccm = root.elements().next().expect("CCM child");
        assert_eq!(ccm.name, "CCM");
        assert_eq!(ccm.attr("ID"), Some(&AttrValue::Int(7)));
    }

    #[test]
    fn missing_declaration_is_not_a_parse_error() {
        let doc = parse("<ModuleData Name=\"x\"/>").expect("parse");
        assert!(doc.declaration.is_none());
        assert!(doc.root.is_some());
    }

    #[test]
    fn malformed_markup_is_an_xml_error() {
        let err = parse("<ModuleData><Unclosed></ModuleData>").unwrap_err();
        assert!(matches!(err, DecodeError::Xml(_)));
    }
}
