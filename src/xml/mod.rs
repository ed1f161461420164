//! Generic attributed-element tree.
//!
//! The domain model never touches quick-xml directly; it consumes and produces
//! this tree. Attribute values are type-coerced at parse time, so decode logic
//! downstream can check value kind instead of re-parsing strings.
//!
//! ```text
//! Document
//! ├── declaration: Option<Declaration>   (version + encoding label)
//! └── root: Option<Element>
//!
//! Element
//! ├── name: String
//! ├── attrs: Vec<(String, AttrValue)>    (push order == emission order)
//! └── children: Vec<XmlNode>             (Element or raw Text, ordered)
//! ```

mod reader;
mod writer;

pub use reader::parse;
pub use writer::{EncodeOptions, serialize};

/// A typed attribute value.
///
/// The reader coerces every attribute: a value that parses as `i64` becomes
/// [`AttrValue::Int`], else one that parses as `f64` becomes
/// [`AttrValue::Float`], else it stays [`AttrValue::Text`].
#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttrValue {
    /// Coerce a raw attribute string to its typed form.
    pub fn coerce(raw: &str) -> Self {
        if let Ok(v) = raw.parse::<i64>() {
            return Self::Int(v);
        }
        if let Ok(v) = raw.parse::<f64>() {
            return Self::Float(v);
        }
        Self::Text(raw.to_string())
    }

    /// Human-readable kind name, used in wrong-type diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
        }
    }
}

impl std::fmt::Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One ordered child of an element.
#[derive(Clone, Debug, PartialEq)]
pub enum XmlNode {
    Element(Element),
    Text(String),
}

/// A named element with ordered attributes and ordered children.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, AttrValue)>,
    pub children: Vec<XmlNode>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Look up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Append an attribute. Emission order is push order.
    pub fn push_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.push((name.into(), value.into()));
    }

    /// Append an attribute only when the value is present.
    pub fn push_attr_opt(&mut self, name: &str, value: Option<impl Into<AttrValue>>) {
        if let Some(v) = value {
            self.attrs.push((name.to_string(), v.into()));
        }
    }

    /// Append a child element.
    pub fn push_element(&mut self, child: Element) {
        self.children.push(XmlNode::Element(child));
    }

    /// Append a raw text child.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(XmlNode::Text(text.into()));
    }

    /// Iterate over child elements, skipping text nodes.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Concatenated text content, or `None` if the element has no text children.
    pub fn text(&self) -> Option<String> {
        let mut out = String::new();
        let mut found = false;
        for node in &self.children {
            if let XmlNode::Text(t) = node {
                out.push_str(t);
                found = true;
            }
        }
        found.then_some(out)
    }
}

/// The `<?xml ...?>` declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub version: String,
    pub encoding: Option<String>,
}

/// A whole markup document: declaration plus a single root element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub declaration: Option<Declaration>,
    pub root: Option<Element>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_integer() {
        assert_eq!(AttrValue::coerce("42"), AttrValue::Int(42));
        assert_eq!(AttrValue::coerce("-7"), AttrValue::Int(-7));
    }

    #[test]
    fn coerce_float() {
        assert_eq!(AttrValue::coerce("120.000"), AttrValue::Float(120.0));
    }

    #[test]
    fn coerce_text() {
        assert_eq!(
            AttrValue::coerce("4/4"),
            AttrValue::Text("4/4".to_string())
        );
        assert_eq!(
            AttrValue::coerce("#FF0000"),
            AttrValue::Text("#FF0000".to_string())
        );
    }

    #[test]
    fn attr_lookup_and_order() {
        let mut el = Element::new("Bank");
        el.push_attr("Name", "Piano");
        el.push_attr("LSB", 0i64);
        el.push_attr("MSB", 1i64);

        assert_eq!(el.attr("LSB"), Some(&AttrValue::Int(0)));
        assert_eq!(el.attr("missing"), None);
        let names: Vec<_> = el.attrs.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["Name", "LSB", "MSB"]);
    }

    #[test]
    fn text_content_concatenates() {
        let mut el = Element::new("Memo");
        el.push_text("one ");
        el.push_text("two");
        assert_eq!(el.text().as_deref(), Some("one two"));

        let empty = Element::new("Memo");
        assert_eq!(empty.text(), None);
    }
}
