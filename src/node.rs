//! The node contract shared by every domain entity.
//!
//! Each entity implements three operations: `validate`, `to_element`, and
//! `decode`. `encode` is derived — it always validates first, so invalid state
//! is never serialized. `decode` is atomic per node: the first missing or
//! mistyped required field fails the whole node, unknown attributes are
//! ignored, and unknown child element names are skipped for forward
//! compatibility.

use crate::error::{DecodeError, ValidationError};
use crate::xml::{AttrValue, Element};

/// Uniform parse/validate/emit contract.
pub trait Node: Sized {
    /// Check every invariant of this node and its children.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Build the element for this node. Callers go through [`Node::encode`];
    /// this assumes the node has already been validated.
    fn to_element(&self) -> Element;

    /// Decode this node from its element.
    fn decode(element: &Element) -> Result<Self, DecodeError>;

    /// Validate, then emit. Fails closed on the first invariant violation.
    fn encode(&self) -> Result<Element, ValidationError> {
        self.validate()?;
        Ok(self.to_element())
    }
}

// ============================================================================
// ATTRIBUTE ACCESS
// ============================================================================
//
// Numeric accessors check the coerced value kind, not string content; the
// element-tree reader has already turned numeric-looking values into Int or
// Float. Text accessors accept any kind and stringify it, so a name that
// happens to look like a number still decodes.

pub(crate) fn req_text(
    element: &Element,
    entity: &'static str,
    attribute: &'static str,
) -> Result<String, DecodeError> {
    element
        .attr(attribute)
        .map(AttrValue::to_string)
        .ok_or_else(|| DecodeError::missing_attribute(entity, attribute))
}

pub(crate) fn opt_text(element: &Element, attribute: &str) -> Option<String> {
    element.attr(attribute).map(AttrValue::to_string)
}

pub(crate) fn req_int(
    element: &Element,
    entity: &'static str,
    attribute: &'static str,
) -> Result<i64, DecodeError> {
    match element.attr(attribute) {
        Some(AttrValue::Int(v)) => Ok(*v),
        Some(other) => Err(DecodeError::wrong_type(
            entity,
            attribute,
            "an integer",
            format!("{} \"{other}\"", other.kind()),
        )),
        None => Err(DecodeError::missing_attribute(entity, attribute)),
    }
}

pub(crate) fn opt_int(
    element: &Element,
    entity: &'static str,
    attribute: &'static str,
) -> Result<Option<i64>, DecodeError> {
    match element.attr(attribute) {
        Some(AttrValue::Int(v)) => Ok(Some(*v)),
        Some(other) => Err(DecodeError::wrong_type(
            entity,
            attribute,
            "an integer",
            format!("{} \"{other}\"", other.kind()),
        )),
        None => Ok(None),
    }
}

pub(crate) fn req_float(
    element: &Element,
    entity: &'static str,
    attribute: &'static str,
) -> Result<f64, DecodeError> {
    match element.attr(attribute) {
        Some(AttrValue::Int(v)) => Ok(*v as f64),
        Some(AttrValue::Float(v)) => Ok(*v),
        Some(other) => Err(DecodeError::wrong_type(
            entity,
            attribute,
            "a number",
            format!("{} \"{other}\"", other.kind()),
        )),
        None => Err(DecodeError::missing_attribute(entity, attribute)),
    }
}
