//! Error types for decode, validation, and encode.
//!
//! Two disjoint families cover the two directions of the transform:
//!
//! - [`DecodeError`] — raised while turning markup into the typed model.
//!   Terminal for the whole document; there is no partial-document recovery.
//! - [`ValidationError`] — raised by `validate` before any node is emitted.
//!   Invalid state is never serialized.
//!
//! [`EncodeError`] exists only at the envelope boundary, where a validation
//! failure and a serializer failure both have to surface through one result.

use thiserror::Error;

/// Errors raised while decoding markup into the typed model.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Low-level XML parse error from the element-tree reader.
    #[error("XML error: {0}")]
    Xml(String),

    /// The document has no XML declaration.
    #[error("missing XML declaration")]
    MissingDeclaration,

    /// The declaration names an encoding other than Shift_JIS.
    #[error("unsupported encoding \"{0}\", expected \"Shift_JIS\"")]
    BadEncoding(String),

    /// No root element, or the root element is not ModuleData.
    #[error("missing root element \"ModuleData\"")]
    MissingRoot,

    /// A required attribute is absent.
    #[error("{entity}: missing required attribute \"{attribute}\"")]
    MissingAttribute {
        entity: &'static str,
        attribute: &'static str,
    },

    /// An attribute is present but carries the wrong value kind.
    #[error("{entity}: attribute \"{attribute}\" must be {expected}, got {found}")]
    WrongType {
        entity: &'static str,
        attribute: &'static str,
        expected: &'static str,
        found: String,
    },

    /// An enumerated attribute holds a value outside its allowed set.
    #[error("{entity}: \"{value}\" is not a valid {attribute}")]
    BadEnum {
        entity: &'static str,
        attribute: &'static str,
        value: String,
    },

    /// A program change was decoded with no Bank children.
    #[error("PC \"{name}\": at least one Bank child is required")]
    EmptyBankList { name: String },
}

impl DecodeError {
    /// Create a low-level XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a missing-attribute error.
    pub fn missing_attribute(entity: &'static str, attribute: &'static str) -> Self {
        Self::MissingAttribute { entity, attribute }
    }

    /// Create a wrong-type error.
    pub fn wrong_type(
        entity: &'static str,
        attribute: &'static str,
        expected: &'static str,
        found: impl Into<String>,
    ) -> Self {
        Self::WrongType {
            entity,
            attribute,
            expected,
            found: found.into(),
        }
    }

    /// Create a bad-enum error.
    pub fn bad_enum(
        entity: &'static str,
        attribute: &'static str,
        value: impl Into<String>,
    ) -> Self {
        Self::BadEnum {
            entity,
            attribute,
            value: value.into(),
        }
    }
}

/// Errors raised by `validate` before a node is emitted.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A numeric field lies outside its allowed range.
    #[error("{entity}: {field} must be in {min}..={max}, got {value}")]
    OutOfRange {
        entity: &'static str,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A textual field violates its format rule.
    #[error("{entity}: {field} \"{value}\" does not match {expected}")]
    BadFormat {
        entity: &'static str,
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    /// An entry value lies outside its owning Value/Gate bounds.
    #[error("Entry \"{label}\": value {value} outside declared bounds {min}..={max}")]
    EntryOutOfBounds {
        label: String,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ValidationError {
    /// Create an out-of-range error.
    pub fn out_of_range(
        entity: &'static str,
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    ) -> Self {
        Self::OutOfRange {
            entity,
            field,
            value,
            min,
            max,
        }
    }

    /// Create a bad-format error.
    pub fn bad_format(
        entity: &'static str,
        field: &'static str,
        value: impl Into<String>,
        expected: &'static str,
    ) -> Self {
        Self::BadFormat {
            entity,
            field,
            value: value.into(),
            expected,
        }
    }
}

/// Errors raised by envelope-level encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A node failed validation; nothing was serialized.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The XML serializer failed.
    #[error("XML error: {0}")]
    Xml(String),
}

impl EncodeError {
    /// Create a serializer error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }
}
