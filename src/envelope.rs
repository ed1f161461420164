//! Document envelope: the fixed declaration around the aggregate root.
//!
//! Module-definition files always declare `version="1.0"` and
//! `encoding="Shift_JIS"`, and always use CRLF line endings. The envelope
//! owns top-level decode/encode: it checks the declaration before any
//! sub-tree is touched, requires exactly one `ModuleData` root, and
//! delegates the rest to the node contract.

use crate::error::{DecodeError, EncodeError};
use crate::module_data::ModuleData;
use crate::node::Node;
use crate::xml::{self, Declaration, Document};

pub use crate::xml::EncodeOptions;

const DECLARATION_VERSION: &str = "1.0";
const DECLARATION_ENCODING: &str = "Shift_JIS";

/// Decode markup text into a [`ModuleData`] tree.
///
/// Fails with [`DecodeError::MissingDeclaration`] when the declaration is
/// absent, [`DecodeError::BadEncoding`] when its encoding label is not
/// `Shift_JIS`, and [`DecodeError::MissingRoot`] when the single root
/// element is absent or not named `ModuleData` — all before any sub-tree
/// decode is attempted.
pub fn decode(text: &str) -> Result<ModuleData, DecodeError> {
    let document = xml::parse(text)?;

    let declaration = document
        .declaration
        .as_ref()
        .ok_or(DecodeError::MissingDeclaration)?;
    if declaration.encoding.as_deref() != Some(DECLARATION_ENCODING) {
        return Err(DecodeError::BadEncoding(
            declaration.encoding.clone().unwrap_or_default(),
        ));
    }

    match &document.root {
        Some(root) if root.name == "ModuleData" => ModuleData::decode(root),
        _ => Err(DecodeError::MissingRoot),
    }
}

/// Encode a [`ModuleData`] tree into markup text.
///
/// Validates the whole tree first (fail closed), runs the consistency
/// checker as a logged diagnostic, and emits CRLF-terminated text with the
/// fixed declaration.
pub fn encode(module: &ModuleData, options: &EncodeOptions) -> Result<String, EncodeError> {
    let root = module.encode()?;
    let document = Document {
        declaration: Some(Declaration {
            version: DECLARATION_VERSION.to_string(),
            encoding: Some(DECLARATION_ENCODING.to_string()),
        }),
        root: Some(root),
    };
    xml::serialize(&document, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_wrong_encoding_label() {
        let err = decode(r#"<?xml version="1.0" encoding="UTF-8"?><ModuleData Name="GM"/>"#)
            .unwrap_err();
        assert!(matches!(err, DecodeError::BadEncoding(label) if label == "UTF-8"));
    }

    #[test]
    fn decode_rejects_missing_declaration() {
        let err = decode(r#"<ModuleData Name="GM"/>"#).unwrap_err();
        assert!(matches!(err, DecodeError::MissingDeclaration));
    }

    #[test]
    fn decode_rejects_wrong_root() {
        let err =
            decode(r#"<?xml version="1.0" encoding="Shift_JIS"?><SongData Name="GM"/>"#)
                .unwrap_err();
        assert!(matches!(err, DecodeError::MissingRoot));
    }

    #[test]
    fn encoding_label_is_checked_before_the_root() {
        // The root is missing too, but the encoding check comes first.
        let err = decode(r#"<?xml version="1.0" encoding="UTF-8"?><Wrong/>"#).unwrap_err();
        assert!(matches!(err, DecodeError::BadEncoding(_)));
    }

    #[test]
    fn encode_emits_fixed_declaration_and_crlf() {
        let module = ModuleData::new("GM");
        let text = encode(&module, &EncodeOptions::default()).expect("encode");
        assert!(text.starts_with(r#"<?xml version="1.0" encoding="Shift_JIS"?>"#));
        assert!(text.ends_with("\r\n"));
        assert_eq!(decode(&text).expect("decode"), module);
    }
}
