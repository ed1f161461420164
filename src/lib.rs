//! # moddata
//!
//! Bidirectional mapper between the XML module-definition files of a music
//! sequencer and a strongly validated in-memory document model. Decode turns
//! markup into a typed tree; encode validates every invariant, runs a
//! diagnostic consistency pass over the macro subtree, and emits
//! byte-compatible markup (fixed declaration, Shift_JIS label, CRLF line
//! endings).
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! envelope      → declaration check, top-level decode/encode
//!   ↓
//! module_data   → aggregate root, fixed sub-tree order, checker hook
//!   ↓
//! defaults / instruments / ccm / template / default_data
//!               → domain entities (leaves, containers, recursive folders)
//!   ↓
//! checker       → duplicate-id + id-usage diagnostics over the macro tree
//!   ↓
//! node          → the validate/encode/decode contract + attribute access
//!   ↓
//! xml           → generic element tree over quick-xml, typed attributes
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! use moddata::{decode, encode, EncodeOptions};
//!
//! let module = decode(&text)?;
//! let rewritten = encode(&module, &EncodeOptions::default())?;
//! ```
//!
//! Both directions are pure functions of their input; the only side effect
//! is `tracing` output from the consistency checker during encode.

/// Generic element tree: typed attributes, ordered children
pub mod xml;

/// Error families: DecodeError, ValidationError, EncodeError
pub mod error;

/// The validate/encode/decode node contract
pub mod node;

/// Single-scalar default nodes
pub mod defaults;

/// Instrument and drum-set map chain
pub mod instruments;

/// Control-change-macro subtree
pub mod ccm;

/// Consistency diagnostics over the macro subtree
pub mod checker;

/// Template subtree and shared event leaves
pub mod template;

/// Default song data: marks, tracks, event streams
pub mod default_data;

/// The aggregate root
pub mod module_data;

/// Document envelope: declaration + top-level decode/encode
pub mod envelope;

pub use checker::{ConsistencyReport, DuplicateId, IdKind, IdUsage};
pub use envelope::{EncodeOptions, decode, encode};
pub use error::{DecodeError, EncodeError, ValidationError};
pub use module_data::ModuleData;
pub use node::Node;
