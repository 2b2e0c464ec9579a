//! Unified error type for record-group reading and writing
//!
//! Every failure surfaced by the codec is a [`CaseError`]. Variants follow the
//! failure classes of the engine: block framing, schema resolution, field
//! counts and value conversion. None of them are recovered from internally; a
//! record group is read or written as a unit.
//!
//! # Example
//!
//! ```ignore
//! use gat_case_core::{CaseError, CaseResult};
//!
//! fn read_buses(ctx: &mut Context, reader: &mut Reader) -> CaseResult<Vec<Bus>> {
//!     let buses = ctx.read(&BUS_GROUP, reader)?;
//!     Ok(buses)
//! }
//! ```

use thiserror::Error;

use crate::field::FieldKind;

/// Error type for all record-group operations.
#[derive(Error, Debug)]
pub enum CaseError {
    /// Malformed block framing: missing terminator, truncated stream,
    /// non-rectangular multi-line output.
    #[error("Structural format error in {group}: {message}")]
    Structural { group: String, message: String },

    /// No field schema registered for the requested group, version or sub-kind.
    #[error("Schema resolution error in {group}: {message}")]
    SchemaResolution { group: String, message: String },

    /// A data row supplies more values than the resolved schema defines.
    #[error("Field count error in {group}, record {record}: {found} fields found, schema defines {expected}")]
    FieldCount {
        group: String,
        record: usize,
        found: usize,
        expected: usize,
    },

    /// A field's text cannot be converted to its declared type.
    #[error("Value conversion error in {group}, record {record}: field '{field}' expects {expected}, found '{value}'")]
    ValueConversion {
        group: String,
        record: usize,
        field: String,
        value: String,
        expected: FieldKind,
    },

    /// A schema or document names a field the record type does not declare.
    #[error("Unknown field '{field}' in {group}")]
    UnknownField { group: String, field: String },

    /// I/O errors from the underlying reader or writer
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON document errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience type alias for Results using CaseError.
pub type CaseResult<T> = Result<T, CaseError>;

impl CaseError {
    pub fn structural(group: impl ToString, message: impl Into<String>) -> Self {
        CaseError::Structural {
            group: group.to_string(),
            message: message.into(),
        }
    }

    pub fn schema_resolution(group: impl ToString, message: impl Into<String>) -> Self {
        CaseError::SchemaResolution {
            group: group.to_string(),
            message: message.into(),
        }
    }

    pub fn unknown_field(group: impl ToString, field: impl Into<String>) -> Self {
        CaseError::UnknownField {
            group: group.to_string(),
            field: field.into(),
        }
    }
}
