//! # gat-case-core: Record-Group Model for Case Files
//!
//! The format-independent half of the case codec. It defines what a record
//! group *is*, without knowing how it is laid out on disk:
//!
//! - [`SchemaVersion`] and [`FileFormat`]: which field lists apply and which
//!   representation is being read or written
//! - [`RecordGroupId`]: immutable key naming one logical table
//! - [`FieldDescriptor`] and [`Record`]: statically declared field tables that
//!   bind text or JSON values to typed record structs
//! - [`FieldSchema`], [`VersionedSchema`], [`SchemaRegistry`]: ordered field-name
//!   lists resolved per group, version and sub-kind
//! - [`CaseError`]: the error type shared by every codec operation
//!
//! The text and JSON codecs live in `gat-case-io`.
//!
//! ## Quick Start
//!
//! ```rust
//! use gat_case_core::*;
//!
//! const BUS: RecordGroupId = RecordGroupId::data_table("power_flow", "BUS", "bus");
//!
//! let registry = SchemaRegistry::single(
//!     BUS,
//!     VersionedSchema::per_major()
//!         .with_major(33, &["i", "name", "baskv"])
//!         .with_major(35, &["ibus", "name", "baskv", "ide"]),
//! );
//!
//! let v33 = SchemaVersion::new(33, 0);
//! assert_eq!(registry.field_names(Some(v33), None).unwrap().len(), 3);
//! assert!(registry.field_names(Some(SchemaVersion::new(30, 0)), None).is_err());
//! ```

pub mod error;
pub mod field;
pub mod identity;
pub mod schema;
pub mod version;

pub use error::{CaseError, CaseResult};
pub use field::{format_float, ConversionFailure, FieldDescriptor, FieldKind, FieldValue, Record};
pub use identity::{JsonShape, RecordGroupId};
pub use schema::{FieldSchema, SchemaRegistry, SubKindSchema, VersionedSchema};
pub use version::{FileFormat, SchemaVersion};
