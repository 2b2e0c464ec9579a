//! # gat-case-io: Versioned Record-Group Codec
//!
//! Reads and writes tabular case data in two mutually convertible
//! representations: line-oriented legacy text (PSS/E RAW style) and JSON
//! (RAWX style). A read followed by a write reproduces the field columns of
//! the source, per record group, even when rows omit optional trailing fields.
//!
//! ## Design Philosophy
//!
//! **Plain data schemas**: field lists are registered per record group and
//! schema major version, and resolved through a pure lookup. Records bind
//! through static descriptor tables rather than reflection.
//!
//! **Explicit sessions**: a [`Context`] carries the format, version, detected
//! dialect and observed field names of one session. It is passed by reference
//! and never shared between threads.
//!
//! **Fail as a unit**: a record group is read or written completely or not at
//! all. Errors are typed ([`gat_case_core::CaseError`]) and returned to the
//! caller.
//!
//! ## Quick Start: Round-Trip a PSS/E Case
//!
//! ```rust,no_run
//! use gat_case_io::psse::{read_case_file, write_case_file};
//!
//! fn main() -> anyhow::Result<()> {
//!     let (case, ctx) = read_case_file("ieee14.raw")?;
//!     println!("Buses: {}", case.buses.len());
//!
//!     // Same session state, JSON output
//!     write_case_file(&case, &ctx, "ieee14.rawx")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`tokenizer`] - splits record lines, detects delimiter and quote
//! - [`reader`] - block reader and writer for legacy text
//! - [`context`] - the round-trip session
//! - [`group`] - the record group engine
//! - `multiline` (internal) - records spanning several physical lines
//! - [`json`] - JSON documents
//! - [`config`] - TOML codec configuration
//! - [`psse`] - PSS/E power-flow record groups and whole-case documents
//!
//! ## Error Handling
//!
//! Codec operations return [`gat_case_core::CaseResult`]. The file-level
//! helpers in [`psse`] return `anyhow::Result` with the path in the context.

pub mod config;
pub mod context;
pub mod group;
pub mod json;
mod multiline;
pub mod psse;
pub mod reader;
pub mod tokenizer;

pub use config::CodecConfig;
pub use context::{Context, RecordInput, RecordOutput};
pub use gat_case_core::{CaseError, CaseResult, FileFormat, SchemaVersion};
pub use group::RecordGroup;
pub use json::JsonDocument;
pub use reader::{Block, LegacyTextReader, LegacyTextWriter, RawLines};
pub use tokenizer::{Delimiter, Dialect};
