//! Codec configuration.
//!
//! [`CodecConfig`] seeds a [`Context`](crate::Context): default format and
//! schema version, how legacy text is written, and whether JSON documents use
//! the `network` envelope. Every section is optional; unspecified values fall
//! back to their defaults.
//!
//! ```toml
//! [session]
//! format = "legacy_text"
//! version = "33"
//!
//! [legacy]
//! delimiter = "comma"
//! quote = "'"
//! write_begin_markers = false
//!
//! [json]
//! wrap_network = true
//! ```

use std::path::Path;

use gat_case_core::{CaseError, CaseResult, FileFormat, SchemaVersion};
use serde::{Deserialize, Serialize};

use crate::tokenizer::{Delimiter, Dialect};

/// Main codec configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Session defaults.
    pub session: SessionConfig,

    /// Legacy text writer options.
    pub legacy: LegacyConfig,

    /// JSON document options.
    pub json: JsonConfig,
}

/// Session defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Format a new session reads and writes.
    pub format: FileFormat,

    /// Schema version (`"33"`, `"35.0"`); detected from the document when absent.
    pub version: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            format: FileFormat::LegacyText,
            version: None,
        }
    }
}

/// Legacy text writer options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyConfig {
    /// Field separator used when writing.
    pub delimiter: Delimiter,

    /// Quote character used when writing, `'` or `"`.
    pub quote: String,

    /// Write `BEGIN <NAME> DATA` for blocks that do not follow an end line.
    pub write_begin_markers: bool,
}

impl Default for LegacyConfig {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            quote: "'".to_string(),
            write_begin_markers: false,
        }
    }
}

/// JSON document options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Wrap record groups in a top-level `network` object.
    pub wrap_network: bool,
}

impl Default for JsonConfig {
    fn default() -> Self {
        Self { wrap_network: true }
    }
}

impl CodecConfig {
    pub fn from_toml_str(contents: &str) -> CaseResult<Self> {
        let config: Self =
            toml::from_str(contents).map_err(|e| CaseError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> CaseResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml_string(&self) -> CaseResult<String> {
        toml::to_string_pretty(self).map_err(|e| CaseError::Config(e.to_string()))
    }

    /// Parsed session version, if one is configured.
    pub fn version(&self) -> CaseResult<Option<SchemaVersion>> {
        self.session
            .version
            .as_deref()
            .map(str::parse::<SchemaVersion>)
            .transpose()
    }

    /// Writer dialect described by the legacy section.
    pub fn dialect(&self) -> CaseResult<Dialect> {
        let mut chars = self.legacy.quote.chars();
        match (chars.next(), chars.next()) {
            (Some(quote @ ('\'' | '"')), None) => Ok(Dialect {
                delimiter: self.legacy.delimiter,
                quote,
            }),
            _ => Err(CaseError::Config(format!(
                "quote must be ' or \", found '{}'",
                self.legacy.quote
            ))),
        }
    }

    fn validate(&self) -> CaseResult<()> {
        self.version()?;
        self.dialect()?;
        Ok(())
    }
}
