//! Schema versions and on-disk file formats.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CaseError, CaseResult};

/// Schema version (`major.minor`) governing which fields a record group carries.
///
/// Field lists are registered per major version; the minor component is kept
/// for round-tripping document metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    major: u32,
    minor: u32,
}

impl SchemaVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Version from an integer revision as found in case identification records.
    pub fn from_revision(rev: i64) -> CaseResult<Self> {
        u32::try_from(rev)
            .ok()
            .filter(|major| *major > 0)
            .map(|major| Self::new(major, 0))
            .ok_or_else(|| CaseError::Config(format!("invalid schema revision {}", rev)))
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for SchemaVersion {
    type Err = CaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || CaseError::Config(format!("invalid schema version '{}'", s));
        let (major, minor) = match trimmed.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (trimmed, "0"),
        };
        let major: u32 = major.parse().map_err(|_| invalid())?;
        let minor: u32 = minor.parse().map_err(|_| invalid())?;
        if major == 0 {
            return Err(invalid());
        }
        Ok(Self::new(major, minor))
    }
}

/// Supported on-disk representations of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    /// Line-oriented text with delimited, optionally quoted fields
    LegacyText,
    /// Tree document with `fields`/`data` arrays per record group
    Json,
}

impl FileFormat {
    pub const ALL: &'static [FileFormat] = &[FileFormat::LegacyText, FileFormat::Json];

    /// Expected file extensions for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            FileFormat::LegacyText => &["raw"],
            FileFormat::Json => &["rawx", "json"],
        }
    }

    /// Human-readable format name.
    pub fn friendly_name(&self) -> &'static str {
        match self {
            FileFormat::LegacyText => "legacy text (RAW)",
            FileFormat::Json => "JSON (RAWX)",
        }
    }

    /// Detect format from a file extension.
    pub fn detect(path: &Path) -> Option<FileFormat> {
        let ext = path.extension()?.to_str()?;
        Self::ALL.iter().copied().find(|format| {
            format
                .extensions()
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext))
        })
    }
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.friendly_name())
    }
}

impl FromStr for FileFormat {
    type Err = CaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy_text" | "legacy" | "raw" => Ok(FileFormat::LegacyText),
            "json" | "rawx" => Ok(FileFormat::Json),
            other => Err(CaseError::Config(format!("unknown file format '{}'", other))),
        }
    }
}
