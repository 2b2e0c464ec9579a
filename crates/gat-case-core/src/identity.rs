//! Record-group identities.

use std::fmt;

use serde::Serialize;

use crate::version::FileFormat;

/// Shape of a record group inside a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonShape {
    /// Exactly one row of case-wide scalars; `data` is a flat array
    ParameterSet,
    /// Zero or more rows; `data` is an array of arrays
    DataTable,
}

/// Immutable key for one logical table within one dataset.
///
/// Sub-kinds of a heterogeneous group get their own identity so the
/// round-trip context can track their field names separately; they usually
/// share the legacy block name and differ in their JSON node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RecordGroupId {
    dataset: &'static str,
    legacy_name: &'static str,
    json_node: &'static str,
    shape: JsonShape,
}

impl RecordGroupId {
    pub const fn data_table(
        dataset: &'static str,
        legacy_name: &'static str,
        json_node: &'static str,
    ) -> Self {
        Self {
            dataset,
            legacy_name,
            json_node,
            shape: JsonShape::DataTable,
        }
    }

    pub const fn parameter_set(
        dataset: &'static str,
        legacy_name: &'static str,
        json_node: &'static str,
    ) -> Self {
        Self {
            dataset,
            legacy_name,
            json_node,
            shape: JsonShape::ParameterSet,
        }
    }

    pub fn dataset(&self) -> &'static str {
        self.dataset
    }

    /// Block name used in `BEGIN <NAME> DATA` / `END OF <NAME> DATA` markers.
    pub fn legacy_name(&self) -> &'static str {
        self.legacy_name
    }

    pub fn json_node(&self) -> &'static str {
        self.json_node
    }

    pub fn shape(&self) -> JsonShape {
        self.shape
    }

    pub fn is_parameter_set(&self) -> bool {
        self.shape == JsonShape::ParameterSet
    }

    pub fn name_for(&self, format: FileFormat) -> &'static str {
        match format {
            FileFormat::LegacyText => self.legacy_name,
            FileFormat::Json => self.json_node,
        }
    }
}

impl fmt::Display for RecordGroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.dataset, self.json_node)
    }
}
