//! Field Schema Registry.
//!
//! Resolution is a pure function of `(group, version, sub-kind)`:
//!
//! 1. a version-independent list, if the group declares one;
//! 2. otherwise the list registered for the version's major component;
//! 3. otherwise [`CaseError::SchemaResolution`].
//!
//! Multi-line groups register one [`VersionedSchema`] per physical line.
//! Heterogeneous groups register a common first line, bound on its own to
//! classify each record, plus the complete line set of each sub-kind.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::error::{CaseError, CaseResult};
use crate::identity::RecordGroupId;
use crate::version::SchemaVersion;

/// Ordered, duplicate-free list of field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldSchema(Vec<String>);

impl FieldSchema {
    /// Schema from a static list known to be duplicate-free.
    pub fn from_static(names: &[&str]) -> Self {
        debug_assert!(
            names.iter().collect::<HashSet<_>>().len() == names.len(),
            "duplicate field name in {:?}",
            names
        );
        Self(names.iter().map(|n| n.to_string()).collect())
    }

    /// Schema from names found in input data; duplicates are rejected.
    pub fn try_from_names<I, S>(group: &RecordGroupId, names: I) -> CaseResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for name in names {
            let name: String = name.into();
            if !seen.insert(name.to_ascii_lowercase()) {
                return Err(CaseError::structural(
                    group,
                    format!("duplicate field name '{}'", name),
                ));
            }
            out.push(name);
        }
        Ok(Self(out))
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// The first `n` names (all of them when `n` exceeds the length).
    pub fn prefix(&self, n: usize) -> FieldSchema {
        Self(self.0.iter().take(n).cloned().collect())
    }

    /// Shortest prefix of `self` holding every name that `present` contains.
    ///
    /// Names of `self` missing from `present` but ahead of a present one stay
    /// in, so the result still binds positionally.
    pub fn covering_prefix(&self, present: &FieldSchema) -> FieldSchema {
        let end = self
            .0
            .iter()
            .rposition(|n| present.contains(n))
            .map_or(0, |last| last + 1);
        self.prefix(end)
    }

    /// Names of `self` that do not appear in `other`, in `self`'s order.
    pub fn difference(&self, other: &FieldSchema) -> FieldSchema {
        Self(
            self.0
                .iter()
                .filter(|n| !other.contains(n))
                .cloned()
                .collect(),
        )
    }

    /// Concatenation of several schemas, keeping the first occurrence of a name.
    pub fn concat<'a>(parts: impl IntoIterator<Item = &'a FieldSchema>) -> FieldSchema {
        let mut out: Vec<String> = Vec::new();
        for part in parts {
            for name in &part.0 {
                if !out.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                    out.push(name.clone());
                }
            }
        }
        Self(out)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for FieldSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Field list for one physical line, either version-independent or per major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionedSchema {
    Global(FieldSchema),
    PerMajor(BTreeMap<u32, FieldSchema>),
}

impl VersionedSchema {
    pub fn global(names: &[&str]) -> Self {
        VersionedSchema::Global(FieldSchema::from_static(names))
    }

    pub fn per_major() -> Self {
        VersionedSchema::PerMajor(BTreeMap::new())
    }

    /// Register the list for a major version. Turns a global schema into a
    /// per-major one.
    pub fn with_major(self, major: u32, names: &[&str]) -> Self {
        let mut map = match self {
            VersionedSchema::PerMajor(map) => map,
            VersionedSchema::Global(_) => BTreeMap::new(),
        };
        map.insert(major, FieldSchema::from_static(names));
        VersionedSchema::PerMajor(map)
    }

    pub fn resolve(&self, version: Option<SchemaVersion>) -> Option<&FieldSchema> {
        match self {
            VersionedSchema::Global(schema) => Some(schema),
            VersionedSchema::PerMajor(map) => version.and_then(|v| map.get(&v.major())),
        }
    }

    pub fn majors(&self) -> Vec<u32> {
        match self {
            VersionedSchema::Global(_) => Vec::new(),
            VersionedSchema::PerMajor(map) => map.keys().copied().collect(),
        }
    }
}

/// Line layout of one sub-kind of a heterogeneous group.
#[derive(Debug, Clone)]
pub struct SubKindSchema {
    pub id: RecordGroupId,
    pub lines: Vec<VersionedSchema>,
}

/// Registered field lists of one record group.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    group: RecordGroupId,
    lines: Vec<VersionedSchema>,
    sub_kinds: Vec<SubKindSchema>,
}

impl SchemaRegistry {
    /// Single-line group.
    pub fn single(group: RecordGroupId, schema: VersionedSchema) -> Self {
        Self {
            group,
            lines: vec![schema],
            sub_kinds: Vec::new(),
        }
    }

    /// Group whose records span `lines.len()` physical lines.
    pub fn multi_line(group: RecordGroupId, lines: Vec<VersionedSchema>) -> Self {
        Self {
            group,
            lines,
            sub_kinds: Vec::new(),
        }
    }

    /// Add a sub-kind. When sub-kinds are present, the group's own lines act as
    /// the common start used for classification.
    pub fn with_sub_kind(mut self, id: RecordGroupId, lines: Vec<VersionedSchema>) -> Self {
        self.sub_kinds.push(SubKindSchema { id, lines });
        self
    }

    pub fn group(&self) -> &RecordGroupId {
        &self.group
    }

    pub fn has_sub_kinds(&self) -> bool {
        !self.sub_kinds.is_empty()
    }

    pub fn sub_kinds(&self) -> &[SubKindSchema] {
        &self.sub_kinds
    }

    /// Whether records of any sub-kind span more than one physical line.
    pub fn is_multi_line(&self) -> bool {
        self.lines.len() > 1 || self.sub_kinds.iter().any(|k| k.lines.len() > 1)
    }

    /// Largest number of physical lines any record of the group can occupy.
    pub fn max_lines(&self) -> usize {
        self.sub_kinds
            .iter()
            .map(|k| k.lines.len())
            .chain(std::iter::once(self.lines.len()))
            .max()
            .unwrap_or(1)
    }

    /// Number of physical lines a record of `sub_kind` occupies.
    pub fn line_count(&self, sub_kind: Option<usize>) -> CaseResult<usize> {
        match sub_kind {
            None => Ok(self.lines.len()),
            Some(k) => self
                .sub_kinds
                .get(k)
                .map(|s| s.lines.len())
                .ok_or_else(|| self.missing_sub_kind(k)),
        }
    }

    /// Identity under which a record of `sub_kind` is tracked.
    pub fn identity(&self, sub_kind: Option<usize>) -> CaseResult<RecordGroupId> {
        match sub_kind {
            None => Ok(self.group),
            Some(k) => self
                .sub_kinds
                .get(k)
                .map(|s| s.id)
                .ok_or_else(|| self.missing_sub_kind(k)),
        }
    }

    /// The common first-line schema used to bind a record before classifying it.
    pub fn common_start(&self, version: Option<SchemaVersion>) -> CaseResult<FieldSchema> {
        let first = self
            .lines
            .first()
            .ok_or_else(|| CaseError::schema_resolution(self.group, "no field lines registered"))?;
        self.resolve_line(first, version, None)
    }

    /// Per-line schemas for the requested version and sub-kind.
    pub fn line_field_names(
        &self,
        version: Option<SchemaVersion>,
        sub_kind: Option<usize>,
    ) -> CaseResult<Vec<FieldSchema>> {
        let lines = match sub_kind {
            None => &self.lines,
            Some(k) => {
                &self
                    .sub_kinds
                    .get(k)
                    .ok_or_else(|| self.missing_sub_kind(k))?
                    .lines
            }
        };
        lines
            .iter()
            .map(|line| self.resolve_line(line, version, sub_kind))
            .collect()
    }

    /// All lines of the requested version and sub-kind, concatenated.
    pub fn field_names(
        &self,
        version: Option<SchemaVersion>,
        sub_kind: Option<usize>,
    ) -> CaseResult<FieldSchema> {
        let lines = self.line_field_names(version, sub_kind)?;
        Ok(FieldSchema::concat(lines.iter()))
    }

    fn resolve_line(
        &self,
        line: &VersionedSchema,
        version: Option<SchemaVersion>,
        sub_kind: Option<usize>,
    ) -> CaseResult<FieldSchema> {
        line.resolve(version).cloned().ok_or_else(|| {
            let target = match sub_kind.and_then(|k| self.sub_kinds.get(k)) {
                Some(kind) => kind.id.to_string(),
                None => self.group.to_string(),
            };
            let version = version
                .map(|v| v.major().to_string())
                .unwrap_or_else(|| "unspecified".to_string());
            CaseError::schema_resolution(
                target,
                format!("missing field names for version {}", version),
            )
        })
    }

    fn missing_sub_kind(&self, k: usize) -> CaseError {
        CaseError::schema_resolution(self.group, format!("no sub-kind {} registered", k))
    }
}
