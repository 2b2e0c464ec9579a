//! Round-trip context: the state of one read or write session.
//!
//! A [`Context`] carries the active format and schema version, the dialect
//! detected on the last block read, and the field names actually observed
//! for each record group. Writing a group consults those names so that the
//! columns present in the source come back out, and no others.
//!
//! A context belongs to one session and one thread at a time. It holds no
//! locks; callers running sessions concurrently give each its own context.

use std::collections::HashMap;
use std::io::Write;

use gat_case_core::{CaseError, CaseResult, FieldSchema, FileFormat, Record, RecordGroupId, SchemaVersion};

use crate::config::CodecConfig;
use crate::group::RecordGroup;
use crate::json::JsonDocument;
use crate::reader::LegacyTextWriter;
use crate::tokenizer::Dialect;

/// A source of record groups in one format.
pub trait RecordInput {
    const FORMAT: FileFormat;

    fn read_group<R: Record>(
        &mut self,
        ctx: &mut Context,
        group: &RecordGroup<R>,
    ) -> CaseResult<Vec<R>>;

    fn read_head<R: Record>(&mut self, ctx: &mut Context, group: &RecordGroup<R>) -> CaseResult<R>;
}

/// A sink of record groups in one format.
pub trait RecordOutput {
    const FORMAT: FileFormat;

    fn write_group<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        records: &[R],
    ) -> CaseResult<()>;

    fn write_head<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        record: &R,
    ) -> CaseResult<()>;
}

/// Session state shared by every read and write of one document.
#[derive(Debug, Clone)]
pub struct Context {
    format: FileFormat,
    version: Option<SchemaVersion>,
    dialect: Dialect,
    write_begin_markers: bool,
    wrap_network: bool,
    field_names: HashMap<RecordGroupId, FieldSchema>,
    line_field_names: HashMap<RecordGroupId, Vec<FieldSchema>>,
    field_hints: HashMap<RecordGroupId, Vec<FieldSchema>>,
}

impl Context {
    /// Open a session for `format`. The version may be left out and set once
    /// it is known from the document itself.
    pub fn open(format: FileFormat, version: Option<SchemaVersion>) -> Self {
        Self {
            format,
            version,
            dialect: Dialect::default(),
            write_begin_markers: false,
            wrap_network: true,
            field_names: HashMap::new(),
            line_field_names: HashMap::new(),
            field_hints: HashMap::new(),
        }
    }

    pub fn from_config(config: &CodecConfig) -> CaseResult<Self> {
        let mut ctx = Self::open(config.session.format, config.version()?);
        ctx.dialect = config.dialect()?;
        ctx.write_begin_markers = config.legacy.write_begin_markers;
        ctx.wrap_network = config.json.wrap_network;
        Ok(ctx)
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    /// Same session state under another format, for converting documents.
    pub fn with_format(mut self, format: FileFormat) -> Self {
        self.format = format;
        self
    }

    pub fn version(&self) -> Option<SchemaVersion> {
        self.version
    }

    pub fn set_version(&mut self, version: Option<SchemaVersion>) {
        self.version = version;
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn set_dialect(&mut self, dialect: Dialect) {
        self.dialect = dialect;
    }

    pub fn write_begin_markers(&self) -> bool {
        self.write_begin_markers
    }

    pub fn wrap_network(&self) -> bool {
        self.wrap_network
    }

    pub fn set_field_names(&mut self, group: RecordGroupId, names: FieldSchema) {
        self.field_names.insert(group, names);
    }

    pub fn field_names(&self, group: &RecordGroupId) -> Option<&FieldSchema> {
        self.field_names.get(group)
    }

    pub fn set_line_field_names(&mut self, group: RecordGroupId, lines: Vec<FieldSchema>) {
        self.line_field_names.insert(group, lines);
    }

    pub fn line_field_names(&self, group: &RecordGroupId) -> Option<&[FieldSchema]> {
        self.line_field_names.get(group).map(Vec::as_slice)
    }

    /// Record the `@!` hint lines a legacy block carried, so writing the
    /// group emits them again. An empty list forgets them.
    pub fn set_field_hints(&mut self, group: RecordGroupId, hints: Vec<FieldSchema>) {
        if hints.is_empty() {
            self.field_hints.remove(&group);
        } else {
            self.field_hints.insert(group, hints);
        }
    }

    pub fn field_hints(&self, group: &RecordGroupId) -> Option<&[FieldSchema]> {
        self.field_hints.get(group).map(Vec::as_slice)
    }

    /// Install the registry's field names for a group that was not read in
    /// this session, so it can be written.
    pub fn use_default_field_names<R: Record>(&mut self, group: &RecordGroup<R>) -> CaseResult<()> {
        group.install_default_field_names(self)
    }

    /// Read one record group.
    pub fn read<R: Record, I: RecordInput>(
        &mut self,
        group: &RecordGroup<R>,
        input: &mut I,
    ) -> CaseResult<Vec<R>> {
        self.check_format(I::FORMAT)?;
        input.read_group(self, group)
    }

    /// Read the single record of a parameter-set group at the head of a document.
    pub fn read_head<R: Record, I: RecordInput>(
        &mut self,
        group: &RecordGroup<R>,
        input: &mut I,
    ) -> CaseResult<R> {
        self.check_format(I::FORMAT)?;
        input.read_head(self, group)
    }

    /// Write one record group with the field names recorded for it.
    pub fn write<R: Record, O: RecordOutput>(
        &self,
        group: &RecordGroup<R>,
        records: &[R],
        output: &mut O,
    ) -> CaseResult<()> {
        self.check_format(O::FORMAT)?;
        output.write_group(self, group, records)
    }

    pub fn write_head<R: Record, O: RecordOutput>(
        &self,
        group: &RecordGroup<R>,
        record: &R,
        output: &mut O,
    ) -> CaseResult<()> {
        self.check_format(O::FORMAT)?;
        output.write_head(self, group, record)
    }

    /// Legacy writer configured for this session.
    pub fn legacy_writer<W: Write>(&self, inner: W) -> LegacyTextWriter<W> {
        LegacyTextWriter::new(inner).with_begin_markers(self.write_begin_markers)
    }

    /// Empty JSON document configured for this session.
    pub fn json_document(&self) -> JsonDocument {
        JsonDocument::new().with_network_wrapper(self.wrap_network)
    }

    /// Field names to write for `group`, or a resolution error naming the remedy.
    pub(crate) fn require_field_names(&self, group: &RecordGroupId) -> CaseResult<&FieldSchema> {
        self.field_names(group).ok_or_else(|| missing_names(group))
    }

    pub(crate) fn require_line_field_names(
        &self,
        group: &RecordGroupId,
    ) -> CaseResult<&[FieldSchema]> {
        self.line_field_names(group).ok_or_else(|| missing_names(group))
    }

    fn check_format(&self, format: FileFormat) -> CaseResult<()> {
        if format == self.format {
            Ok(())
        } else {
            Err(CaseError::Config(format!(
                "session format is {} but the document is {}",
                self.format, format
            )))
        }
    }
}

fn missing_names(group: &RecordGroupId) -> CaseError {
    CaseError::schema_resolution(
        group,
        "no field names in this session; read the group first or install defaults",
    )
}
