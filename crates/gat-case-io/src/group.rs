//! Record Group Engine.
//!
//! A [`RecordGroup`] ties a record type to its schema registry and quoting
//! rules, and turns blocks of tokens into typed records and back.
//!
//! Reading binds the tokens of each row to the resolved field list, position
//! by position, up to the shorter of the two. Trailing fields missing from a
//! row keep their defaults; a row with more tokens than the schema defines is
//! a [`CaseError::FieldCount`]. The field names actually used (the schema
//! prefix covering the widest row) are recorded in the [`Context`], and the
//! matching write emits exactly those columns.
//!
//! A `@!` hint line names the columns of the rows below it. Groups built
//! [`with_field_hint`](RecordGroup::with_field_hint) bind by the hint; every
//! group remembers the hints it read and writes them back.

use std::io::{BufRead, Write};
use std::marker::PhantomData;

use gat_case_core::{
    CaseError, CaseResult, FieldDescriptor, FieldKind, FieldSchema, FieldValue, FileFormat, Record,
    RecordGroupId, SchemaRegistry,
};
use tracing::{debug, info, warn};

use crate::context::{Context, RecordInput, RecordOutput};
use crate::multiline;
use crate::reader::{Block, LegacyTextReader, LegacyTextWriter};
use crate::tokenizer::{detect_dialect, tokenize, Dialect, FIELD_HINT_MARKER};

pub(crate) type Descriptors<R> = Vec<&'static FieldDescriptor<R>>;

/// Read/write definition of one record group.
pub struct RecordGroup<R> {
    registry: SchemaRegistry,
    quoted: &'static [&'static str],
    classify: Option<fn(&R) -> usize>,
    accepts_field_hint: bool,
    text_lines: &'static [&'static str],
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordGroup<R> {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self {
            registry,
            quoted: &[],
            classify: None,
            accepts_field_hint: false,
            text_lines: &[],
            _record: PhantomData,
        }
    }

    /// Fields written between quotes in legacy text.
    pub fn quoted(mut self, fields: &'static [&'static str]) -> Self {
        self.quoted = fields;
        self
    }

    /// Rule selecting the sub-kind of a record bound from the common first line.
    pub fn classified_by(mut self, classify: fn(&R) -> usize) -> Self {
        self.classify = Some(classify);
        self
    }

    /// Take field order from a `@!` hint line when a block carries one.
    pub fn with_field_hint(mut self) -> Self {
        self.accepts_field_hint = true;
        self
    }

    /// Text fields that follow a head record verbatim, one per physical line.
    pub fn with_text_lines(mut self, fields: &'static [&'static str]) -> Self {
        self.text_lines = fields;
        self
    }

    pub fn id(&self) -> RecordGroupId {
        *self.registry.group()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn quoted_fields(&self) -> &'static [&'static str] {
        self.quoted
    }

    pub fn text_lines(&self) -> &'static [&'static str] {
        self.text_lines
    }

    pub fn accepts_field_hint(&self) -> bool {
        self.accepts_field_hint
    }

    /// Whether records span several lines or come in several sub-kinds.
    pub fn is_multi_line(&self) -> bool {
        self.registry.is_multi_line() || self.registry.has_sub_kinds()
    }

    /// Sub-kind of `record`; `None` for homogeneous groups.
    pub fn sub_kind(&self, record: &R) -> Option<usize> {
        if !self.registry.has_sub_kinds() {
            return None;
        }
        Some(self.classify.map(|classify| classify(record)).unwrap_or(0))
    }

    /// Context key under which the field names of `record` are tracked.
    pub fn identity_of(&self, record: &R) -> CaseResult<RecordGroupId> {
        self.registry.identity(self.sub_kind(record))
    }

    pub fn is_quoted(&self, descriptor: &FieldDescriptor<R>) -> bool {
        self.quoted.iter().any(|q| descriptor.matches(q))
    }

    pub(crate) fn descriptors_for(&self, names: &FieldSchema) -> CaseResult<Descriptors<R>> {
        names
            .iter()
            .map(|name| R::descriptor(name).ok_or_else(|| CaseError::unknown_field(self.id(), name)))
            .collect()
    }

    pub(crate) fn check_count(&self, found: usize, expected: usize, record: usize) -> CaseResult<()> {
        if found > expected {
            return Err(CaseError::FieldCount {
                group: self.id().to_string(),
                record,
                found,
                expected,
            });
        }
        Ok(())
    }

    pub(crate) fn conversion_error(
        &self,
        record: usize,
        field: &str,
        value: &str,
        expected: FieldKind,
    ) -> CaseError {
        CaseError::ValueConversion {
            group: self.id().to_string(),
            record,
            field: field.to_string(),
            value: value.to_string(),
            expected,
        }
    }

    /// Bind tokens to descriptors position by position.
    pub(crate) fn bind_text(
        &self,
        record: &mut R,
        descriptors: &[&'static FieldDescriptor<R>],
        tokens: &[String],
        index: usize,
    ) -> CaseResult<()> {
        for (descriptor, token) in descriptors.iter().zip(tokens) {
            descriptor.assign_text(record, token).map_err(|failure| {
                self.conversion_error(index, descriptor.name(), token, failure.expected)
            })?;
        }
        Ok(())
    }

    /// One legacy text line for `record` over the given columns.
    pub(crate) fn format_row(
        &self,
        record: &R,
        descriptors: &[&'static FieldDescriptor<R>],
        dialect: Dialect,
    ) -> String {
        descriptors
            .iter()
            .map(|d| match d.value(record) {
                FieldValue::Text(text) if text.is_empty() || self.is_quoted(d) => {
                    quote_text(&text, dialect)
                }
                value => value.to_text(),
            })
            .collect::<Vec<_>>()
            .join(dialect.separator())
    }

    pub(crate) fn install_default_field_names(&self, ctx: &mut Context) -> CaseResult<()> {
        let version = ctx.version();
        let id = self.id();
        if self.registry.has_sub_kinds() {
            let mut kinds = Vec::new();
            for k in 0..self.registry.sub_kinds().len() {
                let identity = self.registry.identity(Some(k))?;
                let lines = self.registry.line_field_names(version, Some(k))?;
                let names = FieldSchema::concat(lines.iter());
                ctx.set_line_field_names(identity, lines);
                ctx.set_field_names(identity, names.clone());
                kinds.push(names);
            }
            ctx.set_field_names(id, FieldSchema::concat(kinds.iter()));
        } else {
            let lines = self.registry.line_field_names(version, None)?;
            ctx.set_field_names(id, FieldSchema::concat(lines.iter()));
            if self.registry.is_multi_line() {
                ctx.set_line_field_names(id, lines);
            }
        }
        Ok(())
    }

    /// `@!` line naming `names`, quoting the names of quoted fields.
    pub(crate) fn hint_line(&self, names: &FieldSchema, dialect: Dialect) -> String {
        let cells: Vec<String> = names
            .iter()
            .map(|name| match R::descriptor(name) {
                Some(d) if self.is_quoted(d) => quote_text(name, dialect),
                _ => name.to_string(),
            })
            .collect();
        format!("{}{}", FIELD_HINT_MARKER, cells.join(dialect.separator()))
    }

    /// Schema of a block and whether it came from a hint line.
    fn block_schema(
        &self,
        ctx: &Context,
        hints: &[FieldSchema],
    ) -> CaseResult<(FieldSchema, bool)> {
        match hints.last() {
            Some(hint) if self.accepts_field_hint => {
                if hints.len() > 1 {
                    warn!(
                        group = %self.id(),
                        hints = hints.len(),
                        "several field name hints, the last one applies"
                    );
                }
                Ok((hint.clone(), true))
            }
            Some(_) => {
                warn!(group = %self.id(), "field name hint ignored");
                Ok((self.registry.field_names(ctx.version(), None)?, false))
            }
            None => Ok((self.registry.field_names(ctx.version(), None)?, false)),
        }
    }

    pub(crate) fn hint_schemas(&self, block: &Block) -> CaseResult<Vec<FieldSchema>> {
        block
            .field_hints
            .iter()
            .map(|names| FieldSchema::try_from_names(&self.id(), names.iter().cloned()))
            .collect()
    }

    fn read_legacy<B: BufRead>(
        &self,
        ctx: &mut Context,
        reader: &mut LegacyTextReader<B>,
    ) -> CaseResult<Vec<R>> {
        let id = self.id();
        let block = reader.read_records()?;
        if !block.terminated && !block.records.is_empty() {
            return Err(CaseError::structural(
                id,
                format!(
                    "input ended after {} records without a block terminator",
                    block.records.len()
                ),
            ));
        }
        if self.is_multi_line() {
            return multiline::read_block(self, ctx, block);
        }
        self.bind_block(ctx, block)
    }

    fn bind_block(&self, ctx: &mut Context, block: Block) -> CaseResult<Vec<R>> {
        let id = self.id();
        let hints = self.hint_schemas(&block)?;
        let (schema, hinted) = self.block_schema(ctx, &hints)?;
        let descriptors = self.descriptors_for(&schema)?;

        let mut records = Vec::with_capacity(block.records.len());
        let mut widest = 0;
        let mut short_rows = 0;
        for (index, line) in block.records.iter().enumerate() {
            let tokens = tokenize(line);
            self.check_count(tokens.len(), schema.len(), index)?;
            let mut record = R::default();
            self.bind_text(&mut record, &descriptors, &tokens, index)?;
            if tokens.len() < schema.len() {
                short_rows += 1;
            }
            widest = widest.max(tokens.len());
            records.push(record);
        }

        if short_rows > 0 {
            info!(
                group = %id,
                rows = short_rows,
                "rows shorter than the schema keep defaults for trailing fields"
            );
        }
        let observed = if records.is_empty() {
            schema
        } else {
            ctx.set_dialect(block.dialect);
            schema.prefix(widest)
        };
        ctx.set_field_names(id, observed);
        ctx.set_field_hints(id, if hinted { hints } else { Vec::new() });
        debug!(group = %id, records = records.len(), "read legacy block");
        Ok(records)
    }

    fn write_legacy<W: Write>(
        &self,
        ctx: &Context,
        records: &[R],
        writer: &mut LegacyTextWriter<W>,
    ) -> CaseResult<()> {
        let id = self.id();
        let lines = if self.is_multi_line() {
            multiline::render_block(self, ctx, records)?
        } else {
            self.render_block(ctx, records)?
        };

        writer.begin_block(id.legacy_name())?;
        for line in &lines {
            writer.write_line(line)?;
        }
        writer.end_block(Some(id.legacy_name()))?;
        debug!(group = %id, records = records.len(), "wrote legacy block");
        Ok(())
    }

    fn render_block(&self, ctx: &Context, records: &[R]) -> CaseResult<Vec<String>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let names = ctx.require_field_names(&self.id())?;
        let descriptors = self.descriptors_for(names)?;
        let dialect = ctx.dialect();

        let mut lines = Vec::with_capacity(records.len() + 1);
        if self.accepts_field_hint {
            if let Some(hint) = self.hint_to_write(ctx, names) {
                lines.push(self.hint_line(&hint, dialect));
            }
        }
        lines.extend(
            records
                .iter()
                .map(|record| self.format_row(record, &descriptors, dialect)),
        );
        Ok(lines)
    }

    /// The hint read for this group while it still covers `names`, else a
    /// fresh one when `names` cannot bind positionally.
    fn hint_to_write(&self, ctx: &Context, names: &FieldSchema) -> Option<FieldSchema> {
        let recorded = ctx
            .field_hints(&self.id())
            .and_then(|hints| hints.last())
            .filter(|hint| hint.len() >= names.len() && &hint.prefix(names.len()) == names);
        match recorded {
            Some(hint) => Some(hint.clone()),
            None if self.is_registry_prefix(ctx, names) => None,
            None => Some(names.clone()),
        }
    }

    /// Whether `names` bind positionally against the registered schema, in
    /// which case a reader needs no hint line to recover them.
    fn is_registry_prefix(&self, ctx: &Context, names: &FieldSchema) -> bool {
        self.registry
            .field_names(ctx.version(), None)
            .map(|full| {
                full.len() >= names.len()
                    && full
                        .iter()
                        .zip(names.iter())
                        .all(|(a, b)| a.eq_ignore_ascii_case(b))
            })
            .unwrap_or(false)
    }

    /// Split a head schema into the fields of the record line and the
    /// verbatim text lines that follow it.
    fn split_text_lines(&self, names: &FieldSchema) -> (FieldSchema, FieldSchema) {
        let text = FieldSchema::from_static(self.text_lines);
        (names.difference(&text), text)
    }

    fn read_legacy_head<B: BufRead>(
        &self,
        ctx: &mut Context,
        reader: &mut LegacyTextReader<B>,
    ) -> CaseResult<R> {
        let id = self.id();
        let line = reader
            .read_record_line()?
            .ok_or_else(|| CaseError::structural(id, "document ended before the head record"))?;
        let full = self.registry.field_names(ctx.version(), None)?;
        let (line_schema, text_schema) = self.split_text_lines(&full);

        let tokens = tokenize(&line);
        self.check_count(tokens.len(), line_schema.len(), 0)?;
        let mut record = R::default();
        self.bind_text(&mut record, &self.descriptors_for(&line_schema)?, &tokens, 0)?;

        for descriptor in self.descriptors_for(&text_schema)? {
            let text = reader.read_raw_line()?.ok_or_else(|| {
                CaseError::structural(id, format!("document ended before '{}'", descriptor.name()))
            })?;
            descriptor.assign_text(&mut record, &text).map_err(|failure| {
                self.conversion_error(0, descriptor.name(), &text, failure.expected)
            })?;
        }

        ctx.set_dialect(detect_dialect(&line));
        let observed = FieldSchema::concat([&line_schema.prefix(tokens.len()), &text_schema]);
        ctx.set_field_names(id, observed);
        debug!(group = %id, "read legacy head record");
        Ok(record)
    }

    fn write_legacy_head<W: Write>(
        &self,
        ctx: &Context,
        record: &R,
        writer: &mut LegacyTextWriter<W>,
    ) -> CaseResult<()> {
        let names = ctx.require_field_names(&self.id())?;
        let (line_schema, text_schema) = self.split_text_lines(names);
        let line = self.format_row(record, &self.descriptors_for(&line_schema)?, ctx.dialect());
        let text_lines: Vec<String> = self
            .descriptors_for(&text_schema)?
            .iter()
            .map(|d| d.value(record).to_text())
            .collect();

        writer.write_line(&line)?;
        for text in &text_lines {
            writer.write_line(text)?;
        }
        Ok(())
    }
}

/// Wrap `text` in the active quote, or in the other one when the text
/// contains the active quote.
fn quote_text(text: &str, dialect: Dialect) -> String {
    let quote = if text.contains(dialect.quote) && !text.contains(dialect.alternate_quote()) {
        dialect.alternate_quote()
    } else {
        dialect.quote
    };
    format!("{quote}{text}{quote}")
}

impl<B: BufRead> RecordInput for LegacyTextReader<B> {
    const FORMAT: FileFormat = FileFormat::LegacyText;

    fn read_group<R: Record>(
        &mut self,
        ctx: &mut Context,
        group: &RecordGroup<R>,
    ) -> CaseResult<Vec<R>> {
        group.read_legacy(ctx, self)
    }

    fn read_head<R: Record>(&mut self, ctx: &mut Context, group: &RecordGroup<R>) -> CaseResult<R> {
        group.read_legacy_head(ctx, self)
    }
}

impl<W: Write> RecordOutput for LegacyTextWriter<W> {
    const FORMAT: FileFormat = FileFormat::LegacyText;

    fn write_group<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        records: &[R],
    ) -> CaseResult<()> {
        group.write_legacy(ctx, records, self)
    }

    fn write_head<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        record: &R,
    ) -> CaseResult<()> {
        group.write_legacy_head(ctx, record, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gat_case_core::{SchemaVersion, VersionedSchema};
    use once_cell::sync::Lazy;
    use std::io::Cursor;

    #[derive(Debug, Clone, PartialEq)]
    struct Line {
        id: String,
        r: f64,
        x: f64,
        b: f64,
        status: i64,
    }

    impl Default for Line {
        fn default() -> Self {
            Self {
                id: String::new(),
                r: 0.0,
                x: 0.0,
                b: 0.0,
                status: 1,
            }
        }
    }

    static FIELDS: Lazy<Vec<FieldDescriptor<Line>>> = Lazy::new(|| {
        vec![
            FieldDescriptor::text("id", |l: &Line| l.id.clone(), |l, v| l.id = v),
            FieldDescriptor::float("r", |l: &Line| l.r, |l, v| l.r = v),
            FieldDescriptor::float("x", |l: &Line| l.x, |l, v| l.x = v),
            FieldDescriptor::float("b", |l: &Line| l.b, |l, v| l.b = v),
            FieldDescriptor::int("status", |l: &Line| l.status, |l, v| l.status = v)
                .with_aliases(&["stat"]),
        ]
    });

    impl Record for Line {
        fn descriptors() -> &'static [FieldDescriptor<Self>] {
            &FIELDS
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Header {
        ic: i64,
        sbase: f64,
        title: String,
    }

    static HEADER_FIELDS: Lazy<Vec<FieldDescriptor<Header>>> = Lazy::new(|| {
        vec![
            FieldDescriptor::int("ic", |h: &Header| h.ic, |h, v| h.ic = v),
            FieldDescriptor::float("sbase", |h: &Header| h.sbase, |h, v| h.sbase = v),
            FieldDescriptor::text("title", |h: &Header| h.title.clone(), |h, v| h.title = v),
        ]
    });

    impl Record for Header {
        fn descriptors() -> &'static [FieldDescriptor<Self>] {
            &HEADER_FIELDS
        }
    }

    const LINES: RecordGroupId = RecordGroupId::data_table("test", "LINE", "line");
    const HEADER: RecordGroupId = RecordGroupId::parameter_set("test", "HEADER", "header");

    fn line_group() -> RecordGroup<Line> {
        let schema = VersionedSchema::per_major()
            .with_major(33, &["id", "r", "x", "b"])
            .with_major(35, &["id", "r", "x", "b", "stat"]);
        RecordGroup::new(SchemaRegistry::single(LINES, schema)).quoted(&["id"])
    }

    fn header_group() -> RecordGroup<Header> {
        RecordGroup::new(SchemaRegistry::single(
            HEADER,
            VersionedSchema::global(&["ic", "sbase", "title"]),
        ))
        .with_text_lines(&["title"])
    }

    fn session(major: u32) -> Context {
        Context::open(FileFormat::LegacyText, Some(SchemaVersion::new(major, 0)))
    }

    fn reader(text: &str) -> LegacyTextReader<Cursor<Vec<u8>>> {
        LegacyTextReader::new(Cursor::new(text.as_bytes().to_vec()))
    }

    fn write_lines(ctx: &Context, group: &RecordGroup<Line>, records: &[Line]) -> String {
        let mut writer = LegacyTextWriter::new(Vec::new());
        ctx.write(group, records, &mut writer).unwrap();
        writer.flush().unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    #[test]
    fn binds_tokens_positionally() {
        let mut ctx = session(33);
        let mut input = reader("'L1', 0.01, 0.05, 0.1\n0\n");
        let records = ctx.read(&line_group(), &mut input).unwrap();
        assert_eq!(records[0].id, "L1");
        assert_eq!(records[0].x, 0.05);
        assert_eq!(records[0].b, 0.1);
    }

    #[test]
    fn schema_name_without_descriptor_is_reported() {
        let group = RecordGroup::<Header>::new(SchemaRegistry::single(
            HEADER,
            VersionedSchema::global(&["title", "title2", "sbase"]),
        ));
        let mut ctx = session(33);
        let err = ctx.read(&group, &mut reader("'a', 'b', 1.0\n0\n")).unwrap_err();
        match err {
            CaseError::UnknownField { field, .. } => assert_eq!(field, "title2"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn omitted_trailing_fields_round_trip() {
        let mut ctx = session(35);
        let group = line_group();
        let records = ctx.read(&group, &mut reader("\"L1\", 0.01, 0.05\n0\n")).unwrap();
        assert_eq!(records[0].status, 1);
        assert_eq!(ctx.field_names(&LINES).unwrap().names(), &["id", "r", "x"]);

        let written = write_lines(&ctx, &group, &records);
        assert_eq!(written, "\"L1\", 0.01, 0.05\n0 / END OF LINE DATA\n");
    }

    #[test]
    fn widest_row_decides_the_columns() {
        let mut ctx = session(35);
        let text = "'A', 0.1\n'B', 0.2, 0.3, 0.4, 0\n'C'\n0\n'next block'\n0\n";
        let mut input = reader(text);
        let records = ctx.read(&line_group(), &mut input).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].status, 0);
        assert_eq!(ctx.field_names(&LINES).unwrap().len(), 5);

        let next = ctx.read(&line_group(), &mut input).unwrap();
        assert_eq!(next[0].id, "next block");
    }

    #[test]
    fn too_many_tokens_is_a_field_count_error() {
        let mut ctx = session(33);
        let err = ctx
            .read(&line_group(), &mut reader("'A', 1, 2, 3, 4\n0\n"))
            .unwrap_err();
        assert!(matches!(
            err,
            CaseError::FieldCount {
                found: 5,
                expected: 4,
                ..
            }
        ));
    }

    #[test]
    fn bad_number_names_field_and_value() {
        let mut ctx = session(33);
        let err = ctx
            .read(&line_group(), &mut reader("'A', 0.1, abc\n0\n"))
            .unwrap_err();
        match err {
            CaseError::ValueConversion { field, value, record, .. } => {
                assert_eq!(field, "x");
                assert_eq!(value, "abc");
                assert_eq!(record, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unresolvable_version_fails() {
        let mut ctx = session(34);
        let err = ctx.read(&line_group(), &mut reader("'A'\n0\n")).unwrap_err();
        assert!(matches!(err, CaseError::SchemaResolution { .. }));
    }

    #[test]
    fn unterminated_block_is_structural() {
        let mut ctx = session(33);
        let err = ctx.read(&line_group(), &mut reader("'A', 0.1\n")).unwrap_err();
        assert!(matches!(err, CaseError::Structural { .. }));
    }

    #[test]
    fn field_hint_reorders_columns_when_accepted() {
        let text = "@!x, id\n0.5, 'A'\n0\n";
        let mut ctx = session(33);
        let records = ctx
            .read(&line_group().with_field_hint(), &mut reader(text))
            .unwrap();
        assert_eq!(records[0].x, 0.5);
        assert_eq!(records[0].id, "A");

        let mut ctx = session(33);
        let err = ctx.read(&line_group(), &mut reader(text)).unwrap_err();
        assert!(matches!(err, CaseError::ValueConversion { .. }));
    }

    #[test]
    fn hint_line_written_for_reordered_or_hinted_blocks() {
        let group = line_group().with_field_hint();
        let mut ctx = session(33);
        let records = ctx.read(&group, &mut reader("'A', 0.1\n0\n")).unwrap();
        assert_eq!(
            write_lines(&ctx, &group, &records),
            "'A', 0.1\n0 / END OF LINE DATA\n"
        );

        let mut ctx = session(33);
        let records = ctx
            .read(&group, &mut reader("@!x, id\n0.5, 'A'\n0\n"))
            .unwrap();
        assert_eq!(
            write_lines(&ctx, &group, &records),
            "@!x, 'id'\n0.5, 'A'\n0 / END OF LINE DATA\n"
        );
    }

    #[test]
    fn hint_in_registry_order_is_written_back() {
        let group = line_group().with_field_hint();
        let mut ctx = session(35);
        let text = "@!ID, R, X, B, STAT\n'A', 0.1\n0\n";
        let records = ctx.read(&group, &mut reader(text)).unwrap();
        assert_eq!(ctx.field_names(&LINES).unwrap().names(), &["id", "r"]);
        assert_eq!(
            write_lines(&ctx, &group, &records),
            "@!'id', r, x, b, stat\n'A', 0.1\n0 / END OF LINE DATA\n"
        );

        let written = write_lines(&ctx, &group, &records);
        let mut again = session(35);
        let reread = again.read(&group, &mut reader(&written)).unwrap();
        assert_eq!(reread, records);
    }

    #[test]
    fn padded_hint_names_bind() {
        let group = line_group().with_field_hint();
        let mut ctx = session(33);
        let text = "@!'ID        ', 'X '\n'A', 0.5\n0\n";
        let records = ctx.read(&group, &mut reader(text)).unwrap();
        assert_eq!(records[0].x, 0.5);
    }

    #[test]
    fn text_quoting_on_write() {
        let mut ctx = session(33);
        ctx.use_default_field_names(&line_group()).unwrap();
        let group = line_group();
        let records = vec![
            Line {
                id: "it's".to_string(),
                ..Default::default()
            },
            Line::default(),
        ];
        let written = write_lines(&ctx, &group, &records);
        assert_eq!(
            written,
            "\"it's\", 0.0, 0.0, 0.0\n'', 0.0, 0.0, 0.0\n0 / END OF LINE DATA\n"
        );
    }

    #[test]
    fn whitespace_dialect_is_reproduced() {
        let mut ctx = session(33);
        let group = line_group();
        let records = ctx.read(&group, &mut reader("'A'  0.1   0.2\n0\n")).unwrap();
        assert_eq!(records[0].x, 0.2);
        let written = write_lines(&ctx, &group, &records);
        assert_eq!(written, "'A' 0.1 0.2\n0 / END OF LINE DATA\n");
    }

    #[test]
    fn writing_without_names_fails() {
        let ctx = session(33);
        let mut writer = LegacyTextWriter::new(Vec::new());
        let err = ctx
            .write(&line_group(), &[Line::default()], &mut writer)
            .unwrap_err();
        assert!(matches!(err, CaseError::SchemaResolution { .. }));
    }

    #[test]
    fn head_record_with_text_lines() {
        let mut ctx = Context::open(FileFormat::LegacyText, None);
        let mut input = reader("0, 100.0 / comment\nMy / Case\n0\n");
        let header = ctx.read_head(&header_group(), &mut input).unwrap();
        assert_eq!(header.sbase, 100.0);
        assert_eq!(header.title, "My / Case");
        assert_eq!(
            ctx.field_names(&HEADER).unwrap().names(),
            &["ic", "sbase", "title"]
        );

        let mut writer = LegacyTextWriter::new(Vec::new());
        ctx.write_head(&header_group(), &header, &mut writer).unwrap();
        let written = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(written, "0, 100.0\nMy / Case\n");
    }

    #[test]
    fn format_mismatch_is_a_config_error() {
        let mut ctx = Context::open(FileFormat::Json, None);
        let err = ctx.read(&line_group(), &mut reader("0\n")).unwrap_err();
        assert!(matches!(err, CaseError::Config(_)));
    }
}
