//! Engine-level round-trip tests with small record types.

use std::io::Cursor;

use gat_case_core::{
    CaseError, FieldDescriptor, FieldSchema, FileFormat, Record, RecordGroupId, SchemaRegistry,
    SchemaVersion, VersionedSchema,
};
use gat_case_io::tokenizer::{detect_dialect, tokenize, Delimiter};
use gat_case_io::{CodecConfig, Context, JsonDocument, LegacyTextReader, LegacyTextWriter, RecordGroup};
use once_cell::sync::Lazy;

#[derive(Debug, Clone, Default, PartialEq)]
struct Station {
    id: String,
    name: String,
    base_kv: f64,
}

static STATION_FIELDS: Lazy<Vec<FieldDescriptor<Station>>> = Lazy::new(|| {
    vec![
        FieldDescriptor::text("id", |s: &Station| s.id.clone(), |s, v| s.id = v),
        FieldDescriptor::text("name", |s: &Station| s.name.clone(), |s, v| s.name = v),
        FieldDescriptor::float("baseKv", |s: &Station| s.base_kv, |s, v| s.base_kv = v),
    ]
});

impl Record for Station {
    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        &STATION_FIELDS
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Feeder {
    id: String,
    r: f64,
    x: f64,
    rate: f64,
}

impl Default for Feeder {
    fn default() -> Self {
        Self {
            id: String::new(),
            r: 0.0,
            x: 0.0,
            rate: 250.0,
        }
    }
}

static FEEDER_FIELDS: Lazy<Vec<FieldDescriptor<Feeder>>> = Lazy::new(|| {
    vec![
        FieldDescriptor::text("id", |f: &Feeder| f.id.clone(), |f, v| f.id = v),
        FieldDescriptor::float("r", |f: &Feeder| f.r, |f, v| f.r = v),
        FieldDescriptor::float("x", |f: &Feeder| f.x, |f, v| f.x = v),
        FieldDescriptor::float("rate", |f: &Feeder| f.rate, |f, v| f.rate = v),
    ]
});

impl Record for Feeder {
    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        &FEEDER_FIELDS
    }
}

/// Two-line record: line 2 only exists when `kind` is non-zero.
#[derive(Debug, Clone, Default, PartialEq)]
struct Unit {
    i: i64,
    kind: i64,
    tap: f64,
    angle: f64,
}

static UNIT_FIELDS: Lazy<Vec<FieldDescriptor<Unit>>> = Lazy::new(|| {
    vec![
        FieldDescriptor::int("i", |u: &Unit| u.i, |u, v| u.i = v),
        FieldDescriptor::int("kind", |u: &Unit| u.kind, |u, v| u.kind = v),
        FieldDescriptor::float("tap", |u: &Unit| u.tap, |u, v| u.tap = v),
        FieldDescriptor::float("angle", |u: &Unit| u.angle, |u, v| u.angle = v),
    ]
});

impl Record for Unit {
    fn descriptors() -> &'static [FieldDescriptor<Self>] {
        &UNIT_FIELDS
    }
}

const STATION: RecordGroupId = RecordGroupId::data_table("test", "BUS", "bus");
const FEEDER: RecordGroupId = RecordGroupId::data_table("test", "FEEDER", "feeder");
const UNIT: RecordGroupId = RecordGroupId::data_table("test", "UNIT", "unit");
const UNIT_SHORT: RecordGroupId = RecordGroupId::data_table("test", "UNIT", "unit_short");
const UNIT_LONG: RecordGroupId = RecordGroupId::data_table("test", "UNIT", "unit_long");

fn station_group() -> RecordGroup<Station> {
    RecordGroup::new(SchemaRegistry::single(
        STATION,
        VersionedSchema::global(&["id", "name", "baseKv"]),
    ))
    .quoted(&["id", "name"])
}

fn feeder_group() -> RecordGroup<Feeder> {
    RecordGroup::new(SchemaRegistry::single(
        FEEDER,
        VersionedSchema::global(&["id", "r", "x", "rate"]),
    ))
    .quoted(&["id"])
}

fn unit_group() -> RecordGroup<Unit> {
    let head = VersionedSchema::global(&["i", "kind"]);
    let registry = SchemaRegistry::multi_line(UNIT, vec![head.clone()])
        .with_sub_kind(UNIT_SHORT, vec![head.clone()])
        .with_sub_kind(UNIT_LONG, vec![head, VersionedSchema::global(&["tap", "angle"])]);
    RecordGroup::new(registry).classified_by(|u| usize::from(u.kind != 0))
}

fn reader(text: &str) -> LegacyTextReader<Cursor<Vec<u8>>> {
    LegacyTextReader::new(Cursor::new(text.as_bytes().to_vec()))
}

fn legacy_session() -> Context {
    Context::open(FileFormat::LegacyText, Some(SchemaVersion::new(33, 0)))
}

fn write_block<R: Record>(ctx: &Context, group: &RecordGroup<R>, records: &[R]) -> String {
    let mut writer = LegacyTextWriter::new(Vec::new());
    ctx.write(group, records, &mut writer).unwrap();
    writer.flush().unwrap();
    String::from_utf8(writer.into_inner()).unwrap()
}

#[test]
fn mixed_quotes_bind_in_schema_order() {
    let mut ctx = legacy_session();
    let records = ctx
        .read(&station_group(), &mut reader("\"BUS1\", 'NAME', 138.0\n0\n"))
        .unwrap();
    assert_eq!(
        records,
        vec![Station {
            id: "BUS1".to_string(),
            name: "NAME".to_string(),
            base_kv: 138.0,
        }]
    );
}

#[test]
fn optional_trailing_field_is_not_written_back() {
    let mut ctx = legacy_session();
    let group = feeder_group();
    let records = ctx
        .read(&group, &mut reader("\"L1\", 0.01, 0.05\n0\n"))
        .unwrap();
    assert_eq!(records[0].rate, 250.0);

    let written = write_block(&ctx, &group, &records);
    assert_eq!(written.lines().next(), Some("\"L1\", 0.01, 0.05"));
}

#[test]
fn each_block_leaves_the_reader_at_the_next() {
    let text = "\
1, 'A', 138.0
2, 'B', 138.0
3, 'C', 69.0
0 / END OF BUS DATA, BEGIN FEEDER DATA
'F1', 0.1, 0.2, 300.0
0 / END OF FEEDER DATA
Q
";
    let mut ctx = legacy_session();
    let mut input = reader(text);
    let stations = ctx.read(&station_group(), &mut input).unwrap();
    assert_eq!(stations.len(), 3);
    assert_eq!(input.line_number(), 4);

    let feeders = ctx.read(&feeder_group(), &mut input).unwrap();
    assert_eq!(feeders.len(), 1);
    assert_eq!(feeders[0].rate, 300.0);

    // After Q every further read is empty.
    assert!(ctx.read(&station_group(), &mut input).unwrap().is_empty());
    assert!(input.is_q_found());
}

#[test]
fn single_line_sub_kind_keeps_its_slot() {
    let text = "1, 1\n1.05, 30.0\n2, 0\n3, 1\n0.95, -30.0\n0\n";
    let mut ctx = legacy_session();
    let group = unit_group();
    let records = ctx.read(&group, &mut reader(text)).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[1].tap, 0.0);
    assert_eq!(records[2].angle, -30.0);

    let written = write_block(&ctx, &group, &records);
    assert_eq!(
        written,
        "1, 1\n1.05, 30.0\n2, 0\n3, 1\n0.95, -30.0\n0 / END OF UNIT DATA\n"
    );
    let mut reread_ctx = legacy_session();
    let reread = reread_ctx.read(&group, &mut reader(&written)).unwrap();
    assert_eq!(reread, records);
}

#[test]
fn ragged_multi_line_batch_is_rejected() {
    let mut ctx = legacy_session();
    let group = unit_group();
    let records = ctx.read(&group, &mut reader("3, 1\n0.95, -30.0\n0\n")).unwrap();
    ctx.set_line_field_names(
        UNIT_LONG,
        vec![FieldSchema::from_static(&["i", "kind"]), FieldSchema::default()],
    );
    let mut writer = LegacyTextWriter::new(Vec::new());
    let err = ctx.write(&group, &records, &mut writer).unwrap_err();
    assert!(matches!(err, CaseError::Structural { .. }));
}

#[test]
fn unterminated_quote_runs_to_end_of_line() {
    assert_eq!(tokenize("'OPEN, 138.0"), vec!["OPEN, 138.0".to_string()]);

    let mut ctx = legacy_session();
    let records = ctx
        .read(&station_group(), &mut reader("1, 'HALF OPEN\n0\n"))
        .unwrap();
    assert_eq!(records[0].name, "HALF OPEN");
    assert_eq!(records[0].base_kv, 0.0);
}

#[test]
fn comma_wins_over_whitespace() {
    for line in ["1 'A B'  2, 3", "1,2 3", "'X, Y' 4 ,5", "  7 ,8  "] {
        assert_eq!(detect_dialect(line).delimiter, Delimiter::Comma, "{line}");
    }
    assert_eq!(detect_dialect("1 'A,B' 2").delimiter, Delimiter::Whitespace);
}

#[test]
fn legacy_and_json_yield_identical_records() {
    let legacy = "1, 'NORTH', 345.0\n2, 'SOUTH', 138.0\n0\n";
    let json = r#"{"bus": {"fields": ["id", "name", "baseKv"],
                   "data": [["1", "NORTH", 345.0], ["2", "SOUTH", 138.0]]}}"#;

    let mut legacy_ctx = legacy_session();
    let from_legacy = legacy_ctx.read(&station_group(), &mut reader(legacy)).unwrap();

    let mut json_ctx = Context::open(FileFormat::Json, None);
    let mut doc = JsonDocument::parse(json).unwrap();
    let from_json = json_ctx.read(&station_group(), &mut doc).unwrap();

    assert_eq!(from_legacy, from_json);
    assert_eq!(
        legacy_ctx.field_names(&STATION),
        json_ctx.field_names(&STATION)
    );
}

#[test]
fn legacy_block_converts_to_json_with_its_columns() {
    let mut ctx = legacy_session();
    let group = feeder_group();
    let records = ctx
        .read(&group, &mut reader("'L1', 0.01, 0.05\n'L2', 0.02\n0\n"))
        .unwrap();

    let json_ctx = ctx.clone().with_format(FileFormat::Json);
    let mut doc = json_ctx.json_document();
    json_ctx.write(&group, &records, &mut doc).unwrap();
    let node = doc.node("feeder").unwrap();
    assert_eq!(node["fields"], serde_json::json!(["id", "r", "x"]));
    assert_eq!(node["data"][1], serde_json::json!(["L2", 0.02, 0.0]));
}

#[test]
fn configured_whitespace_dialect_applies_to_fresh_groups() {
    let config = CodecConfig::from_toml_str(
        r#"
[session]
format = "legacy_text"
version = "33"

[legacy]
delimiter = "whitespace"
quote = '"'
"#,
    )
    .unwrap();
    let mut ctx = Context::from_config(&config).unwrap();
    let group = station_group();
    ctx.use_default_field_names(&group).unwrap();
    let record = Station {
        id: "7".to_string(),
        name: String::new(),
        base_kv: 13.8,
    };
    let written = write_block(&ctx, &group, &[record]);
    assert_eq!(written, "\"7\" \"\" 13.8\n0 / END OF BUS DATA\n");
}
