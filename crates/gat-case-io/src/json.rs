//! JSON codec.
//!
//! Each record group is an object keyed by its node name:
//!
//! ```json
//! {
//!   "network": {
//!     "caseid": {
//!       "fields": ["ic", "sbase", "rev"],
//!       "data": [0, 100.0, 35]
//!     },
//!     "bus": {
//!       "fields": ["ibus", "name", "baskv"],
//!       "data": [
//!         [1, "BUS1", 138.0]
//!       ]
//!     }
//!   }
//! }
//! ```
//!
//! The `fields` array is authoritative: it is recorded in the session as is.
//! Parameter-set groups carry a single flat row in `data`. A row longer than
//! `fields` is a [`CaseError::FieldCount`]; `null` cells keep their default.

use std::io::{Read, Write};

use gat_case_core::{
    CaseError, CaseResult, FieldDescriptor, FieldSchema, FieldValue, FileFormat, Record,
    RecordGroupId,
};
use serde_json::{Map, Value};
use tracing::debug;

use crate::context::{Context, RecordInput, RecordOutput};
use crate::group::RecordGroup;
use crate::multiline;

/// Top-level envelope around the record groups.
pub const NETWORK_NODE: &str = "network";

const FIELDS: &str = "fields";
const DATA: &str = "data";

/// An in-memory JSON case document.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonDocument {
    groups: Map<String, Value>,
    wrap_network: bool,
}

impl Default for JsonDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonDocument {
    pub fn new() -> Self {
        Self {
            groups: Map::new(),
            wrap_network: true,
        }
    }

    pub fn with_network_wrapper(mut self, wrap: bool) -> Self {
        self.wrap_network = wrap;
        self
    }

    pub fn parse(text: &str) -> CaseResult<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    pub fn from_reader<Rd: Read>(reader: Rd) -> CaseResult<Self> {
        Self::from_value(serde_json::from_reader(reader)?)
    }

    /// Accepts both the enveloped form and bare record groups at the top level.
    pub fn from_value(value: Value) -> CaseResult<Self> {
        let Value::Object(mut root) = value else {
            return Err(CaseError::structural(
                "document",
                "top level of a JSON case must be an object",
            ));
        };
        if root.len() == 1 && root.get(NETWORK_NODE).is_some_and(Value::is_object) {
            if let Some(Value::Object(groups)) = root.remove(NETWORK_NODE) {
                return Ok(Self {
                    groups,
                    wrap_network: true,
                });
            }
        }
        Ok(Self {
            groups: root,
            wrap_network: false,
        })
    }

    pub fn is_network_wrapped(&self) -> bool {
        self.wrap_network
    }

    /// Node names in document order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn node(&self, name: &str) -> Option<&Value> {
        self.groups.get(name)
    }

    pub fn to_value(&self) -> Value {
        let groups = Value::Object(self.groups.clone());
        if self.wrap_network {
            let mut root = Map::new();
            root.insert(NETWORK_NODE.to_string(), groups);
            Value::Object(root)
        } else {
            groups
        }
    }

    /// Pretty text with one `fields` array per line and one data row per line.
    pub fn to_pretty_string(&self) -> String {
        let mut out = String::from("{\n");
        let indent = if self.wrap_network {
            out.push_str(&format!("  {}: {{\n", json_string(NETWORK_NODE)));
            "    "
        } else {
            "  "
        };
        let count = self.groups.len();
        for (i, (name, node)) in self.groups.iter().enumerate() {
            render_node(&mut out, indent, name, node);
            out.push_str(if i + 1 < count { ",\n" } else { "\n" });
        }
        if self.wrap_network {
            out.push_str("  }\n");
        }
        out.push_str("}\n");
        out
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> CaseResult<()> {
        writer.write_all(self.to_pretty_string().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    fn read_node<R: Record>(&self, ctx: &mut Context, group: &RecordGroup<R>) -> CaseResult<Vec<R>> {
        let id = group.id();
        let Some(node) = self.groups.get(id.json_node()) else {
            debug!(group = %id, "group absent from JSON document");
            return Ok(Vec::new());
        };
        let (fields, rows) = node_rows(&id, node)?;
        let descriptors = group.descriptors_for(&fields)?;

        let mut records = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            group.check_count(row.len(), fields.len(), index)?;
            let mut record = R::default();
            for (descriptor, cell) in descriptors.iter().zip(row.iter()) {
                bind_cell(group, &mut record, descriptor, cell, index)?;
            }
            records.push(record);
        }

        if group.is_multi_line() {
            multiline::adopt_flat_field_names(group, ctx, &fields);
        }
        ctx.set_field_names(id, fields);
        ctx.set_field_hints(id, Vec::new());
        debug!(group = %id, records = records.len(), "read JSON group");
        Ok(records)
    }

    fn write_node<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        records: &[R],
    ) -> CaseResult<()> {
        let id = group.id();
        if records.is_empty() && ctx.field_names(&id).is_none() {
            return Ok(());
        }
        let names = ctx.require_field_names(&id)?;
        let descriptors = group.descriptors_for(names)?;
        let mut rows: Vec<Value> = records
            .iter()
            .map(|record| Value::Array(descriptors.iter().map(|d| d.value(record).to_json()).collect()))
            .collect();

        let data = if id.is_parameter_set() {
            match rows.len() {
                0 => Value::Array(Vec::new()),
                1 => rows.swap_remove(0),
                n => {
                    return Err(CaseError::structural(
                        id,
                        format!("a parameter set holds one row, found {}", n),
                    ))
                }
            }
        } else {
            Value::Array(rows)
        };

        let mut node = Map::new();
        node.insert(
            FIELDS.to_string(),
            Value::Array(names.iter().map(|n| Value::String(n.to_string())).collect()),
        );
        node.insert(DATA.to_string(), data);
        self.groups.insert(id.json_node().to_string(), Value::Object(node));
        debug!(group = %id, records = records.len(), "wrote JSON group");
        Ok(())
    }
}

fn node_rows<'a>(id: &RecordGroupId, node: &'a Value) -> CaseResult<(FieldSchema, Vec<&'a [Value]>)> {
    let object = node
        .as_object()
        .ok_or_else(|| CaseError::structural(id, "group node is not an object"))?;
    let names = object
        .get(FIELDS)
        .and_then(Value::as_array)
        .ok_or_else(|| CaseError::structural(id, "missing 'fields' array"))?
        .iter()
        .map(|f| {
            f.as_str()
                .map(str::to_string)
                .ok_or_else(|| CaseError::structural(id, "field names must be strings"))
        })
        .collect::<CaseResult<Vec<_>>>()?;
    let fields = FieldSchema::try_from_names(id, names)?;

    let data = match object.get(DATA) {
        None | Some(Value::Null) => return Ok((fields, Vec::new())),
        Some(Value::Array(data)) => data,
        Some(_) => return Err(CaseError::structural(id, "'data' is not an array")),
    };
    let flat = id.is_parameter_set() && !data.first().is_some_and(Value::is_array);
    let rows = if flat {
        if data.is_empty() {
            Vec::new()
        } else {
            vec![data.as_slice()]
        }
    } else {
        data.iter()
            .map(|row| {
                row.as_array()
                    .map(Vec::as_slice)
                    .ok_or_else(|| CaseError::structural(id, "data rows must be arrays"))
            })
            .collect::<CaseResult<Vec<_>>>()?
    };
    Ok((fields, rows))
}

fn bind_cell<R: Record>(
    group: &RecordGroup<R>,
    record: &mut R,
    descriptor: &FieldDescriptor<R>,
    cell: &Value,
    index: usize,
) -> CaseResult<()> {
    let invalid = |expected| group.conversion_error(index, descriptor.name(), &cell.to_string(), expected);
    let value = match cell {
        Value::Null => return Ok(()),
        Value::Bool(b) => FieldValue::Int(i64::from(*b)),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(v), _) => FieldValue::Int(v),
            (None, Some(v)) => FieldValue::Float(v),
            (None, None) => return Err(invalid(descriptor.kind())),
        },
        Value::String(s) => FieldValue::Text(s.clone()),
        Value::Array(_) | Value::Object(_) => return Err(invalid(descriptor.kind())),
    };
    descriptor
        .assign(record, value)
        .map_err(|failure| invalid(failure.expected))
}

fn json_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn compact(value: &Value) -> String {
    match value {
        Value::Array(items) => format!(
            "[{}]",
            items.iter().map(compact).collect::<Vec<_>>().join(", ")
        ),
        other => other.to_string(),
    }
}

fn render_node(out: &mut String, indent: &str, name: &str, node: &Value) {
    let Value::Object(members) = node else {
        out.push_str(&format!("{}{}: {}", indent, json_string(name), compact(node)));
        return;
    };
    out.push_str(&format!("{}{}: {{\n", indent, json_string(name)));
    let inner = format!("{}  ", indent);
    let count = members.len();
    for (i, (key, value)) in members.iter().enumerate() {
        match value {
            Value::Array(rows) if rows.iter().any(Value::is_array) => {
                out.push_str(&format!("{}{}: [\n", inner, json_string(key)));
                for (r, row) in rows.iter().enumerate() {
                    let sep = if r + 1 < rows.len() { "," } else { "" };
                    out.push_str(&format!("{}  {}{}\n", inner, compact(row), sep));
                }
                out.push_str(&format!("{}]", inner));
            }
            other => out.push_str(&format!("{}{}: {}", inner, json_string(key), compact(other))),
        }
        out.push_str(if i + 1 < count { ",\n" } else { "\n" });
    }
    out.push_str(&format!("{}}}", indent));
}

impl RecordInput for JsonDocument {
    const FORMAT: FileFormat = FileFormat::Json;

    fn read_group<R: Record>(
        &mut self,
        ctx: &mut Context,
        group: &RecordGroup<R>,
    ) -> CaseResult<Vec<R>> {
        self.read_node(ctx, group)
    }

    fn read_head<R: Record>(&mut self, ctx: &mut Context, group: &RecordGroup<R>) -> CaseResult<R> {
        let id = group.id();
        let mut records = self.read_node(ctx, group)?;
        match records.len() {
            1 => Ok(records.swap_remove(0)),
            0 => Err(CaseError::structural(id, "head group missing from JSON document")),
            n => Err(CaseError::structural(
                id,
                format!("head group holds one row, found {}", n),
            )),
        }
    }
}

impl RecordOutput for JsonDocument {
    const FORMAT: FileFormat = FileFormat::Json;

    fn write_group<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        records: &[R],
    ) -> CaseResult<()> {
        self.write_node(ctx, group, records)
    }

    fn write_head<R: Record>(
        &mut self,
        ctx: &Context,
        group: &RecordGroup<R>,
        record: &R,
    ) -> CaseResult<()> {
        self.write_node(ctx, group, std::slice::from_ref(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gat_case_core::{SchemaRegistry, VersionedSchema};
    use once_cell::sync::Lazy;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Area {
        i: i64,
        pdes: f64,
        name: String,
    }

    static FIELDS: Lazy<Vec<FieldDescriptor<Area>>> = Lazy::new(|| {
        vec![
            FieldDescriptor::int("i", |a: &Area| a.i, |a, v| a.i = v).with_aliases(&["iarea"]),
            FieldDescriptor::float("pdes", |a: &Area| a.pdes, |a, v| a.pdes = v),
            FieldDescriptor::text("arname", |a: &Area| a.name.clone(), |a, v| a.name = v),
        ]
    });

    impl Record for Area {
        fn descriptors() -> &'static [FieldDescriptor<Self>] {
            &FIELDS
        }
    }

    const AREA: RecordGroupId = RecordGroupId::data_table("power_flow", "AREA", "area");
    const CASE: RecordGroupId = RecordGroupId::parameter_set("power_flow", "CASE", "caseid");

    fn area_group() -> RecordGroup<Area> {
        RecordGroup::new(SchemaRegistry::single(
            AREA,
            VersionedSchema::global(&["i", "pdes", "arname"]),
        ))
    }

    fn case_group() -> RecordGroup<Area> {
        RecordGroup::new(SchemaRegistry::single(
            CASE,
            VersionedSchema::global(&["i", "pdes", "arname"]),
        ))
    }

    #[test]
    fn fields_array_is_authoritative() {
        let mut doc = JsonDocument::parse(
            r#"{"network": {"area": {"fields": ["iarea", "arname"], "data": [[1, "NORTH"], [2, null]]}}}"#,
        )
        .unwrap();
        assert!(doc.is_network_wrapped());
        let mut ctx = Context::open(FileFormat::Json, None);
        let areas = ctx.read(&area_group(), &mut doc).unwrap();
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[0].name, "NORTH");
        assert_eq!(areas[1].name, "");
        assert_eq!(ctx.field_names(&AREA).unwrap().names(), &["iarea", "arname"]);
    }

    #[test]
    fn short_rows_bind_and_long_rows_fail() {
        let mut doc = JsonDocument::parse(
            r#"{"area": {"fields": ["i", "pdes"], "data": [[1], [2, 5.0, 9]]}}"#,
        )
        .unwrap();
        let mut ctx = Context::open(FileFormat::Json, None);
        let err = ctx.read(&area_group(), &mut doc).unwrap_err();
        assert!(matches!(err, CaseError::FieldCount { record: 1, found: 3, expected: 2, .. }));
    }

    #[test]
    fn wrong_cell_type_reports_field() {
        let mut doc =
            JsonDocument::parse(r#"{"area": {"fields": ["i", "pdes"], "data": [[1, "lots"]]}}"#)
                .unwrap();
        let mut ctx = Context::open(FileFormat::Json, None);
        match ctx.read(&area_group(), &mut doc).unwrap_err() {
            CaseError::ValueConversion { field, value, .. } => {
                assert_eq!(field, "pdes");
                assert_eq!(value, "\"lots\"");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parameter_set_is_a_flat_row() {
        let mut doc = JsonDocument::parse(
            r#"{"caseid": {"fields": ["i", "pdes", "arname"], "data": [0, 100.0, "TITLE"]}}"#,
        )
        .unwrap();
        let mut ctx = Context::open(FileFormat::Json, None);
        let head = ctx.read_head(&case_group(), &mut doc).unwrap();
        assert_eq!(head.pdes, 100.0);

        let mut out = ctx.json_document().with_network_wrapper(false);
        ctx.write_head(&case_group(), &head, &mut out).unwrap();
        assert_eq!(
            out.to_value(),
            serde_json::json!({"caseid": {"fields": ["i", "pdes", "arname"], "data": [0, 100.0, "TITLE"]}})
        );
    }

    #[test]
    fn pretty_output_round_trips() {
        let mut ctx = Context::open(FileFormat::Json, None);
        ctx.use_default_field_names(&area_group()).unwrap();
        let areas = vec![
            Area { i: 1, pdes: 10.5, name: "NORTH".into() },
            Area { i: 2, pdes: 0.0, name: "SOUTH".into() },
        ];
        let mut doc = ctx.json_document();
        ctx.write(&area_group(), &areas, &mut doc).unwrap();
        let text = doc.to_pretty_string();
        assert!(text.contains("      \"fields\": [\"i\", \"pdes\", \"arname\"],\n"));
        assert!(text.contains("        [1, 10.5, \"NORTH\"],\n"));

        let mut reread = JsonDocument::parse(&text).unwrap();
        let back = ctx.read(&area_group(), &mut reread).unwrap();
        assert_eq!(back, areas);
    }

    #[test]
    fn unread_group_needs_defaults_before_write() {
        let ctx = Context::open(FileFormat::Json, None);
        let mut doc = ctx.json_document();
        let err = ctx
            .write(&area_group(), &[Area::default()], &mut doc)
            .unwrap_err();
        assert!(matches!(err, CaseError::SchemaResolution { .. }));
        ctx.write(&area_group(), &[], &mut doc).unwrap();
        assert!(doc.node("area").is_none());
    }
}
