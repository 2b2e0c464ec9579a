//! Multi-line records.
//!
//! Some groups store one logical record across several physical lines, each
//! with its own field list. When the group is heterogeneous, the first line is
//! bound against the common start schema, the group's classifier picks the
//! sub-kind, and the sub-kind's line layout says how many lines the record
//! spans.
//!
//! Field names are tracked per line and per sub-kind identity. The group's
//! own identity receives the union of all sub-kinds, which is what a flat
//! JSON table carries.
//!
//! Lines bind positionally. `@!` hint lines (one per physical line in
//! PSS/E 35 transformer data) are kept in the session and written back ahead
//! of the records.

use std::collections::HashMap;

use gat_case_core::{CaseError, CaseResult, FieldSchema, Record, RecordGroupId};
use tracing::{debug, trace};

use crate::context::Context;
use crate::group::{Descriptors, RecordGroup};
use crate::reader::Block;
use crate::tokenizer::tokenize;

struct Layout<R: 'static> {
    kind: Option<usize>,
    lines: Vec<FieldSchema>,
    descriptors: Vec<Descriptors<R>>,
    widest: Vec<usize>,
    seen: bool,
}

/// Bind a block of multi-line records.
pub(crate) fn read_block<R: Record>(
    group: &RecordGroup<R>,
    ctx: &mut Context,
    block: Block,
) -> CaseResult<Vec<R>> {
    let registry = group.registry();
    let id = group.id();
    let version = ctx.version();
    let hints = group.hint_schemas(&block)?;
    if !hints.is_empty() {
        debug!(group = %id, hints = hints.len(), "field name hints kept for output");
    }

    let kinds: Vec<Option<usize>> = if registry.has_sub_kinds() {
        (0..registry.sub_kinds().len()).map(Some).collect()
    } else {
        vec![None]
    };
    let mut layouts = kinds
        .into_iter()
        .map(|kind| {
            let lines = registry.line_field_names(version, kind)?;
            let descriptors = lines
                .iter()
                .map(|line| group.descriptors_for(line))
                .collect::<CaseResult<Vec<_>>>()?;
            Ok(Layout {
                kind,
                widest: vec![0; lines.len()],
                lines,
                descriptors,
                seen: false,
            })
        })
        .collect::<CaseResult<Vec<_>>>()?;
    let common = if registry.has_sub_kinds() {
        Some(group.descriptors_for(&registry.common_start(version)?)?)
    } else {
        None
    };

    let lines = &block.records;
    let mut records = Vec::new();
    let mut pos = 0;
    while pos < lines.len() {
        let index = records.len();
        let first = tokenize(&lines[pos]);
        let slot = match &common {
            Some(common) => {
                let mut head = R::default();
                let n = first.len().min(common.len());
                group.bind_text(&mut head, common, &first[..n], index)?;
                let slot = group.sub_kind(&head).unwrap_or(0);
                if slot >= layouts.len() {
                    return Err(CaseError::schema_resolution(
                        id,
                        format!("record {} classified as unknown sub-kind {}", index, slot),
                    ));
                }
                trace!(group = %id, record = index, sub_kind = slot, "classified record");
                slot
            }
            None => 0,
        };

        let layout = &mut layouts[slot];
        let needed = layout.lines.len();
        if pos + needed > lines.len() {
            return Err(CaseError::structural(
                id,
                format!(
                    "record {} needs {} lines but the block ends after {}",
                    index,
                    needed,
                    lines.len() - pos
                ),
            ));
        }

        let mut record = R::default();
        for line_pos in 0..needed {
            let tokens = if line_pos == 0 {
                first.clone()
            } else {
                tokenize(&lines[pos + line_pos])
            };
            group.check_count(tokens.len(), layout.lines[line_pos].len(), index)?;
            group.bind_text(&mut record, &layout.descriptors[line_pos], &tokens, index)?;
            layout.widest[line_pos] = layout.widest[line_pos].max(tokens.len());
        }
        layout.seen = true;
        pos += needed;
        records.push(record);
    }

    let mut union = Vec::with_capacity(layouts.len());
    for layout in layouts {
        let identity = registry.identity(layout.kind)?;
        let observed: Vec<FieldSchema> = if layout.seen {
            layout
                .lines
                .iter()
                .zip(&layout.widest)
                .map(|(line, widest)| line.prefix(*widest))
                .collect()
        } else {
            layout.lines
        };
        let names = FieldSchema::concat(observed.iter());
        if layout.kind.is_some() {
            ctx.set_field_names(identity, names.clone());
        }
        ctx.set_line_field_names(identity, observed);
        union.push(names);
    }
    ctx.set_field_names(id, FieldSchema::concat(union.iter()));
    ctx.set_field_hints(id, hints);
    if !records.is_empty() {
        ctx.set_dialect(block.dialect);
    }
    debug!(group = %id, records = records.len(), lines = lines.len(), "read multi-line block");
    Ok(records)
}

/// Render the physical lines of a batch of multi-line records.
///
/// Every line position is rendered for every record first, leaving an empty
/// slot where a record has no line at that position; records are then emitted
/// in order. Each record must fill exactly the line positions its sub-kind
/// declares, otherwise the batch is not rectangular.
pub(crate) fn render_block<R: Record>(
    group: &RecordGroup<R>,
    ctx: &Context,
    records: &[R],
) -> CaseResult<Vec<String>> {
    if records.is_empty() {
        return Ok(Vec::new());
    }
    let registry = group.registry();
    let id = group.id();
    let dialect = ctx.dialect();
    let max_lines = registry.max_lines();

    let kinds: Vec<Option<usize>> = records.iter().map(|r| group.sub_kind(r)).collect();
    let mut layouts: HashMap<RecordGroupId, Vec<Descriptors<R>>> = HashMap::new();
    let mut identities = Vec::with_capacity(records.len());
    for kind in &kinds {
        let identity = registry.identity(*kind)?;
        if !layouts.contains_key(&identity) {
            let descriptors = ctx
                .require_line_field_names(&identity)?
                .iter()
                .map(|line| group.descriptors_for(line))
                .collect::<CaseResult<Vec<_>>>()?;
            layouts.insert(identity, descriptors);
        }
        identities.push(identity);
    }

    let mut grid: Vec<Vec<Option<String>>> = Vec::with_capacity(max_lines);
    for position in 0..max_lines {
        let row = records
            .iter()
            .zip(&identities)
            .map(|(record, identity)| {
                layouts
                    .get(identity)
                    .and_then(|lines| lines.get(position))
                    .filter(|columns| !columns.is_empty())
                    .map(|columns| group.format_row(record, columns, dialect))
            })
            .collect();
        grid.push(row);
    }

    for (index, kind) in kinds.iter().enumerate() {
        let required = registry.line_count(*kind)?;
        let rendered = grid.iter().filter(|row| row[index].is_some()).count();
        let contiguous = grid.iter().take(required).all(|row| row[index].is_some());
        if rendered != required || !contiguous {
            return Err(CaseError::structural(
                id,
                format!(
                    "record {} renders {} of the {} lines its sub-kind requires",
                    index, rendered, required
                ),
            ));
        }
    }

    let mut out: Vec<String> = ctx
        .field_hints(&id)
        .unwrap_or_default()
        .iter()
        .map(|hint| group.hint_line(hint, dialect))
        .collect();
    for index in 0..records.len() {
        for row in grid.iter_mut() {
            if let Some(line) = row[index].take() {
                out.push(line);
            }
        }
    }
    Ok(out)
}

/// Derive per-line field names from the flat field list of a JSON table so a
/// later legacy write can lay the records out. Each line keeps the prefix of
/// its registered schema that covers the columns the table carries.
///
/// Skipped when the registry cannot resolve the session version; a legacy
/// write then reports the missing names itself.
pub(crate) fn adopt_flat_field_names<R: Record>(
    group: &RecordGroup<R>,
    ctx: &mut Context,
    names: &FieldSchema,
) {
    let registry = group.registry();
    let kinds: Vec<Option<usize>> = if registry.has_sub_kinds() {
        (0..registry.sub_kinds().len()).map(Some).collect()
    } else {
        vec![None]
    };
    for kind in kinds {
        let (Ok(identity), Ok(lines)) = (
            registry.identity(kind),
            registry.line_field_names(ctx.version(), kind),
        ) else {
            trace!(group = %group.id(), "no line layout for the session version");
            continue;
        };
        let lines: Vec<FieldSchema> = lines
            .iter()
            .map(|line| line.covering_prefix(names))
            .collect();
        if kind.is_some() {
            ctx.set_field_names(identity, FieldSchema::concat(lines.iter()));
        }
        ctx.set_line_field_names(identity, lines);
    }
}
