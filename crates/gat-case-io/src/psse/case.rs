//! Whole PSS/E power-flow cases.
//!
//! A case is the head record followed by a fixed sequence of blocks whose
//! order depends on the revision. Blocks the codec does not model are kept
//! as raw lines, hint lines and nested sub-blocks included, so a
//! legacy-to-legacy round trip does not drop them. JSON has no place for
//! them: writing a case that holds any to JSON is an error.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::Context as _;
use gat_case_core::{CaseError, CaseResult, FileFormat, SchemaVersion};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::groups::{
    AREA, BRANCH, BUS, CASE_IDENTIFICATION, DATASET, FIXED_SHUNT, GENERATOR, LOAD, OWNER,
    SWITCHED_SHUNT, TRANSFORMER, ZONE,
};
use super::records::{
    Area, Bus, CaseIdentification, FixedShunt, Generator, Load, NonTransformerBranch, Owner,
    SwitchedShunt, Transformer, Zone,
};
use crate::context::Context;
use crate::json::JsonDocument;
use crate::reader::{LegacyTextReader, LegacyTextWriter};

/// Raw lines of a block the codec does not model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    pub name: String,
    pub lines: Vec<String>,
}

/// In-memory PSS/E power-flow case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PowerFlowCase {
    pub caseid: CaseIdentification,
    pub buses: Vec<Bus>,
    pub loads: Vec<Load>,
    pub fixed_shunts: Vec<FixedShunt>,
    pub generators: Vec<Generator>,
    pub branches: Vec<NonTransformerBranch>,
    pub transformers: Vec<Transformer>,
    pub areas: Vec<Area>,
    pub zones: Vec<Zone>,
    pub owners: Vec<Owner>,
    pub switched_shunts: Vec<SwitchedShunt>,
    /// Unmodelled legacy blocks with at least one line, in document order.
    pub raw_blocks: Vec<RawBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Bus,
    Load,
    FixedShunt,
    Generator,
    Branch,
    Transformer,
    Area,
    Zone,
    Owner,
    SwitchedShunt,
    Raw(&'static str),
}

const V33_LAYOUT: &[Section] = &[
    Section::Bus,
    Section::Load,
    Section::FixedShunt,
    Section::Generator,
    Section::Branch,
    Section::Transformer,
    Section::Area,
    Section::Raw("TWO-TERMINAL DC"),
    Section::Raw("VSC DC LINE"),
    Section::Raw("IMPEDANCE CORRECTION"),
    Section::Raw("MULTI-TERMINAL DC"),
    Section::Raw("MULTI-SECTION LINE"),
    Section::Zone,
    Section::Raw("INTER-AREA TRANSFER"),
    Section::Owner,
    Section::Raw("FACTS DEVICE"),
    Section::SwitchedShunt,
    Section::Raw("GNE DEVICE"),
    Section::Raw("INDUCTION MACHINE"),
];

const V35_LAYOUT: &[Section] = &[
    Section::Raw("SYSTEM-WIDE"),
    Section::Bus,
    Section::Load,
    Section::FixedShunt,
    Section::Generator,
    Section::Branch,
    Section::Raw("SYSTEM SWITCHING DEVICE"),
    Section::Transformer,
    Section::Area,
    Section::Raw("TWO-TERMINAL DC"),
    Section::Raw("VSC DC LINE"),
    Section::Raw("IMPEDANCE CORRECTION"),
    Section::Raw("MULTI-TERMINAL DC"),
    Section::Raw("MULTI-SECTION LINE"),
    Section::Zone,
    Section::Raw("INTER-AREA TRANSFER"),
    Section::Owner,
    Section::Raw("FACTS DEVICE"),
    Section::SwitchedShunt,
    Section::Raw("GNE DEVICE"),
    Section::Raw("INDUCTION MACHINE"),
    Section::Raw("SUBSTATION"),
];

/// Sub-blocks opened by each record of an unmodelled block. A substation
/// record is followed by its node, switching device and equipment terminal
/// data, each with its own end line.
fn nested_blocks(name: &str) -> usize {
    match name {
        "SUBSTATION" => 3,
        _ => 0,
    }
}

fn layout(version: Option<SchemaVersion>) -> &'static [Section] {
    match version {
        Some(v) if v.major() >= 35 => V35_LAYOUT,
        _ => V33_LAYOUT,
    }
}

/// Take the session version from the case identification unless one was
/// configured up front.
fn adopt_version(ctx: &mut Context, caseid: &CaseIdentification) -> CaseResult<()> {
    match ctx.version() {
        Some(version) => {
            if i64::from(version.major()) != caseid.rev {
                info!(
                    configured = %version,
                    document = caseid.rev,
                    "configured version overrides the document revision"
                );
            }
        }
        None => ctx.set_version(Some(SchemaVersion::from_revision(caseid.rev)?)),
    }
    Ok(())
}

impl PowerFlowCase {
    pub fn read_legacy<B: BufRead>(
        ctx: &mut Context,
        reader: &mut LegacyTextReader<B>,
    ) -> CaseResult<Self> {
        let caseid = ctx.read_head(&CASE_IDENTIFICATION, reader)?;
        adopt_version(ctx, &caseid)?;
        let mut case = PowerFlowCase {
            caseid,
            ..Default::default()
        };

        for section in layout(ctx.version()) {
            match *section {
                Section::Bus => case.buses = ctx.read(&BUS, reader)?,
                Section::Load => case.loads = ctx.read(&LOAD, reader)?,
                Section::FixedShunt => case.fixed_shunts = ctx.read(&FIXED_SHUNT, reader)?,
                Section::Generator => case.generators = ctx.read(&GENERATOR, reader)?,
                Section::Branch => case.branches = ctx.read(&BRANCH, reader)?,
                Section::Transformer => case.transformers = ctx.read(&TRANSFORMER, reader)?,
                Section::Area => case.areas = ctx.read(&AREA, reader)?,
                Section::Zone => case.zones = ctx.read(&ZONE, reader)?,
                Section::Owner => case.owners = ctx.read(&OWNER, reader)?,
                Section::SwitchedShunt => {
                    case.switched_shunts = ctx.read(&SWITCHED_SHUNT, reader)?
                }
                Section::Raw(name) => {
                    let raw = reader.read_raw_block(nested_blocks(name))?;
                    if !raw.terminated && !raw.lines.is_empty() {
                        return Err(CaseError::structural(
                            name,
                            "input ended inside the block",
                        ));
                    }
                    if raw.records > 0 {
                        debug!(block = name, lines = raw.lines.len(), "kept unmodelled block");
                        case.raw_blocks.push(RawBlock {
                            name: name.to_string(),
                            lines: raw.lines,
                        });
                    }
                }
            }
        }
        if !reader.is_finished() {
            debug!(line = reader.line_number(), "trailing blocks left unread");
        }
        info!(
            version = ?ctx.version(),
            buses = case.buses.len(),
            branches = case.branches.len(),
            transformers = case.transformers.len(),
            "read legacy case"
        );
        Ok(case)
    }

    /// Write every block in revision order and close the document with `Q`.
    pub fn write_legacy<W: Write>(
        &self,
        ctx: &Context,
        writer: &mut LegacyTextWriter<W>,
    ) -> CaseResult<()> {
        ctx.write_head(&CASE_IDENTIFICATION, &self.caseid, writer)?;
        for section in layout(ctx.version()) {
            match *section {
                Section::Bus => ctx.write(&BUS, &self.buses, writer)?,
                Section::Load => ctx.write(&LOAD, &self.loads, writer)?,
                Section::FixedShunt => ctx.write(&FIXED_SHUNT, &self.fixed_shunts, writer)?,
                Section::Generator => ctx.write(&GENERATOR, &self.generators, writer)?,
                Section::Branch => ctx.write(&BRANCH, &self.branches, writer)?,
                Section::Transformer => ctx.write(&TRANSFORMER, &self.transformers, writer)?,
                Section::Area => ctx.write(&AREA, &self.areas, writer)?,
                Section::Zone => ctx.write(&ZONE, &self.zones, writer)?,
                Section::Owner => ctx.write(&OWNER, &self.owners, writer)?,
                Section::SwitchedShunt => {
                    ctx.write(&SWITCHED_SHUNT, &self.switched_shunts, writer)?
                }
                Section::Raw(name) => {
                    writer.begin_block(name)?;
                    for block in self.raw_blocks.iter().filter(|b| b.name == name) {
                        for line in &block.lines {
                            writer.write_line(line)?;
                        }
                    }
                    writer.end_block(Some(name))?;
                }
            }
        }
        writer.finish()
    }

    pub fn read_json(ctx: &mut Context, doc: &mut JsonDocument) -> CaseResult<Self> {
        let caseid = ctx.read_head(&CASE_IDENTIFICATION, doc)?;
        adopt_version(ctx, &caseid)?;
        let case = PowerFlowCase {
            caseid,
            buses: ctx.read(&BUS, doc)?,
            loads: ctx.read(&LOAD, doc)?,
            fixed_shunts: ctx.read(&FIXED_SHUNT, doc)?,
            generators: ctx.read(&GENERATOR, doc)?,
            branches: ctx.read(&BRANCH, doc)?,
            transformers: ctx.read(&TRANSFORMER, doc)?,
            areas: ctx.read(&AREA, doc)?,
            zones: ctx.read(&ZONE, doc)?,
            owners: ctx.read(&OWNER, doc)?,
            switched_shunts: ctx.read(&SWITCHED_SHUNT, doc)?,
            raw_blocks: Vec::new(),
        };
        info!(
            version = ?ctx.version(),
            buses = case.buses.len(),
            branches = case.branches.len(),
            transformers = case.transformers.len(),
            "read JSON case"
        );
        Ok(case)
    }

    /// Write the modelled groups as JSON nodes.
    ///
    /// Fails with [`CaseError::Structural`] when the case still holds
    /// unmodelled legacy blocks, which JSON cannot carry.
    pub fn write_json(&self, ctx: &Context, doc: &mut JsonDocument) -> CaseResult<()> {
        if !self.raw_blocks.is_empty() {
            let names: Vec<&str> = self.raw_blocks.iter().map(|b| b.name.as_str()).collect();
            return Err(CaseError::structural(
                DATASET,
                format!("blocks with no JSON form would be dropped: {}", names.join(", ")),
            ));
        }
        ctx.write_head(&CASE_IDENTIFICATION, &self.caseid, doc)?;
        ctx.write(&BUS, &self.buses, doc)?;
        ctx.write(&LOAD, &self.loads, doc)?;
        ctx.write(&FIXED_SHUNT, &self.fixed_shunts, doc)?;
        ctx.write(&GENERATOR, &self.generators, doc)?;
        ctx.write(&BRANCH, &self.branches, doc)?;
        ctx.write(&TRANSFORMER, &self.transformers, doc)?;
        ctx.write(&AREA, &self.areas, doc)?;
        ctx.write(&ZONE, &self.zones, doc)?;
        ctx.write(&OWNER, &self.owners, doc)?;
        ctx.write(&SWITCHED_SHUNT, &self.switched_shunts, doc)?;
        Ok(())
    }
}

/// Install the registry field names of every modelled group, for a case
/// built in memory rather than read.
///
/// The version must be set first; the caller's version otherwise defaults
/// to the revision in `caseid`.
pub fn use_default_field_names(ctx: &mut Context, caseid: &CaseIdentification) -> CaseResult<()> {
    adopt_version(ctx, caseid)?;
    ctx.use_default_field_names(&CASE_IDENTIFICATION)?;
    ctx.use_default_field_names(&BUS)?;
    ctx.use_default_field_names(&LOAD)?;
    ctx.use_default_field_names(&FIXED_SHUNT)?;
    ctx.use_default_field_names(&GENERATOR)?;
    ctx.use_default_field_names(&BRANCH)?;
    ctx.use_default_field_names(&TRANSFORMER)?;
    ctx.use_default_field_names(&AREA)?;
    ctx.use_default_field_names(&ZONE)?;
    ctx.use_default_field_names(&OWNER)?;
    ctx.use_default_field_names(&SWITCHED_SHUNT)?;
    Ok(())
}

/// Read a case file, choosing the format from its extension.
///
/// Returns the session alongside the case so a later write reproduces the
/// columns of the source.
pub fn read_case_file(path: impl AsRef<Path>) -> anyhow::Result<(PowerFlowCase, Context)> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    read_case_file_with(path, Context::open(format, None))
}

/// Read a case file into an existing session, e.g. one built from a
/// [`crate::CodecConfig`].
pub fn read_case_file_with(
    path: impl AsRef<Path>,
    ctx: Context,
) -> anyhow::Result<(PowerFlowCase, Context)> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let mut ctx = ctx.with_format(format);
    let file =
        File::open(path).with_context(|| format!("opening case file: {}", path.display()))?;
    let case = match format {
        FileFormat::LegacyText => {
            let mut reader = LegacyTextReader::new(BufReader::new(file));
            PowerFlowCase::read_legacy(&mut ctx, &mut reader)
        }
        FileFormat::Json => JsonDocument::from_reader(BufReader::new(file))
            .and_then(|mut doc| PowerFlowCase::read_json(&mut ctx, &mut doc)),
    }
    .with_context(|| format!("reading case file: {}", path.display()))?;
    Ok((case, ctx))
}

/// Write a case file in the format its extension names, using the field
/// names recorded in `ctx`.
pub fn write_case_file(
    case: &PowerFlowCase,
    ctx: &Context,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    let format = detect_format(path)?;
    let ctx = ctx.clone().with_format(format);
    let written = match format {
        FileFormat::LegacyText => {
            let mut writer = ctx.legacy_writer(create_case_file(path)?);
            case.write_legacy(&ctx, &mut writer)
        }
        FileFormat::Json => {
            // a rejected case leaves no file behind
            let mut doc = ctx.json_document();
            case.write_json(&ctx, &mut doc)
                .with_context(|| format!("writing case file: {}", path.display()))?;
            doc.write_to(create_case_file(path)?)
        }
    };
    written.with_context(|| format!("writing case file: {}", path.display()))
}

fn create_case_file(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("creating case file: {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn detect_format(path: &Path) -> anyhow::Result<FileFormat> {
    FileFormat::detect(path)
        .with_context(|| format!("unrecognized case file extension: {}", path.display()))
}
