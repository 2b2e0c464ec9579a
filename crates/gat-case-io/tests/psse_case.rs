//! Whole-case tests against the PSS/E fixtures in `test_data/psse`.

use std::io::Cursor;
use std::path::PathBuf;

use gat_case_core::{CaseError, FileFormat, SchemaVersion};
use gat_case_io::psse::groups::{
    BUS_ID, GENERATOR_ID, SWITCHED_SHUNT_ID, TRANSFORMER_ID, TWO_WINDING_ID,
};
use gat_case_io::psse::{read_case_file, read_case_file_with, write_case_file, PowerFlowCase};
use gat_case_io::{CodecConfig, Context, LegacyTextReader};
use tempfile::tempdir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .join("test_data/psse")
        .join(name)
}

#[test]
fn reads_v33_raw_fixture() {
    let (case, ctx) = read_case_file(fixture("sample_v33.raw")).unwrap();
    assert_eq!(ctx.version(), Some(SchemaVersion::new(33, 0)));
    assert_eq!(case.caseid.title1, "THREE BUS SAMPLE CASE");
    assert_eq!(case.caseid.title2, "BASE CASE, SUMMER PEAK");

    assert_eq!(case.buses.len(), 3);
    assert_eq!(case.loads.len(), 2);
    assert_eq!(case.generators.len(), 2);
    assert_eq!(case.branches.len(), 1);
    assert_eq!(case.transformers.len(), 2);
    assert_eq!(case.areas.len(), 2);
    assert_eq!(case.zones.len(), 2);
    assert_eq!(case.owners.len(), 1);
    assert_eq!(case.fixed_shunts.len(), 1);
    assert!(case.switched_shunts.is_empty());
    assert!(case.raw_blocks.is_empty());

    assert_eq!(case.buses[2].baskv, 138.0);
    assert_eq!(case.branches[0].rates[1], 650.0);
    assert_eq!(case.generators[0].wpf, 1.0);
    assert!(!case.transformers[0].is_three_winding());
    assert!(case.transformers[1].is_three_winding());
    assert_eq!(case.transformers[1].windings[2].ang, 30.0);
    assert_eq!(case.transformers[1].x3_1, 0.07);
    assert_eq!(case.fixed_shunts[0].bl, 25.0);

    // Generator rows stop after the first owner pair.
    assert_eq!(ctx.field_names(&GENERATOR_ID).unwrap().len(), 20);
    assert_eq!(ctx.line_field_names(&TWO_WINDING_ID).unwrap()[0].len(), 14);
}

#[test]
fn v33_raw_round_trips_through_raw() {
    let (case, ctx) = read_case_file(fixture("sample_v33.raw")).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("copy.raw");
    write_case_file(&case, &ctx, &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("0, 100.0, 33, 0, 1, 60.0\nTHREE BUS SAMPLE CASE\n"));
    assert!(text.contains("0 / END OF BUS DATA, BEGIN LOAD DATA\n"));
    assert!(text.trim_end().ends_with("Q"));
    assert!(!text.contains("@!"));

    let (reread, reread_ctx) = read_case_file(&out).unwrap();
    assert_eq!(reread, case);
    assert_eq!(
        reread_ctx.field_names(&BUS_ID),
        ctx.field_names(&BUS_ID)
    );
}

#[test]
fn v33_raw_converts_to_rawx_and_back() {
    let (case, ctx) = read_case_file(fixture("sample_v33.raw")).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("converted.rawx");
    write_case_file(&case, &ctx, &out).unwrap();

    let (from_json, json_ctx) = read_case_file(&out).unwrap();
    assert_eq!(json_ctx.format(), FileFormat::Json);
    assert_eq!(from_json, case);
}

#[test]
fn reads_v35_raw_fixture() {
    let (case, ctx) = read_case_file(fixture("sample_v35.raw")).unwrap();
    assert_eq!(ctx.version(), Some(SchemaVersion::new(35, 0)));
    assert_eq!(case.caseid.title2, "NODE-BREAKER SUBSTATION AT BUS 1");

    assert_eq!(case.buses.len(), 3);
    assert_eq!(case.buses[0].name, "NORTH       ");
    assert_eq!(case.buses[2].evlo, 0.9);
    assert_eq!(case.loads[0].loadtype, "COMMERCIAL  ");
    assert_eq!(case.fixed_shunts[0].bl, 25.0);
    assert_eq!(case.generators[1].mbase, 100.0);
    assert_eq!(case.branches[0].name, "NORTH-SOUTH                             ");
    assert_eq!(case.branches[0].rates[2], 700.0);
    assert_eq!(case.transformers.len(), 2);
    assert_eq!(case.transformers[1].vecgrp, "YNyn0d1     ");
    assert_eq!(case.transformers[1].windings[2].ang, 30.0);
    assert_eq!(case.switched_shunts[0].swreg, 3);
    assert_eq!(case.switched_shunts[0].blocks[0].steps, 2);
    assert_eq!(case.switched_shunts[0].blocks[1].increment, 10.0);
    assert_eq!(case.switched_shunts[0].blocks[2].status, 0);

    // hint names bind, padding and case ignored
    assert_eq!(ctx.field_names(&BUS_ID).unwrap().names()[1], "name");
    assert_eq!(ctx.field_names(&SWITCHED_SHUNT_ID).unwrap().len(), 36);
    assert_eq!(ctx.field_hints(&TRANSFORMER_ID).map(<[_]>::len), Some(5));

    let raw: Vec<&str> = case.raw_blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(raw, ["SYSTEM-WIDE", "SYSTEM SWITCHING DEVICE", "SUBSTATION"]);
    assert_eq!(case.raw_blocks[0].lines.len(), 4);
    let substation = &case.raw_blocks[2].lines;
    assert_eq!(substation.len(), 13);
    assert_eq!(substation[0], "@!  IS,               'NAME',               LATI,      LONG,     SGR");
    assert_eq!(substation[12], "0 / END OF SUBSTATION EQUIPMENT TERMINAL DATA");
}

#[test]
fn v35_raw_round_trips_with_its_hints() {
    let (case, ctx) = read_case_file(fixture("sample_v35.raw")).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("copy.raw");
    write_case_file(&case, &ctx, &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("BEGIN BUS DATA\n@!i, 'name', baskv, ide, area"));
    assert!(text.contains("BEGIN TRANSFORMER DATA\n@!i, j, k, 'ckt', cw"));
    assert!(text.contains("\n@!windv3, nomv3, ang3, wdg3rate1"));
    assert!(text.contains("\n@!i, 'owname'\n1, 'UTILITY     '\n"));
    assert!(text.contains(
        "0 / END OF SUBSTATION NODE DATA, BEGIN SUBSTATION SWITCHING DEVICE DATA\n"
    ));
    assert!(text.contains("GENERAL, THRSHZ=0.0001, PQBRAK=0.7"));

    let (reread, reread_ctx) = read_case_file(&out).unwrap();
    assert_eq!(reread, case);
    assert_eq!(reread_ctx.field_hints(&TRANSFORMER_ID), ctx.field_hints(&TRANSFORMER_ID));
    assert_eq!(reread_ctx.field_names(&BUS_ID), ctx.field_names(&BUS_ID));
}

#[test]
fn v35_raw_with_unmodelled_blocks_is_not_written_as_rawx() {
    let (case, ctx) = read_case_file(fixture("sample_v35.raw")).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("converted.rawx");
    let err = write_case_file(&case, &ctx, &out).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("SUBSTATION"));
    assert!(message.contains("converted.rawx"));
    assert!(!out.exists());

    let modelled = PowerFlowCase {
        raw_blocks: Vec::new(),
        ..case
    };
    write_case_file(&modelled, &ctx, &out).unwrap();
    let (from_json, _) = read_case_file(&out).unwrap();
    assert_eq!(from_json, modelled);
}

#[test]
fn reads_v35_rawx_fixture() {
    let (case, ctx) = read_case_file(fixture("sample_v35.rawx")).unwrap();
    assert_eq!(ctx.version(), Some(SchemaVersion::new(35, 0)));
    assert_eq!(case.buses[0].name, "NORTH");
    assert_eq!(case.loads[1].loadtype, "RES");
    // null cell keeps the default
    assert_eq!(case.generators[1].pb, -9999.0);
    assert_eq!(case.generators[0].mbase, 250.0);
    assert_eq!(case.branches[0].name, "NORTH-SOUTH");
    assert_eq!(case.transformers[1].windings[2].rates[0], 100.0);
    assert_eq!(case.transformers[1].windings[2].windv, 0.98);
    assert_eq!(ctx.field_names(&TRANSFORMER_ID).unwrap().len(), 35);
}

#[test]
fn v35_rawx_converts_to_raw_and_back() {
    let (case, ctx) = read_case_file(fixture("sample_v35.rawx")).unwrap();
    let dir = tempdir().unwrap();
    let out = dir.path().join("converted.raw");
    write_case_file(&case, &ctx, &out).unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("0 / END OF SYSTEM-WIDE DATA, BEGIN BUS DATA\n"));
    // generator columns are not a prefix of the registered layout
    assert!(text.contains("@!ibus, 'machid', pg"));

    let (reread, reread_ctx) = read_case_file(&out).unwrap();
    assert_eq!(reread_ctx.version(), Some(SchemaVersion::new(35, 0)));
    assert_eq!(reread, case);
}

#[test]
fn configured_session_writes_begin_markers() {
    let config = CodecConfig::from_toml_str("[legacy]\nwrite_begin_markers = true\n").unwrap();
    let ctx = Context::from_config(&config).unwrap();
    let (case, ctx) = read_case_file_with(fixture("sample_v33.raw"), ctx).unwrap();
    assert_eq!(ctx.format(), FileFormat::LegacyText);

    let dir = tempdir().unwrap();
    let out = dir.path().join("markers.raw");
    write_case_file(&case, &ctx, &out).unwrap();
    let (reread, _) = read_case_file(&out).unwrap();
    assert_eq!(reread, case);
}

#[test]
fn early_q_leaves_remaining_groups_empty() {
    let text = "0, 100.0, 33, 0, 0, 60.0\nT1\nT2\n1, 'ONLY', 138.0\nQ\n";
    let mut ctx = Context::open(FileFormat::LegacyText, None);
    let mut reader = LegacyTextReader::new(Cursor::new(text.as_bytes().to_vec()));
    let case = PowerFlowCase::read_legacy(&mut ctx, &mut reader).unwrap();
    assert_eq!(case.buses.len(), 1);
    assert!(case.loads.is_empty());
    assert!(case.owners.is_empty());
}

#[test]
fn unsupported_revision_names_the_version() {
    let text = "0, 100.0, 30, 0, 0, 60.0\nT1\nT2\n1, 'ONLY', 138.0\n0\nQ\n";
    let mut ctx = Context::open(FileFormat::LegacyText, None);
    let mut reader = LegacyTextReader::new(Cursor::new(text.as_bytes().to_vec()));
    let err = PowerFlowCase::read_legacy(&mut ctx, &mut reader).unwrap_err();
    assert!(matches!(err, CaseError::SchemaResolution { .. }));
    assert!(err.to_string().contains("version 30"));
}

#[test]
fn missing_file_reports_the_path() {
    let err = read_case_file("does/not/exist.raw").unwrap_err();
    assert!(format!("{err:#}").contains("does/not/exist.raw"));
}
