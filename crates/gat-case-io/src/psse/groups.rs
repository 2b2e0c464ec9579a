//! Record group catalog for PSS/E power-flow cases.
//!
//! Field lists are registered for revisions 32, 33 and 35. Revision 32
//! shares the revision 33 layout except for bus, load and the first
//! transformer line. Reading a group under any other revision fails with a
//! schema resolution error naming the version.

use gat_case_core::{RecordGroupId, SchemaRegistry, VersionedSchema};
use once_cell::sync::Lazy;

use super::records::{
    Area, Bus, CaseIdentification, FixedShunt, Generator, Load, NonTransformerBranch, Owner,
    SwitchedShunt, Transformer, Zone,
};
use crate::group::RecordGroup;

/// Dataset every PSS/E power-flow group belongs to.
pub const DATASET: &str = "power_flow";

pub const CASE_IDENTIFICATION_ID: RecordGroupId =
    RecordGroupId::parameter_set(DATASET, "CASE IDENTIFICATION", "caseid");
pub const BUS_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "BUS", "bus");
pub const LOAD_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "LOAD", "load");
pub const FIXED_SHUNT_ID: RecordGroupId =
    RecordGroupId::data_table(DATASET, "FIXED SHUNT", "fixshunt");
pub const GENERATOR_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "GENERATOR", "generator");
pub const BRANCH_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "BRANCH", "acline");
pub const TRANSFORMER_ID: RecordGroupId =
    RecordGroupId::data_table(DATASET, "TRANSFORMER", "transformer");
pub const TWO_WINDING_ID: RecordGroupId =
    RecordGroupId::data_table(DATASET, "TRANSFORMER", "transformer2");
pub const THREE_WINDING_ID: RecordGroupId =
    RecordGroupId::data_table(DATASET, "TRANSFORMER", "transformer3");
pub const AREA_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "AREA", "area");
pub const ZONE_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "ZONE", "zone");
pub const OWNER_ID: RecordGroupId = RecordGroupId::data_table(DATASET, "OWNER", "owner");
pub const SWITCHED_SHUNT_ID: RecordGroupId =
    RecordGroupId::data_table(DATASET, "SWITCHED SHUNT", "swshunt");

const CASE_IDENTIFICATION_FIELDS: &[&str] = &[
    "ic", "sbase", "rev", "xfrrat", "nxfrat", "basfrq", "title1", "title2",
];

const BUS_V32: &[&str] = &["i", "name", "baskv", "ide", "area", "zone", "owner", "vm", "va"];
const BUS_V33: &[&str] = &[
    "i", "name", "baskv", "ide", "area", "zone", "owner", "vm", "va", "nvhi", "nvlo", "evhi", "evlo",
];
const BUS_V35: &[&str] = &[
    "ibus", "name", "baskv", "ide", "area", "zone", "owner", "vm", "va", "nvhi", "nvlo", "evhi",
    "evlo",
];

const LOAD_V32: &[&str] = &[
    "i", "id", "status", "area", "zone", "pl", "ql", "ip", "iq", "yp", "yq", "owner", "scale",
];
const LOAD_V33: &[&str] = &[
    "i", "id", "status", "area", "zone", "pl", "ql", "ip", "iq", "yp", "yq", "owner", "scale",
    "intrpt",
];
const LOAD_V35: &[&str] = &[
    "ibus", "loadid", "stat", "area", "zone", "pl", "ql", "ip", "iq", "yp", "yq", "owner", "scale",
    "intrpt", "dgenp", "dgenq", "dgenm", "loadtype",
];

const FIXED_SHUNT_V33: &[&str] = &["i", "id", "status", "gl", "bl"];
const FIXED_SHUNT_V35: &[&str] = &["ibus", "shntid", "stat", "gl", "bl"];

const GENERATOR_V33: &[&str] = &[
    "i", "id", "pg", "qg", "qt", "qb", "vs", "ireg", "mbase", "zr", "zx", "rt", "xt", "gtap",
    "stat", "rmpct", "pt", "pb", "o1", "f1", "o2", "f2", "o3", "f3", "o4", "f4", "wmod", "wpf",
];
const GENERATOR_V35: &[&str] = &[
    "ibus", "machid", "pg", "qg", "qt", "qb", "vs", "ireg", "nreg", "mbase", "zr", "zx", "rt",
    "xt", "gtap", "stat", "rmpct", "pt", "pb", "baslod", "o1", "f1", "o2", "f2", "o3", "f3", "o4",
    "f4", "wmod", "wpf",
];

const BRANCH_V33: &[&str] = &[
    "i", "j", "ckt", "r", "x", "b", "ratea", "rateb", "ratec", "gi", "bi", "gj", "bj", "st", "met",
    "len", "o1", "f1", "o2", "f2", "o3", "f3", "o4", "f4",
];
const BRANCH_V35: &[&str] = &[
    "ibus", "jbus", "ckt", "rpu", "xpu", "bpu", "name", "rate1", "rate2", "rate3", "rate4",
    "rate5", "rate6", "rate7", "rate8", "rate9", "rate10", "rate11", "rate12", "gi", "bi", "gj",
    "bj", "stat", "met", "len", "o1", "f1", "o2", "f2", "o3", "f3", "o4", "f4",
];

const TRANSFORMER_LINE1_V32: &[&str] = &[
    "i", "j", "k", "ckt", "cw", "cz", "cm", "mag1", "mag2", "nmetr", "name", "stat", "o1", "f1",
    "o2", "f2", "o3", "f3", "o4", "f4",
];
const TRANSFORMER_LINE1_V33: &[&str] = &[
    "i", "j", "k", "ckt", "cw", "cz", "cm", "mag1", "mag2", "nmetr", "name", "stat", "o1", "f1",
    "o2", "f2", "o3", "f3", "o4", "f4", "vecgrp",
];
const TRANSFORMER_LINE1_V35: &[&str] = &[
    "ibus", "jbus", "kbus", "ckt", "cw", "cz", "cm", "mag1", "mag2", "nmet", "name", "stat", "o1",
    "f1", "o2", "f2", "o3", "f3", "o4", "f4", "vecgrp", "zcod",
];
const TWO_WINDING_IMPEDANCE: &[&str] = &["r1_2", "x1_2", "sbase1_2"];
const THREE_WINDING_IMPEDANCE: &[&str] = &[
    "r1_2", "x1_2", "sbase1_2", "r2_3", "x2_3", "sbase2_3", "r3_1", "x3_1", "sbase3_1", "vmstar",
    "anstar",
];
const SECOND_WINDING_RATIO: &[&str] = &["windv2", "nomv2"];

const WINDING1_V33: &[&str] = &[
    "windv1", "nomv1", "ang1", "rata1", "ratb1", "ratc1", "cod1", "cont1", "rma1", "rmi1", "vma1",
    "vmi1", "ntp1", "tab1", "cr1", "cx1", "cnxa1",
];
const WINDING2_V33: &[&str] = &[
    "windv2", "nomv2", "ang2", "rata2", "ratb2", "ratc2", "cod2", "cont2", "rma2", "rmi2", "vma2",
    "vmi2", "ntp2", "tab2", "cr2", "cx2", "cnxa2",
];
const WINDING3_V33: &[&str] = &[
    "windv3", "nomv3", "ang3", "rata3", "ratb3", "ratc3", "cod3", "cont3", "rma3", "rmi3", "vma3",
    "vmi3", "ntp3", "tab3", "cr3", "cx3", "cnxa3",
];
const WINDING1_V35: &[&str] = &[
    "windv1", "nomv1", "ang1", "wdg1rate1", "wdg1rate2", "wdg1rate3", "wdg1rate4", "wdg1rate5",
    "wdg1rate6", "wdg1rate7", "wdg1rate8", "wdg1rate9", "wdg1rate10", "wdg1rate11", "wdg1rate12",
    "cod1", "cont1", "node1", "rma1", "rmi1", "vma1", "vmi1", "ntp1", "tab1", "cr1", "cx1",
    "cnxa1",
];
const WINDING2_V35: &[&str] = &[
    "windv2", "nomv2", "ang2", "wdg2rate1", "wdg2rate2", "wdg2rate3", "wdg2rate4", "wdg2rate5",
    "wdg2rate6", "wdg2rate7", "wdg2rate8", "wdg2rate9", "wdg2rate10", "wdg2rate11", "wdg2rate12",
    "cod2", "cont2", "node2", "rma2", "rmi2", "vma2", "vmi2", "ntp2", "tab2", "cr2", "cx2",
    "cnxa2",
];
const WINDING3_V35: &[&str] = &[
    "windv3", "nomv3", "ang3", "wdg3rate1", "wdg3rate2", "wdg3rate3", "wdg3rate4", "wdg3rate5",
    "wdg3rate6", "wdg3rate7", "wdg3rate8", "wdg3rate9", "wdg3rate10", "wdg3rate11", "wdg3rate12",
    "cod3", "cont3", "node3", "rma3", "rmi3", "vma3", "vmi3", "ntp3", "tab3", "cr3", "cx3",
    "cnxa3",
];

const AREA_V33: &[&str] = &["i", "isw", "pdes", "ptol", "arname"];
const AREA_V35: &[&str] = &["iarea", "isw", "pdes", "ptol", "arname"];
const ZONE_V33: &[&str] = &["i", "zoname"];
const ZONE_V35: &[&str] = &["izone", "zoname"];
const OWNER_V33: &[&str] = &["i", "owname"];
const OWNER_V35: &[&str] = &["iowner", "owname"];

const SWITCHED_SHUNT_V33: &[&str] = &[
    "i", "modsw", "adjm", "stat", "vswhi", "vswlo", "swrem", "rmpct", "rmidnt", "binit", "n1",
    "b1", "n2", "b2", "n3", "b3", "n4", "b4", "n5", "b5", "n6", "b6", "n7", "b7", "n8", "b8",
];
const SWITCHED_SHUNT_V35: &[&str] = &[
    "ibus", "shntid", "modsw", "adjm", "stat", "vswhi", "vswlo", "swreg", "nreg", "rmpct",
    "rmidnt", "binit", "s1", "n1", "b1", "s2", "n2", "b2", "s3", "n3", "b3", "s4", "n4", "b4",
    "s5", "n5", "b5", "s6", "n6", "b6", "s7", "n7", "b7", "s8", "n8", "b8",
];

fn revisions(v32: &[&str], v33: &[&str], v35: &[&str]) -> VersionedSchema {
    VersionedSchema::per_major()
        .with_major(32, v32)
        .with_major(33, v33)
        .with_major(35, v35)
}

/// Groups whose revision 32 layout is the revision 33 one.
fn by_major(v33: &[&str], v35: &[&str]) -> VersionedSchema {
    revisions(v33, v33, v35)
}

pub static CASE_IDENTIFICATION: Lazy<RecordGroup<CaseIdentification>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(
        CASE_IDENTIFICATION_ID,
        VersionedSchema::global(CASE_IDENTIFICATION_FIELDS),
    ))
    .with_text_lines(&["title1", "title2"])
});

pub static BUS: Lazy<RecordGroup<Bus>> = Lazy::new(|| {
    let schema = revisions(BUS_V32, BUS_V33, BUS_V35);
    RecordGroup::new(SchemaRegistry::single(BUS_ID, schema))
        .quoted(&["name"])
        .with_field_hint()
});

pub static LOAD: Lazy<RecordGroup<Load>> = Lazy::new(|| {
    let schema = revisions(LOAD_V32, LOAD_V33, LOAD_V35);
    RecordGroup::new(SchemaRegistry::single(LOAD_ID, schema))
        .quoted(&["id", "loadtype"])
        .with_field_hint()
});

pub static FIXED_SHUNT: Lazy<RecordGroup<FixedShunt>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(
        FIXED_SHUNT_ID,
        by_major(FIXED_SHUNT_V33, FIXED_SHUNT_V35),
    ))
    .quoted(&["id"])
    .with_field_hint()
});

pub static GENERATOR: Lazy<RecordGroup<Generator>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(
        GENERATOR_ID,
        by_major(GENERATOR_V33, GENERATOR_V35),
    ))
    .quoted(&["id"])
    .with_field_hint()
});

pub static BRANCH: Lazy<RecordGroup<NonTransformerBranch>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(BRANCH_ID, by_major(BRANCH_V33, BRANCH_V35)))
        .quoted(&["ckt", "name"])
        .with_field_hint()
});

/// Two-winding transformers take four lines, three-winding ones five; the
/// third bus number on the first line tells them apart.
pub static TRANSFORMER: Lazy<RecordGroup<Transformer>> = Lazy::new(|| {
    let line1 = revisions(
        TRANSFORMER_LINE1_V32,
        TRANSFORMER_LINE1_V33,
        TRANSFORMER_LINE1_V35,
    );
    let winding1 = by_major(WINDING1_V33, WINDING1_V35);
    let registry = SchemaRegistry::multi_line(TRANSFORMER_ID, vec![line1.clone()])
        .with_sub_kind(
            TWO_WINDING_ID,
            vec![
                line1.clone(),
                VersionedSchema::global(TWO_WINDING_IMPEDANCE),
                winding1.clone(),
                VersionedSchema::global(SECOND_WINDING_RATIO),
            ],
        )
        .with_sub_kind(
            THREE_WINDING_ID,
            vec![
                line1,
                VersionedSchema::global(THREE_WINDING_IMPEDANCE),
                winding1,
                by_major(WINDING2_V33, WINDING2_V35),
                by_major(WINDING3_V33, WINDING3_V35),
            ],
        );
    RecordGroup::new(registry)
        .quoted(&["ckt", "name", "vecgrp"])
        .classified_by(|t| usize::from(t.is_three_winding()))
});

pub static AREA: Lazy<RecordGroup<Area>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(AREA_ID, by_major(AREA_V33, AREA_V35)))
        .quoted(&["arname"])
        .with_field_hint()
});

pub static ZONE: Lazy<RecordGroup<Zone>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(ZONE_ID, by_major(ZONE_V33, ZONE_V35)))
        .quoted(&["zoname"])
        .with_field_hint()
});

pub static OWNER: Lazy<RecordGroup<Owner>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(OWNER_ID, by_major(OWNER_V33, OWNER_V35)))
        .quoted(&["owname"])
        .with_field_hint()
});

pub static SWITCHED_SHUNT: Lazy<RecordGroup<SwitchedShunt>> = Lazy::new(|| {
    RecordGroup::new(SchemaRegistry::single(
        SWITCHED_SHUNT_ID,
        by_major(SWITCHED_SHUNT_V33, SWITCHED_SHUNT_V35),
    ))
    .quoted(&["id", "rmidnt"])
    .with_field_hint()
});
