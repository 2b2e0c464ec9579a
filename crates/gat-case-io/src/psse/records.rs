//! PSS/E power-flow record types and their descriptor tables.
//!
//! Defaults follow the PSS/E program operation manual, so a field omitted
//! from a record line takes the value PSS/E itself would assume.

use gat_case_core::{FieldDescriptor, Record};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

macro_rules! int_field {
    ($ty:ty, $name:expr, $($field:tt)+) => {
        FieldDescriptor::int($name, |r: &$ty| r.$($field)+, |r, v| r.$($field)+ = v)
    };
}

macro_rules! float_field {
    ($ty:ty, $name:expr, $($field:tt)+) => {
        FieldDescriptor::float($name, |r: &$ty| r.$($field)+, |r, v| r.$($field)+ = v)
    };
}

macro_rules! text_field {
    ($ty:ty, $name:expr, $($field:tt)+) => {
        FieldDescriptor::text($name, |r: &$ty| r.$($field)+.clone(), |r, v| r.$($field)+ = v)
    };
}

macro_rules! ownership_fields {
    ($ty:ty) => {
        [
            int_field!($ty, "o1", owners[0].owner),
            float_field!($ty, "f1", owners[0].fraction),
            int_field!($ty, "o2", owners[1].owner),
            float_field!($ty, "f2", owners[1].fraction),
            int_field!($ty, "o3", owners[2].owner),
            float_field!($ty, "f3", owners[2].fraction),
            int_field!($ty, "o4", owners[3].owner),
            float_field!($ty, "f4", owners[3].fraction),
        ]
    };
}

macro_rules! shunt_block_fields {
    ($($slot:tt => $n:literal),+) => {
        [$(
            int_field!(SwitchedShunt, concat!("s", $n), blocks[$slot].status),
            int_field!(SwitchedShunt, concat!("n", $n), blocks[$slot].steps),
            float_field!(SwitchedShunt, concat!("b", $n), blocks[$slot].increment),
        )+]
    };
}

macro_rules! impl_record {
    ($ty:ty, $table:ident) => {
        impl Record for $ty {
            fn descriptors() -> &'static [FieldDescriptor<Self>] {
                &$table
            }
        }
    };
}

/// Owner number and ownership fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    pub owner: i64,
    pub fraction: f64,
}

fn default_owners() -> [Ownership; 4] {
    let mut owners = [Ownership {
        owner: 0,
        fraction: 1.0,
    }; 4];
    owners[0].owner = 1;
    owners
}

/// Case identification: the head record and its two title lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseIdentification {
    pub ic: i64,
    pub sbase: f64,
    pub rev: i64,
    pub xfrrat: i64,
    pub nxfrat: i64,
    pub basfrq: f64,
    pub title1: String,
    pub title2: String,
}

impl Default for CaseIdentification {
    fn default() -> Self {
        Self {
            ic: 0,
            sbase: 100.0,
            rev: 33,
            xfrrat: 0,
            nxfrat: 0,
            basfrq: 60.0,
            title1: String::new(),
            title2: String::new(),
        }
    }
}

static CASE_IDENTIFICATION_FIELDS: Lazy<Vec<FieldDescriptor<CaseIdentification>>> =
    Lazy::new(|| {
        vec![
            int_field!(CaseIdentification, "ic", ic),
            float_field!(CaseIdentification, "sbase", sbase),
            int_field!(CaseIdentification, "rev", rev),
            int_field!(CaseIdentification, "xfrrat", xfrrat),
            int_field!(CaseIdentification, "nxfrat", nxfrat),
            float_field!(CaseIdentification, "basfrq", basfrq),
            text_field!(CaseIdentification, "title1", title1),
            text_field!(CaseIdentification, "title2", title2),
        ]
    });

impl_record!(CaseIdentification, CASE_IDENTIFICATION_FIELDS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub i: i64,
    pub name: String,
    pub baskv: f64,
    pub ide: i64,
    pub area: i64,
    pub zone: i64,
    pub owner: i64,
    pub vm: f64,
    pub va: f64,
    pub nvhi: f64,
    pub nvlo: f64,
    pub evhi: f64,
    pub evlo: f64,
}

impl Default for Bus {
    fn default() -> Self {
        Self {
            i: 0,
            name: String::new(),
            baskv: 0.0,
            ide: 1,
            area: 1,
            zone: 1,
            owner: 1,
            vm: 1.0,
            va: 0.0,
            nvhi: 1.1,
            nvlo: 0.9,
            evhi: 1.1,
            evlo: 0.9,
        }
    }
}

static BUS_FIELDS: Lazy<Vec<FieldDescriptor<Bus>>> = Lazy::new(|| {
    vec![
        int_field!(Bus, "i", i).with_aliases(&["ibus"]),
        text_field!(Bus, "name", name),
        float_field!(Bus, "baskv", baskv),
        int_field!(Bus, "ide", ide),
        int_field!(Bus, "area", area),
        int_field!(Bus, "zone", zone),
        int_field!(Bus, "owner", owner),
        float_field!(Bus, "vm", vm),
        float_field!(Bus, "va", va),
        float_field!(Bus, "nvhi", nvhi),
        float_field!(Bus, "nvlo", nvlo),
        float_field!(Bus, "evhi", evhi),
        float_field!(Bus, "evlo", evlo),
    ]
});

impl_record!(Bus, BUS_FIELDS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub i: i64,
    pub id: String,
    pub status: i64,
    pub area: i64,
    pub zone: i64,
    pub pl: f64,
    pub ql: f64,
    pub ip: f64,
    pub iq: f64,
    pub yp: f64,
    pub yq: f64,
    pub owner: i64,
    pub scale: i64,
    pub intrpt: i64,
    pub dgenp: f64,
    pub dgenq: f64,
    pub dgenm: i64,
    pub loadtype: String,
}

impl Default for Load {
    fn default() -> Self {
        Self {
            i: 0,
            id: "1".to_string(),
            status: 1,
            area: 1,
            zone: 1,
            pl: 0.0,
            ql: 0.0,
            ip: 0.0,
            iq: 0.0,
            yp: 0.0,
            yq: 0.0,
            owner: 1,
            scale: 1,
            intrpt: 0,
            dgenp: 0.0,
            dgenq: 0.0,
            dgenm: 0,
            loadtype: String::new(),
        }
    }
}

static LOAD_FIELDS: Lazy<Vec<FieldDescriptor<Load>>> = Lazy::new(|| {
    vec![
        int_field!(Load, "i", i).with_aliases(&["ibus"]),
        text_field!(Load, "id", id).with_aliases(&["loadid"]),
        int_field!(Load, "status", status).with_aliases(&["stat"]),
        int_field!(Load, "area", area),
        int_field!(Load, "zone", zone),
        float_field!(Load, "pl", pl),
        float_field!(Load, "ql", ql),
        float_field!(Load, "ip", ip),
        float_field!(Load, "iq", iq),
        float_field!(Load, "yp", yp),
        float_field!(Load, "yq", yq),
        int_field!(Load, "owner", owner),
        int_field!(Load, "scale", scale),
        int_field!(Load, "intrpt", intrpt),
        float_field!(Load, "dgenp", dgenp),
        float_field!(Load, "dgenq", dgenq),
        int_field!(Load, "dgenm", dgenm),
        text_field!(Load, "loadtype", loadtype),
    ]
});

impl_record!(Load, LOAD_FIELDS);

/// Fixed bus shunt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedShunt {
    pub i: i64,
    pub id: String,
    pub status: i64,
    pub gl: f64,
    pub bl: f64,
}

impl Default for FixedShunt {
    fn default() -> Self {
        Self {
            i: 0,
            id: "1".to_string(),
            status: 1,
            gl: 0.0,
            bl: 0.0,
        }
    }
}

static FIXED_SHUNT_FIELDS: Lazy<Vec<FieldDescriptor<FixedShunt>>> = Lazy::new(|| {
    vec![
        int_field!(FixedShunt, "i", i).with_aliases(&["ibus"]),
        text_field!(FixedShunt, "id", id).with_aliases(&["shntid"]),
        int_field!(FixedShunt, "status", status).with_aliases(&["stat"]),
        float_field!(FixedShunt, "gl", gl),
        float_field!(FixedShunt, "bl", bl),
    ]
});

impl_record!(FixedShunt, FIXED_SHUNT_FIELDS);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub i: i64,
    pub id: String,
    pub pg: f64,
    pub qg: f64,
    pub qt: f64,
    pub qb: f64,
    pub vs: f64,
    pub ireg: i64,
    pub nreg: i64,
    pub mbase: f64,
    pub zr: f64,
    pub zx: f64,
    pub rt: f64,
    pub xt: f64,
    pub gtap: f64,
    pub stat: i64,
    pub rmpct: f64,
    pub pt: f64,
    pub pb: f64,
    pub baslod: i64,
    pub owners: [Ownership; 4],
    pub wmod: i64,
    pub wpf: f64,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            i: 0,
            id: "1".to_string(),
            pg: 0.0,
            qg: 0.0,
            qt: 9999.0,
            qb: -9999.0,
            vs: 1.0,
            ireg: 0,
            nreg: 0,
            mbase: 100.0,
            zr: 0.0,
            zx: 1.0,
            rt: 0.0,
            xt: 0.0,
            gtap: 1.0,
            stat: 1,
            rmpct: 100.0,
            pt: 9999.0,
            pb: -9999.0,
            baslod: 0,
            owners: default_owners(),
            wmod: 0,
            wpf: 1.0,
        }
    }
}

static GENERATOR_FIELDS: Lazy<Vec<FieldDescriptor<Generator>>> = Lazy::new(|| {
    let mut fields = vec![
        int_field!(Generator, "i", i).with_aliases(&["ibus"]),
        text_field!(Generator, "id", id).with_aliases(&["machid"]),
        float_field!(Generator, "pg", pg),
        float_field!(Generator, "qg", qg),
        float_field!(Generator, "qt", qt),
        float_field!(Generator, "qb", qb),
        float_field!(Generator, "vs", vs),
        int_field!(Generator, "ireg", ireg),
        int_field!(Generator, "nreg", nreg),
        float_field!(Generator, "mbase", mbase),
        float_field!(Generator, "zr", zr),
        float_field!(Generator, "zx", zx),
        float_field!(Generator, "rt", rt),
        float_field!(Generator, "xt", xt),
        float_field!(Generator, "gtap", gtap),
        int_field!(Generator, "stat", stat),
        float_field!(Generator, "rmpct", rmpct),
        float_field!(Generator, "pt", pt),
        float_field!(Generator, "pb", pb),
        int_field!(Generator, "baslod", baslod),
        int_field!(Generator, "wmod", wmod),
        float_field!(Generator, "wpf", wpf),
    ];
    fields.extend(ownership_fields!(Generator));
    fields
});

impl_record!(Generator, GENERATOR_FIELDS);

/// AC line (non-transformer branch).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonTransformerBranch {
    pub i: i64,
    pub j: i64,
    pub ckt: String,
    pub r: f64,
    pub x: f64,
    pub b: f64,
    pub name: String,
    pub rates: [f64; 12],
    pub gi: f64,
    pub bi: f64,
    pub gj: f64,
    pub bj: f64,
    pub st: i64,
    pub met: i64,
    pub len: f64,
    pub owners: [Ownership; 4],
}

impl Default for NonTransformerBranch {
    fn default() -> Self {
        Self {
            i: 0,
            j: 0,
            ckt: "1".to_string(),
            r: 0.0,
            x: 0.0,
            b: 0.0,
            name: String::new(),
            rates: [0.0; 12],
            gi: 0.0,
            bi: 0.0,
            gj: 0.0,
            bj: 0.0,
            st: 1,
            met: 1,
            len: 0.0,
            owners: default_owners(),
        }
    }
}

static BRANCH_FIELDS: Lazy<Vec<FieldDescriptor<NonTransformerBranch>>> = Lazy::new(|| {
    type B = NonTransformerBranch;
    let mut fields = vec![
        int_field!(B, "i", i).with_aliases(&["ibus"]),
        int_field!(B, "j", j).with_aliases(&["jbus"]),
        text_field!(B, "ckt", ckt),
        float_field!(B, "r", r).with_aliases(&["rpu"]),
        float_field!(B, "x", x).with_aliases(&["xpu"]),
        float_field!(B, "b", b).with_aliases(&["bpu"]),
        text_field!(B, "name", name),
        float_field!(B, "rate1", rates[0]).with_aliases(&["ratea"]),
        float_field!(B, "rate2", rates[1]).with_aliases(&["rateb"]),
        float_field!(B, "rate3", rates[2]).with_aliases(&["ratec"]),
        float_field!(B, "rate4", rates[3]),
        float_field!(B, "rate5", rates[4]),
        float_field!(B, "rate6", rates[5]),
        float_field!(B, "rate7", rates[6]),
        float_field!(B, "rate8", rates[7]),
        float_field!(B, "rate9", rates[8]),
        float_field!(B, "rate10", rates[9]),
        float_field!(B, "rate11", rates[10]),
        float_field!(B, "rate12", rates[11]),
        float_field!(B, "gi", gi),
        float_field!(B, "bi", bi),
        float_field!(B, "gj", gj),
        float_field!(B, "bj", bj),
        int_field!(B, "st", st).with_aliases(&["stat"]),
        int_field!(B, "met", met),
        float_field!(B, "len", len),
    ];
    fields.extend(ownership_fields!(B));
    fields
});

impl_record!(NonTransformerBranch, BRANCH_FIELDS);

/// Data of one transformer winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Winding {
    pub windv: f64,
    pub nomv: f64,
    pub ang: f64,
    pub rates: [f64; 12],
    pub cod: i64,
    pub cont: i64,
    pub node: i64,
    pub rma: f64,
    pub rmi: f64,
    pub vma: f64,
    pub vmi: f64,
    pub ntp: i64,
    pub tab: i64,
    pub cr: f64,
    pub cx: f64,
    pub cnxa: f64,
}

impl Default for Winding {
    fn default() -> Self {
        Self {
            windv: 1.0,
            nomv: 0.0,
            ang: 0.0,
            rates: [0.0; 12],
            cod: 0,
            cont: 0,
            node: 0,
            rma: 1.1,
            rmi: 0.9,
            vma: 1.1,
            vmi: 0.9,
            ntp: 33,
            tab: 0,
            cr: 0.0,
            cx: 0.0,
            cnxa: 0.0,
        }
    }
}

/// Two- or three-winding transformer.
///
/// `k == 0` marks a two-winding transformer (four record lines); any other
/// value is the third bus of a three-winding transformer (five lines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transformer {
    pub i: i64,
    pub j: i64,
    pub k: i64,
    pub ckt: String,
    pub cw: i64,
    pub cz: i64,
    pub cm: i64,
    pub mag1: f64,
    pub mag2: f64,
    pub nmetr: i64,
    pub name: String,
    pub stat: i64,
    pub owners: [Ownership; 4],
    pub vecgrp: String,
    pub zcod: i64,
    pub r1_2: f64,
    pub x1_2: f64,
    pub sbase1_2: f64,
    pub r2_3: f64,
    pub x2_3: f64,
    pub sbase2_3: f64,
    pub r3_1: f64,
    pub x3_1: f64,
    pub sbase3_1: f64,
    pub vmstar: f64,
    pub anstar: f64,
    pub windings: [Winding; 3],
}

impl Transformer {
    pub fn is_three_winding(&self) -> bool {
        self.k != 0
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self {
            i: 0,
            j: 0,
            k: 0,
            ckt: "1".to_string(),
            cw: 1,
            cz: 1,
            cm: 1,
            mag1: 0.0,
            mag2: 0.0,
            nmetr: 2,
            name: String::new(),
            stat: 1,
            owners: default_owners(),
            vecgrp: String::new(),
            zcod: 0,
            r1_2: 0.0,
            x1_2: 0.0,
            sbase1_2: 100.0,
            r2_3: 0.0,
            x2_3: 0.0,
            sbase2_3: 100.0,
            r3_1: 0.0,
            x3_1: 0.0,
            sbase3_1: 100.0,
            vmstar: 1.0,
            anstar: 0.0,
            windings: [Winding::default(), Winding::default(), Winding::default()],
        }
    }
}

macro_rules! winding_fields {
    ($w:tt, $n:literal) => {
        [
            float_field!(Transformer, concat!("windv", $n), windings[$w].windv),
            float_field!(Transformer, concat!("nomv", $n), windings[$w].nomv),
            float_field!(Transformer, concat!("ang", $n), windings[$w].ang),
            float_field!(Transformer, concat!("wdg", $n, "rate1"), windings[$w].rates[0])
                .with_aliases(&[concat!("rata", $n)]),
            float_field!(Transformer, concat!("wdg", $n, "rate2"), windings[$w].rates[1])
                .with_aliases(&[concat!("ratb", $n)]),
            float_field!(Transformer, concat!("wdg", $n, "rate3"), windings[$w].rates[2])
                .with_aliases(&[concat!("ratc", $n)]),
            float_field!(Transformer, concat!("wdg", $n, "rate4"), windings[$w].rates[3]),
            float_field!(Transformer, concat!("wdg", $n, "rate5"), windings[$w].rates[4]),
            float_field!(Transformer, concat!("wdg", $n, "rate6"), windings[$w].rates[5]),
            float_field!(Transformer, concat!("wdg", $n, "rate7"), windings[$w].rates[6]),
            float_field!(Transformer, concat!("wdg", $n, "rate8"), windings[$w].rates[7]),
            float_field!(Transformer, concat!("wdg", $n, "rate9"), windings[$w].rates[8]),
            float_field!(Transformer, concat!("wdg", $n, "rate10"), windings[$w].rates[9]),
            float_field!(Transformer, concat!("wdg", $n, "rate11"), windings[$w].rates[10]),
            float_field!(Transformer, concat!("wdg", $n, "rate12"), windings[$w].rates[11]),
            int_field!(Transformer, concat!("cod", $n), windings[$w].cod),
            int_field!(Transformer, concat!("cont", $n), windings[$w].cont),
            int_field!(Transformer, concat!("node", $n), windings[$w].node),
            float_field!(Transformer, concat!("rma", $n), windings[$w].rma),
            float_field!(Transformer, concat!("rmi", $n), windings[$w].rmi),
            float_field!(Transformer, concat!("vma", $n), windings[$w].vma),
            float_field!(Transformer, concat!("vmi", $n), windings[$w].vmi),
            int_field!(Transformer, concat!("ntp", $n), windings[$w].ntp),
            int_field!(Transformer, concat!("tab", $n), windings[$w].tab),
            float_field!(Transformer, concat!("cr", $n), windings[$w].cr),
            float_field!(Transformer, concat!("cx", $n), windings[$w].cx),
            float_field!(Transformer, concat!("cnxa", $n), windings[$w].cnxa),
        ]
    };
}

static TRANSFORMER_FIELDS: Lazy<Vec<FieldDescriptor<Transformer>>> = Lazy::new(|| {
    type T = Transformer;
    let mut fields = vec![
        int_field!(T, "i", i).with_aliases(&["ibus"]),
        int_field!(T, "j", j).with_aliases(&["jbus"]),
        int_field!(T, "k", k).with_aliases(&["kbus"]),
        text_field!(T, "ckt", ckt),
        int_field!(T, "cw", cw),
        int_field!(T, "cz", cz),
        int_field!(T, "cm", cm),
        float_field!(T, "mag1", mag1),
        float_field!(T, "mag2", mag2),
        int_field!(T, "nmetr", nmetr).with_aliases(&["nmet"]),
        text_field!(T, "name", name),
        int_field!(T, "stat", stat),
        text_field!(T, "vecgrp", vecgrp),
        int_field!(T, "zcod", zcod),
        float_field!(T, "r1_2", r1_2).with_aliases(&["r1-2"]),
        float_field!(T, "x1_2", x1_2).with_aliases(&["x1-2"]),
        float_field!(T, "sbase1_2", sbase1_2).with_aliases(&["sbase1-2"]),
        float_field!(T, "r2_3", r2_3).with_aliases(&["r2-3"]),
        float_field!(T, "x2_3", x2_3).with_aliases(&["x2-3"]),
        float_field!(T, "sbase2_3", sbase2_3).with_aliases(&["sbase2-3"]),
        float_field!(T, "r3_1", r3_1).with_aliases(&["r3-1"]),
        float_field!(T, "x3_1", x3_1).with_aliases(&["x3-1"]),
        float_field!(T, "sbase3_1", sbase3_1).with_aliases(&["sbase3-1"]),
        float_field!(T, "vmstar", vmstar),
        float_field!(T, "anstar", anstar),
    ];
    fields.extend(ownership_fields!(T));
    fields.extend(winding_fields!(0, 1));
    fields.extend(winding_fields!(1, 2));
    fields.extend(winding_fields!(2, 3));
    fields
});

impl_record!(Transformer, TRANSFORMER_FIELDS);

/// Interchange area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub i: i64,
    pub isw: i64,
    pub pdes: f64,
    pub ptol: f64,
    pub arname: String,
}

impl Default for Area {
    fn default() -> Self {
        Self {
            i: 0,
            isw: 0,
            pdes: 0.0,
            ptol: 10.0,
            arname: String::new(),
        }
    }
}

static AREA_FIELDS: Lazy<Vec<FieldDescriptor<Area>>> = Lazy::new(|| {
    vec![
        int_field!(Area, "i", i).with_aliases(&["iarea"]),
        int_field!(Area, "isw", isw),
        float_field!(Area, "pdes", pdes),
        float_field!(Area, "ptol", ptol),
        text_field!(Area, "arname", arname),
    ]
});

impl_record!(Area, AREA_FIELDS);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub i: i64,
    pub zoname: String,
}

static ZONE_FIELDS: Lazy<Vec<FieldDescriptor<Zone>>> = Lazy::new(|| {
    vec![
        int_field!(Zone, "i", i).with_aliases(&["izone"]),
        text_field!(Zone, "zoname", zoname),
    ]
});

impl_record!(Zone, ZONE_FIELDS);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub i: i64,
    pub owname: String,
}

static OWNER_FIELDS: Lazy<Vec<FieldDescriptor<Owner>>> = Lazy::new(|| {
    vec![
        int_field!(Owner, "i", i).with_aliases(&["iowner"]),
        text_field!(Owner, "owname", owname),
    ]
});

impl_record!(Owner, OWNER_FIELDS);

/// One block of a switched shunt: `steps` steps of `increment` MVAr each.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShuntBlock {
    pub status: i64,
    pub steps: i64,
    pub increment: f64,
}

impl Default for ShuntBlock {
    fn default() -> Self {
        Self {
            status: 1,
            steps: 0,
            increment: 0.0,
        }
    }
}

/// Switched shunt with up to eight blocks. Revision 35 adds the shunt id,
/// the regulated node and per-block status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchedShunt {
    pub i: i64,
    pub id: String,
    pub modsw: i64,
    pub adjm: i64,
    pub stat: i64,
    pub vswhi: f64,
    pub vswlo: f64,
    pub swreg: i64,
    pub nreg: i64,
    pub rmpct: f64,
    pub rmidnt: String,
    pub binit: f64,
    pub blocks: [ShuntBlock; 8],
}

impl Default for SwitchedShunt {
    fn default() -> Self {
        Self {
            i: 0,
            id: "1".to_string(),
            modsw: 1,
            adjm: 0,
            stat: 1,
            vswhi: 1.0,
            vswlo: 1.0,
            swreg: 0,
            nreg: 0,
            rmpct: 100.0,
            rmidnt: String::new(),
            binit: 0.0,
            blocks: [ShuntBlock::default(); 8],
        }
    }
}

static SWITCHED_SHUNT_FIELDS: Lazy<Vec<FieldDescriptor<SwitchedShunt>>> = Lazy::new(|| {
    let mut fields = vec![
        int_field!(SwitchedShunt, "i", i).with_aliases(&["ibus"]),
        text_field!(SwitchedShunt, "id", id).with_aliases(&["shntid"]),
        int_field!(SwitchedShunt, "modsw", modsw),
        int_field!(SwitchedShunt, "adjm", adjm),
        int_field!(SwitchedShunt, "stat", stat),
        float_field!(SwitchedShunt, "vswhi", vswhi),
        float_field!(SwitchedShunt, "vswlo", vswlo),
        // swrem until revision 33
        int_field!(SwitchedShunt, "swreg", swreg).with_aliases(&["swrem"]),
        int_field!(SwitchedShunt, "nreg", nreg),
        float_field!(SwitchedShunt, "rmpct", rmpct),
        text_field!(SwitchedShunt, "rmidnt", rmidnt),
        float_field!(SwitchedShunt, "binit", binit),
    ];
    fields.extend(shunt_block_fields!(
        0 => "1", 1 => "2", 2 => "3", 3 => "4", 4 => "5", 5 => "6", 6 => "7", 7 => "8"
    ));
    fields
});

impl_record!(SwitchedShunt, SWITCHED_SHUNT_FIELDS);
