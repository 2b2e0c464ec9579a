//! PSS/E power-flow cases in RAW (legacy text) and RAWX (JSON) form.
//!
//! [`groups`] registers the modelled record groups with their per-revision
//! field lists; [`records`] holds the record types; [`case`] reads and writes
//! whole documents.
//!
//! ```rust,no_run
//! use gat_case_io::psse::{read_case_file, write_case_file};
//!
//! # fn main() -> anyhow::Result<()> {
//! let (mut case, ctx) = read_case_file("grid_v33.raw")?;
//! case.loads.iter_mut().for_each(|load| load.pl *= 1.1);
//! write_case_file(&case, &ctx, "grid_v33_scaled.raw")?;
//! # Ok(())
//! # }
//! ```

pub mod case;
pub mod groups;
pub mod records;

pub use case::{
    read_case_file, read_case_file_with, use_default_field_names, write_case_file, PowerFlowCase,
    RawBlock,
};
pub use records::{
    Area, Bus, CaseIdentification, FixedShunt, Generator, Load, NonTransformerBranch, Owner,
    Ownership, ShuntBlock, SwitchedShunt, Transformer, Winding, Zone,
};
