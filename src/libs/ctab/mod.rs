//! Reading and writing MDL connection tables (V2000 ctab blocks and MOL files).

mod codec;
mod error;
mod model;
mod mol;

pub use codec::{charge_from_code, charge_to_code, parse, serialize, Advisory, Parsed};
pub use error::CtabError;
pub use model::{AtomArray, AtomArrayStack, Bond, BondList, BondType, Structure};
pub use mol::{read_mol, write_mol, MolFile, MolHeader};
