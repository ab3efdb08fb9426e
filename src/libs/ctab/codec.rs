//! MDL V2000 connection table: counts line, atom block and bond block.
//!
//! Atom line columns (0-based, end exclusive):
//!
//! | field   | columns |
//! |---------|---------|
//! | x, y, z | 0..30   |
//! | element | 31..34  |
//! | charge  | 36..39  |
//!
//! Bond line columns: first atom 0..3, second atom 3..6, type 6..9.

use super::model::{AtomArray, Bond, BondList, BondType, Structure};
use super::CtabError;
use std::fmt;

const MAX_COUNT: usize = 999;
const COORD_WIDTH: usize = 10;

/// A recoverable oddity met while parsing. The affected field falls back to
/// a neutral value and parsing goes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// The charge code was not one of 0..=3 or 5..=7; the atom gets charge 0.
    UnknownChargeCode { line: usize, code: i32 },
    /// The bond code is not recognised; the bond gets [`BondType::Any`].
    UnknownBondType { line: usize, code: i32 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::UnknownChargeCode { line, code } => write!(
                f,
                "line {}: unknown charge code {}, charge set to 0",
                line, code
            ),
            Advisory::UnknownBondType { line, code } => write!(
                f,
                "line {}: unknown bond type {}, bond type set to any",
                line, code
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub atoms: AtomArray,
    pub advisories: Vec<Advisory>,
}

/// Formal charge encoded by an MDL charge code; code 4 (doublet radical)
/// and anything out of range yield `None`.
pub fn charge_from_code(code: i32) -> Option<i32> {
    match code {
        0 => Some(0),
        1..=3 | 5..=7 => Some(4 - code),
        _ => None,
    }
}

/// MDL charge code for a formal charge; charges outside -3..=3 give 0.
pub fn charge_to_code(charge: i32) -> i32 {
    match charge {
        1..=3 | -3..=-1 => 4 - charge,
        _ => 0,
    }
}

/// Parses a connection table starting at its counts line.
///
/// Lines beyond the declared atom and bond blocks are ignored. Line numbers in
/// errors and advisories count from 1 at the counts line.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<Parsed, CtabError> {
    parse_from(lines, 1)
}

/// As [`parse`], numbering the counts line `first_line`.
pub(crate) fn parse_from<S: AsRef<str>>(
    lines: &[S],
    first_line: usize,
) -> Result<Parsed, CtabError> {
    let counts = lines
        .first()
        .ok_or_else(|| CtabError::malformed(first_line, "missing counts line"))?;
    let (n_atoms, n_bonds) = parse_counts(counts.as_ref(), first_line)?;

    let needed = 1 + n_atoms + n_bonds;
    if lines.len() < needed {
        return Err(CtabError::malformed(
            first_line + lines.len().saturating_sub(1),
            format!(
                "{} atoms and {} bonds declared, but only {} lines follow the counts line",
                n_atoms,
                n_bonds,
                lines.len() - 1
            ),
        ));
    }

    let mut advisories = vec![];

    let mut coord = Vec::with_capacity(n_atoms);
    let mut element = Vec::with_capacity(n_atoms);
    let mut charge = Vec::with_capacity(n_atoms);
    for (k, raw) in lines[1..=n_atoms].iter().enumerate() {
        let line_no = first_line + 1 + k;
        let line = padded(raw.as_ref(), 39, line_no)?;

        let mut xyz = [0.0; 3];
        for (axis, value) in xyz.iter_mut().enumerate() {
            let field = &line[axis * 10..axis * 10 + 10];
            *value = field.trim().parse::<f64>().map_err(|_| {
                CtabError::malformed(line_no, format!("invalid coordinate '{}'", field.trim()))
            })?;
        }
        coord.push(xyz);
        element.push(line[31..34].trim().to_uppercase());

        let field = line[36..39].trim();
        let code = if field.is_empty() {
            0
        } else {
            field.parse::<i32>().map_err(|_| {
                CtabError::malformed(line_no, format!("invalid charge code '{}'", field))
            })?
        };
        charge.push(match charge_from_code(code) {
            Some(c) => c,
            None => {
                advisories.push(Advisory::UnknownChargeCode {
                    line: line_no,
                    code,
                });
                0
            }
        });
    }

    let mut bonds = BondList::empty(n_atoms);
    for (k, raw) in lines[n_atoms + 1..needed].iter().enumerate() {
        let line_no = first_line + 1 + n_atoms + k;
        let line = padded(raw.as_ref(), 9, line_no)?;

        let int_field = |range: std::ops::Range<usize>, what: &str| {
            let field = line[range].trim();
            field.parse::<i32>().map_err(|_| {
                CtabError::malformed(line_no, format!("invalid {} '{}'", what, field))
            })
        };
        let i = atom_index(int_field(0..3, "atom index")?, n_atoms, line_no)?;
        let j = atom_index(int_field(3..6, "atom index")?, n_atoms, line_no)?;
        let code = int_field(6..9, "bond type")?;

        let bond_type = match BondType::from_mdl(code) {
            Some(t) => t,
            None => {
                advisories.push(Advisory::UnknownBondType {
                    line: line_no,
                    code,
                });
                BondType::Any
            }
        };
        bonds.push(Bond::new(i, j, bond_type))?;
    }

    let atoms = AtomArray::new(coord, element)?
        .with_charge(charge)?
        .with_bonds(bonds)?;

    Ok(Parsed { atoms, advisories })
}

/// Serializes one frame as counts line, atom block, bond block and `M  END`.
///
/// Fields that would overflow their fixed columns are rejected rather than
/// written shifted: more than 999 atoms or bonds, element symbols longer than
/// three characters, and coordinates that do not print in ten columns
/// (roughly `-999.99999..=9999.99999`).
pub fn serialize(structure: &Structure) -> Result<Vec<String>, CtabError> {
    let atoms = match structure {
        Structure::SingleFrame(atoms) => atoms,
        Structure::MultiFrame(stack) => {
            return Err(CtabError::UnsupportedInput {
                frames: stack.frame_count(),
            })
        }
    };
    let bonds = atoms.bonds().ok_or(CtabError::MissingBondGraph)?;
    check_fields(atoms, bonds.len())?;

    let mut lines = Vec::with_capacity(atoms.len() + bonds.len() + 2);
    lines.push(format!(
        "{:>3}{:>3}  0  0  0  0  0  0  0  1 V2000",
        atoms.len(),
        bonds.len()
    ));

    for (i, (xyz, element)) in atoms.coord().iter().zip(atoms.element()).enumerate() {
        lines.push(format!(
            "{:>10.5}{:>10.5}{:>10.5} {:>3}  {:>3}{}",
            xyz[0],
            xyz[1],
            xyz[2],
            element,
            charge_to_code(atoms.charge_at(i)),
            "  0".repeat(10)
        ));
    }

    for bond in bonds.bonds() {
        lines.push(format!(
            "{:>3}{:>3}{:>3}{}",
            bond.i + 1,
            bond.j + 1,
            bond.bond_type.to_mdl(),
            "  0".repeat(4)
        ));
    }

    lines.push("M  END".to_string());
    Ok(lines)
}

fn check_fields(atoms: &AtomArray, bond_count: usize) -> Result<(), CtabError> {
    for (what, count) in [("atoms", atoms.len()), ("bonds", bond_count)] {
        if count > MAX_COUNT {
            return Err(CtabError::CountOverflow { what, count });
        }
    }

    for (atom, (xyz, element)) in atoms.coord().iter().zip(atoms.element()).enumerate() {
        if element.len() > 3 || !element.is_ascii() {
            return Err(CtabError::InvalidElement {
                atom,
                symbol: element.clone(),
            });
        }
        let too_wide = |v: &&f64| !v.is_finite() || format!("{:.5}", v).len() > COORD_WIDTH;
        if let Some(&value) = xyz.iter().find(too_wide) {
            return Err(CtabError::CoordinateRange { atom, value });
        }
    }
    Ok(())
}

fn parse_counts(line: &str, line_no: usize) -> Result<(usize, usize), CtabError> {
    let mut fields = line.split_whitespace().map(|f| f.parse::<usize>());
    if let (Some(Ok(atoms)), Some(Ok(bonds))) = (fields.next(), fields.next()) {
        return Ok((atoms, bonds));
    }

    // counts of 100 or more may touch, e.g. "123 45"
    let fixed = || -> Option<(usize, usize)> {
        let atoms = line.get(0..3)?.trim().parse().ok()?;
        let bonds = line.get(3..6)?.trim().parse().ok()?;
        Some((atoms, bonds))
    };
    fixed().ok_or_else(|| {
        CtabError::malformed(line_no, format!("invalid counts line '{}'", line))
    })
}

fn padded(raw: &str, width: usize, line_no: usize) -> Result<String, CtabError> {
    if !raw.is_ascii() {
        return Err(CtabError::malformed(line_no, "non-ASCII characters"));
    }
    Ok(format!("{:<width$}", raw, width = width))
}

fn atom_index(value: i32, n_atoms: usize, line_no: usize) -> Result<usize, CtabError> {
    if value < 1 || value as usize > n_atoms {
        return Err(CtabError::malformed(
            line_no,
            format!("atom index {} outside 1..={}", value, n_atoms),
        ));
    }
    Ok(value as usize - 1)
}
