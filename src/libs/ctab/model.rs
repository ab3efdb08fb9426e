use super::CtabError;
use std::fmt;

/// Chemical bond multiplicity, or `Any` when unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondType {
    #[default]
    Any,
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
}

impl BondType {
    /// MDL bond codes 1, 2, 3, 6, 7 and 8. Codes 6 and 7 ("single or
    /// aromatic", "double or aromatic") collapse to the plain orders.
    pub fn from_mdl(code: i32) -> Option<Self> {
        match code {
            1 | 6 => Some(BondType::Single),
            2 | 7 => Some(BondType::Double),
            3 => Some(BondType::Triple),
            8 => Some(BondType::Any),
            _ => None,
        }
    }

    /// Inverse of [`BondType::from_mdl`]; types without a code give 0.
    pub fn to_mdl(self) -> i32 {
        match self {
            BondType::Single => 1,
            BondType::Double => 2,
            BondType::Triple => 3,
            BondType::Any => 8,
            BondType::Quadruple | BondType::Aromatic => 0,
        }
    }
}

impl fmt::Display for BondType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BondType::Any => "any",
            BondType::Single => "single",
            BondType::Double => "double",
            BondType::Triple => "triple",
            BondType::Quadruple => "quadruple",
            BondType::Aromatic => "aromatic",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub i: usize,
    pub j: usize,
    pub bond_type: BondType,
}

impl Bond {
    pub fn new(i: usize, j: usize, bond_type: BondType) -> Self {
        Self { i, j, bond_type }
    }
}

/// Bonds between the atoms of one atom array, by 0-based atom index.
///
/// Self bonds are not rejected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BondList {
    atom_count: usize,
    bonds: Vec<Bond>,
}

impl BondList {
    pub fn new(atom_count: usize, bonds: Vec<Bond>) -> Result<Self, CtabError> {
        let mut list = Self::empty(atom_count);
        for bond in bonds {
            list.push(bond)?;
        }
        Ok(list)
    }

    pub fn empty(atom_count: usize) -> Self {
        Self {
            atom_count,
            bonds: vec![],
        }
    }

    pub fn push(&mut self, bond: Bond) -> Result<(), CtabError> {
        for atom in [bond.i, bond.j] {
            if atom >= self.atom_count {
                return Err(CtabError::BondIndex {
                    index: self.bonds.len(),
                    atom,
                    atom_count: self.atom_count,
                });
            }
        }
        self.bonds.push(bond);
        Ok(())
    }

    pub fn atom_count(&self) -> usize {
        self.atom_count
    }

    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    pub fn len(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bonds.is_empty()
    }
}

/// One coordinate frame of atoms as parallel arrays, with optional formal
/// charges and an optional bond graph.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomArray {
    coord: Vec<[f64; 3]>,
    element: Vec<String>,
    charge: Option<Vec<i32>>,
    bonds: Option<BondList>,
}

impl AtomArray {
    pub fn new(coord: Vec<[f64; 3]>, element: Vec<String>) -> Result<Self, CtabError> {
        if element.len() != coord.len() {
            return Err(CtabError::LengthMismatch {
                what: "element",
                expected: coord.len(),
                found: element.len(),
            });
        }
        Ok(Self {
            coord,
            element,
            charge: None,
            bonds: None,
        })
    }

    pub fn with_charge(mut self, charge: Vec<i32>) -> Result<Self, CtabError> {
        if charge.len() != self.len() {
            return Err(CtabError::LengthMismatch {
                what: "charge",
                expected: self.len(),
                found: charge.len(),
            });
        }
        self.charge = Some(charge);
        Ok(self)
    }

    pub fn with_bonds(mut self, bonds: BondList) -> Result<Self, CtabError> {
        if bonds.atom_count() != self.len() {
            return Err(CtabError::LengthMismatch {
                what: "bond list atom count",
                expected: self.len(),
                found: bonds.atom_count(),
            });
        }
        self.bonds = Some(bonds);
        Ok(self)
    }

    /// Replaces the coordinates, keeping every annotation.
    pub fn with_coord(mut self, coord: Vec<[f64; 3]>) -> Result<Self, CtabError> {
        if coord.len() != self.len() {
            return Err(CtabError::LengthMismatch {
                what: "coord",
                expected: self.len(),
                found: coord.len(),
            });
        }
        self.coord = coord;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.coord.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coord.is_empty()
    }

    pub fn coord(&self) -> &[[f64; 3]] {
        &self.coord
    }

    pub fn element(&self) -> &[String] {
        &self.element
    }

    pub fn charge(&self) -> Option<&[i32]> {
        self.charge.as_deref()
    }

    /// Formal charge of atom `i`; 0 when the array carries no charges.
    pub fn charge_at(&self, i: usize) -> i32 {
        self.charge.as_ref().map(|c| c[i]).unwrap_or(0)
    }

    pub fn total_charge(&self) -> i32 {
        self.charge.as_ref().map(|c| c.iter().sum()).unwrap_or(0)
    }

    pub fn bonds(&self) -> Option<&BondList> {
        self.bonds.as_ref()
    }
}

/// Several coordinate frames sharing one set of atom annotations.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomArrayStack {
    atoms: AtomArray,
    frames: Vec<Vec<[f64; 3]>>,
}

impl AtomArrayStack {
    /// `atoms` supplies the annotations; its own coordinates are dropped.
    pub fn new(atoms: AtomArray, frames: Vec<Vec<[f64; 3]>>) -> Result<Self, CtabError> {
        if let Some(frame) = frames.iter().find(|f| f.len() != atoms.len()) {
            return Err(CtabError::LengthMismatch {
                what: "frame",
                expected: atoms.len(),
                found: frame.len(),
            });
        }
        Ok(Self { atoms, frames })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// The shared annotations.
    pub fn atoms(&self) -> &AtomArray {
        &self.atoms
    }

    pub fn frames(&self) -> &[Vec<[f64; 3]>] {
        &self.frames
    }

    /// A single-frame copy of frame `k`.
    pub fn frame(&self, k: usize) -> Option<AtomArray> {
        self.frames.get(k).map(|coord| AtomArray {
            coord: coord.clone(),
            ..self.atoms.clone()
        })
    }
}

/// Either one coordinate frame or a trajectory.
#[derive(Debug, Clone, PartialEq)]
pub enum Structure {
    SingleFrame(AtomArray),
    MultiFrame(AtomArrayStack),
}

impl From<AtomArray> for Structure {
    fn from(atoms: AtomArray) -> Self {
        Structure::SingleFrame(atoms)
    }
}

impl From<AtomArrayStack> for Structure {
    fn from(stack: AtomArrayStack) -> Self {
        Structure::MultiFrame(stack)
    }
}
