use thiserror::Error;

/// Fatal conditions of the connection-table codec.
#[derive(Debug, Error, PartialEq)]
pub enum CtabError {
    #[error("malformed ctab record (at line {line}): {details}")]
    MalformedRecord { line: usize, details: String },

    #[error("the atom array has no associated bond graph")]
    MissingBondGraph,

    #[error("a structure with {frames} frames was given, but only a single frame can be written")]
    UnsupportedInput { frames: usize },

    #[error("{what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("bond {index} references atom {atom}, but there are only {atom_count} atoms")]
    BondIndex {
        index: usize,
        atom: usize,
        atom_count: usize,
    },

    #[error("atom index {atom} is out of range for {atom_count} atoms")]
    AtomIndex { atom: usize, atom_count: usize },

    #[error("{count} {what} do not fit the 3-column V2000 counts line")]
    CountOverflow { what: &'static str, count: usize },

    #[error("element symbol '{symbol}' of atom {atom} does not fit the 3-column element field")]
    InvalidElement { atom: usize, symbol: String },

    #[error("coordinate {value} of atom {atom} does not fit a 10-column field")]
    CoordinateRange { atom: usize, value: f64 },

    #[error("the atom array stack has no frames")]
    EmptyStack,
}

impl CtabError {
    pub fn malformed(line: usize, details: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            details: details.into(),
        }
    }
}
