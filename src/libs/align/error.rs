use thiserror::Error;

/// Fatal conditions raised by the alignment engine and its inputs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlignError {
    #[error("symbol code {code} at position {pos} of sequence {seq} is outside the matrix dimension {dim}")]
    InvalidAlphabet {
        seq: usize,
        pos: usize,
        code: u8,
        dim: usize,
    },

    #[error("symbol code {code} at position {pos} is outside an alphabet of {dim} symbols")]
    CodeOutOfRange { pos: usize, code: u8, dim: usize },

    #[error("unknown symbol '{symbol}' at position {pos}")]
    UnknownSymbol { symbol: char, pos: usize },

    #[error("both sequences are empty")]
    EmptyInput,

    #[error("matrix buffer holds {found} scores, expected {dim}x{dim}")]
    DimensionMismatch { dim: usize, found: usize },

    #[error("malformed substitution matrix: {0}")]
    MatrixFormat(String),

    #[error("worst-case alignment score {bound} does not fit the score lattice")]
    ScoreRange { bound: i64 },
}
