use super::{AlignError, GapPenalty};
use crate::libs::seq::Alphabet;
use anyhow::Context;
use regex::Regex;

/// A square table of substitution scores, indexed by symbol codes.
///
/// Symmetry is conventional, not enforced. The matrix may carry the alphabet
/// its rows are labelled with and a suggested gap penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstitutionMatrix {
    dim: usize,
    scores: Vec<i32>,
    alphabet: Option<Alphabet>,
    gap: Option<GapPenalty>,
}

#[rustfmt::skip]
const BLOSUM62: [i32; 24 * 24] = [
//   A   R   N   D   C   Q   E   G   H   I   L   K   M   F   P   S   T   W   Y   V   B   Z   X   *
     4, -1, -2, -2,  0, -1, -1,  0, -2, -1, -1, -1, -1, -2, -1,  1,  0, -3, -2,  0, -2, -1,  0, -4, // A
    -1,  5,  0, -2, -3,  1,  0, -2,  0, -3, -2,  2, -1, -3, -2, -1, -1, -3, -2, -3, -1,  0, -1, -4, // R
    -2,  0,  6,  1, -3,  0,  0,  0,  1, -3, -3,  0, -2, -3, -2,  1,  0, -4, -2, -3,  3,  0, -1, -4, // N
    -2, -2,  1,  6, -3,  0,  2, -1, -1, -3, -4, -1, -3, -3, -1,  0, -1, -4, -3, -3,  4,  1, -1, -4, // D
     0, -3, -3, -3,  9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4, // C
    -1,  1,  0,  0, -3,  5,  2, -2,  0, -3, -2,  1,  0, -3, -1,  0, -1, -2, -1, -2,  0,  3, -1, -4, // Q
    -1,  0,  0,  2, -4,  2,  5, -2,  0, -3, -3,  1, -2, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // E
     0, -2,  0, -1, -3, -2, -2,  6, -2, -4, -4, -2, -3, -3, -2,  0, -2, -2, -3, -3, -1, -2, -1, -4, // G
    -2,  0,  1, -1, -3,  0,  0, -2,  8, -3, -3, -1, -2, -1, -2, -1, -2, -2,  2, -3,  0,  0, -1, -4, // H
    -1, -3, -3, -3, -1, -3, -3, -4, -3,  4,  2, -3,  1,  0, -3, -2, -1, -3, -1,  3, -3, -3, -1, -4, // I
    -1, -2, -3, -4, -1, -2, -3, -4, -3,  2,  4, -2,  2,  0, -3, -2, -1, -2, -1,  1, -4, -3, -1, -4, // L
    -1,  2,  0, -1, -3,  1,  1, -2, -1, -3, -2,  5, -1, -3, -1,  0, -1, -3, -2, -2,  0,  1, -1, -4, // K
    -1, -1, -2, -3, -1,  0, -2, -3, -2,  1,  2, -1,  5,  0, -2, -1, -1, -1, -1,  1, -3, -1, -1, -4, // M
    -2, -3, -3, -3, -2, -3, -3, -3, -1,  0,  0, -3,  0,  6, -4, -2, -2,  1,  3, -1, -3, -3, -1, -4, // F
    -1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4,  7, -1, -1, -4, -3, -2, -2, -1, -2, -4, // P
     1, -1,  1,  0, -1,  0,  0,  0, -1, -2, -2,  0, -1, -2, -1,  4,  1, -3, -2, -2,  0,  0,  0, -4, // S
     0, -1,  0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1,  1,  5, -2, -2,  0, -1, -1,  0, -4, // T
    -3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1,  1, -4, -3, -2, 11,  2, -3, -4, -3, -2, -4, // W
    -2, -2, -2, -3, -2, -1, -2, -3,  2, -1, -1, -2, -1,  3, -3, -2, -2,  2,  7, -1, -3, -2, -1, -4, // Y
     0, -3, -3, -3, -1, -2, -2, -3, -3,  3,  1, -2,  1, -1, -2, -2,  0, -3, -1,  4, -3, -2, -1, -4, // V
    -2, -1,  3,  4, -3,  0,  1, -1,  0, -3, -4,  0, -3, -3, -2,  0, -1, -4, -3, -3,  4,  1, -1, -4, // B
    -1,  0,  0,  1, -3,  3,  4, -2,  0, -3, -3,  1, -1, -3, -1,  0, -1, -3, -2, -2,  1,  4, -1, -4, // Z
     0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2,  0,  0, -2, -1, -1, -1, -1, -1, -4, // X
    -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4,  1, // *
];

impl SubstitutionMatrix {
    /// Builds a matrix from a row-major `dim * dim` buffer.
    pub fn from_scores(dim: usize, scores: Vec<i32>) -> Result<Self, AlignError> {
        if scores.len() != dim * dim {
            return Err(AlignError::DimensionMismatch {
                dim,
                found: scores.len(),
            });
        }
        Ok(Self {
            dim,
            scores,
            alphabet: None,
            gap: None,
        })
    }

    /// `matched` on the diagonal, `mismatched` everywhere else.
    pub fn identity(dim: usize, matched: i32, mismatched: i32) -> Self {
        let mut scores = vec![mismatched; dim * dim];
        for i in 0..dim {
            scores[i * dim + i] = matched;
        }
        Self {
            dim,
            scores,
            alphabet: None,
            gap: None,
        }
    }

    /// NUC.4.4 restricted to [`Alphabet::nucleotide`]: +5 match, -4
    /// mismatch, -2 against `N`, -1 for `N`/`N`.
    pub fn nuc() -> Self {
        let alphabet = Alphabet::nucleotide();
        let dim = alphabet.len();
        let mut matrix = Self::identity(dim, 5, -4);
        let n = dim - 1;
        for i in 0..dim {
            matrix.scores[i * dim + n] = -2;
            matrix.scores[n * dim + i] = -2;
        }
        matrix.scores[n * dim + n] = -1;
        matrix.alphabet = Some(alphabet);
        matrix.gap = Some(GapPenalty::Affine {
            open: -10,
            extend: -1,
        });
        matrix
    }

    /// BLOSUM62 over [`Alphabet::protein`]. Suggested gaps: -11 open, -1 extend.
    pub fn blosum62() -> Self {
        Self {
            dim: 24,
            scores: BLOSUM62.to_vec(),
            alphabet: Some(Alphabet::protein()),
            gap: Some(GapPenalty::Affine {
                open: -11,
                extend: -1,
            }),
        }
    }

    /// Loads from a preset name or an NCBI-format file.
    pub fn from_name(name: &str) -> anyhow::Result<Self> {
        match name.to_lowercase().as_str() {
            "nuc" | "nuc.4.4" => Ok(Self::nuc()),
            "blosum62" => Ok(Self::blosum62()),
            _ => Self::from_file(name),
        }
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("could not read matrix file {}", path))?;
        let matrix =
            Self::parse_ncbi(&text).with_context(|| format!("invalid matrix file {}", path))?;
        Ok(matrix)
    }

    /// Parses NCBI matrix text.
    ///
    /// Lines starting with `#` are comments. The first other line lists the
    /// column symbols, which become the matrix alphabet. Each following row
    /// may begin with its symbol. A suggested gap penalty may be given
    /// anywhere as `O=<open>` and `E=<extend>`.
    ///
    /// ```
    /// use seqmol::libs::align::SubstitutionMatrix;
    /// let text = "# O=-5, E=-2\n   A  B\nA  1 -1\nB -1  1\n";
    /// let matrix = SubstitutionMatrix::parse_ncbi(text).unwrap();
    /// assert_eq!(matrix.dim(), 2);
    /// assert_eq!(matrix.score(0, 1), -1);
    /// ```
    pub fn parse_ncbi(text: &str) -> Result<Self, AlignError> {
        let re_gap = Regex::new(r"\b([OE])\s*=\s*(-?\d+)").unwrap();
        let mut gap_open = None;
        let mut gap_extend = None;
        let mut header: Vec<u8> = vec![];
        let mut scores: Vec<i32> = vec![];
        let mut rows = 0;

        for line in text.lines() {
            for cap in re_gap.captures_iter(line) {
                let value = cap[2].parse::<i32>().ok();
                match &cap[1] {
                    "O" => gap_open = value,
                    _ => gap_extend = value,
                }
            }

            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            if header.is_empty() {
                if !parts.iter().all(|s| s.len() == 1) {
                    return Err(AlignError::MatrixFormat(format!(
                        "header must list single symbols: {}",
                        line
                    )));
                }
                header = parts.iter().map(|s| s.as_bytes()[0]).collect();
                continue;
            }

            if rows == header.len() {
                return Err(AlignError::MatrixFormat(format!(
                    "more than {} rows",
                    header.len()
                )));
            }
            let values = if parts.len() == header.len() + 1 {
                if parts[0].as_bytes() != [header[rows]] {
                    return Err(AlignError::MatrixFormat(format!(
                        "row {} is labelled '{}', expected '{}'",
                        rows + 1,
                        parts[0],
                        header[rows] as char
                    )));
                }
                &parts[1..]
            } else if parts.len() == header.len() {
                &parts[..]
            } else {
                return Err(AlignError::MatrixFormat(format!(
                    "row {} has {} fields, expected {}",
                    rows + 1,
                    parts.len(),
                    header.len()
                )));
            };

            for v in values {
                let score = v.parse::<i32>().map_err(|_| {
                    AlignError::MatrixFormat(format!("invalid score '{}' in row {}", v, rows + 1))
                })?;
                scores.push(score);
            }
            rows += 1;
        }

        if header.is_empty() || rows != header.len() {
            return Err(AlignError::MatrixFormat(format!(
                "found {} rows for {} columns",
                rows,
                header.len()
            )));
        }

        let mut matrix = Self::from_scores(header.len(), scores)?;
        matrix.alphabet = Some(Alphabet::new(&header));
        matrix.gap = match (gap_open, gap_extend) {
            (Some(open), Some(extend)) => Some(GapPenalty::Affine { open, extend }),
            (Some(open), None) => Some(GapPenalty::Linear(open)),
            _ => None,
        };
        Ok(matrix)
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Score for a pair of codes. Both must be below [`Self::dim`].
    #[inline]
    pub fn score(&self, a: u8, b: u8) -> i32 {
        self.scores[a as usize * self.dim + b as usize]
    }

    pub fn get(&self, a: u8, b: u8) -> Option<i32> {
        if (a as usize) < self.dim && (b as usize) < self.dim {
            Some(self.score(a, b))
        } else {
            None
        }
    }

    pub fn alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    pub fn gap_penalty(&self) -> Option<GapPenalty> {
        self.gap
    }

    /// Largest score magnitude in the table, 0 when it is empty.
    pub fn max_abs_score(&self) -> u32 {
        self.scores.iter().map(|s| s.unsigned_abs()).max().unwrap_or(0)
    }

    pub fn is_symmetric(&self) -> bool {
        (0..self.dim).all(|i| (0..i).all(|j| self.scores[i * self.dim + j] == self.scores[j * self.dim + i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nuc_matrix() {
        let m = SubstitutionMatrix::nuc();
        assert_eq!(m.dim(), 5);
        assert_eq!(m.score(0, 0), 5);
        assert_eq!(m.score(0, 1), -4);
        assert_eq!(m.score(4, 0), -2);
        assert_eq!(m.score(4, 4), -1);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_blosum62() {
        let m = SubstitutionMatrix::blosum62();
        let alphabet = m.alphabet().unwrap().clone();
        let code = |c: u8| alphabet.code_of(c).unwrap();
        assert_eq!(m.score(code(b'W'), code(b'W')), 11);
        assert_eq!(m.score(code(b'A'), code(b'R')), -1);
        assert_eq!(m.score(code(b'*'), code(b'*')), 1);
        assert!(m.is_symmetric());
    }

    #[test]
    fn test_from_scores_dimension() {
        assert!(SubstitutionMatrix::from_scores(2, vec![1, 2, 3]).is_err());
        let m = SubstitutionMatrix::from_scores(2, vec![1, 2, 3, 4]).unwrap();
        assert_eq!(m.score(1, 0), 3);
        assert!(!m.is_symmetric());
        assert_eq!(m.get(2, 0), None);
    }

    #[test]
    fn test_parse_ncbi() {
        let text = r###"
# Simple nucleotide matrix
# O=-8, E=-2
   A  C  G  T
A  2 -1 -1 -1
C -1  2 -1 -1
G -1 -1  2 -1
T -1 -1 -1  2
"###;
        let m = SubstitutionMatrix::parse_ncbi(text).unwrap();
        assert_eq!(m.dim(), 4);
        assert_eq!(m.alphabet().unwrap().symbols(), b"ACGT");
        assert_eq!(m.score(3, 3), 2);
        assert_eq!(
            m.gap_penalty(),
            Some(GapPenalty::Affine {
                open: -8,
                extend: -2
            })
        );
    }

    #[test]
    fn test_parse_ncbi_errors() {
        assert!(SubstitutionMatrix::parse_ncbi("").is_err());
        assert!(SubstitutionMatrix::parse_ncbi("A C\nA 1 0\n").is_err());
        assert!(SubstitutionMatrix::parse_ncbi("A C\nA 1 0\nG 0 1\n").is_err());
        assert!(SubstitutionMatrix::parse_ncbi("A C\nA 1 x\nC 0 1\n").is_err());
    }
}
