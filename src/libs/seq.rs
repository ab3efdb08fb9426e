use crate::libs::align::AlignError;
use std::sync::Arc;

/// An ordered set of single-byte symbols; a symbol's code is its index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<u8>,
}

impl Alphabet {
    pub fn new(symbols: &[u8]) -> Self {
        Self {
            symbols: symbols.iter().map(|b| b.to_ascii_uppercase()).collect(),
        }
    }

    /// Unambiguous nucleotides plus `N`.
    pub fn nucleotide() -> Self {
        Self::new(b"ACGTN")
    }

    /// Amino acids in NCBI matrix order, with the ambiguity codes `B`, `Z`,
    /// `X` and the stop symbol `*`.
    pub fn protein() -> Self {
        Self::new(b"ARNDCQEGHILKMFPSTWYVBZX*")
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    pub fn code_of(&self, symbol: u8) -> Option<u8> {
        let upper = symbol.to_ascii_uppercase();
        self.symbols
            .iter()
            .position(|&s| s == upper)
            .map(|p| p as u8)
    }

    pub fn symbol_of(&self, code: u8) -> Option<u8> {
        self.symbols.get(code as usize).copied()
    }

    /// Translates text into codes, case-insensitively.
    ///
    /// ```
    /// use seqmol::libs::seq::Alphabet;
    /// let codes = Alphabet::nucleotide().encode(b"acgT").unwrap();
    /// assert_eq!(codes, vec![0, 1, 2, 3]);
    /// assert!(Alphabet::nucleotide().encode(b"ACX").is_err());
    /// ```
    pub fn encode(&self, text: &[u8]) -> Result<Vec<u8>, AlignError> {
        text.iter()
            .enumerate()
            .map(|(pos, &b)| {
                self.code_of(b).ok_or(AlignError::UnknownSymbol {
                    symbol: b as char,
                    pos,
                })
            })
            .collect()
    }

    pub fn decode(&self, codes: &[u8]) -> String {
        codes
            .iter()
            .map(|&c| self.symbol_of(c).map(|b| b as char).unwrap_or('?'))
            .collect()
    }
}

/// An immutable run of symbol codes. Cloning shares the underlying buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolSequence {
    codes: Arc<[u8]>,
    alphabet_len: usize,
}

impl SymbolSequence {
    /// Every code must index into an alphabet of `alphabet_len` symbols.
    pub fn new(codes: Vec<u8>, alphabet_len: usize) -> Result<Self, AlignError> {
        if let Some(pos) = codes.iter().position(|&c| c as usize >= alphabet_len) {
            return Err(AlignError::CodeOutOfRange {
                pos,
                code: codes[pos],
                dim: alphabet_len,
            });
        }
        Ok(Self {
            codes: codes.into(),
            alphabet_len,
        })
    }

    pub fn from_text(text: &[u8], alphabet: &Alphabet) -> Result<Self, AlignError> {
        Self::new(alphabet.encode(text)?, alphabet.len())
    }

    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    pub fn alphabet_len(&self) -> usize {
        self.alphabet_len
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn slice(&self, range: std::ops::Range<usize>) -> Self {
        Self {
            codes: self.codes[range].into(),
            alphabet_len: self.alphabet_len,
        }
    }

    /// Reverse complement over [`Alphabet::nucleotide`] codes. `N` maps to itself.
    pub fn reverse_complement(&self) -> Self {
        let codes: Vec<u8> = self
            .codes
            .iter()
            .rev()
            .map(|&c| match c {
                0 => 3,
                1 => 2,
                2 => 1,
                3 => 0,
                other => other,
            })
            .collect();
        Self {
            codes: codes.into(),
            alphabet_len: self.alphabet_len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_roundtrip() {
        let alphabet = Alphabet::protein();
        assert_eq!(alphabet.len(), 24);
        let codes = alphabet.encode(b"MKV*").unwrap();
        assert_eq!(alphabet.decode(&codes), "MKV*");
    }

    #[test]
    fn test_alphabet_unknown_symbol() {
        let err = Alphabet::nucleotide().encode(b"ACGU").unwrap_err();
        assert_eq!(
            err,
            AlignError::UnknownSymbol {
                symbol: 'U',
                pos: 3
            }
        );
    }

    #[test]
    fn test_sequence_rejects_out_of_range() {
        assert_eq!(
            SymbolSequence::new(vec![0, 1, 4], 4),
            Err(AlignError::CodeOutOfRange {
                pos: 2,
                code: 4,
                dim: 4
            })
        );
        assert!(SymbolSequence::new(vec![0, 1, 3], 4).is_ok());
        assert!(SymbolSequence::new(vec![], 0).is_ok());
    }

    #[test]
    fn test_reverse_complement() {
        let alphabet = Alphabet::nucleotide();
        let seq = SymbolSequence::from_text(b"AACGN", &alphabet).unwrap();
        let rc = seq.reverse_complement();
        assert_eq!(alphabet.decode(rc.codes()), "NCGTT");
        assert_eq!(alphabet.decode(seq.slice(1..3).codes()), "AC");
    }
}
