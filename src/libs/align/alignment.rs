use crate::libs::seq::{Alphabet, SymbolSequence};
use itertools::Itertools;

/// One aligned column: positions in `seq1` and `seq2`, `None` for a gap.
pub type Column = (Option<usize>, Option<usize>);

/// An optimal alignment of two sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alignment {
    seq1: SymbolSequence,
    seq2: SymbolSequence,
    trace: Vec<Column>,
    score: i32,
}

impl Alignment {
    pub(crate) fn new(
        seq1: SymbolSequence,
        seq2: SymbolSequence,
        trace: Vec<Column>,
        score: i32,
    ) -> Self {
        debug_assert!(trace.iter().all(|c| c.0.is_some() || c.1.is_some()));
        Self {
            seq1,
            seq2,
            trace,
            score,
        }
    }

    pub fn seq1(&self) -> &SymbolSequence {
        &self.seq1
    }

    pub fn seq2(&self) -> &SymbolSequence {
        &self.seq2
    }

    pub fn trace(&self) -> &[Column] {
        &self.trace
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn len(&self) -> usize {
        self.trace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }

    /// Number of columns holding a gap in either sequence.
    pub fn gap_columns(&self) -> usize {
        self.trace
            .iter()
            .filter(|c| c.0.is_none() || c.1.is_none())
            .count()
    }

    /// Identical pairs divided by the columns between the first and the last
    /// column that pairs two symbols. Terminal gaps do not count.
    pub fn identity(&self) -> f64 {
        let first = self.trace.iter().position(|c| c.0.is_some() && c.1.is_some());
        let last = self.trace.iter().rposition(|c| c.0.is_some() && c.1.is_some());
        let (first, last) = match (first, last) {
            (Some(f), Some(l)) => (f, l),
            _ => return 0.0,
        };

        let inner = &self.trace[first..=last];
        let identical = inner
            .iter()
            .filter(|c| match c {
                (Some(i), Some(j)) => self.seq1.codes()[*i] == self.seq2.codes()[*j],
                _ => false,
            })
            .count();
        identical as f64 / inner.len() as f64
    }

    /// The two aligned rows, `-` marking gaps.
    pub fn gapped_strings(&self, alphabet: &Alphabet) -> (String, String) {
        let render = |pos: Option<usize>, seq: &SymbolSequence| match pos {
            Some(p) => alphabet
                .symbol_of(seq.codes()[p])
                .map(|b| b as char)
                .unwrap_or('?'),
            None => '-',
        };
        let row1 = self.trace.iter().map(|c| render(c.0, &self.seq1)).collect();
        let row2 = self.trace.iter().map(|c| render(c.1, &self.seq2)).collect();
        (row1, row2)
    }

    /// Tab-separated trace, one column per line, `-1` for gaps.
    pub fn trace_table(&self) -> String {
        let fmt = |p: Option<usize>| p.map(|v| v as i64).unwrap_or(-1);
        self.trace
            .iter()
            .map(|c| format!("{}\t{}", fmt(c.0), fmt(c.1)))
            .join("\n")
    }
}
