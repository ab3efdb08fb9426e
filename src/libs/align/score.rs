use super::{AlignMode, Column, GapPenalty, SubstitutionMatrix};
use crate::libs::seq::SymbolSequence;

/// Scores a trace without the DP tables.
///
/// Each maximal run of columns with a gap in the same sequence is one gap.
/// In semi-global mode, columns before the first and after the last residue
/// of `seq1` cost nothing.
///
/// ```
/// use seqmol::libs::align::{score, AlignMode, GapPenalty, SubstitutionMatrix};
/// use seqmol::libs::seq::{Alphabet, SymbolSequence};
///
/// let alphabet = Alphabet::nucleotide();
/// let seq1 = SymbolSequence::from_text(b"ACGT", &alphabet).unwrap();
/// let seq2 = SymbolSequence::from_text(b"AT", &alphabet).unwrap();
/// let matrix = SubstitutionMatrix::nuc();
/// let trace = [(Some(0), Some(0)), (Some(1), None), (Some(2), None), (Some(3), Some(1))];
/// let gap = GapPenalty::Affine { open: -10, extend: -1 };
/// assert_eq!(score::recompute(&trace, &seq1, &seq2, &matrix, gap, AlignMode::Global), 5 - 11 + 5);
/// ```
pub fn recompute(
    trace: &[Column],
    seq1: &SymbolSequence,
    seq2: &SymbolSequence,
    matrix: &SubstitutionMatrix,
    gap: GapPenalty,
    mode: AlignMode,
) -> i32 {
    let (lo, hi) = if mode == AlignMode::SemiGlobal {
        let first = trace.iter().position(|c| c.0.is_some());
        let last = trace.iter().rposition(|c| c.0.is_some());
        match (first, last) {
            (Some(f), Some(l)) => (f, l + 1),
            _ => return 0,
        }
    } else {
        (0, trace.len())
    };

    let mut total = 0;
    let mut run_len = 0;
    let mut run_in_seq1 = false;
    for column in &trace[lo..hi] {
        match *column {
            (Some(i), Some(j)) => {
                total += gap.cost(run_len);
                run_len = 0;
                total += matrix.score(seq1.codes()[i], seq2.codes()[j]);
            }
            (a, _) => {
                let in_seq1 = a.is_none();
                if run_len > 0 && in_seq1 != run_in_seq1 {
                    total += gap.cost(run_len);
                    run_len = 0;
                }
                run_in_seq1 = in_seq1;
                run_len += 1;
            }
        }
    }
    total + gap.cost(run_len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::seq::Alphabet;

    #[test]
    fn test_adjacent_gaps_are_separate() {
        let alphabet = Alphabet::nucleotide();
        let seq1 = SymbolSequence::from_text(b"AC", &alphabet).unwrap();
        let seq2 = SymbolSequence::from_text(b"AG", &alphabet).unwrap();
        let matrix = SubstitutionMatrix::nuc();
        let trace = [(Some(0), Some(0)), (Some(1), None), (None, Some(1))];
        let gap = GapPenalty::Affine {
            open: -6,
            extend: -1,
        };
        assert_eq!(
            recompute(&trace, &seq1, &seq2, &matrix, gap, AlignMode::Global),
            5 - 6 - 6
        );
    }

    #[test]
    fn test_semi_global_terminal_gaps_free() {
        let alphabet = Alphabet::nucleotide();
        let seq1 = SymbolSequence::from_text(b"CG", &alphabet).unwrap();
        let seq2 = SymbolSequence::from_text(b"ACGT", &alphabet).unwrap();
        let matrix = SubstitutionMatrix::nuc();
        let trace = [
            (None, Some(0)),
            (Some(0), Some(1)),
            (Some(1), Some(2)),
            (None, Some(3)),
        ];
        let gap = GapPenalty::Linear(-3);
        assert_eq!(
            recompute(&trace, &seq1, &seq2, &matrix, gap, AlignMode::SemiGlobal),
            10
        );
        assert_eq!(
            recompute(&trace, &seq1, &seq2, &matrix, gap, AlignMode::Global),
            4
        );
    }
}
