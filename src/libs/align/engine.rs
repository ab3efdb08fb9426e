use super::{AlignError, AlignMode, AlignParams, Alignment, Column, GapPenalty, SubstitutionMatrix};
use crate::libs::seq::SymbolSequence;
use fxhash::FxHashSet;
use std::ops::{Index, IndexMut};

const NEG_INF: i32 = i32::MIN / 4;

/// Set when more co-optimal alignments exist than the caller allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    pub cap: usize,
}

#[derive(Debug, Clone)]
pub struct AlignOutcome {
    /// Co-optimal alignments, all with the same score. Never empty.
    pub alignments: Vec<Alignment>,
    pub truncated: Option<Truncation>,
}

impl AlignOutcome {
    pub fn score(&self) -> i32 {
        self.alignments[0].score()
    }

    pub fn best(&self) -> &Alignment {
        &self.alignments[0]
    }
}

/// Computes the optimal alignments of `seq1` and `seq2`.
///
/// Time and memory are `O(m * n)`. Long inputs should be narrowed to a
/// window first, see [`crate::libs::align::seed`].
///
/// ```
/// use seqmol::libs::align::{align, AlignMode, AlignParams, GapPenalty, SubstitutionMatrix};
/// use seqmol::libs::seq::{Alphabet, SymbolSequence};
///
/// let alphabet = Alphabet::nucleotide();
/// let seq1 = SymbolSequence::from_text(b"ACGT", &alphabet).unwrap();
/// let seq2 = SymbolSequence::from_text(b"AGT", &alphabet).unwrap();
/// let matrix = SubstitutionMatrix::identity(alphabet.len(), 1, -1);
/// let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(-2));
///
/// let outcome = align(&seq1, &seq2, &matrix, &params).unwrap();
/// assert_eq!(outcome.score(), 1);
/// assert_eq!(outcome.best().gap_columns(), 1);
/// ```
pub fn align(
    seq1: &SymbolSequence,
    seq2: &SymbolSequence,
    matrix: &SubstitutionMatrix,
    params: &AlignParams,
) -> Result<AlignOutcome, AlignError> {
    check_codes(seq1, 1, matrix)?;
    check_codes(seq2, 2, matrix)?;
    if seq1.is_empty() && seq2.is_empty() {
        return Err(AlignError::EmptyInput);
    }
    check_score_range(seq1.len(), seq2.len(), matrix, params.gap)?;

    log::debug!(
        "{} alignment, {}x{} cells, gap {}",
        params.mode,
        seq1.len() + 1,
        seq2.len() + 1,
        params.gap
    );

    let scoring = Scoring {
        s1: seq1.codes(),
        s2: seq2.codes(),
        matrix,
        mode: params.mode,
    };
    let (score, traces, truncated) = match params.gap {
        GapPenalty::Linear(gap) => {
            let lattice = LinearLattice::fill(scoring, gap);
            enumerate(&lattice, params.max_number)
        }
        GapPenalty::Affine { open, extend } => {
            let lattice = AffineLattice::fill(scoring, open, extend);
            enumerate(&lattice, params.max_number)
        }
    };

    if truncated {
        log::debug!(
            "more than {} co-optimal alignments, enumeration stopped",
            params.max_number
        );
    }

    let alignments = traces
        .into_iter()
        .map(|trace| Alignment::new(seq1.clone(), seq2.clone(), trace, score))
        .collect();
    Ok(AlignOutcome {
        alignments,
        truncated: truncated.then_some(Truncation {
            cap: params.max_number.max(1),
        }),
    })
}

fn check_codes(
    seq: &SymbolSequence,
    which: usize,
    matrix: &SubstitutionMatrix,
) -> Result<(), AlignError> {
    match seq
        .codes()
        .iter()
        .position(|&c| c as usize >= matrix.dim())
    {
        Some(pos) => Err(AlignError::InvalidAlphabet {
            seq: which,
            pos,
            code: seq.codes()[pos],
            dim: matrix.dim(),
        }),
        None => Ok(()),
    }
}

/// Every reachable score must stay clear of `NEG_INF / 2`, otherwise real
/// cells would be clamped to minus infinity or overflow.
fn check_score_range(
    m: usize,
    n: usize,
    matrix: &SubstitutionMatrix,
    gap: GapPenalty,
) -> Result<(), AlignError> {
    let to_i64 = |v: usize| i64::try_from(v).unwrap_or(i64::MAX);
    let bound = gap
        .max_step()
        .saturating_mul(to_i64(m.saturating_add(n)))
        .saturating_add((matrix.max_abs_score() as i64).saturating_mul(to_i64(m.min(n))));
    if bound > (i32::MAX / 8) as i64 {
        return Err(AlignError::ScoreRange { bound });
    }
    Ok(())
}

/// Row-major `(m + 1) x (n + 1)` score buffer.
struct Grid {
    cols: usize,
    data: Vec<i32>,
}

impl Grid {
    fn new(rows: usize, cols: usize, fill: i32) -> Self {
        Self {
            cols,
            data: vec![fill; rows * cols],
        }
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = i32;

    fn index(&self, (i, j): (usize, usize)) -> &i32 {
        assert!(j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut i32 {
        assert!(j < self.cols);
        &mut self.data[i * self.cols + j]
    }
}

/// Which kind of column a cell ends with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum State {
    /// `seq1[i-1]` paired with `seq2[j-1]`
    Diag,
    /// `seq1[i-1]` against a gap
    Up,
    /// a gap against `seq2[j-1]`
    Left,
}

const STATES: [State; 3] = [State::Diag, State::Up, State::Left];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    i: usize,
    j: usize,
    state: State,
}

impl Cell {
    fn new(i: usize, j: usize, state: State) -> Self {
        Self { i, j, state }
    }
}

#[derive(Debug, Clone, Copy)]
struct Move {
    column: Column,
    to: Cell,
}

#[derive(Clone, Copy)]
struct Scoring<'a> {
    s1: &'a [u8],
    s2: &'a [u8],
    matrix: &'a SubstitutionMatrix,
    mode: AlignMode,
}

impl Scoring<'_> {
    fn rows(&self) -> usize {
        self.s1.len() + 1
    }

    fn cols(&self) -> usize {
        self.s2.len() + 1
    }

    /// Substitution score for entering cell `(i, j)` diagonally.
    #[inline]
    fn sub(&self, i: usize, j: usize) -> i32 {
        self.matrix.score(self.s1[i - 1], self.s2[j - 1])
    }
}

fn clamp(v: i32) -> i32 {
    if v < NEG_INF / 2 {
        NEG_INF
    } else {
        v
    }
}

/// A filled DP table that the traceback can walk.
trait Lattice {
    fn scoring(&self) -> &Scoring<'_>;

    /// States carrying a value of their own.
    fn states(&self) -> &'static [State];

    fn value(&self, cell: Cell) -> i32;

    /// Predecessor moves that produce this cell's value, in tie-break order.
    fn moves(&self, cell: Cell, out: &mut Vec<Move>);

    fn is_terminal(&self, cell: Cell) -> bool {
        match self.scoring().mode {
            AlignMode::Global => cell.i == 0 && cell.j == 0,
            AlignMode::SemiGlobal => cell.i == 0,
            AlignMode::Local => self.value(cell) <= 0,
        }
    }
}

/// One matrix; gap cost is `gap * length`.
struct LinearLattice<'a> {
    scoring: Scoring<'a>,
    gap: i32,
    h: Grid,
}

impl<'a> LinearLattice<'a> {
    fn fill(scoring: Scoring<'a>, gap: i32) -> Self {
        let (rows, cols) = (scoring.rows(), scoring.cols());
        let mode = scoring.mode;
        let mut h = Grid::new(rows, cols, 0);

        for i in 0..rows {
            for j in 0..cols {
                if i == 0 && j == 0 {
                    continue;
                }
                let boundary = match mode {
                    AlignMode::Local => i == 0 || j == 0,
                    AlignMode::SemiGlobal => i == 0,
                    AlignMode::Global => false,
                };
                if boundary {
                    h[(i, j)] = 0;
                    continue;
                }

                let mut best = NEG_INF;
                if i > 0 && j > 0 {
                    best = best.max(h[(i - 1, j - 1)] + scoring.sub(i, j));
                }
                if i > 0 {
                    best = best.max(h[(i - 1, j)] + gap);
                }
                if j > 0 {
                    best = best.max(h[(i, j - 1)] + gap);
                }
                if mode == AlignMode::Local {
                    best = best.max(0);
                }
                h[(i, j)] = clamp(best);
            }
        }

        Self { scoring, gap, h }
    }
}

impl Lattice for LinearLattice<'_> {
    fn scoring(&self) -> &Scoring<'_> {
        &self.scoring
    }

    fn states(&self) -> &'static [State] {
        &[State::Diag]
    }

    fn value(&self, cell: Cell) -> i32 {
        self.h[(cell.i, cell.j)]
    }

    fn moves(&self, cell: Cell, out: &mut Vec<Move>) {
        let Cell { i, j, .. } = cell;
        let v = self.h[(i, j)];
        if i > 0 && j > 0 && self.h[(i - 1, j - 1)] + self.scoring.sub(i, j) == v {
            out.push(Move {
                column: (Some(i - 1), Some(j - 1)),
                to: Cell::new(i - 1, j - 1, State::Diag),
            });
        }
        if i > 0 && self.h[(i - 1, j)] + self.gap == v {
            out.push(Move {
                column: (Some(i - 1), None),
                to: Cell::new(i - 1, j, State::Diag),
            });
        }
        if j > 0 && self.h[(i, j - 1)] + self.gap == v {
            out.push(Move {
                column: (None, Some(j - 1)),
                to: Cell::new(i, j - 1, State::Diag),
            });
        }
    }
}

/// Gotoh's three matrices. `m` ends in a substitution, `x` in a gap in
/// `seq2`, `y` in a gap in `seq1`; a gap of length L costs
/// `open + extend * (L - 1)`.
struct AffineLattice<'a> {
    scoring: Scoring<'a>,
    open: i32,
    extend: i32,
    m: Grid,
    x: Grid,
    y: Grid,
}

impl<'a> AffineLattice<'a> {
    fn fill(scoring: Scoring<'a>, open: i32, extend: i32) -> Self {
        let (rows, cols) = (scoring.rows(), scoring.cols());
        let mode = scoring.mode;
        let is_local = mode == AlignMode::Local;
        let floor = if is_local { 0 } else { NEG_INF };

        let mut m = Grid::new(rows, cols, floor);
        let mut x = Grid::new(rows, cols, floor);
        let mut y = Grid::new(rows, cols, floor);

        for i in 0..rows {
            for j in 0..cols {
                if i == 0 && j == 0 {
                    m[(0, 0)] = 0;
                    continue;
                }
                if is_local && (i == 0 || j == 0) {
                    continue;
                }
                if mode == AlignMode::SemiGlobal && i == 0 {
                    m[(0, j)] = 0;
                    continue;
                }

                if i > 0 && j > 0 {
                    let prev = m[(i - 1, j - 1)]
                        .max(x[(i - 1, j - 1)])
                        .max(y[(i - 1, j - 1)]);
                    m[(i, j)] = clamp(prev + scoring.sub(i, j)).max(floor);
                }
                if i > 0 {
                    let v = (m[(i - 1, j)] + open)
                        .max(x[(i - 1, j)] + extend)
                        .max(y[(i - 1, j)] + open);
                    x[(i, j)] = clamp(v).max(floor);
                }
                if j > 0 {
                    let v = (m[(i, j - 1)] + open)
                        .max(y[(i, j - 1)] + extend)
                        .max(x[(i, j - 1)] + open);
                    y[(i, j)] = clamp(v).max(floor);
                }
            }
        }

        Self {
            scoring,
            open,
            extend,
            m,
            x,
            y,
        }
    }

    fn grid(&self, state: State) -> &Grid {
        match state {
            State::Diag => &self.m,
            State::Up => &self.x,
            State::Left => &self.y,
        }
    }

    /// Predecessors of a gap cell, in state order. Continuing the same gap
    /// costs `extend`, anything else opens a new one.
    fn gap_moves(&self, from: (usize, usize), kind: State, v: i32, column: Column, out: &mut Vec<Move>) {
        for state in STATES {
            let cost = if state == kind { self.extend } else { self.open };
            let prev = self.grid(state)[from];
            if prev > NEG_INF && prev + cost == v {
                out.push(Move {
                    column,
                    to: Cell::new(from.0, from.1, state),
                });
            }
        }
    }
}

impl Lattice for AffineLattice<'_> {
    fn scoring(&self) -> &Scoring<'_> {
        &self.scoring
    }

    fn states(&self) -> &'static [State] {
        &STATES
    }

    fn value(&self, cell: Cell) -> i32 {
        self.grid(cell.state)[(cell.i, cell.j)]
    }

    fn moves(&self, cell: Cell, out: &mut Vec<Move>) {
        let Cell { i, j, state } = cell;
        let v = self.value(cell);
        match state {
            State::Diag => {
                if i == 0 || j == 0 {
                    return;
                }
                let column = (Some(i - 1), Some(j - 1));
                let target = v - self.scoring.sub(i, j);
                if self.scoring.mode == AlignMode::Local && target == 0 {
                    // fresh start, every predecessor is zero
                    out.push(Move {
                        column,
                        to: Cell::new(i - 1, j - 1, State::Diag),
                    });
                    return;
                }
                for prev in STATES {
                    let pv = self.grid(prev)[(i - 1, j - 1)];
                    if pv > NEG_INF && pv == target {
                        out.push(Move {
                            column,
                            to: Cell::new(i - 1, j - 1, prev),
                        });
                    }
                }
            }
            State::Up => {
                if i > 0 {
                    self.gap_moves((i - 1, j), State::Up, v, (Some(i - 1), None), out);
                }
            }
            State::Left => {
                if j > 0 {
                    self.gap_moves((i, j - 1), State::Left, v, (None, Some(j - 1)), out);
                }
            }
        }
    }
}

/// The optimal score and every cell holding it where a traceback may begin.
fn start_cells<L: Lattice>(lattice: &L) -> (i32, Vec<Cell>) {
    let scoring = lattice.scoring();
    let (m, n) = (scoring.s1.len(), scoring.s2.len());

    let candidates: Vec<Cell> = match scoring.mode {
        AlignMode::Global => lattice
            .states()
            .iter()
            .map(|&s| Cell::new(m, n, s))
            .collect(),
        AlignMode::SemiGlobal => (0..=n)
            .flat_map(|j| lattice.states().iter().map(move |&s| Cell::new(m, j, s)))
            .collect(),
        AlignMode::Local => (1..=m)
            .flat_map(|i| {
                (1..=n).flat_map(move |j| lattice.states().iter().map(move |&s| Cell::new(i, j, s)))
            })
            .collect(),
    };

    let best = candidates
        .iter()
        .map(|&c| lattice.value(c))
        .max()
        .unwrap_or(0);
    if scoring.mode == AlignMode::Local && best <= 0 {
        return (0, vec![]);
    }
    let starts = candidates
        .into_iter()
        .filter(|&c| lattice.value(c) == best)
        .collect();
    (best, starts)
}

struct Frame {
    cell: Cell,
    depth: usize,
    column: Option<Column>,
}

/// Walks every optimal path, depth first, stopping after `cap` distinct
/// traces. The flag reports that at least one more trace existed.
fn enumerate<L: Lattice>(lattice: &L, cap: usize) -> (i32, Vec<Vec<Column>>, bool) {
    let cap = cap.max(1);
    let (best, starts) = start_cells(lattice);
    if starts.is_empty() {
        // local alignment without a positive cell
        return (0, vec![vec![]], false);
    }

    let n = lattice.scoring().s2.len();
    let semi = lattice.scoring().mode == AlignMode::SemiGlobal;

    let mut found: Vec<Vec<Column>> = vec![];
    let mut seen: FxHashSet<Vec<Column>> = FxHashSet::default();
    let mut path: Vec<Column> = vec![];
    let mut stack: Vec<Frame> = vec![];
    let mut moves: Vec<Move> = vec![];

    for start in starts {
        path.clear();
        stack.push(Frame {
            cell: start,
            depth: 0,
            column: None,
        });

        while let Some(frame) = stack.pop() {
            path.truncate(frame.depth);
            if let Some(column) = frame.column {
                path.push(column);
            }

            if lattice.is_terminal(frame.cell) {
                let mut trace: Vec<Column> = Vec::with_capacity(path.len() + n);
                if semi {
                    trace.extend((0..frame.cell.j).map(|k| (None, Some(k))));
                }
                trace.extend(path.iter().rev());
                if semi {
                    trace.extend((start.j..n).map(|k| (None, Some(k))));
                }
                if seen.insert(trace.clone()) {
                    if found.len() == cap {
                        return (best, found, true);
                    }
                    found.push(trace);
                }
                continue;
            }

            moves.clear();
            lattice.moves(frame.cell, &mut moves);
            let depth = path.len();
            for mv in moves.iter().rev() {
                stack.push(Frame {
                    cell: mv.to,
                    depth,
                    column: Some(mv.column),
                });
            }
        }
    }

    (best, found, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::align::score;
    use crate::libs::seq::Alphabet;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn nt(text: &[u8]) -> SymbolSequence {
        SymbolSequence::from_text(text, &Alphabet::nucleotide()).unwrap()
    }

    fn unit_matrix() -> SubstitutionMatrix {
        SubstitutionMatrix::identity(5, 1, -1)
    }

    fn rows(alignment: &Alignment) -> (String, String) {
        alignment.gapped_strings(&Alphabet::nucleotide())
    }

    #[test]
    fn test_global_acgt_agt() {
        let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(-2));
        let outcome = align(&nt(b"ACGT"), &nt(b"AGT"), &unit_matrix(), &params).unwrap();

        // A-A, C-gap, G-G, T-T
        assert_eq!(outcome.score(), 1);
        assert_eq!(outcome.alignments.len(), 1);
        let best = outcome.best();
        assert_eq!(best.gap_columns(), 1);
        assert_eq!(rows(best), ("ACGT".to_string(), "A-GT".to_string()));
        assert!(outcome.truncated.is_none());
    }

    #[test]
    fn test_global_enumerates_ties() {
        // AA vs A: the single A can pair with either position
        let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(-1));
        let outcome = align(&nt(b"AA"), &nt(b"A"), &unit_matrix(), &params).unwrap();
        assert_eq!(outcome.score(), 0);
        let all: Vec<_> = outcome.alignments.iter().map(rows).collect();
        assert_eq!(
            all,
            vec![
                ("AA".to_string(), "-A".to_string()),
                ("AA".to_string(), "A-".to_string()),
            ]
        );
    }

    #[test]
    fn test_cap_reports_truncation() {
        let params =
            AlignParams::new(AlignMode::Global, GapPenalty::Linear(-1)).with_max_number(1);
        let outcome = align(&nt(b"AA"), &nt(b"A"), &unit_matrix(), &params).unwrap();
        assert_eq!(outcome.alignments.len(), 1);
        assert_eq!(outcome.truncated, Some(Truncation { cap: 1 }));
    }

    #[test]
    fn test_cap_exactly_reached_is_not_truncated() {
        let params =
            AlignParams::new(AlignMode::Global, GapPenalty::Linear(-1)).with_max_number(2);
        let outcome = align(&nt(b"AA"), &nt(b"A"), &unit_matrix(), &params).unwrap();
        assert_eq!(outcome.alignments.len(), 2);
        assert!(outcome.truncated.is_none());
    }

    #[test]
    fn test_affine_prefers_one_long_gap() {
        let gap = GapPenalty::Affine {
            open: -5,
            extend: -1,
        };
        let matrix = SubstitutionMatrix::identity(5, 2, -3);
        let params = AlignParams::new(AlignMode::Global, gap);
        let outcome = align(&nt(b"AAACCCTTT"), &nt(b"AAATTT"), &matrix, &params).unwrap();

        // six matches, one gap of three
        assert_eq!(outcome.score(), 6 * 2 + gap.cost(3));
        for alignment in &outcome.alignments {
            assert_eq!(alignment.gap_columns(), 3);
        }
        assert!(outcome
            .alignments
            .iter()
            .any(|a| rows(a) == ("AAACCCTTT".to_string(), "AAA---TTT".to_string())));
    }

    #[test]
    fn test_single_empty_sequence() {
        let seq = nt(b"ACG");
        let empty = nt(b"");

        let linear = AlignParams::new(AlignMode::Global, GapPenalty::Linear(-2));
        let outcome = align(&seq, &empty, &unit_matrix(), &linear).unwrap();
        assert_eq!(outcome.score(), -6);
        assert_eq!(outcome.alignments.len(), 1);
        assert_eq!(
            outcome.best().trace(),
            &[(Some(0), None), (Some(1), None), (Some(2), None)]
        );

        let affine = AlignParams::new(
            AlignMode::Global,
            GapPenalty::Affine {
                open: -4,
                extend: -1,
            },
        );
        let outcome = align(&empty, &seq, &unit_matrix(), &affine).unwrap();
        assert_eq!(outcome.score(), -6);
        assert_eq!(outcome.best().len(), 3);

        let local = AlignParams::new(AlignMode::Local, GapPenalty::Linear(-2));
        let outcome = align(&seq, &empty, &unit_matrix(), &local).unwrap();
        assert_eq!(outcome.score(), 0);
        assert!(outcome.best().is_empty());

        let semi = AlignParams::new(AlignMode::SemiGlobal, GapPenalty::Linear(-2));
        let outcome = align(&empty, &seq, &unit_matrix(), &semi).unwrap();
        assert_eq!(outcome.score(), 0);
        assert_eq!(outcome.alignments.len(), 1);
        assert_eq!(outcome.best().len(), 3);
    }

    #[test]
    fn test_errors() {
        let params = AlignParams::default();
        assert_eq!(
            align(&nt(b""), &nt(b""), &unit_matrix(), &params).unwrap_err(),
            AlignError::EmptyInput
        );

        let small = SubstitutionMatrix::identity(4, 1, -1);
        let err = align(&nt(b"ACGT"), &nt(b"ACNT"), &small, &params).unwrap_err();
        assert_eq!(
            err,
            AlignError::InvalidAlphabet {
                seq: 2,
                pos: 2,
                code: 4,
                dim: 4
            }
        );
    }

    #[test]
    fn test_extreme_penalties() {
        let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(i32::MIN / 2));
        assert!(matches!(
            align(&nt(b"ACGT"), &nt(b"A"), &unit_matrix(), &params),
            Err(AlignError::ScoreRange { .. })
        ));

        let params = AlignParams::new(
            AlignMode::Local,
            GapPenalty::Affine {
                open: i32::MIN,
                extend: -1,
            },
        );
        assert!(matches!(
            align(&nt(b"AC"), &nt(b"AC"), &unit_matrix(), &params),
            Err(AlignError::ScoreRange { .. })
        ));

        let huge = SubstitutionMatrix::identity(5, i32::MAX, i32::MIN);
        let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(-1));
        assert!(matches!(
            align(&nt(b"A"), &nt(b"A"), &huge, &params),
            Err(AlignError::ScoreRange { .. })
        ));

        // large but representable penalties still align
        let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(-1_000_000));
        let outcome = align(&nt(b"ACGT"), &nt(b"AGT"), &unit_matrix(), &params).unwrap();
        assert_eq!(outcome.score(), 3 - 1_000_000);
    }

    #[test]
    fn test_local_finds_core() {
        let matrix = SubstitutionMatrix::nuc();
        for gap in [
            GapPenalty::Linear(-8),
            GapPenalty::Affine {
                open: -10,
                extend: -1,
            },
        ] {
            let params = AlignParams::new(AlignMode::Local, gap);
            let outcome = align(&nt(b"TTTTGATTACATTTT"), &nt(b"CCGATTACACC"), &matrix, &params).unwrap();
            assert_eq!(outcome.score(), 7 * 5);
            assert_eq!(
                rows(outcome.best()),
                ("GATTACA".to_string(), "GATTACA".to_string())
            );
        }
    }

    #[test]
    fn test_local_ties_start_everywhere() {
        // two separate copies of CG in seq1
        let params = AlignParams::new(AlignMode::Local, GapPenalty::Linear(-5));
        let outcome = align(&nt(b"CGAACG"), &nt(b"CG"), &unit_matrix(), &params).unwrap();
        assert_eq!(outcome.score(), 2);
        let traces: Vec<_> = outcome.alignments.iter().map(|a| a.trace().to_vec()).collect();
        assert_eq!(
            traces,
            vec![
                vec![(Some(0), Some(0)), (Some(1), Some(1))],
                vec![(Some(4), Some(0)), (Some(5), Some(1))],
            ]
        );
    }

    #[test]
    fn test_local_no_positive_cell() {
        let params = AlignParams::new(AlignMode::Local, GapPenalty::Linear(-1));
        let outcome = align(&nt(b"AAA"), &nt(b"CCC"), &unit_matrix(), &params).unwrap();
        assert_eq!(outcome.score(), 0);
        assert_eq!(outcome.alignments.len(), 1);
        assert!(outcome.best().is_empty());
    }

    #[test]
    fn test_semi_global_free_ends() {
        let matrix = SubstitutionMatrix::nuc();
        for gap in [
            GapPenalty::Linear(-6),
            GapPenalty::Affine {
                open: -10,
                extend: -1,
            },
        ] {
            let params = AlignParams::new(AlignMode::SemiGlobal, gap);
            let outcome = align(&nt(b"GATT"), &nt(b"CCCGATTCCC"), &matrix, &params).unwrap();
            assert_eq!(outcome.score(), 20);
            assert_eq!(outcome.alignments.len(), 1);
            assert_eq!(
                rows(outcome.best()),
                ("---GATT---".to_string(), "CCCGATTCCC".to_string())
            );
        }
    }

    #[test]
    fn test_zero_gap_global_is_positional_sum() {
        let alphabet = Alphabet::nucleotide();
        let matrix = SubstitutionMatrix::identity(alphabet.len(), 3, 1);
        let params = AlignParams::new(AlignMode::Global, GapPenalty::Linear(0));
        let s1 = nt(b"ACGTAC");
        let s2 = nt(b"AGGTTC");
        let outcome = align(&s1, &s2, &matrix, &params).unwrap();
        let positional: i32 = s1
            .codes()
            .iter()
            .zip(s2.codes())
            .map(|(&a, &b)| matrix.score(a, b))
            .sum();
        // all substitution scores positive: pairing everything is optimal
        assert_eq!(outcome.score(), positional);
    }

    #[test]
    fn test_self_local_covers_whole_sequence() {
        let matrix = SubstitutionMatrix::nuc();
        let seq = nt(b"ACGTTGCAAGT");
        let params = AlignParams::new(AlignMode::Local, GapPenalty::default());
        let outcome = align(&seq, &seq, &matrix, &params).unwrap();
        assert_eq!(outcome.score(), 5 * seq.len() as i32);
        let expected: Vec<Column> = (0..seq.len()).map(|k| (Some(k), Some(k))).collect();
        assert_eq!(outcome.best().trace(), expected.as_slice());
    }

    fn random_seq(rng: &mut SmallRng, max_len: usize) -> SymbolSequence {
        let len = rng.gen_range(1..=max_len);
        let codes = (0..len).map(|_| rng.gen_range(0..4u8)).collect();
        SymbolSequence::new(codes, 5).unwrap()
    }

    #[test]
    fn test_random_traces_rescore_to_optimum() {
        let mut rng = SmallRng::seed_from_u64(7);
        let matrix = SubstitutionMatrix::nuc();
        let gaps = [
            GapPenalty::Linear(-4),
            GapPenalty::Affine {
                open: -8,
                extend: -2,
            },
            GapPenalty::Affine {
                open: -3,
                extend: -3,
            },
        ];
        let modes = [AlignMode::Global, AlignMode::Local, AlignMode::SemiGlobal];

        for _ in 0..60 {
            let s1 = random_seq(&mut rng, 12);
            let s2 = random_seq(&mut rng, 12);
            for gap in gaps {
                for mode in modes {
                    let params = AlignParams::new(mode, gap).with_max_number(50);
                    let outcome = align(&s1, &s2, &matrix, &params).unwrap();
                    assert!(!outcome.alignments.is_empty());
                    if mode == AlignMode::Local {
                        assert!(outcome.score() >= 0);
                    }
                    let mut distinct = FxHashSet::default();
                    for alignment in &outcome.alignments {
                        assert!(distinct.insert(alignment.trace().to_vec()));
                        let rescored = score::recompute(
                            alignment.trace(),
                            &s1,
                            &s2,
                            &matrix,
                            gap,
                            mode,
                        );
                        assert_eq!(rescored, outcome.score(), "{:?} {:?}", mode, gap);
                        check_trace_shape(alignment.trace(), &s1, &s2, mode);
                    }
                }
            }
        }
    }

    fn check_trace_shape(trace: &[Column], s1: &SymbolSequence, s2: &SymbolSequence, mode: AlignMode) {
        let mut last = (None::<usize>, None::<usize>);
        for &(a, b) in trace {
            assert!(a.is_some() || b.is_some());
            if let (Some(p), Some(q)) = (a, last.0) {
                assert_eq!(p, q + 1);
            }
            if let (Some(p), Some(q)) = (b, last.1) {
                assert_eq!(p, q + 1);
            }
            last = (a.or(last.0), b.or(last.1));
        }
        if mode != AlignMode::Local {
            assert_eq!(trace.iter().filter(|c| c.0.is_some()).count(), s1.len());
            assert_eq!(trace.iter().filter(|c| c.1.is_some()).count(), s2.len());
        }
    }
}
