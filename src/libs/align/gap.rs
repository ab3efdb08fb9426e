use std::fmt;
use std::str::FromStr;

/// Gap scoring. Values are added to the alignment score, so costs are
/// written as non-positive numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapPenalty {
    /// `penalty * length`
    Linear(i32),
    /// `open + extend * (length - 1)`
    Affine { open: i32, extend: i32 },
}

impl Default for GapPenalty {
    fn default() -> Self {
        GapPenalty::Affine {
            open: -10,
            extend: -1,
        }
    }
}

impl GapPenalty {
    /// Score contribution of one contiguous gap of `len` positions.
    ///
    /// ```
    /// use seqmol::libs::align::GapPenalty;
    /// let affine = GapPenalty::Affine { open: -10, extend: -1 };
    /// assert_eq!(affine.cost(1), -10);
    /// assert_eq!(affine.cost(4), -13);
    /// assert_eq!(GapPenalty::Linear(-2).cost(3), -6);
    /// assert_eq!(affine.cost(0), 0);
    /// ```
    pub fn cost(&self, len: usize) -> i32 {
        if len == 0 {
            return 0;
        }
        let len = i32::try_from(len).unwrap_or(i32::MAX);
        match *self {
            GapPenalty::Linear(penalty) => penalty.saturating_mul(len),
            GapPenalty::Affine { open, extend } => {
                open.saturating_add(extend.saturating_mul(len - 1))
            }
        }
    }

    /// Magnitude of the most a single position can cost.
    pub(crate) fn max_step(&self) -> i64 {
        match *self {
            GapPenalty::Linear(penalty) => penalty.unsigned_abs() as i64,
            GapPenalty::Affine { open, extend } => {
                open.unsigned_abs() as i64 + extend.unsigned_abs() as i64
            }
        }
    }

    pub fn is_affine(&self) -> bool {
        matches!(self, GapPenalty::Affine { .. })
    }
}

impl fmt::Display for GapPenalty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapPenalty::Linear(p) => write!(f, "linear({})", p),
            GapPenalty::Affine { open, extend } => write!(f, "affine({},{})", open, extend),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignMode {
    /// Needleman-Wunsch, both sequences aligned end to end.
    #[default]
    Global,
    /// Smith-Waterman.
    Local,
    /// `seq1` aligned end to end; leading and trailing parts of `seq2`
    /// are free.
    SemiGlobal,
}

impl FromStr for AlignMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "global" => Ok(AlignMode::Global),
            "local" => Ok(AlignMode::Local),
            "semi" | "semiglobal" | "semi_global" | "semi-global" => Ok(AlignMode::SemiGlobal),
            _ => Err(format!("unknown alignment mode: {}", s)),
        }
    }
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignMode::Global => "global",
            AlignMode::Local => "local",
            AlignMode::SemiGlobal => "semi_global",
        };
        write!(f, "{}", name)
    }
}

/// Everything `align` needs besides the sequences and the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignParams {
    pub mode: AlignMode,
    pub gap: GapPenalty,
    /// Upper bound on the number of co-optimal alignments returned.
    pub max_number: usize,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            mode: AlignMode::Global,
            gap: GapPenalty::default(),
            max_number: 1000,
        }
    }
}

impl AlignParams {
    pub fn new(mode: AlignMode, gap: GapPenalty) -> Self {
        Self {
            mode,
            gap,
            ..Default::default()
        }
    }

    pub fn with_max_number(mut self, max_number: usize) -> Self {
        self.max_number = max_number;
        self
    }
}
