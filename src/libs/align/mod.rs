//! Optimal pairwise alignment of integer-coded sequences.
//!
//! * [`align`] runs global (Needleman-Wunsch), local (Smith-Waterman) or
//!   semi-global DP with linear or affine gaps and enumerates co-optimal
//!   tracebacks up to a cap.
//! * [`score::recompute`] scores a trace independently of the DP.
//! * [`seed`] finds word hits to restrict long inputs to a window.

pub mod alignment;
pub mod engine;
pub mod error;
pub mod gap;
pub mod matrix;
pub mod score;
pub mod seed;

pub use alignment::{Alignment, Column};
pub use engine::{align, AlignOutcome, Truncation};
pub use error::AlignError;
pub use gap::{AlignMode, AlignParams, GapPenalty};
pub use matrix::SubstitutionMatrix;
