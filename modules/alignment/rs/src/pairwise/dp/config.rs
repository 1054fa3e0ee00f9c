use derive_more::Constructor;

use sermo_core_rs::num::Float;

use super::table::Trace;

/// Alignment recurrence.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum Mode {
    /// Needleman-Wunsch: both sequences are aligned end to end, the score is read from the
    /// bottom-right cell of the table.
    #[default]
    Global,
    /// Smith-Waterman: the path may start and stop anywhere, the score is the table maximum and
    /// never drops below zero.
    Local,
}

/// Preference among moves that reach the same cell score. It never changes the optimal score,
/// only which of the equally good paths is reported by the traceback.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum TieBreak {
    /// Vertical move (gap in the second sequence) first, then horizontal, then diagonal.
    #[default]
    Reference,
    /// Diagonal first, then vertical, then horizontal.
    DiagonalFirst,
}

impl TieBreak {
    /// Moves in the order of decreasing priority. In local mode `Stop` wins every tie on top
    /// of this order.
    #[inline(always)]
    pub(crate) fn order(&self) -> [Trace; 3] {
        match self {
            TieBreak::Reference => [Trace::Up, Trace::Left, Trace::Diag],
            TieBreak::DiagonalFirst => [Trace::Diag, Trace::Up, Trace::Left],
        }
    }
}

/// Filter for local alignment peaks.
#[derive(Clone, PartialEq, Debug, Constructor)]
pub struct Peaks<S: Float> {
    /// Peaks scoring below this value are ignored. Zero-scoring cells are never peaks.
    pub min_score: S,
    /// Report at most this many alignments.
    pub limit: Option<usize>,
    /// Drop alignments sharing an aligned pair of positions with a better one.
    pub non_overlapping: bool,
}

impl<S: Float> Default for Peaks<S> {
    fn default() -> Self {
        Self {
            min_score: S::zero(),
            limit: None,
            non_overlapping: false,
        }
    }
}
