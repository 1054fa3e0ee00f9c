use std::cell::RefCell;
use std::cmp::Ordering;

use itertools::Itertools;
use thread_local::ThreadLocal;

use sermo_core_rs::num::Float;
use sermo_core_rs::Alignable;

pub use config::{Mode, Peaks, TieBreak};
use table::{Rows, Table, Trace};

use crate::error::Result;
use crate::pairwise::alignment::{Alignment, Op, Step};
use crate::pairwise::scoring::SubstitutionMatrix;
use crate::Symbol;

mod config;
mod table;

/// Dynamic-programming aligner bound to a substitution matrix.
///
/// The aligner never mutates its configuration after construction. DP scratch tables live in
/// per-thread slots, so a single `&Aligner` can be shared by any number of worker threads.
/// Each slot holds a full `(len(seq1) + 1) x (len(seq2) + 1)` table for `align` until the aligner
/// is dropped. A slot is shrunk when it is reused for a much smaller pair, so the memory held per
/// thread tracks the pairs recently aligned on it.
pub struct Aligner<S: Float = f64> {
    scoring: SubstitutionMatrix<S>,
    mode: Mode,
    tiebreak: TieBreak,
    tables: ThreadLocal<RefCell<Table<S>>>,
    rows: ThreadLocal<RefCell<Rows<S>>>,
}

impl<S: Float> Aligner<S> {
    pub fn new(scoring: SubstitutionMatrix<S>, mode: Mode) -> Self {
        Self {
            scoring,
            mode,
            tiebreak: TieBreak::default(),
            tables: ThreadLocal::new(),
            rows: ThreadLocal::new(),
        }
    }

    pub fn with_tiebreak(mut self, tiebreak: TieBreak) -> Self {
        self.tiebreak = tiebreak;
        self
    }

    pub fn scoring(&self) -> &SubstitutionMatrix<S> {
        &self.scoring
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tiebreak(&self) -> TieBreak {
        self.tiebreak
    }

    /// Optimal alignment score. Only two table rows are kept in memory and no traceback is
    /// recorded, which makes this the call of choice for bulk distance computations.
    pub fn score<A1, A2>(&self, seq1: &A1, seq2: &A2) -> Result<S>
    where
        A1: Alignable<Symbol = Symbol> + ?Sized,
        A2: Alignable<Symbol = Symbol> + ?Sized,
    {
        self.scoring.validate(seq1)?;
        self.scoring.validate(seq2)?;

        let mut rows = self.rows.get_or_default().borrow_mut();
        Ok(self.sweep(&mut rows, seq1, seq2))
    }

    /// Optimal alignment with traceback. Global alignments end in the bottom-right cell of the
    /// table, local ones in the first cell holding the table maximum.
    pub fn align<A1, A2>(&self, seq1: &A1, seq2: &A2) -> Result<Alignment<S>>
    where
        A1: Alignable<Symbol = Symbol> + ?Sized,
        A2: Alignable<Symbol = Symbol> + ?Sized,
    {
        self.scoring.validate(seq1)?;
        self.scoring.validate(seq2)?;

        let mut table = self.tables.get_or_default().borrow_mut();
        self.fill(&mut table, seq1, seq2, self.mode);

        let end = match self.mode {
            Mode::Global => (table.rows() - 1, table.cols() - 1),
            Mode::Local => table.argmax(),
        };
        Ok(self.traceback(&table, seq1, seq2, end))
    }

    /// Alternative local alignments ending in local peaks of the Smith-Waterman table, best
    /// first (ties ordered by end position). The local recurrence is used regardless of the
    /// aligner mode.
    pub fn local_alignments<A1, A2>(
        &self,
        seq1: &A1,
        seq2: &A2,
        peaks: &Peaks<S>,
    ) -> Result<Vec<Alignment<S>>>
    where
        A1: Alignable<Symbol = Symbol> + ?Sized,
        A2: Alignable<Symbol = Symbol> + ?Sized,
    {
        self.scoring.validate(seq1)?;
        self.scoring.validate(seq2)?;

        let mut table = self.tables.get_or_default().borrow_mut();
        self.fill(&mut table, seq1, seq2, Mode::Local);

        let limit = peaks.limit.unwrap_or(usize::MAX);
        let mut result: Vec<Alignment<S>> = Vec::new();
        for (_, row, col) in table.peaks(peaks.min_score).into_iter().sorted_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then((a.1, a.2).cmp(&(b.1, b.2)))
        }) {
            if result.len() >= limit {
                break;
            }

            let alignment = self.traceback(&table, seq1, seq2, (row, col));
            if peaks.non_overlapping && result.iter().any(|x| x.intersects(&alignment)) {
                continue;
            }
            result.push(alignment);
        }
        Ok(result)
    }

    fn fill<A1, A2>(&self, table: &mut Table<S>, seq1: &A1, seq2: &A2, mode: Mode)
    where
        A1: Alignable<Symbol = Symbol> + ?Sized,
        A2: Alignable<Symbol = Symbol> + ?Sized,
    {
        let (rows, cols) = (seq1.len() + 1, seq2.len() + 1);
        table.reset(rows, cols);

        let scores = self.scoring.scores();
        let stride = self.scoring.stride();
        let gap = self.scoring.gap() as usize * stride;
        let local = mode == Mode::Local;

        // Local borders stay at zero with STOP pointers after the reset
        if !local {
            for row in 1..rows {
                let penalty = scores[*seq1.at(row - 1) as usize * stride + stride - 1];
                let score = table.score(row - 1, 0) + penalty;
                table.set(row, 0, score, Trace::Up);
            }
            for col in 1..cols {
                let penalty = scores[gap + *seq2.at(col - 1) as usize];
                let score = table.score(0, col - 1) + penalty;
                table.set(0, col, score, Trace::Left);
            }
        }

        let order = self.tiebreak.order();
        for row in 1..rows {
            let offset = *seq1.at(row - 1) as usize * stride;
            let up_penalty = scores[offset + stride - 1];
            for col in 1..cols {
                let symbol = *seq2.at(col - 1) as usize;
                let diag = table.score(row - 1, col - 1) + scores[offset + symbol];
                let up = table.score(row - 1, col) + up_penalty;
                let left = table.score(row, col - 1) + scores[gap + symbol];

                let (score, trace) = choose(order, diag, up, left, local);
                table.set(row, col, score, trace);
            }
        }
    }

    fn sweep<A1, A2>(&self, rows: &mut Rows<S>, seq1: &A1, seq2: &A2) -> S
    where
        A1: Alignable<Symbol = Symbol> + ?Sized,
        A2: Alignable<Symbol = Symbol> + ?Sized,
    {
        let cols = seq2.len() + 1;
        rows.reset(cols);

        let scores = self.scoring.scores();
        let stride = self.scoring.stride();
        let gap = self.scoring.gap() as usize * stride;
        let local = self.mode == Mode::Local;

        if !local {
            for col in 1..cols {
                rows.prev[col] = rows.prev[col - 1] + scores[gap + *seq2.at(col - 1) as usize];
            }
        }

        let mut best = S::zero();
        for row in 1..=seq1.len() {
            let offset = *seq1.at(row - 1) as usize * stride;
            let up_penalty = scores[offset + stride - 1];

            let Rows { prev, curr } = &mut *rows;
            curr[0] = if local { S::zero() } else { prev[0] + up_penalty };
            for col in 1..cols {
                let symbol = *seq2.at(col - 1) as usize;
                let mut score = (prev[col - 1] + scores[offset + symbol])
                    .max(prev[col] + up_penalty)
                    .max(curr[col - 1] + scores[gap + symbol]);
                if local {
                    score = score.max(S::zero());
                    best = best.max(score);
                }
                curr[col] = score;
            }
            std::mem::swap(prev, curr);
        }

        if local {
            best
        } else {
            rows.prev[cols - 1]
        }
    }

    fn traceback<A1, A2>(
        &self,
        table: &Table<S>,
        seq1: &A1,
        seq2: &A2,
        end: (usize, usize),
    ) -> Alignment<S>
    where
        A1: Alignable<Symbol = Symbol> + ?Sized,
        A2: Alignable<Symbol = Symbol> + ?Sized,
    {
        let (mut row, mut col) = end;
        let mut ops = Vec::with_capacity(row + col);
        loop {
            match table.trace(row, col) {
                Trace::Stop => break,
                Trace::Diag => {
                    ops.push(if seq1.at(row - 1) == seq2.at(col - 1) {
                        Op::Match
                    } else {
                        Op::Mismatch
                    });
                    row -= 1;
                    col -= 1;
                }
                Trace::Up => {
                    ops.push(Op::GapSecond);
                    row -= 1;
                }
                Trace::Left => {
                    ops.push(Op::GapFirst);
                    col -= 1;
                }
            }
        }

        let mut steps = Vec::with_capacity(ops.len());
        for op in ops.into_iter().rev() {
            Step::push(&mut steps, op);
        }
        Alignment::new(table.score(end.0, end.1), steps, row..end.0, col..end.1)
    }
}

// Candidates are visited in priority order and only a strictly better score replaces the
// current choice. Local mode starts from STOP with a zero score, so STOP wins every tie.
#[inline(always)]
fn choose<S: Float>(order: [Trace; 3], diag: S, up: S, left: S, local: bool) -> (S, Trace) {
    let value = |trace: Trace| match trace {
        Trace::Diag => diag,
        Trace::Up => up,
        Trace::Left => left,
        Trace::Stop => S::zero(),
    };

    let mut best = if local {
        (S::zero(), Trace::Stop)
    } else {
        (value(order[0]), order[0])
    };
    for trace in order {
        let score = value(trace);
        if score > best.0 {
            best = (score, trace);
        }
    }
    best
}

impl<S: Float> Clone for Aligner<S> {
    fn clone(&self) -> Self {
        Self::new(self.scoring.clone(), self.mode).with_tiebreak(self.tiebreak)
    }
}

impl<S: Float> std::fmt::Debug for Aligner<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Aligner")
            .field("mode", &self.mode)
            .field("tiebreak", &self.tiebreak)
            .field("scoring", &self.scoring)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Alphabet;

    fn levenshtein(mode: Mode) -> (Alphabet, Aligner) {
        let alphabet = Alphabet::new("abcdefghijklmnopqrstuvwxyz".chars()).unwrap();
        let scoring = SubstitutionMatrix::uniform(alphabet.clone(), 0.0, -1.0, -1.0).unwrap();
        (alphabet, Aligner::new(scoring, mode))
    }

    #[test]
    fn test_choose() {
        let reference = TieBreak::Reference.order();
        let diagonal = TieBreak::DiagonalFirst.order();

        assert_eq!(choose(reference, 1.0, 1.0, 1.0, false), (1.0, Trace::Up));
        assert_eq!(choose(reference, 1.0, 0.0, 1.0, false), (1.0, Trace::Left));
        assert_eq!(choose(reference, 2.0, 1.0, 1.0, false), (2.0, Trace::Diag));
        assert_eq!(choose(diagonal, 1.0, 1.0, 1.0, false), (1.0, Trace::Diag));
        assert_eq!(choose(diagonal, 0.0, 1.0, 1.0, false), (1.0, Trace::Up));

        // Negative scores are allowed in global mode only
        assert_eq!(choose(reference, -2.0, -3.0, -1.0, false), (-1.0, Trace::Left));
        assert_eq!(choose(reference, -2.0, -3.0, -1.0, true), (0.0, Trace::Stop));
        assert_eq!(choose(diagonal, 0.0, 0.0, 0.0, true), (0.0, Trace::Stop));
    }

    #[test]
    fn test_score_matches_traceback() {
        for mode in [Mode::Global, Mode::Local] {
            let (alphabet, aligner) = levenshtein(mode);
            for (seq1, seq2) in [
                ("sitting", "kitten"),
                ("sunday", "saturday"),
                ("", "abc"),
                ("abc", ""),
                ("", ""),
                ("abcabc", "cba"),
            ] {
                let seq1 = alphabet.encode(seq1).unwrap();
                let seq2 = alphabet.encode(seq2).unwrap();
                assert_eq!(
                    aligner.score(&seq1, &seq2).unwrap(),
                    *aligner.align(&seq1, &seq2).unwrap().score()
                );
            }
        }
    }

    #[test]
    fn test_scratch_is_reused() {
        let (alphabet, aligner) = levenshtein(Mode::Global);
        let long = alphabet.encode("abcdefghij").unwrap();
        let short = alphabet.encode("ab").unwrap();

        assert_eq!(aligner.align(&long, &long).unwrap().rle(), "10=");
        // A smaller run after a larger one must not see stale cells
        assert_eq!(aligner.align(&short, &long).unwrap().rle(), "2=8v");
        assert_eq!(aligner.score(&long, &short).unwrap(), -8.0);
        assert_eq!(aligner.score(&short, &short).unwrap(), 0.0);
    }

    #[test]
    fn test_clone_keeps_configuration() {
        let (_, aligner) = levenshtein(Mode::Local);
        let aligner = aligner.with_tiebreak(TieBreak::DiagonalFirst);
        let clone = aligner.clone();
        assert_eq!(clone.mode(), Mode::Local);
        assert_eq!(clone.tiebreak(), TieBreak::DiagonalFirst);
        assert_eq!(clone.scoring(), aligner.scoring());
    }
}
