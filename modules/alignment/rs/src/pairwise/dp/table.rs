use sermo_core_rs::num::Float;

// Buffers are released once they exceed the requested size this many times over
const SHRINK_FACTOR: usize = 4;
// Buffers below this length are never shrunk
const MIN_RETAINED: usize = 4096;

/// Clear and resize a scratch buffer, releasing memory left over from a much larger table.
fn refill<T: Clone>(buffer: &mut Vec<T>, len: usize, value: T) {
    buffer.clear();
    if buffer.capacity() > SHRINK_FACTOR * len.max(MIN_RETAINED) {
        buffer.shrink_to(len);
    }
    buffer.resize(len, value);
}

/// Move that produced the score of a cell.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub(crate) enum Trace {
    /// Start of the path: table origin, local-mode borders and cells reset to zero.
    #[default]
    Stop,
    /// From the cell above: seq1 symbol against a gap.
    Up,
    /// From the cell on the left: gap against a seq2 symbol.
    Left,
    /// From the diagonal neighbour: seq1 symbol against a seq2 symbol.
    Diag,
}

/// Scratch DP table of `(len(seq1) + 1) x (len(seq2) + 1)` scores with traceback pointers.
/// Allocations are kept between resets, so a worker reuses the same buffers for every pair,
/// unless the previous table was many times larger than the current one.
#[derive(Debug, Default)]
pub(crate) struct Table<S: Float> {
    rows: usize,
    cols: usize,
    scores: Vec<S>,
    traces: Vec<Trace>,
}

impl<S: Float> Table<S> {
    pub fn reset(&mut self, rows: usize, cols: usize) {
        self.rows = rows;
        self.cols = cols;

        refill(&mut self.scores, rows * cols, S::zero());
        refill(&mut self.traces, rows * cols, Trace::Stop);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline(always)]
    pub fn score(&self, row: usize, col: usize) -> S {
        self.scores[row * self.cols + col]
    }

    #[inline(always)]
    pub fn trace(&self, row: usize, col: usize) -> Trace {
        self.traces[row * self.cols + col]
    }

    #[inline(always)]
    pub fn set(&mut self, row: usize, col: usize, score: S, trace: Trace) {
        let ind = row * self.cols + col;
        self.scores[ind] = score;
        self.traces[ind] = trace;
    }

    /// First cell (row-major order) holding the maximum score.
    pub fn argmax(&self) -> (usize, usize) {
        let mut best = (0, S::neg_infinity());
        for (ind, score) in self.scores.iter().enumerate() {
            if *score > best.1 {
                best = (ind, *score);
            }
        }
        (best.0 / self.cols.max(1), best.0 % self.cols.max(1))
    }

    /// Interior cells with a positive score that is not exceeded anywhere in their 3x3
    /// neighbourhood.
    pub fn peaks(&self, min_score: S) -> Vec<(S, usize, usize)> {
        let mut peaks = Vec::new();
        for row in 1..self.rows {
            for col in 1..self.cols {
                let score = self.score(row, col);
                if score <= S::zero() || score < min_score {
                    continue;
                }

                let is_peak = (row - 1..=(row + 1).min(self.rows - 1)).all(|r| {
                    (col - 1..=(col + 1).min(self.cols - 1)).all(|c| self.score(r, c) <= score)
                });
                if is_peak {
                    peaks.push((score, row, col));
                }
            }
        }
        peaks
    }
}

/// Two rolling rows of the DP table, enough to compute a score without traceback.
#[derive(Debug, Default)]
pub(crate) struct Rows<S: Float> {
    pub prev: Vec<S>,
    pub curr: Vec<S>,
}

impl<S: Float> Rows<S> {
    pub fn reset(&mut self, cols: usize) {
        refill(&mut self.prev, cols, S::zero());
        refill(&mut self.curr, cols, S::zero());
    }
}
