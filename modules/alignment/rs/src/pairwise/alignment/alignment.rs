use std::ops::Range;

use ahash::AHashSet;
use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;

use sermo_core_rs::Alignable;

use super::op::Op;
use super::step::Step;

/// Optimal correspondence between two sequences.
///
/// `seq1` and `seq2` are the aligned sub-ranges of the input sequences. For global alignments
/// they cover both sequences completely, local alignments are anchored at the best sub-ranges.
#[derive(Clone, PartialEq, Debug, Getters, Constructor, Dissolve)]
pub struct Alignment<S> {
    score: S,
    steps: Vec<Step<u32>>,
    seq1: Range<usize>,
    seq2: Range<usize>,
}

impl<S> Alignment<S> {
    /// Alignment without any steps, e.g. the best local alignment of dissimilar sequences.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Number of alignment columns.
    pub fn len(&self) -> usize {
        self.steps.iter().map(|x| *x.len() as usize).sum()
    }

    /// Run-length encoded path, e.g. `3=1X1v2=`.
    pub fn rle(&self) -> String {
        Step::rle_string(self.steps.iter())
    }

    /// Alignment columns as (operation, position in seq1, position in seq2). Positions refer to
    /// the symbols consumed by the operation, gaps report the position of the next symbol.
    pub fn columns(&self) -> impl Iterator<Item = (Op, usize, usize)> + '_ {
        let (mut seq1, mut seq2) = (self.seq1.start, self.seq2.start);
        self.steps
            .iter()
            .flat_map(|step| std::iter::repeat_n(*step.op(), *step.len() as usize))
            .map(move |op| {
                let column = (op, seq1, seq2);
                op.apply(&mut seq1, &mut seq2, 1);
                column
            })
    }

    /// Pairs of sequence positions aligned against each other.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.columns()
            .filter(|(op, _, _)| op.is_diagonal())
            .map(|(_, seq1, seq2)| (seq1, seq2))
    }

    /// True if both alignments pair up at least one identical pair of positions.
    pub fn intersects(&self, other: &Self) -> bool {
        let overlaps = |a: &Range<usize>, b: &Range<usize>| a.start < b.end && b.start < a.end;
        if !overlaps(&self.seq1, &other.seq1) || !overlaps(&self.seq2, &other.seq2) {
            return false;
        }

        let cells: AHashSet<_> = self.cells().collect();
        other.cells().any(|x| cells.contains(&x))
    }

    /// Two equal-length rows of the alignment, `None` marking gaps.
    pub fn gapped<A1, A2, Smb>(&self, seq1: &A1, seq2: &A2) -> (Vec<Option<Smb>>, Vec<Option<Smb>>)
    where
        A1: Alignable<Symbol = Smb> + ?Sized,
        A2: Alignable<Symbol = Smb> + ?Sized,
        Smb: Copy,
    {
        let len = self.len();
        let (mut row1, mut row2) = (Vec::with_capacity(len), Vec::with_capacity(len));
        for (op, pos1, pos2) in self.columns() {
            match op {
                Op::Match | Op::Mismatch => {
                    row1.push(Some(*seq1.at(pos1)));
                    row2.push(Some(*seq2.at(pos2)));
                }
                Op::GapFirst => {
                    row1.push(None);
                    row2.push(Some(*seq2.at(pos2)));
                }
                Op::GapSecond => {
                    row1.push(Some(*seq1.at(pos1)));
                    row2.push(None);
                }
            }
        }
        (row1, row2)
    }
}
