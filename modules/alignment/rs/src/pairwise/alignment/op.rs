/// A single operation of a pairwise alignment.
#[repr(u8)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Hash)]
pub enum Op {
    /// Two identical symbols aligned against each other (=)
    Match,
    /// Two different symbols aligned against each other (X)
    Mismatch,
    /// A gap in the first sequence: consumes one symbol of the second sequence (v)
    GapFirst,
    /// A gap in the second sequence: consumes one symbol of the first sequence (^)
    GapSecond,
}

impl Op {
    /// Diagonal operations consume a symbol from both sequences.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Op::Match | Op::Mismatch)
    }

    pub fn symbol(&self) -> char {
        match self {
            Op::Match => '=',
            Op::Mismatch => 'X',
            Op::GapFirst => 'v',
            Op::GapSecond => '^',
        }
    }

    /// Advance sequence positions by `len` repetitions of the operation.
    pub fn apply(&self, seq1: &mut usize, seq2: &mut usize, len: usize) {
        match self {
            Op::Match | Op::Mismatch => {
                *seq1 += len;
                *seq2 += len;
            }
            Op::GapFirst => *seq2 += len,
            Op::GapSecond => *seq1 += len,
        }
    }
}
