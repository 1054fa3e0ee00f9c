use sermo_core_rs::num::Float;
use sermo_core_rs::Alignable;

use crate::error::{Error, Result};
use crate::{Alphabet, Symbol};

/// Immutable square table of substitution scores over an alphabet plus the gap symbol.
///
/// Scores are stored densely in row-major order, so `score(a, b)` is a single index lookup.
/// The last row and column hold gap scores: `score(a, gap)` is the penalty for aligning `a`
/// against a gap in the other sequence and `score(gap, b)` is the converse.
#[derive(Clone, Debug, PartialEq)]
pub struct SubstitutionMatrix<S: Float = f64> {
    // Number of symbols in the alphabet, gap excluded
    size: usize,
    scores: Vec<S>,
    alphabet: Option<Alphabet>,
}

impl<S: Float> SubstitutionMatrix<S> {
    /// Build a matrix from a table labeled by symbol characters.
    ///
    /// Columns may list the symbols in a different order than rows, but both must describe the
    /// same set. Row order defines the dense symbol indices. Gap rows/columns are filled with the
    /// single `gap` penalty.
    pub fn labeled(rows: &[char], cols: &[char], table: &[Vec<S>], gap: S) -> Result<Self> {
        if rows.len() != cols.len() {
            return Err(Error::invalid_matrix(format!(
                "table has {} row labels but {} column labels",
                rows.len(),
                cols.len()
            )));
        }
        ensure_square(table, rows.len())?;

        for label in rows.iter().chain(cols) {
            if *label == Alphabet::GAP {
                return Err(Error::invalid_matrix(format!(
                    "the gap symbol '{}' is used as a table label",
                    Alphabet::GAP
                )));
            }
        }

        let alphabet = Alphabet::new(rows.iter().copied()).map_err(|err| match err {
            Error::InvalidAlphabet { reason } => Error::InvalidMatrix { reason },
            err => err,
        })?;

        // Position of each table column in the dense index space
        let mut permutation = Vec::with_capacity(cols.len());
        let mut seen = vec![false; cols.len()];
        for label in cols {
            let ind = alphabet.index(*label).ok_or_else(|| {
                Error::invalid_matrix(format!(
                    "column label '{label}' doesn't match any row label"
                ))
            })? as usize;
            if seen[ind] {
                return Err(Error::invalid_matrix(format!(
                    "column label '{label}' occurs more than once"
                )));
            }
            seen[ind] = true;
            permutation.push(ind);
        }
        if permutation.iter().enumerate().any(|(col, ind)| col != *ind) {
            log::debug!("Reordering substitution table columns to match the row order");
        }

        let mut matrix = Self::filled(rows.len(), gap);
        for (row, values) in table.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                matrix.set(row, permutation[col], *value);
            }
        }
        matrix.alphabet = Some(alphabet);
        matrix.ensure_finite()?;
        Ok(matrix)
    }

    /// Build a matrix directly in the dense index space: `table[a][b]` is the score of aligning
    /// symbol `a` with symbol `b`, and the gap symbol is `table.len()`.
    pub fn dense(table: Vec<Vec<S>>, gap: S) -> Result<Self> {
        ensure_square(&table, table.len())?;

        let mut matrix = Self::filled(table.len(), gap);
        for (row, values) in table.into_iter().enumerate() {
            for (col, value) in values.into_iter().enumerate() {
                matrix.set(row, col, value);
            }
        }
        matrix.ensure_finite()?;
        Ok(matrix)
    }

    /// Identity-style matrix: `matches` on the diagonal, `mismatches` everywhere else.
    pub fn uniform(alphabet: Alphabet, matches: S, mismatches: S, gap: S) -> Result<Self> {
        let mut matrix = Self::filled(alphabet.len(), gap);
        for row in 0..matrix.size {
            for col in 0..matrix.size {
                matrix.set(row, col, if row == col { matches } else { mismatches });
            }
        }
        matrix.alphabet = Some(alphabet);
        matrix.ensure_finite()?;
        Ok(matrix)
    }

    /// Override the score of aligning `symbol` with itself, e.g. to penalize self-matches of
    /// overly common symbols. Consumes the matrix, so adjustments happen before it is shared.
    pub fn with_self_score(mut self, symbol: Symbol, score: S) -> Result<Self> {
        if !self.contains(symbol) {
            return Err(Error::UnknownSymbol {
                symbol: symbol.to_string(),
                position: 0,
            });
        }
        if !score.is_finite() {
            return Err(Error::invalid_matrix("self score must be finite"));
        }
        let ind = symbol as usize;
        self.set(ind, ind, score);
        Ok(self)
    }

    fn filled(size: usize, gap: S) -> Self {
        let stride = size + 1;
        let mut scores = vec![gap; stride * stride];
        // Gap against gap never happens in an alignment
        scores[stride * stride - 1] = S::zero();
        Self {
            size,
            scores,
            alphabet: None,
        }
    }

    #[inline(always)]
    fn set(&mut self, row: usize, col: usize, value: S) {
        let stride = self.stride();
        self.scores[row * stride + col] = value;
    }

    fn ensure_finite(&self) -> Result<()> {
        if self.scores.iter().all(|x| x.is_finite()) {
            Ok(())
        } else {
            Err(Error::invalid_matrix("all scores must be finite numbers"))
        }
    }

    /// Number of alphabet symbols, the gap excluded.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Dense index of the gap symbol.
    pub fn gap(&self) -> Symbol {
        self.size as Symbol
    }

    /// Character labels of the matrix, if it was built from a labeled table or an alphabet.
    pub fn alphabet(&self) -> Option<&Alphabet> {
        self.alphabet.as_ref()
    }

    #[inline(always)]
    pub(crate) fn stride(&self) -> usize {
        self.size + 1
    }

    #[inline(always)]
    pub(crate) fn scores(&self) -> &[S] {
        &self.scores
    }

    /// True if `symbol` can appear inside an aligned sequence.
    #[inline(always)]
    pub fn contains(&self, symbol: Symbol) -> bool {
        (symbol as usize) < self.size
    }

    #[inline(always)]
    pub fn score(&self, a: Symbol, b: Symbol) -> S {
        self.scores[a as usize * self.stride() + b as usize]
    }

    /// Score of aligning `a` in the first sequence against a gap in the second one.
    #[inline(always)]
    pub fn gap_penalty(&self, a: Symbol) -> S {
        self.score(a, self.gap())
    }

    pub fn is_symmetric(&self) -> bool {
        let stride = self.stride();
        (0..stride).all(|row| {
            (row + 1..stride)
                .all(|col| self.scores[row * stride + col] == self.scores[col * stride + row])
        })
    }

    /// Fail with `UnknownSymbol` on the first symbol outside the alphabet. The gap symbol is
    /// rejected as well since it may never occur inside an input sequence.
    pub fn validate<A>(&self, sequence: &A) -> Result<()>
    where
        A: Alignable<Symbol = Symbol> + ?Sized,
    {
        match sequence
            .symbols()
            .enumerate()
            .find(|(_, symbol)| !self.contains(**symbol))
        {
            None => Ok(()),
            Some((position, symbol)) => Err(Error::UnknownSymbol {
                symbol: match self.alphabet.as_ref().and_then(|x| x.symbol(*symbol)) {
                    Some(character) => format!("'{character}'"),
                    None => symbol.to_string(),
                },
                position,
            }),
        }
    }
}

fn ensure_square<S>(table: &[Vec<S>], size: usize) -> Result<()> {
    if table.len() != size {
        return Err(Error::invalid_matrix(format!(
            "expected {size} rows, got {}",
            table.len()
        )));
    }
    for (ind, row) in table.iter().enumerate() {
        if row.len() != size {
            return Err(Error::invalid_matrix(format!(
                "table is not square: row {ind} has {} columns instead of {size}",
                row.len()
            )));
        }
    }
    Ok(())
}
