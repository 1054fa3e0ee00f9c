use crate::error::{Error, Result};

/// Upper triangle of a symmetric `n x n` matrix without the diagonal, stored row by row.
///
/// The entry for `i < j` lives at `n*i - i*(i+1)/2 + (j - i - 1)`, which is the layout of the
/// conventional "square-form" transform. Missing entries are `NaN`.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct CondensedMatrix {
    n: usize,
    values: Vec<f64>,
}

impl CondensedMatrix {
    /// Matrix over `n` items with every entry missing.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            values: vec![f64::NAN; Self::len_for(n)],
        }
    }

    pub fn from_values(n: usize, values: Vec<f64>) -> Result<Self> {
        if values.len() != Self::len_for(n) {
            return Err(Error::invalid_condensed(format!(
                "{n} items need {} condensed entries, got {}",
                Self::len_for(n),
                values.len()
            )));
        }
        Ok(Self { n, values })
    }

    /// Collect the upper triangle of a symmetric square matrix. The diagonal is ignored.
    pub fn from_square(square: &[Vec<f64>]) -> Result<Self> {
        let n = square.len();
        if let Some((ind, row)) = square.iter().enumerate().find(|(_, row)| row.len() != n) {
            return Err(Error::invalid_condensed(format!(
                "square matrix expected, row {ind} has {} columns instead of {n}",
                row.len()
            )));
        }

        let mut values = Vec::with_capacity(Self::len_for(n));
        for i in 0..n {
            for j in i + 1..n {
                let (upper, lower) = (square[i][j], square[j][i]);
                if upper != lower && !(upper.is_nan() && lower.is_nan()) {
                    return Err(Error::invalid_condensed(format!(
                        "matrix is not symmetric: [{i}][{j}] = {upper}, [{j}][{i}] = {lower}"
                    )));
                }
                values.push(upper);
            }
        }
        Ok(Self { n, values })
    }

    /// Number of condensed entries for `n` items: `n * (n - 1) / 2`.
    pub fn len_for(n: usize) -> usize {
        n * n.saturating_sub(1) / 2
    }

    #[inline(always)]
    pub fn index(n: usize, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < n);
        n * i - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Number of items, i.e. rows of the square form.
    pub fn size(&self) -> usize {
        self.n
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Entry for an off-diagonal pair in either order. `None` for the diagonal and out of bounds.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let (i, j) = if i < j { (i, j) } else { (j, i) };
        if i == j || j >= self.n {
            return None;
        }
        Some(self.values[Self::index(self.n, i, j)])
    }

    /// Expand into the full symmetric matrix with `diagonal` on the main diagonal.
    pub fn to_square(&self, diagonal: f64) -> Vec<Vec<f64>> {
        let mut square = vec![vec![diagonal; self.n]; self.n];
        let mut values = self.values.iter();
        for i in 0..self.n {
            for j in i + 1..self.n {
                if let Some(value) = values.next() {
                    square[i][j] = *value;
                    square[j][i] = *value;
                }
            }
        }
        square
    }

    /// Disjoint mutable slices for every row of the upper triangle: `(i, [d(i, i+1), .., d(i, n-1)])`.
    pub(crate) fn rows_mut(&mut self) -> Vec<(usize, &mut [f64])> {
        let mut rows = Vec::with_capacity(self.n);
        let mut rest = self.values.as_mut_slice();
        for i in 0..self.n {
            let (row, tail) = std::mem::take(&mut rest).split_at_mut(self.n - i - 1);
            rows.push((i, row));
            rest = tail;
        }
        rows
    }
}
