use ahash::AHashMap;
use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use itertools::Itertools;

use crate::condensed::CondensedMatrix;
use crate::error::{Error, Result};

/// Symmetric name-indexed matrix of pairwise distances, smaller values meaning closer sequences.
///
/// Off-diagonal entries are kept in condensed form. The diagonal is stored separately since
/// self-distances are a policy of the builder and are not assumed to be zero.
#[derive(Clone, Debug)]
pub struct DistanceMatrix {
    names: Vec<String>,
    index: AHashMap<String, usize>,
    condensed: CondensedMatrix,
    diagonal: Vec<f64>,
}

impl DistanceMatrix {
    pub fn new(names: Vec<String>, condensed: CondensedMatrix, diagonal: Vec<f64>) -> Result<Self> {
        if condensed.size() != names.len() || diagonal.len() != names.len() {
            return Err(Error::invalid_condensed(format!(
                "{} names, {} condensed items and {} diagonal entries don't match",
                names.len(),
                condensed.size(),
                diagonal.len()
            )));
        }

        let mut index = AHashMap::with_capacity(names.len());
        for (ind, name) in names.iter().enumerate() {
            if index.insert(name.clone(), ind).is_some() {
                return Err(Error::DuplicateName { name: name.clone() });
            }
        }

        Ok(Self {
            names,
            index,
            condensed,
            diagonal,
        })
    }

    /// Sequence names in the order of matrix rows.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Distance between the i-th and j-th sequences, `None` if out of bounds or missing.
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        let value = if i == j {
            self.diagonal.get(i).copied()
        } else {
            self.condensed.get(i, j)
        };
        value.filter(|x| !x.is_nan())
    }

    pub fn get_by_name(&self, first: &str, second: &str) -> Option<f64> {
        self.get(self.index_of(first)?, self.index_of(second)?)
    }

    pub fn condensed(&self) -> &CondensedMatrix {
        &self.condensed
    }

    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    /// Full square form, missing entries are `NaN`.
    pub fn to_square(&self) -> Vec<Vec<f64>> {
        let mut square = self.condensed.to_square(f64::NAN);
        for (ind, value) in self.diagonal.iter().enumerate() {
            square[ind][ind] = *value;
        }
        square
    }

    /// Pairs `(i, j)` with `i <= j` that have no distance.
    pub fn missing(&self) -> Vec<(usize, usize)> {
        let diagonal = (0..self.len()).map(|ind| (ind, ind));
        let upper = (0..self.len()).tuple_combinations::<(usize, usize)>();
        diagonal
            .chain(upper)
            .filter(|(i, j)| self.get(*i, *j).is_none())
            .sorted()
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.condensed.values().iter().all(|x| !x.is_nan())
            && self.diagonal.iter().all(|x| !x.is_nan())
    }
}

/// Bookkeeping of a single builder run.
#[derive(Clone, PartialEq, Debug, Default, Constructor, Dissolve, Getters)]
pub struct Summary {
    // Distance evaluations scheduled, self-distances included when they are computed
    pairs: usize,
    computed: usize,
    // Pairs skipped after an error
    failed: usize,
    cancelled: bool,
    time_s: f64,
}

#[derive(Clone, Debug, Constructor, Dissolve, Getters)]
pub struct Run {
    matrix: DistanceMatrix,
    summary: Summary,
}
