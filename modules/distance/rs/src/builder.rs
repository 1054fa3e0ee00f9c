use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use ahash::AHashSet;
use rayon::prelude::*;
use rayon::ThreadPool;

use sermo_alignment_rs::Symbol;

use crate::condensed::CondensedMatrix;
use crate::control::{Cancellation, Progress};
use crate::error::{Error, Result};
use crate::matrix::{DistanceMatrix, Run, Summary};
use crate::metric::Distance;

/// Diagonal of the distance matrix.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum SelfDistance {
    /// Every sequence is at distance zero from itself.
    Zero,
    /// Self-distances are computed with the metric like any other pair. With scoring tables that
    /// penalize some self-matches the diagonal is not zero.
    Computed,
}

/// Reaction to a pair whose distance can't be computed.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Default)]
pub enum OnError {
    /// Stop the run and report the failed pair.
    #[default]
    Abort,
    /// Leave the entry missing and continue.
    SkipAndMark,
}

pub struct DistanceMatrixBuilder<Smb = Symbol> {
    names: Vec<String>,
    sequences: Vec<Vec<Smb>>,
    duplicate: Option<String>,
    seen: AHashSet<String>,
    self_distance: SelfDistance,
    on_error: OnError,
    thread_pool: Option<ThreadPool>,
    progress: Option<Arc<Progress>>,
    cancellation: Cancellation,
}

impl<Smb> DistanceMatrixBuilder<Smb>
where
    Smb: Send + Sync,
{
    pub fn new(self_distance: SelfDistance) -> Self {
        Self {
            names: Vec::new(),
            sequences: Vec::new(),
            duplicate: None,
            seen: AHashSet::new(),
            self_distance,
            on_error: OnError::default(),
            thread_pool: None,
            progress: None,
            cancellation: Cancellation::default(),
        }
    }

    /// Append named sequences. Matrix rows follow the order of insertion.
    pub fn add_sequences(
        mut self,
        sequences: impl IntoIterator<Item = (impl Into<String>, Vec<Smb>)>,
    ) -> Self {
        for (name, sequence) in sequences {
            let name = name.into();
            if !self.seen.insert(name.clone()) && self.duplicate.is_none() {
                self.duplicate = Some(name.clone());
            }
            self.names.push(name);
            self.sequences.push(sequence);
        }
        self
    }

    pub fn set_thread_pool(mut self, pool: ThreadPool) -> Self {
        self.thread_pool = Some(pool);
        self
    }

    pub fn set_error_policy(mut self, policy: OnError) -> Self {
        self.on_error = policy;
        self
    }

    pub fn set_progress(mut self, progress: Arc<Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn set_cancellation(mut self, cancellation: Cancellation) -> Self {
        self.cancellation = cancellation;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Compute all pairwise distances. Pairs are evaluated in parallel on the configured thread
    /// pool (or the global rayon pool), each row of the upper triangle writing to its own slice
    /// of the condensed matrix.
    pub fn build<D>(&self, metric: &D) -> Result<Run>
    where
        D: Distance<Smb> + ?Sized,
    {
        if let Some(name) = &self.duplicate {
            return Err(Error::DuplicateName { name: name.clone() });
        }

        match &self.thread_pool {
            Some(pool) => pool.install(|| self._build(metric)),
            None => self._build(metric),
        }
    }

    fn _build<D>(&self, metric: &D) -> Result<Run>
    where
        D: Distance<Smb> + ?Sized,
    {
        let start = Instant::now();
        let n = self.sequences.len();
        let pairs = CondensedMatrix::len_for(n);
        let total = match self.self_distance {
            SelfDistance::Zero => pairs,
            SelfDistance::Computed => pairs + n,
        };
        log::info!(
            "Computing {total} distances for {n} sequences on {} threads",
            rayon::current_num_threads()
        );
        if let Some(progress) = &self.progress {
            progress.start(total);
        }

        let mut condensed = CondensedMatrix::new(n);
        let mut diagonal = match self.self_distance {
            SelfDistance::Zero => vec![0.0; n],
            SelfDistance::Computed => vec![f64::NAN; n],
        };

        let report = (total / 100).max(1);
        let completed = AtomicUsize::new(0);
        let computed = AtomicUsize::new(0);
        let aborted = AtomicBool::new(false);
        let failures = Mutex::new(Vec::new());

        let evaluate = |i: usize, j: usize| -> Option<f64> {
            // Cancellation and abort are only checked between pairs
            if self.cancellation.is_cancelled() || aborted.load(Ordering::Relaxed) {
                return None;
            }
            let result = match metric.distance(&self.sequences[i], &self.sequences[j]) {
                Ok(distance) if distance.is_finite() => Ok(distance),
                // NaN marks missing entries, so it is never stored as a computed distance
                Ok(value) => Err(Error::NonFinite {
                    first: self.names[i].clone(),
                    second: self.names[j].clone(),
                    value,
                }),
                Err(source) => Err(Error::Pair {
                    first: self.names[i].clone(),
                    second: self.names[j].clone(),
                    source,
                }),
            };

            let count = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(progress) = &self.progress {
                progress.advance();
            }
            if count % report == 0 {
                log::debug!(
                    "Computed {count}/{total} distances ({:.0}%)",
                    100.0 * count as f64 / total as f64
                );
            }

            match result {
                Ok(distance) => {
                    computed.fetch_add(1, Ordering::Relaxed);
                    Some(distance)
                }
                Err(err) => {
                    match self.on_error {
                        OnError::Abort => aborted.store(true, Ordering::Relaxed),
                        OnError::SkipAndMark => log::warn!("Skipping a distance. {err}"),
                    }
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((i, j, err));
                    None
                }
            }
        };

        condensed.rows_mut().into_par_iter().for_each(|(i, row)| {
            for (offset, slot) in row.iter_mut().enumerate() {
                if let Some(distance) = evaluate(i, i + 1 + offset) {
                    *slot = distance;
                }
            }
        });
        if self.self_distance == SelfDistance::Computed {
            diagonal.par_iter_mut().enumerate().for_each(|(i, slot)| {
                if let Some(distance) = evaluate(i, i) {
                    *slot = distance;
                }
            });
        }

        let mut failures = failures.into_inner().unwrap_or_else(PoisonError::into_inner);
        if self.on_error == OnError::Abort && !failures.is_empty() {
            // Several workers may fail before they observe the abort, report the first pair
            failures.sort_by_key(|(i, j, _)| (*i, *j));
            let (_, _, err) = failures.swap_remove(0);
            log::error!("Distance matrix computation aborted. {err}");
            return Err(err);
        }

        let completed = completed.into_inner();
        let summary = Summary::new(
            total,
            computed.into_inner(),
            failures.len(),
            completed < total && self.cancellation.is_cancelled(),
            start.elapsed().as_secs_f64(),
        );
        if *summary.cancelled() {
            log::info!(
                "Distance matrix computation cancelled after {completed}/{total} distances ({:.2}s)",
                summary.time_s()
            );
        } else {
            log::info!(
                "Computed {} distances in {:.2}s, {} failed",
                summary.computed(),
                summary.time_s(),
                summary.failed()
            );
        }

        let matrix = DistanceMatrix::new(self.names.clone(), condensed, diagonal)?;
        Ok(Run::new(matrix, summary))
    }
}
