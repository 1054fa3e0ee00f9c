use std::fmt::{Display, Formatter};
use std::hash::Hash;
use std::str::FromStr;

use derive_getters::{Dissolve, Getters};
use derive_more::Constructor;
use eyre::eyre;

use sermo_alignment_rs::pairwise::Aligner;
use sermo_alignment_rs::Symbol;
use sermo_core_rs::num::Float;

use crate::heuristics;

/// Pairwise distance between two sequences, smaller values meaning closer sequences.
///
/// Implementations are shared by all workers of the distance matrix builder and must not keep
/// mutable per-call state outside of thread-local storage.
pub trait Distance<Smb>: Send + Sync {
    fn distance(&self, a: &[Smb], b: &[Smb]) -> sermo_alignment_rs::Result<f64>;
}

impl<Smb, F> Distance<Smb> for F
where
    F: Fn(&[Smb], &[Smb]) -> sermo_alignment_rs::Result<f64> + Send + Sync,
{
    fn distance(&self, a: &[Smb], b: &[Smb]) -> sermo_alignment_rs::Result<f64> {
        self(a, b)
    }
}

/// Negated optimal alignment score, so that better alignments give smaller distances.
#[derive(Clone, Debug, Constructor, Getters, Dissolve)]
pub struct AlignmentDistance<S: Float = f64> {
    aligner: Aligner<S>,
}

impl<S: Float> Distance<Symbol> for AlignmentDistance<S> {
    fn distance(&self, a: &[Symbol], b: &[Symbol]) -> sermo_alignment_rs::Result<f64> {
        let score = self.aligner.score(a, b)?;
        Ok(-score.to_f64().unwrap_or(f64::NAN))
    }
}

/// Matrix-free distances. LCS length is negated, normalized similarities `s` become `1 - s`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Heuristic {
    Lcs,
    Ratio,
    JaroWinkler,
    Jaccard,
}

impl Heuristic {
    pub fn name(&self) -> &'static str {
        match self {
            Heuristic::Lcs => "lcs",
            Heuristic::Ratio => "ratio",
            Heuristic::JaroWinkler => "jaro-winkler",
            Heuristic::Jaccard => "jaccard",
        }
    }
}

impl<Smb: Eq + Hash + Send + Sync> Distance<Smb> for Heuristic {
    fn distance(&self, a: &[Smb], b: &[Smb]) -> sermo_alignment_rs::Result<f64> {
        Ok(match self {
            Heuristic::Lcs => -(heuristics::lcs_length(a, b) as f64),
            Heuristic::Ratio => 1.0 - heuristics::ratio(a, b),
            Heuristic::JaroWinkler => 1.0 - heuristics::jaro_winkler(a, b),
            Heuristic::Jaccard => 1.0 - heuristics::jaccard(a, b),
        })
    }
}

impl FromStr for Heuristic {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "lcs" => Ok(Heuristic::Lcs),
            "ratio" => Ok(Heuristic::Ratio),
            "jaro-winkler" => Ok(Heuristic::JaroWinkler),
            "jaccard" => Ok(Heuristic::Jaccard),
            _ => Err(eyre!(
                "Unknown heuristic '{s}', expected one of: lcs, ratio, jaro-winkler, jaccard"
            )),
        }
    }
}

impl Display for Heuristic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
