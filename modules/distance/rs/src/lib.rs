pub use builder::{DistanceMatrixBuilder, OnError, SelfDistance};
pub use condensed::CondensedMatrix;
pub use control::{Cancellation, Progress};
pub use error::{Error, Result};
pub use matrix::{DistanceMatrix, Run, Summary};
pub use metric::{AlignmentDistance, Distance, Heuristic};

mod builder;
mod condensed;
mod control;
mod error;
pub mod heuristics;
mod matrix;
mod metric;
