pub use alignment::{Alignment, Op, Step};
pub use dp::{Aligner, Mode, Peaks, TieBreak};
pub use scoring::SubstitutionMatrix;

pub mod alignment;
pub mod dp;
pub mod scoring;
