pub use alphabet::Alphabet;
pub use error::{Error, Result};
pub use sermo_core_rs::Alignable;

mod alphabet;
mod error;
pub mod pairwise;

/// Dense index of a symbol in an alphabet. The gap symbol always takes the index right after
/// the last alphabet symbol.
pub type Symbol = u32;
