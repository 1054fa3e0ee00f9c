use derive_more::{Display, Error};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum Error {
    /// Distance between two sequences of the corpus could not be computed.
    #[display("Failed to compute the distance between '{first}' and '{second}': {source}")]
    Pair {
        first: String,
        second: String,
        source: sermo_alignment_rs::Error,
    },

    /// The metric returned NaN or an infinity, which can't be stored as a distance.
    #[display("Distance between '{first}' and '{second}' is not a finite number: {value}")]
    NonFinite {
        first: String,
        second: String,
        value: f64,
    },

    #[display("Sequence name '{name}' occurs more than once")]
    DuplicateName { name: String },

    #[display("Invalid condensed matrix: {reason}")]
    InvalidCondensed { reason: String },
}

impl Error {
    pub(crate) fn invalid_condensed(reason: impl Into<String>) -> Self {
        Error::InvalidCondensed {
            reason: reason.into(),
        }
    }
}
