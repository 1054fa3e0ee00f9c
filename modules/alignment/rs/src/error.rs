use derive_more::{Display, Error};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum Error {
    /// The substitution table is not square, its labels disagree, or it mentions the gap symbol.
    #[display("Invalid substitution matrix: {reason}")]
    InvalidMatrix { reason: String },

    #[display("Invalid alphabet: {reason}")]
    InvalidAlphabet { reason: String },

    /// A sequence contains a symbol outside the index space of the substitution matrix.
    #[display("Unknown symbol {symbol} at position {position}")]
    UnknownSymbol { symbol: String, position: usize },
}

impl Error {
    pub(crate) fn invalid_matrix(reason: impl Into<String>) -> Self {
        Error::InvalidMatrix {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_alphabet(reason: impl Into<String>) -> Self {
        Error::InvalidAlphabet {
            reason: reason.into(),
        }
    }
}
