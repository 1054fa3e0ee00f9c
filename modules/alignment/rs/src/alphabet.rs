use ahash::AHashMap;

use crate::error::{Error, Result};
use crate::Symbol;

/// Mapping between printable symbols and their dense indices.
///
/// Symbols are numbered `0..len()` in the order they were supplied. The gap symbol is reserved
/// and takes index `len()`; it can never be a member of the alphabet itself.
#[derive(Clone, Debug)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: AHashMap<char, Symbol>,
}

impl Alphabet {
    /// Character used to print gaps.
    pub const GAP: char = '#';

    pub fn new(symbols: impl IntoIterator<Item = char>) -> Result<Self> {
        let symbols: Vec<char> = symbols.into_iter().collect();
        let mut index = AHashMap::with_capacity(symbols.len());

        for (ind, symbol) in symbols.iter().enumerate() {
            if *symbol == Self::GAP {
                return Err(Error::invalid_alphabet(format!(
                    "the gap symbol '{}' is reserved and can't be a part of the alphabet",
                    Self::GAP
                )));
            }
            if index.insert(*symbol, ind as Symbol).is_some() {
                return Err(Error::invalid_alphabet(format!(
                    "symbol '{symbol}' occurs more than once"
                )));
            }
        }

        Ok(Self { symbols, index })
    }

    /// Number of symbols, excluding the gap.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Index reserved for the gap symbol.
    pub fn gap(&self) -> Symbol {
        self.symbols.len() as Symbol
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn index(&self, symbol: char) -> Option<Symbol> {
        self.index.get(&symbol).copied()
    }

    pub fn symbol(&self, index: Symbol) -> Option<char> {
        if index == self.gap() {
            Some(Self::GAP)
        } else {
            self.symbols.get(index as usize).copied()
        }
    }

    /// Translate a string into dense symbol indices.
    pub fn encode(&self, text: &str) -> Result<Vec<Symbol>> {
        text.chars()
            .enumerate()
            .map(|(position, symbol)| {
                self.index(symbol).ok_or_else(|| Error::UnknownSymbol {
                    symbol: format!("'{symbol}'"),
                    position,
                })
            })
            .collect()
    }

    /// Translate dense symbol indices back into a string. Gaps are not allowed here.
    pub fn decode(&self, symbols: &[Symbol]) -> Result<String> {
        symbols
            .iter()
            .enumerate()
            .map(|(position, index)| {
                self.symbols
                    .get(*index as usize)
                    .copied()
                    .ok_or_else(|| Error::UnknownSymbol {
                        symbol: index.to_string(),
                        position,
                    })
            })
            .collect()
    }

    /// Render a gapped sequence (e.g. one row of an alignment), printing gaps as [`Alphabet::GAP`].
    pub fn render(&self, gapped: &[Option<Symbol>]) -> String {
        gapped
            .iter()
            .map(|x| match x {
                Some(index) => self.symbol(*index).unwrap_or('?'),
                None => Self::GAP,
            })
            .collect()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}
