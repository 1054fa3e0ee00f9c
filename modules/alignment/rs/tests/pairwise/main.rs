use eyre::Result;

use sermo_alignment_rs::pairwise::{Aligner, Mode, SubstitutionMatrix};
use sermo_alignment_rs::{Alphabet, Symbol};

mod global;
mod local;

pub const LATIN: &str = "abcdefghijklmnopqrstuvwxyz";

/// Unit-cost edit distance expressed as an alignment score: match 0, mismatch and gaps -1.
pub fn levenshtein(mode: Mode) -> Result<(Alphabet, Aligner)> {
    let alphabet = Alphabet::new(LATIN.chars())?;
    let scoring = SubstitutionMatrix::uniform(alphabet.clone(), 0.0, -1.0, -1.0)?;
    Ok((alphabet, Aligner::new(scoring, mode)))
}

/// Symmetric, non-uniform scoring over `x`, `y` and `z` with a gap penalty of -4.
pub fn weighted(mode: Mode) -> Result<(Alphabet, Aligner)> {
    #[rustfmt::skip]
    let table = vec![
        vec![ 4.0, -2.0, -1.0],
        vec![-2.0,  5.0, -3.0],
        vec![-1.0, -3.0,  6.0],
    ];
    let scoring = SubstitutionMatrix::labeled(&['x', 'y', 'z'], &['x', 'y', 'z'], &table, -4.0)?;
    let alphabet = scoring.alphabet().unwrap().clone();
    Ok((alphabet, Aligner::new(scoring, mode)))
}

/// Scores of both argument orders must agree under a symmetric table.
pub fn assert_symmetric(alphabet: &Alphabet, aligner: &Aligner) -> Result<()> {
    let words = ["xyz", "zyx", "xxyzz", "yzyzy", "z", "", "xzxzxyyy"];
    for first in words {
        for second in words {
            let (seq1, seq2) = encode(alphabet, [first, second])?;
            let forward = aligner.score(&seq1, &seq2)?;
            eyre::ensure!(
                forward == aligner.score(&seq2, &seq1)?,
                "{first} vs {second}: asymmetric score"
            );
            eyre::ensure!(
                forward == *aligner.align(&seq2, &seq1)?.score(),
                "{first} vs {second}: traceback score differs"
            );
        }
    }
    Ok(())
}

pub fn encode(alphabet: &Alphabet, seqs: [&str; 2]) -> Result<(Vec<Symbol>, Vec<Symbol>)> {
    Ok((alphabet.encode(seqs[0])?, alphabet.encode(seqs[1])?))
}
