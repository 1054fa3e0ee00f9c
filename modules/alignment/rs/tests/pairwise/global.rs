use eyre::Result;
use rayon::prelude::*;

use sermo_alignment_rs::pairwise::{Aligner, Mode, SubstitutionMatrix, TieBreak};
use sermo_alignment_rs::{Alphabet, Error, Symbol};

use super::{assert_symmetric, encode, levenshtein, weighted};

#[test]
fn test_edit_distance() -> Result<()> {
    let (alphabet, aligner) = levenshtein(Mode::Global)?;
    for (seqs, distance) in [
        (["sitting", "kitten"], 3.0),
        (["sunday", "saturday"], 3.0),
        (["flaw", "lawn"], 2.0),
        (["abc", "abc"], 0.0),
    ] {
        let (seq1, seq2) = encode(&alphabet, seqs)?;
        assert_eq!(-aligner.score(&seq1, &seq2)?, distance, "{seqs:?}");
        assert_eq!(-aligner.score(&seq2, &seq1)?, distance, "{seqs:?}");
        assert_eq!(-aligner.align(&seq1, &seq2)?.score(), distance, "{seqs:?}");
    }
    Ok(())
}

#[test]
fn test_empty_sequences() -> Result<()> {
    let alphabet = Alphabet::new("ab".chars())?;
    let scoring = SubstitutionMatrix::uniform(alphabet.clone(), 1.0, -1.0, -2.5)?;
    let aligner = Aligner::new(scoring, Mode::Global);

    let (empty, seq) = encode(&alphabet, ["", "abba"])?;
    assert_eq!(aligner.score(&empty, &seq)?, -10.0);
    assert_eq!(aligner.score(&seq, &empty)?, -10.0);
    assert_eq!(aligner.score(&empty, &empty)?, 0.0);

    let alignment = aligner.align(&seq, &empty)?;
    assert_eq!(alignment.rle(), "4^");
    assert_eq!(*alignment.seq1(), 0..4);
    assert_eq!(*alignment.seq2(), 0..0);

    let alignment = aligner.align(&empty, &empty)?;
    assert!(alignment.is_empty());
    assert_eq!(*alignment.score(), 0.0);
    Ok(())
}

#[test]
fn test_self_score() -> Result<()> {
    let (alphabet, aligner) = levenshtein(Mode::Global)?;
    let seq = alphabet.encode("abracadabra")?;
    assert_eq!(aligner.score(&seq, &seq)?, 0.0);

    // Frequent symbols may be penalized even when aligned against themselves
    let a = alphabet.index('a').unwrap();
    let r = alphabet.index('r').unwrap();
    let scoring = SubstitutionMatrix::uniform(alphabet.clone(), 2.0, -1.0, -1.0)?
        .with_self_score(a, -1.5)?
        .with_self_score(r, 0.5)?;
    let aligner = Aligner::new(scoring, Mode::Global);

    let expected: f64 = seq.iter().map(|x| aligner.scoring().score(*x, *x)).sum();
    assert_eq!(expected, 5.0 * -1.5 + 2.0 * 0.5 + 4.0 * 2.0);
    assert_eq!(aligner.score(&seq, &seq)?, expected);
    assert_eq!(aligner.align(&seq, &seq)?.rle(), "11=");
    Ok(())
}

#[test]
fn test_labeled_matrix() -> Result<()> {
    #[rustfmt::skip]
    let table = vec![
        vec![ 4.0, -2.0, -1.0],
        vec![-2.0,  5.0, -3.0],
        vec![-1.0, -3.0,  6.0],
    ];
    // Columns are listed in a different order than rows
    let permuted: Vec<Vec<f64>> = table.iter().map(|x| vec![x[1], x[2], x[0]]).collect();
    let scoring =
        SubstitutionMatrix::labeled(&['x', 'y', 'z'], &['y', 'z', 'x'], &permuted, -4.0)?;
    let alphabet = scoring.alphabet().unwrap().clone();
    let aligner = Aligner::new(scoring, Mode::Global);

    let (seq1, seq2) = encode(&alphabet, ["xyz", "xz"])?;
    let alignment = aligner.align(&seq1, &seq2)?;
    assert_eq!(*alignment.score(), 4.0 - 4.0 + 6.0);
    assert_eq!(alignment.rle(), "1=1^1=");

    let (row1, row2) = alignment.gapped(&seq1, &seq2);
    assert_eq!(alphabet.render(&row1), "xyz");
    assert_eq!(alphabet.render(&row2), "x#z");
    Ok(())
}

#[test]
fn test_symmetric_scoring() -> Result<()> {
    let (alphabet, aligner) = weighted(Mode::Global)?;
    assert_symmetric(&alphabet, &aligner)?;

    let (seq1, seq2) = encode(&alphabet, ["xyz", "zyx"])?;
    assert_eq!(aligner.score(&seq1, &seq2)?, -1.0 + 5.0 - 1.0);
    Ok(())
}

#[test]
fn test_tiebreak() -> Result<()> {
    let (alphabet, aligner) = levenshtein(Mode::Global)?;
    let (seq1, seq2) = encode(&alphabet, ["ab", "ba"])?;

    // Every optimal path scores the same, only the reported one differs
    let reference = aligner.align(&seq1, &seq2)?;
    assert_eq!(*reference.score(), -2.0);
    assert_eq!(reference.rle(), "1v1=1^");

    let aligner = aligner.with_tiebreak(TieBreak::DiagonalFirst);
    let diagonal = aligner.align(&seq1, &seq2)?;
    assert_eq!(*diagonal.score(), -2.0);
    assert_eq!(diagonal.rle(), "2X");
    Ok(())
}

#[test]
fn test_unknown_symbol() -> Result<()> {
    let (_, aligner) = levenshtein(Mode::Global)?;
    let valid: Vec<Symbol> = vec![0, 1, 2];
    let invalid: Vec<Symbol> = vec![0, 1, 26, 2];

    let expected = Error::UnknownSymbol {
        symbol: "'#'".to_string(),
        position: 2,
    };
    assert_eq!(aligner.score(&valid, &invalid), Err(expected.clone()));
    assert_eq!(aligner.align(&invalid, &valid), Err(expected));

    let invalid: Vec<Symbol> = vec![100];
    assert!(matches!(
        aligner.score(&invalid, &valid),
        Err(Error::UnknownSymbol { position: 0, .. })
    ));
    Ok(())
}

#[test]
fn test_shared_between_threads() -> Result<()> {
    let (alphabet, aligner) = levenshtein(Mode::Global)?;
    let aligner = &aligner;
    let words = [
        "kitten", "sitting", "sunday", "saturday", "rosettacode", "raisethysword", "", "a",
    ];
    let words: Vec<Vec<Symbol>> = words
        .iter()
        .map(|x| alphabet.encode(x))
        .collect::<Result<_, _>>()?;

    let sequential: Vec<f64> = words
        .iter()
        .flat_map(|a| words.iter().map(move |b| aligner.score(a, b)))
        .collect::<Result<_, _>>()?;

    let pool = rayon::ThreadPoolBuilder::new().num_threads(4).build()?;
    for _ in 0..8 {
        let parallel: Vec<f64> = pool.install(|| {
            words
                .par_iter()
                .flat_map_iter(|a| {
                    words
                        .iter()
                        .map(move |b| aligner.align(a, b).map(|x| *x.score()))
                })
                .collect::<Result<_, _>>()
        })?;
        assert_eq!(parallel, sequential);
    }
    Ok(())
}
