use eyre::Result;

use sermo_alignment_rs::pairwise::{Aligner, Mode, Peaks, SubstitutionMatrix};
use sermo_alignment_rs::Alphabet;

use super::{assert_symmetric, encode, levenshtein, weighted};

fn aligner(symbols: &str) -> Result<(Alphabet, Aligner)> {
    let alphabet = Alphabet::new(symbols.chars())?;
    let scoring = SubstitutionMatrix::uniform(alphabet.clone(), 1.0, -1.0, -1.0)?;
    Ok((alphabet, Aligner::new(scoring, Mode::Local)))
}

#[test]
fn test_best_local_alignment() -> Result<()> {
    let (alphabet, aligner) = aligner("abcd")?;
    let (seq1, seq2) = encode(&alphabet, ["abc", "abcddabc"])?;

    // Two equally good hits, the first one in row-major order is reported
    let alignment = aligner.align(&seq1, &seq2)?;
    assert_eq!(*alignment.score(), 3.0);
    assert_eq!(alignment.rle(), "3=");
    assert_eq!(*alignment.seq1(), 0..3);
    assert_eq!(*alignment.seq2(), 0..3);
    assert_eq!(aligner.score(&seq1, &seq2)?, 3.0);

    let alignment = aligner.align(&seq2, &seq1)?;
    assert_eq!(*alignment.seq1(), 0..3);
    assert_eq!(*alignment.seq2(), 0..3);
    Ok(())
}

#[test]
fn test_symmetric_scoring() -> Result<()> {
    let (alphabet, aligner) = weighted(Mode::Local)?;
    assert_symmetric(&alphabet, &aligner)?;

    // "yz-z" against "yzyz": a single gap is cheaper than losing the second "z" match
    let (seq1, seq2) = encode(&alphabet, ["xxyzz", "yzyzy"])?;
    assert_eq!(aligner.score(&seq1, &seq2)?, 5.0 + 6.0 - 4.0 + 6.0);
    assert_eq!(aligner.align(&seq1, &seq2)?.rle(), "2=1v1=");
    Ok(())
}

#[test]
fn test_never_negative() -> Result<()> {
    let (alphabet, aligner) = levenshtein(Mode::Local)?;
    for seqs in [["abc", "xyz"], ["", "abc"], ["", ""], ["kitten", "sitting"]] {
        let (seq1, seq2) = encode(&alphabet, seqs)?;
        let alignment = aligner.align(&seq1, &seq2)?;
        assert_eq!(*alignment.score(), 0.0, "{seqs:?}");
        assert!(alignment.is_empty(), "{seqs:?}");
        assert_eq!(aligner.score(&seq1, &seq2)?, 0.0, "{seqs:?}");
    }
    Ok(())
}

#[test]
fn test_local_peaks() -> Result<()> {
    let (alphabet, aligner) = aligner("abcd")?;
    let (seq1, seq2) = encode(&alphabet, ["abc", "abcddabc"])?;

    let alignments = aligner.local_alignments(&seq1, &seq2, &Peaks::default())?;
    assert_eq!(alignments.len(), 2);
    assert!(alignments.iter().all(|x| *x.score() == 3.0 && x.rle() == "3="));
    assert_eq!(*alignments[0].seq2(), 0..3);
    assert_eq!(*alignments[1].seq2(), 5..8);

    let limited = aligner.local_alignments(&seq1, &seq2, &Peaks::new(0.0, Some(1), false))?;
    assert_eq!(limited, alignments[..1]);

    let none = aligner.local_alignments(&seq1, &seq2, &Peaks::new(3.5, None, false))?;
    assert!(none.is_empty());
    Ok(())
}

#[test]
fn test_overlapping_peaks() -> Result<()> {
    let (alphabet, aligner) = aligner("axy")?;
    let (seq1, seq2) = encode(&alphabet, ["aaaaxa", "aaaaya"])?;

    let alignments = aligner.local_alignments(&seq1, &seq2, &Peaks::new(4.0, None, false))?;
    assert_eq!(alignments.len(), 2);
    assert_eq!(alignments[0].rle(), "4=");
    assert_eq!(alignments[1].rle(), "4=1X1=");
    assert!(alignments[0].intersects(&alignments[1]));
    assert_eq!(aligner.align(&seq1, &seq2)?, alignments[0]);

    // The second alignment extends the first one through the mismatch
    let distinct = aligner.local_alignments(&seq1, &seq2, &Peaks::new(4.0, None, true))?;
    assert_eq!(distinct, alignments[..1]);
    Ok(())
}

#[test]
fn test_global_aligner_reports_local_peaks() -> Result<()> {
    let alphabet = Alphabet::new("abcd".chars())?;
    let scoring = SubstitutionMatrix::uniform(alphabet.clone(), 1.0, -1.0, -1.0)?;
    let global = Aligner::new(scoring, Mode::Global);
    let (_, local) = aligner("abcd")?;

    let (seq1, seq2) = encode(&alphabet, ["abc", "abcddabc"])?;
    assert_eq!(
        global.local_alignments(&seq1, &seq2, &Peaks::default())?,
        local.local_alignments(&seq1, &seq2, &Peaks::default())?
    );
    Ok(())
}
