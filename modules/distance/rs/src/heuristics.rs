//! Cheap similarity measures between sequences that don't need a substitution matrix.
//!
//! All functions return similarities: larger values mean more similar sequences. `ratio`,
//! `jaro_winkler` and `jaccard` are normalized to `[0, 1]`.

use std::hash::Hash;

use ahash::AHashSet;

/// Length of the longest common subsequence.
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Ratcliff-Obershelp similarity: `2 * M / (len(a) + len(b))`, where `M` is the number of symbols
/// in the longest common block plus, recursively, the matches to the left and to the right of it.
pub fn ratio<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_blocks(a, b) as f64 / total as f64
}

fn matching_blocks<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mut matches = 0;
    let mut queue = vec![(0..a.len(), 0..b.len())];
    while let Some((ra, rb)) = queue.pop() {
        let (i, j, len) = longest_common_block(&a[ra.clone()], &b[rb.clone()]);
        if len == 0 {
            continue;
        }
        matches += len;

        let (i, j) = (ra.start + i, rb.start + j);
        queue.push((ra.start..i, rb.start..j));
        queue.push((i + len..ra.end, j + len..rb.end));
    }
    matches
}

// (start in a, start in b, length) of the longest common substring, the leftmost one in `a` on ties
fn longest_common_block<T: PartialEq>(a: &[T], b: &[T]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];
    for (i, x) in a.iter().enumerate() {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y { prev[j] + 1 } else { 0 };
            if curr[j + 1] > best.2 {
                let len = curr[j + 1];
                best = (i + 1 - len, j + 1 - len, len);
            }
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    best
}

fn jaro<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let window = (a.len().max(b.len()) / 2).saturating_sub(1);
    let mut amatched = vec![false; a.len()];
    let mut bmatched = vec![false; b.len()];
    let mut matches = 0usize;
    for (i, x) in a.iter().enumerate() {
        let end = (i + window + 1).min(b.len());
        for j in i.saturating_sub(window)..end {
            if !bmatched[j] && *x == b[j] {
                amatched[i] = true;
                bmatched[j] = true;
                matches += 1;
                break;
            }
        }
    }
    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut k = 0;
    for (i, x) in a.iter().enumerate() {
        if !amatched[i] {
            continue;
        }
        while !bmatched[k] {
            k += 1;
        }
        if *x != b[k] {
            transpositions += 1;
        }
        k += 1;
    }

    let m = matches as f64;
    let t = (transpositions / 2) as f64;
    (m / a.len() as f64 + m / b.len() as f64 + (m - t) / m) / 3.0
}

/// Jaro similarity boosted for a common prefix of up to 4 symbols (prefix weight 0.1). The boost
/// is applied only to pairs with Jaro similarity of at least 0.7.
pub fn jaro_winkler<T: PartialEq>(a: &[T], b: &[T]) -> f64 {
    const PREFIX_WEIGHT: f64 = 0.1;
    const MAX_PREFIX: usize = 4;

    let similarity = jaro(a, b);
    if similarity < 0.7 {
        return similarity;
    }

    let prefix = a
        .iter()
        .zip(b)
        .take(MAX_PREFIX)
        .take_while(|(x, y)| x == y)
        .count() as f64;
    (similarity + prefix * PREFIX_WEIGHT * (1.0 - similarity)).min(1.0)
}

/// Size of the intersection over the size of the union of the two symbol sets.
pub fn jaccard<T: Eq + Hash>(a: &[T], b: &[T]) -> f64 {
    let a: AHashSet<&T> = a.iter().collect();
    let b: AHashSet<&T> = b.iter().collect();

    let union = a.union(&b).count();
    if union == 0 {
        return 1.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}
