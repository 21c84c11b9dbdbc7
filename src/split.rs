//! Seeded index splitting: the 80/20 holdout split and the shuffled k-fold
//! generator used by cross-validation and grid search.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, StrokeError};

/// Shuffle `0..n` with the given seed and split at `train_fraction`.
pub fn train_valid_split(n: usize, train_fraction: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let cut = (n as f64 * train_fraction).round() as usize;
    let valid = indices.split_off(cut.min(n));
    (indices, valid)
}

/// Shuffled k-fold splits over `0..n`. Folds are disjoint, cover every
/// index, and differ in size by at most one. Each entry is
/// (train_indices, validation_indices). Fewer than two folds, or more
/// folds than rows, is an error.
pub fn kfold(n: usize, k: usize, seed: u64) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
    if k < 2 || n < k {
        return Err(StrokeError::BadFoldCount { rows: n, folds: k });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let base = n / k;
    let remainder = n % k;

    let mut splits = Vec::with_capacity(k);
    let mut start = 0;
    for fold in 0..k {
        let size = base + usize::from(fold < remainder);
        let valid: Vec<usize> = indices[start..start + size].to_vec();
        let train: Vec<usize> = indices[..start]
            .iter()
            .chain(indices[start + size..].iter())
            .copied()
            .collect();
        splits.push((train, valid));
        start += size;
    }

    Ok(splits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn holdout_split_sizes() {
        let (train, valid) = train_valid_split(100, 0.8, 15);
        assert_eq!(train.len(), 80);
        assert_eq!(valid.len(), 20);

        let all: HashSet<usize> = train.iter().chain(valid.iter()).copied().collect();
        assert_eq!(all.len(), 100);
    }

    #[test]
    fn holdout_split_is_reproducible() {
        let a = train_valid_split(50, 0.8, 15);
        let b = train_valid_split(50, 0.8, 15);
        assert_eq!(a, b);

        let c = train_valid_split(50, 0.8, 16);
        assert_ne!(a, c);
    }

    #[test]
    fn kfold_covers_all_indices() {
        let splits = kfold(23, 5, 15).unwrap();
        assert_eq!(splits.len(), 5);

        let mut seen: HashSet<usize> = HashSet::new();
        for (train, valid) in &splits {
            assert_eq!(train.len() + valid.len(), 23);
            for &i in valid {
                // validation folds are disjoint
                assert!(seen.insert(i));
            }
        }
        assert_eq!(seen.len(), 23);
    }

    #[test]
    fn kfold_sizes_differ_by_at_most_one() {
        let splits = kfold(23, 5, 15).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|(_, v)| v.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 23);
        let min = sizes.iter().min().unwrap();
        let max = sizes.iter().max().unwrap();
        assert!(max - min <= 1);
    }

    #[test]
    fn kfold_rejects_bad_fold_counts() {
        for (n, k) in [(10, 0), (10, 1), (3, 5)] {
            let err = kfold(n, k, 15).unwrap_err();
            assert!(matches!(
                err,
                StrokeError::BadFoldCount { rows, folds } if rows == n && folds == k
            ));
        }
    }
}
