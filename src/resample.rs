//! Class-imbalance strategies applied to the training fold only: weighted
//! random oversampling (the class-weight stand-in, since the estimators take
//! no per-sample weights) and SMOTE, which synthesizes minority rows by
//! interpolating towards nearby minority neighbors.

use std::collections::HashMap;

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Result, StrokeError};

pub const SMOTE_NEIGHBORS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImbalanceStrategy {
    /// Leave the training data as-is.
    None,
    /// Duplicate random minority rows until classes are balanced.
    ClassWeight,
    /// Synthetic minority oversampling with k nearest neighbors.
    Smote,
}

impl ImbalanceStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            ImbalanceStrategy::None => "none",
            ImbalanceStrategy::ClassWeight => "weighted",
            ImbalanceStrategy::Smote => "SMOTE",
        }
    }
}

/// Apply the strategy to a training set, returning the (possibly grown)
/// feature rows and labels.
pub fn resample(
    strategy: ImbalanceStrategy,
    x: &[Vec<f64>],
    y: &[i32],
    seed: u64,
) -> Result<(Vec<Vec<f64>>, Vec<i32>)> {
    match strategy {
        ImbalanceStrategy::None => Ok((x.to_vec(), y.to_vec())),
        ImbalanceStrategy::ClassWeight => random_oversample(x, y, seed),
        ImbalanceStrategy::Smote => smote(x, y, SMOTE_NEIGHBORS, seed),
    }
}

/// Minority label, its row indices and the majority class count.
fn class_layout(y: &[i32]) -> Result<(i32, Vec<usize>, usize)> {
    let mut counts: HashMap<i32, usize> = HashMap::new();
    for &label in y {
        *counts.entry(label).or_insert(0) += 1;
    }

    let (&minority, &min_count) = counts
        .iter()
        .min_by_key(|(label, count)| (**count, **label))
        .ok_or(StrokeError::EmptyDataset)?;
    let &max_count = counts.values().max().ok_or(StrokeError::EmptyDataset)?;

    if counts.len() < 2 || min_count == 0 {
        return Err(StrokeError::DegenerateClass { class: minority });
    }

    let indices = (0..y.len()).filter(|&i| y[i] == minority).collect();
    Ok((minority, indices, max_count))
}

/// Duplicate random minority rows to parity. This realizes inverse-frequency
/// class weighting for estimators without sample-weight support.
pub fn random_oversample(
    x: &[Vec<f64>],
    y: &[i32],
    seed: u64,
) -> Result<(Vec<Vec<f64>>, Vec<i32>)> {
    let (minority, indices, max_count) = class_layout(y)?;
    let mut rng = StdRng::seed_from_u64(seed);

    let mut x_out = x.to_vec();
    let mut y_out = y.to_vec();
    for _ in 0..max_count.saturating_sub(indices.len()) {
        let pick = indices[rng.gen_range(0..indices.len())];
        x_out.push(x[pick].clone());
        y_out.push(minority);
    }

    debug!(
        "oversampled class {} from {} to {} rows",
        minority,
        indices.len(),
        max_count
    );
    Ok((x_out, y_out))
}

/// SMOTE: each synthetic row lies on the segment between a random minority
/// row and one of its k nearest minority neighbors (Euclidean distance).
/// Falls back to duplication when the minority class has fewer than 2 rows.
pub fn smote(x: &[Vec<f64>], y: &[i32], k: usize, seed: u64) -> Result<(Vec<Vec<f64>>, Vec<i32>)> {
    let (minority, indices, max_count) = class_layout(y)?;
    if indices.len() < 2 {
        warn!("minority class {minority} has a single row, duplicating instead of interpolating");
        return random_oversample(x, y, seed);
    }

    // at least one neighbor, at most every other minority row
    let k = k.clamp(1, indices.len() - 1);
    let neighbors = nearest_neighbors(x, &indices, k);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut x_out = x.to_vec();
    let mut y_out = y.to_vec();
    for _ in 0..max_count.saturating_sub(indices.len()) {
        let base = rng.gen_range(0..indices.len());
        let neighbor = neighbors[base][rng.gen_range(0..k)];
        let gap: f64 = rng.gen();

        let a = &x[indices[base]];
        let b = &x[neighbor];
        let synthetic: Vec<f64> = a
            .iter()
            .zip(b)
            .map(|(&av, &bv)| av + gap * (bv - av))
            .collect();
        x_out.push(synthetic);
        y_out.push(minority);
    }

    debug!(
        "SMOTE grew class {} from {} to {} rows (k={})",
        minority,
        indices.len(),
        max_count,
        k
    );
    Ok((x_out, y_out))
}

/// For each minority row, the k nearest other minority rows by squared
/// Euclidean distance.
fn nearest_neighbors(x: &[Vec<f64>], indices: &[usize], k: usize) -> Vec<Vec<usize>> {
    indices
        .iter()
        .map(|&i| {
            let mut by_distance: Vec<(f64, usize)> = indices
                .iter()
                .filter(|&&j| j != i)
                .map(|&j| (squared_distance(&x[i], &x[j]), j))
                .collect();
            by_distance
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
            by_distance.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(&av, &bv)| (av - bv) * (av - bv)).sum()
}
