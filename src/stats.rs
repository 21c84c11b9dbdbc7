//! Small numeric summaries used by the EDA report and the preprocessing
//! stage. Generic over the float type through `num` so the helpers work on
//! both f32 and f64 slices.

use num::Float;

pub fn mean<F: Float>(values: &[F]) -> Option<F> {
    if values.is_empty() {
        return None;
    }
    let sum = values.iter().fold(F::zero(), |acc, &v| acc + v);
    Some(sum / F::from(values.len())?)
}

/// Population variance (the normalization sklearn's StandardScaler uses).
pub fn variance<F: Float>(values: &[F]) -> Option<F> {
    let m = mean(values)?;
    let sum_sq = values
        .iter()
        .fold(F::zero(), |acc, &v| acc + (v - m) * (v - m));
    Some(sum_sq / F::from(values.len())?)
}

pub fn std_dev<F: Float>(values: &[F]) -> Option<F> {
    variance(values).map(|v| v.sqrt())
}

pub fn median<F: Float>(values: &[F]) -> Option<F> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / F::from(2.0)?)
    } else {
        Some(sorted[mid])
    }
}

pub fn min<F: Float>(values: &[F]) -> Option<F> {
    values.iter().copied().reduce(F::min)
}

pub fn max<F: Float>(values: &[F]) -> Option<F> {
    values.iter().copied().reduce(F::max)
}
