//! Console EDA: dataset shape, target balance and a per-column summary
//! table. Chart rendering and the categorical association statistics of the
//! original analysis are out of scope; everything here prints to stdout.

use std::collections::BTreeMap;

use log::info;
use polars::prelude::*;

use crate::error::Result;
use crate::records::{MAX_BINARY_UNIQUES, TARGET_COLUMN};
use crate::stats;

/// Print the standard exploration block for the cleaned frame.
pub fn explore(df: &DataFrame) -> Result<()> {
    info!("dataset shape: {} rows x {} columns", df.height(), df.width());

    println!("\nDATA SAMPLE:");
    println!("{}", df.head(Some(5)));

    print_target_summary(df)?;

    let summary = feature_summary(df)?;
    println!("\nFEATURE SUMMARY:");
    println!("{summary}");

    Ok(())
}

/// Target balance: count per class plus nulls. The stroke label is heavily
/// imbalanced, which drives the resampling strategies downstream.
pub fn print_target_summary(df: &DataFrame) -> Result<()> {
    let target = df.column(TARGET_COLUMN)?;
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for value in target.i32()?.into_iter().flatten() {
        *counts.entry(value).or_insert(0) += 1;
    }

    println!("\nTARGET SUMMARY:");
    for (value, count) in &counts {
        let pct = 100.0 * *count as f64 / df.height() as f64;
        println!("  {TARGET_COLUMN} = {value}: {count} ({pct:.2}%)");
    }
    println!("  nulls: {}", target.null_count());

    Ok(())
}

/// One row per column: dtype, distinct count, missing count and the numeric
/// summary statistics where they apply.
pub fn feature_summary(df: &DataFrame) -> Result<DataFrame> {
    let n_rows = df.height();

    let mut names: Vec<String> = Vec::new();
    let mut dtypes: Vec<String> = Vec::new();
    let mut uniques: Vec<u32> = Vec::new();
    let mut missing: Vec<u32> = Vec::new();
    let mut pct_missing: Vec<f64> = Vec::new();
    let mut mins: Vec<Option<f64>> = Vec::new();
    let mut maxs: Vec<Option<f64>> = Vec::new();
    let mut means: Vec<Option<f64>> = Vec::new();
    let mut medians: Vec<Option<f64>> = Vec::new();
    let mut stds: Vec<Option<f64>> = Vec::new();

    for series in df.iter() {
        names.push(series.name().to_string());
        dtypes.push(format!("{}", series.dtype()));
        uniques.push(series.n_unique()? as u32);
        missing.push(series.null_count() as u32);
        pct_missing.push(100.0 * series.null_count() as f64 / n_rows as f64);

        match numeric_values(series)? {
            Some(values) => {
                mins.push(stats::min(&values));
                maxs.push(stats::max(&values));
                means.push(stats::mean(&values));
                medians.push(stats::median(&values));
                stds.push(stats::std_dev(&values));
            }
            None => {
                mins.push(None);
                maxs.push(None);
                means.push(None);
                medians.push(None);
                stds.push(None);
            }
        }
    }

    let summary = DataFrame::new(vec![
        Series::new("feature", names),
        Series::new("dtype", dtypes),
        Series::new("n_unique", uniques),
        Series::new("n_missing", missing),
        Series::new("pct_missing", pct_missing),
        Series::new("min", mins),
        Series::new("max", maxs),
        Series::new("mean", means),
        Series::new("median", medians),
        Series::new("std", stds),
    ])?;

    Ok(summary)
}

/// Columns that look numeric but carry fewer than `MAX_BINARY_UNIQUES`
/// distinct values are really encoded categoricals and are reported without
/// summary statistics.
fn numeric_values(series: &Series) -> Result<Option<Vec<f64>>> {
    if !series.dtype().is_numeric() {
        return Ok(None);
    }
    if series.n_unique()? < MAX_BINARY_UNIQUES {
        return Ok(None);
    }
    let cast = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = cast.f64()?.into_iter().flatten().collect();
    Ok(Some(values))
}
