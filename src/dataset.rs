//! Typed tabular form of the cleaned frame: numeric columns, categorical
//! columns and the binary label vector. This is the shape the preprocessing
//! and resampling stages work on, so train/validation subsets can be taken
//! before any statistic is fitted.

use polars::prelude::*;

use crate::error::{Result, StrokeError};
use crate::records::{binary_label, ID_COLUMN, MAX_BINARY_UNIQUES, TARGET_COLUMN};

#[derive(Debug, Clone)]
pub struct NumericColumn {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct CategoricalColumn {
    pub name: String,
    pub values: Vec<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct TabularData {
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
    pub labels: Vec<i32>,
}

impl TabularData {
    /// Split the frame into feature columns and the label. Text columns are
    /// categorical; numeric columns with fewer than `MAX_BINARY_UNIQUES`
    /// distinct values are encoded categoricals and get mapped to their
    /// category labels; everything else stays numeric.
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        let target = df.column(TARGET_COLUMN)?.i32()?;
        // a null label would silently misalign every later row with its
        // features, so reject the frame outright
        let null_labels = target.null_count();
        if null_labels > 0 {
            return Err(StrokeError::NullTarget { count: null_labels });
        }
        let labels: Vec<i32> = target.into_no_null_iter().collect();
        if labels.is_empty() {
            return Err(StrokeError::EmptyDataset);
        }

        let mut numeric = Vec::new();
        let mut categorical = Vec::new();

        for series in df.iter() {
            let name = series.name();
            if name == ID_COLUMN || name == TARGET_COLUMN {
                continue;
            }

            match series.dtype() {
                DataType::Utf8 => {
                    let values: Vec<Option<String>> = series
                        .utf8()?
                        .into_iter()
                        .map(|v| v.map(|s| s.to_string()))
                        .collect();
                    categorical.push(CategoricalColumn {
                        name: name.to_string(),
                        values,
                    });
                }
                dtype if dtype.is_numeric() && series.n_unique()? < MAX_BINARY_UNIQUES => {
                    let cast = series.cast(&DataType::Int64)?;
                    let values: Vec<Option<String>> = cast
                        .i64()?
                        .into_iter()
                        .map(|v| v.map(|x| binary_label(name, x)))
                        .collect();
                    categorical.push(CategoricalColumn {
                        name: name.to_string(),
                        values,
                    });
                }
                _ => {
                    let cast = series.cast(&DataType::Float64)?;
                    let values: Vec<Option<f64>> = cast.f64()?.into_iter().collect();
                    numeric.push(NumericColumn {
                        name: name.to_string(),
                        values,
                    });
                }
            }
        }

        Ok(TabularData {
            numeric,
            categorical,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Row subset by index, used for the holdout split and for k-fold
    /// cross-validation.
    pub fn subset(&self, indices: &[usize]) -> TabularData {
        let numeric = self
            .numeric
            .iter()
            .map(|col| NumericColumn {
                name: col.name.clone(),
                values: indices.iter().map(|&i| col.values[i]).collect(),
            })
            .collect();
        let categorical = self
            .categorical
            .iter()
            .map(|col| CategoricalColumn {
                name: col.name.clone(),
                values: indices.iter().map(|&i| col.values[i].clone()).collect(),
            })
            .collect();
        let labels = indices.iter().map(|&i| self.labels[i]).collect();

        TabularData {
            numeric,
            categorical,
            labels,
        }
    }

    /// Count of rows with the given label.
    pub fn class_count(&self, class: i32) -> usize {
        self.labels.iter().filter(|&&v| v == class).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Series::new(ID_COLUMN, vec![1i32, 2, 3, 4]),
            Series::new("age", vec![67.0, 61.0, 80.0, 49.0]),
            Series::new("hypertension", vec![0i32, 1, 0, 0]),
            Series::new("bmi", vec![Some(36.6), None, Some(32.5), Some(27.4)]),
            Series::new("gender", vec!["Male", "Female", "Male", "Female"]),
            Series::new(TARGET_COLUMN, vec![1i32, 1, 0, 0]),
        ])
        .unwrap()
    }

    #[test]
    fn splits_columns_by_kind() {
        let data = TabularData::from_frame(&frame()).unwrap();
        assert_eq!(data.len(), 4);

        let numeric_names: Vec<&str> = data.numeric.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(numeric_names, vec!["age", "bmi"]);

        let cat_names: Vec<&str> = data.categorical.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(cat_names, vec!["hypertension", "gender"]);
    }

    #[test]
    fn binary_numeric_becomes_labelled_categorical() {
        let data = TabularData::from_frame(&frame()).unwrap();
        let hyp = &data.categorical[0];
        assert_eq!(hyp.values[0].as_deref(), Some("normotensive"));
        assert_eq!(hyp.values[1].as_deref(), Some("hypertensive"));
    }

    #[test]
    fn null_label_is_rejected() {
        let df = DataFrame::new(vec![
            Series::new(ID_COLUMN, vec![1i32, 2, 3]),
            Series::new("age", vec![67.0, 61.0, 80.0]),
            Series::new(TARGET_COLUMN, vec![Some(1i32), None, Some(0)]),
        ])
        .unwrap();

        let err = TabularData::from_frame(&df).unwrap_err();
        assert!(matches!(err, StrokeError::NullTarget { count: 1 }));
    }

    #[test]
    fn subset_selects_rows() {
        let data = TabularData::from_frame(&frame()).unwrap();
        let sub = data.subset(&[2, 0]);
        assert_eq!(sub.len(), 2);
        assert_eq!(sub.labels, vec![0, 1]);
        assert_eq!(sub.numeric[0].values[0], Some(80.0));
        assert_eq!(sub.class_count(1), 1);
    }
}
