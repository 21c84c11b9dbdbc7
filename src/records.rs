use std::collections::HashMap;

use lazy_static::lazy_static;
use polars::prelude::{DataType, Field, Schema};

pub const ID_COLUMN: &str = "id";
pub const TARGET_COLUMN: &str = "stroke";

/// A numeric column with fewer distinct values than this is treated as an
/// encoded categorical (hypertension, heart_disease and the target itself).
pub const MAX_BINARY_UNIQUES: usize = 3;

lazy_static! {
    /// Human-readable category labels for the 0/1 columns that are really
    /// categorical, keyed by column name. Index 0 holds the label for value
    /// 0, index 1 the label for value 1.
    static ref BINARY_LABELS: HashMap<&'static str, [&'static str; 2]> = HashMap::from([
        ("hypertension", ["normotensive", "hypertensive"]),
        ("heart_disease", ["no_heart_disease", "heart_disease"]),
    ]);
}

pub struct StrokeRecord {}

impl StrokeRecord {
    /// Schema of the raw CSV. `bmi` arrives as text because the file encodes
    /// missing values as the literal string "N/A"; it is cast to Float64
    /// during cleaning, which turns those entries into nulls.
    pub fn raw_schema() -> Schema {
        Schema::from_iter(vec![
            Field::new("id", DataType::Int32),
            Field::new("gender", DataType::Utf8),
            Field::new("age", DataType::Float64),
            Field::new("hypertension", DataType::Int32),
            Field::new("heart_disease", DataType::Int32),
            Field::new("ever_married", DataType::Utf8),
            Field::new("work_type", DataType::Utf8),
            Field::new("Residence_type", DataType::Utf8),
            Field::new("avg_glucose_level", DataType::Float64),
            Field::new("bmi", DataType::Utf8),
            Field::new("smoking_status", DataType::Utf8),
            Field::new("stroke", DataType::Int32),
        ])
    }
}

/// Map an encoded binary value to its category label so the column can go
/// through one-hot encoding alongside the genuinely textual columns. Columns
/// without a registered mapping fall back to the digit itself.
pub fn binary_label(column: &str, value: i64) -> String {
    match BINARY_LABELS.get(column) {
        Some(labels) if value == 0 => labels[0].to_string(),
        Some(labels) => labels[1].to_string(),
        None => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_all_columns() {
        let schema = StrokeRecord::raw_schema();
        assert_eq!(schema.len(), 12);
        assert!(schema.get("stroke").is_some());
        assert!(schema.get("bmi").is_some());
    }

    #[test]
    fn binary_labels_map_known_columns() {
        assert_eq!(binary_label("hypertension", 0), "normotensive");
        assert_eq!(binary_label("hypertension", 1), "hypertensive");
        assert_eq!(binary_label("heart_disease", 1), "heart_disease");
        assert_eq!(binary_label("some_flag", 1), "1");
    }
}
