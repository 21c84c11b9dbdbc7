use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use log::debug;
use polars::prelude::*;
use polars_io::parquet::ParquetWriter;

use crate::error::Result;
use crate::records::StrokeRecord;

/// Read the stroke CSV with the fixed schema from `records::raw_schema`.
pub async fn read_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
    let file = File::open(path)?;

    let df = CsvReader::new(file)
        .has_header(true)
        .with_dtypes(Some(Arc::new(StrokeRecord::raw_schema())))
        .finish()?;

    Ok(df)
}

/// Clean the raw frame: cast `bmi` from text to Float64 so "N/A" entries
/// become nulls. Imputation is deliberately left to the preprocessing stage,
/// where the statistics are fitted on the training fold only.
pub fn clean(mut df: DataFrame) -> Result<DataFrame> {
    let bmi = df.column("bmi")?.cast(&DataType::Float64)?;
    df.with_column(bmi)?;

    debug!(
        "cleaned frame: {} rows, {} nulls in bmi",
        df.height(),
        df.column("bmi")?.null_count()
    );

    Ok(df)
}

pub async fn write_csv<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path)?;

    CsvWriter::new(&mut file).finish(df)?;

    Ok(())
}

pub async fn write_parquet<P: AsRef<Path>>(path: P, df: &mut DataFrame) -> Result<()> {
    let mut file = File::create(path)?;

    ParquetWriter::new(&mut file).finish(df)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_csv() -> &'static str {
        "id,gender,age,hypertension,heart_disease,ever_married,work_type,Residence_type,avg_glucose_level,bmi,smoking_status,stroke\n\
         1,Male,67.0,0,1,Yes,Private,Urban,228.69,36.6,formerly smoked,1\n\
         2,Female,61.0,0,0,Yes,Self-employed,Rural,202.21,N/A,never smoked,1\n\
         3,Male,80.0,0,1,Yes,Private,Rural,105.92,32.5,never smoked,0\n"
    }

    #[tokio::test]
    async fn read_and_clean_casts_bmi() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stroke.csv");
        let mut file = File::create(&path).unwrap();
        file.write_all(sample_csv().as_bytes()).unwrap();

        let df = read_csv(&path).await.unwrap();
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("bmi").unwrap().dtype(), &DataType::Utf8);

        let df = clean(df).unwrap();
        let bmi = df.column("bmi").unwrap();
        assert_eq!(bmi.dtype(), &DataType::Float64);
        assert_eq!(bmi.null_count(), 1);
    }
}
