//! End-to-end run over a synthetic CSV in the stroke schema: load, clean,
//! summarize, split and score one model through the full pipeline.

use std::fs::File;
use std::io::Write;

use stroke_risk::dataset::TabularData;
use stroke_risk::evaluate::run_pipeline;
use stroke_risk::model::{ModelFamily, ModelParams};
use stroke_risk::resample::ImbalanceStrategy;
use stroke_risk::{explore, io, split, SEED, TRAIN_FRACTION};

const HEADER: &str = "id,gender,age,hypertension,heart_disease,ever_married,work_type,\
                      Residence_type,avg_glucose_level,bmi,smoking_status,stroke";

/// Synthetic rows in the real schema. Older rows with high glucose carry the
/// stroke label so the signal is learnable; every 11th bmi is "N/A".
fn write_dataset(path: &std::path::Path, rows: usize) {
    let mut file = File::create(path).unwrap();
    writeln!(file, "{HEADER}").unwrap();
    for i in 0..rows {
        let positive = i % 5 == 0;
        let age = if positive { 70.0 + (i % 10) as f64 } else { 30.0 + (i % 20) as f64 };
        let glucose = if positive { 190.0 + (i % 30) as f64 } else { 90.0 + (i % 30) as f64 };
        let bmi = if i % 11 == 3 {
            "N/A".to_string()
        } else {
            format!("{:.1}", 22.0 + (i % 15) as f64)
        };
        let gender = if i % 2 == 0 { "Male" } else { "Female" };
        let smoking = if positive { "smokes" } else { "never smoked" };
        writeln!(
            file,
            "{},{},{:.1},{},{},Yes,Private,Urban,{:.2},{},{},{}",
            i + 1,
            gender,
            age,
            u8::from(i % 7 == 0),
            u8::from(i % 9 == 0),
            glucose,
            bmi,
            smoking,
            u8::from(positive)
        )
        .unwrap();
    }
}

#[tokio::test]
async fn full_pipeline_on_synthetic_csv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stroke.csv");
    write_dataset(&path, 200);

    let df = io::read_csv(&path).await.unwrap();
    let df = io::clean(df).unwrap();
    assert_eq!(df.height(), 200);

    // the console summary must cover every column without erroring
    let summary = explore::feature_summary(&df).unwrap();
    assert_eq!(summary.height(), df.width());

    let data = TabularData::from_frame(&df).unwrap();
    assert_eq!(data.len(), 200);
    // id and stroke are not features
    assert_eq!(data.numeric.len() + data.categorical.len(), 10);

    let (train_idx, valid_idx) = split::train_valid_split(data.len(), TRAIN_FRACTION, SEED);
    let train = data.subset(&train_idx);
    let valid = data.subset(&valid_idx);
    assert_eq!(train.len(), 160);
    assert_eq!(valid.len(), 40);

    let metrics = run_pipeline(
        &train,
        &valid,
        ModelFamily::LogisticRegression,
        &ModelParams::default(),
        ImbalanceStrategy::Smote,
        "Logistic Regression (SMOTE)",
        SEED,
    )
    .unwrap();

    assert_eq!(metrics.confusion.total(), valid.len());
    for value in [
        metrics.accuracy,
        metrics.sensitivity,
        metrics.specificity,
        metrics.ppv,
        metrics.npv,
        metrics.roc_auc,
        metrics.pr_auc,
        metrics.f1,
    ] {
        assert!((0.0..=1.0).contains(&value));
    }
    // age and glucose separate the classes cleanly
    assert!(metrics.roc_auc > 0.9, "auc {}", metrics.roc_auc);
    assert!(metrics.sensitivity > 0.7, "sensitivity {}", metrics.sensitivity);
}
