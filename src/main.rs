use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use env_logger::{Builder, Env};
use log::{info, LevelFilter};
use sysinfo::{ProcessExt, System, SystemExt};

use stroke_risk::dataset::TabularData;
use stroke_risk::evaluate::{self, print_metrics_table, print_report_table};
use stroke_risk::metrics::ModelMetrics;
use stroke_risk::tune;
use stroke_risk::{explore, io, split, StrokeError, SEED, TRAIN_FRACTION};

#[derive(Parser, Debug)]
#[command(author, version, about = "EDA and classifier comparison for stroke risk", long_about = None)]
struct Args {
    /// Input CSV with the stroke dataset schema
    #[arg(short, long, default_value = "data/healthcare-dataset-stroke-data.csv")]
    input: PathBuf,
    /// Directory for exported tables and optional parquet staging
    #[arg(short, long, default_value = "output")]
    output: PathBuf,
    /// Verbose level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// Folds for cross-validation and grid search
    #[arg(long, default_value_t = 10)]
    folds: usize,
    /// Skip the grid-search stage
    #[arg(long)]
    skip_tuning: bool,
    /// Also persist the cleaned frame as parquet
    #[arg(long)]
    export_parquet: bool,
}

fn process_memory() -> u64 {
    let mut sys = System::new();
    sys.refresh_processes();
    sysinfo::get_current_pid()
        .ok()
        .and_then(|pid| sys.process(pid))
        .map(|process| process.memory())
        .unwrap_or(0)
}

#[tokio::main]
async fn main() -> Result<(), StrokeError> {
    let args = Args::parse();

    let log_level = match args.verbose {
        1 => LevelFilter::Debug,
        2.. => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };
    let env = Env::new().filter("STROKE_LOG");
    Builder::new()
        .filter(Some("stroke_risk"), log_level)
        .parse_env(env)
        .init();

    let start_time = Instant::now();
    let start_memory = process_memory();

    run(args).await?;

    info!("elapsed: {:?}", start_time.elapsed());
    info!(
        "memory used: {} bytes",
        process_memory().saturating_sub(start_memory)
    );
    Ok(())
}

async fn run(args: Args) -> Result<(), StrokeError> {
    let df = io::read_csv(&args.input).await?;
    let df = io::clean(df)?;

    explore::explore(&df)?;

    if args.export_parquet {
        std::fs::create_dir_all(&args.output)?;
        let mut staged = df.clone();
        io::write_parquet(args.output.join("stroke_clean.parquet"), &mut staged).await?;
    }

    let data = TabularData::from_frame(&df)?;
    let (train_idx, valid_idx) = split::train_valid_split(data.len(), TRAIN_FRACTION, SEED);
    let train = data.subset(&train_idx);
    let valid = data.subset(&valid_idx);
    info!(
        "holdout split: {} train / {} validation rows ({} positive in training)",
        train.len(),
        valid.len(),
        train.class_count(1)
    );

    let imbalance = evaluate::imbalance_study(&train, &valid, SEED)?;
    print_metrics_table("IMBALANCE STUDY (holdout metrics)", &imbalance);

    let reports = evaluate::compare_models(&data, &train, &valid, args.folds, SEED)?;
    print_report_table(&reports);
    evaluate::export_reports(&reports, &args.output)?;

    if args.skip_tuning {
        info!("tuning stage skipped");
        return Ok(());
    }

    let tuned = tune::tune_top_candidates(&reports, &train, &valid, args.folds, SEED)?;
    let tuned_metrics: Vec<ModelMetrics> = tuned
        .iter()
        .map(|result| result.holdout.clone())
        .collect();
    print_metrics_table("TUNED MODELS (holdout metrics)", &tuned_metrics);
    for result in &tuned {
        info!(
            "{} tuned: {} (cv f1={:.4})",
            result.family.name(),
            tune::describe(result.family, &result.best_params),
            result.best_cv_f1
        );
    }

    Ok(())
}
