//! failcast - predict which tests are likely to fail for a set of changes
//!
//! ```text
//! failcast --history history.csv --changes changes.json [--model model.json] [--output out.json]
//! ```
//!
//! Exit status:
//!
//! - `0`: no test predicted to fail
//! - `1`: at least one test predicted to fail (run those first)
//! - `2`: the run failed (bad input, corrupt model, timeout, ...)

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, Instrument, Level};

use failcast_core::{
    load_changes, write_predictions, HistoryStore, ModelLifecycleManager, ModelOutcome,
    PredictionEngine, PredictorConfig, METRICS,
};

const EXIT_FAILURES_PREDICTED: u8 = 1;
const EXIT_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "failcast")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Predict test failures from change metadata and test history", long_about = None)]
struct Cli {
    /// Path to the test history CSV file
    #[arg(long)]
    history: PathBuf,

    /// Path to the JSON file with the changes to score
    #[arg(long)]
    changes: PathBuf,

    /// Path to load the trained model from, or save it to after training
    #[arg(long)]
    model: Option<PathBuf>,

    /// Path to write the predictions JSON to (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Minimum failure probability to report a test
    #[arg(long, env = "FAILCAST_THRESHOLD")]
    threshold: Option<f64>,

    /// Minimum number of history records required to train
    #[arg(long, env = "FAILCAST_MIN_RECORDS")]
    min_records: Option<usize>,

    /// Fraction of history used for fitting (rest is held out)
    #[arg(long, env = "FAILCAST_TRAIN_SPLIT")]
    train_split: Option<f64>,

    /// Number of trees in the forest
    #[arg(long, env = "FAILCAST_TREES")]
    trees: Option<usize>,

    /// Maximum tree depth (unlimited if omitted)
    #[arg(long, env = "FAILCAST_MAX_DEPTH")]
    max_depth: Option<usize>,

    /// Seed for the split and the forest
    #[arg(long, env = "FAILCAST_SEED")]
    seed: Option<u64>,

    /// Abort the run if obtaining the model takes longer than this
    #[arg(long, env = "FAILCAST_TRAIN_TIMEOUT_SECS")]
    train_timeout_secs: Option<u64>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn predictor_config(&self) -> Result<PredictorConfig> {
        let mut config = PredictorConfig::default();
        if let Some(threshold) = self.threshold {
            config.probability_threshold = threshold;
        }
        if let Some(min) = self.min_records {
            config.min_training_records = min;
        }
        if let Some(split) = self.train_split {
            config.train_split = split;
        }
        if let Some(trees) = self.trees {
            config.forest.n_trees = trees;
        }
        if self.max_depth.is_some() {
            config.forest.max_depth = self.max_depth;
        }
        if let Some(seed) = self.seed {
            config.forest.seed = seed;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    failcast_core::init_tracing(cli.json, level);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("error: failed to start runtime: {e}");
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let span = tracing::info_span!("failcast.run", changes = %cli.changes.display());
    let result = runtime.block_on(run(cli).instrument(span));
    // A timed-out training task may still be running; do not wait for it.
    runtime.shutdown_background();

    match result {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(EXIT_FAILURES_PREDICTED),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

/// Run the pipeline and return the number of tests predicted to fail.
async fn run(cli: Cli) -> Result<usize> {
    let config = cli.predictor_config().context("invalid configuration")?;

    let history = HistoryStore::load(&cli.history)
        .with_context(|| format!("failed to load history from {}", cli.history.display()))?;
    let changes = load_changes(&cli.changes)
        .with_context(|| format!("failed to load changes from {}", cli.changes.display()))?;

    let manager = ModelLifecycleManager::new(config.clone());
    let outcome = match cli.train_timeout_secs {
        Some(secs) => {
            let model_path = cli.model.clone();
            let task =
                tokio::task::spawn_blocking(move || manager.obtain(&history, model_path.as_deref()));
            tokio::time::timeout(Duration::from_secs(secs), task)
                .await
                .map_err(|_| anyhow!("model training timed out after {secs} seconds"))?
                .context("model training task panicked")??
        }
        None => manager.obtain(&history, cli.model.as_deref())?,
    };

    match &outcome {
        ModelOutcome::Loaded { path, .. } => info!(path = %path.display(), "using persisted model"),
        ModelOutcome::Trained { report, .. } => info!(
            train_size = report.train_size,
            test_size = report.test_size,
            persisted = report.artifact_digest.is_some(),
            "using freshly trained model"
        ),
        ModelOutcome::Absent { .. } => info!("no model available, nothing will be reported"),
    }

    let engine = PredictionEngine::new(config);
    let classifier = outcome.into_classifier();
    let results = engine.predict(
        &changes,
        classifier
            .as_ref()
            .map(|c| c as &dyn failcast_core::Classifier),
    );

    write_predictions(&results, cli.output.as_deref()).context("failed to write predictions")?;
    METRICS.flush();

    Ok(results.len())
}
