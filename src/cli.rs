use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use diabetes_risk::utils::logging::console::{print_evaluation_summary, print_schema_info};
use diabetes_risk::{
    InferenceResponse, ModelContext, PipelineConfig, RawRecord, RiskPredictor, Trainer, TrainingConfig,
};
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(
    name = "diabetes-risk",
    about = "Train the diabetes risk model and score patient records",
    version
)]
pub struct Cli {
    /// Directory holding diabetes_model.json, scaler.json and columns.json
    #[arg(long, global = true)]
    pub artifact_dir: Option<PathBuf>,

    /// Worker threads for batch scoring (defaults to the number of CPUs)
    #[arg(long, global = true)]
    pub threads: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fit the encoder, scaler and classifier on a CSV dataset.
    Train(TrainArgs),

    /// Score one JSON object or an array of objects.
    Predict(PredictArgs),

    /// Print the persisted feature schema.
    Schema,
}

#[derive(Debug, Args)]
pub struct TrainArgs {
    /// Training dataset (CSV with header)
    #[arg(long)]
    pub dataset: Option<PathBuf>,

    /// Output CSV with per-row predictions
    #[arg(long)]
    pub predictions: Option<PathBuf>,

    /// Gradient descent epochs
    #[arg(long)]
    pub epochs: Option<usize>,

    /// Gradient descent step size
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// L2 penalty
    #[arg(long)]
    pub l2: Option<f64>,

    /// Fraction of rows held out for evaluation
    #[arg(long)]
    pub holdout: Option<f64>,

    /// Seed for the hold-out shuffle
    #[arg(long)]
    pub seed: Option<u64>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// JSON file to read; stdin when omitted or `-`
    #[arg(long, short)]
    pub input: Option<PathBuf>,
}

pub fn run_from_env() -> anyhow::Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PipelineConfig::from_env();
    if let Some(dir) = cli.artifact_dir {
        config = config.with_artifact_dir(dir);
    }
    if let Some(threads) = cli.threads {
        config = config.with_worker_threads(threads);
    }

    match cli.command {
        Commands::Train(args) => run_train(config, args),
        Commands::Predict(args) => run_predict(&config, &args),
        Commands::Schema => {
            let context = load_context(&config)?;
            print_schema_info(context.schema());
            Ok(())
        }
    }
}

fn run_train(mut config: PipelineConfig, args: TrainArgs) -> anyhow::Result<()> {
    if let Some(dataset) = args.dataset {
        config = config.with_dataset_path(dataset);
    }
    if let Some(predictions) = args.predictions {
        config = config.with_predictions_path(predictions);
    }

    let mut training = TrainingConfig::default().with_progress(!args.no_progress);
    if let Some(epochs) = args.epochs {
        training = training.with_epochs(epochs);
    }
    if let Some(rate) = args.learning_rate {
        training = training.with_learning_rate(rate);
    }
    if let Some(l2) = args.l2 {
        training.l2 = l2;
    }
    if let Some(fraction) = args.holdout {
        training = training.with_holdout_fraction(fraction);
    }
    if let Some(seed) = args.seed {
        training = training.with_seed(seed);
    }

    let dataset = config.dataset_path.clone();
    let outcome = Trainer::new(config, training)
        .run()
        .with_context(|| format!("Training on {} failed", dataset.display()))?;

    print_evaluation_summary(&outcome.evaluation);
    println!("Predictions saved to '{}'", outcome.predictions_path.display());
    Ok(())
}

fn run_predict(config: &PipelineConfig, args: &PredictArgs) -> anyhow::Result<()> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_threads)
        .build_global()
        .context("Failed to configure the worker pool")?;

    let predictor = RiskPredictor::new(Arc::new(load_context(config)?));
    let request = read_request(args.input.as_ref())?;

    let output = match request {
        Value::Array(items) => {
            let records = items.iter().map(RawRecord::from_json_value);
            let mut responses: Vec<Option<InferenceResponse>> = Vec::with_capacity(items.len());
            let mut valid = Vec::with_capacity(items.len());
            for record in records {
                match record {
                    Ok(record) => {
                        responses.push(None);
                        valid.push(record);
                    }
                    Err(e) => responses.push(Some(InferenceResponse::from_error(&e))),
                }
            }

            let mut scored = predictor.predict_batch(&valid).into_iter().map(InferenceResponse::from);
            let responses = responses
                .into_iter()
                .map(|slot| slot.or_else(|| scored.next()))
                .collect::<Option<Vec<_>>>()
                .context("Batch scoring returned fewer results than requests")?;
            serde_json::to_string_pretty(&responses)?
        }
        single => serde_json::to_string_pretty(&predictor.respond_json(&single))?,
    };

    println!("{output}");
    Ok(())
}

fn load_context(config: &PipelineConfig) -> anyhow::Result<ModelContext> {
    let paths = config.artifact_paths();
    ModelContext::load(&paths).with_context(|| {
        format!(
            "Cannot start without model artifacts in {}",
            config.artifact_dir.display()
        )
    })
}

fn read_request(input: Option<&PathBuf>) -> anyhow::Result<Value> {
    let text = match input {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read request from stdin")?;
            buffer
        }
    };
    if text.trim().is_empty() {
        bail!("Empty request");
    }
    serde_json::from_str(&text).context("Request is not valid JSON")
}
