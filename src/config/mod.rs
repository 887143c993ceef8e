//! Configuration for training and serving.

use std::path::{Path, PathBuf};

/// File name of the persisted classifier
pub const MODEL_FILE: &str = "diabetes_model.json";
/// File name of the persisted scaler
pub const SCALER_FILE: &str = "scaler.json";
/// File name of the persisted feature schema
pub const COLUMNS_FILE: &str = "columns.json";
/// Default location of the training dataset
pub const DEFAULT_DATASET_PATH: &str = "data/diabetes_dataset.csv";
/// Default location of the augmented predictions written after training
pub const DEFAULT_PREDICTIONS_PATH: &str = "diabetes_predictions_with_risk.csv";

/// Locations of the three artifacts shared by training and serving
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// Serialized classifier
    pub model: PathBuf,
    /// Serialized scaler
    pub scaler: PathBuf,
    /// Serialized feature schema
    pub columns: PathBuf,
}

impl ArtifactPaths {
    /// Artifact paths inside a directory, using the fixed file names
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE),
            scaler: dir.join(SCALER_FILE),
            columns: dir.join(COLUMNS_FILE),
        }
    }
}

/// Configuration shared by the training and serving entry points
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the model, scaler and schema artifacts
    pub artifact_dir: PathBuf,
    /// Training dataset (CSV)
    pub dataset_path: PathBuf,
    /// Output CSV with per-row predictions written after training
    pub predictions_path: PathBuf,
    /// Worker threads used for batch prediction
    pub worker_threads: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("."),
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            predictions_path: PathBuf::from(DEFAULT_PREDICTIONS_PATH),
            worker_threads: num_cpus::get(),
        }
    }
}

impl PipelineConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration from defaults overridden by `DIABETES_RISK_*` environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(dir) = env_path("DIABETES_RISK_ARTIFACT_DIR") {
            config.artifact_dir = dir;
        }
        if let Some(path) = env_path("DIABETES_RISK_DATASET") {
            config.dataset_path = path;
        }
        if let Some(path) = env_path("DIABETES_RISK_PREDICTIONS") {
            config.predictions_path = path;
        }
        if let Some(threads) = get_worker_threads() {
            config.worker_threads = threads;
        }
        config
    }

    /// Set the artifact directory
    #[must_use]
    pub fn with_artifact_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifact_dir = dir.into();
        self
    }

    /// Set the training dataset path
    #[must_use]
    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }

    /// Set the predictions output path
    #[must_use]
    pub fn with_predictions_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.predictions_path = path.into();
        self
    }

    /// Set the number of worker threads for batch prediction (at least one)
    #[must_use]
    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads.max(1);
        self
    }

    /// Paths of the three artifacts in the configured directory
    #[must_use]
    pub fn artifact_paths(&self) -> ArtifactPaths {
        ArtifactPaths::in_dir(&self.artifact_dir)
    }
}

/// Hyperparameters for fitting the classifier
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Number of full-batch gradient steps
    pub epochs: usize,
    /// L2 penalty applied to the coefficients (not the intercept)
    pub l2: f64,
    /// Fraction of rows held out for evaluation; 0 evaluates on the training rows only
    pub holdout_fraction: f64,
    /// Seed for the hold-out shuffle
    pub seed: u64,
    /// Show a progress bar while fitting
    pub show_progress: bool,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            epochs: 500,
            l2: 1e-3,
            holdout_fraction: 0.0,
            seed: 42,
            show_progress: true,
        }
    }
}

impl TrainingConfig {
    /// Set the number of epochs
    #[must_use]
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    /// Set the learning rate
    #[must_use]
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    /// Set the hold-out fraction, clamped to `[0, 0.9]`
    #[must_use]
    pub fn with_holdout_fraction(mut self, fraction: f64) -> Self {
        self.holdout_fraction = fraction.clamp(0.0, 0.9);
        self
    }

    /// Set the shuffle seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable the progress bar
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Helper function to get the worker thread count from environment
#[must_use]
pub fn get_worker_threads() -> Option<usize> {
    std::env::var("DIABETES_RISK_THREADS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
}
