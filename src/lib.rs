//! Diabetes risk estimation: a trained classifier combined with clinical red flags.
//!
//! Training derives the sixteen model features from a raw CSV dataset, learns
//! the one-hot feature schema, fits a scaler and a logistic regression and
//! persists all three. Serving loads them once into a [`ModelContext`],
//! aligns each request with the schema, and tiers the resulting probability
//! together with glucose, HbA1c, BMI, blood pressure and family history.

pub mod artifacts;
pub mod config;
pub mod encoding;
pub mod error;
pub mod inference;
pub mod model;
pub mod risk;
pub mod schema;
pub mod training;
pub mod utils;

// Re-export the most common types for easier use
// Core types
pub use config::{ArtifactPaths, PipelineConfig, TrainingConfig};
pub use error::{Result, RiskError};
pub use schema::{ClinicalField, EncodedVector, FeatureSchema, RawRecord, ScaledVector};

// Training and serving
pub use artifacts::{ModelArtifact, TrainedArtifacts};
pub use encoding::{StandardScaler, encode_aligned};
pub use inference::{ModelContext, RiskPredictor, ServingEncoder};
pub use model::{LogisticRegression, ProbabilisticClassifier};
pub use training::{Trainer, TrainingOutcome, train};

// Risk tiering
pub use risk::{ClinicalIndicators, InferenceResponse, PredictionResult, RiskResponse, RiskTier, classify};
