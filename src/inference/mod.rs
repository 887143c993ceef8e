//! Serving: load artifacts once, then encode and score requests.

pub mod context;
pub mod encoder;
pub mod predictor;

pub use context::ModelContext;
pub use encoder::ServingEncoder;
pub use predictor::RiskPredictor;
