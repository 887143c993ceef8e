//! Utility modules for logging, progress reporting and tests.

pub mod logging;
pub mod test;
