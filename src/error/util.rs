//! Utility functions for error handling
//!
//! This module provides file helpers that attach the purpose of the access to
//! any IO failure, so a log line says what the file was needed for.

use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Result, RiskError};

fn with_context(e: &io::Error, path: &Path, purpose: &str) -> RiskError {
    let context = match e.kind() {
        io::ErrorKind::PermissionDenied => "Permission denied - check file permissions".to_string(),
        io::ErrorKind::NotFound => "File not found".to_string(),
        io::ErrorKind::InvalidData => "File contains invalid UTF-8 data - cannot read as text".to_string(),
        _ => format!("Failed to access file for: {purpose}"),
    };
    RiskError::Io(io::Error::new(
        e.kind(),
        format!("{context} ({}; needed for: {purpose}): {e}", path.display()),
    ))
}

/// Safely open a file with rich error information
///
/// # Arguments
/// * `path` - The path to the file to open
/// * `purpose` - Why the file is being opened (for error context)
///
/// # Returns
/// * `Result<fs::File>` - The opened file or a detailed error
pub fn safe_open_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if path.exists() && !path.is_file() {
        return Err(RiskError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Path is not a file ({}; expected a file for: {purpose})", path.display()),
        )));
    }

    fs::File::open(path).map_err(|e| with_context(&e, path, purpose))
}

/// Safely read a file to string with rich error information
pub fn safe_read_to_string(path: &Path, purpose: &str) -> Result<String> {
    let mut file = safe_open_file(path, purpose)?;

    let mut content = String::new();
    io::Read::read_to_string(&mut file, &mut content).map_err(|e| with_context(&e, path, purpose))?;
    Ok(content)
}

/// Create (or truncate) a file for writing, creating missing parent directories
pub fn safe_create_file(path: &Path, purpose: &str) -> Result<fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| with_context(&e, parent, purpose))?;
    }
    fs::File::create(path).map_err(|e| with_context(&e, path, purpose))
}
