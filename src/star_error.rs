//! Error type shared by every part of the crate.
//!
//! Fatal problems (unreadable or malformed EOS file, bad grid, bad configuration) surface
//! before any integration starts. Per-star problems (`InvalidCentralPressure`,
//! `IntegrationDiverged`, `SurfaceNotFound`) are recorded by the batch driver for that
//! central pressure only.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StarError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logger initialisation failed: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("EOS file format error at line {line}: {message}")]
    EosFormat { line: usize, message: String },
    #[error("invalid EOS table: {0}")]
    InvalidEos(String),
    #[error("invalid radial grid: {0}")]
    InvalidGrid(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("central pressure must be positive and finite, got {0}")]
    InvalidCentralPressure(f64),
    #[error("integration diverged at r = {radius}: {reason}")]
    IntegrationDiverged { radius: f64, reason: String },
    #[error(
        "stellar surface not found within the grid (P_c = {central_pressure:e}, last pressure = {last_pressure:e})"
    )]
    SurfaceNotFound {
        central_pressure: f64,
        last_pressure: f64,
    },
    #[error("nothing to output: {0}")]
    EmptyResult(String),
}
