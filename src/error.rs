// Thu Jan 22 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

/// Defects in the protocol profile table. These are setup bugs, never data problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Profile table has no protocol entries")]
    EmptyProfileTable,
    #[error("Profile table has no fallback entry for unrecognized protocols")]
    MissingFallback,
    #[error("Inverted {field} bounds for {protocol}: {min} > {max}")]
    InvertedBounds {
        protocol: String,
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("Negative {field} bound for {protocol}: {value}")]
    NegativeBound {
        protocol: String,
        field: &'static str,
        value: i64,
    },
    #[error("Invalid framing constants: {0}")]
    InvalidFraming(String),
    #[error("Empty protocol label in profile table")]
    EmptyProtocolLabel,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ConfigurationError),
}

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing column in input header: {0}")]
    MissingColumn(String),
    #[error("Unsupported batch format: {0}")]
    UnsupportedFormat(String),
}
