// Fri Jan 23 2026 - Alex

pub mod reader;
pub mod writer;

pub use reader::{read_records, BatchReader};
pub use writer::{annotate, write_annotated, AnnotatedRecord, BatchWriter};

use crate::error::BatchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BatchFormat {
    Csv,
    Json,
    /// One JSON object per line.
    Jsonl,
}

impl BatchFormat {
    pub fn from_path(path: &Path) -> Result<Self, BatchError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "csv" => Ok(BatchFormat::Csv),
            "json" => Ok(BatchFormat::Json),
            "jsonl" | "ndjson" => Ok(BatchFormat::Jsonl),
            _ => Err(BatchError::UnsupportedFormat(ext)),
        }
    }

    /// Explicit choice wins over the file extension.
    pub fn resolve(explicit: Option<BatchFormat>, path: &Path) -> Result<Self, BatchError> {
        match explicit {
            Some(format) => Ok(format),
            None => Self::from_path(path),
        }
    }
}

/// Header names for tabular input. Defaults match the cybersecurity
/// attacks dataset the tool was first written against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub protocol: String,
    pub declared_length: String,
    pub payload: String,
    /// Optional passthrough column; absent from the header is fine.
    pub packet_type: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            protocol: "Protocol".to_string(),
            declared_length: "Packet Length".to_string(),
            payload: "Payload Data".to_string(),
            packet_type: "Packet Type".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(BatchFormat::from_path(Path::new("a.CSV")).unwrap(), BatchFormat::Csv);
        assert_eq!(BatchFormat::from_path(Path::new("a.json")).unwrap(), BatchFormat::Json);
        assert_eq!(BatchFormat::from_path(Path::new("a.ndjson")).unwrap(), BatchFormat::Jsonl);
        assert!(BatchFormat::from_path(Path::new("a.parquet")).is_err());
        assert_eq!(
            BatchFormat::resolve(Some(BatchFormat::Json), Path::new("a.txt")).unwrap(),
            BatchFormat::Json
        );
    }
}
