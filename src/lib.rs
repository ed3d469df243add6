// Tue Jan 15 2026 - Alex

pub mod batch;
pub mod config;
pub mod error;
pub mod payload;
pub mod ui;
pub mod utils;
pub mod validation;

pub use batch::{BatchFormat, BatchReader, BatchWriter, ColumnMapping};
pub use config::Config;
pub use error::{BatchError, ConfigError, ConfigurationError};
pub use payload::{FillerDetector, PayloadFeatures};
pub use validation::{
    validate_batch, PacketRecord, PacketValidator, ProfileTable, ProtocolFrameProfile, ValidationResult,
    ValidationSummary,
};
