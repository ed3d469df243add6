// Fri Jan 23 2026 - Alex

pub mod features;

pub use features::{shannon_entropy, FillerDetector, PayloadFeatures};
