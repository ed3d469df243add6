// Thu Jan 22 2026 - Alex

pub mod profile;
pub mod record;
pub mod report;
pub mod validator;

pub use profile::{FramingConstants, ProfileTable, ProfileTableBuilder, ProtocolFrameProfile};
pub use record::{DeclaredLength, PacketRecord};
pub use report::{summarize, ProtocolBreakdown, ValidationSummary};
pub use validator::{validate_batch, BatchOutcome, FrameIssue, IssueSeverity, PacketValidator, ValidationResult};
