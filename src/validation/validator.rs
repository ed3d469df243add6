// Thu Jan 22 2026 - Alex

use crate::error::ConfigurationError;
use crate::validation::profile::{ProfileTable, ProtocolFrameProfile};
use crate::validation::record::PacketRecord;
use crate::validation::report::{summarize, ValidationSummary};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

pub const DEFAULT_PARALLEL_THRESHOLD: usize = 4096;

/// Cross-checks declared packet lengths against per-protocol framing.
///
/// Holds nothing but the read-only profile table, so one instance can be
/// shared freely across threads.
#[derive(Debug, Clone)]
pub struct PacketValidator {
    table: Arc<ProfileTable>,
    fallback: ProtocolFrameProfile,
    use_parallel: bool,
    parallel_threshold: usize,
}

impl PacketValidator {
    /// Fails before any record is seen if the table is unusable.
    pub fn new(table: ProfileTable) -> Result<Self, ConfigurationError> {
        Self::from_shared(Arc::new(table))
    }

    pub fn from_shared(table: Arc<ProfileTable>) -> Result<Self, ConfigurationError> {
        table.validate()?;
        let fallback = table.fallback.ok_or(ConfigurationError::MissingFallback)?;

        log::debug!(
            "Validator ready: {} protocols, fixed overhead {} bytes",
            table.len(),
            table.framing.fixed_overhead()
        );

        Ok(Self {
            table,
            fallback,
            use_parallel: true,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    pub fn use_parallel(mut self, parallel: bool) -> Self {
        self.use_parallel = parallel;
        self
    }

    /// Batches smaller than this stay on the calling thread.
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }

    pub fn validate_record(&self, record: &PacketRecord) -> ValidationResult {
        let (profile, recognized) = match self.table.lookup(&record.protocol) {
            Some(profile) => (*profile, true),
            None => (self.fallback, false),
        };

        let payload_length = record.payload_length();
        let overhead = self.table.framing.fixed_overhead();
        let header_diff = record.declared_length.parse().and_then(|declared| {
            payload_length
                .checked_add(overhead)
                .and_then(|used| declared.checked_sub(used))
        });

        let is_valid = header_diff.is_some_and(|diff| profile.accepts_header(diff));

        let mut issues = Vec::new();
        if !recognized {
            issues.push(FrameIssue::UnrecognizedProtocol);
        }
        match header_diff {
            None => issues.push(FrameIssue::UnparseableLength),
            Some(diff) if diff < profile.header_min => issues.push(FrameIssue::HeaderTooSmall),
            Some(diff) if diff > profile.header_max => issues.push(FrameIssue::HeaderTooLarge),
            Some(_) => {}
        }
        if recognized && payload_length > profile.payload_max {
            issues.push(FrameIssue::PayloadExceedsWindow);
        }

        log::trace!(
            "{} declared={} payload={} header_diff={:?} valid={}",
            record.protocol,
            record.declared_length,
            payload_length,
            header_diff,
            is_valid
        );

        ValidationResult {
            protocol: record.protocol.clone(),
            recognized,
            payload_length,
            header_diff,
            payload_min_diff: profile.payload_min - payload_length,
            payload_max_diff: profile.payload_max - payload_length,
            is_valid,
            issues,
        }
    }

    /// Lazily validate any record source, one result per record, in order.
    pub fn validate_iter<'a, I>(&'a self, records: I) -> impl Iterator<Item = ValidationResult> + 'a
    where
        I: IntoIterator,
        I::IntoIter: 'a,
        I::Item: Borrow<PacketRecord>,
    {
        records
            .into_iter()
            .map(move |record| self.validate_record(record.borrow()))
    }

    pub fn validate_sequential(&self, records: &[PacketRecord]) -> Vec<ValidationResult> {
        self.validate_iter(records).collect()
    }

    /// Partitioned across the rayon pool; collection keeps input order.
    pub fn validate_parallel(&self, records: &[PacketRecord]) -> Vec<ValidationResult> {
        log::debug!(
            "Validating {} records across {} threads",
            records.len(),
            rayon::current_num_threads()
        );
        records
            .par_iter()
            .map(|record| self.validate_record(record))
            .collect()
    }

    pub fn validate_batch(&self, records: &[PacketRecord]) -> BatchOutcome {
        log::debug!("Validating batch of {} records", records.len());

        let results = if self.use_parallel && records.len() >= self.parallel_threshold {
            self.validate_parallel(records)
        } else {
            self.validate_sequential(records)
        };

        let summary = summarize(&results);
        log::debug!(
            "Batch done: {} valid, {} invalid, {} unrecognized, {} unparseable",
            summary.valid_count,
            summary.invalid_count,
            summary.unrecognized_protocol_count,
            summary.unparseable_count
        );

        BatchOutcome { results, summary }
    }
}

/// Validate a batch against `table`, failing only on a defective table.
pub fn validate_batch(table: &ProfileTable, records: &[PacketRecord]) -> Result<BatchOutcome, ConfigurationError> {
    let validator = PacketValidator::new(table.clone())?;
    Ok(validator.validate_batch(records))
}

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub results: Vec<ValidationResult>,
    pub summary: ValidationSummary,
}

impl BatchOutcome {
    pub fn invalid(&self) -> impl Iterator<Item = (usize, &ValidationResult)> {
        self.results.iter().enumerate().filter(|(_, r)| !r.is_valid)
    }
}

/// Derived per-record fields. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub protocol: String,
    pub recognized: bool,
    pub payload_length: i64,
    /// `None` when the declared length could not be read as an integer.
    pub header_diff: Option<i64>,
    pub payload_min_diff: i64,
    pub payload_max_diff: i64,
    pub is_valid: bool,
    pub issues: Vec<FrameIssue>,
}

impl ValidationResult {
    pub fn is_unparseable(&self) -> bool {
        self.header_diff.is_none()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn worst_severity(&self) -> Option<IssueSeverity> {
        self.issues.iter().map(|i| i.severity()).max()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameIssue {
    UnrecognizedProtocol,
    UnparseableLength,
    HeaderTooSmall,
    HeaderTooLarge,
    PayloadExceedsWindow,
}

impl FrameIssue {
    pub fn severity(&self) -> IssueSeverity {
        match self {
            FrameIssue::UnrecognizedProtocol => IssueSeverity::Info,
            FrameIssue::UnparseableLength => IssueSeverity::Error,
            FrameIssue::HeaderTooSmall => IssueSeverity::Warning,
            FrameIssue::HeaderTooLarge => IssueSeverity::Warning,
            FrameIssue::PayloadExceedsWindow => IssueSeverity::Warning,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FrameIssue::UnrecognizedProtocol => "unrecognized_protocol",
            FrameIssue::UnparseableLength => "unparseable_length",
            FrameIssue::HeaderTooSmall => "header_too_small",
            FrameIssue::HeaderTooLarge => "header_too_large",
            FrameIssue::PayloadExceedsWindow => "payload_exceeds_window",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FrameIssue::UnrecognizedProtocol => "Protocol not in profile table, fallback bounds applied",
            FrameIssue::UnparseableLength => "Declared length is not a non-negative integer",
            FrameIssue::HeaderTooSmall => "Implied header is smaller than the protocol allows",
            FrameIssue::HeaderTooLarge => "Implied header is larger than the protocol allows",
            FrameIssue::PayloadExceedsWindow => "Payload is longer than the protocol's MTU window",
        }
    }
}

impl fmt::Display for FrameIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum IssueSeverity {
    Info,
    Warning,
    Error,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Error => "ERROR",
            IssueSeverity::Warning => "WARNING",
            IssueSeverity::Info => "INFO",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> PacketValidator {
        PacketValidator::new(ProfileTable::standard()).unwrap()
    }

    fn payload(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn test_valid_udp() {
        let record = PacketRecord::new("UDP", 1500, Some(&payload(1454)));
        let result = validator().validate_record(&record);

        assert_eq!(result.payload_length, 1454);
        assert_eq!(result.header_diff, Some(8));
        assert_eq!(result.payload_min_diff, 0);
        assert_eq!(result.payload_max_diff, 0);
        assert!(result.recognized);
        assert!(result.is_valid);
        assert!(!result.has_issues());
    }

    #[test]
    fn test_invalid_tcp_header_too_large() {
        let record = PacketRecord::new("TCP", 1500, Some(&payload(1400)));
        let result = validator().validate_record(&record);

        assert_eq!(result.header_diff, Some(62));
        assert_eq!(result.payload_min_diff, 2);
        assert_eq!(result.payload_max_diff, 42);
        assert!(!result.is_valid);
        assert_eq!(result.issues, vec![FrameIssue::HeaderTooLarge]);
    }

    #[test]
    fn test_tcp_lower_boundary_inclusive() {
        let record = PacketRecord::new("TCP", 1500, Some(&payload(1442)));
        let result = validator().validate_record(&record);

        assert_eq!(result.header_diff, Some(20));
        assert!(result.is_valid);
    }

    #[test]
    fn test_unknown_protocol_uses_fallback() {
        let v = validator();

        let off = v.validate_record(&PacketRecord::new("SCTP", 1500, Some(&payload(1000))));
        assert!(!off.recognized);
        assert_eq!(off.header_diff, Some(462));
        assert_eq!(off.payload_min_diff, -1000);
        assert!(!off.is_valid);
        assert!(off.issues.contains(&FrameIssue::UnrecognizedProtocol));
        assert!(!off.issues.contains(&FrameIssue::PayloadExceedsWindow));

        let exact = v.validate_record(&PacketRecord::new("SCTP", 138, Some(&payload(100))));
        assert_eq!(exact.header_diff, Some(0));
        assert!(exact.is_valid);
    }

    #[test]
    fn test_null_and_empty_payload() {
        let v = validator();
        for record in [
            PacketRecord::new("UDP", 46, None),
            PacketRecord::new("UDP", 46, Some("")),
        ] {
            let result = v.validate_record(&record);
            assert_eq!(result.payload_length, 0);
            assert_eq!(result.header_diff, Some(8));
            assert!(result.is_valid);
        }
    }

    #[test]
    fn test_unparseable_length() {
        let result = validator().validate_record(&PacketRecord::new("TCP", "n/a", Some("abc")));
        assert_eq!(result.header_diff, None);
        assert!(result.is_unparseable());
        assert!(!result.is_valid);
        assert_eq!(result.payload_length, 3);
        assert_eq!(result.worst_severity(), Some(IssueSeverity::Error));
    }

    #[test]
    fn test_header_too_small_and_oversized_payload() {
        let result = validator().validate_record(&PacketRecord::new("UDP", 1500, Some(&payload(1460))));
        assert_eq!(result.header_diff, Some(2));
        assert_eq!(result.payload_max_diff, -6);
        assert_eq!(
            result.issues,
            vec![FrameIssue::HeaderTooSmall, FrameIssue::PayloadExceedsWindow]
        );
    }

    #[test]
    fn test_deterministic() {
        let v = validator();
        let record = PacketRecord::new("TCP", "1337", Some("payload text"));
        assert_eq!(v.validate_record(&record), v.validate_record(&record));
    }

    #[test]
    fn test_batch_preserves_order_and_length() {
        let records = vec![
            PacketRecord::new("UDP", 1500, Some(&payload(1454))),
            PacketRecord::new("TCP", 1500, Some(&payload(1400))),
            PacketRecord::new("SCTP", 10, None),
            PacketRecord::new("ICMP", "garbage", None),
        ];
        let outcome = validator().validate_batch(&records);

        assert_eq!(outcome.results.len(), records.len());
        for (record, result) in records.iter().zip(&outcome.results) {
            assert_eq!(record.protocol, result.protocol);
            assert_eq!(record.payload_length(), result.payload_length);
        }
        assert_eq!(outcome.invalid().map(|(i, _)| i).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_batch() {
        let outcome = validator().validate_batch(&[]);
        assert!(outcome.results.is_empty());
        assert_eq!(outcome.summary.total, 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let protocols = ["TCP", "UDP", "ICMP", "SCTP", "GRE"];
        let records: Vec<PacketRecord> = (0..10_000)
            .map(|i| {
                let protocol = protocols[i % protocols.len()];
                PacketRecord::new(protocol, (i % 1600) as i64, Some(&payload(i % 1500)))
            })
            .collect();

        let v = validator().with_parallel_threshold(1);
        let sequential = v.validate_sequential(&records);
        let parallel = v.validate_parallel(&records);
        assert_eq!(sequential, parallel);

        let batch = v.validate_batch(&records);
        assert_eq!(batch.results, sequential);
    }

    #[test]
    fn test_disjoint_sub_batches_concatenate() {
        let records: Vec<PacketRecord> = (0..200)
            .map(|i| PacketRecord::new("TCP", 1500, Some(&payload(1400 + i % 60))))
            .collect();
        let v = validator();
        let whole = v.validate_sequential(&records);

        let (left, right) = records.split_at(77);
        let (a, b) = rayon::join(|| v.validate_sequential(left), || v.validate_sequential(right));
        let joined: Vec<_> = a.into_iter().chain(b).collect();
        assert_eq!(whole, joined);
    }

    #[test]
    fn test_validate_iter_accepts_owned_records() {
        let v = validator();
        let records = vec![PacketRecord::new("UDP", 46, None), PacketRecord::new("TCP", 58, None)];
        let results: Vec<_> = v.validate_iter(records).collect();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.is_valid));
    }

    #[test]
    fn test_configuration_defect_fails_before_records() {
        let empty = ProfileTable::builder()
            .fallback(ProtocolFrameProfile::UNCONSTRAINED)
            .build();
        let records = vec![PacketRecord::new("TCP", 1500, None)];
        assert_eq!(
            validate_batch(&empty, &records).unwrap_err(),
            ConfigurationError::EmptyProfileTable
        );

        let no_fallback = ProfileTable::builder().derive_protocol("TCP", 20, 60).build();
        assert_eq!(
            validate_batch(&no_fallback, &records).unwrap_err(),
            ConfigurationError::MissingFallback
        );
    }

    #[test]
    fn test_custom_fallback_bounds() {
        let table = ProfileTable::builder()
            .derive_protocol("TCP", 20, 60)
            .fallback(ProtocolFrameProfile::new(0, 8, 0, 0))
            .build();
        let v = PacketValidator::new(table).unwrap();
        let result = v.validate_record(&PacketRecord::new("SCTP", 44, None));
        assert_eq!(result.header_diff, Some(6));
        assert!(result.is_valid);
    }

    #[test]
    fn test_extreme_declared_length_is_invalid_not_a_panic() {
        let v = validator();

        let huge = v.validate_record(&PacketRecord::new("TCP", i64::MAX, Some("abc")));
        assert_eq!(huge.header_diff, Some(i64::MAX - 41));
        assert!(!huge.is_valid);
        assert!(huge.issues.contains(&FrameIssue::HeaderTooLarge));

        let text = v.validate_record(&PacketRecord::new("UDP", "99999999999999999999", None));
        assert!(text.is_unparseable());
        assert!(!text.is_valid);
    }
}
