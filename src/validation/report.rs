// Thu Jan 22 2026 - Alex

use crate::validation::validator::ValidationResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write;

/// Aggregate view over one validation run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub total: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub unrecognized_protocol_count: usize,
    pub unparseable_count: usize,
    /// Keyed by protocol label, sorted.
    pub protocols: BTreeMap<String, ProtocolBreakdown>,
    /// Keyed by issue code.
    pub issue_counts: BTreeMap<String, usize>,
}

/// Per-protocol counts. The mean header diff of invalid records is the
/// number to look at when tuning profile bounds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProtocolBreakdown {
    pub records: usize,
    pub invalid_count: usize,
    pub mean_invalid_header_diff: Option<f64>,
}

#[derive(Default)]
struct BreakdownAccumulator {
    records: usize,
    invalid_count: usize,
    invalid_diff_sum: i128,
    invalid_diff_count: usize,
}

impl BreakdownAccumulator {
    fn finish(self) -> ProtocolBreakdown {
        let mean = if self.invalid_diff_count > 0 {
            Some(self.invalid_diff_sum as f64 / self.invalid_diff_count as f64)
        } else {
            None
        };
        ProtocolBreakdown {
            records: self.records,
            invalid_count: self.invalid_count,
            mean_invalid_header_diff: mean,
        }
    }
}

pub fn summarize<'a, I>(results: I) -> ValidationSummary
where
    I: IntoIterator<Item = &'a ValidationResult>,
{
    let mut summary = ValidationSummary::new();
    let mut per_protocol: BTreeMap<String, BreakdownAccumulator> = BTreeMap::new();

    for result in results {
        summary.total += 1;
        if result.is_valid {
            summary.valid_count += 1;
        } else {
            summary.invalid_count += 1;
        }
        if !result.recognized {
            summary.unrecognized_protocol_count += 1;
        }
        if result.is_unparseable() {
            summary.unparseable_count += 1;
        }
        for issue in &result.issues {
            *summary.issue_counts.entry(issue.code().to_string()).or_insert(0) += 1;
        }

        let acc = per_protocol.entry(result.protocol.clone()).or_default();
        acc.records += 1;
        if !result.is_valid {
            acc.invalid_count += 1;
            if let Some(diff) = result.header_diff {
                acc.invalid_diff_sum += diff as i128;
                acc.invalid_diff_count += 1;
            }
        }
    }

    summary.protocols = per_protocol
        .into_iter()
        .map(|(name, acc)| (name, acc.finish()))
        .collect();
    summary
}

impl ValidationSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_results(results: &[ValidationResult]) -> Self {
        summarize(results)
    }

    /// Percentage of valid records, 0 for an empty batch.
    pub fn valid_ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid_count as f64 / self.total as f64 * 100.0
        }
    }

    pub fn is_clean(&self) -> bool {
        self.invalid_count == 0
    }

    pub fn format_report(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "=== Packet Structure Validation Report ===");
        let _ = writeln!(output, "Total records: {}", self.total);
        let _ = writeln!(output, "Valid: {} ({:.1}%)", self.valid_count, self.valid_ratio());
        let _ = writeln!(output, "Invalid: {}", self.invalid_count);
        let _ = writeln!(output, "Unrecognized protocol: {}", self.unrecognized_protocol_count);
        let _ = writeln!(output, "Unparseable length: {}", self.unparseable_count);

        if !self.protocols.is_empty() {
            let _ = writeln!(output, "\nBy protocol:");
            for (name, breakdown) in &self.protocols {
                let _ = writeln!(
                    output,
                    "  {:<12} records={} invalid={} mean_invalid_header_diff={}",
                    display_label(name),
                    breakdown.records,
                    breakdown.invalid_count,
                    format_mean(breakdown.mean_invalid_header_diff)
                );
            }
        }

        if !self.issue_counts.is_empty() {
            let _ = writeln!(output, "\nIssues:");
            for (code, count) in &self.issue_counts {
                let _ = writeln!(output, "  - {}: {}", code, count);
            }
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "# Packet Structure Validation Report");
        let _ = writeln!(output);
        let _ = writeln!(output, "## Summary");
        let _ = writeln!(output);
        let _ = writeln!(output, "| Metric | Count |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Total | {} |", self.total);
        let _ = writeln!(output, "| Valid | {} |", self.valid_count);
        let _ = writeln!(output, "| Invalid | {} |", self.invalid_count);
        let _ = writeln!(output, "| Unrecognized protocol | {} |", self.unrecognized_protocol_count);
        let _ = writeln!(output, "| Unparseable length | {} |", self.unparseable_count);
        let _ = writeln!(output);

        let _ = writeln!(output, "## Protocols");
        let _ = writeln!(output);
        let _ = writeln!(output, "| Protocol | Records | Invalid | Mean invalid header diff |");
        let _ = writeln!(output, "|----------|---------|---------|--------------------------|");
        for (name, breakdown) in &self.protocols {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                display_label(name),
                breakdown.records,
                breakdown.invalid_count,
                format_mean(breakdown.mean_invalid_header_diff)
            );
        }
        let _ = writeln!(output);

        output
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

fn display_label(name: &str) -> &str {
    if name.is_empty() {
        "<none>"
    } else {
        name
    }
}

fn format_mean(mean: Option<f64>) -> String {
    mean.map(|m| format!("{:.2}", m)).unwrap_or_else(|| "-".to_string())
}
