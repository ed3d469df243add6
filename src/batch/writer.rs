// Fri Jan 23 2026 - Alex

use crate::batch::BatchFormat;
use crate::error::BatchError;
use crate::payload::PayloadFeatures;
use crate::validation::{FrameIssue, PacketRecord, ValidationResult};
use serde::{Serialize, Serializer};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Source fields plus derived ones. Derived columns sit before the payload so
/// the wide text column stays last.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedRecord<'a> {
    pub protocol: &'a str,
    pub packet_type: Option<&'a str>,
    pub declared_length: String,
    pub payload_length: i64,
    pub header_diff: Option<i64>,
    pub is_valid: bool,
    pub payload_min_diff: i64,
    pub payload_max_diff: i64,
    pub recognized: bool,
    #[serde(serialize_with = "join_issues")]
    pub issues: &'a [FrameIssue],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entropy: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filler_text: Option<bool>,
    pub payload: Option<&'a str>,
}

fn join_issues<S: Serializer>(issues: &&[FrameIssue], serializer: S) -> Result<S::Ok, S::Error> {
    let joined = issues.iter().map(|i| i.code()).collect::<Vec<_>>().join(";");
    serializer.serialize_str(&joined)
}

/// Pair each record with its result. `features`, when given, must be
/// index-aligned with `records` as well.
pub fn annotate<'a>(
    records: &'a [PacketRecord],
    results: &'a [ValidationResult],
    features: Option<&'a [PayloadFeatures]>,
) -> Vec<AnnotatedRecord<'a>> {
    debug_assert_eq!(records.len(), results.len());

    records
        .iter()
        .zip(results)
        .enumerate()
        .map(|(i, (record, result))| {
            let feature = features.and_then(|f| f.get(i));
            AnnotatedRecord {
                protocol: &record.protocol,
                packet_type: record.packet_type.as_deref(),
                declared_length: record.declared_length.to_string(),
                payload_length: result.payload_length,
                header_diff: result.header_diff,
                is_valid: result.is_valid,
                payload_min_diff: result.payload_min_diff,
                payload_max_diff: result.payload_max_diff,
                recognized: result.recognized,
                issues: &result.issues,
                entropy: feature.map(|f| f.entropy),
                filler_text: feature.map(|f| f.filler_text),
                payload: record.payload.as_deref(),
            }
        })
        .collect()
}

pub struct BatchWriter {
    format: BatchFormat,
    pretty: bool,
}

impl BatchWriter {
    pub fn new(format: BatchFormat) -> Self {
        Self {
            format,
            pretty: true,
        }
    }

    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn write<W: Write>(&self, writer: W, rows: &[AnnotatedRecord<'_>]) -> Result<(), BatchError> {
        match self.format {
            BatchFormat::Csv => {
                let mut wtr = csv::WriterBuilder::new().from_writer(writer);
                for row in rows {
                    wtr.serialize(row)?;
                }
                wtr.flush()?;
            }
            BatchFormat::Json => {
                let mut writer = writer;
                if self.pretty {
                    serde_json::to_writer_pretty(&mut writer, rows)?;
                } else {
                    serde_json::to_writer(&mut writer, rows)?;
                }
                writer.flush()?;
            }
            BatchFormat::Jsonl => {
                let mut writer = writer;
                for row in rows {
                    serde_json::to_writer(&mut writer, row)?;
                    writer.write_all(b"\n")?;
                }
                writer.flush()?;
            }
        }
        Ok(())
    }

    pub fn write_path(&self, path: &Path, rows: &[AnnotatedRecord<'_>]) -> Result<(), BatchError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = File::create(path)?;
        self.write(BufWriter::new(file), rows)?;
        log::debug!("Wrote {} annotated records to {:?}", rows.len(), path);
        Ok(())
    }
}

pub fn write_annotated(path: &Path, format: Option<BatchFormat>, rows: &[AnnotatedRecord<'_>]) -> Result<(), BatchError> {
    let format = BatchFormat::resolve(format, path)?;
    BatchWriter::new(format).write_path(path, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::FillerDetector;
    use crate::validation::{PacketValidator, ProfileTable};

    fn sample() -> (Vec<PacketRecord>, Vec<ValidationResult>) {
        let records = vec![
            PacketRecord::new("UDP", 46, None).with_packet_type("Data"),
            PacketRecord::new("TCP", "oops", Some("abc")),
        ];
        let results = PacketValidator::new(ProfileTable::standard())
            .unwrap()
            .validate_sequential(&records);
        (records, results)
    }

    #[test]
    fn test_csv_output_columns() {
        let (records, results) = sample();
        let rows = annotate(&records, &results, None);

        let mut buf = Vec::new();
        BatchWriter::new(BatchFormat::Csv).write(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "protocol,packet_type,declared_length,payload_length,header_diff,is_valid,payload_min_diff,payload_max_diff,recognized,issues,payload"
        );
        assert_eq!(lines[1], "UDP,Data,46,0,8,true,1454,1454,true,,");
        assert_eq!(lines[2], "TCP,,oops,3,,false,1399,1439,true,unparseable_length,abc");
    }

    #[test]
    fn test_json_output_with_features() {
        let (records, results) = sample();
        let detector = FillerDetector::new();
        let features: Vec<PayloadFeatures> = records
            .iter()
            .map(|r| PayloadFeatures::extract(r.payload.as_deref(), &detector))
            .collect();
        let rows = annotate(&records, &results, Some(&features));

        let mut buf = Vec::new();
        BatchWriter::new(BatchFormat::Json).write(&mut buf, &rows).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();

        assert_eq!(json[0]["header_diff"], 8);
        assert_eq!(json[0]["entropy"], 0.0);
        assert_eq!(json[1]["header_diff"], serde_json::Value::Null);
        assert_eq!(json[1]["filler_text"], false);
    }

    #[test]
    fn test_jsonl_output() {
        let (records, results) = sample();
        let rows = annotate(&records, &results, None);

        let mut buf = Vec::new();
        BatchWriter::new(BatchFormat::Jsonl).write(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(!text.contains("entropy"));
    }
}
