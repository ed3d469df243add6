// Fri Jan 23 2026 - Alex

use crate::batch::{BatchFormat, ColumnMapping};
use crate::error::BatchError;
use crate::validation::{DeclaredLength, PacketRecord};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

pub struct BatchReader {
    columns: ColumnMapping,
}

impl BatchReader {
    pub fn new(columns: ColumnMapping) -> Self {
        Self { columns }
    }

    pub fn read_path(&self, path: &Path, format: BatchFormat) -> Result<Vec<PacketRecord>, BatchError> {
        let file = File::open(path)?;
        let records = self.read(BufReader::new(file), format)?;
        log::debug!("Read {} records from {:?}", records.len(), path);
        Ok(records)
    }

    pub fn read<R: Read>(&self, reader: R, format: BatchFormat) -> Result<Vec<PacketRecord>, BatchError> {
        match format {
            BatchFormat::Csv => self.read_csv(reader),
            BatchFormat::Json => Ok(serde_json::from_reader(reader)?),
            BatchFormat::Jsonl => self.read_jsonl(reader),
        }
    }

    fn read_csv<R: Read>(&self, reader: R) -> Result<Vec<PacketRecord>, BatchError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.headers()?.clone();
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| find(name).ok_or_else(|| BatchError::MissingColumn(name.to_string()));

        let protocol_idx = require(self.columns.protocol.as_str())?;
        let length_idx = require(self.columns.declared_length.as_str())?;
        let payload_idx = require(self.columns.payload.as_str())?;
        let packet_type_idx = find(self.columns.packet_type.as_str());

        let mut records = Vec::new();
        for row in rdr.records() {
            let row = row?;
            let cell = |idx: usize| row.get(idx).filter(|v| !v.is_empty());

            records.push(PacketRecord {
                protocol: cell(protocol_idx).unwrap_or("").to_string(),
                declared_length: DeclaredLength::from_cell(cell(length_idx).unwrap_or("")),
                payload: cell(payload_idx).map(str::to_string),
                packet_type: packet_type_idx.and_then(cell).map(str::to_string),
            });
        }

        Ok(records)
    }

    fn read_jsonl<R: Read>(&self, reader: R) -> Result<Vec<PacketRecord>, BatchError> {
        let mut records = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line)?);
        }
        Ok(records)
    }
}

impl Default for BatchReader {
    fn default() -> Self {
        Self::new(ColumnMapping::default())
    }
}

pub fn read_records(path: &Path, format: Option<BatchFormat>, columns: &ColumnMapping) -> Result<Vec<PacketRecord>, BatchError> {
    let format = BatchFormat::resolve(format, path)?;
    BatchReader::new(columns.clone()).read_path(path, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{PacketValidator, ProfileTable};

    const SAMPLE_CSV: &str = "\
Timestamp,Protocol,Packet Length,Packet Type,Payload Data
2023-05-30 06:33:58,UDP,50,Data,abcd
2023-08-26 07:08:30,TCP,,Control,
2022-11-13 08:23:25,ICMP,1500.5,Data,\"a, quoted payload\"
";

    #[test]
    fn test_read_csv_with_default_columns() {
        let records = BatchReader::default()
            .read(SAMPLE_CSV.as_bytes(), BatchFormat::Csv)
            .unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].protocol, "UDP");
        assert_eq!(records[0].declared_length.parse(), Some(50));
        assert_eq!(records[0].payload.as_deref(), Some("abcd"));
        assert_eq!(records[0].packet_type.as_deref(), Some("Data"));

        assert_eq!(records[1].declared_length, DeclaredLength::Missing);
        assert_eq!(records[1].payload, None);

        assert_eq!(records[2].declared_length.parse(), None);
        assert_eq!(records[2].payload_length(), 17);
    }

    #[test]
    fn test_missing_required_column() {
        let csv = "Protocol,Payload Data\nTCP,abc\n";
        match BatchReader::default().read(csv.as_bytes(), BatchFormat::Csv) {
            Err(BatchError::MissingColumn(name)) => assert_eq!(name, "Packet Length"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_optional_packet_type_column() {
        let csv = "proto,len,data\nTCP,60,xx\n";
        let columns = ColumnMapping {
            protocol: "proto".to_string(),
            declared_length: "len".to_string(),
            payload: "data".to_string(),
            ..ColumnMapping::default()
        };
        let records = BatchReader::new(columns).read(csv.as_bytes(), BatchFormat::Csv).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].packet_type, None);
        assert_eq!(records[0].declared_length.parse(), Some(60));
    }

    #[test]
    fn test_read_jsonl_skips_blank_lines() {
        let input = "{\"protocol\":\"UDP\",\"declared_length\":46}\n\n{\"protocol\":\"TCP\",\"declared_length\":\"58\",\"payload\":\"\"}\n";
        let records = BatchReader::default().read(input.as_bytes(), BatchFormat::Jsonl).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].declared_length.parse(), Some(58));
    }

    #[test]
    fn test_read_json_array() {
        let input = r#"[{"protocol":"ICMP","declared_length":1500,"payload":"p"}]"#;
        let records = BatchReader::default().read(input.as_bytes(), BatchFormat::Json).unwrap();
        assert_eq!(records[0].protocol, "ICMP");
    }

    #[test]
    fn test_mixed_json_batch_keeps_good_records() {
        let input = r#"[
            {"protocol":"TCP","declared_length":1500,"payload":null},
            {"protocol":"TCP","declared_length":true,"payload":"x"},
            {"protocol":6,"declared_length":38}
        ]"#;
        let records = BatchReader::default().read(input.as_bytes(), BatchFormat::Json).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].declared_length.parse(), Some(1500));
        assert_eq!(records[2].protocol, "6");

        let outcome = PacketValidator::new(ProfileTable::standard())
            .unwrap()
            .validate_batch(&records);
        assert_eq!(outcome.summary.total, 3);
        assert_eq!(outcome.summary.unparseable_count, 1);
        assert!(outcome.results[1].is_unparseable());
        assert!(!outcome.results[1].is_valid);
        // unknown label "6" takes the zero fallback: 38 - 38 = 0
        assert!(!outcome.results[2].recognized);
        assert!(outcome.results[2].is_valid);
    }

    #[test]
    fn test_jsonl_odd_length_is_unparseable_not_fatal() {
        let input = "{\"protocol\":\"UDP\",\"declared_length\":46}\n{\"protocol\":\"UDP\",\"declared_length\":{}}\n";
        let records = BatchReader::default().read(input.as_bytes(), BatchFormat::Jsonl).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].declared_length.parse(), Some(46));
        assert_eq!(records[1].declared_length.parse(), None);
    }

    #[test]
    fn test_csv_and_json_agree_on_float_lengths() {
        let csv = "Protocol,Packet Length,Payload Data\nUDP,1500.0,x\n";
        let json = r#"[{"protocol":"UDP","declared_length":1500.0,"payload":"x"}]"#;
        let from_csv = BatchReader::default().read(csv.as_bytes(), BatchFormat::Csv).unwrap();
        let from_json = BatchReader::default().read(json.as_bytes(), BatchFormat::Json).unwrap();
        assert_eq!(from_csv[0].declared_length.parse(), Some(1500));
        assert_eq!(from_csv[0].declared_length.parse(), from_json[0].declared_length.parse());
    }
}
