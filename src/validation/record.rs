// Thu Jan 22 2026 - Alex

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Total packet length as it arrived from upstream, before coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum DeclaredLength {
    Integer(i64),
    Float(f64),
    Text(String),
    #[default]
    Missing,
    /// Booleans, arrays, objects. Kept so one odd row cannot sink the batch.
    Other(Value),
}

impl DeclaredLength {
    /// Coerce to a non-negative byte count. `None` means the record is unparseable.
    pub fn parse(&self) -> Option<i64> {
        match self {
            DeclaredLength::Integer(n) => Some(*n).filter(|n| *n >= 0),
            DeclaredLength::Float(f) => whole_length(*f),
            DeclaredLength::Text(s) => {
                let s = s.trim();
                match s.parse::<i64>() {
                    Ok(n) => Some(n).filter(|n| *n >= 0),
                    Err(_) => s.parse::<f64>().ok().and_then(whole_length),
                }
            }
            DeclaredLength::Missing | DeclaredLength::Other(_) => None,
        }
    }

    /// Interpret a raw cell from a text source. Empty cells are missing values.
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            DeclaredLength::Missing
        } else {
            DeclaredLength::Text(cell.to_string())
        }
    }
}

/// `1500.0` counts, `1500.5` does not.
fn whole_length(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= 0.0 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

impl From<i64> for DeclaredLength {
    fn from(value: i64) -> Self {
        DeclaredLength::Integer(value)
    }
}

impl From<&str> for DeclaredLength {
    fn from(value: &str) -> Self {
        DeclaredLength::Text(value.to_string())
    }
}

impl fmt::Display for DeclaredLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclaredLength::Integer(n) => write!(f, "{}", n),
            DeclaredLength::Float(v) => write!(f, "{}", v),
            DeclaredLength::Text(s) => write!(f, "{}", s),
            DeclaredLength::Missing => Ok(()),
            DeclaredLength::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One row of the input batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacketRecord {
    #[serde(default, deserialize_with = "label_text")]
    pub protocol: String,
    #[serde(default)]
    pub declared_length: DeclaredLength,
    #[serde(default, deserialize_with = "optional_text")]
    pub payload: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub packet_type: Option<String>,
}

impl PacketRecord {
    pub fn new(protocol: &str, declared_length: impl Into<DeclaredLength>, payload: Option<&str>) -> Self {
        Self {
            protocol: protocol.to_string(),
            declared_length: declared_length.into(),
            payload: payload.map(str::to_string),
            packet_type: None,
        }
    }

    pub fn with_packet_type(mut self, packet_type: &str) -> Self {
        self.packet_type = Some(packet_type.to_string());
        self
    }

    /// Character count of the payload text, not its decoded byte length.
    pub fn payload_length(&self) -> i64 {
        self.payload
            .as_deref()
            .map(|p| p.chars().count() as i64)
            .unwrap_or(0)
    }
}

/// Null becomes `None`; numbers and other scalars keep their JSON text, so
/// `"protocol": 6` reads as the label `6`.
fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

fn label_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}
