// Thu Jan 22 2026 - Alex

use crate::error::ConfigurationError;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MTU: i64 = 1500;
/// 14 bytes Ethernet header + 4 bytes FCS.
pub const ETHERNET_OVERHEAD: i64 = 18;
/// IPv4 header without options.
pub const IPV4_HEADER: i64 = 20;
/// IPv4 total length is a 16-bit field.
pub const MAX_MTU: i64 = 65535;

static STANDARD_TABLE: Lazy<ProfileTable> = Lazy::new(|| {
    ProfileTable::builder()
        .derive_protocol("TCP", 20, 60)
        .derive_protocol("UDP", 8, 8)
        .derive_protocol("ICMP", 8, 8)
        .fallback(ProtocolFrameProfile::UNCONSTRAINED)
        .build()
});

/// Fixed framing around the transport layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FramingConstants {
    pub mtu: i64,
    pub ethernet_overhead: i64,
    pub ip_header: i64,
}

impl FramingConstants {
    pub const STANDARD: FramingConstants = FramingConstants {
        mtu: DEFAULT_MTU,
        ethernet_overhead: ETHERNET_OVERHEAD,
        ip_header: IPV4_HEADER,
    };

    pub fn with_mtu(mut self, mtu: i64) -> Self {
        self.mtu = mtu;
        self
    }

    pub fn with_ethernet_overhead(mut self, overhead: i64) -> Self {
        self.ethernet_overhead = overhead;
        self
    }

    pub fn with_ip_header(mut self, ip_header: i64) -> Self {
        self.ip_header = ip_header;
        self
    }

    /// Bytes every packet carries regardless of protocol.
    /// Saturates on framing that `validate` would reject.
    pub fn fixed_overhead(&self) -> i64 {
        self.ethernet_overhead.saturating_add(self.ip_header)
    }

    /// Bytes left for transport header plus payload within one MTU.
    pub fn transport_budget(&self) -> i64 {
        self.mtu.saturating_sub(self.fixed_overhead())
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.ethernet_overhead < 0 || self.ip_header < 0 {
            return Err(ConfigurationError::InvalidFraming(format!(
                "overheads must be non-negative (ethernet {}, ip {})",
                self.ethernet_overhead, self.ip_header
            )));
        }
        let overhead = self
            .ethernet_overhead
            .checked_add(self.ip_header)
            .ok_or_else(|| ConfigurationError::InvalidFraming("fixed overhead overflows".to_string()))?;
        if self.mtu > MAX_MTU {
            return Err(ConfigurationError::InvalidFraming(format!(
                "MTU {} exceeds the IPv4 maximum of {}",
                self.mtu, MAX_MTU
            )));
        }
        if self.mtu <= overhead {
            return Err(ConfigurationError::InvalidFraming(format!(
                "MTU {} leaves no room after {} bytes of fixed overhead",
                self.mtu, overhead
            )));
        }
        Ok(())
    }
}

impl Default for FramingConstants {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Header and payload bounds for one protocol. All bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolFrameProfile {
    pub header_min: i64,
    pub header_max: i64,
    pub payload_min: i64,
    pub payload_max: i64,
}

impl ProtocolFrameProfile {
    /// No known constraint: everything is zero.
    pub const UNCONSTRAINED: ProtocolFrameProfile = ProtocolFrameProfile {
        header_min: 0,
        header_max: 0,
        payload_min: 0,
        payload_max: 0,
    };

    pub fn new(header_min: i64, header_max: i64, payload_min: i64, payload_max: i64) -> Self {
        Self {
            header_min,
            header_max,
            payload_min,
            payload_max,
        }
    }

    /// Payload bounds follow from the header range: the largest header leaves
    /// the smallest payload window and vice versa.
    pub fn derived(header_min: i64, header_max: i64, framing: &FramingConstants) -> Self {
        let budget = framing.transport_budget();
        Self {
            header_min,
            header_max,
            payload_min: budget - header_max,
            payload_max: budget - header_min,
        }
    }

    pub fn accepts_header(&self, header_size: i64) -> bool {
        header_size >= self.header_min && header_size <= self.header_max
    }

    pub fn accepts_payload(&self, payload_len: i64) -> bool {
        payload_len >= self.payload_min && payload_len <= self.payload_max
    }

    fn validate(&self, protocol: &str) -> Result<(), ConfigurationError> {
        for (field, value) in [
            ("header_min", self.header_min),
            ("payload_min", self.payload_min),
        ] {
            if value < 0 {
                return Err(ConfigurationError::NegativeBound {
                    protocol: protocol.to_string(),
                    field,
                    value,
                });
            }
        }
        if self.header_min > self.header_max {
            return Err(ConfigurationError::InvertedBounds {
                protocol: protocol.to_string(),
                field: "header",
                min: self.header_min,
                max: self.header_max,
            });
        }
        if self.payload_min > self.payload_max {
            return Err(ConfigurationError::InvertedBounds {
                protocol: protocol.to_string(),
                field: "payload",
                min: self.payload_min,
                max: self.payload_max,
            });
        }
        Ok(())
    }
}

impl fmt::Display for ProtocolFrameProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "header {}-{}, payload {}-{}",
            self.header_min, self.header_max, self.payload_min, self.payload_max
        )
    }
}

/// Protocol label -> frame profile, plus the fallback used for unknown labels.
///
/// Labels are matched verbatim. Build once, then share read-only (the validator
/// wraps it in an `Arc`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileTable {
    #[serde(default)]
    pub framing: FramingConstants,
    #[serde(default)]
    pub protocols: IndexMap<String, ProtocolFrameProfile>,
    #[serde(default)]
    pub fallback: Option<ProtocolFrameProfile>,
}

impl ProfileTable {
    /// Ethernet + IPv4 at a 1500 byte MTU with TCP, UDP and ICMP.
    pub fn standard() -> Self {
        STANDARD_TABLE.clone()
    }

    pub fn builder() -> ProfileTableBuilder {
        ProfileTableBuilder::new()
    }

    pub fn lookup(&self, protocol: &str) -> Option<&ProtocolFrameProfile> {
        self.protocols.get(protocol)
    }

    pub fn len(&self) -> usize {
        self.protocols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.protocols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ProtocolFrameProfile)> {
        self.protocols.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.framing.validate()?;

        if self.protocols.is_empty() {
            return Err(ConfigurationError::EmptyProfileTable);
        }

        let fallback = self.fallback.as_ref().ok_or(ConfigurationError::MissingFallback)?;
        fallback.validate("<fallback>")?;

        for (name, profile) in &self.protocols {
            if name.trim().is_empty() {
                return Err(ConfigurationError::EmptyProtocolLabel);
            }
            profile.validate(name)?;
        }

        Ok(())
    }
}

impl Default for ProfileTable {
    fn default() -> Self {
        Self::standard()
    }
}

pub struct ProfileTableBuilder {
    framing: FramingConstants,
    protocols: IndexMap<String, ProtocolFrameProfile>,
    fallback: Option<ProtocolFrameProfile>,
}

impl ProfileTableBuilder {
    pub fn new() -> Self {
        Self {
            framing: FramingConstants::STANDARD,
            protocols: IndexMap::new(),
            fallback: None,
        }
    }

    /// Set framing before calling `derive_protocol`, which reads it.
    pub fn framing(mut self, framing: FramingConstants) -> Self {
        self.framing = framing;
        self
    }

    pub fn protocol(mut self, name: &str, profile: ProtocolFrameProfile) -> Self {
        self.protocols.insert(name.to_string(), profile);
        self
    }

    pub fn derive_protocol(self, name: &str, header_min: i64, header_max: i64) -> Self {
        let profile = ProtocolFrameProfile::derived(header_min, header_max, &self.framing);
        self.protocol(name, profile)
    }

    pub fn fallback(mut self, profile: ProtocolFrameProfile) -> Self {
        self.fallback = Some(profile);
        self
    }

    pub fn build(self) -> ProfileTable {
        ProfileTable {
            framing: self.framing,
            protocols: self.protocols,
            fallback: self.fallback,
        }
    }
}

impl Default for ProfileTableBuilder {
    fn default() -> Self {
        Self::new()
    }
}
