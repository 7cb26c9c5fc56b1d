//! Error types for the Open Rack Vent system

use crate::types::{HardwarePlatform, PcbRevision, RackLocation};
use thiserror::Error;

/// Core error type for ORV operations
///
/// Construction-time errors (unsupported platform, unknown or duplicate
/// marking, malformed lookup table) are configuration errors and abort
/// startup. A failed temperature read during steady state is never surfaced
/// through this type; it degrades to an absent reading instead.
#[derive(Error, Debug)]
pub enum OrvError {
    /// The thermistor lookup asset could not be parsed
    #[error("Malformed lookup table: {0}")]
    MalformedTable(String),

    /// The (platform, PCB revision) pair has no marking registry
    #[error("Unsupported platform/revision pair: {platform} / {revision}")]
    UnsupportedPlatform {
        platform: HardwarePlatform,
        revision: PcbRevision,
    },

    /// Wire mapping references a marking absent from the selected registry
    #[error("Board marking not present on this board: {0}")]
    UnknownMarking(String),

    /// The same board marking is assigned twice in a wire mapping
    #[error("Board marking assigned more than once: {0}")]
    DuplicateMarking(String),

    /// Wire mapping schema version not understood by this build
    #[error("Unsupported wire mapping version: {0}")]
    UnsupportedMappingVersion(String),

    /// Fan drive power outside the closed [0, 1] range
    #[error("Fan power {0} outside the allowed range [0.0, 1.0]")]
    PowerOutOfRange(f64),

    /// A rack location with no configured channels was addressed
    #[error("No {kind} configured for rack location {location}")]
    LocationNotConfigured {
        location: RackLocation,
        kind: &'static str,
    },

    /// An ADC count of zero cannot be converted to a resistance
    #[error("ADC count of zero cannot be converted to a resistance")]
    ZeroAdcCount,

    /// Hardware transaction failures
    #[error("Hardware error: {0}")]
    Hardware(String),

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for ORV operations
pub type Result<T> = std::result::Result<T, OrvError>;

impl From<serde_json::Error> for OrvError {
    fn from(err: serde_json::Error) -> Self {
        OrvError::Serialization(err.to_string())
    }
}
