//! Open Rack Vent Core Library
//!
//! Shared domain types, wiring configuration, and the thermistor conversion
//! pipeline for the Open Rack Vent project. This crate is hardware-free;
//! everything that touches pins lives in `orv-hardware`.

pub mod error;
pub mod thermistor;
pub mod types;
pub mod wiring;

// Re-export commonly used types
pub use error::{OrvError, Result};
pub use thermistor::{
    counts_to_resistance, ResistanceTemperatureTable, TemperatureConverter, PULLDOWN_OHMS,
    U12_MAX_COUNT,
};
pub use types::{
    HardwarePlatform, OnboardLed, PcbRevision, PwmMarking, RackLocation, ThermistorMarking,
};
pub use wiring::{WireMapping, WireMappingVersion, DEFAULT_WIRE_MAPPING_JSON};
