//! Wire mapping configuration
//!
//! The wire mapping is the user-authored description of how fans and
//! thermistors inside the rack are attached to the ORV PCB headers. It comes
//! from outside the code (an environment variable or a config file), so it
//! carries an explicit schema version that is checked before anything else
//! in the document is interpreted.

use crate::error::{OrvError, Result};
use crate::types::{PwmMarking, RackLocation, ThermistorMarking};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Schema versions of the wire mapping payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WireMappingVersion {
    #[serde(rename = "1")]
    V1,
}

/// The wire mapping shipped as the CLI default, matching the reference
/// two-intake-location build.
pub const DEFAULT_WIRE_MAPPING_JSON: &str = concat!(
    r#"{"version":"1","#,
    r#""fans":{"intake_lower":["PN2","PN5"],"intake_upper":["ONBOARD","PN3"]},"#,
    r#""thermistors":{"intake_lower":["TMP0","TMP1"],"intake_upper":["TMP4","TMP5"]}}"#,
);

/// User-configurable description of the connections made to the ORV PCB.
///
/// Locations absent from either map simply have no fans or sensors; they are
/// never zero-filled. Ordering of the per-location marking lists is
/// preserved and determines the order of command traces and readings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireMapping {
    pub version: WireMappingVersion,
    #[serde(default)]
    pub fans: HashMap<RackLocation, Vec<PwmMarking>>,
    #[serde(default)]
    pub thermistors: HashMap<RackLocation, Vec<ThermistorMarking>>,
}

impl WireMapping {
    /// Parse a wire mapping from its JSON wire format.
    ///
    /// The `version` field is inspected first; an unrecognized version is
    /// rejected before the rest of the document is deserialized, so schema
    /// errors in a future-versioned payload never mask the version mismatch.
    pub fn from_json(payload: &str) -> Result<Self> {
        let document: serde_json::Value = serde_json::from_str(payload)?;

        match document.get("version").and_then(|v| v.as_str()) {
            Some("1") => {}
            Some(other) => {
                return Err(OrvError::UnsupportedMappingVersion(other.to_string()));
            }
            None => {
                return Err(OrvError::UnsupportedMappingVersion("<missing>".to_string()));
            }
        }

        let mapping: WireMapping = serde_json::from_value(document)?;
        mapping.validate()?;
        Ok(mapping)
    }

    /// Check the no-double-assignment invariant.
    ///
    /// A given board marking may appear at most once across the entire
    /// mapping; the same physical pin cannot drive two rack locations. The
    /// PWM and thermistor marking families are disjoint, so they are checked
    /// independently.
    pub fn validate(&self) -> Result<()> {
        let mut seen_pwm: HashSet<PwmMarking> = HashSet::new();
        for markings in self.fans.values() {
            for marking in markings {
                if !seen_pwm.insert(*marking) {
                    return Err(OrvError::DuplicateMarking(marking.as_str().to_string()));
                }
            }
        }

        let mut seen_thermistor: HashSet<ThermistorMarking> = HashSet::new();
        for markings in self.thermistors.values() {
            for marking in markings {
                if !seen_thermistor.insert(*marking) {
                    return Err(OrvError::DuplicateMarking(marking.as_str().to_string()));
                }
            }
        }

        Ok(())
    }

    /// Number of fan channels assigned to a location (0 if unassigned).
    pub fn fan_count(&self, location: RackLocation) -> usize {
        self.fans.get(&location).map_or(0, Vec::len)
    }

    /// Number of thermistor channels assigned to a location (0 if unassigned).
    pub fn thermistor_count(&self, location: RackLocation) -> usize {
        self.thermistors.get(&location).map_or(0, Vec::len)
    }
}

impl Default for WireMapping {
    /// The built-in mapping; parses the same payload the CLI uses as its
    /// default, which is known-valid.
    fn default() -> Self {
        Self::from_json(DEFAULT_WIRE_MAPPING_JSON).expect("built-in wire mapping is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mapping_parses() {
        let mapping = WireMapping::default();
        assert_eq!(mapping.version, WireMappingVersion::V1);
        assert_eq!(mapping.fan_count(RackLocation::IntakeLower), 2);
        assert_eq!(mapping.fan_count(RackLocation::IntakeUpper), 2);
        assert_eq!(mapping.fan_count(RackLocation::ExhaustLower), 0);
        assert_eq!(mapping.thermistor_count(RackLocation::IntakeLower), 2);
        assert_eq!(
            mapping.fans[&RackLocation::IntakeLower],
            vec![PwmMarking::Pn2, PwmMarking::Pn5]
        );
    }

    #[test]
    fn test_unknown_version_rejected_before_body() {
        // The fans section is garbage, but the version gate must fire first.
        let payload = r#"{"version":"2","fans":{"not_a_location":["BOGUS"]}}"#;
        match WireMapping::from_json(payload) {
            Err(OrvError::UnsupportedMappingVersion(v)) => assert_eq!(v, "2"),
            other => panic!("Expected UnsupportedMappingVersion, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_version_rejected() {
        let payload = r#"{"fans":{},"thermistors":{}}"#;
        assert!(matches!(
            WireMapping::from_json(payload),
            Err(OrvError::UnsupportedMappingVersion(_))
        ));
    }

    #[test]
    fn test_duplicate_pwm_marking_across_locations() {
        let payload = r#"{
            "version": "1",
            "fans": {
                "intake_lower": ["PN2"],
                "exhaust_lower": ["PN2"]
            },
            "thermistors": {}
        }"#;
        match WireMapping::from_json(payload) {
            Err(OrvError::DuplicateMarking(m)) => assert_eq!(m, "PN2"),
            other => panic!("Expected DuplicateMarking, got {:?}", other),
        }
    }

    #[test]
    fn test_duplicate_marking_within_one_location() {
        let payload = r#"{
            "version": "1",
            "fans": {"intake_lower": ["PN0", "PN0"]},
            "thermistors": {}
        }"#;
        assert!(matches!(
            WireMapping::from_json(payload),
            Err(OrvError::DuplicateMarking(_))
        ));
    }

    #[test]
    fn test_duplicate_thermistor_marking() {
        let payload = r#"{
            "version": "1",
            "fans": {},
            "thermistors": {
                "intake_lower": ["TMP0"],
                "intake_upper": ["TMP0"]
            }
        }"#;
        assert!(matches!(
            WireMapping::from_json(payload),
            Err(OrvError::DuplicateMarking(_))
        ));
    }

    #[test]
    fn test_unknown_marking_name_is_schema_error() {
        let payload = r#"{"version":"1","fans":{"intake_lower":["PN9"]},"thermistors":{}}"#;
        assert!(matches!(
            WireMapping::from_json(payload),
            Err(OrvError::Serialization(_))
        ));
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let mapping = WireMapping::from_json(r#"{"version":"1"}"#).unwrap();
        assert!(mapping.fans.is_empty());
        assert!(mapping.thermistors.is_empty());
    }

    #[test]
    fn test_round_trip_preserves_counts() {
        let original = WireMapping::default();
        let json = serde_json::to_string(&original).unwrap();
        let restored = WireMapping::from_json(&json).unwrap();

        for location in RackLocation::ALL {
            assert_eq!(original.fan_count(location), restored.fan_count(location));
            assert_eq!(
                original.thermistor_count(location),
                restored.thermistor_count(location)
            );
        }
    }
}
