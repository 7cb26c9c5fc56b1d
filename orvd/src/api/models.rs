//! Request and response models for the ORV REST API

use orv_core::{OnboardLed, RackLocation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "success")]
    Success { data: T },
    #[serde(rename = "error")]
    Error { error: String },
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Create an error response
    pub fn error(error: String) -> Self {
        Self::Error { error }
    }
}

/// Result of a fan drive command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanSetResponse {
    pub location: RackLocation,
    /// Normalized drive power in [0, 1]
    pub power: f64,
    /// Low-level commands issued, for diagnostics
    pub commands: Vec<String>,
}

/// Temperature readings for one rack location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureResponse {
    pub location: RackLocation,
    /// One entry per configured sensor, in wiring order; `null` means the
    /// sensor read failed and the sample must be discarded
    pub readings: Vec<Option<f64>>,
    /// Mean of the present readings; absent when no sensor produced a value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average: Option<f64>,
}

/// Result of an LED command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedSetResponse {
    pub led: OnboardLed,
    pub on: bool,
    pub commands: Vec<String>,
}

/// Configured rack locations with their channel counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub fans: HashMap<RackLocation, usize>,
    pub thermistors: HashMap<RackLocation, usize>,
}

/// Daemon information for the root endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    pub version: String,
    pub platform: String,
    pub pcb_revision: String,
    /// Server uptime in seconds
    pub uptime: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_response_serialization() {
        let response = ApiResponse::success(42);
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"success","data":42}"#);

        let response: ApiResponse<()> = ApiResponse::error("broken".to_string());
        let json = serde_json::to_string(&response).unwrap();
        assert_eq!(json, r#"{"status":"error","error":"broken"}"#);
    }

    #[test]
    fn test_temperature_response_null_readings() {
        let response = TemperatureResponse {
            location: RackLocation::IntakeLower,
            readings: vec![Some(25.0), None],
            average: Some(25.0),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("null"));
        assert!(json.contains(r#""location":"intake_lower""#));
    }

    #[test]
    fn test_locations_response_string_keys() {
        let mut fans = HashMap::new();
        fans.insert(RackLocation::IntakeUpper, 2);
        let response = LocationsResponse {
            fans,
            thermistors: HashMap::new(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""intake_upper":2"#));
    }
}
