//! Daemon information and introspection endpoints

use crate::api::models::{ApiResponse, InfoResponse, LocationsResponse};
use crate::api::AppState;
use axum::{extract::State, Json};
use tracing::debug;

/// Daemon information.
///
/// # Endpoint
///
/// `GET /`
pub(crate) async fn root(State(state): State<AppState>) -> Json<ApiResponse<InfoResponse>> {
    debug!("Request: GET /");

    Json(ApiResponse::success(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        platform: state.platform.to_string(),
        pcb_revision: state.pcb_revision.to_string(),
        uptime: state.start_time.elapsed().as_secs(),
    }))
}

/// Liveness probe.
///
/// # Endpoint
///
/// `GET /api/v0/health`
pub(crate) async fn health() -> Json<ApiResponse<&'static str>> {
    Json(ApiResponse::success("ok"))
}

/// Configured rack locations and their channel counts, for clients that
/// discover the control surfaces at runtime.
///
/// # Endpoint
///
/// `GET /api/v0/locations`
pub(crate) async fn get_locations(
    State(state): State<AppState>,
) -> Json<ApiResponse<LocationsResponse>> {
    debug!("Request: GET /api/v0/locations");

    Json(ApiResponse::success(LocationsResponse {
        fans: state.interface.fan_locations().into_iter().collect(),
        thermistors: state.interface.sensor_locations().into_iter().collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use orv_core::{HardwarePlatform, PcbRevision, RackLocation, WireMapping};
    use orv_hardware::{build_interface, MockDriver};
    use std::sync::Arc;

    fn test_state() -> AppState {
        let interface = build_interface(
            HardwarePlatform::BeagleBoneBlack,
            PcbRevision::V100,
            &WireMapping::default(),
            MockDriver::new(),
        )
        .unwrap();
        AppState::new(
            Arc::new(interface),
            HardwarePlatform::BeagleBoneBlack,
            PcbRevision::V100,
        )
    }

    #[tokio::test]
    async fn test_locations_reflect_wiring() {
        let response = get_locations(State(test_state())).await;

        match response.0 {
            ApiResponse::Success { data } => {
                assert_eq!(data.fans.len(), 2);
                assert_eq!(data.fans[&RackLocation::IntakeLower], 2);
                assert_eq!(data.thermistors[&RackLocation::IntakeUpper], 2);
            }
            ApiResponse::Error { error } => panic!("unexpected error: {error}"),
        }
    }

    #[tokio::test]
    async fn test_root_reports_platform() {
        let response = root(State(test_state())).await;

        match response.0 {
            ApiResponse::Success { data } => {
                assert_eq!(data.platform, "BeagleBoneBlack");
                assert_eq!(data.pcb_revision, "v1.0.0");
            }
            ApiResponse::Error { error } => panic!("unexpected error: {error}"),
        }
    }
}
