//! Fan control endpoints

use crate::api::error::ApiError;
use crate::api::models::{ApiResponse, FanSetResponse};
use crate::api::AppState;
use crate::{api_fail, api_ok};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use orv_core::RackLocation;
use serde::Deserialize;
use tracing::debug;

/// Query parameters for the fan set endpoint.
#[derive(Deserialize)]
pub(crate) struct FanControlQuery {
    /// Drive power in the closed range [0, 1]; out-of-range values are
    /// rejected, never clamped
    pub power: Option<f64>,
}

/// Drives every fan configured at a rack location.
///
/// # Endpoint
///
/// `GET /api/v0/fan/{location}/set?power=0.5`
pub(crate) async fn set_fans(
    State(state): State<AppState>,
    Path(location): Path<String>,
    Query(params): Query<FanControlQuery>,
) -> Result<Json<ApiResponse<FanSetResponse>>, ApiError> {
    debug!("Request: GET /api/v0/fan/{}/set", location);

    let location: RackLocation = location
        .parse()
        .map_err(|e: orv_core::OrvError| ApiError::bad_request(e.to_string()))?;

    let Some(power) = params.power else {
        return api_fail!("Missing 'power' parameter");
    };

    let commands = state.interface.drive_fans(location, power)?;

    api_ok!(FanSetResponse {
        location,
        power,
        commands,
    })
}
