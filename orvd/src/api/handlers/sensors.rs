//! Temperature reading endpoints

use crate::api::error::ApiError;
use crate::api::models::{ApiResponse, TemperatureResponse};
use crate::api::AppState;
use crate::api_ok;
use axum::{
    extract::{Path, State},
    Json,
};
use orv_core::RackLocation;
use tracing::debug;

/// Reads every temperature sensor configured at a rack location.
///
/// The core returns one reading per sensor with failed reads as `null`; the
/// average here covers only the readings that are present. Averaging lives
/// in this layer deliberately: the hardware interface does not aggregate.
///
/// # Endpoint
///
/// `GET /api/v0/temperature/{location}`
pub(crate) async fn get_temperatures(
    State(state): State<AppState>,
    Path(location): Path<String>,
) -> Result<Json<ApiResponse<TemperatureResponse>>, ApiError> {
    debug!("Request: GET /api/v0/temperature/{}", location);

    let location: RackLocation = location
        .parse()
        .map_err(|e: orv_core::OrvError| ApiError::bad_request(e.to_string()))?;

    let readings = state.interface.read_temperatures(location)?;

    let present: Vec<f64> = readings.iter().filter_map(|r| *r).collect();
    let average = if present.is_empty() {
        None
    } else {
        Some(present.iter().sum::<f64>() / present.len() as f64)
    };

    api_ok!(TemperatureResponse {
        location,
        readings,
        average,
    })
}
