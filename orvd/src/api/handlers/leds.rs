//! Onboard status LED endpoints

use crate::api::error::ApiError;
use crate::api::models::{ApiResponse, LedSetResponse};
use crate::api::AppState;
use crate::{api_fail, api_ok};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use orv_core::OnboardLed;
use serde::Deserialize;
use tracing::debug;

/// Query parameters for the LED set endpoint.
#[derive(Deserialize)]
pub(crate) struct LedControlQuery {
    pub on: Option<bool>,
}

/// Switches one of the PCB status LEDs.
///
/// # Endpoint
///
/// `GET /api/v0/led/{led}/set?on=true`
pub(crate) async fn set_led(
    State(state): State<AppState>,
    Path(led): Path<String>,
    Query(params): Query<LedControlQuery>,
) -> Result<Json<ApiResponse<LedSetResponse>>, ApiError> {
    debug!("Request: GET /api/v0/led/{}/set", led);

    let led: OnboardLed = led
        .parse()
        .map_err(|e: orv_core::OrvError| ApiError::bad_request(e.to_string()))?;

    let Some(on) = params.on else {
        return api_fail!("Missing 'on' parameter");
    };

    let commands = state.interface.set_onboard_led(led, on)?;

    api_ok!(LedSetResponse { led, on, commands })
}
