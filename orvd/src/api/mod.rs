//! API module for the ORV daemon
//!
//! Contains the REST API implementation with Axum router and handlers.

pub(crate) mod handlers;
pub(crate) mod models;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use orv_core::{HardwarePlatform, PcbRevision};
use orv_hardware::HardwareInterface;
use std::sync::Arc;
use std::time::Instant;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

/// Application state shared across all handlers
#[derive(Clone)]
pub(crate) struct AppState {
    /// The resolved hardware interface, owned for the process lifetime
    pub interface: Arc<dyn HardwareInterface>,
    pub platform: HardwarePlatform,
    pub pcb_revision: PcbRevision,
    /// Server start time for uptime calculation
    pub start_time: Instant,
}

impl AppState {
    pub fn new(
        interface: Arc<dyn HardwareInterface>,
        platform: HardwarePlatform,
        pcb_revision: PcbRevision,
    ) -> Self {
        Self {
            interface,
            platform,
            pcb_revision,
            start_time: Instant::now(),
        }
    }
}

/// Create the main API router with all endpoints
pub(crate) fn create_router(state: AppState) -> Router {
    info!("Setting up API router...");

    let cors = CorsLayer::new()
        .allow_origin("*".parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(tower_http::cors::Any);

    let middleware_stack = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(DefaultBodyLimit::max(64 * 1024));

    Router::new()
        // Fan control
        .route("/api/v0/fan/:location/set", get(handlers::fans::set_fans))
        // Temperature readings
        .route(
            "/api/v0/temperature/:location",
            get(handlers::sensors::get_temperatures),
        )
        // Onboard status LEDs
        .route("/api/v0/led/:led/set", get(handlers::leds::set_led))
        // Introspection
        .route("/api/v0/locations", get(handlers::info::get_locations))
        .route("/api/v0/health", get(handlers::info::health))
        .route("/", get(handlers::info::root))
        .layer(middleware_stack)
        .with_state(state)
}

/// Error handling utilities
pub(crate) mod error {
    use super::models::ApiResponse;
    use axum::{
        http::StatusCode,
        response::{IntoResponse, Response},
        Json,
    };
    use orv_core::OrvError;
    use tracing::error;

    /// Custom error type for API responses
    #[derive(Debug)]
    pub struct ApiError {
        pub status_code: StatusCode,
        pub message: String,
    }

    impl ApiError {
        pub fn new(status_code: StatusCode, message: impl Into<String>) -> Self {
            Self {
                status_code,
                message: message.into(),
            }
        }

        pub fn bad_request(message: impl Into<String>) -> Self {
            Self::new(StatusCode::BAD_REQUEST, message)
        }

        pub fn internal_error(message: impl Into<String>) -> Self {
            Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
        }

        pub fn service_unavailable(message: impl Into<String>) -> Self {
            Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
        }
    }

    impl IntoResponse for ApiError {
        fn into_response(self) -> Response {
            error!("API Error {}: {}", self.status_code, self.message);

            let response: ApiResponse<()> = ApiResponse::error(self.message);

            (self.status_code, Json(response)).into_response()
        }
    }

    /// Map core errors onto HTTP status codes: caller mistakes are 400,
    /// hardware trouble is 503, anything else is a 500.
    impl From<OrvError> for ApiError {
        fn from(err: OrvError) -> Self {
            match err {
                OrvError::PowerOutOfRange(_)
                | OrvError::LocationNotConfigured { .. }
                | OrvError::Parse(_) => Self::bad_request(err.to_string()),
                OrvError::Hardware(_) | OrvError::Io(_) => {
                    Self::service_unavailable(err.to_string())
                }
                _ => Self::internal_error(err.to_string()),
            }
        }
    }
}

/// Helper macros for common responses
#[macro_export]
macro_rules! api_ok {
    ($data:expr) => {
        Ok(axum::Json($crate::api::models::ApiResponse::success($data)))
    };
}

#[macro_export]
macro_rules! api_fail {
    ($message:expr) => {
        Err($crate::api::error::ApiError::bad_request($message))
    };
}
