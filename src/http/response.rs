//! Response mapping for failed route handlers.
//!
//! # Design Decisions
//! - Handler and adapter failures surface as 500 Internal Server Error
//! - Error details are logged, not sent to the client

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::routing::HandlerError;

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Route handler failed");
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}
