use api_shared::{AuthError, ErrorBody};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use icu_core::{UpstreamError, UpstreamReply};
use std::any::Any;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";
pub const PAYLOAD_TOO_LARGE_MESSAGE: &str = "Request entity too large";

/// Failure of a REST handler or middleware.
#[derive(Debug)]
pub enum ApiError {
    /// Request body failed validation; the message names the field.
    BadRequest(String),
    /// Status and body decided elsewhere (upstream or staff verification), sent unchanged.
    Reply(UpstreamReply),
    PayloadTooLarge,
    Internal,
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        Self::Reply(err.into_reply())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Reply(err.reply())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new(message))).into_response()
            }
            Self::Reply(reply) => reply_response(reply),
            Self::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorBody::new(PAYLOAD_TOO_LARGE_MESSAGE)),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody::new(INTERNAL_ERROR_MESSAGE)),
            )
                .into_response(),
        }
    }
}

/// Turn an upstream status/body pair into a response.
pub fn reply_response(reply: UpstreamReply) -> Response {
    let status = StatusCode::from_u16(reply.status).unwrap_or(StatusCode::BAD_GATEWAY);
    (status, Json(reply.body)).into_response()
}

/// Response for a handler that panicked.
pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("request handler panicked");
    ApiError::Internal.into_response()
}
