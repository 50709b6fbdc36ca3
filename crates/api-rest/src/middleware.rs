use crate::error::ApiError;
use crate::AppState;
use api_shared::{verify_line_user, StaffReq};
use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use std::error::Error as _;

/// Upper bound on a buffered request body.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Staff verification for the ward endpoints.
///
/// The caller is identified by `LineUserId` in the JSON body, so the body is buffered, inspected
/// and put back for the handler. On success the verified `StaffProfile` is added to the request
/// extensions.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_limit(&e) => {
            tracing::warn!("Request body over {} bytes rejected", MAX_BODY_BYTES);
            return ApiError::PayloadTooLarge.into_response();
        }
        Err(e) => {
            tracing::error!("Failed to read request body: {}", e);
            return ApiError::Internal.into_response();
        }
    };

    let line_user_id = serde_json::from_slice::<StaffReq>(&bytes)
        .ok()
        .and_then(|r| r.line_user_id);

    match verify_line_user(state.staff.as_ref(), line_user_id.as_deref()).await {
        Ok(profile) => {
            let mut req = Request::from_parts(parts, Body::from(bytes));
            req.extensions_mut().insert(profile);
            next.run(req).await
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = err.source();
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
