use crate::error::{reply_response, ApiError};
use crate::AppState;
use api_shared::{ConfigRes, ErrorBody, HealthRes, HealthService, RiskUpdateReq, StaffReq, WardStatusRes};
use axum::body::Bytes;
use axum::extract::{Extension, State};
use axum::response::{Json, Response};
use icu_core::StaffProfile;

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Used by the reverse proxy and uptime monitoring. Does not call any upstream.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/config",
    responses(
        (status = 200, description = "Public frontend settings", body = ConfigRes)
    )
)]
/// LIFF id the frontend needs before it can log the user in.
#[axum::debug_handler]
pub async fn config(State(state): State<AppState>) -> Json<ConfigRes> {
    Json(ConfigRes {
        liff_id: state.liff_id.clone(),
    })
}

#[utoipa::path(
    post,
    path = "/icuStatus",
    request_body = StaffReq,
    responses(
        (status = 200, description = "Normalized status of every ICU/VIP ward", body = [WardStatusRes]),
        (status = 400, description = "LineUserId missing", body = ErrorBody),
        (status = 401, description = "User profile incomplete", body = ErrorBody),
        (status = 403, description = "User is not an active doctor", body = ErrorBody),
        (status = 502, description = "Upstream returned an unreadable body", body = ErrorBody),
        (status = 503, description = "Upstream service unavailable", body = ErrorBody)
    )
)]
/// Ward bed occupancy merged with balanced risk counts
///
/// Bed status and risk levels are fetched together. If either upstream fails its status and body
/// are returned unchanged. Otherwise the wards are merged, capacity overrides applied and risk
/// counts balanced against the patient count.
///
/// The balanced counts are written back to the risk database in the background after the
/// response is produced. Write-back failures are only logged.
///
/// # Errors
/// Returns the failing upstream's status and body.
#[axum::debug_handler]
pub async fn icu_status(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffProfile>,
) -> Result<Json<Vec<WardStatusRes>>, ApiError> {
    let wards = match state.status_service.ward_status().await {
        Ok(wards) => wards,
        Err(e) => {
            tracing::warn!(service = e.service(), "ICU status fetch failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        license_id = staff.license_id.as_deref().unwrap_or_default(),
        wards = wards.len(),
        "ICU status served"
    );

    if let Some(sync) = state.status_service.spawn_risk_sync(&wards) {
        // Detached: the response does not wait for the write-back.
        drop(sync);
    }

    Ok(Json(wards.into_iter().map(WardStatusRes::from).collect()))
}

#[utoipa::path(
    post,
    path = "/icuBedRiskUpdate",
    request_body = RiskUpdateReq,
    responses(
        (status = 200, description = "Risk database reply, forwarded"),
        (status = 400, description = "Missing or invalid field", body = ErrorBody),
        (status = 401, description = "User profile incomplete", body = ErrorBody),
        (status = 403, description = "User is not an active doctor", body = ErrorBody),
        (status = 503, description = "Upstream service unavailable", body = ErrorBody)
    )
)]
/// Manually set the risk counts of one ward
///
/// Only `ward_code`, `high_risk`, `medium_risk` and `low_risk` are sent to the risk database.
/// Its status and body are returned as-is, successful or not.
///
/// # Errors
/// Returns `400 Bad Request` naming the first missing or invalid field.
#[axum::debug_handler]
pub async fn update_risk_level(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let req: RiskUpdateReq = serde_json::from_slice(&body)
        .map_err(|_| ApiError::BadRequest("Invalid JSON body".into()))?;
    let update = req.into_update().map_err(ApiError::BadRequest)?;

    match state.status_service.update_risk_level(&update).await {
        Ok(reply) => {
            tracing::info!(ward_code = %update.ward_code, "risk level updated");
            Ok(reply_response(reply))
        }
        Err(e) => {
            tracing::warn!(ward_code = %update.ward_code, "risk level update failed: {}", e);
            Err(e.into())
        }
    }
}
