//! Client for `user-db-api`, the LINE user to medical license link table.

use crate::client::UpstreamClient;
use icu_core::{StaffProfile, UpstreamError, UpstreamResult};
use serde_json::json;

pub const SERVICE: &str = "user-db-api";

const GET_USER_PATH: &str = "/getUser";

#[derive(Clone, Debug)]
pub struct UserDbClient {
    client: UpstreamClient,
}

impl UserDbClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// Look up the link row for a LINE user id. Unknown users come back as a `404` rejection.
    pub async fn get_user(&self, line_user_id: &str) -> UpstreamResult<StaffProfile> {
        let reply = self
            .client
            .post_json(GET_USER_PATH, &json!({ "LineUserId": line_user_id }))
            .await?;

        serde_json::from_value(reply.body).map_err(|e| UpstreamError::Malformed {
            service: SERVICE,
            details: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_support::{client_for, spawn_upstream};
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::Value;

    fn user_db_router() -> Router {
        Router::new().route(
            GET_USER_PATH,
            post(|Json(body): Json<Value>| async move {
                match body["LineUserId"].as_str() {
                    Some("U-known") => (
                        StatusCode::OK,
                        Json(json!({ "license_id": "12345", "LineUserId": "U-known" })),
                    ),
                    _ => (
                        StatusCode::NOT_FOUND,
                        Json(json!({ "error": "User not found." })),
                    ),
                }
            }),
        )
    }

    #[tokio::test]
    async fn known_user_returns_profile() {
        let users = UserDbClient::new(client_for(SERVICE, &spawn_upstream(user_db_router()).await));

        let profile = users.get_user("U-known").await.expect("should find user");
        assert_eq!(profile.license_id.as_deref(), Some("12345"));
        assert_eq!(profile.line_user_id.as_deref(), Some("U-known"));
    }

    #[tokio::test]
    async fn unknown_user_is_rejected_with_404() {
        let users = UserDbClient::new(client_for(SERVICE, &spawn_upstream(user_db_router()).await));

        let err = users.get_user("U-missing").await.expect_err("expected 404");
        assert!(matches!(err, UpstreamError::Rejected { status: 404, .. }));
    }
}
