use crate::types::ErrorBody;
use icu_core::{StaffDirectory, StaffProfile, UpstreamError, UpstreamReply};
use serde_json::json;

pub const MISSING_LINE_USER_ID_MESSAGE: &str = "Missing Parameter: LineUserId";
pub const INCOMPLETE_PROFILE_MESSAGE: &str = "Unauthorized: User profile incomplete.";
pub const INACTIVE_LICENSE_MESSAGE: &str = "Access Denied: User is not active in Hospital System.";
pub const AUTH_UNAVAILABLE_MESSAGE: &str = "Authentication Service Unavailable";

/// Reasons a caller is refused access to the ward endpoints.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("request has no LineUserId")]
    MissingLineUserId,
    /// The user database refused or failed the lookup; its answer is forwarded.
    #[error("user lookup failed: {0}")]
    Lookup(UpstreamError),
    #[error("user profile has no license_id")]
    IncompleteProfile,
    #[error("license {0} is not active")]
    InactiveLicense(String),
    #[error("active-user check unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Status and body to send back.
    pub fn reply(&self) -> UpstreamReply {
        match self {
            Self::MissingLineUserId => error_reply(400, MISSING_LINE_USER_ID_MESSAGE),
            Self::Lookup(e) => e.reply(),
            Self::IncompleteProfile => error_reply(401, INCOMPLETE_PROFILE_MESSAGE),
            Self::InactiveLicense(_) => error_reply(403, INACTIVE_LICENSE_MESSAGE),
            Self::ServiceUnavailable(_) => error_reply(503, AUTH_UNAVAILABLE_MESSAGE),
        }
    }
}

fn error_reply(status: u16, message: &str) -> UpstreamReply {
    UpstreamReply::new(status, json!(ErrorBody::new(message)))
}

/// Confirm that `line_user_id` belongs to a registered, currently active doctor.
///
/// The LINE id is resolved to a license through the user database, then the license is checked
/// against HOSxP.
///
/// # Errors
///
/// Returns an `AuthError` describing the first check that failed.
pub async fn verify_line_user(
    directory: &dyn StaffDirectory,
    line_user_id: Option<&str>,
) -> Result<StaffProfile, AuthError> {
    let line_user_id = line_user_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(AuthError::MissingLineUserId)?;

    let profile = match directory.find_by_line_user_id(line_user_id).await {
        Ok(profile) => profile,
        // A 2xx answer that is not a profile carries no license.
        Err(UpstreamError::Malformed { .. }) => StaffProfile::default(),
        Err(e) => {
            tracing::warn!(line_user_id, error = %e, "staff lookup failed");
            return Err(AuthError::Lookup(e));
        }
    };

    let Some(license_id) = profile.license_id.clone() else {
        tracing::warn!(line_user_id, "staff profile has no license");
        return Err(AuthError::IncompleteProfile);
    };

    match directory.check_active_license(&license_id).await {
        Ok(()) => Ok(profile),
        Err(UpstreamError::Unavailable { details, .. }) => {
            tracing::error!(line_user_id, %details, "active-user check unavailable");
            Err(AuthError::ServiceUnavailable(details))
        }
        Err(e) => {
            tracing::warn!(line_user_id, %license_id, error = %e, "license is not active");
            Err(AuthError::InactiveLicense(license_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use icu_core::UpstreamResult;
    use serde_json::Value;

    /// One registered user per variant of the checks.
    struct FakeDirectory {
        hosxp_down: bool,
    }

    #[async_trait]
    impl StaffDirectory for FakeDirectory {
        async fn find_by_line_user_id(&self, line_user_id: &str) -> UpstreamResult<StaffProfile> {
            let license = match line_user_id {
                "U-active" => Some("111"),
                "U-retired" => Some("222"),
                "U-nolicense" => None,
                "U-garbled" => {
                    return Err(UpstreamError::Malformed {
                        service: "user-db-api",
                        details: "expected value".into(),
                    })
                }
                "U-dbdown" => {
                    return Err(UpstreamError::Unavailable {
                        service: "user-db-api",
                        details: "connection refused".into(),
                    })
                }
                _ => {
                    return Err(UpstreamError::Rejected {
                        service: "user-db-api",
                        status: 404,
                        body: json!({ "error": "User not found." }),
                    })
                }
            };
            Ok(StaffProfile {
                license_id: license.map(String::from),
                line_user_id: Some(line_user_id.to_string()),
            })
        }

        async fn check_active_license(&self, license_id: &str) -> UpstreamResult<()> {
            if self.hosxp_down {
                return Err(UpstreamError::Unavailable {
                    service: "hosxp-api",
                    details: "timed out".into(),
                });
            }
            if license_id == "111" {
                Ok(())
            } else {
                Err(UpstreamError::Rejected {
                    service: "hosxp-api",
                    status: 403,
                    body: json!({ "error": "User is not active", "status": false }),
                })
            }
        }
    }

    const UP: FakeDirectory = FakeDirectory { hosxp_down: false };

    fn error_of(reply: &UpstreamReply) -> &Value {
        &reply.body["error"]
    }

    #[tokio::test]
    async fn active_doctor_passes() {
        let profile = verify_line_user(&UP, Some("U-active"))
            .await
            .expect("should verify");
        assert_eq!(profile.license_id.as_deref(), Some("111"));
    }

    #[tokio::test]
    async fn missing_or_blank_id_is_400() {
        for id in [None, Some(""), Some("   ")] {
            let reply = verify_line_user(&UP, id).await.unwrap_err().reply();
            assert_eq!(reply.status, 400);
            assert_eq!(error_of(&reply), MISSING_LINE_USER_ID_MESSAGE);
        }
    }

    #[tokio::test]
    async fn unknown_user_forwards_lookup_reply() {
        let reply = verify_line_user(&UP, Some("U-stranger"))
            .await
            .unwrap_err()
            .reply();
        assert_eq!(reply, UpstreamReply::new(404, json!({ "error": "User not found." })));
    }

    #[tokio::test]
    async fn user_db_outage_is_503_envelope() {
        let reply = verify_line_user(&UP, Some("U-dbdown"))
            .await
            .unwrap_err()
            .reply();
        assert_eq!(reply.status, 503);
        assert_eq!(error_of(&reply), "Upstream service unavailable");
    }

    #[tokio::test]
    async fn profile_without_license_is_401() {
        for id in ["U-nolicense", "U-garbled"] {
            let reply = verify_line_user(&UP, Some(id)).await.unwrap_err().reply();
            assert_eq!(reply.status, 401);
            assert_eq!(error_of(&reply), INCOMPLETE_PROFILE_MESSAGE);
        }
    }

    #[tokio::test]
    async fn inactive_license_is_403() {
        let err = verify_line_user(&UP, Some("U-retired")).await.unwrap_err();
        assert!(matches!(err, AuthError::InactiveLicense(ref l) if l == "222"));
        let reply = err.reply();
        assert_eq!(reply.status, 403);
        assert_eq!(error_of(&reply), INACTIVE_LICENSE_MESSAGE);
    }

    #[tokio::test]
    async fn hosxp_outage_is_503() {
        let down = FakeDirectory { hosxp_down: true };
        let reply = verify_line_user(&down, Some("U-active"))
            .await
            .unwrap_err()
            .reply();
        assert_eq!(reply.status, 503);
        assert_eq!(error_of(&reply), AUTH_UNAVAILABLE_MESSAGE);
    }
}
