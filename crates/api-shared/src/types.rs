//! Request and response bodies of the REST API.
//!
//! Field names match the JSON consumed by the LIFF frontend, including the mixed-case
//! `LineUserId` and `liffId`.

use icu_core::{NormalizedWard, RiskLevelUpdate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Public settings for the LIFF frontend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConfigRes {
    #[serde(rename = "liffId")]
    pub liff_id: String,
}

/// Error envelope produced by this service. Upstream errors are forwarded in their own shape.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }
}

/// Body of the guarded endpoints that need nothing but the caller identity.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct StaffReq {
    #[serde(rename = "LineUserId")]
    pub line_user_id: Option<String>,
}

/// One ward in the `/icuStatus` response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WardStatusRes {
    pub ward_code: String,
    pub ward_name: String,
    pub total_beds: u32,
    pub patient_count: u32,
    /// Zero or more for wards with a capacity override; may be negative otherwise.
    pub available_beds: i64,
    pub high_risk: u32,
    pub medium_risk: u32,
    pub low_risk: u32,
}

impl From<NormalizedWard> for WardStatusRes {
    fn from(ward: NormalizedWard) -> Self {
        Self {
            ward_code: ward.ward_code,
            ward_name: ward.ward_name,
            total_beds: ward.total_beds,
            patient_count: ward.patient_count,
            available_beds: ward.available_beds,
            high_risk: ward.high_risk,
            medium_risk: ward.medium_risk,
            low_risk: ward.low_risk,
        }
    }
}

/// Body of `POST /icuBedRiskUpdate`.
///
/// Fields are kept loose so that a missing or mistyped field produces a message naming it
/// instead of a generic decode failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct RiskUpdateReq {
    #[serde(rename = "LineUserId", default)]
    pub line_user_id: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<String>, example = "41")]
    pub ward_code: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub high_risk: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub medium_risk: Option<Value>,
    #[serde(default)]
    #[schema(value_type = Option<u32>)]
    pub low_risk: Option<Value>,
}

impl RiskUpdateReq {
    /// Validate the body and keep only the columns the risk database accepts.
    ///
    /// # Errors
    ///
    /// Returns the message for the first invalid field, in the order `ward_code`, `high_risk`,
    /// `medium_risk`, `low_risk`.
    pub fn into_update(self) -> Result<RiskLevelUpdate, String> {
        let ward_code = match self.ward_code {
            Some(Value::String(code)) if !code.trim().is_empty() => code,
            Some(Value::Number(code)) if code.is_u64() => code.to_string(),
            Some(Value::Null) | None => return Err("Missing ward_code".into()),
            Some(Value::String(_)) => return Err("Missing ward_code".into()),
            Some(_) => return Err("ward_code must be a string".into()),
        };

        Ok(RiskLevelUpdate {
            ward_code,
            high_risk: count_field("high_risk", self.high_risk)?,
            medium_risk: count_field("medium_risk", self.medium_risk)?,
            low_risk: count_field("low_risk", self.low_risk)?,
        })
    }
}

fn count_field(name: &str, value: Option<Value>) -> Result<u32, String> {
    match value {
        None | Some(Value::Null) => Err(format!("Missing {name}")),
        Some(v) => v
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| format!("{name} must be a non-negative integer")),
    }
}
