//! Upstream data capabilities.
//!
//! The core never talks HTTP or SQL itself. Each upstream service is reached through one of
//! these traits; `icu-gateway` provides the HTTP implementations and tests use in-memory fakes.

use crate::error::{UpstreamReply, UpstreamResult};
use crate::ward::{RiskLevelUpdate, WardBedRecord, WardRiskRecord};
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

/// Source of per-ward bed occupancy (HOSxP).
#[async_trait]
pub trait BedStatusProvider: Send + Sync {
    async fn fetch_bed_status(&self) -> UpstreamResult<Vec<WardBedRecord>>;
}

/// Store of per-ward risk-tier counts (ICU database).
#[async_trait]
pub trait RiskLevelProvider: Send + Sync {
    async fn fetch_risk_levels(&self) -> UpstreamResult<Vec<WardRiskRecord>>;

    /// Overwrite the risk counts of one ward.
    ///
    /// A `2xx` answer is returned as `Ok` so callers can forward its status and body.
    async fn update_risk_level(&self, update: &RiskLevelUpdate) -> UpstreamResult<UpstreamReply>;
}

/// Staff registration as held in the user database.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    #[serde(default, deserialize_with = "deserialize_license_id")]
    pub license_id: Option<String>,
    #[serde(rename = "LineUserId", default)]
    pub line_user_id: Option<String>,
}

/// License numbers are stored as text but older rows come back as integers. Blank means unset.
fn deserialize_license_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum License {
        Text(String),
        Number(u64),
    }

    Ok(match Option::<License>::deserialize(deserializer)? {
        Some(License::Text(text)) if !text.trim().is_empty() => Some(text),
        Some(License::Number(number)) => Some(number.to_string()),
        _ => None,
    })
}

/// Lookup of registered staff and their employment status.
#[async_trait]
pub trait StaffDirectory: Send + Sync {
    /// Find the profile linked to a LINE user id (user database).
    async fn find_by_line_user_id(&self, line_user_id: &str) -> UpstreamResult<StaffProfile>;

    /// Check that a medical license belongs to an active doctor (HOSxP).
    ///
    /// Any non-`2xx` answer means the license is not active.
    async fn check_active_license(&self, license_id: &str) -> UpstreamResult<()>;
}
