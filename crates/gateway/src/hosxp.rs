//! Client for `hosxp-api`, the read-only view over the hospital database.

use crate::client::UpstreamClient;
use async_trait::async_trait;
use icu_core::{BedStatusProvider, UpstreamError, UpstreamResult, WardBedRecord};
use serde_json::json;

pub const SERVICE: &str = "hosxp-api";

const BED_STATUS_PATH: &str = "/icuBedStatus";
const CHECK_ACTIVE_USER_PATH: &str = "/checkActiveUser";

#[derive(Clone, Debug)]
pub struct HosxpClient {
    client: UpstreamClient,
}

impl HosxpClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }

    /// `Ok` when the license belongs to an active doctor; HOSxP answers `403` otherwise.
    pub async fn check_active_user(&self, license_id: &str) -> UpstreamResult<()> {
        match self
            .client
            .post_json(CHECK_ACTIVE_USER_PATH, &json!({ "license_id": license_id }))
            .await
        {
            // Only the status matters here.
            Ok(_) | Err(UpstreamError::Malformed { .. }) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl BedStatusProvider for HosxpClient {
    async fn fetch_bed_status(&self) -> UpstreamResult<Vec<WardBedRecord>> {
        self.client.fetch_list(BED_STATUS_PATH).await
    }
}
