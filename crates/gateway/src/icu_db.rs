//! Client for `icu-db-api`, the store of ward risk-tier counts.

use crate::client::UpstreamClient;
use async_trait::async_trait;
use icu_core::{RiskLevelProvider, RiskLevelUpdate, UpstreamReply, UpstreamResult, WardRiskRecord};

pub const SERVICE: &str = "icu-db-api";

const RISK_LEVELS_PATH: &str = "/icuBedRisk";
const RISK_UPDATE_PATH: &str = "/icuBedRiskUpdate";

#[derive(Clone, Debug)]
pub struct IcuDbClient {
    client: UpstreamClient,
}

impl IcuDbClient {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RiskLevelProvider for IcuDbClient {
    async fn fetch_risk_levels(&self) -> UpstreamResult<Vec<WardRiskRecord>> {
        self.client.fetch_list(RISK_LEVELS_PATH).await
    }

    async fn update_risk_level(&self, update: &RiskLevelUpdate) -> UpstreamResult<UpstreamReply> {
        // RiskLevelUpdate serialises to exactly the four columns the endpoint accepts.
        self.client.post_json(RISK_UPDATE_PATH, update).await
    }
}
