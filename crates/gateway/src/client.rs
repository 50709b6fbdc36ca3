//! Shared request/response handling for upstream services.

use crate::config::ServiceEndpoint;
use icu_core::{UpstreamError, UpstreamReply, UpstreamResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

/// JSON-over-POST client for one upstream service.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    service: &'static str,
    endpoint: ServiceEndpoint,
}

impl UpstreamClient {
    pub fn new(http: reqwest::Client, service: &'static str, endpoint: ServiceEndpoint) -> Self {
        Self {
            http,
            service,
            endpoint,
        }
    }

    /// POST `body` to `path` and classify the response.
    ///
    /// - no response (connect error, timeout) → `UpstreamError::Unavailable`
    /// - non-2xx → `UpstreamError::Rejected` carrying the JSON body, or `{}` if the body is not JSON
    /// - 2xx with a non-JSON body → `UpstreamError::Malformed`
    pub async fn post_json<B>(&self, path: &str, body: &B) -> UpstreamResult<UpstreamReply>
    where
        B: Serialize + ?Sized,
    {
        let url = self
            .endpoint
            .url_for(path)
            .map_err(|e| UpstreamError::Unavailable {
                service: self.service,
                details: format!("invalid endpoint path {path}: {e}"),
            })?;

        let response = self
            .http
            .post(url.clone())
            .bearer_auth(self.endpoint.api_key())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(service = self.service, url = %url, error = %e, "upstream request failed");
                UpstreamError::Unavailable {
                    service: self.service,
                    details: e.without_url().to_string(),
                }
            })?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await.map_err(|e| UpstreamError::Unavailable {
            service: self.service,
            details: e.without_url().to_string(),
        })?;

        if !(200..300).contains(&status) {
            let body = serde_json::from_slice::<Value>(&bytes).unwrap_or_else(|_| json!({}));
            tracing::debug!(service = self.service, status, "upstream rejected request");
            return Err(UpstreamError::Rejected {
                service: self.service,
                status,
                body,
            });
        }

        let body = serde_json::from_slice::<Value>(&bytes).map_err(|e| UpstreamError::Malformed {
            service: self.service,
            details: e.to_string(),
        })?;

        Ok(UpstreamReply::new(status, body))
    }

    /// POST an empty object to `path` and decode the answer as a list of records.
    pub async fn fetch_list<T>(&self, path: &str) -> UpstreamResult<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let reply = self.post_json(path, &json!({})).await?;
        serde_json::from_value(reply.body).map_err(|e| UpstreamError::Malformed {
            service: self.service,
            details: e.to_string(),
        })
    }
}
