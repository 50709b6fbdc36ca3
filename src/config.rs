//! Server configuration, read once from the environment at startup.

use icu_core::config::{capacity_overrides_from_env_value, risk_sync_from_env_value};
use icu_core::CoreConfig;
use icu_gateway::config::{
    HOSXP_API_KEY_VAR, HOSXP_API_URL_VAR, ICU_API_KEY_VAR, ICU_API_URL_VAR, USERDB_API_URL_VAR,
    USER_DB_API_KEY_VAR,
};
use icu_gateway::{missing_vars, UpstreamConfig};

pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// Variables the server refuses to start without.
pub const REQUIRED_ENV_VARS: [&str; 8] = [
    "PORT",
    HOSXP_API_KEY_VAR,
    ICU_API_KEY_VAR,
    USER_DB_API_KEY_VAR,
    HOSXP_API_URL_VAR,
    USERDB_API_URL_VAR,
    ICU_API_URL_VAR,
    "LIFF_ID",
];

#[derive(Debug)]
pub struct AppConfig {
    pub bind_addr: String,
    pub liff_id: String,
    pub upstream: UpstreamConfig,
    pub core: CoreConfig,
}

impl AppConfig {
    /// Resolve the configuration through `lookup` (normally `std::env::var`).
    ///
    /// # Errors
    ///
    /// Fails listing every missing required variable at once, or on the first invalid value.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = missing_vars(&lookup, &REQUIRED_ENV_VARS);
        if !missing.is_empty() {
            anyhow::bail!(
                "Missing required environment variables: {}",
                missing.join(", ")
            );
        }

        let port_value = lookup("PORT").unwrap_or_default();
        let port: u16 = port_value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a port number, got '{port_value}'"))?;
        let host = lookup("ICU_BIND_HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_HOST.into());

        let core = CoreConfig::new(
            capacity_overrides_from_env_value(lookup("ICU_BED_OVERRIDES"))?,
            risk_sync_from_env_value(lookup("ICU_RISK_SYNC"))?,
        );

        Ok(Self {
            bind_addr: format!("{host}:{port}"),
            liff_id: lookup("LIFF_ID").unwrap_or_default().trim().to_string(),
            upstream: UpstreamConfig::from_lookup(&lookup)?,
            core,
        })
    }
}
