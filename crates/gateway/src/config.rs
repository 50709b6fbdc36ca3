//! Upstream endpoint configuration.
//!
//! Variable names follow the deployed `.env` files, including the mixed-case `HOSxP_API_URL`.

use std::time::Duration;
use url::Url;

/// Default per-request timeout for upstream calls.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

pub const HOSXP_API_URL_VAR: &str = "HOSxP_API_URL";
pub const HOSXP_API_KEY_VAR: &str = "HOSXP_API_KEY";
pub const ICU_API_URL_VAR: &str = "ICU_API_URL";
pub const ICU_API_KEY_VAR: &str = "ICU_API_KEY";
pub const USERDB_API_URL_VAR: &str = "USERDB_API_URL";
pub const USER_DB_API_KEY_VAR: &str = "USER_DB_API_KEY";
pub const UPSTREAM_TIMEOUT_VAR: &str = "UPSTREAM_TIMEOUT_SECS";

/// Variables that must be set for the upstream clients to be built.
pub const UPSTREAM_ENV_VARS: [&str; 6] = [
    HOSXP_API_URL_VAR,
    HOSXP_API_KEY_VAR,
    ICU_API_URL_VAR,
    ICU_API_KEY_VAR,
    USERDB_API_URL_VAR,
    USER_DB_API_KEY_VAR,
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variables: {}", .0.join(", "))]
    MissingVars(Vec<String>),
    #[error("invalid URL for {name}: {source}")]
    InvalidUrl {
        name: String,
        #[source]
        source: url::ParseError,
    },
    #[error("API key for {0} cannot be empty")]
    EmptyApiKey(String),
    #[error("invalid upstream timeout: {0}")]
    InvalidTimeout(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),
}

/// Base URL and bearer key of one upstream service.
#[derive(Clone)]
pub struct ServiceEndpoint {
    base_url: Url,
    api_key: String,
}

impl std::fmt::Debug for ServiceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceEndpoint")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl ServiceEndpoint {
    /// Create an endpoint; `name` is used in error messages only.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidUrl` if `base_url` does not parse and
    /// `ConfigError::EmptyApiKey` if `api_key` is blank.
    pub fn new(name: &str, base_url: &str, api_key: &str) -> Result<Self, ConfigError> {
        let base_url = Url::parse(base_url.trim()).map_err(|source| ConfigError::InvalidUrl {
            name: name.to_string(),
            source,
        })?;
        if api_key.trim().is_empty() {
            return Err(ConfigError::EmptyApiKey(name.to_string()));
        }

        Ok(Self {
            base_url,
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Resolve an absolute path (`/icuBedStatus`) against the base URL.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

/// Endpoints of every upstream service plus the shared request timeout.
#[derive(Clone, Debug)]
pub struct UpstreamConfig {
    pub hosxp: ServiceEndpoint,
    pub icu_db: ServiceEndpoint,
    pub user_db: ServiceEndpoint,
    pub timeout: Duration,
}

impl UpstreamConfig {
    /// Build the configuration from a variable lookup (normally `std::env::var`).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVars` naming every unset or blank variable, or the first
    /// endpoint/timeout validation error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing = missing_vars(&lookup, &UPSTREAM_ENV_VARS);
        if !missing.is_empty() {
            return Err(ConfigError::MissingVars(missing));
        }

        let endpoint = |name: &str, url_var: &str, key_var: &str| {
            ServiceEndpoint::new(
                name,
                &lookup(url_var).unwrap_or_default(),
                &lookup(key_var).unwrap_or_default(),
            )
        };

        Ok(Self {
            hosxp: endpoint("hosxp-api", HOSXP_API_URL_VAR, HOSXP_API_KEY_VAR)?,
            icu_db: endpoint("icu-db-api", ICU_API_URL_VAR, ICU_API_KEY_VAR)?,
            user_db: endpoint("user-db-api", USERDB_API_URL_VAR, USER_DB_API_KEY_VAR)?,
            timeout: timeout_from_env_value(lookup(UPSTREAM_TIMEOUT_VAR))?,
        })
    }
}

/// Names from `names` whose value is unset or blank, in the given order.
pub fn missing_vars<F>(lookup: &F, names: &[&str]) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    names
        .iter()
        .copied()
        .filter(|&name| lookup(name).map_or(true, |v| v.trim().is_empty()))
        .map(|name| name.to_string())
        .collect()
}

/// Parse the upstream timeout (whole seconds) from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_UPSTREAM_TIMEOUT`].
pub fn timeout_from_env_value(value: Option<String>) -> Result<Duration, ConfigError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_UPSTREAM_TIMEOUT),
        Some(v) => match v.parse::<u64>() {
            Ok(0) => Err(ConfigError::InvalidTimeout(
                "must be at least one second".into(),
            )),
            Ok(secs) => Ok(Duration::from_secs(secs)),
            Err(_) => Err(ConfigError::InvalidTimeout(format!(
                "must be a whole number of seconds, got '{v}'"
            ))),
        },
    }
}
