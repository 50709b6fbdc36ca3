//! # ICU Gateway
//!
//! HTTP access to the internal data services used by the ICU backend.
//!
//! Handles:
//! - `hosxp-api`: ICU bed occupancy and active-doctor checks
//! - `icu-db-api`: ward risk-tier counts (read and update)
//! - `user-db-api`: LINE user to license lookups
//!
//! Every service is called with `POST` and a JSON body, authorised by a bearer key. Responses are
//! classified into the `icu-core` upstream error model so callers can forward them unchanged.

#![warn(rust_2018_idioms)]

pub mod client;
pub mod config;
pub mod directory;
pub mod hosxp;
pub mod icu_db;
pub mod user_db;

pub use client::UpstreamClient;
pub use config::{
    missing_vars, ConfigError, ServiceEndpoint, UpstreamConfig, UPSTREAM_ENV_VARS,
};
pub use directory::HttpStaffDirectory;
pub use hosxp::HosxpClient;
pub use icu_db::IcuDbClient;
pub use user_db::UserDbClient;

/// Clients for every upstream service, sharing one connection pool.
#[derive(Clone, Debug)]
pub struct Gateway {
    pub hosxp: HosxpClient,
    pub icu_db: IcuDbClient,
    pub user_db: UserDbClient,
}

impl Gateway {
    /// Build all clients from `cfg`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the TLS backend cannot be initialised.
    pub fn new(cfg: &UpstreamConfig) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            hosxp: HosxpClient::new(UpstreamClient::new(
                http.clone(),
                hosxp::SERVICE,
                cfg.hosxp.clone(),
            )),
            icu_db: IcuDbClient::new(UpstreamClient::new(
                http.clone(),
                icu_db::SERVICE,
                cfg.icu_db.clone(),
            )),
            user_db: UserDbClient::new(UpstreamClient::new(
                http,
                user_db::SERVICE,
                cfg.user_db.clone(),
            )),
        })
    }

    pub fn staff_directory(&self) -> HttpStaffDirectory {
        HttpStaffDirectory::new(self.user_db.clone(), self.hosxp.clone())
    }
}
