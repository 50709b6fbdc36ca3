use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use icu_core::WardStatusService;
use icu_gateway::Gateway;

mod config;

use config::AppConfig;

/// Main entry point for the ICU ward status server
///
/// Serves the REST API (with OpenAPI/Swagger UI) on `ICU_BIND_HOST:PORT`.
///
/// # Environment Variables
/// - `PORT`, `LIFF_ID`: listening port and LINE LIFF id for the frontend
/// - `HOSxP_API_URL` / `HOSXP_API_KEY`: hospital database API
/// - `ICU_API_URL` / `ICU_API_KEY`: risk database API
/// - `USERDB_API_URL` / `USER_DB_API_KEY`: LINE user link table API
/// - `ICU_BIND_HOST`: listening address (default: "0.0.0.0")
/// - `UPSTREAM_TIMEOUT_SECS`: per-call upstream timeout (default: 10)
/// - `ICU_BED_OVERRIDES`: `code:beds,...` capacity corrections (default: built-in table)
/// - `ICU_RISK_SYNC`: write balanced risk counts back (default: true)
///
/// # Errors
/// Returns an error if:
/// - a required variable is missing or any variable is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("icu_run=info".parse()?)
                .add_directive("icu_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("icu_gateway=info".parse()?)
                .add_directive("api_shared=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = AppConfig::from_lookup(|name| std::env::var(name).ok())?;

    let gateway = Gateway::new(&cfg.upstream)?;
    let status_service = WardStatusService::new(
        Arc::new(cfg.core),
        Arc::new(gateway.hosxp.clone()),
        Arc::new(gateway.icu_db.clone()),
    );

    let state = AppState {
        status_service,
        staff: Arc::new(gateway.staff_directory()),
        liff_id: cfg.liff_id,
    };

    tracing::info!("++ Starting ICU backend on {}", cfg.bind_addr);

    let listener = tokio::net::TcpListener::bind(&cfg.bind_addr).await?;
    axum::serve(listener, api_rest::router(state)).await?;

    Ok(())
}
