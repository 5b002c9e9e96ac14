//! # dialer-api -- Binary Entry Point
//!
//! Loads the JSON configuration named by `DIALER_CONFIG` (default
//! `conf.json`), applies environment overrides and serves the router.

use std::sync::Arc;

use dialer_ami::AmiClient;
use dialer_api::db::PgCdrStore;
use dialer_api::state::{AppConfig, AppState};
use dialer_core::DialerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let path = std::env::var("DIALER_CONFIG").unwrap_or_else(|_| "conf.json".to_string());
    let config = DialerConfig::load(&path).map_err(|e| {
        tracing::error!("Configuration load failed: {e}");
        e
    })?;
    tracing::info!(path = %path, agencies = config.agencies.len(), "configuration loaded");

    let app_config = AppConfig::from_env(&config);
    let port = app_config.port;

    // Optional: absent DATABASE_URL disables the CDR routes.
    let pool = dialer_api::db::init_pool(app_config.database_url.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("Database initialization failed: {e}");
            e
        })?;

    let ami_settings = config.ami.clone();
    let mut state = AppState::new(config, app_config)?;

    if let Some(pool) = pool {
        state = state.with_cdr_store(Arc::new(PgCdrStore::new(pool)));
    }

    match ami_settings {
        Some(settings) => {
            tracing::info!(host = %settings.host, port = settings.port, "AMI gateway configured");
            state = state.with_ami(Arc::new(AmiClient::new(settings)));
        }
        None => {
            tracing::warn!("AMI gateway not configured; AMI routes will answer with an error envelope");
        }
    }

    if state.app_config.signed_input {
        tracing::info!("AMI routes expect signed input");
    }

    let app = dialer_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("dialer listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `LOG_FORMAT=json` switches to JSON lines; `RUST_LOG` filters (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
