//! Health score service binary entrypoint.
//! Boots the Axum HTTP server, wiring routes, shared state, and metrics.

use nutri_health_score::{api, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - HEALTH_SCORE_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("HEALTH_SCORE_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("health_score=debug,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    // This enables HEALTH_SCORE_PROFILE_PATH from .env.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let state = api::AppState::from_env()?;
    let metrics = Metrics::init()?;
    info!("health score service ready");

    let router = api::create_router(state).merge(metrics.router());
    Ok(router.into())
}
