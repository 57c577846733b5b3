use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::result::HealthScoreResult;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and describe the scoring metrics.
    pub fn init() -> Result<Self> {
        // Use default buckets to avoid API differences across crate versions.
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_counter!(
            "health_score_requests_total",
            "Products scored through the HTTP API."
        );
        describe_counter!(
            "health_score_official_total",
            "Scores taken from an official Nutri-Score grade."
        );
        describe_histogram!("health_score_value", "Distribution of 0-100 health scores.");

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

/// Record one scored product. No-op until a recorder is installed.
pub fn record_score(result: &HealthScoreResult) {
    counter!("health_score_requests_total").increment(1);
    if result.is_official {
        counter!("health_score_official_total").increment(1);
    }
    histogram!("health_score_value").record(f64::from(result.score));
}
