use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tracing::debug;

use crate::conditions::{condition_warnings, HealthCondition, HealthWarning};
use crate::config::{HotReloadProfile, ScoringProfile};
use crate::engine::HealthScoreEngine;
use crate::history::{HistorySummary, ScanHistory, ScanRecord};
use crate::metrics::record_score;
use crate::nutrients::{parse_number, NutrientSnapshot};
use crate::result::HealthScoreResult;

const HISTORY_CAPACITY: usize = 2000;
const DEFAULT_HISTORY_LIMIT: usize = 20;
const DEFAULT_SUMMARY_HOURS: i64 = 7 * 24;

#[derive(Clone)]
pub struct AppState {
    profile: Arc<HotReloadProfile>,
    history: Arc<ScanHistory>,
}

impl AppState {
    pub fn new(profile: HotReloadProfile, history: ScanHistory) -> Self {
        Self {
            profile: Arc::new(profile),
            history: Arc::new(history),
        }
    }

    /// Profile resolved like [`ScoringProfile::load_default`], default history capacity.
    /// Fails when `$HEALTH_SCORE_PROFILE_PATH` names a missing file.
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(
            HotReloadProfile::from_env()?,
            ScanHistory::with_capacity(HISTORY_CAPACITY),
        ))
    }

    pub fn history(&self) -> &ScanHistory {
        &self.history
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/score", post(score))
        .route("/history", get(history))
        .route("/history/summary", get(history_summary))
        .route("/debug/profile", get(debug_profile))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct ScoreReq {
    #[serde(default)]
    nutrients: NutrientSnapshot,
    #[serde(default)]
    official_grade: Option<String>,
    /// Integer or numeric string; anything else is ignored.
    #[serde(default)]
    nova_group: Option<Value>,
    #[serde(default)]
    product: Option<String>,
    #[serde(default)]
    conditions: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ScoreResp {
    result: HealthScoreResult,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<HealthWarning>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn bad_request(msg: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody { error: msg.into() }),
    )
}

async fn score(
    State(state): State<AppState>,
    Json(body): Json<ScoreReq>,
) -> Result<Json<ScoreResp>, ApiError> {
    let conditions = parse_conditions(&body.conditions)?;
    let nova = body
        .nova_group
        .as_ref()
        .and_then(parse_number)
        .filter(|n| n.fract() == 0.0)
        .map(|n| n as i64);

    let engine = HealthScoreEngine::from_shared(state.profile.current());
    let result = engine.score_with_breakdown(&body.nutrients, body.official_grade.as_deref(), nova);
    let warnings = condition_warnings(&body.nutrients, &conditions);

    let rec = state.history.record(body.product.as_deref(), &result);
    record_score(&result);
    debug!(
        target: "health_score",
        product = %rec.product_id,
        score = result.score,
        official = result.is_official,
        warnings = warnings.len(),
        "scored product"
    );

    Ok(Json(ScoreResp { result, warnings }))
}

fn parse_conditions(raw: &[String]) -> Result<Vec<HealthCondition>, ApiError> {
    raw.iter()
        .map(|c| {
            HealthCondition::parse(c).ok_or_else(|| bad_request(format!("unknown condition: {c}")))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<usize>,
}

async fn history(
    State(state): State<AppState>,
    Query(q): Query<HistoryQuery>,
) -> Json<Vec<ScanRecord>> {
    let limit = q.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    Json(state.history.snapshot_last_n(limit))
}

#[derive(Debug, Deserialize)]
struct SummaryQuery {
    window_hours: Option<i64>,
}

async fn history_summary(
    State(state): State<AppState>,
    Query(q): Query<SummaryQuery>,
) -> Result<Json<HistorySummary>, ApiError> {
    let hours = q.window_hours.unwrap_or(DEFAULT_SUMMARY_HOURS);
    if hours <= 0 {
        return Err(bad_request("window_hours must be positive"));
    }
    let window = Duration::try_hours(hours).ok_or_else(|| bad_request("window_hours too large"))?;
    Ok(Json(state.history.summary(window, Utc::now())))
}

async fn debug_profile(State(state): State<AppState>) -> Json<ScoringProfile> {
    Json(state.profile.current().as_ref().clone())
}
