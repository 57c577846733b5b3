// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod api;
pub mod conditions;
pub mod confidence;
pub mod config;
pub mod engine;
pub mod explain;
pub mod grade;
pub mod history;
pub mod metrics;
pub mod nutrients;
pub mod result;
pub mod scoring;

// ---- Re-exports for stable public API ----
pub use crate::api::create_router;
pub use crate::confidence::{ConfidenceLabel, DataConfidence};
pub use crate::config::ScoringProfile;
pub use crate::engine::{score, score_with_breakdown, HealthScoreEngine};
pub use crate::grade::{Grade, NovaGroup};
pub use crate::nutrients::{Nutrient, NutrientSnapshot};
pub use crate::result::{HealthScoreResult, ScoreFactor};
