//! # Health Score Engine
//! Pure, testable logic that maps `(nutrients, official grade?, NOVA group?)` →
//! `HealthScoreResult`. No I/O and no retained state; safe to share across threads.
//!
//! Policy: an official A–E letter always wins and maps to a fixed score. Without
//! one, the fallback algorithm interpolates nutrient points, maps the raw total
//! onto 0–100 through five grade bands and tempers the result by data confidence.
//! Factors are computed from the raw nutrients on both paths.

use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

use crate::confidence::{has_tracked_data, DataConfidence, NEUTRAL_SCORE};
use crate::config::ScoringProfile;
use crate::explain::{explain, limited_data};
use crate::grade::{Grade, NovaGroup};
use crate::nutrients::NutrientSnapshot;
use crate::result::HealthScoreResult;
use crate::scoring::{compute_points, raw_to_ui, PointBreakdown};

static DEFAULT_ENGINE: Lazy<HealthScoreEngine> = Lazy::new(HealthScoreEngine::new);

#[derive(Debug, Clone, Default)]
pub struct HealthScoreEngine {
    profile: Arc<ScoringProfile>,
}

/// Intermediate fallback computation shared by `score` and `score_with_breakdown`.
struct Fallback {
    score: u8,
    grade: Grade,
    points: PointBreakdown,
    confidence: DataConfidence,
}

impl HealthScoreEngine {
    /// Engine with the built-in scoring profile.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: ScoringProfile) -> Self {
        Self {
            profile: Arc::new(profile),
        }
    }

    pub fn from_shared(profile: Arc<ScoringProfile>) -> Self {
        Self { profile }
    }

    /// 0–100 score. Official grade (case-insensitive A–E) takes precedence.
    pub fn score(
        &self,
        nutrients: &NutrientSnapshot,
        official_grade: Option<&str>,
        nova_group: Option<i64>,
    ) -> u8 {
        if let Some(g) = official_grade.and_then(Grade::parse) {
            return g.official_score();
        }
        if !has_tracked_data(nutrients) {
            return NEUTRAL_SCORE;
        }
        self.fallback(nutrients, nova_group.and_then(NovaGroup::from_group))
            .score
    }

    /// Score plus grade, factors and (for estimated scores) data confidence.
    pub fn score_with_breakdown(
        &self,
        nutrients: &NutrientSnapshot,
        official_grade: Option<&str>,
        nova_group: Option<i64>,
    ) -> HealthScoreResult {
        let nova = nova_group.and_then(NovaGroup::from_group);
        let profile = self.profile.as_ref();

        if let Some(g) = official_grade.and_then(Grade::parse) {
            let pts = compute_points(nutrients, nova, profile);
            let factors = explain(nutrients, &pts, profile, g, true);
            debug!(target: "health_score", grade = %g, factors = factors.len(), "official grade used");
            return HealthScoreResult::official(g, factors);
        }

        if !has_tracked_data(nutrients) {
            debug!(target: "health_score", "no tracked nutrients; neutral score");
            return HealthScoreResult::estimated(
                NEUTRAL_SCORE,
                None,
                vec![limited_data()],
                DataConfidence::none(),
            );
        }

        let fb = self.fallback(nutrients, nova);
        let factors = explain(nutrients, &fb.points, profile, fb.grade, false);
        HealthScoreResult::estimated(fb.score, Some(fb.grade), factors, fb.confidence)
    }

    fn fallback(&self, nutrients: &NutrientSnapshot, nova: Option<NovaGroup>) -> Fallback {
        let profile = self.profile.as_ref();
        let points = compute_points(nutrients, nova, profile);
        let raw = points.raw();
        let (ui, grade) = raw_to_ui(raw);
        let confidence = DataConfidence::assess(nutrients, &profile.confidence);
        let score = confidence.adjust(ui.round().clamp(0.0, 100.0) as u8, &profile.confidence);

        debug!(
            target: "health_score",
            negative = points.negative(),
            positive = points.positive(),
            raw,
            ui,
            score,
            grade = %grade,
            confidence = confidence.confidence,
            "fallback score computed"
        );

        Fallback {
            score,
            grade,
            points,
            confidence,
        }
    }
}

/// [`HealthScoreEngine::score`] with the built-in profile.
pub fn score(nutrients: &NutrientSnapshot, official_grade: Option<&str>, nova_group: Option<i64>) -> u8 {
    DEFAULT_ENGINE.score(nutrients, official_grade, nova_group)
}

/// [`HealthScoreEngine::score_with_breakdown`] with the built-in profile.
pub fn score_with_breakdown(
    nutrients: &NutrientSnapshot,
    official_grade: Option<&str>,
    nova_group: Option<i64>,
) -> HealthScoreResult {
    DEFAULT_ENGINE.score_with_breakdown(nutrients, official_grade, nova_group)
}
