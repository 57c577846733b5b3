//! Output shapes for a scored product: the score, its letter grade and the explanation.
//!
//! Serialized field names are camelCase (`isOfficial`, `dataConfidence`, ...) so
//! the JSON matches what the presentation and persistence layers already store.

use serde::{Deserialize, Serialize};

use crate::confidence::DataConfidence;
use crate::grade::Grade;

/// A single attributable contributor to the final score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreFactor {
    /// e.g. "High Sugar", "Some Fiber".
    pub name: String,
    /// Human-readable value, e.g. "25.0g sugar per 100g".
    pub description: String,
    pub is_positive: bool,
    /// Signed point contribution: > 0 pushes the score up, < 0 down.
    pub impact: f64,
}

impl ScoreFactor {
    /// Factor that lowers the score; `points` is the magnitude.
    pub fn negative(name: impl Into<String>, description: impl Into<String>, points: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_positive: false,
            impact: -round2(points.abs()),
        }
    }

    /// Factor that raises the score.
    pub fn positive(name: impl Into<String>, description: impl Into<String>, points: f64) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_positive: true,
            impact: round2(points.abs()),
        }
    }

    /// Zero-impact informational factor.
    pub fn neutral(
        name: impl Into<String>,
        description: impl Into<String>,
        is_positive: bool,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            is_positive,
            impact: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    /// 0–100, higher is better.
    pub score: u8,
    /// `None` only when there was nothing to grade.
    pub grade: Option<Grade>,
    /// Never empty.
    pub factors: Vec<ScoreFactor>,
    /// Omitted for official grades.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_confidence: Option<DataConfidence>,
    pub is_official: bool,
}

impl HealthScoreResult {
    pub fn official(grade: Grade, factors: Vec<ScoreFactor>) -> Self {
        Self {
            score: grade.official_score(),
            grade: Some(grade),
            factors,
            data_confidence: None,
            is_official: true,
        }
    }

    pub fn estimated(
        score: u8,
        grade: Option<Grade>,
        factors: Vec<ScoreFactor>,
        confidence: DataConfidence,
    ) -> Self {
        Self {
            score: score.min(100),
            grade,
            factors,
            data_confidence: Some(confidence),
            is_official: false,
        }
    }
}

pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
