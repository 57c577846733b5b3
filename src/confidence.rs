//! Data-confidence estimate for fallback (non-official) scores.
//!
//! Confidence starts at 100 and loses a fixed penalty for every tracked
//! nutrient the caller did not supply. Low confidence pulls the UI score
//! toward the neutral midpoint instead of raising an error.

use serde::{Deserialize, Serialize};

use crate::config::ConfidencePolicy;
use crate::nutrients::{Nutrient, NutrientSnapshot};

/// Neutral UI score used for missing data and confidence pulls.
pub const NEUTRAL_SCORE: u8 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLabel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataConfidence {
    /// 0–100.
    pub confidence: u8,
    /// Input keys of the tracked nutrients that were absent.
    pub missing_fields: Vec<String>,
    pub label: ConfidenceLabel,
}

/// Whether a tracked field feeds negative (penalised more) or positive points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tier {
    Negative,
    Positive,
}

/// The six fields the fallback score relies on. Salt counts as present when
/// either salt or sodium was supplied.
const TRACKED: [(Nutrient, Tier); 6] = [
    (Nutrient::Sugars, Tier::Negative),
    (Nutrient::SaturatedFat, Tier::Negative),
    (Nutrient::Salt, Tier::Negative),
    (Nutrient::EnergyKcal, Tier::Negative),
    (Nutrient::Fiber, Tier::Positive),
    (Nutrient::Proteins, Tier::Positive),
];

fn tracked_present(snapshot: &NutrientSnapshot, n: Nutrient) -> bool {
    match n {
        Nutrient::Salt => snapshot.salt_g().is_some(),
        other => snapshot.is_present(other),
    }
}

/// True when at least one tracked field was supplied.
pub fn has_tracked_data(snapshot: &NutrientSnapshot) -> bool {
    TRACKED.iter().any(|&(n, _)| tracked_present(snapshot, n))
}

impl DataConfidence {
    pub fn assess(snapshot: &NutrientSnapshot, policy: &ConfidencePolicy) -> Self {
        let mut confidence: i32 = 100;
        let mut missing_fields = Vec::new();
        for &(n, tier) in TRACKED.iter() {
            if tracked_present(snapshot, n) {
                continue;
            }
            confidence -= match tier {
                Tier::Negative => i32::from(policy.missing_negative_penalty),
                Tier::Positive => i32::from(policy.missing_positive_penalty),
            };
            missing_fields.push(n.key().to_string());
        }
        let confidence = confidence.clamp(0, 100) as u8;
        Self {
            confidence,
            missing_fields,
            label: label_for(confidence, policy),
        }
    }

    /// Nothing usable was supplied.
    pub fn none() -> Self {
        Self {
            confidence: 0,
            missing_fields: TRACKED.iter().map(|(n, _)| n.key().to_string()).collect(),
            label: ConfidenceLabel::Low,
        }
    }

    /// Pull `ui_score` toward neutral in proportion to the confidence shortfall.
    pub fn adjust(&self, ui_score: u8, policy: &ConfidencePolicy) -> u8 {
        if self.confidence >= policy.pull_below {
            return ui_score;
        }
        let shortfall = f64::from(policy.pull_below - self.confidence) / 100.0;
        let distance = f64::from(ui_score) - f64::from(NEUTRAL_SCORE);
        let pulled = f64::from(ui_score) - (shortfall * distance).round();
        pulled.clamp(0.0, 100.0) as u8
    }
}

fn label_for(confidence: u8, policy: &ConfidencePolicy) -> ConfidenceLabel {
    if confidence >= policy.high_at {
        ConfidenceLabel::High
    } else if confidence >= policy.medium_at {
        ConfidenceLabel::Medium
    } else {
        ConfidenceLabel::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_data_is_high() {
        let s = NutrientSnapshot::from_pairs([
            ("sugars_100g", 1.0),
            ("saturated-fat_100g", 1.0),
            ("sodium_100g", 0.1),
            ("energy-kcal_100g", 100.0),
            ("fiber_100g", 1.0),
            ("proteins_100g", 1.0),
        ]);
        let c = DataConfidence::assess(&s, &ConfidencePolicy::default());
        assert_eq!(c.confidence, 100);
        assert!(c.missing_fields.is_empty());
        assert_eq!(c.label, ConfidenceLabel::High);
    }

    #[test]
    fn penalties_per_tier() {
        let s = NutrientSnapshot::from_pairs([("sugars_100g", 1.0), ("fiber_100g", 1.0)]);
        let c = DataConfidence::assess(&s, &ConfidencePolicy::default());
        // 3 negatives × 10 + 1 positive × 5
        assert_eq!(c.confidence, 65);
        assert_eq!(c.label, ConfidenceLabel::Medium);
        assert_eq!(
            c.missing_fields,
            vec![
                "saturated-fat_100g",
                "salt_100g",
                "energy-kcal_100g",
                "proteins_100g"
            ]
        );
    }

    #[test]
    fn pull_toward_neutral_only_below_cutoff() {
        let policy = ConfidencePolicy::default();
        let ok = DataConfidence {
            confidence: 50,
            missing_fields: vec![],
            label: ConfidenceLabel::Low,
        };
        assert_eq!(ok.adjust(99, &policy), 99);

        let weak = DataConfidence { confidence: 20, ..ok.clone() };
        // round(0.3 × 49) = 15
        assert_eq!(weak.adjust(99, &policy), 84);
        // round(0.3 × -50) = -15
        assert_eq!(weak.adjust(0, &policy), 15);
        assert_eq!(weak.adjust(50, &policy), 50);
    }

    #[test]
    fn none_lists_every_tracked_field() {
        let c = DataConfidence::none();
        assert_eq!(c.confidence, 0);
        assert_eq!(c.missing_fields.len(), 6);
        assert_eq!(c.label, ConfidenceLabel::Low);
    }
}
