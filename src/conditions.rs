//! # Health-Condition Warnings
//!
//! Maps a user's declared health conditions to per-nutrient warnings for one
//! product. Each condition watches a few nutrients; a warning fires when a
//! watched value exceeds the UK FSA front-of-pack "medium" (caution) or "high"
//! (avoid) level per 100 g.
//!
//! - Condition ids are case-insensitive; `-`, `_` and spaces are equivalent.
//! - Missing nutrients never warn.
//! - Salt falls back to sodium × 2.5 like the scoring engine.

use serde::{Deserialize, Serialize};

use crate::nutrients::{Nutrient, NutrientSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
    HeartDisease,
    KidneyDisease,
    WeightManagement,
}

/// Static lookup row for a condition.
#[derive(Debug)]
pub struct ConditionInfo {
    pub id: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub watched: &'static [Nutrient],
}

const DIABETES: ConditionInfo = ConditionInfo {
    id: "diabetes",
    display_name: "Diabetes",
    description: "Limit sugars and fast carbohydrates to keep blood glucose stable.",
    watched: &[Nutrient::Sugars, Nutrient::Carbohydrates],
};

const HYPERTENSION: ConditionInfo = ConditionInfo {
    id: "hypertension",
    display_name: "High Blood Pressure",
    description: "Keep salt intake low.",
    watched: &[Nutrient::Salt],
};

const HEART_DISEASE: ConditionInfo = ConditionInfo {
    id: "heart_disease",
    display_name: "Heart Disease",
    description: "Limit saturated fat, cholesterol and salt.",
    watched: &[Nutrient::SaturatedFat, Nutrient::Cholesterol, Nutrient::Salt],
};

const KIDNEY_DISEASE: ConditionInfo = ConditionInfo {
    id: "kidney_disease",
    display_name: "Kidney Disease",
    description: "Moderate salt and protein to reduce kidney load.",
    watched: &[Nutrient::Salt, Nutrient::Proteins],
};

const WEIGHT_MANAGEMENT: ConditionInfo = ConditionInfo {
    id: "weight_management",
    display_name: "Weight Management",
    description: "Favour lower-energy foods with little sugar and saturated fat.",
    watched: &[Nutrient::EnergyKcal, Nutrient::Sugars, Nutrient::SaturatedFat],
};

impl HealthCondition {
    pub const ALL: [HealthCondition; 5] = [
        HealthCondition::Diabetes,
        HealthCondition::Hypertension,
        HealthCondition::HeartDisease,
        HealthCondition::KidneyDisease,
        HealthCondition::WeightManagement,
    ];

    pub fn info(self) -> &'static ConditionInfo {
        match self {
            HealthCondition::Diabetes => &DIABETES,
            HealthCondition::Hypertension => &HYPERTENSION,
            HealthCondition::HeartDisease => &HEART_DISEASE,
            HealthCondition::KidneyDisease => &KIDNEY_DISEASE,
            HealthCondition::WeightManagement => &WEIGHT_MANAGEMENT,
        }
    }

    /// Lenient id parse ("Heart-Disease", "heart disease", "HEART_DISEASE").
    pub fn parse(raw: &str) -> Option<Self> {
        let norm = normalize(raw);
        Self::ALL.into_iter().find(|c| c.info().id == norm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningSeverity {
    Caution,
    Avoid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthWarning {
    pub condition: HealthCondition,
    /// Input key of the offending nutrient.
    pub nutrient: String,
    pub severity: WarningSeverity,
    pub message: String,
}

/// Per-100 g caution/avoid levels and the display unit.
struct Limits {
    caution: f64,
    avoid: f64,
    unit: &'static str,
    /// Multiplier from the stored unit to the display unit (g → mg for cholesterol).
    display_scale: f64,
}

fn limits(n: Nutrient) -> Option<Limits> {
    let (caution, avoid, unit, display_scale) = match n {
        Nutrient::Sugars => (5.0, 22.5, "g", 1.0),
        Nutrient::SaturatedFat => (1.5, 5.0, "g", 1.0),
        Nutrient::Salt => (0.3, 1.5, "g", 1.0),
        Nutrient::EnergyKcal => (150.0, 400.0, " kcal", 1.0),
        Nutrient::Carbohydrates => (30.0, 60.0, "g", 1.0),
        Nutrient::Cholesterol => (0.03, 0.06, "mg", 1000.0),
        Nutrient::Proteins => (10.0, 20.0, "g", 1.0),
        Nutrient::Sodium | Nutrient::Fiber => return None,
    };
    Some(Limits {
        caution,
        avoid,
        unit,
        display_scale,
    })
}

fn measured(snapshot: &NutrientSnapshot, n: Nutrient) -> Option<f64> {
    match n {
        Nutrient::Salt => snapshot.salt_g(),
        other => snapshot.get(other),
    }
}

/// Warnings for `conditions` (duplicates ignored), ordered by condition then
/// the condition's watched-nutrient order.
pub fn condition_warnings(
    snapshot: &NutrientSnapshot,
    conditions: &[HealthCondition],
) -> Vec<HealthWarning> {
    let mut wanted = conditions.to_vec();
    wanted.sort();
    wanted.dedup();

    let mut out = Vec::new();
    for cond in wanted {
        let info = cond.info();
        for &n in info.watched {
            let (Some(value), Some(lim)) = (measured(snapshot, n), limits(n)) else {
                continue;
            };
            let severity = if value > lim.avoid {
                WarningSeverity::Avoid
            } else if value > lim.caution {
                WarningSeverity::Caution
            } else {
                continue;
            };
            let level = match severity {
                WarningSeverity::Avoid => "high",
                WarningSeverity::Caution => "moderate",
            };
            let limit = match severity {
                WarningSeverity::Avoid => lim.avoid,
                WarningSeverity::Caution => lim.caution,
            };
            out.push(HealthWarning {
                condition: cond,
                nutrient: n.key().to_string(),
                severity,
                message: format!(
                    "{} {} for {}: {}{} per 100g (above {}{})",
                    capitalize(level),
                    n.label(),
                    info.display_name,
                    trim_float(value * lim.display_scale),
                    lim.unit,
                    trim_float(limit * lim.display_scale),
                    lim.unit
                ),
            });
        }
    }
    out
}

fn normalize(s: &str) -> String {
    s.trim()
        .to_ascii_lowercase()
        .replace(['-', ' '], "_")
        .split('_')
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        Some(f) => f.to_ascii_uppercase().to_string() + c.as_str(),
        None => String::new(),
    }
}

/// Format with up to two decimals, dropping trailing zeros ("1.5", "22.5", "400").
fn trim_float(x: f64) -> String {
    let s = format!("{:.2}", x);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}
