//! Explanatory factors for a score.
//!
//! One factor per nutrient that earned points, labelled by how much of its
//! maximum it reached. Flat adjustments (whole-food bonus, NOVA) get their own
//! factor. When nothing qualifies a single neutral factor describes the grade.

use crate::config::ScoringProfile;
use crate::grade::Grade;
use crate::nutrients::{Nutrient, NutrientSnapshot};
use crate::result::{round2, ScoreFactor};
use crate::scoring::PointBreakdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    High,
    Moderate,
    Some,
}

impl Severity {
    /// `points / max_points`: ≥ 0.7 high, ≥ 0.4 moderate, otherwise some.
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio >= 0.7 {
            Severity::High
        } else if ratio >= 0.4 {
            Severity::Moderate
        } else {
            Severity::Some
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Moderate => "Moderate",
            Severity::Some => "Some",
        }
    }
}

/// Build the factor list for a computed breakdown. Never returns an empty list.
pub fn explain(
    snapshot: &NutrientSnapshot,
    pts: &PointBreakdown,
    profile: &ScoringProfile,
    grade: Grade,
    official: bool,
) -> Vec<ScoreFactor> {
    let t = &profile.thresholds;
    let salt = snapshot.salt_g().unwrap_or(0.0);

    let mut negatives = Vec::new();
    push_nutrient(
        &mut negatives,
        false,
        "Sugar",
        pts.sugars,
        t.sugars.len(),
        format!("{:.1}g sugar per 100g", snapshot.value(Nutrient::Sugars)),
    );
    push_nutrient(
        &mut negatives,
        false,
        "Saturated Fat",
        pts.saturated_fat,
        t.saturated_fat.len(),
        format!(
            "{:.1}g saturated fat per 100g",
            snapshot.value(Nutrient::SaturatedFat)
        ),
    );
    push_nutrient(
        &mut negatives,
        false,
        "Salt",
        pts.salt,
        t.salt.len(),
        format!(
            "{:.2}g salt per 100g ({:.0}mg sodium)",
            salt,
            snapshot.sodium_mg().unwrap_or(0.0)
        ),
    );
    push_nutrient(
        &mut negatives,
        false,
        "Calories",
        pts.energy,
        t.energy_kcal.len(),
        format!("{:.0} kcal per 100g", snapshot.value(Nutrient::EnergyKcal)),
    );
    if round2(pts.nova_penalty) > 0.0 {
        negatives.push(ScoreFactor::negative(
            "Ultra-Processed",
            "NOVA group 4: ultra-processed food",
            pts.nova_penalty,
        ));
    }

    let mut positives = Vec::new();
    push_nutrient(
        &mut positives,
        true,
        "Fiber",
        pts.fiber,
        t.fiber.len(),
        format!("{:.1}g fiber per 100g", snapshot.value(Nutrient::Fiber)),
    );
    push_nutrient(
        &mut positives,
        true,
        "Protein",
        pts.proteins,
        t.proteins.len(),
        format!("{:.1}g protein per 100g", snapshot.value(Nutrient::Proteins)),
    );
    if round2(pts.whole_food_bonus) > 0.0 {
        positives.push(ScoreFactor::positive(
            "Whole Food",
            "High fiber with little sugar, saturated fat and energy",
            pts.whole_food_bonus,
        ));
    }
    if round2(pts.nova_bonus) > 0.0 {
        positives.push(ScoreFactor::positive(
            "Minimally Processed",
            "NOVA group 1: unprocessed or minimally processed food",
            pts.nova_bonus,
        ));
    }

    // Biggest contributors first; sort is stable so ties keep table order.
    negatives.sort_by(|a, b| a.impact.total_cmp(&b.impact));
    positives.sort_by(|a, b| b.impact.total_cmp(&a.impact));

    let mut factors = negatives;
    factors.extend(positives);
    if factors.is_empty() {
        factors.push(placeholder(grade, official));
    }
    factors
}

fn push_nutrient(
    out: &mut Vec<ScoreFactor>,
    positive: bool,
    noun: &str,
    points: f64,
    max_points: usize,
    description: String,
) {
    if round2(points) <= 0.0 || max_points == 0 {
        return;
    }
    let severity = Severity::from_ratio(points / max_points as f64);
    let name = format!("{} {}", severity.label(), noun);
    out.push(if positive {
        ScoreFactor::positive(name, description, points)
    } else {
        ScoreFactor::negative(name, description, points)
    });
}

/// Neutral factor used when no nutrient stands out.
pub fn placeholder(grade: Grade, official: bool) -> ScoreFactor {
    let description = if official {
        format!("Official Nutri-Score grade {grade}")
    } else {
        format!("No nutrient stands out; estimated grade {grade}")
    };
    ScoreFactor::neutral("Balanced Profile", description, grade.is_favourable())
}

/// Single factor reported when there is nothing to score.
pub fn limited_data() -> ScoreFactor {
    ScoreFactor::neutral(
        "Limited Data",
        "Not enough nutrition information to score this product",
        false,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::compute_points;

    fn factors_for(pairs: &[(&str, f64)]) -> Vec<ScoreFactor> {
        let p = ScoringProfile::default();
        let s = NutrientSnapshot::from_pairs(pairs.iter().copied());
        let pts = compute_points(&s, None, &p);
        explain(&s, &pts, &p, Grade::C, false)
    }

    #[test]
    fn severity_cutoffs() {
        assert_eq!(Severity::from_ratio(0.7), Severity::High);
        assert_eq!(Severity::from_ratio(0.69), Severity::Moderate);
        assert_eq!(Severity::from_ratio(0.4), Severity::Moderate);
        assert_eq!(Severity::from_ratio(0.1), Severity::Some);
    }

    #[test]
    fn names_and_descriptions() {
        let f = factors_for(&[("sugars_100g", 40.0), ("sodium_100g", 0.4), ("fiber_100g", 1.0)]);
        let names: Vec<&str> = f.iter().map(|x| x.name.as_str()).collect();
        assert_eq!(names, vec!["High Sugar", "Moderate Salt", "Some Fiber"]);

        assert_eq!(f[0].description, "40.0g sugar per 100g");
        assert_eq!(f[1].description, "1.00g salt per 100g (400mg sodium)");
        assert!(f[0].impact < 0.0 && !f[0].is_positive);
        assert!(f[2].impact > 0.0 && f[2].is_positive);
    }

    #[test]
    fn zero_nutrients_are_omitted() {
        let f = factors_for(&[("sugars_100g", 0.0), ("saturated-fat_100g", 6.5)]);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].name, "Moderate Saturated Fat");
        assert_eq!(f[0].impact, -6.5);
    }

    #[test]
    fn negatives_sorted_by_magnitude() {
        let f = factors_for(&[("sugars_100g", 5.0), ("energy-kcal_100g", 700.0)]);
        assert_eq!(f[0].name, "High Calories");
        assert_eq!(f[1].name, "Some Sugar");
    }

    #[test]
    fn placeholder_when_nothing_qualifies() {
        let p = ScoringProfile::default();
        let s = NutrientSnapshot::from_pairs([("sugars_100g", 0.0)]);
        let pts = compute_points(&s, None, &p);
        let f = explain(&s, &pts, &p, Grade::B, false);
        assert_eq!(f.len(), 1);
        assert_eq!(f[0].name, "Balanced Profile");
        assert!(f[0].is_positive);
        assert_eq!(f[0].impact, 0.0);
        assert!(f[0].description.contains('B'));
    }
}
