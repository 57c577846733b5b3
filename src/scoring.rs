//! Point computation and raw-score → UI-score mapping.
//!
//! Polarity follows Nutri-Score: negative points (sugar, saturated fat, salt,
//! energy) push the raw score up, positive points (fiber, protein) pull it down,
//! and lower raw scores are better. The UI score flips that into 0–100, higher
//! is better, through five bands mirroring the A–E letters.

use crate::config::ScoringProfile;
use crate::grade::{Grade, NovaGroup};
use crate::nutrients::{Nutrient, NutrientSnapshot};

/// Bounds for the raw score: 4 × 10 negative + NOVA penalty, 2 × 5 positive + bonuses.
pub const RAW_SCORE_MIN: f64 = -15.0;
pub const RAW_SCORE_MAX: f64 = 45.0;

/// Piecewise-linear point value of `value` against ascending `thresholds`.
///
/// Returns 0 for non-positive input, `thresholds.len()` at or above the last
/// tier, otherwise the tier index plus the fraction travelled inside the tier.
pub fn points(value: f64, thresholds: &[f64]) -> f64 {
    let Some(&last) = thresholds.last() else {
        return 0.0;
    };
    if value.is_nan() || value <= 0.0 {
        return 0.0;
    }
    if value >= last {
        return thresholds.len() as f64;
    }
    for (i, &t) in thresholds.iter().enumerate() {
        if value <= t {
            let prev = if i == 0 { 0.0 } else { thresholds[i - 1] };
            let span = t - prev;
            let fraction = if span > 0.0 { (value - prev) / span } else { 1.0 };
            return i as f64 + fraction.clamp(0.0, 1.0);
        }
    }
    thresholds.len() as f64
}

/// Per-nutrient contributions plus the flat adjustments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointBreakdown {
    pub sugars: f64,
    pub saturated_fat: f64,
    pub salt: f64,
    pub energy: f64,
    pub fiber: f64,
    pub proteins: f64,
    pub whole_food_bonus: f64,
    pub nova_penalty: f64,
    pub nova_bonus: f64,
}

impl PointBreakdown {
    pub fn negative(&self) -> f64 {
        self.sugars + self.saturated_fat + self.salt + self.energy + self.nova_penalty
    }

    pub fn positive(&self) -> f64 {
        self.fiber + self.proteins + self.whole_food_bonus + self.nova_bonus
    }

    /// Negative minus positive, bounded to the modelled range.
    pub fn raw(&self) -> f64 {
        (self.negative() - self.positive()).clamp(RAW_SCORE_MIN, RAW_SCORE_MAX)
    }
}

pub fn compute_points(
    snapshot: &NutrientSnapshot,
    nova: Option<NovaGroup>,
    profile: &ScoringProfile,
) -> PointBreakdown {
    let t = &profile.thresholds;
    let sugars = snapshot.value(Nutrient::Sugars);
    let sat_fat = snapshot.value(Nutrient::SaturatedFat);
    let energy = snapshot.value(Nutrient::EnergyKcal);
    let fiber = snapshot.value(Nutrient::Fiber);
    let salt = snapshot.salt_g().unwrap_or(0.0);

    let wf = &profile.whole_food;
    let whole_food = fiber > wf.min_fiber
        && energy < wf.max_energy_kcal
        && sat_fat < wf.max_saturated_fat
        && sugars < wf.max_sugars;

    PointBreakdown {
        sugars: points(sugars, &t.sugars),
        saturated_fat: points(sat_fat, &t.saturated_fat),
        salt: points(salt, &t.salt),
        energy: points(energy, &t.energy_kcal),
        fiber: points(fiber, &t.fiber),
        proteins: points(snapshot.value(Nutrient::Proteins), &t.proteins),
        whole_food_bonus: if whole_food { wf.points } else { 0.0 },
        nova_penalty: if nova == Some(NovaGroup::UltraProcessed) {
            profile.nova.ultra_processed_penalty
        } else {
            0.0
        },
        nova_bonus: if nova == Some(NovaGroup::Unprocessed) {
            profile.nova.unprocessed_bonus
        } else {
            0.0
        },
    }
}

/// One grade band: raw range `[raw_from, raw_to]` maps linearly onto `ui_from → ui_to`.
#[derive(Debug, Clone, Copy)]
struct Band {
    grade: Grade,
    raw_from: f64,
    raw_to: f64,
    ui_from: f64,
    ui_to: f64,
}

const BANDS: [Band; 5] = [
    Band { grade: Grade::A, raw_from: -15.0, raw_to: -1.0, ui_from: 100.0, ui_to: 90.0 },
    Band { grade: Grade::B, raw_from: -1.0, raw_to: 2.0, ui_from: 89.0, ui_to: 70.0 },
    Band { grade: Grade::C, raw_from: 2.0, raw_to: 10.0, ui_from: 69.0, ui_to: 45.0 },
    Band { grade: Grade::D, raw_from: 10.0, raw_to: 18.0, ui_from: 44.0, ui_to: 20.0 },
    Band { grade: Grade::E, raw_from: 19.0, raw_to: 40.0, ui_from: 19.0, ui_to: 0.0 },
];

fn band_for(raw: f64) -> &'static Band {
    if raw <= -1.0 {
        &BANDS[0]
    } else if raw <= 2.0 {
        &BANDS[1]
    } else if raw <= 10.0 {
        &BANDS[2]
    } else if raw <= 18.0 {
        &BANDS[3]
    } else {
        &BANDS[4]
    }
}

/// Map a raw score onto the 0–100 UI scale, clamped to the band's own range.
pub fn raw_to_ui(raw: f64) -> (f64, Grade) {
    let b = band_for(raw);
    let t = (raw - b.raw_from) / (b.raw_to - b.raw_from);
    let ui = b.ui_from + t * (b.ui_to - b.ui_from);
    let (lo, hi) = (b.ui_to.min(b.ui_from), b.ui_to.max(b.ui_from));
    (ui.clamp(lo, hi), b.grade)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn points_interpolates_within_tiers() {
        let sugar = ScoringProfile::default().thresholds.sugars;
        assert_eq!(points(0.0, &sugar), 0.0);
        assert_eq!(points(-3.0, &sugar), 0.0);
        assert!(approx(points(2.25, &sugar), 0.5));
        assert!(approx(points(4.5, &sugar), 1.0));
        assert!(approx(points(6.75, &sugar), 1.5));
        assert_eq!(points(45.0, &sugar), 10.0);
        assert_eq!(points(120.0, &sugar), 10.0);
        assert_eq!(points(f64::NAN, &sugar), 0.0);
        assert_eq!(points(5.0, &[]), 0.0);
    }

    #[test]
    fn positive_tables_top_out_at_five() {
        let t = ScoringProfile::default().thresholds;
        assert_eq!(points(10.0, &t.fiber), 5.0);
        assert_eq!(points(10.0, &t.proteins), 5.0);
        assert!(approx(points(0.9, &t.fiber), 1.0));
    }

    #[test]
    fn band_edges() {
        assert_eq!(raw_to_ui(-15.0), (100.0, Grade::A));
        assert_eq!(raw_to_ui(-1.0), (90.0, Grade::A));
        assert_eq!(raw_to_ui(2.0), (70.0, Grade::B));
        assert_eq!(raw_to_ui(6.0), (57.0, Grade::C));
        assert_eq!(raw_to_ui(10.0), (45.0, Grade::C));
        assert_eq!(raw_to_ui(18.0), (20.0, Grade::D));
        assert_eq!(raw_to_ui(40.0), (0.0, Grade::E));
    }

    #[test]
    fn band_clamps_out_of_range_raw() {
        // Between 18 and 19 the E line would exceed 19.
        assert_eq!(raw_to_ui(18.5), (19.0, Grade::E));
        assert_eq!(raw_to_ui(-40.0).0, 100.0);
        assert_eq!(raw_to_ui(99.0).0, 0.0);
        let (ui, g) = raw_to_ui(0.0);
        assert_eq!(g, Grade::B);
        assert!((ui - 82.666_666).abs() < 1e-3);
    }

    #[test]
    fn whole_food_and_nova_adjustments() {
        let p = ScoringProfile::default();
        let s = NutrientSnapshot::from_pairs([
            ("fiber_100g", 4.0),
            ("energy-kcal_100g", 150.0),
            ("saturated-fat_100g", 1.0),
            ("sugars_100g", 5.0),
        ]);
        let pts = compute_points(&s, Some(NovaGroup::Unprocessed), &p);
        assert_eq!(pts.whole_food_bonus, 3.0);
        assert_eq!(pts.nova_bonus, 2.0);
        assert_eq!(pts.nova_penalty, 0.0);

        let pts = compute_points(&s, Some(NovaGroup::UltraProcessed), &p);
        assert_eq!(pts.nova_penalty, 5.0);
        assert_eq!(pts.nova_bonus, 0.0);

        // Sugar at the bound breaks the strict inequality.
        let s2 = s.clone().with(Nutrient::Sugars, 10.0);
        assert_eq!(compute_points(&s2, None, &p).whole_food_bonus, 0.0);
    }

    #[test]
    fn raw_is_bounded() {
        let pts = PointBreakdown {
            sugars: 10.0,
            saturated_fat: 10.0,
            salt: 10.0,
            energy: 10.0,
            nova_penalty: 50.0,
            ..Default::default()
        };
        assert_eq!(pts.raw(), RAW_SCORE_MAX);
    }
}
