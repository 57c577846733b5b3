//! # Nutrient Snapshot
//! Per-100 g nutrient values for a single product, as supplied by a product
//! database lookup or an AI estimate.
//!
//! - Recognized keys follow the Open Food Facts naming (`sugars_100g`, ...).
//! - Values may arrive as JSON numbers or numeric strings; anything else is
//!   treated as absent and contributes 0.0.
//! - Salt is preferred over sodium; sodium is only converted when salt is missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Grams of salt per gram of sodium.
pub const SALT_PER_SODIUM: f64 = 2.5;

/// Nutrients the engine understands. Anything else in the input map is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Nutrient {
    Sugars,
    SaturatedFat,
    Salt,
    Sodium,
    EnergyKcal,
    Fiber,
    Proteins,
    Carbohydrates,
    Cholesterol,
}

impl Nutrient {
    pub const ALL: [Nutrient; 9] = [
        Nutrient::Sugars,
        Nutrient::SaturatedFat,
        Nutrient::Salt,
        Nutrient::Sodium,
        Nutrient::EnergyKcal,
        Nutrient::Fiber,
        Nutrient::Proteins,
        Nutrient::Carbohydrates,
        Nutrient::Cholesterol,
    ];

    /// Input map key for this nutrient.
    pub fn key(self) -> &'static str {
        match self {
            Nutrient::Sugars => "sugars_100g",
            Nutrient::SaturatedFat => "saturated-fat_100g",
            Nutrient::Salt => "salt_100g",
            Nutrient::Sodium => "sodium_100g",
            Nutrient::EnergyKcal => "energy-kcal_100g",
            Nutrient::Fiber => "fiber_100g",
            Nutrient::Proteins => "proteins_100g",
            Nutrient::Carbohydrates => "carbohydrates_100g",
            Nutrient::Cholesterol => "cholesterol_100g",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let k = key.trim();
        Self::ALL.into_iter().find(|n| n.key() == k)
    }

    /// Short human label ("saturated fat", "energy").
    pub fn label(self) -> &'static str {
        match self {
            Nutrient::Sugars => "sugar",
            Nutrient::SaturatedFat => "saturated fat",
            Nutrient::Salt => "salt",
            Nutrient::Sodium => "sodium",
            Nutrient::EnergyKcal => "energy",
            Nutrient::Fiber => "fiber",
            Nutrient::Proteins => "protein",
            Nutrient::Carbohydrates => "carbohydrates",
            Nutrient::Cholesterol => "cholesterol",
        }
    }
}

/// Per-100 g nutrient values. Only successfully parsed values are stored, so
/// "present" always means "present and numeric".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, Value>", into = "BTreeMap<String, f64>")]
pub struct NutrientSnapshot {
    values: BTreeMap<Nutrient, f64>,
}

impl NutrientSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(key, value)` pairs; keys use the input map naming.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut values = BTreeMap::new();
        for (k, v) in pairs {
            if let Some(n) = Nutrient::from_key(k) {
                if v.is_finite() {
                    values.insert(n, v);
                }
            }
        }
        Self { values }
    }

    /// Builder-style setter. Non-finite values are ignored.
    pub fn with(mut self, nutrient: Nutrient, value: f64) -> Self {
        if value.is_finite() {
            self.values.insert(nutrient, value);
        }
        self
    }

    pub fn get(&self, nutrient: Nutrient) -> Option<f64> {
        self.values.get(&nutrient).copied()
    }

    /// Value or 0.0 when absent.
    pub fn value(&self, nutrient: Nutrient) -> f64 {
        self.get(nutrient).unwrap_or(0.0)
    }

    pub fn is_present(&self, nutrient: Nutrient) -> bool {
        self.values.contains_key(&nutrient)
    }

    /// Salt in g/100g: declared salt, else sodium × 2.5.
    pub fn salt_g(&self) -> Option<f64> {
        self.get(Nutrient::Salt)
            .or_else(|| self.get(Nutrient::Sodium).map(|na| na * SALT_PER_SODIUM))
    }

    fn collect<'a>(entries: impl Iterator<Item = (&'a String, &'a Value)>) -> Self {
        let mut values = BTreeMap::new();
        for (k, v) in entries {
            if let (Some(n), Some(x)) = (Nutrient::from_key(k), parse_number(v)) {
                values.insert(n, x);
            }
        }
        Self { values }
    }

    /// Sodium in mg/100g for display: declared sodium, else salt ÷ 2.5.
    pub fn sodium_mg(&self) -> Option<f64> {
        self.get(Nutrient::Sodium)
            .or_else(|| self.get(Nutrient::Salt).map(|s| s / SALT_PER_SODIUM))
            .map(|g| g * 1000.0)
    }
}

impl From<BTreeMap<String, Value>> for NutrientSnapshot {
    fn from(raw: BTreeMap<String, Value>) -> Self {
        Self::collect(raw.iter())
    }
}

impl From<NutrientSnapshot> for BTreeMap<String, f64> {
    fn from(s: NutrientSnapshot) -> Self {
        s.values
            .into_iter()
            .map(|(n, v)| (n.key().to_string(), v))
            .collect()
    }
}

/// Lenient numeric parse: numbers as-is, numeric strings trimmed and parsed.
/// `null`, booleans, garbage and non-finite values yield `None`.
pub fn parse_number(v: &Value) -> Option<f64> {
    let x = match v {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    x.is_finite().then_some(x)
}
