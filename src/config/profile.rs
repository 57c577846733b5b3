// src/config/profile.rs
//! Scoring profile: every tunable of the fallback algorithm, with hot-reload.
//!
//! TOML shape (all sections optional, missing keys fall back to defaults):
//! ```toml
//! [thresholds]
//! sugars = [4.5, 9, 13.5, 18, 22.5, 27, 31, 36, 40, 45]
//!
//! [whole_food]
//! min_fiber = 3.0
//! points = 3.0
//!
//! [nova]
//! ultra_processed_penalty = 5.0
//!
//! [confidence]
//! missing_negative_penalty = 10
//! ```
//!
//! Lookup order for the file: `$HEALTH_SCORE_PROFILE_PATH`, then
//! `config/scoring.toml`, then `config/scoring.json`, then built-in defaults.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
    time::SystemTime,
};
use tracing::{info, warn};

pub const ENV_PROFILE_PATH: &str = "HEALTH_SCORE_PROFILE_PATH";
pub const DEFAULT_PROFILE_TOML: &str = "config/scoring.toml";
pub const DEFAULT_PROFILE_JSON: &str = "config/scoring.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringProfile {
    pub thresholds: ThresholdTables,
    pub whole_food: WholeFoodBonus,
    pub nova: NovaAdjustments,
    pub confidence: ConfidencePolicy,
}

/// Ascending per-100 g thresholds; the index of the crossed tier is the point value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTables {
    pub sugars: Vec<f64>,
    pub saturated_fat: Vec<f64>,
    pub salt: Vec<f64>,
    /// kcal/100g
    pub energy_kcal: Vec<f64>,
    pub fiber: Vec<f64>,
    pub proteins: Vec<f64>,
}

impl Default for ThresholdTables {
    fn default() -> Self {
        Self {
            sugars: vec![4.5, 9.0, 13.5, 18.0, 22.5, 27.0, 31.0, 36.0, 40.0, 45.0],
            saturated_fat: vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0],
            salt: vec![
                0.225, 0.45, 0.675, 0.9, 1.125, 1.35, 1.575, 1.8, 2.025, 2.25,
            ],
            energy_kcal: vec![
                80.0, 160.0, 240.0, 320.0, 400.0, 480.0, 560.0, 640.0, 720.0, 800.0,
            ],
            fiber: vec![0.9, 1.9, 2.8, 3.7, 4.7],
            proteins: vec![1.6, 3.2, 4.8, 6.4, 8.0],
        }
    }
}

/// Flat bonus for products that look minimally processed. All bounds are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WholeFoodBonus {
    pub min_fiber: f64,
    pub max_energy_kcal: f64,
    pub max_saturated_fat: f64,
    pub max_sugars: f64,
    pub points: f64,
}

impl Default for WholeFoodBonus {
    fn default() -> Self {
        Self {
            min_fiber: 3.0,
            max_energy_kcal: 200.0,
            max_saturated_fat: 2.0,
            max_sugars: 10.0,
            points: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NovaAdjustments {
    /// Added to negative points for NOVA group 4.
    pub ultra_processed_penalty: f64,
    /// Added to positive points for NOVA group 1.
    pub unprocessed_bonus: f64,
}

impl Default for NovaAdjustments {
    fn default() -> Self {
        Self {
            ultra_processed_penalty: 5.0,
            unprocessed_bonus: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidencePolicy {
    /// Subtracted per missing sugar / saturated fat / salt / energy value.
    pub missing_negative_penalty: u8,
    /// Subtracted per missing fiber / protein value.
    pub missing_positive_penalty: u8,
    /// Below this confidence the score is pulled toward neutral (50).
    pub pull_below: u8,
    /// Label cut-offs (inclusive).
    pub high_at: u8,
    pub medium_at: u8,
}

impl Default for ConfidencePolicy {
    fn default() -> Self {
        Self {
            missing_negative_penalty: 10,
            missing_positive_penalty: 5,
            pull_below: 50,
            high_at: 80,
            medium_at: 60,
        }
    }
}

impl ScoringProfile {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let p: ScoringProfile = toml::from_str(s).context("parsing scoring profile TOML")?;
        p.validate()?;
        Ok(p)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let p: ScoringProfile = serde_json::from_str(s).context("parsing scoring profile JSON")?;
        p.validate()?;
        Ok(p)
    }

    /// Load from an explicit path; the extension picks the format (TOML unless `.json`).
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading scoring profile from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parsed = if ext == "json" {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        parsed.with_context(|| format!("invalid scoring profile at {}", path.display()))
    }

    /// Env var, then `config/scoring.toml`, then `config/scoring.json`, then defaults.
    pub fn load_default() -> Result<Self> {
        match resolve_profile_path()? {
            Some(p) => Self::load_from(&p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let t = &self.thresholds;
        for (name, table) in [
            ("sugars", &t.sugars),
            ("saturated_fat", &t.saturated_fat),
            ("salt", &t.salt),
            ("energy_kcal", &t.energy_kcal),
            ("fiber", &t.fiber),
            ("proteins", &t.proteins),
        ] {
            validate_table(name, table)?;
        }

        let w = &self.whole_food;
        for (name, v) in [
            ("whole_food.min_fiber", w.min_fiber),
            ("whole_food.max_energy_kcal", w.max_energy_kcal),
            ("whole_food.max_saturated_fat", w.max_saturated_fat),
            ("whole_food.max_sugars", w.max_sugars),
            ("whole_food.points", w.points),
            ("nova.ultra_processed_penalty", self.nova.ultra_processed_penalty),
            ("nova.unprocessed_bonus", self.nova.unprocessed_bonus),
        ] {
            if !v.is_finite() || v < 0.0 {
                bail!("{name} must be a non-negative number, got {v}");
            }
        }

        let c = &self.confidence;
        if c.medium_at > c.high_at {
            bail!(
                "confidence.medium_at ({}) must not exceed confidence.high_at ({})",
                c.medium_at,
                c.high_at
            );
        }
        if c.high_at > 100 || c.pull_below > 100 {
            bail!("confidence cut-offs must lie within 0..=100");
        }
        Ok(())
    }
}

fn validate_table(name: &str, table: &[f64]) -> Result<()> {
    if table.is_empty() {
        bail!("threshold table `{name}` is empty");
    }
    let mut prev = 0.0;
    for (i, &t) in table.iter().enumerate() {
        if !t.is_finite() || t <= prev {
            return Err(anyhow!(
                "threshold table `{name}` must be positive and strictly ascending (index {i}: {t})"
            ));
        }
        prev = t;
    }
    Ok(())
}

fn resolve_profile_path() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_PROFILE_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        bail!("{ENV_PROFILE_PATH} points to non-existent path {}", pb.display());
    }
    for candidate in [DEFAULT_PROFILE_TOML, DEFAULT_PROFILE_JSON] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return Ok(Some(pb));
        }
    }
    Ok(None)
}

/// Hot-reload wrapper: reloads when the profile file mtime changes.
/// A file that fails to parse or validate keeps the last good profile.
#[derive(Debug)]
pub struct HotReloadProfile {
    path: PathBuf,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    profile: Arc<ScoringProfile>,
    last_modified: Option<SystemTime>,
}

impl HotReloadProfile {
    /// Watch an explicit file. A missing file means built-in defaults until it appears.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            inner: RwLock::new(State {
                profile: Arc::new(ScoringProfile::default()),
                last_modified: None,
            }),
        }
    }

    /// Watch the file [`ScoringProfile::load_default`] would read.
    /// With nothing on disk, `config/scoring.toml` is watched so a later file is picked up.
    pub fn from_env() -> Result<Self> {
        let path = resolve_profile_path()?.unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILE_TOML));
        let hot = Self::new(path);
        // Load now so a broken file is reported at startup.
        hot.current();
        Ok(hot)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Latest profile, reloading first if the file changed on disk.
    pub fn current(&self) -> Arc<ScoringProfile> {
        let mtime = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(m) => m,
            // No file: keep whatever we have (defaults on first use).
            Err(_) => return self.read_state().profile.clone(),
        };

        {
            let guard = self.read_state();
            if guard.last_modified == Some(mtime) {
                return guard.profile.clone();
            }
        }

        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        // Double-check in case another caller reloaded meanwhile.
        if guard.last_modified != Some(mtime) {
            // Record the mtime either way so a broken file is reported once per change.
            guard.last_modified = Some(mtime);
            match ScoringProfile::load_from(&self.path) {
                Ok(p) => {
                    info!(target: "health_score", path = %self.path.display(), "scoring profile loaded");
                    guard.profile = Arc::new(p);
                }
                Err(e) => {
                    warn!(target: "health_score", path = %self.path.display(), error = %e, "keeping previous scoring profile");
                }
            }
        }
        guard.profile.clone()
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}
