// src/config/mod.rs
pub mod profile;

pub use profile::{
    ConfidencePolicy, HotReloadProfile, NovaAdjustments, ScoringProfile, ThresholdTables,
    WholeFoodBonus,
};
