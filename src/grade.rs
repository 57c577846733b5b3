//! grade.rs: Letter grades and the official signals a product database may supply
//! (Nutri-Score letter, NOVA processing group).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nutri-Score style letter grade, A (best) to E (worst).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::E];

    /// Lenient parse of an official grade: trimmed, single letter, case-insensitive.
    /// Placeholders such as "unknown" or "not-applicable" yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Grade::A),
            "B" => Some(Grade::B),
            "C" => Some(Grade::C),
            "D" => Some(Grade::D),
            "E" => Some(Grade::E),
            _ => None,
        }
    }

    /// Fixed 0–100 score used when the grade is official.
    pub fn official_score(self) -> u8 {
        match self {
            Grade::A => 100,
            Grade::B => 75,
            Grade::C => 50,
            Grade::D => 25,
            Grade::E => 0,
        }
    }

    /// A and B read as favourable in the UI.
    pub fn is_favourable(self) -> bool {
        matches!(self, Grade::A | Grade::B)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// NOVA food-processing classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovaGroup {
    Unprocessed,
    ProcessedCulinary,
    Processed,
    UltraProcessed,
}

impl NovaGroup {
    /// Map the integer group; anything outside 1..=4 is ignored.
    pub fn from_group(n: i64) -> Option<Self> {
        match n {
            1 => Some(NovaGroup::Unprocessed),
            2 => Some(NovaGroup::ProcessedCulinary),
            3 => Some(NovaGroup::Processed),
            4 => Some(NovaGroup::UltraProcessed),
            _ => None,
        }
    }

    pub fn group(self) -> u8 {
        match self {
            NovaGroup::Unprocessed => 1,
            NovaGroup::ProcessedCulinary => 2,
            NovaGroup::Processed => 3,
            NovaGroup::UltraProcessed => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive_and_trimmed() {
        assert_eq!(Grade::parse("b"), Some(Grade::B));
        assert_eq!(Grade::parse(" E "), Some(Grade::E));
        assert_eq!(Grade::parse(""), None);
        assert_eq!(Grade::parse("unknown"), None);
        assert_eq!(Grade::parse("F"), None);
    }

    #[test]
    fn official_mapping() {
        let scores: Vec<u8> = Grade::ALL.iter().map(|g| g.official_score()).collect();
        assert_eq!(scores, vec![100, 75, 50, 25, 0]);
    }

    #[test]
    fn nova_range() {
        assert_eq!(NovaGroup::from_group(4), Some(NovaGroup::UltraProcessed));
        assert_eq!(NovaGroup::from_group(1).map(NovaGroup::group), Some(1));
        assert_eq!(NovaGroup::from_group(0), None);
        assert_eq!(NovaGroup::from_group(5), None);
    }
}
