use serde::{Deserialize, Serialize};

use super::config::ScoringPolicy;

/// Qualitative remark on how the dwelling fits the household.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BedroomNote {
    GoodMatch,
    Adequate,
    Cramped,
}

impl BedroomNote {
    pub(crate) fn from_surplus(surplus: f64) -> Self {
        if surplus >= 1.0 {
            Self::GoodMatch
        } else if surplus >= 0.0 {
            Self::Adequate
        } else {
            Self::Cramped
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::GoodMatch => "Good bedroom match",
            Self::Adequate => "Adequate bedrooms",
            Self::Cramped => "Might be cramped",
        }
    }
}

/// Display bucket for a match score. Only the acceptance gate is binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchBand {
    Strong,
    Acceptable,
    Rejected,
}

impl MatchBand {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Strong => "Strong",
            Self::Acceptable => "Acceptable",
            Self::Rejected => "Rejected",
        }
    }
}

pub(crate) fn finalize_score(raw_total: f64) -> u8 {
    raw_total.clamp(0.0, 100.0).round() as u8
}

pub(crate) fn is_accepted(score: u8, policy: &ScoringPolicy) -> bool {
    score >= policy.acceptance_threshold
}

pub(crate) fn band_for(score: u8, policy: &ScoringPolicy) -> MatchBand {
    if !is_accepted(score, policy) {
        MatchBand::Rejected
    } else if score >= policy.strong_match_threshold {
        MatchBand::Strong
    } else {
        MatchBand::Acceptable
    }
}
