use serde::{Deserialize, Serialize};

/// Tunable policy values behind match scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub base_score: f64,
    /// Most points the bedroom fit can contribute.
    pub bedroom_fit_cap: f64,
    /// Points lost per bedroom of deficit.
    pub bedroom_penalty_per_room: f64,
    /// Tier at which the priority bonus reaches zero.
    pub priority_pivot_tier: u8,
    pub priority_bonus_per_tier: f64,
    pub acceptance_threshold: u8,
    pub strong_match_threshold: u8,
    pub suggestion_threshold: u8,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            base_score: 50.0,
            bedroom_fit_cap: 40.0,
            bedroom_penalty_per_room: 10.0,
            priority_pivot_tier: 4,
            priority_bonus_per_tier: 5.0,
            acceptance_threshold: 60,
            strong_match_threshold: 80,
            suggestion_threshold: 70,
        }
    }
}
