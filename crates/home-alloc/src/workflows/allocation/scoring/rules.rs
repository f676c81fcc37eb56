use super::super::domain::{Applicant, HousingUnit};
use super::config::ScoringPolicy;
use super::{MatchFactor, ScoreComponent};

pub(crate) struct MatchSignals {
    /// Half the household size, unrounded.
    pub target_bedrooms: f64,
    /// `unit.bedrooms - target_bedrooms`.
    pub bedroom_surplus: f64,
}

pub(crate) fn score_pair(
    applicant: &Applicant,
    unit: &HousingUnit,
    policy: &ScoringPolicy,
) -> (Vec<ScoreComponent>, f64, MatchSignals) {
    let mut components = Vec::with_capacity(2);
    let mut raw_total = policy.base_score;

    let target_bedrooms = applicant.household_size as f64 / 2.0;
    let bedrooms = unit.bedrooms as f64;
    let deficit = (target_bedrooms - bedrooms).abs();

    let fit = (policy.bedroom_fit_cap - deficit * policy.bedroom_penalty_per_room).max(0.0);
    components.push(ScoreComponent {
        factor: MatchFactor::BedroomFit,
        points: fit,
        notes: format!(
            "{} bedroom(s) against a target of {:.1} (off by {:.1})",
            unit.bedrooms, target_bedrooms, deficit
        ),
    });
    raw_total += fit;

    // Tiers past the pivot subtract points.
    let tier_gap = policy.priority_pivot_tier as f64 - applicant.priority_tier as f64;
    let bonus = tier_gap * policy.priority_bonus_per_tier;
    components.push(ScoreComponent {
        factor: MatchFactor::PriorityBonus,
        points: bonus,
        notes: format!("priority tier {}", applicant.priority_tier),
    });
    raw_total += bonus;

    let signals = MatchSignals {
        target_bedrooms,
        bedroom_surplus: bedrooms - target_bedrooms,
    };

    (components, raw_total, signals)
}
