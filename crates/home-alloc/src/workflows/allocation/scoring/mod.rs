mod config;
mod policy;
mod rules;

pub use config::ScoringPolicy;
pub use policy::{BedroomNote, MatchBand};

use super::domain::{Applicant, ApplicantId, HouseId, HousingUnit};
use policy::{band_for, finalize_score, is_accepted};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Stateless scorer that applies the scoring policy to one applicant/house pair.
///
/// Scoring is pure: identical inputs always produce identical outcomes, and the
/// scorer can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct MatchScorer {
    policy: ScoringPolicy,
}

impl MatchScorer {
    pub fn new(policy: ScoringPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Score a pair. Callers must keep household size and bedroom count positive.
    pub fn score(&self, applicant: &Applicant, unit: &HousingUnit) -> MatchOutcome {
        let (components, raw_total, signals) = rules::score_pair(applicant, unit, &self.policy);

        let score = finalize_score(raw_total);
        let note = BedroomNote::from_surplus(signals.bedroom_surplus);
        let accepted = is_accepted(score, &self.policy);

        debug!(
            applicant = %applicant.id,
            house = %unit.id,
            raw_total,
            score,
            target_bedrooms = signals.target_bedrooms,
            "scored allocation pair"
        );

        MatchOutcome {
            applicant_id: applicant.id.clone(),
            house_id: unit.id.clone(),
            score,
            note,
            accepted,
            band: band_for(score, &self.policy),
            components,
        }
    }

    /// Like [`MatchScorer::score`], but rejects records with a zero household
    /// size or bedroom count instead of producing a meaningless score.
    pub fn try_score(
        &self,
        applicant: &Applicant,
        unit: &HousingUnit,
    ) -> Result<MatchOutcome, ScoringError> {
        if applicant.household_size == 0 {
            return Err(ScoringError::InvalidInput {
                field: "household_size",
                record: applicant.id.0.clone(),
            });
        }
        if unit.bedrooms == 0 {
            return Err(ScoringError::InvalidInput {
                field: "bedrooms",
                record: unit.id.0.clone(),
            });
        }
        Ok(self.score(applicant, unit))
    }
}

/// Factors contributing to a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchFactor {
    BedroomFit,
    PriorityBonus,
}

/// Discrete contribution to a match score, kept for operator audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: MatchFactor,
    pub points: f64,
    pub notes: String,
}

/// Result of scoring one applicant/house pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    pub applicant_id: ApplicantId,
    pub house_id: HouseId,
    /// 0..=100 after clamping and rounding.
    pub score: u8,
    pub note: BedroomNote,
    /// `score >= acceptance_threshold`.
    pub accepted: bool,
    pub band: MatchBand,
    pub components: Vec<ScoreComponent>,
}

impl MatchOutcome {
    pub fn summary(&self) -> String {
        format!(
            "{}/100 ({}), {}",
            self.score,
            self.band.label(),
            self.note.label()
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("{record} has a non-positive {field}")]
    InvalidInput { field: &'static str, record: String },
}
