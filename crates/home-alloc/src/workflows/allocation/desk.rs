use serde::Serialize;

use super::domain::{Applicant, HousingUnit};
use super::scoring::{MatchOutcome, MatchScorer};

/// Operator selection state for pairing one applicant with one house.
///
/// The desk owns copies of the selected records; it never touches storage.
/// Confirmation goes through [`super::AllocationService::confirm_selection`].
#[derive(Debug, Clone, Default)]
pub struct AllocationDesk {
    applicant: Option<Applicant>,
    house: Option<HousingUnit>,
}

impl AllocationDesk {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_applicant(&mut self, applicant: Applicant) {
        self.applicant = Some(applicant);
    }

    pub fn select_house(&mut self, house: HousingUnit) {
        self.house = Some(house);
    }

    pub fn clear_applicant(&mut self) {
        self.applicant = None;
    }

    pub fn clear_house(&mut self) {
        self.house = None;
    }

    pub fn reset(&mut self) {
        self.applicant = None;
        self.house = None;
    }

    pub fn applicant(&self) -> Option<&Applicant> {
        self.applicant.as_ref()
    }

    pub fn house(&self) -> Option<&HousingUnit> {
        self.house.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.applicant.is_some() && self.house.is_some()
    }

    /// Live match preview, or `None` until both sides are selected.
    pub fn preview(&self, scorer: &MatchScorer) -> Option<MatchPreview> {
        let applicant = self.applicant.as_ref()?;
        let house = self.house.as_ref()?;
        let outcome = scorer.score(applicant, house);

        Some(MatchPreview {
            applicant_label: format!("{} ({})", applicant.name, applicant.id),
            house_label: format!("{} - {}", house.id, house.unit_type.label()),
            can_confirm: outcome.accepted,
            outcome,
        })
    }
}

/// What the operator sees for the current selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchPreview {
    pub applicant_label: String,
    pub house_label: String,
    pub outcome: MatchOutcome,
    pub can_confirm: bool,
}
