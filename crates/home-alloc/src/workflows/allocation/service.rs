use std::cmp::Reverse;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::desk::AllocationDesk;
use super::domain::{
    Applicant, ApplicantId, ApplicationIntake, ApplicationStatus, HouseId, HouseStatus,
    HousingUnit, NewHouse,
};
use super::filters::{ApplicationFilter, HouseFilter};
use super::location::{LocationGraph, NearbyHouse};
use super::priority;
use super::repository::{
    AllocationLedger, AllocationRecord, ApplicantRepository, HouseRepository, RepositoryError,
};
use super::scoring::{MatchOutcome, MatchScorer, ScoringError, ScoringPolicy};

const APPLICANT_ID_PREFIX: &str = "APP-";
const HOUSE_ID_PREFIX: &str = "H-";
const FIRST_HOUSE_NUMBER: u32 = 101;
const SUGGESTION_APPLICANT_WINDOW: usize = 5;
const SUGGESTION_HOUSE_WINDOW: usize = 3;
const SUGGESTION_LIMIT: usize = 5;
const RECENT_ACTIVITY_LIMIT: usize = 3;

pub const DEFAULT_FACILITIES: [&str; 3] = ["Parking", "Water", "Electricity"];

/// Service composing the repositories, the allocation ledger, and the match scorer.
pub struct AllocationService<A, H, L> {
    applicants: Arc<A>,
    houses: Arc<H>,
    ledger: Arc<L>,
    scorer: MatchScorer,
}

impl<A, H, L> AllocationService<A, H, L>
where
    A: ApplicantRepository + 'static,
    H: HouseRepository + 'static,
    L: AllocationLedger + 'static,
{
    pub fn new(applicants: Arc<A>, houses: Arc<H>, ledger: Arc<L>, policy: ScoringPolicy) -> Self {
        Self {
            applicants,
            houses,
            ledger,
            scorer: MatchScorer::new(policy),
        }
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    /// Record a new application with its intake priority.
    pub fn register_application(
        &self,
        intake: ApplicationIntake,
    ) -> Result<Applicant, AllocationServiceError> {
        let existing = self.applicants.all()?;
        let id = ApplicantId(next_id(
            APPLICANT_ID_PREFIX,
            existing.iter().map(|applicant| applicant.id.0.as_str()),
            1,
        )?);
        let assessment = priority::assess(intake.age, intake.household_size, intake.monthly_income);

        let applicant = Applicant {
            id,
            name: intake.name,
            age: intake.age,
            household_size: intake.household_size,
            monthly_income: intake.monthly_income,
            priority_score: assessment.score,
            priority_tier: assessment.tier,
            needs: intake.needs,
            applied_on: intake.applied_on,
            contact: intake.contact,
            status: ApplicationStatus::Pending,
            allocated_house: None,
        };

        let stored = self.applicants.insert(applicant)?;
        info!(
            applicant = %stored.id,
            priority_score = stored.priority_score,
            "application registered"
        );
        Ok(stored)
    }

    /// Apply an operator review decision to an application.
    pub fn review(
        &self,
        id: &ApplicantId,
        action: ReviewAction,
    ) -> Result<Applicant, AllocationServiceError> {
        let mut applicant = self.applicant(id)?;

        let blocked = applicant.status == ApplicationStatus::Allocated
            || (action == ReviewAction::Reject
                && applicant.status == ApplicationStatus::Rejected);
        if blocked {
            return Err(AllocationServiceError::InvalidTransition {
                id: id.clone(),
                action: action.label(),
                status: applicant.status.label(),
            });
        }

        applicant.status = action.target_status();
        self.applicants.update(applicant.clone())?;
        info!(applicant = %id, status = applicant.status.label(), "application reviewed");
        Ok(applicant)
    }

    pub fn applications(
        &self,
        filter: &ApplicationFilter,
    ) -> Result<Vec<Applicant>, AllocationServiceError> {
        let all = self.applicants.all()?;
        Ok(all
            .into_iter()
            .filter(|applicant| filter.matches(applicant))
            .collect())
    }

    /// Approved applications without a house, most urgent first.
    pub fn eligible_applicants(&self) -> Result<Vec<Applicant>, AllocationServiceError> {
        let mut eligible: Vec<Applicant> = self
            .applicants
            .all()?
            .into_iter()
            .filter(Applicant::is_eligible)
            .collect();
        sort_by_urgency(&mut eligible);
        Ok(eligible)
    }

    pub fn waiting_list(&self) -> Result<Vec<WaitingListEntry>, AllocationServiceError> {
        let mut all = self.applicants.all()?;
        sort_by_urgency(&mut all);
        Ok(all
            .into_iter()
            .enumerate()
            .map(|(index, applicant)| WaitingListEntry {
                position: index + 1,
                applicant,
            })
            .collect())
    }

    pub fn register_house(&self, request: NewHouse) -> Result<HousingUnit, AllocationServiceError> {
        let id = match request.id {
            Some(id) => id,
            None => {
                let existing = self.houses.all()?;
                HouseId(next_id(
                    HOUSE_ID_PREFIX,
                    existing.iter().map(|unit| unit.id.0.as_str()),
                    FIRST_HOUSE_NUMBER,
                )?)
            }
        };
        let facilities = if request.facilities.is_empty() {
            DEFAULT_FACILITIES.iter().map(|tag| tag.to_string()).collect()
        } else {
            request.facilities
        };

        let unit = HousingUnit {
            id,
            address: request.address,
            unit_type: request.unit_type,
            bedrooms: request.bedrooms,
            floor_area: request.floor_area,
            rent: request.rent,
            floor: request.floor,
            facilities,
            status: request.status.unwrap_or(HouseStatus::Available),
            occupant: None,
        };

        let stored = self.houses.insert(unit)?;
        info!(house = %stored.id, "house registered");
        Ok(stored)
    }

    pub fn remove_house(&self, id: &HouseId) -> Result<HousingUnit, AllocationServiceError> {
        let unit = self.house(id)?;
        if unit.status == HouseStatus::Occupied {
            return Err(AllocationServiceError::HouseOccupied(id.clone()));
        }
        let removed = self.houses.remove(id)?;
        info!(house = %id, "house removed");
        Ok(removed)
    }

    pub fn houses(&self, filter: &HouseFilter) -> Result<Vec<HousingUnit>, AllocationServiceError> {
        let all = self.houses.all()?;
        Ok(all.into_iter().filter(|unit| filter.matches(unit)).collect())
    }

    pub fn available_houses(&self) -> Result<Vec<HousingUnit>, AllocationServiceError> {
        self.houses(&HouseFilter {
            status: Some(HouseStatus::Available),
            ..HouseFilter::default()
        })
    }

    /// Available houses within `max_distance` of a registered house, nearest first.
    pub fn nearby_available_houses(
        &self,
        graph: &LocationGraph,
        origin: &HouseId,
        max_distance: f64,
    ) -> Result<Vec<NearbyHouse>, AllocationServiceError> {
        self.house(origin)?;
        let available: Vec<HouseId> = self
            .available_houses()?
            .into_iter()
            .map(|unit| unit.id)
            .collect();
        Ok(graph
            .nearby(origin, max_distance)
            .into_iter()
            .filter(|nearby| available.contains(&nearby.house_id))
            .collect())
    }

    /// Score a stored applicant against a stored house without changing either.
    pub fn preview(
        &self,
        applicant_id: &ApplicantId,
        house_id: &HouseId,
    ) -> Result<MatchOutcome, AllocationServiceError> {
        let applicant = self.applicant(applicant_id)?;
        let house = self.house(house_id)?;
        Ok(self.scorer.try_score(&applicant, &house)?)
    }

    /// Confirm an allocation, updating both records and the ledger.
    pub fn allocate(
        &self,
        request: AllocationRequest,
    ) -> Result<AllocationReceipt, AllocationServiceError> {
        let applicant = self.applicant(&request.applicant_id)?;
        let house = self.house(&request.house_id)?;

        if !applicant.is_eligible() {
            warn!(applicant = %applicant.id, status = applicant.status.label(), "allocation refused");
            return Err(AllocationServiceError::ApplicantNotEligible {
                id: applicant.id,
                status: applicant.status.label(),
            });
        }
        if !house.is_available() {
            warn!(house = %house.id, status = house.status.label(), "allocation refused");
            return Err(AllocationServiceError::HouseUnavailable {
                id: house.id,
                status: house.status.label(),
            });
        }

        let outcome = self.scorer.try_score(&applicant, &house)?;
        if !outcome.accepted {
            warn!(
                applicant = %applicant.id,
                house = %house.id,
                score = outcome.score,
                "allocation refused below acceptance threshold"
            );
            return Err(AllocationServiceError::BelowThreshold {
                score: outcome.score,
                threshold: self.scorer.policy().acceptance_threshold,
            });
        }

        let mut allocated_applicant = applicant.clone();
        allocated_applicant.status = ApplicationStatus::Allocated;
        allocated_applicant.allocated_house = Some(house.id.clone());

        let mut occupied_house = house.clone();
        occupied_house.status = HouseStatus::Occupied;
        occupied_house.occupant = Some(applicant.id.clone());

        let record = AllocationRecord {
            applicant_id: applicant.id.clone(),
            house_id: house.id.clone(),
            match_score: outcome.score,
            allocated_by: request.allocated_by,
            allocated_on: request.allocated_on,
        };

        self.applicants.update(allocated_applicant)?;
        if let Err(err) = self.houses.update(occupied_house) {
            self.roll_back(&applicant, None);
            return Err(err.into());
        }
        if let Err(err) = self.ledger.record(record.clone()) {
            self.roll_back(&applicant, Some(&house));
            return Err(err.into());
        }

        info!(
            applicant = %record.applicant_id,
            house = %record.house_id,
            score = record.match_score,
            allocated_by = %record.allocated_by,
            "house allocated"
        );

        Ok(AllocationReceipt {
            message: format!("House {} allocated to {}", house.id, applicant.name),
            applicant_name: applicant.name,
            address: house.address,
            record,
            outcome,
        })
    }

    /// Allocate the desk's current pair and clear the desk on success.
    pub fn confirm_selection(
        &self,
        desk: &mut AllocationDesk,
        allocated_by: &str,
        allocated_on: NaiveDate,
    ) -> Result<AllocationReceipt, AllocationServiceError> {
        let (applicant_id, house_id) = match (desk.applicant(), desk.house()) {
            (Some(applicant), Some(house)) => (applicant.id.clone(), house.id.clone()),
            _ => return Err(AllocationServiceError::NothingSelected),
        };

        let receipt = self.allocate(AllocationRequest {
            applicant_id,
            house_id,
            allocated_by: allocated_by.to_string(),
            allocated_on,
        })?;
        desk.reset();
        Ok(receipt)
    }

    /// First good pairing for the most urgent applicants. Nothing is allocated.
    pub fn suggestions(&self) -> Result<Vec<Suggestion>, AllocationServiceError> {
        let applicants = self.eligible_applicants()?;
        let houses = self.available_houses()?;
        let threshold = self.scorer.policy().suggestion_threshold;

        let mut suggestions = Vec::new();
        for applicant in applicants.iter().take(SUGGESTION_APPLICANT_WINDOW) {
            let best = houses
                .iter()
                .take(SUGGESTION_HOUSE_WINDOW)
                .filter_map(|house| self.scorer.try_score(applicant, house).ok())
                .find(|outcome| outcome.score >= threshold);

            if let Some(outcome) = best {
                suggestions.push(Suggestion {
                    applicant_name: applicant.name.clone(),
                    outcome,
                });
            }
            if suggestions.len() == SUGGESTION_LIMIT {
                break;
            }
        }
        Ok(suggestions)
    }

    pub fn dashboard(&self, today: NaiveDate) -> Result<DashboardStats, AllocationServiceError> {
        let applicants = self.applicants.all()?;
        let houses = self.houses.all()?;
        let entries = self.ledger.entries()?;

        Ok(DashboardStats {
            total_applications: applicants.len(),
            pending_applications: applicants
                .iter()
                .filter(|applicant| applicant.status == ApplicationStatus::Pending)
                .count(),
            available_houses: houses.iter().filter(|unit| unit.is_available()).count(),
            allocated_today: entries
                .iter()
                .filter(|entry| entry.allocated_on == today)
                .count(),
            recent_allocations: entries.into_iter().rev().take(RECENT_ACTIVITY_LIMIT).collect(),
        })
    }

    fn applicant(&self, id: &ApplicantId) -> Result<Applicant, AllocationServiceError> {
        self.applicants
            .fetch(id)?
            .ok_or_else(|| AllocationServiceError::ApplicantNotFound(id.clone()))
    }

    fn house(&self, id: &HouseId) -> Result<HousingUnit, AllocationServiceError> {
        self.houses
            .fetch(id)?
            .ok_or_else(|| AllocationServiceError::HouseNotFound(id.clone()))
    }

    fn roll_back(&self, applicant: &Applicant, house: Option<&HousingUnit>) {
        if let Err(err) = self.applicants.update(applicant.clone()) {
            warn!(applicant = %applicant.id, error = %err, "failed to restore application");
        }
        if let Some(house) = house {
            if let Err(err) = self.houses.update(house.clone()) {
                warn!(house = %house.id, error = %err, "failed to restore house");
            }
        }
    }
}

fn sort_by_urgency(applicants: &mut [Applicant]) {
    applicants.sort_by_key(|applicant| (Reverse(applicant.priority_score), applicant.applied_on));
}

fn next_id<'a, I>(
    prefix: &'static str,
    existing: I,
    first: u32,
) -> Result<String, AllocationServiceError>
where
    I: Iterator<Item = &'a str>,
{
    let next = match existing
        .filter_map(|id| id.strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
    {
        Some(highest) => highest
            .checked_add(1)
            .ok_or(AllocationServiceError::IdsExhausted { prefix })?,
        None => first,
    };
    Ok(format!("{prefix}{next:03}"))
}

/// Review decisions available to an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewAction {
    Approve,
    Reject,
    MarkReviewed,
    ReturnToPending,
}

impl ReviewAction {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
            Self::MarkReviewed => "mark reviewed",
            Self::ReturnToPending => "return to pending",
        }
    }

    const fn target_status(self) -> ApplicationStatus {
        match self {
            Self::Approve => ApplicationStatus::Approved,
            Self::Reject => ApplicationStatus::Rejected,
            Self::MarkReviewed => ApplicationStatus::Reviewed,
            Self::ReturnToPending => ApplicationStatus::Pending,
        }
    }
}

/// Operator confirmation of a pairing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub applicant_id: ApplicantId,
    pub house_id: HouseId,
    pub allocated_by: String,
    pub allocated_on: NaiveDate,
}

/// Result handed back to the presentation layer after a confirmed allocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReceipt {
    pub message: String,
    pub applicant_name: String,
    pub address: String,
    pub record: AllocationRecord,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitingListEntry {
    pub position: usize,
    pub applicant: Applicant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub applicant_name: String,
    pub outcome: MatchOutcome,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_applications: usize,
    pub pending_applications: usize,
    pub available_houses: usize,
    pub allocated_today: usize,
    /// Newest first.
    pub recent_allocations: Vec<AllocationRecord>,
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error("application {0} not found")]
    ApplicantNotFound(ApplicantId),
    #[error("house {0} not found")]
    HouseNotFound(HouseId),
    #[error("application {id} is {status} and cannot be allocated")]
    ApplicantNotEligible { id: ApplicantId, status: &'static str },
    #[error("house {id} is {status} and cannot be allocated")]
    HouseUnavailable { id: HouseId, status: &'static str },
    #[error("match score {score} is below the acceptance threshold of {threshold}")]
    BelowThreshold { score: u8, threshold: u8 },
    #[error("cannot {action} application {id} while it is {status}")]
    InvalidTransition {
        id: ApplicantId,
        action: &'static str,
        status: &'static str,
    },
    #[error("house {0} is occupied and cannot be removed")]
    HouseOccupied(HouseId),
    #[error("select both an applicant and a house before confirming")]
    NothingSelected,
    #[error("no {prefix} identifiers left to assign")]
    IdsExhausted { prefix: &'static str },
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
