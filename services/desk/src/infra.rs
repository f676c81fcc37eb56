use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use home_alloc::config::AppConfig;
use home_alloc::error::AppError;
use home_alloc::workflows::allocation::{
    AllocationLedger, AllocationRecord, AllocationService, Applicant, ApplicantId,
    ApplicantRepository, ApplicationStatus, FamilySizeBand, HouseId, HouseRepository,
    HouseStatus, HousingUnit, PriorityBand, RepositoryError, ReviewAction, Roster, UnitType,
};

pub(crate) type DeskService =
    AllocationService<InMemoryApplicantRepository, InMemoryHouseRepository, InMemoryLedger>;

/// Roster source shared by every subcommand. The CLI only accepts both paths together.
#[derive(Debug, Clone, Default)]
pub(crate) struct RosterSource {
    pub(crate) csv_paths: Option<(PathBuf, PathBuf)>,
}

impl RosterSource {
    pub(crate) fn load(&self) -> Result<Roster, AppError> {
        match &self.csv_paths {
            Some((applicants, houses)) => Ok(Roster::from_paths(applicants, houses)?),
            None => Ok(Roster::sample()),
        }
    }
}

pub(crate) fn build_service(roster: Roster, config: &AppConfig) -> DeskService {
    AllocationService::new(
        Arc::new(InMemoryApplicantRepository::seeded(roster.applicants)),
        Arc::new(InMemoryHouseRepository::seeded(roster.houses)),
        Arc::new(InMemoryLedger::default()),
        config.scoring.clone(),
    )
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable("in-memory store poisoned".to_string()))
}

#[derive(Default)]
pub(crate) struct InMemoryApplicantRepository {
    records: Mutex<Vec<Applicant>>,
}

impl InMemoryApplicantRepository {
    fn seeded(records: Vec<Applicant>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl ApplicantRepository for InMemoryApplicantRepository {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.iter().any(|existing| existing.id == applicant.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(applicant.clone());
        Ok(applicant)
    }

    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == applicant.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = applicant;
        Ok(())
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(lock(&self.records)?.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryHouseRepository {
    records: Mutex<Vec<HousingUnit>>,
}

impl InMemoryHouseRepository {
    fn seeded(records: Vec<HousingUnit>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl HouseRepository for InMemoryHouseRepository {
    fn insert(&self, unit: HousingUnit) -> Result<HousingUnit, RepositoryError> {
        let mut guard = lock(&self.records)?;
        if guard.iter().any(|existing| existing.id == unit.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(unit.clone());
        Ok(unit)
    }

    fn update(&self, unit: HousingUnit) -> Result<(), RepositoryError> {
        let mut guard = lock(&self.records)?;
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == unit.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = unit;
        Ok(())
    }

    fn fetch(&self, id: &HouseId) -> Result<Option<HousingUnit>, RepositoryError> {
        let guard = lock(&self.records)?;
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn remove(&self, id: &HouseId) -> Result<HousingUnit, RepositoryError> {
        let mut guard = lock(&self.records)?;
        let index = guard
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn all(&self) -> Result<Vec<HousingUnit>, RepositoryError> {
        Ok(lock(&self.records)?.clone())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryLedger {
    entries: Mutex<Vec<AllocationRecord>>,
}

impl AllocationLedger for InMemoryLedger {
    fn record(&self, entry: AllocationRecord) -> Result<(), RepositoryError> {
        lock(&self.entries)?.push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<AllocationRecord>, RepositoryError> {
        Ok(lock(&self.entries)?.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_application_status(raw: &str) -> Result<ApplicationStatus, String> {
    ApplicationStatus::parse(raw).ok_or_else(|| {
        format!("unknown status '{raw}' (pending, reviewed, approved, rejected, allocated)")
    })
}

pub(crate) fn parse_house_status(raw: &str) -> Result<HouseStatus, String> {
    HouseStatus::parse(raw)
        .ok_or_else(|| format!("unknown status '{raw}' (available, occupied, maintenance)"))
}

pub(crate) fn parse_priority(raw: &str) -> Result<PriorityBand, String> {
    PriorityBand::parse(raw).ok_or_else(|| format!("unknown priority '{raw}' (high, medium, low)"))
}

pub(crate) fn parse_family(raw: &str) -> Result<FamilySizeBand, String> {
    FamilySizeBand::parse(raw).ok_or_else(|| format!("unknown family band '{raw}' (1-3, 4-6, 7+)"))
}

pub(crate) fn parse_unit_type(raw: &str) -> Result<UnitType, String> {
    Ok(UnitType::parse(raw))
}

pub(crate) fn parse_review_action(raw: &str) -> Result<ReviewAction, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "approve" => Ok(ReviewAction::Approve),
        "reject" => Ok(ReviewAction::Reject),
        "review" | "mark-reviewed" => Ok(ReviewAction::MarkReviewed),
        "pending" | "return-to-pending" => Ok(ReviewAction::ReturnToPending),
        _ => Err(format!(
            "unknown action '{raw}' (approve, reject, mark-reviewed, return-to-pending)"
        )),
    }
}
