use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::allocation::domain::{
    Applicant, ApplicantId, ApplicationStatus, HouseId, HouseStatus, HousingUnit, UnitType,
};
use crate::workflows::allocation::repository::{
    AllocationLedger, AllocationRecord, ApplicantRepository, HouseRepository, RepositoryError,
};
use crate::workflows::allocation::{AllocationService, MatchScorer, Roster, ScoringPolicy};

pub(super) fn applied_on() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
}

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 15).expect("valid date")
}

pub(super) fn applicant(id: &str, household_size: u32, priority_tier: u8) -> Applicant {
    Applicant {
        id: ApplicantId(id.to_string()),
        name: format!("Applicant {id}"),
        age: 40,
        household_size,
        monthly_income: 12_000.0,
        priority_score: 80,
        priority_tier,
        needs: "3 bedrooms".to_string(),
        applied_on: applied_on(),
        contact: "+923001234567".to_string(),
        status: ApplicationStatus::Approved,
        allocated_house: None,
    }
}

pub(super) fn house(id: &str, bedrooms: u32) -> HousingUnit {
    HousingUnit {
        id: HouseId(id.to_string()),
        address: "123 Main Street, Karachi".to_string(),
        unit_type: UnitType::Apartment,
        bedrooms,
        floor_area: 1200,
        rent: 15_000.0,
        floor: 2,
        facilities: vec!["Parking".to_string(), "Security".to_string()],
        status: HouseStatus::Available,
        occupant: None,
    }
}

pub(super) fn scorer() -> MatchScorer {
    MatchScorer::new(ScoringPolicy::default())
}

pub(super) type MemoryService = AllocationService<MemoryApplicants, MemoryHouses, MemoryLedger>;

pub(super) fn build_service() -> (
    MemoryService,
    Arc<MemoryApplicants>,
    Arc<MemoryHouses>,
    Arc<MemoryLedger>,
) {
    build_service_with(Roster::default())
}

pub(super) fn sample_service() -> (
    MemoryService,
    Arc<MemoryApplicants>,
    Arc<MemoryHouses>,
    Arc<MemoryLedger>,
) {
    build_service_with(Roster::sample())
}

fn build_service_with(
    roster: Roster,
) -> (
    MemoryService,
    Arc<MemoryApplicants>,
    Arc<MemoryHouses>,
    Arc<MemoryLedger>,
) {
    let applicants = Arc::new(MemoryApplicants::seeded(roster.applicants));
    let houses = Arc::new(MemoryHouses::seeded(roster.houses));
    let ledger = Arc::new(MemoryLedger::default());
    let service = AllocationService::new(
        applicants.clone(),
        houses.clone(),
        ledger.clone(),
        ScoringPolicy::default(),
    );
    (service, applicants, houses, ledger)
}

#[derive(Default)]
pub(super) struct MemoryApplicants {
    records: Mutex<Vec<Applicant>>,
}

impl MemoryApplicants {
    pub(super) fn seeded(records: Vec<Applicant>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl ApplicantRepository for MemoryApplicants {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == applicant.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(applicant.clone());
        Ok(applicant)
    }

    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == applicant.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = applicant;
        Ok(())
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryHouses {
    records: Mutex<Vec<HousingUnit>>,
}

impl MemoryHouses {
    pub(super) fn seeded(records: Vec<HousingUnit>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }
}

impl HouseRepository for MemoryHouses {
    fn insert(&self, unit: HousingUnit) -> Result<HousingUnit, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == unit.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(unit.clone());
        Ok(unit)
    }

    fn update(&self, unit: HousingUnit) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == unit.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = unit;
        Ok(())
    }

    fn fetch(&self, id: &HouseId) -> Result<Option<HousingUnit>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn remove(&self, id: &HouseId) -> Result<HousingUnit, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let index = guard
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn all(&self) -> Result<Vec<HousingUnit>, RepositoryError> {
        Ok(self.records.lock().expect("repository mutex poisoned").clone())
    }
}

#[derive(Default)]
pub(super) struct MemoryLedger {
    entries: Mutex<Vec<AllocationRecord>>,
}

impl AllocationLedger for MemoryLedger {
    fn record(&self, entry: AllocationRecord) -> Result<(), RepositoryError> {
        self.entries
            .lock()
            .expect("ledger mutex poisoned")
            .push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<AllocationRecord>, RepositoryError> {
        Ok(self.entries.lock().expect("ledger mutex poisoned").clone())
    }
}

/// Ledger that refuses every write, for exercising the allocation rollback.
pub(super) struct OfflineLedger;

impl AllocationLedger for OfflineLedger {
    fn record(&self, _entry: AllocationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("ledger offline".to_string()))
    }

    fn entries(&self) -> Result<Vec<AllocationRecord>, RepositoryError> {
        Ok(Vec::new())
    }
}

/// House registry that serves reads but refuses every update.
pub(super) struct ReadOnlyHouses(pub(super) MemoryHouses);

impl HouseRepository for ReadOnlyHouses {
    fn insert(&self, unit: HousingUnit) -> Result<HousingUnit, RepositoryError> {
        self.0.insert(unit)
    }

    fn update(&self, _unit: HousingUnit) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("house registry read-only".to_string()))
    }

    fn fetch(&self, id: &HouseId) -> Result<Option<HousingUnit>, RepositoryError> {
        self.0.fetch(id)
    }

    fn remove(&self, id: &HouseId) -> Result<HousingUnit, RepositoryError> {
        self.0.remove(id)
    }

    fn all(&self) -> Result<Vec<HousingUnit>, RepositoryError> {
        self.0.all()
    }
}
