//! In-memory repositories shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use home_alloc::workflows::allocation::{
    AllocationLedger, AllocationRecord, AllocationService, Applicant, ApplicantId,
    ApplicantRepository, HouseId, HouseRepository, HousingUnit, RepositoryError, Roster,
    ScoringPolicy,
};

pub type Service = AllocationService<Registry, Houses, Ledger>;

pub fn service(roster: Roster) -> (Service, Arc<Registry>, Arc<Houses>, Arc<Ledger>) {
    service_with(roster, ScoringPolicy::default())
}

pub fn service_with(
    roster: Roster,
    policy: ScoringPolicy,
) -> (Service, Arc<Registry>, Arc<Houses>, Arc<Ledger>) {
    let registry = Arc::new(Registry::seeded(roster.applicants));
    let houses = Arc::new(Houses::seeded(roster.houses));
    let ledger = Arc::new(Ledger::default());
    let service = AllocationService::new(registry.clone(), houses.clone(), ledger.clone(), policy);
    (service, registry, houses, ledger)
}

pub struct Registry(Mutex<Vec<Applicant>>);

impl Registry {
    pub fn seeded(records: Vec<Applicant>) -> Self {
        Self(Mutex::new(records))
    }
}

impl ApplicantRepository for Registry {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError> {
        self.0.lock().expect("registry mutex").push(applicant.clone());
        Ok(applicant)
    }

    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError> {
        let mut guard = self.0.lock().expect("registry mutex");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == applicant.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = applicant;
        Ok(())
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError> {
        let guard = self.0.lock().expect("registry mutex");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn all(&self) -> Result<Vec<Applicant>, RepositoryError> {
        Ok(self.0.lock().expect("registry mutex").clone())
    }
}

pub struct Houses(Mutex<Vec<HousingUnit>>);

impl Houses {
    pub fn seeded(records: Vec<HousingUnit>) -> Self {
        Self(Mutex::new(records))
    }
}

impl HouseRepository for Houses {
    fn insert(&self, unit: HousingUnit) -> Result<HousingUnit, RepositoryError> {
        self.0.lock().expect("houses mutex").push(unit.clone());
        Ok(unit)
    }

    fn update(&self, unit: HousingUnit) -> Result<(), RepositoryError> {
        let mut guard = self.0.lock().expect("houses mutex");
        let slot = guard
            .iter_mut()
            .find(|existing| existing.id == unit.id)
            .ok_or(RepositoryError::NotFound)?;
        *slot = unit;
        Ok(())
    }

    fn fetch(&self, id: &HouseId) -> Result<Option<HousingUnit>, RepositoryError> {
        let guard = self.0.lock().expect("houses mutex");
        Ok(guard.iter().find(|existing| &existing.id == id).cloned())
    }

    fn remove(&self, id: &HouseId) -> Result<HousingUnit, RepositoryError> {
        let mut guard = self.0.lock().expect("houses mutex");
        let index = guard
            .iter()
            .position(|existing| &existing.id == id)
            .ok_or(RepositoryError::NotFound)?;
        Ok(guard.remove(index))
    }

    fn all(&self) -> Result<Vec<HousingUnit>, RepositoryError> {
        Ok(self.0.lock().expect("houses mutex").clone())
    }
}

#[derive(Default)]
pub struct Ledger(Mutex<Vec<AllocationRecord>>);

impl AllocationLedger for Ledger {
    fn record(&self, entry: AllocationRecord) -> Result<(), RepositoryError> {
        self.0.lock().expect("ledger mutex").push(entry);
        Ok(())
    }

    fn entries(&self) -> Result<Vec<AllocationRecord>, RepositoryError> {
        Ok(self.0.lock().expect("ledger mutex").clone())
    }
}
