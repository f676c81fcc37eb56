use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{Applicant, ApplicantId, HouseId, HousingUnit};

/// Storage abstraction for applications so the service can run against any backing store.
pub trait ApplicantRepository: Send + Sync {
    fn insert(&self, applicant: Applicant) -> Result<Applicant, RepositoryError>;
    fn update(&self, applicant: Applicant) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, RepositoryError>;
    /// Every application in insertion order.
    fn all(&self) -> Result<Vec<Applicant>, RepositoryError>;
}

/// Storage abstraction for the house registry.
pub trait HouseRepository: Send + Sync {
    fn insert(&self, unit: HousingUnit) -> Result<HousingUnit, RepositoryError>;
    fn update(&self, unit: HousingUnit) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &HouseId) -> Result<Option<HousingUnit>, RepositoryError>;
    fn remove(&self, id: &HouseId) -> Result<HousingUnit, RepositoryError>;
    /// Every dwelling in insertion order.
    fn all(&self) -> Result<Vec<HousingUnit>, RepositoryError>;
}

/// Append-only record of confirmed allocations.
pub trait AllocationLedger: Send + Sync {
    fn record(&self, entry: AllocationRecord) -> Result<(), RepositoryError>;
    /// Entries in the order they were recorded.
    fn entries(&self) -> Result<Vec<AllocationRecord>, RepositoryError>;
}

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Ledger entry for a confirmed allocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub applicant_id: ApplicantId,
    pub house_id: HouseId,
    pub match_score: u8,
    pub allocated_by: String,
    pub allocated_on: NaiveDate,
}
