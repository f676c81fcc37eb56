//! Application review, house registry, and match-scored allocation.
//!
//! The [`MatchScorer`] is the pure core: it scores one applicant against one
//! house. Everything else here is bookkeeping around it: the operator's
//! [`AllocationDesk`] selection, list filters, and the [`AllocationService`]
//! that confirms allocations against the storage seams in [`repository`].

pub mod desk;
pub mod domain;
pub mod filters;
pub mod location;
pub mod priority;
pub mod repository;
pub mod roster;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use desk::{AllocationDesk, MatchPreview};
pub use domain::{
    Applicant, ApplicantId, ApplicationIntake, ApplicationStatus, HouseId, HouseStatus,
    HousingUnit, NewHouse, PriorityBand, UnitType,
};
pub use filters::{ApplicationFilter, FamilySizeBand, HouseFilter};
pub use location::{LocationError, LocationGraph, NearbyHouse};
pub use repository::{
    AllocationLedger, AllocationRecord, ApplicantRepository, HouseRepository, RepositoryError,
};
pub use roster::{Roster, RosterImportError};
pub use scoring::{
    BedroomNote, MatchBand, MatchFactor, MatchOutcome, MatchScorer, ScoreComponent, ScoringError,
    ScoringPolicy,
};
pub use service::{
    AllocationReceipt, AllocationRequest, AllocationService, AllocationServiceError,
    DashboardStats, ReviewAction, Suggestion, WaitingListEntry,
};
