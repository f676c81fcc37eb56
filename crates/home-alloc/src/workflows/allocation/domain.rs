use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for housing applications (`APP-001`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for dwellings in the registry (`H-101`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HouseId(pub String);

impl fmt::Display for HouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Household applying for housing assistance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub age: u8,
    pub household_size: u32,
    pub monthly_income: f64,
    pub priority_score: u8,
    /// 1 is the most urgent tier.
    pub priority_tier: u8,
    pub needs: String,
    pub applied_on: NaiveDate,
    pub contact: String,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allocated_house: Option<HouseId>,
}

impl Applicant {
    pub fn priority_band(&self) -> PriorityBand {
        PriorityBand::from_score(self.priority_score)
    }

    /// Approved and still waiting for a house.
    pub fn is_eligible(&self) -> bool {
        self.status == ApplicationStatus::Approved && self.allocated_house.is_none()
    }
}

/// Dwelling available (or not) for allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HousingUnit {
    pub id: HouseId,
    pub address: String,
    pub unit_type: UnitType,
    pub bedrooms: u32,
    /// Square feet.
    pub floor_area: u32,
    pub rent: f64,
    pub floor: i32,
    pub facilities: Vec<String>,
    pub status: HouseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupant: Option<ApplicantId>,
}

impl HousingUnit {
    pub fn is_available(&self) -> bool {
        self.status == HouseStatus::Available
    }
}

/// Dwelling categories tracked by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitType {
    Apartment,
    House,
    Duplex,
    Other(String),
}

impl UnitType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "apartment" => Self::Apartment,
            "house" => Self::House,
            "duplex" => Self::Duplex,
            _ => Self::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Apartment => "apartment",
            Self::House => "house",
            Self::Duplex => "duplex",
            Self::Other(label) => label,
        }
    }
}

/// Review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    Pending,
    Reviewed,
    Approved,
    Rejected,
    Allocated,
}

impl ApplicationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Allocated => "allocated",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "reviewed" => Some(Self::Reviewed),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "allocated" => Some(Self::Allocated),
            _ => None,
        }
    }
}

/// Occupancy state of a dwelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HouseStatus {
    Available,
    Occupied,
    Maintenance,
}

impl HouseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "available" => Some(Self::Available),
            "occupied" => Some(Self::Occupied),
            "maintenance" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

/// Coarse urgency bucket derived from the intake priority score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityBand {
    High,
    Medium,
    Low,
}

impl PriorityBand {
    pub const fn from_score(score: u8) -> Self {
        if score >= 90 {
            Self::High
        } else if score >= 75 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Priority tier used by match scoring.
    pub const fn tier(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

/// Intake form payload before an id and priority are assigned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationIntake {
    pub name: String,
    pub age: u8,
    pub household_size: u32,
    pub monthly_income: f64,
    pub needs: String,
    pub contact: String,
    pub applied_on: NaiveDate,
}

/// Registry request for a new dwelling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewHouse {
    /// Generated when absent.
    pub id: Option<HouseId>,
    pub address: String,
    pub unit_type: UnitType,
    pub bedrooms: u32,
    pub floor_area: u32,
    pub rent: f64,
    pub floor: i32,
    /// Registry defaults apply when empty.
    pub facilities: Vec<String>,
    pub status: Option<HouseStatus>,
}
