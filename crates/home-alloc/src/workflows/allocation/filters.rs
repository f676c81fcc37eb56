use serde::{Deserialize, Serialize};

use super::domain::{
    Applicant, ApplicationStatus, HouseStatus, HousingUnit, PriorityBand, UnitType,
};

/// Household size buckets offered on the applications screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FamilySizeBand {
    #[serde(rename = "1-3")]
    Small,
    #[serde(rename = "4-6")]
    Medium,
    #[serde(rename = "7+")]
    Large,
}

impl FamilySizeBand {
    pub fn contains(self, household_size: u32) -> bool {
        match self {
            Self::Small => (1..=3).contains(&household_size),
            Self::Medium => (4..=6).contains(&household_size),
            Self::Large => household_size >= 7,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Small => "1-3",
            Self::Medium => "4-6",
            Self::Large => "7+",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "1-3" => Some(Self::Small),
            "4-6" => Some(Self::Medium),
            "7+" => Some(Self::Large),
            _ => None,
        }
    }
}

/// Criteria for narrowing the application list. `None` means "all".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationFilter {
    pub status: Option<ApplicationStatus>,
    pub priority: Option<PriorityBand>,
    pub family: Option<FamilySizeBand>,
}

impl ApplicationFilter {
    pub fn matches(&self, applicant: &Applicant) -> bool {
        if let Some(status) = self.status {
            if applicant.status != status {
                return false;
            }
        }
        if let Some(band) = self.priority {
            if applicant.priority_band() != band {
                return false;
            }
        }
        if let Some(family) = self.family {
            if !family.contains(applicant.household_size) {
                return false;
            }
        }
        true
    }

    pub fn apply<'a, I>(&self, applicants: I) -> Vec<&'a Applicant>
    where
        I: IntoIterator<Item = &'a Applicant>,
    {
        applicants
            .into_iter()
            .filter(|applicant| self.matches(applicant))
            .collect()
    }
}

/// Criteria for narrowing the house registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseFilter {
    pub status: Option<HouseStatus>,
    pub unit_type: Option<UnitType>,
    pub min_bedrooms: Option<u32>,
}

impl HouseFilter {
    pub fn matches(&self, unit: &HousingUnit) -> bool {
        self.status.map_or(true, |status| unit.status == status)
            && self
                .unit_type
                .as_ref()
                .map_or(true, |unit_type| &unit.unit_type == unit_type)
            && self.min_bedrooms.map_or(true, |min| unit.bedrooms >= min)
    }

    pub fn apply<'a, I>(&self, units: I) -> Vec<&'a HousingUnit>
    where
        I: IntoIterator<Item = &'a HousingUnit>,
    {
        units.into_iter().filter(|unit| self.matches(unit)).collect()
    }
}
