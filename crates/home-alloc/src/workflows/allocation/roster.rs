//! Built-in sample roster and CSV loaders for applicants and houses.

use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use super::domain::{
    Applicant, ApplicantId, ApplicationStatus, HouseId, HouseStatus, HousingUnit, PriorityBand,
    UnitType,
};
use super::priority;
use super::service::DEFAULT_FACILITIES;

/// Applicants and houses loaded together so cross references can be checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    pub applicants: Vec<Applicant>,
    pub houses: Vec<HousingUnit>,
}

#[derive(Debug, thiserror::Error)]
pub enum RosterImportError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid roster CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("{file} line {line}: {reason}")]
    InvalidRow {
        file: &'static str,
        line: usize,
        reason: String,
    },
    #[error("{file} lists {id} more than once")]
    DuplicateId { file: &'static str, id: String },
    #[error("{file} entry {id} refers to unknown record {reference}")]
    UnknownReference {
        file: &'static str,
        id: String,
        reference: String,
    },
    #[error("{id} {reason}")]
    InconsistentAllocation { id: String, reason: String },
}

impl Roster {
    /// The program's demonstration data set.
    pub fn sample() -> Self {
        let applicants = vec![
            sample_applicant(
                "APP-001",
                "Ali Khan",
                45,
                6,
                15_000.0,
                92,
                ApplicationStatus::Approved,
                "4+ bedrooms, ground floor preferred",
                date(2025, 3, 10),
                "+923001234567",
            ),
            sample_applicant(
                "APP-002",
                "Sara Ahmed",
                38,
                4,
                12_000.0,
                85,
                ApplicationStatus::Pending,
                "3-4 bedrooms, near school",
                date(2025, 3, 12),
                "+923001234568",
            ),
            Applicant {
                allocated_house: Some(HouseId("H-102".to_string())),
                ..sample_applicant(
                    "APP-003",
                    "Ahmed Raza",
                    50,
                    5,
                    10_000.0,
                    95,
                    ApplicationStatus::Allocated,
                    "Ground floor access",
                    date(2025, 3, 5),
                    "+923001234569",
                )
            },
            sample_applicant(
                "APP-004",
                "Fatima Noor",
                42,
                3,
                14_000.0,
                78,
                ApplicationStatus::Reviewed,
                "2 bedrooms, close to public transport",
                date(2025, 3, 14),
                "+923001234570",
            ),
            sample_applicant(
                "APP-005",
                "Bilal Khan",
                35,
                7,
                8_000.0,
                98,
                ApplicationStatus::Approved,
                "Large house, 5+ bedrooms",
                date(2025, 3, 13),
                "+923001234571",
            ),
        ];

        let houses = vec![
            sample_house(
                "H-101",
                "123 Main Street, Karachi",
                UnitType::Apartment,
                (3, 1200, 15_000.0, 2),
                &["Parking", "Security", "Elevator"],
                HouseStatus::Available,
            ),
            HousingUnit {
                occupant: Some(ApplicantId("APP-003".to_string())),
                ..sample_house(
                    "H-102",
                    "456 Park Road, Lahore",
                    UnitType::House,
                    (4, 2000, 25_000.0, 1),
                    &DEFAULT_FACILITIES,
                    HouseStatus::Occupied,
                )
            },
            sample_house(
                "H-103",
                "789 Garden Avenue, Islamabad",
                UnitType::Duplex,
                (5, 2500, 35_000.0, 1),
                &["Garden", "Parking", "Security", "Laundry"],
                HouseStatus::Available,
            ),
            sample_house(
                "H-104",
                "321 Market Street, Karachi",
                UnitType::Apartment,
                (2, 800, 10_000.0, 3),
                &DEFAULT_FACILITIES,
                HouseStatus::Maintenance,
            ),
            sample_house(
                "H-105",
                "654 Hill Road, Lahore",
                UnitType::House,
                (3, 1500, 18_000.0, 1),
                &["Garden", "Parking"],
                HouseStatus::Available,
            ),
        ];

        Self { applicants, houses }
    }

    pub fn from_paths<P, Q>(applicants_csv: P, houses_csv: Q) -> Result<Self, RosterImportError>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
    {
        let applicants = std::fs::File::open(applicants_csv)?;
        let houses = std::fs::File::open(houses_csv)?;
        Self::from_readers(applicants, houses)
    }

    pub fn from_readers<R, S>(applicants: R, houses: S) -> Result<Self, RosterImportError>
    where
        R: Read,
        S: Read,
    {
        let roster = Self {
            applicants: parse_applicants(applicants)?,
            houses: parse_houses(houses)?,
        };
        roster.check_references()?;
        Ok(roster)
    }

    /// Both sides of every allocation must name each other and carry matching statuses.
    fn check_references(&self) -> Result<(), RosterImportError> {
        let houses: HashMap<&HouseId, &HousingUnit> =
            self.houses.iter().map(|unit| (&unit.id, unit)).collect();
        let applicants: HashMap<&ApplicantId, &Applicant> = self
            .applicants
            .iter()
            .map(|applicant| (&applicant.id, applicant))
            .collect();

        for applicant in &self.applicants {
            let allocated = applicant.status == ApplicationStatus::Allocated;
            let Some(house_id) = &applicant.allocated_house else {
                if allocated {
                    return Err(inconsistent(
                        &applicant.id.0,
                        "is allocated without a house",
                    ));
                }
                continue;
            };
            let unit = houses
                .get(house_id)
                .ok_or_else(|| RosterImportError::UnknownReference {
                    file: APPLICANTS_FILE,
                    id: applicant.id.0.clone(),
                    reference: house_id.0.clone(),
                })?;
            if !allocated {
                return Err(inconsistent(
                    &applicant.id.0,
                    &format!("holds {house_id} while {}", applicant.status.label()),
                ));
            }
            if unit.occupant.as_ref() != Some(&applicant.id) {
                return Err(inconsistent(
                    &applicant.id.0,
                    &format!("holds {house_id} but the house does not list it as occupant"),
                ));
            }
        }

        for unit in &self.houses {
            let Some(occupant) = &unit.occupant else {
                continue;
            };
            let applicant =
                applicants
                    .get(occupant)
                    .ok_or_else(|| RosterImportError::UnknownReference {
                        file: HOUSES_FILE,
                        id: unit.id.0.clone(),
                        reference: occupant.0.clone(),
                    })?;
            if unit.status != HouseStatus::Occupied {
                return Err(inconsistent(
                    &unit.id.0,
                    &format!("lists occupant {occupant} while {}", unit.status.label()),
                ));
            }
            if applicant.allocated_house.as_ref() != Some(&unit.id) {
                return Err(inconsistent(
                    &unit.id.0,
                    &format!("lists occupant {occupant} who holds a different house"),
                ));
            }
        }
        Ok(())
    }
}

fn inconsistent(id: &str, reason: &str) -> RosterImportError {
    RosterImportError::InconsistentAllocation {
        id: id.to_string(),
        reason: reason.to_string(),
    }
}

const APPLICANTS_FILE: &str = "applicants";
const HOUSES_FILE: &str = "houses";

pub fn parse_applicants<R: Read>(reader: R) -> Result<Vec<Applicant>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut seen = HashSet::new();
    let mut applicants = Vec::new();

    for (index, record) in csv_reader.deserialize::<ApplicantRow>().enumerate() {
        let row = record?;
        // Line 1 is the header.
        let line = index + 2;
        let applicant = row.into_applicant(line)?;
        if !seen.insert(applicant.id.clone()) {
            return Err(RosterImportError::DuplicateId {
                file: APPLICANTS_FILE,
                id: applicant.id.0,
            });
        }
        applicants.push(applicant);
    }

    Ok(applicants)
}

pub fn parse_houses<R: Read>(reader: R) -> Result<Vec<HousingUnit>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut seen = HashSet::new();
    let mut houses = Vec::new();

    for (index, record) in csv_reader.deserialize::<HouseRow>().enumerate() {
        let row = record?;
        let line = index + 2;
        let unit = row.into_unit(line)?;
        if !seen.insert(unit.id.clone()) {
            return Err(RosterImportError::DuplicateId {
                file: HOUSES_FILE,
                id: unit.id.0,
            });
        }
        houses.push(unit);
    }

    Ok(houses)
}

#[derive(Debug, Deserialize)]
struct ApplicantRow {
    id: String,
    name: String,
    age: u8,
    household_size: u32,
    monthly_income: f64,
    #[serde(default)]
    priority_score: Option<u8>,
    #[serde(default)]
    priority_tier: Option<u8>,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    needs: Option<String>,
    applied_on: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    contact: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    allocated_house: Option<String>,
}

impl ApplicantRow {
    fn into_applicant(self, line: usize) -> Result<Applicant, RosterImportError> {
        let invalid = |reason: String| RosterImportError::InvalidRow {
            file: APPLICANTS_FILE,
            line,
            reason,
        };

        if self.household_size == 0 {
            return Err(invalid(format!("{} has a household size of 0", self.id)));
        }
        if let Some(score) = self.priority_score.filter(|score| *score > 100) {
            return Err(invalid(format!(
                "{} has a priority score of {score}, above 100",
                self.id
            )));
        }
        if self.priority_tier == Some(0) {
            return Err(invalid(format!("{} has a priority tier of 0", self.id)));
        }
        let status = ApplicationStatus::parse(&self.status)
            .ok_or_else(|| invalid(format!("unknown application status '{}'", self.status)))?;
        let applied_on = parse_date(&self.applied_on).map_err(invalid)?;

        let priority_score = self.priority_score.unwrap_or_else(|| {
            priority::priority_score(self.age, self.household_size, self.monthly_income)
        });
        let priority_tier = self
            .priority_tier
            .unwrap_or_else(|| PriorityBand::from_score(priority_score).tier());

        Ok(Applicant {
            id: ApplicantId(self.id),
            name: self.name,
            age: self.age,
            household_size: self.household_size,
            monthly_income: self.monthly_income,
            priority_score,
            priority_tier,
            needs: self.needs.unwrap_or_default(),
            applied_on,
            contact: self.contact.unwrap_or_default(),
            status,
            allocated_house: self.allocated_house.map(HouseId),
        })
    }
}

#[derive(Debug, Deserialize)]
struct HouseRow {
    id: String,
    address: String,
    unit_type: String,
    bedrooms: u32,
    floor_area: u32,
    rent: f64,
    #[serde(default)]
    floor: Option<i32>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    facilities: Option<String>,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    occupant: Option<String>,
}

impl HouseRow {
    fn into_unit(self, line: usize) -> Result<HousingUnit, RosterImportError> {
        let invalid = |reason: String| RosterImportError::InvalidRow {
            file: HOUSES_FILE,
            line,
            reason,
        };

        if self.bedrooms == 0 {
            return Err(invalid(format!("{} has 0 bedrooms", self.id)));
        }
        let status = HouseStatus::parse(&self.status)
            .ok_or_else(|| invalid(format!("unknown house status '{}'", self.status)))?;
        let facilities = match self.facilities {
            Some(raw) => raw
                .split(';')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect(),
            None => DEFAULT_FACILITIES.iter().map(|tag| tag.to_string()).collect(),
        };

        Ok(HousingUnit {
            id: HouseId(self.id),
            address: self.address,
            unit_type: UnitType::parse(&self.unit_type),
            bedrooms: self.bedrooms,
            floor_area: self.floor_area,
            rent: self.rent,
            floor: self.floor.unwrap_or(0),
            facilities,
            status,
            occupant: self.occupant.map(ApplicantId),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

#[allow(clippy::too_many_arguments)]
fn sample_applicant(
    id: &str,
    name: &str,
    age: u8,
    household_size: u32,
    monthly_income: f64,
    priority_score: u8,
    status: ApplicationStatus,
    needs: &str,
    applied_on: NaiveDate,
    contact: &str,
) -> Applicant {
    Applicant {
        id: ApplicantId(id.to_string()),
        name: name.to_string(),
        age,
        household_size,
        monthly_income,
        priority_score,
        priority_tier: PriorityBand::from_score(priority_score).tier(),
        needs: needs.to_string(),
        applied_on,
        contact: contact.to_string(),
        status,
        allocated_house: None,
    }
}

/// `shape` is (bedrooms, floor area, rent, floor).
fn sample_house(
    id: &str,
    address: &str,
    unit_type: UnitType,
    shape: (u32, u32, f64, i32),
    facilities: &[&str],
    status: HouseStatus,
) -> HousingUnit {
    let (bedrooms, floor_area, rent, floor) = shape;
    HousingUnit {
        id: HouseId(id.to_string()),
        address: address.to_string(),
        unit_type,
        bedrooms,
        floor_area,
        rent,
        floor,
        facilities: facilities.iter().map(|tag| tag.to_string()).collect(),
        status,
        occupant: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APPLICANTS: &str = "id,name,age,household_size,monthly_income,priority_score,priority_tier,status,needs,applied_on,contact,allocated_house\n\
APP-010,Hina Shah,61,2,9000,,,approved,Ground floor,2025-04-01,+923000000010,\n\
APP-011,Omar Farooq,33,5,21000,80,3,pending,,2025-04-03,,\n";

    const HOUSES: &str = "id,address,unit_type,bedrooms,floor_area,rent,floor,facilities,status,occupant\n\
H-201,12 Canal View Lahore,house,3,1400,16000,1,Garden; Parking,available,\n\
H-202,8 Sea Breeze Karachi,penthouse,4,2100,40000,9,,maintenance,\n";

    #[test]
    fn sample_roster_matches_dashboard_data() {
        let roster = Roster::sample();
        assert_eq!(roster.applicants.len(), 5);
        assert_eq!(roster.houses.len(), 5);

        let tiers: Vec<u8> = roster
            .applicants
            .iter()
            .map(|applicant| applicant.priority_tier)
            .collect();
        assert_eq!(tiers, vec![1, 2, 1, 2, 1]);

        let occupied = roster
            .houses
            .iter()
            .find(|unit| unit.id.0 == "H-102")
            .expect("H-102 present");
        assert_eq!(occupied.occupant, Some(ApplicantId("APP-003".to_string())));
    }

    #[test]
    fn applicant_rows_fill_missing_priority() {
        let applicants = parse_applicants(APPLICANTS.as_bytes()).expect("applicants parse");

        let hina = &applicants[0];
        // 30 (age) + 10 (household) + 40 (income ratio 0.45).
        assert_eq!(hina.priority_score, 80);
        assert_eq!(hina.priority_tier, 2);
        assert_eq!(hina.needs, "Ground floor");

        let omar = &applicants[1];
        assert_eq!(omar.priority_score, 80);
        assert_eq!(omar.priority_tier, 3, "explicit tier wins over the band");
        assert!(omar.contact.is_empty());
        assert_eq!(omar.status, ApplicationStatus::Pending);
    }

    #[test]
    fn house_rows_split_facilities_and_keep_unknown_types() {
        let houses = parse_houses(HOUSES.as_bytes()).expect("houses parse");

        assert_eq!(houses[0].facilities, vec!["Garden", "Parking"]);
        assert_eq!(houses[1].unit_type, UnitType::Other("penthouse".to_string()));
        assert_eq!(houses[1].facilities.len(), DEFAULT_FACILITIES.len());
        assert_eq!(houses[1].status, HouseStatus::Maintenance);
    }

    #[test]
    fn zero_bedroom_rows_are_rejected_with_line_number() {
        let csv = "id,address,unit_type,bedrooms,floor_area,rent,floor,facilities,status,occupant\n\
H-301,1 Nowhere,apartment,0,300,5000,1,,available,\n";

        match parse_houses(csv.as_bytes()) {
            Err(RosterImportError::InvalidRow { file, line, .. }) => {
                assert_eq!(file, "houses");
                assert_eq!(line, 2);
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn duplicate_applicant_ids_are_rejected() {
        let csv = "id,name,age,household_size,monthly_income,priority_score,priority_tier,status,needs,applied_on,contact,allocated_house\n\
APP-001,A,40,2,1000,,,pending,,2025-01-01,,\n\
APP-001,B,41,3,1000,,,pending,,2025-01-02,,\n";

        assert!(matches!(
            parse_applicants(csv.as_bytes()),
            Err(RosterImportError::DuplicateId { id, .. }) if id == "APP-001"
        ));
    }

    #[test]
    fn priority_scores_above_one_hundred_are_rejected() {
        let csv = "id,name,age,household_size,monthly_income,priority_score,priority_tier,status,needs,applied_on,contact,allocated_house\n\
APP-001,A,40,2,1000,140,,pending,,2025-01-01,,\n";

        match parse_applicants(csv.as_bytes()) {
            Err(RosterImportError::InvalidRow { line, reason, .. }) => {
                assert_eq!(line, 2);
                assert!(reason.contains("140"));
            }
            other => panic!("expected invalid row, got {other:?}"),
        }
    }

    #[test]
    fn allocated_applicant_must_match_an_occupied_house() {
        let mut roster = Roster::sample();
        let house = roster
            .houses
            .iter_mut()
            .find(|unit| unit.id.0 == "H-102")
            .expect("H-102 present");
        house.status = HouseStatus::Available;
        house.occupant = None;

        assert!(matches!(
            roster.check_references(),
            Err(RosterImportError::InconsistentAllocation { id, .. }) if id == "APP-003"
        ));
    }

    #[test]
    fn allocated_status_requires_a_house() {
        let mut roster = Roster::sample();
        roster.applicants[0].status = ApplicationStatus::Allocated;

        assert!(matches!(
            roster.check_references(),
            Err(RosterImportError::InconsistentAllocation { id, .. }) if id == "APP-001"
        ));
        assert!(Roster::sample().check_references().is_ok());
    }
}
