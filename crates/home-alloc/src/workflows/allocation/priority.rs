//! Intake-time urgency scoring for new applications.

use super::domain::PriorityBand;

/// Monthly income at which an applicant sits at the 1.0 income ratio.
pub const REFERENCE_MONTHLY_INCOME: f64 = 20_000.0;

/// Urgency score in 0..=100 combining age, household size and income.
pub fn priority_score(age: u8, household_size: u32, monthly_income: f64) -> u8 {
    let age_points: u8 = match age {
        60.. => 30,
        50..=59 => 20,
        40..=49 => 10,
        _ => 0,
    };

    let household_points: u8 = match household_size {
        6.. => 30,
        4..=5 => 20,
        2..=3 => 10,
        _ => 0,
    };

    let income_ratio = monthly_income / REFERENCE_MONTHLY_INCOME;
    let income_points: u8 = if income_ratio <= 0.5 {
        40
    } else if income_ratio <= 0.75 {
        30
    } else if income_ratio <= 1.0 {
        20
    } else {
        10
    };

    (age_points + household_points + income_points).min(100)
}

/// Score, band and tier assigned to a new application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityAssessment {
    pub score: u8,
    pub band: PriorityBand,
    pub tier: u8,
}

pub fn assess(age: u8, household_size: u32, monthly_income: f64) -> PriorityAssessment {
    let score = priority_score(age, household_size, monthly_income);
    let band = PriorityBand::from_score(score);
    PriorityAssessment {
        score,
        band,
        tier: band.tier(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elderly_large_low_income_household_hits_cap() {
        assert_eq!(priority_score(65, 7, 8_000.0), 100);
    }

    #[test]
    fn income_ratio_boundaries_are_inclusive() {
        assert_eq!(priority_score(30, 1, 10_000.0), 40);
        assert_eq!(priority_score(30, 1, 15_000.0), 30);
        assert_eq!(priority_score(30, 1, 20_000.0), 20);
        assert_eq!(priority_score(30, 1, 20_001.0), 10);
    }

    #[test]
    fn assessment_derives_tier_from_band() {
        let assessment = assess(45, 6, 15_000.0);
        assert_eq!(assessment.score, 70);
        assert_eq!(assessment.band, PriorityBand::Low);
        assert_eq!(assessment.tier, 3);

        let urgent = assess(52, 6, 9_000.0);
        assert_eq!(urgent.score, 90);
        assert_eq!(urgent.band, PriorityBand::High);
        assert_eq!(urgent.tier, 1);
    }
}
