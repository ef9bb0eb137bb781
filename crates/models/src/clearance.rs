use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Whether a provider clearance covers a given day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ClearanceStatus {
    NotYetValid,
    Valid,
    Expired,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearanceValidity {
    pub status: ClearanceStatus,
    /// Days left including today, zero unless the clearance is valid
    pub days_remaining: i64,
}

impl ClearanceValidity {
    /// Both bounds are inclusive
    pub fn evaluate(start_date: NaiveDate, end_date: NaiveDate, today: NaiveDate) -> Self {
        if today < start_date {
            Self {
                status: ClearanceStatus::NotYetValid,
                days_remaining: 0,
            }
        } else if today > end_date {
            Self {
                status: ClearanceStatus::Expired,
                days_remaining: 0,
            }
        } else {
            Self {
                status: ClearanceStatus::Valid,
                days_remaining: (end_date - today).num_days() + 1,
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.status == ClearanceStatus::Valid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, m, d).unwrap()
    }

    #[test]
    fn test_before_start() {
        let validity = ClearanceValidity::evaluate(day(2, 1), day(2, 28), day(1, 31));
        assert_eq!(validity.status, ClearanceStatus::NotYetValid);
        assert!(!validity.is_valid());
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let first = ClearanceValidity::evaluate(day(2, 1), day(2, 28), day(2, 1));
        assert!(first.is_valid());
        assert_eq!(first.days_remaining, 28);

        let last = ClearanceValidity::evaluate(day(2, 1), day(2, 28), day(2, 28));
        assert!(last.is_valid());
        assert_eq!(last.days_remaining, 1);
    }

    #[test]
    fn test_after_end() {
        let validity = ClearanceValidity::evaluate(day(2, 1), day(2, 28), day(3, 1));
        assert_eq!(validity.status, ClearanceStatus::Expired);
        assert_eq!(validity.days_remaining, 0);
        assert_eq!(validity.status.to_string(), "EXPIRED");
    }
}
