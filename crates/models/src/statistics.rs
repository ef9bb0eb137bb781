use crate::consultation::{BudgetFigures, ConsultationTimeline};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// What statistics need to know about one consultation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ConsultationSnapshot {
    pub allocated_amount: Option<f64>,
    pub financial_estimation: Option<f64>,
    pub publish_date: Option<NaiveDateTime>,
    pub deadline: Option<NaiveDateTime>,
    pub submission_count: u64,
}

/// Point-in-time figures for all consultations of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationStatistics {
    pub year: String,
    pub total_consultations: u64,
    pub total_allocated_amount: f64,
    pub total_financial_estimation: f64,
    pub average_consultation_value: f64,
    pub active_consultations: u64,
    pub expired_consultations: u64,
    pub consultations_with_submissions: u64,
    pub high_value_consultations: u64,
    pub average_competitive_ratio: f64,
}

impl ConsultationStatistics {
    /// Recomputes everything from the given rows; no division by zero for an empty year
    pub fn compute(year: &str, snapshots: &[ConsultationSnapshot], now: NaiveDateTime) -> Self {
        let mut stats = Self {
            year: year.to_owned(),
            total_consultations: snapshots.len() as u64,
            total_allocated_amount: 0.0,
            total_financial_estimation: 0.0,
            average_consultation_value: 0.0,
            active_consultations: 0,
            expired_consultations: 0,
            consultations_with_submissions: 0,
            high_value_consultations: 0,
            average_competitive_ratio: 0.0,
        };

        for snapshot in snapshots {
            let budget = BudgetFigures::new(snapshot.allocated_amount, snapshot.financial_estimation);
            let timeline = ConsultationTimeline::new(snapshot.publish_date, snapshot.deadline);

            stats.total_allocated_amount += snapshot.allocated_amount.unwrap_or(0.0);
            stats.total_financial_estimation += snapshot.financial_estimation.unwrap_or(0.0);

            if timeline.is_active(now) {
                stats.active_consultations += 1;
            }
            if timeline.is_expired(now) {
                stats.expired_consultations += 1;
            }
            if snapshot.submission_count > 0 {
                stats.consultations_with_submissions += 1;
            }
            if budget.is_high_value() {
                stats.high_value_consultations += 1;
            }
        }

        if stats.total_consultations > 0 {
            let total = stats.total_consultations as f64;
            stats.average_consultation_value = stats.total_allocated_amount / total;
            stats.average_competitive_ratio = stats.consultations_with_submissions as f64 / total;
        }

        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_empty_year_is_all_zero() {
        let stats = ConsultationStatistics::compute("2025", &[], now());

        assert_eq!(stats.year, "2025");
        assert_eq!(stats.total_consultations, 0);
        assert_eq!(stats.total_allocated_amount, 0.0);
        assert_eq!(stats.total_financial_estimation, 0.0);
        assert_eq!(stats.average_consultation_value, 0.0);
        assert_eq!(stats.active_consultations, 0);
        assert_eq!(stats.expired_consultations, 0);
        assert_eq!(stats.consultations_with_submissions, 0);
        assert_eq!(stats.high_value_consultations, 0);
        assert_eq!(stats.average_competitive_ratio, 0.0);
    }

    #[test]
    fn test_mixed_year() {
        let snapshots = [
            // published, still open, two bids, high value
            ConsultationSnapshot {
                allocated_amount: Some(1_500_000.0),
                financial_estimation: Some(1_400_000.0),
                publish_date: Some(now() - Duration::days(5)),
                deadline: Some(now() + Duration::days(5)),
                submission_count: 2,
            },
            // expired, one bid
            ConsultationSnapshot {
                allocated_amount: Some(500_000.0),
                financial_estimation: Some(600_000.0),
                publish_date: Some(now() - Duration::days(40)),
                deadline: Some(now() - Duration::days(10)),
                submission_count: 1,
            },
            // draft without figures
            ConsultationSnapshot::default(),
        ];

        let stats = ConsultationStatistics::compute("2025", &snapshots, now());

        assert_eq!(stats.total_consultations, 3);
        assert_eq!(stats.total_allocated_amount, 2_000_000.0);
        assert_eq!(stats.total_financial_estimation, 2_000_000.0);
        assert!((stats.average_consultation_value - 666_666.666).abs() < 0.01);
        assert_eq!(stats.active_consultations, 1);
        assert_eq!(stats.expired_consultations, 1);
        assert_eq!(stats.consultations_with_submissions, 2);
        assert_eq!(stats.high_value_consultations, 1);
        assert!((stats.average_competitive_ratio - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_serializes_camel_case() {
        let stats = ConsultationStatistics::compute("2024", &[], now());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averageConsultationValue"], 0.0);
        assert_eq!(json["totalConsultations"], 0);
    }
}
