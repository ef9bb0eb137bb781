use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};

/// Allocated amounts above this value mark a consultation as high value
pub const HIGH_VALUE_THRESHOLD: f64 = 1_000_000.0;

/// Reference given to a consultation created without one
pub fn default_reference(internal_id: &str, consultation_year: &str) -> String {
    format!("CONS-{internal_id}-{consultation_year}")
}

/// Money side of a consultation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BudgetFigures {
    pub allocated_amount: Option<f64>,
    pub financial_estimation: Option<f64>,
}

impl BudgetFigures {
    pub fn new(allocated_amount: Option<f64>, financial_estimation: Option<f64>) -> Self {
        Self {
            allocated_amount,
            financial_estimation,
        }
    }

    /// The estimation exceeds what was allocated
    pub fn has_budget_overrun(&self) -> bool {
        match (self.allocated_amount, self.financial_estimation) {
            (Some(allocated), Some(estimation)) => estimation > allocated,
            _ => false,
        }
    }

    /// Relative gap between estimation and allocation, in percent of the
    /// allocation. Zero when either figure is missing or nothing was allocated.
    pub fn budget_variance_percentage(&self) -> f64 {
        match (self.allocated_amount, self.financial_estimation) {
            (Some(allocated), Some(estimation)) if allocated > 0.0 => {
                (estimation - allocated) / allocated * 100.0
            }
            _ => 0.0,
        }
    }

    pub fn is_high_value(&self) -> bool {
        self.allocated_amount
            .is_some_and(|amount| amount > HIGH_VALUE_THRESHOLD)
    }
}

/// Where a consultation stands, deduced from its dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, IntoStaticStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Lifecycle {
    /// Not published yet
    Draft,
    /// Published and still accepting submissions
    Open,
    /// Deadline has passed
    Expired,
}

/// Publication window of a consultation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsultationTimeline {
    pub publish_date: Option<NaiveDateTime>,
    pub deadline: Option<NaiveDateTime>,
}

impl ConsultationTimeline {
    pub fn new(publish_date: Option<NaiveDateTime>, deadline: Option<NaiveDateTime>) -> Self {
        Self {
            publish_date,
            deadline,
        }
    }

    pub fn is_published(&self, now: NaiveDateTime) -> bool {
        self.publish_date.is_some_and(|published| published <= now)
    }

    pub fn is_expired(&self, now: NaiveDateTime) -> bool {
        self.deadline.is_some_and(|deadline| deadline < now)
    }

    /// Published and the deadline, if any, has not passed
    pub fn is_active(&self, now: NaiveDateTime) -> bool {
        self.is_published(now) && !self.is_expired(now)
    }

    /// Whole days left before the deadline, negative once it has passed
    pub fn days_until_deadline(&self, now: NaiveDateTime) -> Option<i64> {
        self.deadline.map(|deadline| (deadline - now).num_days())
    }

    pub fn lifecycle(&self, now: NaiveDateTime) -> Lifecycle {
        if self.is_expired(now) {
            Lifecycle::Expired
        } else if self.is_published(now) {
            Lifecycle::Open
        } else {
            Lifecycle::Draft
        }
    }
}

/// Aggregate of the financial offers received by one consultation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummary {
    pub submission_count: u64,
    pub min_offer: Option<f64>,
    pub max_offer: Option<f64>,
    pub average_offer: Option<f64>,
}

impl OfferSummary {
    /// Counts every submission; offers left unset do not take part in min/max/avg
    pub fn from_offers<I>(offers: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut summary = Self::default();
        let mut total = 0.0;
        let mut priced = 0u64;

        for offer in offers {
            summary.submission_count += 1;

            if let Some(offer) = offer {
                total += offer;
                priced += 1;
                summary.min_offer = Some(summary.min_offer.map_or(offer, |m| m.min(offer)));
                summary.max_offer = Some(summary.max_offer.map_or(offer, |m| m.max(offer)));
            }
        }

        if priced > 0 {
            summary.average_offer = Some(total / priced as f64);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_default_reference() {
        assert_eq!(default_reference("042", "2025"), "CONS-042-2025");
    }

    #[test]
    fn test_budget_overrun() {
        let figures = BudgetFigures::new(Some(500_000.0), Some(600_000.0));
        assert!(figures.has_budget_overrun());
        assert_eq!(figures.budget_variance_percentage(), 20.0);
        assert!(!figures.is_high_value());
    }

    #[test]
    fn test_budget_under_estimation() {
        let figures = BudgetFigures::new(Some(2_000_000.0), Some(1_500_000.0));
        assert!(!figures.has_budget_overrun());
        assert_eq!(figures.budget_variance_percentage(), -25.0);
        assert!(figures.is_high_value());
    }

    #[test]
    fn test_budget_missing_figures() {
        let figures = BudgetFigures::new(None, Some(10.0));
        assert!(!figures.has_budget_overrun());
        assert_eq!(figures.budget_variance_percentage(), 0.0);

        let zero = BudgetFigures::new(Some(0.0), Some(10.0));
        assert!(zero.has_budget_overrun());
        assert_eq!(zero.budget_variance_percentage(), 0.0);
    }

    #[test]
    fn test_high_value_threshold_is_exclusive() {
        assert!(!BudgetFigures::new(Some(HIGH_VALUE_THRESHOLD), None).is_high_value());
        assert!(BudgetFigures::new(Some(HIGH_VALUE_THRESHOLD + 1.0), None).is_high_value());
    }

    #[test]
    fn test_timeline_draft() {
        let timeline = ConsultationTimeline::new(None, Some(now() + Duration::days(3)));
        assert!(!timeline.is_active(now()));
        assert!(!timeline.is_expired(now()));
        assert_eq!(timeline.lifecycle(now()), Lifecycle::Draft);
        assert_eq!(timeline.days_until_deadline(now()), Some(3));
    }

    #[test]
    fn test_timeline_open() {
        let timeline = ConsultationTimeline::new(
            Some(now() - Duration::days(10)),
            Some(now() + Duration::hours(1)),
        );
        assert!(timeline.is_active(now()));
        assert_eq!(timeline.lifecycle(now()), Lifecycle::Open);
        assert_eq!(timeline.days_until_deadline(now()), Some(0));

        let no_deadline = ConsultationTimeline::new(Some(now()), None);
        assert!(no_deadline.is_active(now()));
        assert_eq!(no_deadline.days_until_deadline(now()), None);
    }

    #[test]
    fn test_timeline_expired() {
        let timeline = ConsultationTimeline::new(
            Some(now() - Duration::days(30)),
            Some(now() - Duration::days(2)),
        );
        assert!(timeline.is_expired(now()));
        assert!(!timeline.is_active(now()));
        assert_eq!(timeline.lifecycle(now()), Lifecycle::Expired);
        assert_eq!(timeline.days_until_deadline(now()), Some(-2));
    }

    #[test]
    fn test_offer_summary() {
        let summary = OfferSummary::from_offers([Some(120.0), None, Some(80.0), Some(100.0)]);
        assert_eq!(summary.submission_count, 4);
        assert_eq!(summary.min_offer, Some(80.0));
        assert_eq!(summary.max_offer, Some(120.0));
        assert_eq!(summary.average_offer, Some(100.0));
    }

    #[test]
    fn test_offer_summary_empty() {
        let summary = OfferSummary::from_offers(std::iter::empty::<Option<f64>>());
        assert_eq!(summary, OfferSummary::default());
        assert_eq!(summary.average_offer, None);
    }
}
