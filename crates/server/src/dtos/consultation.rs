use chrono::NaiveDateTime;
use database::services::{
    award_method::AwardMethodService,
    consultation::{ConsultationDetails, ConsultationInput, ConsultationView},
};
use models::{director::DirectorType, statistics::ConsultationStatistics};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::submission::SubmissionResponse;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationRequest {
    pub internal_id: Option<String>,
    pub consultation_year: Option<String>,
    /// Generated as `CONS-{internalId}-{year}` when blank
    pub reference: Option<String>,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
    pub allocated_amount: Option<f64>,
    pub financial_estimation: Option<f64>,
    pub start_date: Option<NaiveDateTime>,
    pub approval_date: Option<NaiveDateTime>,
    pub publish_date: Option<NaiveDateTime>,
    pub deadline: Option<NaiveDateTime>,
    pub approval_reference: Option<String>,
    pub observation: Option<String>,
    pub award_method_id: Option<Uuid>,
    pub realization_nature_id: Option<Uuid>,
    pub budget_type_id: Option<Uuid>,
    pub realization_status_id: Option<Uuid>,
    pub approval_status_id: Option<Uuid>,
    pub realization_director_id: Option<Uuid>,
    pub consultation_step_id: Option<Uuid>,
}

impl From<ConsultationRequest> for ConsultationInput {
    fn from(request: ConsultationRequest) -> Self {
        Self {
            internal_id: request.internal_id,
            consultation_year: request.consultation_year,
            reference: request.reference,
            designation_ar: request.designation_ar,
            designation_en: request.designation_en,
            designation_fr: request.designation_fr,
            allocated_amount: request.allocated_amount,
            financial_estimation: request.financial_estimation,
            start_date: request.start_date,
            approval_date: request.approval_date,
            publish_date: request.publish_date,
            deadline: request.deadline,
            approval_reference: request.approval_reference,
            observation: request.observation,
            award_method_id: request.award_method_id,
            realization_nature_id: request.realization_nature_id,
            budget_type_id: request.budget_type_id,
            realization_status_id: request.realization_status_id,
            approval_status_id: request.approval_status_id,
            realization_director_id: request.realization_director_id,
            consultation_step_id: request.consultation_step_id,
        }
    }
}

/// A consultation with the designations of what it references and the
/// figures derived at read time
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationResponse {
    pub id: Uuid,
    pub internal_id: String,
    pub consultation_year: String,
    pub reference: String,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: String,
    pub allocated_amount: Option<f64>,
    pub financial_estimation: Option<f64>,
    pub start_date: Option<NaiveDateTime>,
    pub approval_date: Option<NaiveDateTime>,
    pub publish_date: Option<NaiveDateTime>,
    pub deadline: Option<NaiveDateTime>,
    pub approval_reference: Option<String>,
    pub observation: Option<String>,

    pub award_method_id: Uuid,
    pub award_method_designation_fr: String,
    pub award_method_acronym_fr: String,
    pub award_method_category: String,
    pub realization_nature_id: Uuid,
    pub realization_nature_designation_fr: String,
    pub budget_type_id: Uuid,
    pub budget_type_designation_fr: String,
    pub realization_status_id: Uuid,
    pub realization_status_designation_fr: String,
    pub approval_status_id: Uuid,
    pub approval_status_designation_fr: String,
    pub realization_director_id: Uuid,
    pub realization_director_designation_fr: String,
    pub director_type: String,
    pub consultation_step_id: Uuid,
    pub consultation_step_designation_fr: String,

    pub submission_count: u64,
    pub min_offer: Option<f64>,
    pub max_offer: Option<f64>,
    pub average_offer: Option<f64>,
    pub days_until_deadline: Option<i64>,
    pub is_active: bool,
    pub is_expired: bool,
    /// DRAFT, OPEN or EXPIRED
    pub lifecycle: String,
    pub has_budget_overrun: bool,
    pub budget_variance_percentage: f64,
    pub is_high_value: bool,

    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<ConsultationView> for ConsultationResponse {
    fn from(view: ConsultationView) -> Self {
        let ConsultationView {
            consultation: c,
            references: r,
            metrics: m,
        } = view;

        Self {
            id: c.id,
            internal_id: c.internal_id,
            consultation_year: c.consultation_year,
            reference: c.reference,
            designation_ar: c.designation_ar,
            designation_en: c.designation_en,
            designation_fr: c.designation_fr,
            allocated_amount: c.allocated_amount,
            financial_estimation: c.financial_estimation,
            start_date: c.start_date,
            approval_date: c.approval_date,
            publish_date: c.publish_date,
            deadline: c.deadline,
            approval_reference: c.approval_reference,
            observation: c.observation,

            award_method_id: c.award_method_id,
            award_method_category: AwardMethodService::category(&r.award_method).to_string(),
            award_method_designation_fr: r.award_method.designation_fr,
            award_method_acronym_fr: r.award_method.acronym_fr,
            realization_nature_id: c.realization_nature_id,
            realization_nature_designation_fr: r.realization_nature.designation_fr,
            budget_type_id: c.budget_type_id,
            budget_type_designation_fr: r.budget_type.designation_fr,
            realization_status_id: c.realization_status_id,
            realization_status_designation_fr: r.realization_status.designation_fr,
            approval_status_id: c.approval_status_id,
            approval_status_designation_fr: r.approval_status.designation_fr,
            realization_director_id: c.realization_director_id,
            director_type: DirectorType::classify(&r.realization_director.designation_fr)
                .to_string(),
            realization_director_designation_fr: r.realization_director.designation_fr,
            consultation_step_id: c.consultation_step_id,
            consultation_step_designation_fr: r.consultation_step.designation_fr,

            submission_count: m.offers.submission_count,
            min_offer: m.offers.min_offer,
            max_offer: m.offers.max_offer,
            average_offer: m.offers.average_offer,
            days_until_deadline: m.days_until_deadline,
            is_active: m.is_active,
            is_expired: m.is_expired,
            lifecycle: m.lifecycle.to_string(),
            has_budget_overrun: m.has_budget_overrun,
            budget_variance_percentage: m.budget_variance_percentage,
            is_high_value: m.is_high_value,

            created_by: c.created_by,
            created_at: c.created_at,
            updated_by: c.updated_by,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsultationDetailsResponse {
    pub consultation: ConsultationResponse,
    pub submissions: Vec<SubmissionResponse>,
}

impl From<ConsultationDetails> for ConsultationDetailsResponse {
    fn from(details: ConsultationDetails) -> Self {
        Self {
            consultation: details.view.into(),
            submissions: details.submissions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsResponse {
    pub year: String,
    pub total_consultations: u64,
    pub total_allocated_amount: f64,
    pub total_financial_estimation: f64,
    pub average_consultation_value: f64,
    pub active_consultations: u64,
    pub expired_consultations: u64,
    pub consultations_with_submissions: u64,
    pub high_value_consultations: u64,
    /// Share of consultations that received at least one submission
    pub average_competitive_ratio: f64,
}

impl From<ConsultationStatistics> for StatisticsResponse {
    fn from(stats: ConsultationStatistics) -> Self {
        Self {
            year: stats.year,
            total_consultations: stats.total_consultations,
            total_allocated_amount: stats.total_allocated_amount,
            total_financial_estimation: stats.total_financial_estimation,
            average_consultation_value: stats.average_consultation_value,
            active_consultations: stats.active_consultations,
            expired_consultations: stats.expired_consultations,
            consultations_with_submissions: stats.consultations_with_submissions,
            high_value_consultations: stats.high_value_consultations,
            average_competitive_ratio: stats.average_competitive_ratio,
        }
    }
}
