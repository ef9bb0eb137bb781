use chrono::NaiveDateTime;
use database::{entities::submission, services::submission::SubmissionInput};
use models::consultation::OfferSummary;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRequest {
    pub consultation_id: Option<Uuid>,
    /// Bidding provider
    pub tender_id: Option<Uuid>,
    /// Defaults to the time of the request
    pub submission_date: Option<NaiveDateTime>,
    pub financial_offer: Option<f64>,
    pub administrative_file_id: Option<Uuid>,
    pub technical_file_id: Option<Uuid>,
    pub financial_file_id: Option<Uuid>,
}

impl From<SubmissionRequest> for SubmissionInput {
    fn from(request: SubmissionRequest) -> Self {
        Self {
            consultation_id: request.consultation_id,
            tender_id: request.tender_id,
            submission_date: request.submission_date,
            financial_offer: request.financial_offer,
            administrative_file_id: request.administrative_file_id,
            technical_file_id: request.technical_file_id,
            financial_file_id: request.financial_file_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub consultation_id: Uuid,
    pub tender_id: Uuid,
    pub submission_date: NaiveDateTime,
    pub financial_offer: Option<f64>,
    pub administrative_file_id: Option<Uuid>,
    pub technical_file_id: Option<Uuid>,
    pub financial_file_id: Option<Uuid>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<submission::Model> for SubmissionResponse {
    fn from(model: submission::Model) -> Self {
        Self {
            id: model.id,
            consultation_id: model.consultation_id,
            tender_id: model.tender_id,
            submission_date: model.submission_date,
            financial_offer: model.financial_offer,
            administrative_file_id: model.administrative_file_id,
            technical_file_id: model.technical_file_id,
            financial_file_id: model.financial_file_id,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_by: model.updated_by,
            updated_at: model.updated_at,
        }
    }
}

/// Offer figures of one consultation
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferSummaryResponse {
    pub submission_count: u64,
    pub min_offer: Option<f64>,
    pub max_offer: Option<f64>,
    pub average_offer: Option<f64>,
}

impl From<OfferSummary> for OfferSummaryResponse {
    fn from(summary: OfferSummary) -> Self {
        Self {
            submission_count: summary.submission_count,
            min_offer: summary.min_offer,
            max_offer: summary.max_offer,
            average_offer: summary.average_offer,
        }
    }
}
