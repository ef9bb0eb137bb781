use chrono::NaiveDateTime;
use database::{
    entities::award_method,
    services::award_method::{AwardMethodInput, AwardMethodService},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardMethodRequest {
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
    pub acronym_ar: Option<String>,
    pub acronym_en: Option<String>,
    pub acronym_fr: Option<String>,
}

impl From<AwardMethodRequest> for AwardMethodInput {
    fn from(request: AwardMethodRequest) -> Self {
        Self {
            designation_ar: request.designation_ar,
            designation_en: request.designation_en,
            designation_fr: request.designation_fr,
            acronym_ar: request.acronym_ar,
            acronym_en: request.acronym_en,
            acronym_fr: request.acronym_fr,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AwardMethodResponse {
    pub id: Uuid,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: String,
    pub acronym_ar: Option<String>,
    pub acronym_en: Option<String>,
    pub acronym_fr: String,
    /// APPEL_OFFRES, CONCOURS, CONSULTATION, GRE_A_GRE or AUTRE
    pub category: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<award_method::Model> for AwardMethodResponse {
    fn from(model: award_method::Model) -> Self {
        Self {
            category: AwardMethodService::category(&model).to_string(),
            id: model.id,
            designation_ar: model.designation_ar,
            designation_en: model.designation_en,
            designation_fr: model.designation_fr,
            acronym_ar: model.acronym_ar,
            acronym_en: model.acronym_en,
            acronym_fr: model.acronym_fr,
            created_by: model.created_by,
            created_at: model.created_at,
            updated_by: model.updated_by,
            updated_at: model.updated_at,
        }
    }
}
