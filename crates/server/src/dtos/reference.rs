use chrono::NaiveDateTime;
use database::services::{
    consultation_step::{ConsultationStepInput, StepView},
    reference::{DesignationInput, ReferenceRecord},
};
use models::{director::DirectorType, exclusion::ExclusionCategory, phase::PhaseType};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DesignationRequest {
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
}

impl From<DesignationRequest> for DesignationInput {
    fn from(request: DesignationRequest) -> Self {
        Self {
            designation_ar: request.designation_ar,
            designation_en: request.designation_en,
            designation_fr: request.designation_fr,
        }
    }
}

/// Row of a designation-only table. Only the tables that are classified carry
/// `phaseType`, `directorType` or `category`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceResponse {
    pub id: Uuid,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phase_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl ReferenceResponse {
    pub fn plain(record: ReferenceRecord) -> Self {
        Self {
            id: record.id,
            designation_ar: record.designation_ar,
            designation_en: record.designation_en,
            designation_fr: record.designation_fr,
            phase_type: None,
            director_type: None,
            category: None,
            created_by: record.created_by,
            created_at: record.created_at,
            updated_by: record.updated_by,
            updated_at: record.updated_at,
        }
    }

    pub fn phase(record: ReferenceRecord) -> Self {
        let phase_type = PhaseType::classify(&record.designation_fr).to_string();
        Self {
            phase_type: Some(phase_type),
            ..Self::plain(record)
        }
    }

    pub fn director(record: ReferenceRecord) -> Self {
        let director_type = DirectorType::classify(&record.designation_fr).to_string();
        Self {
            director_type: Some(director_type),
            ..Self::plain(record)
        }
    }

    pub fn exclusion(record: ReferenceRecord) -> Self {
        let category = ExclusionCategory::classify(&record.designation_fr).to_string();
        Self {
            category: Some(category),
            ..Self::plain(record)
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepRequest {
    pub phase_id: Option<Uuid>,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
}

impl From<StepRequest> for ConsultationStepInput {
    fn from(request: StepRequest) -> Self {
        Self {
            phase_id: request.phase_id,
            designation_ar: request.designation_ar,
            designation_en: request.designation_en,
            designation_fr: request.designation_fr,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StepResponse {
    pub id: Uuid,
    pub phase_id: Uuid,
    pub phase_designation_fr: String,
    pub phase_type: String,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

impl From<StepView> for StepResponse {
    fn from(StepView { step, phase }: StepView) -> Self {
        Self {
            id: step.id,
            phase_id: step.phase_id,
            phase_type: PhaseType::classify(&phase.designation_fr).to_string(),
            phase_designation_fr: phase.designation_fr,
            designation_ar: step.designation_ar,
            designation_en: step.designation_en,
            designation_fr: step.designation_fr,
            created_by: step.created_by,
            created_at: step.created_at,
            updated_by: step.updated_by,
            updated_at: step.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(designation_fr: &str) -> ReferenceRecord {
        let now = Utc::now().naive_utc();
        ReferenceRecord {
            id: Uuid::new_v4(),
            designation_ar: None,
            designation_en: None,
            designation_fr: designation_fr.into(),
            created_by: "tester".into(),
            created_at: now,
            updated_by: "tester".into(),
            updated_at: now,
        }
    }

    #[test]
    fn test_classified_fields() {
        let plain = serde_json::to_value(ReferenceResponse::plain(record("Travaux"))).unwrap();
        assert!(plain.get("phaseType").is_none());
        assert_eq!(plain["designationFr"], "Travaux");

        let director = ReferenceResponse::director(record("Directeur général adjoint"));
        assert_eq!(director.director_type.as_deref(), Some("DEPUTY"));

        let exclusion = ReferenceResponse::exclusion(record("Fraude fiscale"));
        assert_eq!(exclusion.category.as_deref(), Some("FRAUD"));

        let phase = ReferenceResponse::phase(record("Ouverture des plis"));
        assert_eq!(phase.phase_type.as_deref(), Some("OPENING"));
    }
}
