use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One tender / procurement case.
///
/// `(internal_id, consultation_year)` is unique. Every reference column is
/// required; derived figures (offers, lifecycle) are computed when read.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consultations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub internal_id: String,
    pub consultation_year: String,
    pub reference: String,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: String,
    pub allocated_amount: Option<f64>,
    pub financial_estimation: Option<f64>,
    pub start_date: Option<DateTime>,
    pub approval_date: Option<DateTime>,
    pub publish_date: Option<DateTime>,
    pub deadline: Option<DateTime>,
    pub approval_reference: Option<String>,
    pub observation: Option<String>,
    pub award_method_id: Uuid,
    pub realization_nature_id: Uuid,
    pub budget_type_id: Uuid,
    pub realization_status_id: Uuid,
    pub approval_status_id: Uuid,
    pub realization_director_id: Uuid,
    pub consultation_step_id: Uuid,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_by: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::award_method::Entity",
        from = "Column::AwardMethodId",
        to = "super::award_method::Column::Id"
    )]
    AwardMethod,
    #[sea_orm(
        belongs_to = "super::realization_nature::Entity",
        from = "Column::RealizationNatureId",
        to = "super::realization_nature::Column::Id"
    )]
    RealizationNature,
    #[sea_orm(
        belongs_to = "super::budget_type::Entity",
        from = "Column::BudgetTypeId",
        to = "super::budget_type::Column::Id"
    )]
    BudgetType,
    #[sea_orm(
        belongs_to = "super::realization_status::Entity",
        from = "Column::RealizationStatusId",
        to = "super::realization_status::Column::Id"
    )]
    RealizationStatus,
    #[sea_orm(
        belongs_to = "super::approval_status::Entity",
        from = "Column::ApprovalStatusId",
        to = "super::approval_status::Column::Id"
    )]
    ApprovalStatus,
    #[sea_orm(
        belongs_to = "super::realization_director::Entity",
        from = "Column::RealizationDirectorId",
        to = "super::realization_director::Column::Id"
    )]
    RealizationDirector,
    #[sea_orm(
        belongs_to = "super::consultation_step::Entity",
        from = "Column::ConsultationStepId",
        to = "super::consultation_step::Column::Id"
    )]
    ConsultationStep,
    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
}

impl Related<super::award_method::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AwardMethod.def()
    }
}

impl Related<super::consultation_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ConsultationStep.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
