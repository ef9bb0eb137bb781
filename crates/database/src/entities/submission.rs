use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A provider's bid on a consultation. `(consultation_id, tender_id)` is unique.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "submissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub consultation_id: Uuid,
    pub tender_id: Uuid, // provider who bids
    pub submission_date: DateTime,
    pub financial_offer: Option<f64>,
    pub administrative_file_id: Option<Uuid>,
    pub technical_file_id: Option<Uuid>,
    pub financial_file_id: Option<Uuid>,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_by: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::consultation::Entity",
        from = "Column::ConsultationId",
        to = "super::consultation::Column::Id"
    )]
    Consultation,
    #[sea_orm(
        belongs_to = "super::provider::Entity",
        from = "Column::TenderId",
        to = "super::provider::Column::Id"
    )]
    Tender,
    #[sea_orm(
        belongs_to = "super::file::Entity",
        from = "Column::AdministrativeFileId",
        to = "super::file::Column::Id"
    )]
    AdministrativeFile,
    #[sea_orm(
        belongs_to = "super::file::Entity",
        from = "Column::TechnicalFileId",
        to = "super::file::Column::Id"
    )]
    TechnicalFile,
    #[sea_orm(
        belongs_to = "super::file::Entity",
        from = "Column::FinancialFileId",
        to = "super::file::Column::Id"
    )]
    FinancialFile,
}

impl Related<super::consultation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consultation.def()
    }
}

impl Related<super::provider::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tender.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
