use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Procurement procedure (open call for tenders, contest, negotiated, ...)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "award_methods")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    #[sea_orm(unique)]
    pub designation_fr: String,
    pub acronym_ar: Option<String>,
    pub acronym_en: Option<String>,
    #[sea_orm(unique)]
    pub acronym_fr: String,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_by: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::consultation::Entity")]
    Consultations,
}

impl Related<super::consultation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Consultations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
