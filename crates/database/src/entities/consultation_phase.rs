use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stage of the tender lifecycle, split into steps
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "consultation_phases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    #[sea_orm(unique)]
    pub designation_fr: String,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_by: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::consultation_step::Entity")]
    Steps,
}

impl Related<super::consultation_step::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Steps.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
