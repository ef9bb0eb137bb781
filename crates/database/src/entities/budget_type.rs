use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Budget line a consultation is financed from
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "budget_types")]
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
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
