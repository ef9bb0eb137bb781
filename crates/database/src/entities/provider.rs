use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Legal entity registered to bid on consultations
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "providers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub company_name: String,
    #[sea_orm(unique)]
    pub tax_id: Option<String>,
    pub trade_register: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_by: String,
    pub created_at: DateTime,
    pub updated_by: String,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
    #[sea_orm(has_many = "super::provider_representator::Entity")]
    Representators,
    #[sea_orm(has_many = "super::clearance::Entity")]
    Clearances,
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl Related<super::provider_representator::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Representators.def()
    }
}

impl Related<super::clearance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clearances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
