//! Designation-only reference data (statuses, natures, directors, ...).
//!
//! Every such table has the same shape: optional Arabic and English
//! designations and a required, unique French one. [`reference_service!`]
//! stamps out the CRUD service for one table.

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

use crate::entities::{
    approval_status, budget_type, consultation_phase, exclusion_type, realization_director,
    realization_nature, realization_status,
};

/// Row of any designation-only table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceRecord {
    pub id: Uuid,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: String,
    pub created_by: String,
    pub created_at: NaiveDateTime,
    pub updated_by: String,
    pub updated_at: NaiveDateTime,
}

/// Incoming designations, validated by the service
#[derive(Debug, Clone, Default)]
pub struct DesignationInput {
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
}

impl DesignationInput {
    pub fn fr(designation_fr: impl Into<String>) -> Self {
        Self {
            designation_fr: Some(designation_fr.into()),
            ..Default::default()
        }
    }
}

/// Generates a CRUD service over a designation-only entity module.
///
/// `guard = path` names an async fn `(db, id) -> ServiceResult<()>` run
/// before a delete; it refuses the delete by returning an error.
macro_rules! reference_service {
    ($service:ident, $entity:ident, $label:literal $(, guard = $guard:path)?) => {
        pub struct $service;

        impl $service {
            /// Name used in error messages
            pub const ENTITY: &'static str = $label;

            fn to_record(model: $entity::Model) -> $crate::services::reference::ReferenceRecord {
                $crate::services::reference::ReferenceRecord {
                    id: model.id,
                    designation_ar: model.designation_ar,
                    designation_en: model.designation_en,
                    designation_fr: model.designation_fr,
                    created_by: model.created_by,
                    created_at: model.created_at,
                    updated_by: model.updated_by,
                    updated_at: model.updated_at,
                }
            }

            fn sort_column(sort_by: Option<&str>) -> $entity::Column {
                match sort_by {
                    Some("designationAr") => $entity::Column::DesignationAr,
                    Some("designationEn") => $entity::Column::DesignationEn,
                    Some("createdAt") => $entity::Column::CreatedAt,
                    Some("updatedAt") => $entity::Column::UpdatedAt,
                    _ => $entity::Column::DesignationFr,
                }
            }

            async fn find_model(
                db: &sea_orm::DatabaseConnection,
                id: uuid::Uuid,
            ) -> $crate::error::ServiceResult<$entity::Model> {
                use sea_orm::EntityTrait;

                $entity::Entity::find_by_id(id)
                    .one(db)
                    .await?
                    .ok_or_else(|| $crate::error::ServiceError::not_found(Self::ENTITY, id))
            }

            /// Fails with a conflict when another row already uses `designation_fr`
            async fn ensure_unique(
                db: &sea_orm::DatabaseConnection,
                designation_fr: &str,
                exclude: Option<uuid::Uuid>,
            ) -> $crate::error::ServiceResult<()> {
                use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

                let mut query = $entity::Entity::find()
                    .filter($entity::Column::DesignationFr.eq(designation_fr));
                if let Some(id) = exclude {
                    query = query.filter($entity::Column::Id.ne(id));
                }

                if query.count(db).await? > 0 {
                    log::debug!("rejected duplicate {} '{}'", Self::ENTITY, designation_fr);
                    return Err($crate::error::ServiceError::Conflict(format!(
                        "{} with designation '{}' already exists",
                        Self::ENTITY, designation_fr
                    )));
                }

                Ok(())
            }

            pub async fn create(
                db: &sea_orm::DatabaseConnection,
                actor: &models::actor::Actor,
                input: $crate::services::reference::DesignationInput,
            ) -> $crate::error::ServiceResult<$crate::services::reference::ReferenceRecord> {
                use sea_orm::{ActiveModelTrait, ActiveValue::Set};

                let designation_fr =
                    $crate::services::common::require_text(input.designation_fr, "designationFr")?;
                Self::ensure_unique(db, &designation_fr, None).await?;

                let now = $crate::services::common::now();
                let model = $entity::ActiveModel {
                    id: Set(uuid::Uuid::new_v4()),
                    designation_ar: Set(models::text::non_blank(input.designation_ar)),
                    designation_en: Set(models::text::non_blank(input.designation_en)),
                    designation_fr: Set(designation_fr.clone()),
                    created_by: Set(actor.to_string()),
                    created_at: Set(now),
                    updated_by: Set(actor.to_string()),
                    updated_at: Set(now),
                }
                .insert(db)
                .await
                .map_err(|err| {
                    $crate::error::ServiceError::from_write(err, || {
                        format!("{} with designation '{}' already exists", Self::ENTITY, designation_fr)
                    })
                })?;

                log::info!("{} {} created by {}", Self::ENTITY, model.id, actor);
                Ok(Self::to_record(model))
            }

            pub async fn get(
                db: &sea_orm::DatabaseConnection,
                id: uuid::Uuid,
            ) -> $crate::error::ServiceResult<$crate::services::reference::ReferenceRecord> {
                Self::find_model(db, id).await.map(Self::to_record)
            }

            pub async fn exists(
                db: &sea_orm::DatabaseConnection,
                id: uuid::Uuid,
            ) -> $crate::error::ServiceResult<bool> {
                use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

                let count = $entity::Entity::find()
                    .filter($entity::Column::Id.eq(id))
                    .count(db)
                    .await?;
                Ok(count > 0)
            }

            pub async fn find_by_designation(
                db: &sea_orm::DatabaseConnection,
                designation_fr: &str,
            ) -> $crate::error::ServiceResult<Option<$crate::services::reference::ReferenceRecord>> {
                use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

                let model = $entity::Entity::find()
                    .filter($entity::Column::DesignationFr.eq(designation_fr.trim()))
                    .one(db)
                    .await?;
                Ok(model.map(Self::to_record))
            }

            pub async fn list(
                db: &sea_orm::DatabaseConnection,
                request: &$crate::services::common::PageRequest,
            ) -> $crate::error::ServiceResult<
                $crate::services::common::Page<$crate::services::reference::ReferenceRecord>,
            > {
                use sea_orm::{EntityTrait, QueryOrder};

                let query = $entity::Entity::find().order_by(
                    Self::sort_column(request.sort_by.as_deref()),
                    request.direction.into(),
                );
                let page = $crate::services::common::fetch_page(db, query, request).await?;
                Ok(page.map(Self::to_record))
            }

            /// Case-insensitive match on any of the three designations
            pub async fn search(
                db: &sea_orm::DatabaseConnection,
                text: &str,
                request: &$crate::services::common::PageRequest,
            ) -> $crate::error::ServiceResult<
                $crate::services::common::Page<$crate::services::reference::ReferenceRecord>,
            > {
                use sea_orm::{Condition, EntityTrait, QueryFilter, QueryOrder};
                use $crate::services::common::{lower_like, search_pattern};

                let pattern = search_pattern(text);
                let query = $entity::Entity::find()
                    .filter(
                        Condition::any()
                            .add(lower_like($entity::Column::DesignationAr, &pattern))
                            .add(lower_like($entity::Column::DesignationEn, &pattern))
                            .add(lower_like($entity::Column::DesignationFr, &pattern)),
                    )
                    .order_by_asc($entity::Column::DesignationFr);
                let page = $crate::services::common::fetch_page(db, query, request).await?;
                Ok(page.map(Self::to_record))
            }

            pub async fn update(
                db: &sea_orm::DatabaseConnection,
                actor: &models::actor::Actor,
                id: uuid::Uuid,
                input: $crate::services::reference::DesignationInput,
            ) -> $crate::error::ServiceResult<$crate::services::reference::ReferenceRecord> {
                use sea_orm::{ActiveModelTrait, ActiveValue::Set};

                let existing = Self::find_model(db, id).await?;
                let designation_fr =
                    $crate::services::common::require_text(input.designation_fr, "designationFr")?;
                Self::ensure_unique(db, &designation_fr, Some(id)).await?;

                let mut active: $entity::ActiveModel = existing.into();
                active.designation_ar = Set(models::text::non_blank(input.designation_ar));
                active.designation_en = Set(models::text::non_blank(input.designation_en));
                active.designation_fr = Set(designation_fr.clone());
                active.updated_by = Set(actor.to_string());
                active.updated_at = Set($crate::services::common::now());

                let model = active.update(db).await.map_err(|err| {
                    $crate::error::ServiceError::from_write(err, || {
                        format!("{} with designation '{}' already exists", Self::ENTITY, designation_fr)
                    })
                })?;

                log::info!("{} {} updated by {}", Self::ENTITY, id, actor);
                Ok(Self::to_record(model))
            }

            pub async fn delete(
                db: &sea_orm::DatabaseConnection,
                actor: &models::actor::Actor,
                id: uuid::Uuid,
            ) -> $crate::error::ServiceResult<()> {
                use sea_orm::EntityTrait;

                Self::find_model(db, id).await?;
                $( $guard(db, id).await?; )?

                $entity::Entity::delete_by_id(id)
                    .exec(db)
                    .await
                    .map_err(|err| $crate::error::ServiceError::from_delete(err, Self::ENTITY))?;

                log::info!("{} {} deleted by {}", Self::ENTITY, id, actor);
                Ok(())
            }
        }
    };
}

reference_service!(
    ConsultationPhaseService,
    consultation_phase,
    "consultation phase",
    guard = super::consultation_step::ConsultationStepService::ensure_phase_unused
);
reference_service!(ApprovalStatusService, approval_status, "approval status");
reference_service!(RealizationStatusService, realization_status, "realization status");
reference_service!(RealizationNatureService, realization_nature, "realization nature");
reference_service!(
    RealizationDirectorService,
    realization_director,
    "realization director"
);
reference_service!(BudgetTypeService, budget_type, "budget type");
reference_service!(ExclusionTypeService, exclusion_type, "exclusion type");
