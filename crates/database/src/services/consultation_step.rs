use crate::{
    entities::{consultation_phase, consultation_step},
    error::{ServiceError, ServiceResult},
    services::common::{
        Page, PageRequest, fetch_page, lower_like, now, require_id, require_text, search_pattern,
    },
};
use log::{debug, info};
use models::{actor::Actor, text::non_blank};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ConsultationStepInput {
    pub phase_id: Option<Uuid>,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
}

/// A step together with the phase it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub step: consultation_step::Model,
    pub phase: consultation_phase::Model,
}

pub struct ConsultationStepService;

impl ConsultationStepService {
    pub const ENTITY: &'static str = "consultation step";

    async fn find_model(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> ServiceResult<consultation_step::Model> {
        consultation_step::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    async fn find_phase(
        db: &DatabaseConnection,
        phase_id: Uuid,
    ) -> ServiceResult<consultation_phase::Model> {
        consultation_phase::Entity::find_by_id(phase_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("consultation phase", phase_id))
    }

    async fn ensure_unique(
        db: &DatabaseConnection,
        designation_fr: &str,
        exclude: Option<Uuid>,
    ) -> ServiceResult<()> {
        let mut query = consultation_step::Entity::find()
            .filter(consultation_step::Column::DesignationFr.eq(designation_fr));
        if let Some(id) = exclude {
            query = query.filter(consultation_step::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            debug!("rejected duplicate consultation step '{designation_fr}'");
            return Err(ServiceError::Conflict(format!(
                "consultation step with designation '{designation_fr}' already exists"
            )));
        }
        Ok(())
    }

    /// Delete guard for phases: a phase that still owns steps stays
    pub async fn ensure_phase_unused(db: &DatabaseConnection, phase_id: Uuid) -> ServiceResult<()> {
        let steps = consultation_step::Entity::find()
            .filter(consultation_step::Column::PhaseId.eq(phase_id))
            .count(db)
            .await?;

        if steps > 0 {
            debug!("consultation phase {phase_id} still owns {steps} step(s)");
            return Err(ServiceError::Dependency(format!(
                "consultation phase has {steps} step(s)"
            )));
        }
        Ok(())
    }

    async fn attach_phases(
        db: &DatabaseConnection,
        steps: Vec<consultation_step::Model>,
    ) -> ServiceResult<Vec<StepView>> {
        let phase_ids: Vec<Uuid> = steps.iter().map(|s| s.phase_id).collect();
        let phases = consultation_phase::Entity::find()
            .filter(consultation_phase::Column::Id.is_in(phase_ids))
            .all(db)
            .await?;

        steps
            .into_iter()
            .map(|step| {
                let phase = phases
                    .iter()
                    .find(|p| p.id == step.phase_id)
                    .cloned()
                    .ok_or_else(|| ServiceError::not_found("consultation phase", step.phase_id))?;
                Ok(StepView { step, phase })
            })
            .collect()
    }

    async fn attach_page(
        db: &DatabaseConnection,
        page: Page<consultation_step::Model>,
    ) -> ServiceResult<Page<StepView>> {
        let Page {
            items,
            page,
            size,
            total_items,
        } = page;
        let items = Self::attach_phases(db, items).await?;

        Ok(Page {
            items,
            page,
            size,
            total_items,
        })
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: ConsultationStepInput,
    ) -> ServiceResult<StepView> {
        let phase_id = require_id(input.phase_id, "phaseId")?;
        let designation_fr = require_text(input.designation_fr, "designationFr")?;
        Self::ensure_unique(db, &designation_fr, None).await?;
        let phase = Self::find_phase(db, phase_id).await?;

        let now = now();
        let step = consultation_step::ActiveModel {
            id: Set(Uuid::new_v4()),
            phase_id: Set(phase_id),
            designation_ar: Set(non_blank(input.designation_ar)),
            designation_en: Set(non_blank(input.designation_en)),
            designation_fr: Set(designation_fr),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|err| ServiceError::from_write(err, || "consultation step already exists".into()))?;

        info!("consultation step {} created by {actor}", step.id);
        Ok(StepView { step, phase })
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<StepView> {
        let step = Self::find_model(db, id).await?;
        let phase = Self::find_phase(db, step.phase_id).await?;
        Ok(StepView { step, phase })
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = consultation_step::Entity::find()
            .filter(consultation_step::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_by_designation(
        db: &DatabaseConnection,
        designation_fr: &str,
    ) -> ServiceResult<Option<StepView>> {
        let step = consultation_step::Entity::find()
            .filter(consultation_step::Column::DesignationFr.eq(designation_fr.trim()))
            .one(db)
            .await?;

        match step {
            Some(step) => {
                let phase = Self::find_phase(db, step.phase_id).await?;
                Ok(Some(StepView { step, phase }))
            }
            None => Ok(None),
        }
    }

    pub async fn list(db: &DatabaseConnection, request: &PageRequest) -> ServiceResult<Page<StepView>> {
        let column = match request.sort_by.as_deref() {
            Some("designationAr") => consultation_step::Column::DesignationAr,
            Some("designationEn") => consultation_step::Column::DesignationEn,
            Some("createdAt") => consultation_step::Column::CreatedAt,
            _ => consultation_step::Column::DesignationFr,
        };
        let query = consultation_step::Entity::find().order_by(column, request.direction.into());
        let page = fetch_page(db, query, request).await?;

        Self::attach_page(db, page).await
    }

    pub async fn list_by_phase(
        db: &DatabaseConnection,
        phase_id: Uuid,
    ) -> ServiceResult<Vec<StepView>> {
        let phase = Self::find_phase(db, phase_id).await?;
        let steps = consultation_step::Entity::find()
            .filter(consultation_step::Column::PhaseId.eq(phase_id))
            .order_by_asc(consultation_step::Column::DesignationFr)
            .all(db)
            .await?;

        Ok(steps
            .into_iter()
            .map(|step| StepView {
                step,
                phase: phase.clone(),
            })
            .collect())
    }

    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<StepView>> {
        let pattern = search_pattern(text);
        let query = consultation_step::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(consultation_step::Column::DesignationAr, &pattern))
                    .add(lower_like(consultation_step::Column::DesignationEn, &pattern))
                    .add(lower_like(consultation_step::Column::DesignationFr, &pattern)),
            )
            .order_by_asc(consultation_step::Column::DesignationFr);
        let page = fetch_page(db, query, request).await?;

        Self::attach_page(db, page).await
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: ConsultationStepInput,
    ) -> ServiceResult<StepView> {
        let existing = Self::find_model(db, id).await?;
        let phase_id = require_id(input.phase_id, "phaseId")?;
        let designation_fr = require_text(input.designation_fr, "designationFr")?;
        Self::ensure_unique(db, &designation_fr, Some(id)).await?;
        let phase = Self::find_phase(db, phase_id).await?;

        let mut active: consultation_step::ActiveModel = existing.into();
        active.phase_id = Set(phase_id);
        active.designation_ar = Set(non_blank(input.designation_ar));
        active.designation_en = Set(non_blank(input.designation_en));
        active.designation_fr = Set(designation_fr);
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now());

        let step = active
            .update(db)
            .await
            .map_err(|err| ServiceError::from_write(err, || "consultation step already exists".into()))?;

        info!("consultation step {id} updated by {actor}");
        Ok(StepView { step, phase })
    }

    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        consultation_step::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("consultation step {id} deleted by {actor}");
        Ok(())
    }
}
