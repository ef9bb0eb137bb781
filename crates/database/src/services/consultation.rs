use crate::{
    entities::{
        approval_status, award_method, budget_type, consultation, consultation_step,
        realization_director, realization_nature, realization_status, submission,
    },
    error::{ServiceError, ServiceResult},
    services::common::{
        Page, PageRequest, SortDirection, check_non_negative, fetch_page, lower_like, now,
        require_id, require_text, search_pattern,
    },
};
use chrono::NaiveDateTime;
use futures::try_join;
use log::{debug, info};
use models::{
    actor::Actor,
    consultation::{
        BudgetFigures, ConsultationTimeline, Lifecycle, OfferSummary, default_reference,
    },
    statistics::{ConsultationSnapshot, ConsultationStatistics},
    text::non_blank,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, sea_query::Expr,
};
use std::{collections::HashMap, future::Future};
use uuid::Uuid;

/// Incoming consultation fields; every field is overwritten on update
#[derive(Debug, Clone, Default)]
pub struct ConsultationInput {
    pub internal_id: Option<String>,
    pub consultation_year: Option<String>,
    pub reference: Option<String>,
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
    pub allocated_amount: Option<f64>,
    pub financial_estimation: Option<f64>,
    pub start_date: Option<NaiveDateTime>,
    pub approval_date: Option<NaiveDateTime>,
    pub publish_date: Option<NaiveDateTime>,
    pub deadline: Option<NaiveDateTime>,
    pub approval_reference: Option<String>,
    pub observation: Option<String>,
    pub award_method_id: Option<Uuid>,
    pub realization_nature_id: Option<Uuid>,
    pub budget_type_id: Option<Uuid>,
    pub realization_status_id: Option<Uuid>,
    pub approval_status_id: Option<Uuid>,
    pub realization_director_id: Option<Uuid>,
    pub consultation_step_id: Option<Uuid>,
}

/// Ids of the seven required references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceIds {
    pub award_method: Uuid,
    pub realization_nature: Uuid,
    pub budget_type: Uuid,
    pub realization_status: Uuid,
    pub approval_status: Uuid,
    pub realization_director: Uuid,
    pub consultation_step: Uuid,
}

impl ReferenceIds {
    fn of(model: &consultation::Model) -> Self {
        Self {
            award_method: model.award_method_id,
            realization_nature: model.realization_nature_id,
            budget_type: model.budget_type_id,
            realization_status: model.realization_status_id,
            approval_status: model.approval_status_id,
            realization_director: model.realization_director_id,
            consultation_step: model.consultation_step_id,
        }
    }
}

/// The seven references, loaded
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationReferences {
    pub award_method: award_method::Model,
    pub realization_nature: realization_nature::Model,
    pub budget_type: budget_type::Model,
    pub realization_status: realization_status::Model,
    pub approval_status: approval_status::Model,
    pub realization_director: realization_director::Model,
    pub consultation_step: consultation_step::Model,
}

/// Figures derived at read time, never stored
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsultationMetrics {
    pub offers: OfferSummary,
    pub days_until_deadline: Option<i64>,
    pub is_active: bool,
    pub is_expired: bool,
    pub lifecycle: Lifecycle,
    pub has_budget_overrun: bool,
    pub budget_variance_percentage: f64,
    pub is_high_value: bool,
}

impl ConsultationMetrics {
    pub fn compute(model: &consultation::Model, offers: OfferSummary, now: NaiveDateTime) -> Self {
        let budget = BudgetFigures::new(model.allocated_amount, model.financial_estimation);
        let timeline = ConsultationTimeline::new(model.publish_date, model.deadline);

        Self {
            offers,
            days_until_deadline: timeline.days_until_deadline(now),
            is_active: timeline.is_active(now),
            is_expired: timeline.is_expired(now),
            lifecycle: timeline.lifecycle(now),
            has_budget_overrun: budget.has_budget_overrun(),
            budget_variance_percentage: budget.budget_variance_percentage(),
            is_high_value: budget.is_high_value(),
        }
    }
}

/// A consultation as shown to callers
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationView {
    pub consultation: consultation::Model,
    pub references: ConsultationReferences,
    pub metrics: ConsultationMetrics,
}

/// View plus every submission received
#[derive(Debug, Clone, PartialEq)]
pub struct ConsultationDetails {
    pub view: ConsultationView,
    pub submissions: Vec<submission::Model>,
}

/// Input that passed the required-field checks
struct ValidatedConsultation {
    internal_id: String,
    consultation_year: String,
    reference: String,
    designation_fr: String,
    references: ReferenceIds,
    input: ConsultationInput,
}

impl ValidatedConsultation {
    fn new(input: ConsultationInput) -> ServiceResult<Self> {
        let internal_id = require_text(input.internal_id.clone(), "internalId")?;
        let consultation_year = require_text(input.consultation_year.clone(), "consultationYear")?;
        let designation_fr = require_text(input.designation_fr.clone(), "designationFr")?;

        let references = ReferenceIds {
            award_method: require_id(input.award_method_id, "awardMethodId")?,
            realization_nature: require_id(input.realization_nature_id, "realizationNatureId")?,
            budget_type: require_id(input.budget_type_id, "budgetTypeId")?,
            realization_status: require_id(input.realization_status_id, "realizationStatusId")?,
            approval_status: require_id(input.approval_status_id, "approvalStatusId")?,
            realization_director: require_id(
                input.realization_director_id,
                "realizationDirectorId",
            )?,
            consultation_step: require_id(input.consultation_step_id, "consultationStepId")?,
        };

        check_non_negative(input.allocated_amount, "allocatedAmount")?;
        check_non_negative(input.financial_estimation, "financialEstimation")?;

        let reference = non_blank(input.reference.clone())
            .unwrap_or_else(|| default_reference(&internal_id, &consultation_year));

        Ok(Self {
            internal_id,
            consultation_year,
            reference,
            designation_fr,
            references,
            input,
        })
    }

    /// Writes every field, changed or not
    fn apply(self, active: &mut consultation::ActiveModel) {
        let refs = self.references;
        let input = self.input;

        active.internal_id = Set(self.internal_id);
        active.consultation_year = Set(self.consultation_year);
        active.reference = Set(self.reference);
        active.designation_ar = Set(non_blank(input.designation_ar));
        active.designation_en = Set(non_blank(input.designation_en));
        active.designation_fr = Set(self.designation_fr);
        active.allocated_amount = Set(input.allocated_amount);
        active.financial_estimation = Set(input.financial_estimation);
        active.start_date = Set(input.start_date);
        active.approval_date = Set(input.approval_date);
        active.publish_date = Set(input.publish_date);
        active.deadline = Set(input.deadline);
        active.approval_reference = Set(non_blank(input.approval_reference));
        active.observation = Set(non_blank(input.observation));
        active.award_method_id = Set(refs.award_method);
        active.realization_nature_id = Set(refs.realization_nature);
        active.budget_type_id = Set(refs.budget_type);
        active.realization_status_id = Set(refs.realization_status);
        active.approval_status_id = Set(refs.approval_status);
        active.realization_director_id = Set(refs.realization_director);
        active.consultation_step_id = Set(refs.consultation_step);
    }
}

/// Awaits a lookup and turns an empty result into a not-found naming `entity`
async fn require<M>(
    lookup: impl Future<Output = Result<Option<M>, DbErr>>,
    entity: &'static str,
    id: Uuid,
) -> ServiceResult<M> {
    lookup
        .await?
        .ok_or_else(|| ServiceError::not_found(entity, id))
}

/// Like [`require`], skipped when the reference did not change
async fn require_if_changed<M>(
    current: Uuid,
    next: Uuid,
    lookup: impl Future<Output = Result<Option<M>, DbErr>>,
    entity: &'static str,
) -> ServiceResult<()> {
    if current == next {
        return Ok(());
    }
    require(lookup, entity, next).await.map(|_| ())
}

/// Loads the rows of `$entity` whose id is in `$ids`, keyed by id
macro_rules! load_by_ids {
    ($db:expr, $entity:ident, $ids:expr) => {
        async {
            let rows = $entity::Entity::find()
                .filter($entity::Column::Id.is_in($ids))
                .all($db)
                .await?;
            Ok::<_, ServiceError>(rows.into_iter().map(|m| (m.id, m)).collect::<HashMap<_, _>>())
        }
    };
}

fn pick<M: Clone>(rows: &HashMap<Uuid, M>, id: Uuid, entity: &'static str) -> ServiceResult<M> {
    rows.get(&id)
        .cloned()
        .ok_or_else(|| ServiceError::not_found(entity, id))
}

pub struct ConsultationService;

impl ConsultationService {
    pub const ENTITY: &'static str = "consultation";

    async fn find_model(db: &DatabaseConnection, id: Uuid) -> ServiceResult<consultation::Model> {
        consultation::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    /// `(internal_id, consultation_year)` must not belong to another consultation
    async fn ensure_unique(
        db: &DatabaseConnection,
        internal_id: &str,
        consultation_year: &str,
        exclude: Option<Uuid>,
    ) -> ServiceResult<()> {
        let mut query = consultation::Entity::find()
            .filter(consultation::Column::InternalId.eq(internal_id))
            .filter(consultation::Column::ConsultationYear.eq(consultation_year));
        if let Some(id) = exclude {
            query = query.filter(consultation::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            debug!("rejected duplicate consultation {internal_id}/{consultation_year}");
            return Err(ServiceError::Conflict(Self::duplicate(
                internal_id,
                consultation_year,
            )));
        }
        Ok(())
    }

    fn duplicate(internal_id: &str, consultation_year: &str) -> String {
        format!("consultation {internal_id} already exists for year {consultation_year}")
    }

    /// Resolves all seven references at once
    async fn resolve_references(
        db: &DatabaseConnection,
        ids: &ReferenceIds,
    ) -> ServiceResult<ConsultationReferences> {
        let (
            award_method,
            realization_nature,
            budget_type,
            realization_status,
            approval_status,
            realization_director,
            consultation_step,
        ) = try_join!(
            require(
                award_method::Entity::find_by_id(ids.award_method).one(db),
                "award method",
                ids.award_method,
            ),
            require(
                realization_nature::Entity::find_by_id(ids.realization_nature).one(db),
                "realization nature",
                ids.realization_nature,
            ),
            require(
                budget_type::Entity::find_by_id(ids.budget_type).one(db),
                "budget type",
                ids.budget_type,
            ),
            require(
                realization_status::Entity::find_by_id(ids.realization_status).one(db),
                "realization status",
                ids.realization_status,
            ),
            require(
                approval_status::Entity::find_by_id(ids.approval_status).one(db),
                "approval status",
                ids.approval_status,
            ),
            require(
                realization_director::Entity::find_by_id(ids.realization_director).one(db),
                "realization director",
                ids.realization_director,
            ),
            require(
                consultation_step::Entity::find_by_id(ids.consultation_step).one(db),
                "consultation step",
                ids.consultation_step,
            ),
        )?;

        Ok(ConsultationReferences {
            award_method,
            realization_nature,
            budget_type,
            realization_status,
            approval_status,
            realization_director,
            consultation_step,
        })
    }

    /// Checks only the references whose id differs from what is stored
    async fn ensure_changed_references(
        db: &DatabaseConnection,
        current: &ReferenceIds,
        next: &ReferenceIds,
    ) -> ServiceResult<()> {
        try_join!(
            require_if_changed(
                current.award_method,
                next.award_method,
                award_method::Entity::find_by_id(next.award_method).one(db),
                "award method",
            ),
            require_if_changed(
                current.realization_nature,
                next.realization_nature,
                realization_nature::Entity::find_by_id(next.realization_nature).one(db),
                "realization nature",
            ),
            require_if_changed(
                current.budget_type,
                next.budget_type,
                budget_type::Entity::find_by_id(next.budget_type).one(db),
                "budget type",
            ),
            require_if_changed(
                current.realization_status,
                next.realization_status,
                realization_status::Entity::find_by_id(next.realization_status).one(db),
                "realization status",
            ),
            require_if_changed(
                current.approval_status,
                next.approval_status,
                approval_status::Entity::find_by_id(next.approval_status).one(db),
                "approval status",
            ),
            require_if_changed(
                current.realization_director,
                next.realization_director,
                realization_director::Entity::find_by_id(next.realization_director).one(db),
                "realization director",
            ),
            require_if_changed(
                current.consultation_step,
                next.consultation_step,
                consultation_step::Entity::find_by_id(next.consultation_step).one(db),
                "consultation step",
            ),
        )?;

        Ok(())
    }

    /// Financial offers of the given consultations, grouped by consultation
    async fn offers_by_consultation(
        db: &DatabaseConnection,
        consultation_ids: Vec<Uuid>,
    ) -> ServiceResult<HashMap<Uuid, Vec<Option<f64>>>> {
        let rows = submission::Entity::find()
            .select_only()
            .column(submission::Column::ConsultationId)
            .column(submission::Column::FinancialOffer)
            .filter(submission::Column::ConsultationId.is_in(consultation_ids))
            .into_tuple::<(Uuid, Option<f64>)>()
            .all(db)
            .await?;

        let mut offers: HashMap<Uuid, Vec<Option<f64>>> = HashMap::new();
        for (consultation_id, offer) in rows {
            offers.entry(consultation_id).or_default().push(offer);
        }
        Ok(offers)
    }

    /// Builds views for a batch of consultations with one query per table
    async fn assemble_views(
        db: &DatabaseConnection,
        consultations: Vec<consultation::Model>,
    ) -> ServiceResult<Vec<ConsultationView>> {
        if consultations.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<ReferenceIds> = consultations.iter().map(ReferenceIds::of).collect();
        let collect = |f: fn(&ReferenceIds) -> Uuid| ids.iter().map(f).collect::<Vec<_>>();

        let (
            award_methods,
            realization_natures,
            budget_types,
            realization_statuses,
            approval_statuses,
            realization_directors,
            consultation_steps,
            mut offers,
        ) = try_join!(
            load_by_ids!(db, award_method, collect(|r| r.award_method)),
            load_by_ids!(db, realization_nature, collect(|r| r.realization_nature)),
            load_by_ids!(db, budget_type, collect(|r| r.budget_type)),
            load_by_ids!(db, realization_status, collect(|r| r.realization_status)),
            load_by_ids!(db, approval_status, collect(|r| r.approval_status)),
            load_by_ids!(db, realization_director, collect(|r| r.realization_director)),
            load_by_ids!(db, consultation_step, collect(|r| r.consultation_step)),
            Self::offers_by_consultation(db, consultations.iter().map(|c| c.id).collect()),
        )?;

        let now = now();
        consultations
            .into_iter()
            .map(|consultation| {
                let refs = ReferenceIds::of(&consultation);
                let references = ConsultationReferences {
                    award_method: pick(&award_methods, refs.award_method, "award method")?,
                    realization_nature: pick(
                        &realization_natures,
                        refs.realization_nature,
                        "realization nature",
                    )?,
                    budget_type: pick(&budget_types, refs.budget_type, "budget type")?,
                    realization_status: pick(
                        &realization_statuses,
                        refs.realization_status,
                        "realization status",
                    )?,
                    approval_status: pick(
                        &approval_statuses,
                        refs.approval_status,
                        "approval status",
                    )?,
                    realization_director: pick(
                        &realization_directors,
                        refs.realization_director,
                        "realization director",
                    )?,
                    consultation_step: pick(
                        &consultation_steps,
                        refs.consultation_step,
                        "consultation step",
                    )?,
                };
                let summary =
                    OfferSummary::from_offers(offers.remove(&consultation.id).unwrap_or_default());
                let metrics = ConsultationMetrics::compute(&consultation, summary, now);

                Ok(ConsultationView {
                    consultation,
                    references,
                    metrics,
                })
            })
            .collect()
    }

    async fn assemble_view(
        db: &DatabaseConnection,
        consultation: consultation::Model,
    ) -> ServiceResult<ConsultationView> {
        let id = consultation.id;
        Self::assemble_views(db, vec![consultation])
            .await?
            .pop()
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    async fn assemble_page(
        db: &DatabaseConnection,
        page: Page<consultation::Model>,
    ) -> ServiceResult<Page<ConsultationView>> {
        let Page {
            items,
            page,
            size,
            total_items,
        } = page;
        let items = Self::assemble_views(db, items).await?;

        Ok(Page {
            items,
            page,
            size,
            total_items,
        })
    }

    /// Validates, checks uniqueness, resolves the seven references, then inserts.
    /// Nothing is written unless every step passes.
    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: ConsultationInput,
    ) -> ServiceResult<ConsultationView> {
        let validated = ValidatedConsultation::new(input)?;
        Self::ensure_unique(db, &validated.internal_id, &validated.consultation_year, None).await?;
        let references = Self::resolve_references(db, &validated.references).await?;

        let (internal_id, consultation_year) = (
            validated.internal_id.clone(),
            validated.consultation_year.clone(),
        );
        let now = now();
        let mut active = consultation::ActiveModel {
            id: Set(Uuid::new_v4()),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
            ..Default::default()
        };
        validated.apply(&mut active);

        let consultation = active.insert(db).await.map_err(|err| {
            ServiceError::from_write(err, || Self::duplicate(&internal_id, &consultation_year))
        })?;

        info!(
            "consultation {} ({}) created by {actor}",
            consultation.id, consultation.reference
        );

        let metrics = ConsultationMetrics::compute(&consultation, OfferSummary::default(), now);
        Ok(ConsultationView {
            consultation,
            references,
            metrics,
        })
    }

    /// Same checks as [`Self::create`]; uniqueness ignores this consultation and
    /// only references whose id changed are looked up again
    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: ConsultationInput,
    ) -> ServiceResult<ConsultationView> {
        let existing = Self::find_model(db, id).await?;
        let validated = ValidatedConsultation::new(input)?;
        Self::ensure_unique(
            db,
            &validated.internal_id,
            &validated.consultation_year,
            Some(id),
        )
        .await?;
        Self::ensure_changed_references(db, &ReferenceIds::of(&existing), &validated.references)
            .await?;

        let (internal_id, consultation_year) = (
            validated.internal_id.clone(),
            validated.consultation_year.clone(),
        );
        let mut active: consultation::ActiveModel = existing.into();
        validated.apply(&mut active);
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now());

        let consultation = active.update(db).await.map_err(|err| {
            ServiceError::from_write(err, || Self::duplicate(&internal_id, &consultation_year))
        })?;

        info!("consultation {id} updated by {actor}");
        Self::assemble_view(db, consultation).await
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<ConsultationView> {
        let consultation = Self::find_model(db, id).await?;
        Self::assemble_view(db, consultation).await
    }

    /// View plus every submission, oldest first
    pub async fn get_details(db: &DatabaseConnection, id: Uuid) -> ServiceResult<ConsultationDetails> {
        let view = Self::get(db, id).await?;
        let submissions = submission::Entity::find()
            .filter(submission::Column::ConsultationId.eq(id))
            .order_by_asc(submission::Column::SubmissionDate)
            .all(db)
            .await?;

        Ok(ConsultationDetails { view, submissions })
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = consultation::Entity::find()
            .filter(consultation::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_by_internal_id(
        db: &DatabaseConnection,
        internal_id: &str,
        consultation_year: &str,
    ) -> ServiceResult<Option<ConsultationView>> {
        let consultation = consultation::Entity::find()
            .filter(consultation::Column::InternalId.eq(internal_id.trim()))
            .filter(consultation::Column::ConsultationYear.eq(consultation_year.trim()))
            .one(db)
            .await?;

        match consultation {
            Some(consultation) => Ok(Some(Self::assemble_view(db, consultation).await?)),
            None => Ok(None),
        }
    }

    pub async fn list(
        db: &DatabaseConnection,
        request: &PageRequest,
    ) -> ServiceResult<Page<ConsultationView>> {
        let column = match request.sort_by.as_deref() {
            Some("internalId") => consultation::Column::InternalId,
            Some("consultationYear") => consultation::Column::ConsultationYear,
            Some("reference") => consultation::Column::Reference,
            Some("designationFr") => consultation::Column::DesignationFr,
            Some("allocatedAmount") => consultation::Column::AllocatedAmount,
            Some("financialEstimation") => consultation::Column::FinancialEstimation,
            Some("publishDate") => consultation::Column::PublishDate,
            Some("deadline") => consultation::Column::Deadline,
            _ => consultation::Column::CreatedAt,
        };
        let query = consultation::Entity::find()
            .order_by(column, request.direction.into())
            .order_by_asc(consultation::Column::Id);
        let page = fetch_page(db, query, request).await?;

        Self::assemble_page(db, page).await
    }

    /// Case-insensitive match on reference, internal id and designations
    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<ConsultationView>> {
        let pattern = search_pattern(text);
        let query = consultation::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(consultation::Column::Reference, &pattern))
                    .add(lower_like(consultation::Column::InternalId, &pattern))
                    .add(lower_like(consultation::Column::DesignationAr, &pattern))
                    .add(lower_like(consultation::Column::DesignationEn, &pattern))
                    .add(lower_like(consultation::Column::DesignationFr, &pattern)),
            )
            .order_by(
                consultation::Column::ConsultationYear,
                SortDirection::Desc.into(),
            )
            .order_by_asc(consultation::Column::InternalId);
        let page = fetch_page(db, query, request).await?;

        Self::assemble_page(db, page).await
    }

    pub async fn list_by_year(
        db: &DatabaseConnection,
        consultation_year: &str,
    ) -> ServiceResult<Vec<ConsultationView>> {
        let consultations = consultation::Entity::find()
            .filter(consultation::Column::ConsultationYear.eq(consultation_year.trim()))
            .order_by_asc(consultation::Column::InternalId)
            .all(db)
            .await?;

        Self::assemble_views(db, consultations).await
    }

    /// Submissions are removed with their consultation
    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        consultation::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("consultation {id} deleted by {actor}");
        Ok(())
    }

    /// Year figures, recomputed from the rows on every call
    pub async fn statistics(
        db: &DatabaseConnection,
        consultation_year: &str,
    ) -> ServiceResult<ConsultationStatistics> {
        let year = consultation_year.trim();
        let consultations = consultation::Entity::find()
            .filter(consultation::Column::ConsultationYear.eq(year))
            .all(db)
            .await?;

        let counts: HashMap<Uuid, i64> = if consultations.is_empty() {
            HashMap::new()
        } else {
            submission::Entity::find()
                .select_only()
                .column(submission::Column::ConsultationId)
                .column_as(Expr::col(submission::Column::Id).count(), "submission_count")
                .filter(
                    submission::Column::ConsultationId
                        .is_in(consultations.iter().map(|c| c.id).collect::<Vec<_>>()),
                )
                .group_by(submission::Column::ConsultationId)
                .into_tuple::<(Uuid, i64)>()
                .all(db)
                .await?
                .into_iter()
                .collect()
        };

        let snapshots: Vec<ConsultationSnapshot> = consultations
            .iter()
            .map(|c| ConsultationSnapshot {
                allocated_amount: c.allocated_amount,
                financial_estimation: c.financial_estimation,
                publish_date: c.publish_date,
                deadline: c.deadline,
                submission_count: counts.get(&c.id).copied().unwrap_or(0).max(0) as u64,
            })
            .collect();

        Ok(ConsultationStatistics::compute(year, &snapshots, now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::submission::{SubmissionInput, SubmissionService},
        testing::{actor, consultation_input, seed, seed_provider, setup},
    };
    use chrono::Duration;
    use models::award_method::AwardMethodCategory;

    #[tokio::test]
    async fn test_create_assembles_view() {
        let db = setup().await;
        let seed = seed(&db).await;

        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "42", "2025", Duration::days(10)),
        )
        .await
        .unwrap();

        assert_eq!(view.consultation.reference, "CONS-42-2025");
        assert_eq!(view.consultation.created_by, "tester");
        assert_eq!(view.references.award_method.acronym_fr, "AOO");
        assert_eq!(
            crate::services::award_method::AwardMethodService::category(
                &view.references.award_method
            ),
            AwardMethodCategory::AppelOffres
        );
        assert_eq!(view.metrics.lifecycle, Lifecycle::Open);
        assert!(view.metrics.is_active);
        assert_eq!(view.metrics.offers.submission_count, 0);
        assert!(!view.metrics.has_budget_overrun);
    }

    #[tokio::test]
    async fn test_explicit_reference_is_kept() {
        let db = setup().await;
        let seed = seed(&db).await;
        let mut input = consultation_input(&seed, "7", "2025", Duration::days(3));
        input.reference = Some("  DAO/7/2025 ".into());

        let view = ConsultationService::create(&db, &actor(), input).await.unwrap();
        assert_eq!(view.consultation.reference, "DAO/7/2025");
    }

    #[tokio::test]
    async fn test_missing_field_writes_nothing() {
        let db = setup().await;
        let seed = seed(&db).await;
        let cases: [(&str, fn(&mut ConsultationInput)); 10] = [
            ("internalId", |input| input.internal_id = None),
            ("consultationYear", |input| input.consultation_year = Some("  ".into())),
            ("designationFr", |input| input.designation_fr = None),
            ("awardMethodId", |input| input.award_method_id = None),
            ("realizationNatureId", |input| input.realization_nature_id = None),
            ("budgetTypeId", |input| input.budget_type_id = None),
            ("realizationStatusId", |input| input.realization_status_id = None),
            ("approvalStatusId", |input| input.approval_status_id = None),
            ("realizationDirectorId", |input| input.realization_director_id = None),
            ("consultationStepId", |input| input.consultation_step_id = None),
        ];

        for (field, clear) in cases {
            let mut input = consultation_input(&seed, "1", "2025", Duration::days(3));
            clear(&mut input);

            let err = ConsultationService::create(&db, &actor(), input).await.unwrap_err();
            assert!(
                matches!(err, ServiceError::MissingField(name) if name == field),
                "{field}: {err:?}"
            );
            assert_eq!(consultation::Entity::find().count(&db).await.unwrap(), 0);
        }
    }

    #[tokio::test]
    async fn test_negative_amount_is_rejected() {
        let db = setup().await;
        let seed = seed(&db).await;
        let mut input = consultation_input(&seed, "1", "2025", Duration::days(3));
        input.allocated_amount = Some(-5.0);

        let err = ConsultationService::create(&db, &actor(), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_reference_is_not_found() {
        let db = setup().await;
        let seed = seed(&db).await;
        let mut input = consultation_input(&seed, "1", "2025", Duration::days(3));
        input.realization_director_id = Some(Uuid::new_v4());

        let err = ConsultationService::create(&db, &actor(), input).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "realization director",
                ..
            }
        ));
        assert_eq!(consultation::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_internal_id_and_year() {
        let db = setup().await;
        let seed = seed(&db).await;
        let input = consultation_input(&seed, "9", "2025", Duration::days(3));

        ConsultationService::create(&db, &actor(), input.clone())
            .await
            .unwrap();
        let err = ConsultationService::create(&db, &actor(), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Same internal id in another year is a different consultation
        ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "9", "2026", Duration::days(3)),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_update_excludes_self_and_overwrites() {
        let db = setup().await;
        let seed = seed(&db).await;
        let created = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "3", "2025", Duration::days(3)),
        )
        .await
        .unwrap();

        let mut input = consultation_input(&seed, "3", "2025", Duration::days(3));
        input.observation = Some("revised".into());
        input.financial_estimation = None;
        let updated = ConsultationService::update(
            &db,
            &models::actor::Actor::new("editor"),
            created.consultation.id,
            input,
        )
        .await
        .unwrap();

        assert_eq!(updated.consultation.observation.as_deref(), Some("revised"));
        assert_eq!(updated.consultation.financial_estimation, None);
        assert_eq!(updated.consultation.created_by, "tester");
        assert_eq!(updated.consultation.updated_by, "editor");
    }

    #[tokio::test]
    async fn test_update_to_unknown_reference_is_not_found() {
        let db = setup().await;
        let seed = seed(&db).await;
        let created = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "5", "2025", Duration::days(3)),
        )
        .await
        .unwrap();

        let mut input = consultation_input(&seed, "5", "2025", Duration::days(3));
        input.award_method_id = Some(Uuid::new_v4());
        input.observation = Some("never stored".into());
        let err = ConsultationService::update(&db, &actor(), created.consultation.id, input)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "award method",
                ..
            }
        ));

        let stored = ConsultationService::get(&db, created.consultation.id).await.unwrap();
        assert_eq!(stored.consultation.award_method_id, seed.award_method_id);
        assert_eq!(stored.consultation.observation, None);
    }

    #[tokio::test]
    async fn test_update_into_taken_key_conflicts() {
        let db = setup().await;
        let seed = seed(&db).await;
        ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(3)),
        )
        .await
        .unwrap();
        let second = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "2", "2025", Duration::days(3)),
        )
        .await
        .unwrap();

        let err = ConsultationService::update(
            &db,
            &actor(),
            second.consultation.id,
            consultation_input(&seed, "1", "2025", Duration::days(3)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_details_and_delete_cascade() {
        let db = setup().await;
        let seed = seed(&db).await;
        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "5", "2025", Duration::days(3)),
        )
        .await
        .unwrap();
        let id = view.consultation.id;

        for (name, offer) in [("Alpha", 100.0), ("Beta", 300.0)] {
            let provider = seed_provider(&db, name).await;
            SubmissionService::create(
                &db,
                &actor(),
                SubmissionInput {
                    consultation_id: Some(id),
                    tender_id: Some(provider.id),
                    financial_offer: Some(offer),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let details = ConsultationService::get_details(&db, id).await.unwrap();
        assert_eq!(details.submissions.len(), 2);
        assert_eq!(details.view.metrics.offers.submission_count, 2);
        assert_eq!(details.view.metrics.offers.min_offer, Some(100.0));
        assert_eq!(details.view.metrics.offers.average_offer, Some(200.0));

        ConsultationService::delete(&db, &actor(), id).await.unwrap();
        assert!(!ConsultationService::exists(&db, id).await.unwrap());
        assert_eq!(submission::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_lookup_list_and_search() {
        let db = setup().await;
        let seed = seed(&db).await;
        for (internal_id, year) in [("1", "2024"), ("2", "2025"), ("3", "2025")] {
            ConsultationService::create(
                &db,
                &actor(),
                consultation_input(&seed, internal_id, year, Duration::days(3)),
            )
            .await
            .unwrap();
        }

        let found = ConsultationService::find_by_internal_id(&db, "2", "2025")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.consultation.reference, "CONS-2-2025");
        assert!(
            ConsultationService::find_by_internal_id(&db, "2", "2024")
                .await
                .unwrap()
                .is_none()
        );

        assert_eq!(ConsultationService::list_by_year(&db, "2025").await.unwrap().len(), 2);

        let page = ConsultationService::list(
            &db,
            &PageRequest::new(0, 2).sorted(Some("internalId".into()), SortDirection::Desc),
        )
        .await
        .unwrap();
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages(), 2);
        assert_eq!(page.items[0].consultation.internal_id, "3");

        let hits = ConsultationService::search(&db, "cons-3", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total_items, 1);
    }

    #[tokio::test]
    async fn test_statistics_for_empty_year() {
        let db = setup().await;

        let stats = ConsultationService::statistics(&db, "1999").await.unwrap();
        assert_eq!(stats.total_consultations, 0);
        assert_eq!(stats.average_consultation_value, 0.0);
        assert_eq!(stats.average_competitive_ratio, 0.0);
    }

    #[tokio::test]
    async fn test_statistics_for_year() {
        let db = setup().await;
        let seed = seed(&db).await;
        let open = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(3)),
        )
        .await
        .unwrap();
        let mut big = consultation_input(&seed, "2", "2025", Duration::days(-3));
        big.allocated_amount = Some(2_000_000.0);
        ConsultationService::create(&db, &actor(), big).await.unwrap();

        let provider = seed_provider(&db, "Gamma").await;
        SubmissionService::create(
            &db,
            &actor(),
            SubmissionInput {
                consultation_id: Some(open.consultation.id),
                tender_id: Some(provider.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let stats = ConsultationService::statistics(&db, "2025").await.unwrap();
        assert_eq!(stats.total_consultations, 2);
        assert_eq!(stats.total_allocated_amount, 2_500_000.0);
        assert_eq!(stats.average_consultation_value, 1_250_000.0);
        assert_eq!(stats.active_consultations, 1);
        assert_eq!(stats.expired_consultations, 1);
        assert_eq!(stats.consultations_with_submissions, 1);
        assert_eq!(stats.high_value_consultations, 1);
        assert_eq!(stats.average_competitive_ratio, 0.5);
    }
}
