use crate::{
    entities::{clearance, provider},
    error::{ServiceError, ServiceResult},
    services::common::{
        Page, PageRequest, fetch_page, lower_like, now, require_id, require_text, search_pattern,
    },
};
use chrono::NaiveDate;
use log::{debug, info};
use models::{actor::Actor, clearance::ClearanceValidity, text::non_blank};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ClearanceInput {
    pub provider_id: Option<Uuid>,
    pub reference: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub observation: Option<String>,
}

/// A clearance with its validity as of the day it was read
#[derive(Debug, Clone, PartialEq)]
pub struct ClearanceView {
    pub clearance: clearance::Model,
    pub validity: ClearanceValidity,
}

impl ClearanceView {
    pub fn new(clearance: clearance::Model, today: NaiveDate) -> Self {
        let validity = ClearanceValidity::evaluate(clearance.start_date, clearance.end_date, today);
        Self {
            clearance,
            validity,
        }
    }
}

struct Validated {
    provider_id: Uuid,
    reference: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    observation: Option<String>,
}

impl Validated {
    fn new(input: ClearanceInput) -> ServiceResult<Self> {
        let provider_id = require_id(input.provider_id, "providerId")?;
        let reference = require_text(input.reference, "reference")?;
        let start_date = input.start_date.ok_or(ServiceError::MissingField("startDate"))?;
        let end_date = input.end_date.ok_or(ServiceError::MissingField("endDate"))?;

        if start_date > end_date {
            debug!("clearance {reference} ends on {end_date} before it starts on {start_date}");
            return Err(ServiceError::Validation(
                "startDate must be on or before endDate".to_owned(),
            ));
        }

        Ok(Self {
            provider_id,
            reference,
            start_date,
            end_date,
            observation: non_blank(input.observation),
        })
    }
}

fn today() -> NaiveDate {
    now().date()
}

pub struct ClearanceService;

impl ClearanceService {
    pub const ENTITY: &'static str = "clearance";

    async fn find_model(db: &DatabaseConnection, id: Uuid) -> ServiceResult<clearance::Model> {
        clearance::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    async fn ensure_provider(db: &DatabaseConnection, provider_id: Uuid) -> ServiceResult<()> {
        let count = provider::Entity::find()
            .filter(provider::Column::Id.eq(provider_id))
            .count(db)
            .await?;
        if count == 0 {
            return Err(ServiceError::not_found("provider", provider_id));
        }
        Ok(())
    }

    fn views(models: Vec<clearance::Model>) -> Vec<ClearanceView> {
        let today = today();
        models
            .into_iter()
            .map(|model| ClearanceView::new(model, today))
            .collect()
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: ClearanceInput,
    ) -> ServiceResult<ClearanceView> {
        let valid = Validated::new(input)?;
        Self::ensure_provider(db, valid.provider_id).await?;

        let now = now();
        let model = clearance::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(valid.provider_id),
            reference: Set(valid.reference),
            start_date: Set(valid.start_date),
            end_date: Set(valid.end_date),
            observation: Set(valid.observation),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(
            "clearance {} for provider {} created by {actor}",
            model.id, model.provider_id
        );
        Ok(ClearanceView::new(model, now.date()))
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: ClearanceInput,
    ) -> ServiceResult<ClearanceView> {
        let existing = Self::find_model(db, id).await?;
        let valid = Validated::new(input)?;
        if valid.provider_id != existing.provider_id {
            Self::ensure_provider(db, valid.provider_id).await?;
        }

        let now = now();
        let mut active: clearance::ActiveModel = existing.into();
        active.provider_id = Set(valid.provider_id);
        active.reference = Set(valid.reference);
        active.start_date = Set(valid.start_date);
        active.end_date = Set(valid.end_date);
        active.observation = Set(valid.observation);
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now);
        let model = active.update(db).await?;

        info!("clearance {id} updated by {actor}");
        Ok(ClearanceView::new(model, now.date()))
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<ClearanceView> {
        let model = Self::find_model(db, id).await?;
        Ok(ClearanceView::new(model, today()))
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = clearance::Entity::find()
            .filter(clearance::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn list(
        db: &DatabaseConnection,
        request: &PageRequest,
    ) -> ServiceResult<Page<ClearanceView>> {
        let column = match request.sort_by.as_deref() {
            Some("reference") => clearance::Column::Reference,
            Some("startDate") => clearance::Column::StartDate,
            Some("createdAt") => clearance::Column::CreatedAt,
            _ => clearance::Column::EndDate,
        };
        let query = clearance::Entity::find().order_by(column, request.direction.into());
        let today = today();

        Ok(fetch_page(db, query, request)
            .await?
            .map(|model| ClearanceView::new(model, today)))
    }

    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<ClearanceView>> {
        let pattern = search_pattern(text);
        let query = clearance::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(clearance::Column::Reference, &pattern))
                    .add(lower_like(clearance::Column::Observation, &pattern)),
            )
            .order_by_desc(clearance::Column::EndDate);
        let today = today();

        Ok(fetch_page(db, query, request)
            .await?
            .map(|model| ClearanceView::new(model, today)))
    }

    /// Latest expiry first
    pub async fn list_by_provider(
        db: &DatabaseConnection,
        provider_id: Uuid,
    ) -> ServiceResult<Vec<ClearanceView>> {
        let models = clearance::Entity::find()
            .filter(clearance::Column::ProviderId.eq(provider_id))
            .order_by_desc(clearance::Column::EndDate)
            .all(db)
            .await?;

        Ok(Self::views(models))
    }

    /// Clearances of the provider that cover `today`
    pub async fn active_for_provider(
        db: &DatabaseConnection,
        provider_id: Uuid,
        today: NaiveDate,
    ) -> ServiceResult<Vec<ClearanceView>> {
        let models = clearance::Entity::find()
            .filter(clearance::Column::ProviderId.eq(provider_id))
            .filter(clearance::Column::StartDate.lte(today))
            .filter(clearance::Column::EndDate.gte(today))
            .order_by_asc(clearance::Column::EndDate)
            .all(db)
            .await?;

        Ok(models
            .into_iter()
            .map(|model| ClearanceView::new(model, today))
            .collect())
    }

    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        clearance::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("clearance {id} deleted by {actor}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actor, seed_provider, setup};
    use chrono::Duration;
    use models::clearance::ClearanceStatus;

    fn input(provider_id: Uuid, reference: &str, start: NaiveDate, end: NaiveDate) -> ClearanceInput {
        ClearanceInput {
            provider_id: Some(provider_id),
            reference: Some(reference.into()),
            start_date: Some(start),
            end_date: Some(end),
            observation: None,
        }
    }

    #[tokio::test]
    async fn test_start_after_end_is_rejected() {
        let db = setup().await;
        let provider = seed_provider(&db, "Alpha").await;
        let today = today();

        let err = ClearanceService::create(
            &db,
            &actor(),
            input(provider.id, "CNAS-1", today, today - Duration::days(1)),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_validity_and_active_filter() {
        let db = setup().await;
        let provider = seed_provider(&db, "Alpha").await;
        let today = today();

        let current = ClearanceService::create(
            &db,
            &actor(),
            input(provider.id, "CNAS-2025", today - Duration::days(10), today + Duration::days(9)),
        )
        .await
        .unwrap();
        assert_eq!(current.validity.status, ClearanceStatus::Valid);
        assert_eq!(current.validity.days_remaining, 10);

        ClearanceService::create(
            &db,
            &actor(),
            input(provider.id, "CNAS-2024", today - Duration::days(400), today - Duration::days(35)),
        )
        .await
        .unwrap();

        let all = ClearanceService::list_by_provider(&db, provider.id).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].validity.status, ClearanceStatus::Expired);

        let active = ClearanceService::active_for_provider(&db, provider.id, today)
            .await
            .unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].clearance.id, current.clearance.id);

        // Last valid day is inclusive
        let on_last_day = ClearanceService::active_for_provider(&db, provider.id, today + Duration::days(9))
            .await
            .unwrap();
        assert_eq!(on_last_day.len(), 1);
    }
}
