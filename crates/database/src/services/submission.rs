use crate::{
    entities::{consultation, file, provider, submission},
    error::{ServiceError, ServiceResult},
    services::common::{
        Page, PageRequest, check_non_negative, fetch_page, lower_like, now, require_id,
        search_pattern,
    },
};
use chrono::NaiveDateTime;
use futures::try_join;
use log::{debug, info};
use models::{actor::Actor, consultation::OfferSummary};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct SubmissionInput {
    pub consultation_id: Option<Uuid>,
    pub tender_id: Option<Uuid>,
    pub submission_date: Option<NaiveDateTime>,
    pub financial_offer: Option<f64>,
    pub administrative_file_id: Option<Uuid>,
    pub technical_file_id: Option<Uuid>,
    pub financial_file_id: Option<Uuid>,
}

pub struct SubmissionService;

impl SubmissionService {
    pub const ENTITY: &'static str = "submission";

    async fn find_model(db: &DatabaseConnection, id: Uuid) -> ServiceResult<submission::Model> {
        submission::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    fn duplicate() -> String {
        "this provider has already submitted an offer for this consultation".to_owned()
    }

    /// A consultation stops accepting bids once its deadline has passed
    async fn ensure_open_consultation(
        db: &DatabaseConnection,
        consultation_id: Uuid,
    ) -> ServiceResult<()> {
        let consultation = consultation::Entity::find_by_id(consultation_id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("consultation", consultation_id))?;

        if let Some(deadline) = consultation.deadline
            && deadline < now()
        {
            debug!("consultation {consultation_id} closed at {deadline}");
            return Err(ServiceError::Validation(format!(
                "the submission deadline of consultation {} has passed",
                consultation.reference
            )));
        }
        Ok(())
    }

    async fn ensure_provider(db: &DatabaseConnection, tender_id: Uuid) -> ServiceResult<()> {
        let count = provider::Entity::find()
            .filter(provider::Column::Id.eq(tender_id))
            .count(db)
            .await?;
        if count == 0 {
            return Err(ServiceError::not_found("provider", tender_id));
        }
        Ok(())
    }

    async fn ensure_pair_free(
        db: &DatabaseConnection,
        consultation_id: Uuid,
        tender_id: Uuid,
        exclude: Option<Uuid>,
    ) -> ServiceResult<()> {
        let mut query = submission::Entity::find()
            .filter(submission::Column::ConsultationId.eq(consultation_id))
            .filter(submission::Column::TenderId.eq(tender_id));
        if let Some(id) = exclude {
            query = query.filter(submission::Column::Id.ne(id));
        }

        if query.count(db).await? > 0 {
            debug!("provider {tender_id} already bid on consultation {consultation_id}");
            return Err(ServiceError::Conflict(Self::duplicate()));
        }
        Ok(())
    }

    async fn ensure_file(
        db: &DatabaseConnection,
        file_id: Option<Uuid>,
        part: &'static str,
    ) -> ServiceResult<()> {
        let Some(file_id) = file_id else {
            return Ok(());
        };

        let count = file::Entity::find()
            .filter(file::Column::Id.eq(file_id))
            .count(db)
            .await?;
        if count == 0 {
            return Err(ServiceError::not_found(part, file_id));
        }
        Ok(())
    }

    async fn ensure_files(db: &DatabaseConnection, input: &SubmissionInput) -> ServiceResult<()> {
        try_join!(
            Self::ensure_file(db, input.administrative_file_id, "administrative file"),
            Self::ensure_file(db, input.technical_file_id, "technical file"),
            Self::ensure_file(db, input.financial_file_id, "financial file"),
        )?;
        Ok(())
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: SubmissionInput,
    ) -> ServiceResult<submission::Model> {
        let consultation_id = require_id(input.consultation_id, "consultationId")?;
        let tender_id = require_id(input.tender_id, "tenderId")?;
        check_non_negative(input.financial_offer, "financialOffer")?;
        Self::ensure_open_consultation(db, consultation_id).await?;
        Self::ensure_provider(db, tender_id).await?;
        Self::ensure_pair_free(db, consultation_id, tender_id, None).await?;
        Self::ensure_files(db, &input).await?;

        let now = now();
        let model = submission::ActiveModel {
            id: Set(Uuid::new_v4()),
            consultation_id: Set(consultation_id),
            tender_id: Set(tender_id),
            submission_date: Set(input.submission_date.unwrap_or(now)),
            financial_offer: Set(input.financial_offer),
            administrative_file_id: Set(input.administrative_file_id),
            technical_file_id: Set(input.technical_file_id),
            financial_file_id: Set(input.financial_file_id),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|err| ServiceError::from_write(err, Self::duplicate))?;

        info!(
            "submission {} by provider {tender_id} on consultation {consultation_id} created by {actor}",
            model.id
        );
        Ok(model)
    }

    /// The pair is checked again only when it changes. File references left
    /// unset are cleared.
    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: SubmissionInput,
    ) -> ServiceResult<submission::Model> {
        let existing = Self::find_model(db, id).await?;
        let consultation_id = require_id(input.consultation_id, "consultationId")?;
        let tender_id = require_id(input.tender_id, "tenderId")?;
        check_non_negative(input.financial_offer, "financialOffer")?;
        Self::ensure_open_consultation(db, consultation_id).await?;

        if tender_id != existing.tender_id {
            Self::ensure_provider(db, tender_id).await?;
        }
        if consultation_id != existing.consultation_id || tender_id != existing.tender_id {
            Self::ensure_pair_free(db, consultation_id, tender_id, Some(id)).await?;
        }
        Self::ensure_files(db, &input).await?;

        let submission_date = input.submission_date.unwrap_or(existing.submission_date);
        let mut active: submission::ActiveModel = existing.into();
        active.consultation_id = Set(consultation_id);
        active.tender_id = Set(tender_id);
        active.submission_date = Set(submission_date);
        active.financial_offer = Set(input.financial_offer);
        active.administrative_file_id = Set(input.administrative_file_id);
        active.technical_file_id = Set(input.technical_file_id);
        active.financial_file_id = Set(input.financial_file_id);
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now());

        let model = active
            .update(db)
            .await
            .map_err(|err| ServiceError::from_write(err, Self::duplicate))?;

        info!("submission {id} updated by {actor}");
        Ok(model)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<submission::Model> {
        Self::find_model(db, id).await
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = submission::Entity::find()
            .filter(submission::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn list(
        db: &DatabaseConnection,
        request: &PageRequest,
    ) -> ServiceResult<Page<submission::Model>> {
        let column = match request.sort_by.as_deref() {
            Some("financialOffer") => submission::Column::FinancialOffer,
            Some("createdAt") => submission::Column::CreatedAt,
            _ => submission::Column::SubmissionDate,
        };
        let query = submission::Entity::find().order_by(column, request.direction.into());

        Ok(fetch_page(db, query, request).await?)
    }

    /// Matches the bidder's company name or the consultation reference
    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<submission::Model>> {
        let pattern = search_pattern(text);
        let query = submission::Entity::find()
            .inner_join(provider::Entity)
            .inner_join(consultation::Entity)
            .filter(
                Condition::any()
                    .add(lower_like(
                        (provider::Entity, provider::Column::CompanyName),
                        &pattern,
                    ))
                    .add(lower_like(
                        (consultation::Entity, consultation::Column::Reference),
                        &pattern,
                    )),
            )
            .order_by_desc(submission::Column::SubmissionDate);

        Ok(fetch_page(db, query, request).await?)
    }

    pub async fn list_by_consultation(
        db: &DatabaseConnection,
        consultation_id: Uuid,
    ) -> ServiceResult<Vec<submission::Model>> {
        Ok(submission::Entity::find()
            .filter(submission::Column::ConsultationId.eq(consultation_id))
            .order_by_asc(submission::Column::SubmissionDate)
            .all(db)
            .await?)
    }

    pub async fn list_by_provider(
        db: &DatabaseConnection,
        tender_id: Uuid,
    ) -> ServiceResult<Vec<submission::Model>> {
        Ok(submission::Entity::find()
            .filter(submission::Column::TenderId.eq(tender_id))
            .order_by_desc(submission::Column::SubmissionDate)
            .all(db)
            .await?)
    }

    /// Count and min/max/average of the offers received by a consultation
    pub async fn offer_summary(
        db: &DatabaseConnection,
        consultation_id: Uuid,
    ) -> ServiceResult<OfferSummary> {
        let exists = consultation::Entity::find()
            .filter(consultation::Column::Id.eq(consultation_id))
            .count(db)
            .await?;
        if exists == 0 {
            return Err(ServiceError::not_found("consultation", consultation_id));
        }

        let offers = submission::Entity::find()
            .select_only()
            .column(submission::Column::FinancialOffer)
            .filter(submission::Column::ConsultationId.eq(consultation_id))
            .into_tuple::<Option<f64>>()
            .all(db)
            .await?;

        Ok(OfferSummary::from_offers(offers))
    }

    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        submission::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("submission {id} deleted by {actor}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{
            consultation::ConsultationService,
            file::{FileInput, FileService},
        },
        testing::{actor, consultation_input, seed, seed_provider, setup},
    };
    use chrono::Duration;

    fn bid(consultation_id: Uuid, tender_id: Uuid, offer: f64) -> SubmissionInput {
        SubmissionInput {
            consultation_id: Some(consultation_id),
            tender_id: Some(tender_id),
            financial_offer: Some(offer),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_defaults_submission_date() {
        let db = setup().await;
        let seed = seed(&db).await;
        let consultation = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(5)),
        )
        .await
        .unwrap();
        let provider = seed_provider(&db, "Alpha").await;

        let before = now();
        let created = SubmissionService::create(
            &db,
            &actor(),
            bid(consultation.consultation.id, provider.id, 1200.0),
        )
        .await
        .unwrap();

        assert!(created.submission_date >= before);
        assert_eq!(created.financial_offer, Some(1200.0));
        assert_eq!(
            SubmissionService::list_by_provider(&db, provider.id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let db = setup().await;

        let err = SubmissionService::create(&db, &actor(), SubmissionInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("consultationId")));
    }

    #[tokio::test]
    async fn test_negative_offer() {
        let db = setup().await;

        let err = SubmissionService::create(&db, &actor(), bid(Uuid::new_v4(), Uuid::new_v4(), -1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_past_deadline_is_rejected() {
        let db = setup().await;
        let seed = seed(&db).await;
        let closed = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(-1)),
        )
        .await
        .unwrap();
        let provider = seed_provider(&db, "Alpha").await;

        let err = SubmissionService::create(&db, &actor(), bid(closed.consultation.id, provider.id, 10.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(submission::Entity::find().count(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_after_deadline_is_rejected() {
        let db = setup().await;
        let seed = seed(&db).await;
        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(2)),
        )
        .await
        .unwrap();
        let provider = seed_provider(&db, "Alpha").await;
        let created = SubmissionService::create(&db, &actor(), bid(view.consultation.id, provider.id, 10.0))
            .await
            .unwrap();

        let closed = consultation_input(&seed, "1", "2025", Duration::days(-2));
        ConsultationService::update(&db, &actor(), view.consultation.id, closed)
            .await
            .unwrap();

        let err = SubmissionService::update(
            &db,
            &actor(),
            created.id,
            bid(view.consultation.id, provider.id, 20.0),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[tokio::test]
    async fn test_one_bid_per_provider() {
        let db = setup().await;
        let seed = seed(&db).await;
        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(2)),
        )
        .await
        .unwrap();
        let alpha = seed_provider(&db, "Alpha").await;
        let beta = seed_provider(&db, "Beta").await;
        let id = view.consultation.id;

        SubmissionService::create(&db, &actor(), bid(id, alpha.id, 10.0))
            .await
            .unwrap();
        let err = SubmissionService::create(&db, &actor(), bid(id, alpha.id, 11.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Moving beta's bid onto alpha's pair conflicts; keeping its own pair does not
        let second = SubmissionService::create(&db, &actor(), bid(id, beta.id, 12.0))
            .await
            .unwrap();
        SubmissionService::update(&db, &actor(), second.id, bid(id, beta.id, 13.0))
            .await
            .unwrap();
        let err = SubmissionService::update(&db, &actor(), second.id, bid(id, alpha.id, 13.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_unknown_provider_and_file() {
        let db = setup().await;
        let seed = seed(&db).await;
        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(2)),
        )
        .await
        .unwrap();
        let id = view.consultation.id;

        let err = SubmissionService::create(&db, &actor(), bid(id, Uuid::new_v4(), 1.0))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "provider", .. }));

        let provider = seed_provider(&db, "Alpha").await;
        let mut input = bid(id, provider.id, 1.0);
        input.technical_file_id = Some(Uuid::new_v4());
        let err = SubmissionService::create(&db, &actor(), input).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::NotFound {
                entity: "technical file",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_files_are_cleared_on_update_and_delete() {
        let db = setup().await;
        let seed = seed(&db).await;
        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(2)),
        )
        .await
        .unwrap();
        let provider = seed_provider(&db, "Alpha").await;
        let file = FileService::create(
            &db,
            &actor(),
            FileInput {
                name: Some("offre.pdf".into()),
                storage_path: Some("/srv/files/offre.pdf".into()),
                size: Some(2048),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let mut input = bid(view.consultation.id, provider.id, 5.0);
        input.financial_file_id = Some(file.id);
        input.technical_file_id = Some(file.id);
        let created = SubmissionService::create(&db, &actor(), input).await.unwrap();
        assert_eq!(created.financial_file_id, Some(file.id));

        // Omitted file references are cleared
        let mut input = bid(view.consultation.id, provider.id, 5.0);
        input.financial_file_id = Some(file.id);
        let updated = SubmissionService::update(&db, &actor(), created.id, input)
            .await
            .unwrap();
        assert_eq!(updated.technical_file_id, None);

        // Removing the file unlinks it
        FileService::delete(&db, &actor(), file.id).await.unwrap();
        let reloaded = SubmissionService::get(&db, created.id).await.unwrap();
        assert_eq!(reloaded.financial_file_id, None);
    }

    #[tokio::test]
    async fn test_offer_summary_and_search() {
        let db = setup().await;
        let seed = seed(&db).await;
        let view = ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "8", "2025", Duration::days(2)),
        )
        .await
        .unwrap();
        let id = view.consultation.id;

        for (name, offer) in [("Alpha", Some(90.0)), ("Beta", Some(110.0)), ("Gamma", None)] {
            let provider = seed_provider(&db, name).await;
            let mut input = bid(id, provider.id, 0.0);
            input.financial_offer = offer;
            SubmissionService::create(&db, &actor(), input).await.unwrap();
        }

        let summary = SubmissionService::offer_summary(&db, id).await.unwrap();
        assert_eq!(summary.submission_count, 3);
        assert_eq!(summary.min_offer, Some(90.0));
        assert_eq!(summary.max_offer, Some(110.0));
        assert_eq!(summary.average_offer, Some(100.0));

        let err = SubmissionService::offer_summary(&db, Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));

        let hits = SubmissionService::search(&db, "beta", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total_items, 1);
        let hits = SubmissionService::search(&db, "cons-8", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total_items, 3);
    }
}
