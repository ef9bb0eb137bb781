use crate::{
    entities::{award_method, consultation},
    error::{ServiceError, ServiceResult},
    services::common::{
        Page, PageRequest, fetch_page, lower_like, now, require_text, search_pattern,
    },
};
use log::{debug, info};
use models::{actor::Actor, award_method::AwardMethodCategory, text::non_blank};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

/// Incoming award method fields
#[derive(Debug, Clone, Default)]
pub struct AwardMethodInput {
    pub designation_ar: Option<String>,
    pub designation_en: Option<String>,
    pub designation_fr: Option<String>,
    pub acronym_ar: Option<String>,
    pub acronym_en: Option<String>,
    pub acronym_fr: Option<String>,
}

pub struct AwardMethodService;

impl AwardMethodService {
    pub const ENTITY: &'static str = "award method";

    /// Category of a stored award method
    pub fn category(model: &award_method::Model) -> AwardMethodCategory {
        AwardMethodCategory::classify(Some(&model.acronym_fr), Some(&model.designation_fr))
    }

    async fn find_model(db: &DatabaseConnection, id: Uuid) -> ServiceResult<award_method::Model> {
        award_method::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    /// Both the French designation and the French acronym must be free
    async fn ensure_unique(
        db: &DatabaseConnection,
        designation_fr: &str,
        acronym_fr: &str,
        exclude: Option<Uuid>,
    ) -> ServiceResult<()> {
        let scope = |mut condition: Condition| {
            if let Some(id) = exclude {
                condition = condition.add(award_method::Column::Id.ne(id));
            }
            condition
        };

        let designation_taken = award_method::Entity::find()
            .filter(scope(
                Condition::all().add(award_method::Column::DesignationFr.eq(designation_fr)),
            ))
            .count(db)
            .await?
            > 0;
        if designation_taken {
            debug!("rejected duplicate award method designation '{designation_fr}'");
            return Err(ServiceError::Conflict(format!(
                "award method with designation '{designation_fr}' already exists"
            )));
        }

        let acronym_taken = award_method::Entity::find()
            .filter(scope(
                Condition::all().add(award_method::Column::AcronymFr.eq(acronym_fr)),
            ))
            .count(db)
            .await?
            > 0;
        if acronym_taken {
            debug!("rejected duplicate award method acronym '{acronym_fr}'");
            return Err(ServiceError::Conflict(format!(
                "award method with acronym '{acronym_fr}' already exists"
            )));
        }

        Ok(())
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: AwardMethodInput,
    ) -> ServiceResult<award_method::Model> {
        let designation_fr = require_text(input.designation_fr, "designationFr")?;
        let acronym_fr = require_text(input.acronym_fr, "acronymFr")?;
        Self::ensure_unique(db, &designation_fr, &acronym_fr, None).await?;

        let now = now();
        let model = award_method::ActiveModel {
            id: Set(Uuid::new_v4()),
            designation_ar: Set(non_blank(input.designation_ar)),
            designation_en: Set(non_blank(input.designation_en)),
            designation_fr: Set(designation_fr),
            acronym_ar: Set(non_blank(input.acronym_ar)),
            acronym_en: Set(non_blank(input.acronym_en)),
            acronym_fr: Set(acronym_fr),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|err| ServiceError::from_write(err, || "award method already exists".into()))?;

        info!("award method {} created by {actor}", model.id);
        Ok(model)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<award_method::Model> {
        Self::find_model(db, id).await
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = award_method::Entity::find()
            .filter(award_method::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_by_designation(
        db: &DatabaseConnection,
        designation_fr: &str,
    ) -> ServiceResult<Option<award_method::Model>> {
        Ok(award_method::Entity::find()
            .filter(award_method::Column::DesignationFr.eq(designation_fr.trim()))
            .one(db)
            .await?)
    }

    pub async fn find_by_acronym(
        db: &DatabaseConnection,
        acronym_fr: &str,
    ) -> ServiceResult<Option<award_method::Model>> {
        Ok(award_method::Entity::find()
            .filter(award_method::Column::AcronymFr.eq(acronym_fr.trim()))
            .one(db)
            .await?)
    }

    /// Ordered by French acronym unless asked otherwise
    pub async fn list(
        db: &DatabaseConnection,
        request: &PageRequest,
    ) -> ServiceResult<Page<award_method::Model>> {
        let column = match request.sort_by.as_deref() {
            Some("designationFr") => award_method::Column::DesignationFr,
            Some("designationAr") => award_method::Column::DesignationAr,
            Some("designationEn") => award_method::Column::DesignationEn,
            Some("createdAt") => award_method::Column::CreatedAt,
            _ => award_method::Column::AcronymFr,
        };
        let query = award_method::Entity::find().order_by(column, request.direction.into());

        Ok(fetch_page(db, query, request).await?)
    }

    /// Case-insensitive match on designations and acronyms
    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<award_method::Model>> {
        let pattern = search_pattern(text);
        let query = award_method::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(award_method::Column::DesignationAr, &pattern))
                    .add(lower_like(award_method::Column::DesignationEn, &pattern))
                    .add(lower_like(award_method::Column::DesignationFr, &pattern))
                    .add(lower_like(award_method::Column::AcronymFr, &pattern)),
            )
            .order_by_asc(award_method::Column::AcronymFr);

        Ok(fetch_page(db, query, request).await?)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: AwardMethodInput,
    ) -> ServiceResult<award_method::Model> {
        let existing = Self::find_model(db, id).await?;
        let designation_fr = require_text(input.designation_fr, "designationFr")?;
        let acronym_fr = require_text(input.acronym_fr, "acronymFr")?;
        Self::ensure_unique(db, &designation_fr, &acronym_fr, Some(id)).await?;

        let mut active: award_method::ActiveModel = existing.into();
        active.designation_ar = Set(non_blank(input.designation_ar));
        active.designation_en = Set(non_blank(input.designation_en));
        active.designation_fr = Set(designation_fr);
        active.acronym_ar = Set(non_blank(input.acronym_ar));
        active.acronym_en = Set(non_blank(input.acronym_en));
        active.acronym_fr = Set(acronym_fr);
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now());

        let model = active
            .update(db)
            .await
            .map_err(|err| ServiceError::from_write(err, || "award method already exists".into()))?;

        info!("award method {id} updated by {actor}");
        Ok(model)
    }

    /// Refused while any consultation still uses the award method
    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        let dependents = consultation::Entity::find()
            .filter(consultation::Column::AwardMethodId.eq(id))
            .count(db)
            .await?;
        if dependents > 0 {
            debug!("award method {id} still used by {dependents} consultation(s)");
            return Err(ServiceError::Dependency(format!(
                "award method is used by {dependents} consultation(s)"
            )));
        }

        award_method::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("award method {id} deleted by {actor}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::consultation::ConsultationService,
        testing::{actor, consultation_input, seed, setup},
    };
    use chrono::Duration;

    fn input(designation_fr: &str, acronym_fr: &str) -> AwardMethodInput {
        AwardMethodInput {
            designation_fr: Some(designation_fr.into()),
            acronym_fr: Some(acronym_fr.into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_classify() {
        let db = setup().await;

        let model = AwardMethodService::create(&db, &actor(), input("Appel d'offres ouvert", "AOO"))
            .await
            .unwrap();
        assert_eq!(AwardMethodService::category(&model), AwardMethodCategory::AppelOffres);

        let found = AwardMethodService::find_by_acronym(&db, " AOO ").await.unwrap();
        assert_eq!(found.map(|m| m.id), Some(model.id));
    }

    #[tokio::test]
    async fn test_acronym_is_required_and_unique() {
        let db = setup().await;

        let err = AwardMethodService::create(
            &db,
            &actor(),
            AwardMethodInput {
                designation_fr: Some("Gré à gré".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("acronymFr")));

        AwardMethodService::create(&db, &actor(), input("Gré à gré simple", "GGS"))
            .await
            .unwrap();
        let err = AwardMethodService::create(&db, &actor(), input("Gré à gré après consultation", "GGS"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_own_keys() {
        let db = setup().await;
        let model = AwardMethodService::create(&db, &actor(), input("Concours", "CONC"))
            .await
            .unwrap();

        let mut changed = input("Concours", "CONC");
        changed.designation_en = Some("Design contest".into());
        let updated = AwardMethodService::update(&db, &actor(), model.id, changed)
            .await
            .unwrap();
        assert_eq!(updated.designation_en.as_deref(), Some("Design contest"));
    }

    #[tokio::test]
    async fn test_delete_refused_while_in_use() {
        let db = setup().await;
        let seed = seed(&db).await;
        ConsultationService::create(
            &db,
            &actor(),
            consultation_input(&seed, "1", "2025", Duration::days(1)),
        )
        .await
        .unwrap();

        let err = AwardMethodService::delete(&db, &actor(), seed.award_method_id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Dependency(_)));
        assert!(AwardMethodService::exists(&db, seed.award_method_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_defaults_to_acronym_order() {
        let db = setup().await;
        for (designation, acronym) in [("Consultation restreinte", "CR"), ("Appel d'offres restreint", "AOR")] {
            AwardMethodService::create(&db, &actor(), input(designation, acronym))
                .await
                .unwrap();
        }

        let page = AwardMethodService::list(&db, &PageRequest::default()).await.unwrap();
        let acronyms: Vec<_> = page.items.iter().map(|m| m.acronym_fr.as_str()).collect();
        assert_eq!(acronyms, ["AOR", "CR"]);

        let hits = AwardMethodService::search(&db, "RESTREINT", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total_items, 2);
    }
}
