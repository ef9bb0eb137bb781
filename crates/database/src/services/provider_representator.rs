use crate::{
    entities::{provider, provider_representator},
    error::{ServiceError, ServiceResult},
    services::common::{
        Page, PageRequest, fetch_page, lower_like, now, require_id, require_text, search_pattern,
    },
};
use log::info;
use models::{actor::Actor, text::non_blank};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct RepresentatorInput {
    pub provider_id: Option<Uuid>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub function: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

/// Fields that passed the required checks
struct Validated {
    provider_id: Uuid,
    last_name: String,
    first_name: String,
    input: RepresentatorInput,
}

impl Validated {
    fn new(input: RepresentatorInput) -> ServiceResult<Self> {
        Ok(Self {
            provider_id: require_id(input.provider_id, "providerId")?,
            last_name: require_text(input.last_name.clone(), "lastName")?,
            first_name: require_text(input.first_name.clone(), "firstName")?,
            input,
        })
    }
}

pub struct ProviderRepresentatorService;

impl ProviderRepresentatorService {
    pub const ENTITY: &'static str = "provider representator";

    async fn find_model(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> ServiceResult<provider_representator::Model> {
        provider_representator::Entity::find_by_id(id)
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

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: RepresentatorInput,
    ) -> ServiceResult<provider_representator::Model> {
        let valid = Validated::new(input)?;
        Self::ensure_provider(db, valid.provider_id).await?;

        let now = now();
        let model = provider_representator::ActiveModel {
            id: Set(Uuid::new_v4()),
            provider_id: Set(valid.provider_id),
            last_name: Set(valid.last_name),
            first_name: Set(valid.first_name),
            function: Set(non_blank(valid.input.function)),
            phone: Set(non_blank(valid.input.phone)),
            email: Set(non_blank(valid.input.email)),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await?;

        info!(
            "{} {} for provider {} created by {actor}",
            Self::ENTITY,
            model.id,
            model.provider_id
        );
        Ok(model)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: RepresentatorInput,
    ) -> ServiceResult<provider_representator::Model> {
        let existing = Self::find_model(db, id).await?;
        let valid = Validated::new(input)?;
        if valid.provider_id != existing.provider_id {
            Self::ensure_provider(db, valid.provider_id).await?;
        }

        let mut active: provider_representator::ActiveModel = existing.into();
        active.provider_id = Set(valid.provider_id);
        active.last_name = Set(valid.last_name);
        active.first_name = Set(valid.first_name);
        active.function = Set(non_blank(valid.input.function));
        active.phone = Set(non_blank(valid.input.phone));
        active.email = Set(non_blank(valid.input.email));
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now());
        let model = active.update(db).await?;

        info!("{} {id} updated by {actor}", Self::ENTITY);
        Ok(model)
    }

    pub async fn get(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> ServiceResult<provider_representator::Model> {
        Self::find_model(db, id).await
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = provider_representator::Entity::find()
            .filter(provider_representator::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn list(
        db: &DatabaseConnection,
        request: &PageRequest,
    ) -> ServiceResult<Page<provider_representator::Model>> {
        let column = match request.sort_by.as_deref() {
            Some("firstName") => provider_representator::Column::FirstName,
            Some("function") => provider_representator::Column::Function,
            Some("createdAt") => provider_representator::Column::CreatedAt,
            _ => provider_representator::Column::LastName,
        };
        let query =
            provider_representator::Entity::find().order_by(column, request.direction.into());

        Ok(fetch_page(db, query, request).await?)
    }

    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<provider_representator::Model>> {
        let pattern = search_pattern(text);
        let query = provider_representator::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(provider_representator::Column::LastName, &pattern))
                    .add(lower_like(provider_representator::Column::FirstName, &pattern))
                    .add(lower_like(provider_representator::Column::Function, &pattern)),
            )
            .order_by_asc(provider_representator::Column::LastName)
            .order_by_asc(provider_representator::Column::FirstName);

        Ok(fetch_page(db, query, request).await?)
    }

    pub async fn list_by_provider(
        db: &DatabaseConnection,
        provider_id: Uuid,
    ) -> ServiceResult<Vec<provider_representator::Model>> {
        Ok(provider_representator::Entity::find()
            .filter(provider_representator::Column::ProviderId.eq(provider_id))
            .order_by_asc(provider_representator::Column::LastName)
            .all(db)
            .await?)
    }

    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        provider_representator::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("{} {id} deleted by {actor}", Self::ENTITY);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actor, seed_provider, setup};

    #[tokio::test]
    async fn test_names_required() {
        let db = setup().await;
        let provider = seed_provider(&db, "Alpha").await;

        let err = ProviderRepresentatorService::create(
            &db,
            &actor(),
            RepresentatorInput {
                provider_id: Some(provider.id),
                last_name: Some("Benali".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::MissingField("firstName")));
    }

    #[tokio::test]
    async fn test_list_by_provider() {
        let db = setup().await;
        let alpha = seed_provider(&db, "Alpha").await;
        let beta = seed_provider(&db, "Beta").await;

        for (provider_id, last_name) in [(alpha.id, "Zerrouki"), (alpha.id, "Amrani"), (beta.id, "Kaci")] {
            ProviderRepresentatorService::create(
                &db,
                &actor(),
                RepresentatorInput {
                    provider_id: Some(provider_id),
                    last_name: Some(last_name.into()),
                    first_name: Some("Sara".into()),
                    function: Some("Gérante".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        }

        let listed = ProviderRepresentatorService::list_by_provider(&db, alpha.id)
            .await
            .unwrap();
        let names: Vec<_> = listed.iter().map(|r| r.last_name.as_str()).collect();
        assert_eq!(names, ["Amrani", "Zerrouki"]);

        let err = ProviderRepresentatorService::create(
            &db,
            &actor(),
            RepresentatorInput {
                provider_id: Some(Uuid::new_v4()),
                last_name: Some("Kaci".into()),
                first_name: Some("Nadia".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "provider", .. }));
    }
}
