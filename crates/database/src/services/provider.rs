use crate::{
    entities::{provider, submission},
    error::{ServiceError, ServiceResult},
    services::common::{Page, PageRequest, fetch_page, lower_like, now, require_text, search_pattern},
};
use log::{debug, info};
use models::{actor::Actor, text::non_blank};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct ProviderInput {
    pub company_name: Option<String>,
    pub tax_id: Option<String>,
    pub trade_register: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

pub struct ProviderService;

impl ProviderService {
    pub const ENTITY: &'static str = "provider";

    async fn find_model(db: &DatabaseConnection, id: Uuid) -> ServiceResult<provider::Model> {
        provider::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    /// Company name and tax id are each unique among providers
    async fn ensure_unique(
        db: &DatabaseConnection,
        company_name: &str,
        tax_id: Option<&str>,
        exclude: Option<Uuid>,
    ) -> ServiceResult<()> {
        let mut query =
            provider::Entity::find().filter(provider::Column::CompanyName.eq(company_name));
        if let Some(id) = exclude {
            query = query.filter(provider::Column::Id.ne(id));
        }
        if query.count(db).await? > 0 {
            debug!("rejected duplicate provider '{company_name}'");
            return Err(ServiceError::Conflict(format!(
                "provider '{company_name}' already exists"
            )));
        }

        if let Some(tax_id) = tax_id {
            let mut query = provider::Entity::find().filter(provider::Column::TaxId.eq(tax_id));
            if let Some(id) = exclude {
                query = query.filter(provider::Column::Id.ne(id));
            }
            if query.count(db).await? > 0 {
                debug!("rejected duplicate tax id {tax_id}");
                return Err(ServiceError::Conflict(format!(
                    "a provider with tax id {tax_id} already exists"
                )));
            }
        }

        Ok(())
    }

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: ProviderInput,
    ) -> ServiceResult<provider::Model> {
        let company_name = require_text(input.company_name, "companyName")?;
        let tax_id = non_blank(input.tax_id);
        Self::ensure_unique(db, &company_name, tax_id.as_deref(), None).await?;

        let now = now();
        let model = provider::ActiveModel {
            id: Set(Uuid::new_v4()),
            company_name: Set(company_name.clone()),
            tax_id: Set(tax_id),
            trade_register: Set(non_blank(input.trade_register)),
            address: Set(non_blank(input.address)),
            phone: Set(non_blank(input.phone)),
            email: Set(non_blank(input.email)),
            created_by: Set(actor.to_string()),
            created_at: Set(now),
            updated_by: Set(actor.to_string()),
            updated_at: Set(now),
        }
        .insert(db)
        .await
        .map_err(|err| {
            ServiceError::from_write(err, || format!("provider '{company_name}' already exists"))
        })?;

        info!("provider {} created by {actor}", model.id);
        Ok(model)
    }

    pub async fn update(
        db: &DatabaseConnection,
        actor: &Actor,
        id: Uuid,
        input: ProviderInput,
    ) -> ServiceResult<provider::Model> {
        let existing = Self::find_model(db, id).await?;
        let company_name = require_text(input.company_name, "companyName")?;
        let tax_id = non_blank(input.tax_id);
        Self::ensure_unique(db, &company_name, tax_id.as_deref(), Some(id)).await?;

        let mut active: provider::ActiveModel = existing.into();
        active.company_name = Set(company_name.clone());
        active.tax_id = Set(tax_id);
        active.trade_register = Set(non_blank(input.trade_register));
        active.address = Set(non_blank(input.address));
        active.phone = Set(non_blank(input.phone));
        active.email = Set(non_blank(input.email));
        active.updated_by = Set(actor.to_string());
        active.updated_at = Set(now());

        let model = active.update(db).await.map_err(|err| {
            ServiceError::from_write(err, || format!("provider '{company_name}' already exists"))
        })?;

        info!("provider {id} updated by {actor}");
        Ok(model)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<provider::Model> {
        Self::find_model(db, id).await
    }

    pub async fn exists(db: &DatabaseConnection, id: Uuid) -> ServiceResult<bool> {
        let count = provider::Entity::find()
            .filter(provider::Column::Id.eq(id))
            .count(db)
            .await?;
        Ok(count > 0)
    }

    pub async fn find_by_tax_id(
        db: &DatabaseConnection,
        tax_id: &str,
    ) -> ServiceResult<Option<provider::Model>> {
        Ok(provider::Entity::find()
            .filter(provider::Column::TaxId.eq(tax_id.trim()))
            .one(db)
            .await?)
    }

    pub async fn list(
        db: &DatabaseConnection,
        request: &PageRequest,
    ) -> ServiceResult<Page<provider::Model>> {
        let column = match request.sort_by.as_deref() {
            Some("taxId") => provider::Column::TaxId,
            Some("createdAt") => provider::Column::CreatedAt,
            Some("updatedAt") => provider::Column::UpdatedAt,
            _ => provider::Column::CompanyName,
        };
        let query = provider::Entity::find().order_by(column, request.direction.into());

        Ok(fetch_page(db, query, request).await?)
    }

    pub async fn search(
        db: &DatabaseConnection,
        text: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<provider::Model>> {
        let pattern = search_pattern(text);
        let query = provider::Entity::find()
            .filter(
                Condition::any()
                    .add(lower_like(provider::Column::CompanyName, &pattern))
                    .add(lower_like(provider::Column::TaxId, &pattern))
                    .add(lower_like(provider::Column::TradeRegister, &pattern)),
            )
            .order_by_asc(provider::Column::CompanyName);

        Ok(fetch_page(db, query, request).await?)
    }

    /// Refused while the provider has submissions; representators and
    /// clearances go with it.
    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        Self::find_model(db, id).await?;

        let submissions = submission::Entity::find()
            .filter(submission::Column::TenderId.eq(id))
            .count(db)
            .await?;
        if submissions > 0 {
            debug!("provider {id} still has {submissions} submissions");
            return Err(ServiceError::Dependency(format!(
                "provider has {submissions} submissions and cannot be deleted"
            )));
        }

        provider::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;

        info!("provider {id} deleted by {actor}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        services::{
            consultation::ConsultationService,
            provider_representator::{ProviderRepresentatorService, RepresentatorInput},
            submission::{SubmissionInput, SubmissionService},
        },
        testing::{actor, consultation_input, seed, seed_provider, setup},
    };
    use chrono::Duration;

    #[tokio::test]
    async fn test_company_name_and_tax_id_are_unique() {
        let db = setup().await;
        ProviderService::create(
            &db,
            &actor(),
            ProviderInput {
                company_name: Some("Sonatrach Services".into()),
                tax_id: Some("000216001808337".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = ProviderService::create(
            &db,
            &actor(),
            ProviderInput {
                company_name: Some("Other".into()),
                tax_id: Some("000216001808337".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));

        // Providers without a tax id never collide on it
        seed_provider(&db, "First").await;
        seed_provider(&db, "Second").await;

        let found = ProviderService::find_by_tax_id(&db, "000216001808337")
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.company_name), Some("Sonatrach Services".into()));
    }

    #[tokio::test]
    async fn test_delete_refused_with_submissions() {
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
        SubmissionService::create(
            &db,
            &actor(),
            SubmissionInput {
                consultation_id: Some(view.consultation.id),
                tender_id: Some(provider.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = ProviderService::delete(&db, &actor(), provider.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Dependency(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_representators() {
        let db = setup().await;
        let provider = seed_provider(&db, "Alpha").await;
        let representator = ProviderRepresentatorService::create(
            &db,
            &actor(),
            RepresentatorInput {
                provider_id: Some(provider.id),
                last_name: Some("Benali".into()),
                first_name: Some("Amine".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        ProviderService::delete(&db, &actor(), provider.id).await.unwrap();
        assert!(
            !ProviderRepresentatorService::exists(&db, representator.id)
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_search() {
        let db = setup().await;
        seed_provider(&db, "Cosider Travaux").await;
        seed_provider(&db, "ENGOA").await;

        let hits = ProviderService::search(&db, "travaux", &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(hits.total_items, 1);
        assert_eq!(hits.items[0].company_name, "Cosider Travaux");
    }
}
