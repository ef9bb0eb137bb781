use crate::{
    entities::file,
    error::{ServiceError, ServiceResult},
    services::common::{now, require_text},
};
use log::info;
use models::{actor::Actor, text::non_blank};
use sea_orm::{ActiveModelTrait, ActiveValue::Set, DatabaseConnection, EntityTrait};
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct FileInput {
    pub name: Option<String>,
    pub extension: Option<String>,
    pub size: Option<i64>,
    pub storage_path: Option<String>,
}

/// Attachment metadata. Submissions pointing at a deleted file lose the link.
pub struct FileService;

impl FileService {
    pub const ENTITY: &'static str = "file";

    pub async fn create(
        db: &DatabaseConnection,
        actor: &Actor,
        input: FileInput,
    ) -> ServiceResult<file::Model> {
        let name = require_text(input.name, "name")?;
        let storage_path = require_text(input.storage_path, "storagePath")?;
        let size = input.size.unwrap_or(0);
        if size < 0 {
            return Err(ServiceError::Validation(
                "size must be greater than or equal to 0".to_owned(),
            ));
        }
        let extension = non_blank(input.extension)
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .or_else(|| {
                name.rsplit_once('.')
                    .map(|(_, ext)| ext.to_lowercase())
                    .filter(|ext| !ext.is_empty())
            });

        let model = file::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            extension: Set(extension),
            size: Set(size),
            storage_path: Set(storage_path),
            created_by: Set(actor.to_string()),
            created_at: Set(now()),
        }
        .insert(db)
        .await?;

        info!("file {} ({}) stored by {actor}", model.id, model.name);
        Ok(model)
    }

    pub async fn get(db: &DatabaseConnection, id: Uuid) -> ServiceResult<file::Model> {
        file::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found(Self::ENTITY, id))
    }

    pub async fn delete(db: &DatabaseConnection, actor: &Actor, id: Uuid) -> ServiceResult<()> {
        let result = file::Entity::delete_by_id(id)
            .exec(db)
            .await
            .map_err(|err| ServiceError::from_delete(err, Self::ENTITY))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::not_found(Self::ENTITY, id));
        }

        info!("file {id} deleted by {actor}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{actor, setup};

    #[tokio::test]
    async fn test_extension_from_name() {
        let db = setup().await;

        let file = FileService::create(
            &db,
            &actor(),
            FileInput {
                name: Some("Offre_Technique.PDF".into()),
                storage_path: Some("2025/offre_technique.pdf".into()),
                size: Some(1024),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(file.extension.as_deref(), Some("pdf"));
        assert_eq!(FileService::get(&db, file.id).await.unwrap().size, 1024);
    }

    #[tokio::test]
    async fn test_delete_missing_file() {
        let db = setup().await;

        let err = FileService::delete(&db, &actor(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { entity: "file", .. }));
    }
}
