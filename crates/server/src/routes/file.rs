use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::file::FileService;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::provider::{FileRequest, FileResponse},
    error::{ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

/// Register the metadata of a stored attachment
#[utoipa::path(
    post,
    path = "/files",
    request_body = FileRequest,
    responses(
        (status = 201, body = FileResponse),
        (status = 400, body = ErrorResponse)
    ),
    tag = "Files"
)]
pub async fn create_file(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<FileRequest>,
) -> ApiResult<(StatusCode, Json<FileResponse>)> {
    let model = FileService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    get,
    path = "/files/{id}",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = FileResponse), (status = 404, body = ErrorResponse)),
    tag = "Files"
)]
pub async fn get_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FileResponse>> {
    let model = FileService::get(&state.db, id).await?;
    Ok(Json(model.into()))
}

/// Submissions that attached the file keep no reference to it
#[utoipa::path(
    delete,
    path = "/files/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Files"
)]
pub async fn delete_file(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    FileService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_file))
        .routes(routes!(get_file, delete_file))
}
