use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::provider_representator::ProviderRepresentatorService;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
        provider::{RepresentatorRequest, RepresentatorResponse},
    },
    error::{ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/provider-representators",
    request_body = RepresentatorRequest,
    responses(
        (status = 201, body = RepresentatorResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, description = "Provider not found", body = ErrorResponse)
    ),
    tag = "Provider representators"
)]
pub async fn create_representator(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<RepresentatorRequest>,
) -> ApiResult<(StatusCode, Json<RepresentatorResponse>)> {
    let created = ProviderRepresentatorService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/provider-representators/{id}",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = RepresentatorResponse), (status = 404, body = ErrorResponse)),
    tag = "Provider representators"
)]
pub async fn get_representator(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RepresentatorResponse>> {
    let found = ProviderRepresentatorService::get(&state.db, id).await?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    get,
    path = "/provider-representators/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Provider representators"
)]
pub async fn representator_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = ProviderRepresentatorService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[utoipa::path(
    get,
    path = "/provider-representators",
    params(ListParams),
    responses((status = 200, body = PageResponse<RepresentatorResponse>)),
    tag = "Provider representators"
)]
pub async fn list_representators(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<RepresentatorResponse>>> {
    let page = ProviderRepresentatorService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/provider-representators/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<RepresentatorResponse>)),
    tag = "Provider representators"
)]
pub async fn search_representators(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<RepresentatorResponse>>> {
    let page = ProviderRepresentatorService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    put,
    path = "/provider-representators/{id}",
    params(("id" = Uuid, Path)),
    request_body = RepresentatorRequest,
    responses(
        (status = 200, body = RepresentatorResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Provider representators"
)]
pub async fn update_representator(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<RepresentatorRequest>,
) -> ApiResult<Json<RepresentatorResponse>> {
    let updated = ProviderRepresentatorService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/provider-representators/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Provider representators"
)]
pub async fn delete_representator(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ProviderRepresentatorService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_representator, list_representators))
        .routes(routes!(get_representator, update_representator, delete_representator))
        .routes(routes!(representator_exists))
        .routes(routes!(search_representators))
}
