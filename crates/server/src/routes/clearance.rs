use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::clearance::ClearanceService;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
        provider::{ClearanceRequest, ClearanceResponse},
    },
    error::{ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

/// Register a clearance; its start date may not be after its end date
#[utoipa::path(
    post,
    path = "/clearances",
    request_body = ClearanceRequest,
    responses(
        (status = 201, body = ClearanceResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, description = "Provider not found", body = ErrorResponse)
    ),
    tag = "Clearances"
)]
pub async fn create_clearance(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<ClearanceRequest>,
) -> ApiResult<(StatusCode, Json<ClearanceResponse>)> {
    let created = ClearanceService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

#[utoipa::path(
    get,
    path = "/clearances/{id}",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ClearanceResponse), (status = 404, body = ErrorResponse)),
    tag = "Clearances"
)]
pub async fn get_clearance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ClearanceResponse>> {
    let found = ClearanceService::get(&state.db, id).await?;
    Ok(Json(found.into()))
}

#[utoipa::path(
    get,
    path = "/clearances/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Clearances"
)]
pub async fn clearance_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = ClearanceService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[utoipa::path(
    get,
    path = "/clearances",
    params(ListParams),
    responses((status = 200, body = PageResponse<ClearanceResponse>)),
    tag = "Clearances"
)]
pub async fn list_clearances(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<ClearanceResponse>>> {
    let page = ClearanceService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/clearances/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<ClearanceResponse>)),
    tag = "Clearances"
)]
pub async fn search_clearances(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<ClearanceResponse>>> {
    let page = ClearanceService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    put,
    path = "/clearances/{id}",
    params(("id" = Uuid, Path)),
    request_body = ClearanceRequest,
    responses(
        (status = 200, body = ClearanceResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Clearances"
)]
pub async fn update_clearance(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<ClearanceRequest>,
) -> ApiResult<Json<ClearanceResponse>> {
    let updated = ClearanceService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(updated.into()))
}

#[utoipa::path(
    delete,
    path = "/clearances/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Clearances"
)]
pub async fn delete_clearance(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ClearanceService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_clearance, list_clearances))
        .routes(routes!(get_clearance, update_clearance, delete_clearance))
        .routes(routes!(clearance_exists))
        .routes(routes!(search_clearances))
}
