use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::{
    clearance::ClearanceService, common::now, provider::ProviderService,
    provider_representator::ProviderRepresentatorService, submission::SubmissionService,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
        provider::{ClearanceResponse, ProviderRequest, ProviderResponse, RepresentatorResponse},
        submission::SubmissionResponse,
    },
    error::{ApiError, ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/providers",
    request_body = ProviderRequest,
    responses(
        (status = 201, body = ProviderResponse),
        (status = 400, body = ErrorResponse),
        (status = 409, description = "Company name or tax id already used", body = ErrorResponse)
    ),
    tag = "Providers"
)]
pub async fn create_provider(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<ProviderRequest>,
) -> ApiResult<(StatusCode, Json<ProviderResponse>)> {
    let model = ProviderService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    get,
    path = "/providers/{id}",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ProviderResponse), (status = 404, body = ErrorResponse)),
    tag = "Providers"
)]
pub async fn get_provider(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ProviderResponse>> {
    let model = ProviderService::get(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/providers/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Providers"
)]
pub async fn provider_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = ProviderService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[utoipa::path(
    get,
    path = "/providers/tax-id/{tax_id}",
    params(("tax_id" = String, Path)),
    responses((status = 200, body = ProviderResponse), (status = 404, body = ErrorResponse)),
    tag = "Providers"
)]
pub async fn get_provider_by_tax_id(
    State(state): State<AppState>,
    Path(tax_id): Path<String>,
) -> ApiResult<Json<ProviderResponse>> {
    let model = ProviderService::find_by_tax_id(&state.db, &tax_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("provider with tax id {tax_id}")))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/providers",
    params(ListParams),
    responses((status = 200, body = PageResponse<ProviderResponse>)),
    tag = "Providers"
)]
pub async fn list_providers(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<ProviderResponse>>> {
    let page = ProviderService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/providers/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<ProviderResponse>)),
    tag = "Providers"
)]
pub async fn search_providers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<ProviderResponse>>> {
    let page = ProviderService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

/// Latest submissions first
#[utoipa::path(
    get,
    path = "/providers/{id}/submissions",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Vec<SubmissionResponse>)),
    tag = "Providers"
)]
pub async fn list_provider_submissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<SubmissionResponse>>> {
    let submissions = SubmissionService::list_by_provider(&state.db, id).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/providers/{id}/representators",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Vec<RepresentatorResponse>)),
    tag = "Providers"
)]
pub async fn list_provider_representators(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<RepresentatorResponse>>> {
    let representators = ProviderRepresentatorService::list_by_provider(&state.db, id).await?;
    Ok(Json(representators.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/providers/{id}/clearances",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Vec<ClearanceResponse>)),
    tag = "Providers"
)]
pub async fn list_provider_clearances(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<ClearanceResponse>>> {
    let clearances = ClearanceService::list_by_provider(&state.db, id).await?;
    Ok(Json(clearances.into_iter().map(Into::into).collect()))
}

/// Clearances covering today
#[utoipa::path(
    get,
    path = "/providers/{id}/clearances/active",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Vec<ClearanceResponse>)),
    tag = "Providers"
)]
pub async fn list_active_provider_clearances(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<ClearanceResponse>>> {
    let clearances = ClearanceService::active_for_provider(&state.db, id, now().date()).await?;
    Ok(Json(clearances.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/providers/{id}",
    params(("id" = Uuid, Path)),
    request_body = ProviderRequest,
    responses(
        (status = 200, body = ProviderResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Providers"
)]
pub async fn update_provider(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<ProviderRequest>,
) -> ApiResult<Json<ProviderResponse>> {
    let model = ProviderService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(model.into()))
}

/// Refused while the provider has submissions. Representators and clearances
/// are deleted with it.
#[utoipa::path(
    delete,
    path = "/providers/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Provider deleted"),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Providers"
)]
pub async fn delete_provider(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ProviderService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_provider, list_providers))
        .routes(routes!(get_provider, update_provider, delete_provider))
        .routes(routes!(provider_exists))
        .routes(routes!(get_provider_by_tax_id))
        .routes(routes!(search_providers))
        .routes(routes!(list_provider_submissions))
        .routes(routes!(list_provider_representators))
        .routes(routes!(list_provider_clearances))
        .routes(routes!(list_active_provider_clearances))
}
