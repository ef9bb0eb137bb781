use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::award_method::AwardMethodService;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        award_method::{AwardMethodRequest, AwardMethodResponse},
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
    },
    error::{ApiError, ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

/// Register an award method; the French designation and acronym must be unique
#[utoipa::path(
    post,
    path = "/award-methods",
    request_body = AwardMethodRequest,
    responses(
        (status = 201, description = "Award method created", body = AwardMethodResponse),
        (status = 400, description = "Missing designation or acronym", body = ErrorResponse),
        (status = 409, description = "Designation or acronym already used", body = ErrorResponse)
    ),
    tag = "Award methods"
)]
pub async fn create_award_method(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<AwardMethodRequest>,
) -> ApiResult<(StatusCode, Json<AwardMethodResponse>)> {
    let model = AwardMethodService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    get,
    path = "/award-methods/{id}",
    params(("id" = Uuid, Path, description = "Award method id")),
    responses(
        (status = 200, body = AwardMethodResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Award methods"
)]
pub async fn get_award_method(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<AwardMethodResponse>> {
    let model = AwardMethodService::get(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/award-methods/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Award methods"
)]
pub async fn award_method_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = AwardMethodService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

/// Paginated award methods, ordered by French acronym by default
#[utoipa::path(
    get,
    path = "/award-methods",
    params(ListParams),
    responses((status = 200, body = PageResponse<AwardMethodResponse>)),
    tag = "Award methods"
)]
pub async fn list_award_methods(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<AwardMethodResponse>>> {
    let page = AwardMethodService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/award-methods/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<AwardMethodResponse>)),
    tag = "Award methods"
)]
pub async fn search_award_methods(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<AwardMethodResponse>>> {
    let page = AwardMethodService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/award-methods/acronym/{acronym}",
    params(("acronym" = String, Path, description = "French acronym, e.g. AOO")),
    responses(
        (status = 200, body = AwardMethodResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Award methods"
)]
pub async fn get_award_method_by_acronym(
    State(state): State<AppState>,
    Path(acronym): Path<String>,
) -> ApiResult<Json<AwardMethodResponse>> {
    let model = AwardMethodService::find_by_acronym(&state.db, &acronym)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("award method with acronym '{acronym}'")))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/award-methods/designation/{designation}",
    params(("designation" = String, Path)),
    responses(
        (status = 200, body = AwardMethodResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Award methods"
)]
pub async fn get_award_method_by_designation(
    State(state): State<AppState>,
    Path(designation): Path<String>,
) -> ApiResult<Json<AwardMethodResponse>> {
    let model = AwardMethodService::find_by_designation(&state.db, &designation)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("award method '{designation}'")))?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/award-methods/{id}",
    params(("id" = Uuid, Path)),
    request_body = AwardMethodRequest,
    responses(
        (status = 200, body = AwardMethodResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Award methods"
)]
pub async fn update_award_method(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<AwardMethodRequest>,
) -> ApiResult<Json<AwardMethodResponse>> {
    let model = AwardMethodService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(model.into()))
}

/// Refused with 409 while consultations use the award method
#[utoipa::path(
    delete,
    path = "/award-methods/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Award method deleted"),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Award methods"
)]
pub async fn delete_award_method(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    AwardMethodService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_award_method, list_award_methods))
        .routes(routes!(get_award_method, update_award_method, delete_award_method))
        .routes(routes!(award_method_exists))
        .routes(routes!(search_award_methods))
        .routes(routes!(get_award_method_by_acronym))
        .routes(routes!(get_award_method_by_designation))
}
