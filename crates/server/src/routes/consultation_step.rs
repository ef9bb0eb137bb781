use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::consultation_step::ConsultationStepService;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
        reference::{StepRequest, StepResponse},
    },
    error::{ApiError, ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

/// Add a step to an existing phase
#[utoipa::path(
    post,
    path = "/consultation-steps",
    request_body = StepRequest,
    responses(
        (status = 201, body = StepResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, description = "Phase not found", body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Consultation steps"
)]
pub async fn create_step(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<StepRequest>,
) -> ApiResult<(StatusCode, Json<StepResponse>)> {
    let view = ConsultationStepService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(
    get,
    path = "/consultation-steps/{id}",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = StepResponse), (status = 404, body = ErrorResponse)),
    tag = "Consultation steps"
)]
pub async fn get_step(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<StepResponse>> {
    let view = ConsultationStepService::get(&state.db, id).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    get,
    path = "/consultation-steps/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Consultation steps"
)]
pub async fn step_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = ConsultationStepService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[utoipa::path(
    get,
    path = "/consultation-steps",
    params(ListParams),
    responses((status = 200, body = PageResponse<StepResponse>)),
    tag = "Consultation steps"
)]
pub async fn list_steps(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<StepResponse>>> {
    let page = ConsultationStepService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/consultation-steps/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<StepResponse>)),
    tag = "Consultation steps"
)]
pub async fn search_steps(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<StepResponse>>> {
    let page =
        ConsultationStepService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/consultation-steps/designation/{designation}",
    params(("designation" = String, Path)),
    responses((status = 200, body = StepResponse), (status = 404, body = ErrorResponse)),
    tag = "Consultation steps"
)]
pub async fn get_step_by_designation(
    State(state): State<AppState>,
    Path(designation): Path<String>,
) -> ApiResult<Json<StepResponse>> {
    let view = ConsultationStepService::find_by_designation(&state.db, &designation)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("consultation step '{designation}'")))?;
    Ok(Json(view.into()))
}

/// Steps of one phase
#[utoipa::path(
    get,
    path = "/consultation-steps/phase/{phase_id}",
    params(("phase_id" = Uuid, Path)),
    responses((status = 200, body = Vec<StepResponse>), (status = 404, body = ErrorResponse)),
    tag = "Consultation steps"
)]
pub async fn list_steps_by_phase(
    State(state): State<AppState>,
    Path(phase_id): Path<Uuid>,
) -> ApiResult<Json<Vec<StepResponse>>> {
    let views = ConsultationStepService::list_by_phase(&state.db, phase_id).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/consultation-steps/{id}",
    params(("id" = Uuid, Path)),
    request_body = StepRequest,
    responses(
        (status = 200, body = StepResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Consultation steps"
)]
pub async fn update_step(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<StepRequest>,
) -> ApiResult<Json<StepResponse>> {
    let view = ConsultationStepService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(view.into()))
}

#[utoipa::path(
    delete,
    path = "/consultation-steps/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Step deleted"),
        (status = 404, body = ErrorResponse),
        (status = 409, description = "Used by consultations", body = ErrorResponse)
    ),
    tag = "Consultation steps"
)]
pub async fn delete_step(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ConsultationStepService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_step, list_steps))
        .routes(routes!(get_step, update_step, delete_step))
        .routes(routes!(step_exists))
        .routes(routes!(search_steps))
        .routes(routes!(get_step_by_designation))
        .routes(routes!(list_steps_by_phase))
}
