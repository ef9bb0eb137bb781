use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::submission::SubmissionService;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
        submission::{SubmissionRequest, SubmissionResponse},
    },
    error::{ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

/// Record a provider's bid on an open consultation.
///
/// Rejected once the deadline has passed, and when the provider already bid
/// on the same consultation.
#[utoipa::path(
    post,
    path = "/submissions",
    request_body = SubmissionRequest,
    responses(
        (status = 201, body = SubmissionResponse),
        (status = 400, description = "Missing id, negative offer or deadline passed", body = ErrorResponse),
        (status = 404, description = "Consultation, provider or file not found", body = ErrorResponse),
        (status = 409, description = "Provider already submitted", body = ErrorResponse)
    ),
    tag = "Submissions"
)]
pub async fn create_submission(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<SubmissionRequest>,
) -> ApiResult<(StatusCode, Json<SubmissionResponse>)> {
    let model = SubmissionService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(model.into())))
}

#[utoipa::path(
    get,
    path = "/submissions/{id}",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = SubmissionResponse), (status = 404, body = ErrorResponse)),
    tag = "Submissions"
)]
pub async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SubmissionResponse>> {
    let model = SubmissionService::get(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    get,
    path = "/submissions/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Submissions"
)]
pub async fn submission_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = SubmissionService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[utoipa::path(
    get,
    path = "/submissions",
    params(ListParams),
    responses((status = 200, body = PageResponse<SubmissionResponse>)),
    tag = "Submissions"
)]
pub async fn list_submissions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<SubmissionResponse>>> {
    let page = SubmissionService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

/// Matches the provider's company name or the consultation reference
#[utoipa::path(
    get,
    path = "/submissions/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<SubmissionResponse>)),
    tag = "Submissions"
)]
pub async fn search_submissions(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<SubmissionResponse>>> {
    let page = SubmissionService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

/// File references left out of the body are cleared
#[utoipa::path(
    put,
    path = "/submissions/{id}",
    params(("id" = Uuid, Path)),
    request_body = SubmissionRequest,
    responses(
        (status = 200, body = SubmissionResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Submissions"
)]
pub async fn update_submission(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmissionRequest>,
) -> ApiResult<Json<SubmissionResponse>> {
    let model = SubmissionService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/submissions/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Submission deleted"),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Submissions"
)]
pub async fn delete_submission(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    SubmissionService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_submission, list_submissions))
        .routes(routes!(get_submission, update_submission, delete_submission))
        .routes(routes!(submission_exists))
        .routes(routes!(search_submissions))
}
