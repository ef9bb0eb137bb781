use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::{consultation::ConsultationService, submission::SubmissionService};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, LookupParams, PageResponse, SearchParams},
        consultation::{
            ConsultationDetailsResponse, ConsultationRequest, ConsultationResponse,
            StatisticsResponse,
        },
        submission::{OfferSummaryResponse, SubmissionResponse},
    },
    error::{ApiError, ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

/// Register a consultation.
///
/// Every referenced row must exist and `(internalId, consultationYear)` must be
/// unused. A blank reference becomes `CONS-{internalId}-{year}`.
#[utoipa::path(
    post,
    path = "/consultations",
    request_body = ConsultationRequest,
    responses(
        (status = 201, description = "Consultation created", body = ConsultationResponse),
        (status = 400, description = "Missing field or negative amount", body = ErrorResponse),
        (status = 404, description = "A referenced row does not exist", body = ErrorResponse),
        (status = 409, description = "Internal id already used this year", body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn create_consultation(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Json(body): Json<ConsultationRequest>,
) -> ApiResult<(StatusCode, Json<ConsultationResponse>)> {
    let view = ConsultationService::create(&state.db, &actor, body.into()).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

#[utoipa::path(
    get,
    path = "/consultations/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, body = ConsultationResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn get_consultation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConsultationResponse>> {
    let view = ConsultationService::get(&state.db, id).await?;
    Ok(Json(view.into()))
}

/// The consultation together with every submission it received
#[utoipa::path(
    get,
    path = "/consultations/{id}/details",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, body = ConsultationDetailsResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn get_consultation_details(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ConsultationDetailsResponse>> {
    let details = ConsultationService::get_details(&state.db, id).await?;
    Ok(Json(details.into()))
}

#[utoipa::path(
    get,
    path = "/consultations/{id}/exists",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = ExistsResponse)),
    tag = "Consultations"
)]
pub async fn consultation_exists(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ExistsResponse>> {
    let exists = ConsultationService::exists(&state.db, id).await?;
    Ok(Json(ExistsResponse { exists }))
}

#[utoipa::path(
    get,
    path = "/consultations/lookup",
    params(LookupParams),
    responses(
        (status = 200, body = ConsultationResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn lookup_consultation(
    State(state): State<AppState>,
    Query(params): Query<LookupParams>,
) -> ApiResult<Json<ConsultationResponse>> {
    let view = ConsultationService::find_by_internal_id(&state.db, &params.internal_id, &params.year)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!(
                "consultation {} of {}",
                params.internal_id, params.year
            ))
        })?;
    Ok(Json(view.into()))
}

/// Paginated consultations, oldest first unless `sortBy`/`sortDir` say otherwise
#[utoipa::path(
    get,
    path = "/consultations",
    params(ListParams),
    responses((status = 200, body = PageResponse<ConsultationResponse>)),
    tag = "Consultations"
)]
pub async fn list_consultations(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<PageResponse<ConsultationResponse>>> {
    let page = ConsultationService::list(&state.db, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/consultations/search",
    params(SearchParams),
    responses((status = 200, body = PageResponse<ConsultationResponse>)),
    tag = "Consultations"
)]
pub async fn search_consultations(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<PageResponse<ConsultationResponse>>> {
    let page = ConsultationService::search(&state.db, &params.query, &params.page_request()).await?;
    Ok(Json(PageResponse::from_page(page, Into::into)))
}

#[utoipa::path(
    get,
    path = "/consultations/year/{year}",
    params(("year" = String, Path, description = "Consultation year, e.g. 2025")),
    responses((status = 200, body = Vec<ConsultationResponse>)),
    tag = "Consultations"
)]
pub async fn list_consultations_by_year(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> ApiResult<Json<Vec<ConsultationResponse>>> {
    let views = ConsultationService::list_by_year(&state.db, &year).await?;
    Ok(Json(views.into_iter().map(Into::into).collect()))
}

/// Year figures, recomputed on every call
#[utoipa::path(
    get,
    path = "/consultations/statistics/year/{year}",
    params(("year" = String, Path)),
    responses((status = 200, body = StatisticsResponse)),
    tag = "Consultations"
)]
pub async fn consultation_statistics(
    State(state): State<AppState>,
    Path(year): Path<String>,
) -> ApiResult<Json<StatisticsResponse>> {
    let stats = ConsultationService::statistics(&state.db, &year).await?;
    Ok(Json(stats.into()))
}

#[utoipa::path(
    get,
    path = "/consultations/{id}/submissions",
    params(("id" = Uuid, Path)),
    responses((status = 200, body = Vec<SubmissionResponse>)),
    tag = "Consultations"
)]
pub async fn list_consultation_submissions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Vec<SubmissionResponse>>> {
    let submissions = SubmissionService::list_by_consultation(&state.db, id).await?;
    Ok(Json(submissions.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/consultations/{id}/offers",
    params(("id" = Uuid, Path)),
    responses(
        (status = 200, body = OfferSummaryResponse),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn consultation_offers(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<OfferSummaryResponse>> {
    let summary = SubmissionService::offer_summary(&state.db, id).await?;
    Ok(Json(summary.into()))
}

/// Overwrite every field. A reference is re-checked only when its id changed.
#[utoipa::path(
    put,
    path = "/consultations/{id}",
    params(("id" = Uuid, Path)),
    request_body = ConsultationRequest,
    responses(
        (status = 200, body = ConsultationResponse),
        (status = 400, body = ErrorResponse),
        (status = 404, body = ErrorResponse),
        (status = 409, body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn update_consultation(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
    Json(body): Json<ConsultationRequest>,
) -> ApiResult<Json<ConsultationResponse>> {
    let view = ConsultationService::update(&state.db, &actor, id, body.into()).await?;
    Ok(Json(view.into()))
}

/// Submissions are deleted along with the consultation
#[utoipa::path(
    delete,
    path = "/consultations/{id}",
    params(("id" = Uuid, Path)),
    responses(
        (status = 204, description = "Consultation deleted"),
        (status = 404, body = ErrorResponse)
    ),
    tag = "Consultations"
)]
pub async fn delete_consultation(
    State(state): State<AppState>,
    RequestActor(actor): RequestActor,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ConsultationService::delete(&state.db, &actor, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(create_consultation, list_consultations))
        .routes(routes!(get_consultation, update_consultation, delete_consultation))
        .routes(routes!(get_consultation_details))
        .routes(routes!(consultation_exists))
        .routes(routes!(lookup_consultation))
        .routes(routes!(search_consultations))
        .routes(routes!(list_consultations_by_year))
        .routes(routes!(consultation_statistics))
        .routes(routes!(list_consultation_submissions))
        .routes(routes!(consultation_offers))
}
