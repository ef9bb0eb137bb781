//! Endpoints of the designation-only reference tables. They share one shape,
//! so [`reference_routes!`] generates the handlers of each table; the paths are
//! spelled out per table because the OpenAPI attributes need literals.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use database::services::reference::{
    ApprovalStatusService, BudgetTypeService, ConsultationPhaseService, ExclusionTypeService,
    RealizationDirectorService, RealizationNatureService, RealizationStatusService,
};
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use crate::{
    dtos::{
        common::{ExistsResponse, ListParams, PageResponse, SearchParams},
        reference::{DesignationRequest, ReferenceResponse},
    },
    error::{ApiError, ApiResult, ErrorResponse},
    extract::RequestActor,
    state::AppState,
};

macro_rules! reference_routes {
    (
        $module:ident, $service:ident, $convert:ident, tag = $tag:tt,
        collection = $collection:tt,
        item = $item:tt,
        exists = $exists:tt,
        search = $search:tt,
        designation = $designation:tt $(,)?
    ) => {
        pub mod $module {
            use super::*;

            #[utoipa::path(
                post,
                path = $collection,
                request_body = DesignationRequest,
                responses(
                    (status = 201, description = "Created", body = ReferenceResponse),
                    (status = 400, description = "Missing designation", body = ErrorResponse),
                    (status = 409, description = "Designation already used", body = ErrorResponse)
                ),
                tag = $tag
            )]
            pub async fn create(
                State(state): State<AppState>,
                RequestActor(actor): RequestActor,
                Json(body): Json<DesignationRequest>,
            ) -> ApiResult<(StatusCode, Json<ReferenceResponse>)> {
                let record = $service::create(&state.db, &actor, body.into()).await?;
                Ok((StatusCode::CREATED, Json(ReferenceResponse::$convert(record))))
            }

            #[utoipa::path(
                get,
                path = $item,
                params(("id" = Uuid, Path)),
                responses(
                    (status = 200, body = ReferenceResponse),
                    (status = 404, body = ErrorResponse)
                ),
                tag = $tag
            )]
            pub async fn get_one(
                State(state): State<AppState>,
                Path(id): Path<Uuid>,
            ) -> ApiResult<Json<ReferenceResponse>> {
                let record = $service::get(&state.db, id).await?;
                Ok(Json(ReferenceResponse::$convert(record)))
            }

            #[utoipa::path(
                get,
                path = $exists,
                params(("id" = Uuid, Path)),
                responses((status = 200, body = ExistsResponse)),
                tag = $tag
            )]
            pub async fn exists(
                State(state): State<AppState>,
                Path(id): Path<Uuid>,
            ) -> ApiResult<Json<ExistsResponse>> {
                let exists = $service::exists(&state.db, id).await?;
                Ok(Json(ExistsResponse { exists }))
            }

            #[utoipa::path(
                get,
                path = $collection,
                params(ListParams),
                responses((status = 200, body = PageResponse<ReferenceResponse>)),
                tag = $tag
            )]
            pub async fn list(
                State(state): State<AppState>,
                Query(params): Query<ListParams>,
            ) -> ApiResult<Json<PageResponse<ReferenceResponse>>> {
                let page = $service::list(&state.db, &params.page_request()).await?;
                Ok(Json(PageResponse::from_page(page, ReferenceResponse::$convert)))
            }

            #[utoipa::path(
                get,
                path = $search,
                params(SearchParams),
                responses((status = 200, body = PageResponse<ReferenceResponse>)),
                tag = $tag
            )]
            pub async fn search(
                State(state): State<AppState>,
                Query(params): Query<SearchParams>,
            ) -> ApiResult<Json<PageResponse<ReferenceResponse>>> {
                let page =
                    $service::search(&state.db, &params.query, &params.page_request()).await?;
                Ok(Json(PageResponse::from_page(page, ReferenceResponse::$convert)))
            }

            #[utoipa::path(
                get,
                path = $designation,
                params(("designation" = String, Path, description = "Exact French designation")),
                responses(
                    (status = 200, body = ReferenceResponse),
                    (status = 404, body = ErrorResponse)
                ),
                tag = $tag
            )]
            pub async fn by_designation(
                State(state): State<AppState>,
                Path(designation): Path<String>,
            ) -> ApiResult<Json<ReferenceResponse>> {
                let record = $service::find_by_designation(&state.db, &designation)
                    .await?
                    .ok_or_else(|| {
                        ApiError::not_found(format!("{} '{designation}'", $service::ENTITY))
                    })?;
                Ok(Json(ReferenceResponse::$convert(record)))
            }

            #[utoipa::path(
                put,
                path = $item,
                params(("id" = Uuid, Path)),
                request_body = DesignationRequest,
                responses(
                    (status = 200, body = ReferenceResponse),
                    (status = 400, body = ErrorResponse),
                    (status = 404, body = ErrorResponse),
                    (status = 409, body = ErrorResponse)
                ),
                tag = $tag
            )]
            pub async fn update(
                State(state): State<AppState>,
                RequestActor(actor): RequestActor,
                Path(id): Path<Uuid>,
                Json(body): Json<DesignationRequest>,
            ) -> ApiResult<Json<ReferenceResponse>> {
                let record = $service::update(&state.db, &actor, id, body.into()).await?;
                Ok(Json(ReferenceResponse::$convert(record)))
            }

            #[utoipa::path(
                delete,
                path = $item,
                params(("id" = Uuid, Path)),
                responses(
                    (status = 204, description = "Deleted"),
                    (status = 404, body = ErrorResponse),
                    (status = 409, description = "Still referenced", body = ErrorResponse)
                ),
                tag = $tag
            )]
            pub async fn remove(
                State(state): State<AppState>,
                RequestActor(actor): RequestActor,
                Path(id): Path<Uuid>,
            ) -> ApiResult<StatusCode> {
                $service::delete(&state.db, &actor, id).await?;
                Ok(StatusCode::NO_CONTENT)
            }

            pub fn routes() -> OpenApiRouter<AppState> {
                OpenApiRouter::new()
                    .routes(routes!(create, list))
                    .routes(routes!(get_one, update, remove))
                    .routes(routes!(exists))
                    .routes(routes!(search))
                    .routes(routes!(by_designation))
            }
        }
    };
}

reference_routes!(
    approval_status, ApprovalStatusService, plain, tag = "Approval statuses",
    collection = "/approval-statuses",
    item = "/approval-statuses/{id}",
    exists = "/approval-statuses/{id}/exists",
    search = "/approval-statuses/search",
    designation = "/approval-statuses/designation/{designation}",
);

reference_routes!(
    realization_status, RealizationStatusService, plain, tag = "Realization statuses",
    collection = "/realization-statuses",
    item = "/realization-statuses/{id}",
    exists = "/realization-statuses/{id}/exists",
    search = "/realization-statuses/search",
    designation = "/realization-statuses/designation/{designation}",
);

reference_routes!(
    realization_nature, RealizationNatureService, plain, tag = "Realization natures",
    collection = "/realization-natures",
    item = "/realization-natures/{id}",
    exists = "/realization-natures/{id}/exists",
    search = "/realization-natures/search",
    designation = "/realization-natures/designation/{designation}",
);

reference_routes!(
    realization_director, RealizationDirectorService, director, tag = "Realization directors",
    collection = "/realization-directors",
    item = "/realization-directors/{id}",
    exists = "/realization-directors/{id}/exists",
    search = "/realization-directors/search",
    designation = "/realization-directors/designation/{designation}",
);

reference_routes!(
    budget_type, BudgetTypeService, plain, tag = "Budget types",
    collection = "/budget-types",
    item = "/budget-types/{id}",
    exists = "/budget-types/{id}/exists",
    search = "/budget-types/search",
    designation = "/budget-types/designation/{designation}",
);

reference_routes!(
    exclusion_type, ExclusionTypeService, exclusion, tag = "Exclusion types",
    collection = "/exclusion-types",
    item = "/exclusion-types/{id}",
    exists = "/exclusion-types/{id}/exists",
    search = "/exclusion-types/search",
    designation = "/exclusion-types/designation/{designation}",
);

reference_routes!(
    consultation_phase, ConsultationPhaseService, phase, tag = "Consultation phases",
    collection = "/consultation-phases",
    item = "/consultation-phases/{id}",
    exists = "/consultation-phases/{id}/exists",
    search = "/consultation-phases/search",
    designation = "/consultation-phases/designation/{designation}",
);

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .merge(approval_status::routes())
        .merge(realization_status::routes())
        .merge(realization_nature::routes())
        .merge(realization_director::routes())
        .merge(budget_type::routes())
        .merge(exclusion_type::routes())
        .merge(consultation_phase::routes())
}
