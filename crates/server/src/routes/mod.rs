use axum::Router;
use tower_http::compression::CompressionLayer;
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::{doc::ApiDoc, state::AppState};

pub mod award_method;
pub mod clearance;
pub mod consultation;
pub mod consultation_step;
pub mod file;
pub mod health;
pub mod provider;
pub mod provider_representator;
pub mod reference;
pub mod submission;

/// Every endpoint plus Swagger UI, ready to serve
pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .merge(health::routes())
        .merge(reference::routes())
        .merge(award_method::routes())
        .merge(consultation_step::routes())
        .merge(consultation::routes())
        .merge(submission::routes())
        .merge(provider::routes())
        .merge(provider_representator::routes())
        .merge(clearance::routes())
        .merge(file::routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(CompressionLayer::new())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
    };
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    async fn app() -> Router {
        let mut options = ConnectOptions::new("sqlite::memory:");
        options.max_connections(1).sqlx_logging(false);
        let db = Database::connect(options).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        router(AppState::new(db))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header("X-Actor", "buyer")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = app().await;
        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_create_award_method() {
        let app = app().await;

        let (status, body) = send(
            &app,
            post(
                "/award-methods",
                json!({ "designationFr": "Appel d'offres restreint", "acronymFr": "AOR" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["category"], "APPEL_OFFRES");
        assert_eq!(body["createdBy"], "buyer");

        let (status, body) = send(&app, get("/award-methods/acronym/AOR")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["designationFr"], "Appel d'offres restreint");

        let (status, body) = send(
            &app,
            post("/award-methods", json!({ "designationFr": "Autre", "acronymFr": "AOR" })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "CONFLICT");
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request() {
        let app = app().await;

        let (status, body) = send(&app, post("/budget-types", json!({ "designationEn": "Capex" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "MISSING_FIELD");
        assert_eq!(body["message"], "designationFr is required");
    }

    #[tokio::test]
    async fn test_reference_lifecycle() {
        let app = app().await;

        let (status, created) = send(
            &app,
            post("/realization-directors", json!({ "designationFr": "Direction régionale Ouest" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["directorType"], "REGIONAL");
        let id = created["id"].as_str().unwrap().to_owned();

        let (status, body) = send(&app, get(&format!("/realization-directors/{id}/exists"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["exists"], true);

        let (status, page) = send(&app, get("/realization-directors/search?query=ouest")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(page["pagination"]["totalItems"], 1);

        let response = app
            .clone()
            .oneshot(
                Request::delete(format!("/realization-directors/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, body) = send(&app, get(&format!("/realization-directors/{id}"))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_huge_page_number() {
        let app = app().await;

        let (status, body) = send(&app, get("/budget-types?page=18446744073709551615")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["items"], json!([]));
        assert_eq!(body["pagination"]["hasNext"], false);
    }

    #[tokio::test]
    async fn test_anonymous_actor() {
        let app = app().await;
        let request = Request::post("/providers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "companyName": "Cosider" }).to_string()))
            .unwrap();

        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["createdBy"], "anonymous");
    }

    #[tokio::test]
    async fn test_statistics_for_empty_year() {
        let app = app().await;

        let (status, body) = send(&app, get("/consultations/statistics/year/2031")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["year"], "2031");
        assert_eq!(body["totalConsultations"], 0);
        assert_eq!(body["averageCompetitiveRatio"], 0.0);
    }

    #[tokio::test]
    async fn test_openapi_document() {
        let app = app().await;

        let (status, body) = send(&app, get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/consultations/{id}/offers"].is_object());
        assert!(body["paths"]["/budget-types/designation/{designation}"].is_object());
    }
}
