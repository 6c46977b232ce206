use axum::Router;

use crate::state::SharedState;

/// Bag, mental elements, home club and courses.
pub mod account;
/// Swagger UI.
pub mod docs;
/// Health check.
pub mod health;
/// Public contact and interest forms.
pub mod intake;
/// Round capture.
pub mod rounds;
/// Statistics and CSV export.
pub mod stats;

/// Compose every route tree, the Swagger UI included, over the shared state.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(rounds::router())
        .merge(stats::router())
        .merge(account::router())
        .merge(intake::router())
        .merge(docs::router())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::table_store::{
            Table,
            memory::{MemoryStore, Verb},
        },
        state::AppState,
    };

    const TOKEN: &str = "test-token";

    fn server() -> (MemoryStore, TestServer) {
        let store = MemoryStore::new();
        store.register_token(TOKEN, Uuid::new_v4());
        let state = AppState::with_store(AppConfig::default(), Arc::new(store.clone()));
        (store, TestServer::new(router(state)).unwrap())
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let (_, server) = server();
        let response = server.get("/healthcheck").await;
        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (_, server) = server();
        let doc: Value = server.get(docs::OPENAPI_JSON_PATH).await.json();
        assert_eq!(doc["info"]["title"], json!("golf-brain-back"));
        assert!(doc["paths"]["/rounds/{id}/complete"].is_object());
    }

    #[tokio::test]
    async fn degraded_state_answers_503() {
        let state = AppState::new(AppConfig::default());
        let server = TestServer::new(router(state)).unwrap();

        server
            .get("/healthcheck")
            .await
            .assert_json(&json!({ "status": "degraded" }));
        server
            .get("/rounds/active")
            .authorization_bearer(TOKEN)
            .await
            .assert_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn data_routes_require_a_session() {
        let (_, server) = server();

        let missing = server.get("/stats/dashboard").await;
        missing.assert_status(StatusCode::UNAUTHORIZED);
        missing.assert_text("missing bearer token in `Authorization` header");

        server
            .get("/account/bag")
            .authorization_bearer("someone-else")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn round_lifecycle_over_http() {
        let (_, server) = server();

        server
            .post("/rounds/active")
            .authorization_bearer(TOKEN)
            .json(&json!({}))
            .await
            .assert_status(StatusCode::CONFLICT);

        server
            .put("/account/home-club")
            .authorization_bearer(TOKEN)
            .json(&json!({ "name": "Oak Hill", "pars": [3, 4, 5] }))
            .await
            .assert_status_ok();

        let round: Value = server
            .post("/rounds/active")
            .authorization_bearer(TOKEN)
            .json(&json!({}))
            .await
            .json();
        let id = round["id"].as_str().unwrap().to_string();

        let hole: Value = server
            .get(&format!("/rounds/{id}/holes/3"))
            .authorization_bearer(TOKEN)
            .await
            .json();
        assert_eq!(hole["par"], json!(5));
        assert_eq!(hole["strokes"].as_array().unwrap().len(), 5);

        server
            .get(&format!("/rounds/{id}/holes/4"))
            .authorization_bearer(TOKEN)
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post(&format!("/rounds/{id}/current-hole"))
            .authorization_bearer(TOKEN)
            .json(&json!({ "hole_number": 0 }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .delete(&format!("/rounds/{id}"))
            .authorization_bearer(TOKEN)
            .await
            .assert_status(StatusCode::CONFLICT);

        let done: Value = server
            .post(&format!("/rounds/{id}/complete"))
            .authorization_bearer(TOKEN)
            .await
            .json();
        assert_eq!(done["status"], json!("complete"));

        let csv = server
            .get("/stats/export.csv")
            .authorization_bearer(TOKEN)
            .await;
        csv.assert_status_ok();
        assert_eq!(csv.header("content-type"), "text/csv; charset=utf-8");
        assert_eq!(csv.text().lines().count(), 1 + 3 + 4 + 5);
    }

    #[tokio::test]
    async fn account_labels_are_validated() {
        let (_, server) = server();

        server
            .post("/account/mental-elements")
            .authorization_bearer(TOKEN)
            .json(&json!({ "label": " x " }))
            .await
            .assert_status(StatusCode::BAD_REQUEST);

        server
            .post("/account/bag")
            .authorization_bearer(TOKEN)
            .json(&json!({ "label": "Driver" }))
            .await
            .assert_status_ok();
        let duplicate = server
            .post("/account/bag")
            .authorization_bearer(TOKEN)
            .json(&json!({ "label": "Driver" }))
            .await;
        duplicate.assert_status(StatusCode::CONFLICT);
        duplicate.assert_text("That club already exists.");
    }

    #[tokio::test]
    async fn intake_reports_plain_text_reasons() {
        let (store, server) = server();

        let malformed = server
            .post("/api/contact")
            .bytes("{not json".into())
            .content_type("application/json")
            .await;
        malformed.assert_status(StatusCode::BAD_REQUEST);
        malformed.assert_text("Invalid JSON");

        let invalid = server
            .post("/api/interest")
            .json(&json!({ "email": "golfer@example.com", "tier": "gold" }))
            .await;
        invalid.assert_status(StatusCode::BAD_REQUEST);
        invalid.assert_text("Invalid tier");

        server
            .post("/api/contact")
            .json(&json!({ "email": " Golfer@Example.com ", "message": "Loving the app" }))
            .await
            .assert_json(&json!({ "ok": true }));
        let stored = store.rows(Table::ContactMessages);
        assert_eq!(stored[0]["email"], json!("golfer@example.com"));

        store.fail_after(
            Table::InterestSignups,
            Verb::Insert,
            0,
            "new row violates row-level security policy",
        );
        let failed = server
            .post("/api/interest")
            .json(&json!({ "email": "golfer@example.com", "tier": "pro" }))
            .await;
        failed.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        failed.assert_text("new row violates row-level security policy");
    }
}
