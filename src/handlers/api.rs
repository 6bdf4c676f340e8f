use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::analyzer::{self, Registration};
use crate::app::AppState;
use crate::db;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct CreateUrlRequest {
    url: String,
}

pub async fn create_url(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUrlRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let (status, url) = match analyzer::register_url(&state, &request.url).await? {
        Registration::Created(url) => (StatusCode::CREATED, url),
        Registration::Existing(url) => (StatusCode::OK, url),
    };
    Ok((status, Json(json!(url))))
}

pub async fn list_urls(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let summaries = db::list_url_summaries(&state.db).await?;
    Ok(Json(json!({ "urls": summaries })))
}

pub async fn show_url(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let url = super::find_url(&state, &id).await?;
    let checks = db::find_checks_by_url(&state.db, url.id).await?;
    Ok(Json(json!({ "url": url, "checks": checks })))
}

pub async fn create_check(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<serde_json::Value>), AppError> {
    let url = super::find_url(&state, &id).await?;
    let check = analyzer::run_check(&state, &url).await?;
    Ok((StatusCode::CREATED, Json(json!(check))))
}

#[cfg(test)]
mod tests {
    use crate::app::test_support::{body_json, get, json_post, send, test_state};
    use axum::http::StatusCode;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn creates_then_returns_existing_url() {
        let state = test_state().await;

        let response = send(&state, json_post("/api/urls", r#"{"url":"https://Example.com/a"}"#)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created = body_json(response).await;
        assert_eq!(created["name"], "https://example.com");

        let response = send(&state, json_post("/api/urls", r#"{"url":"https://example.com"}"#)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let existing = body_json(response).await;
        assert_eq!(existing["id"], created["id"]);
    }

    #[tokio::test]
    async fn rejects_invalid_url_with_error_envelope() {
        let state = test_state().await;
        let response = send(&state, json_post("/api/urls", r#"{"url":"ftp://example.com"}"#)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"]["type"], "invalid_url");
    }

    #[tokio::test]
    async fn lists_urls_with_last_check() {
        let state = test_state().await;
        send(&state, json_post("/api/urls", r#"{"url":"https://one.com"}"#)).await;

        let body = body_json(send(&state, get("/api/urls")).await).await;
        let urls = body["urls"].as_array().unwrap();
        assert_eq!(urls.len(), 1);
        assert_eq!(urls[0]["url"]["name"], "https://one.com");
        assert!(urls[0]["last_check"].is_null());
    }

    #[tokio::test]
    async fn missing_url_is_json_not_found() {
        let state = test_state().await;
        let response = send(&state, get("/api/urls/7")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["type"], "not_found");

        let response = send(&state, json_post("/api/urls/7/checks", "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&state, get("/api/urls/abc")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["type"], "not_found");

        let response = send(&state, json_post("/api/urls/abc/checks", "")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["error"]["type"], "not_found");
    }

    #[tokio::test]
    async fn runs_check_and_shows_history() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404).set_body_string("<title>Missing</title>"),
            )
            .mount(&server)
            .await;

        let state = test_state().await;
        let body = serde_json::json!({ "url": server.uri() }).to_string();
        let created = body_json(send(&state, json_post("/api/urls", &body)).await).await;
        let id = created["id"].as_i64().unwrap();

        let response = send(&state, json_post(&format!("/api/urls/{id}/checks"), "")).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let check = body_json(response).await;
        assert_eq!(check["status_code"], 404);
        assert_eq!(check["title"], "Missing");
        assert!(check["h1"].is_null());

        let shown = body_json(send(&state, get(&format!("/api/urls/{id}"))).await).await;
        assert_eq!(shown["url"]["id"], id);
        assert_eq!(shown["checks"].as_array().unwrap().len(), 1);
    }
}
