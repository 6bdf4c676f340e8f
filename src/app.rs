use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::analyzer::HttpClient;
use crate::config::Config;
use crate::handlers::{api, health, pages};
use crate::views::Views;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: SqlitePool,
    pub client: HttpClient,
    pub views: Views,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Server-rendered pages
        .route("/", get(pages::index))
        .route("/urls", get(pages::list_urls).post(pages::create_url))
        .route("/urls/{id}", get(pages::show_url))
        .route("/urls/{id}/checks", post(pages::check_url))
        // JSON API
        .route("/api/urls", get(api::list_urls).post(api::create_url))
        .route("/api/urls/{id}", get(api::show_url))
        .route("/api/urls/{id}/checks", post(api::create_check))
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::{analyzer, db};

    /// Fresh state over a private in-memory database.
    pub async fn test_state() -> Arc<AppState> {
        let config = Config::for_tests();
        let db = db::connect(&config).await.unwrap();
        db::init_db(&db).await.unwrap();

        Arc::new(AppState {
            config,
            db,
            client: analyzer::create_client(),
            views: Views::new().unwrap(),
        })
    }

    pub async fn send(state: &Arc<AppState>, request: Request<Body>) -> Response {
        router(state.clone()).oneshot(request).await.unwrap()
    }

    pub fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    pub fn form_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub fn json_post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub async fn body_json(response: Response) -> serde_json::Value {
        serde_json::from_str(&body_text(response).await).unwrap()
    }
}
