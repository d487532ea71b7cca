// File: src/routes.rs
// Purpose: Demo handlers declaring their field checks through the Validation extractor

use crate::checks::{self, Accounts};
use axum::{
    extract::{FromRef, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use checkchain::{ValidationConfig, ValidationEngine};
use checkchain_axum::{checks, Validation, ValidationRejection};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    engine: ValidationEngine,
    accounts: Accounts,
}

impl AppState {
    pub fn new(config: ValidationConfig, accounts: Accounts) -> Self {
        let engine = ValidationEngine::new(checks::registry(Arc::clone(&accounts))).with_config(config);
        Self { engine, accounts }
    }
}

impl FromRef<AppState> for ValidationEngine {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user))
        .route("/users/:id", get(show_user))
        .route("/search", get(search))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn create_user(
    State(state): State<AppState>,
    mut v: Validation,
) -> Result<Json<Value>, ValidationRejection> {
    checks!(v.body("email"), string.required(), string.email(), account.unique());
    checks!(v.body("name"), string.required(), string.length({ "min": 2, "max": 64 }));
    checks!(
        v.body("age").optional().message("age must be between 18 and 130"),
        number.range({ "min": 18, "max": 130 })
    );

    let email = v
        .sources()
        .body()
        .get("email")
        .and_then(Value::as_str)
        .map(str::to_lowercase)
        .unwrap_or_default();
    v.validate().await?;

    state.accounts.write().await.insert(email.clone());
    info!(%email, "user created");
    Ok(Json(json!({ "created": email })))
}

async fn show_user(
    Path(id): Path<String>,
    mut v: Validation,
) -> Result<Json<Value>, ValidationRejection> {
    checks!(
        v.param("id").message("id must be a positive number"),
        number.range({ "min": 1 })
    );
    v.validate().await?;

    Ok(Json(json!({ "id": id })))
}

async fn search(mut v: Validation) -> Result<Json<Value>, ValidationRejection> {
    checks!(v.query("q"), string.required(), string.length({ "max": 100 }));
    checks!(v.query("page").optional(), number.range({ "min": 1 }));

    let query = v.sources().query().get("q").cloned().unwrap_or_default();
    v.validate().await?;

    Ok(Json(json!({ "query": query, "results": [] })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header::CONTENT_TYPE, Request, StatusCode};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tokio::sync::RwLock;
    use tower::ServiceExt;

    fn app() -> Router {
        let accounts: Accounts = Arc::new(RwLock::new(HashSet::from(["ada@example.com".to_string()])));
        router(AppState::new(ValidationConfig::default(), accounts))
    }

    fn post_json(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/users")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn send(request: Request<Body>) -> (StatusCode, Value) {
        let response = app().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_user() {
        let (status, body) = send(post_json(json!({ "email": "grace@example.com", "name": "Grace" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "created": "grace@example.com" }));
    }

    #[tokio::test]
    async fn test_create_user_rejections() {
        let (status, body) = send(post_json(json!({ "email": "ada@example.com", "name": "Ada" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "email already registered" }));

        let (_, body) = send(post_json(json!({ "email": "not-an-email", "name": "Ada" }))).await;
        assert_eq!(body, json!({ "error": "invalid value for email" }));

        let (_, body) = send(post_json(json!({ "email": "g@example.com", "name": "G", "age": 12 }))).await;
        assert_eq!(body, json!({ "error": "invalid value for name" }));

        let (_, body) = send(post_json(json!({ "email": "g@example.com", "name": "Grace", "age": 12 }))).await;
        assert_eq!(body, json!({ "error": "age must be between 18 and 130" }));
    }

    #[tokio::test]
    async fn test_show_user() {
        let request = Request::builder().uri("/users/0").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "id must be a positive number" }));

        let request = Request::builder().uri("/users/7").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "id": "7" }));
    }

    #[tokio::test]
    async fn test_search() {
        let request = Request::builder().uri("/search?q=rust&page=2").body(Body::empty()).unwrap();
        let (status, body) = send(request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "query": "rust", "results": [] }));

        let request = Request::builder().uri("/search?q=rust&page=0").body(Body::empty()).unwrap();
        let (_, body) = send(request).await;
        assert_eq!(body, json!({ "error": "invalid value for page" }));
    }
}
