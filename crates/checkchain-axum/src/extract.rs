// ./crates/checkchain-axum/src/extract.rs

use crate::response::ValidationRejection;
use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request},
    http::{header::CONTENT_TYPE, HeaderMap},
    Form,
};
use checkchain::{RequestSources, ValidationEngine, ValidationSession};
use serde_json::Value;
use std::collections::HashMap;
use std::ops::{Deref, DerefMut};
use tracing::debug;

// ════════════════════════════════════════════════════════════
// 1. Body formats the extractor understands
// ════════════════════════════════════════════════════════════
#[derive(Debug, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    None,
}

impl BodyKind {
    fn of(headers: &HeaderMap) -> Self {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if content_type.starts_with("application/json") {
            BodyKind::Json
        } else if content_type.starts_with("application/x-www-form-urlencoded") {
            BodyKind::Form
        } else {
            BodyKind::None
        }
    }
}

// ════════════════════════════════════════════════════════════
// 2. The Extractor Struct
// ════════════════════════════════════════════════════════════

/// Per-request validation session, built from the path parameters, query string
/// and body of the incoming request.
///
/// ```rust,no_run
/// use checkchain_axum::{checks, Validation, ValidationRejection};
///
/// async fn create_user(mut v: Validation) -> Result<&'static str, ValidationRejection> {
///     checks!(v.body("email"), string.required(), string.email());
///     checks!(v.query("invite"), string.required());
///     v.validate().await?;
///     Ok("created")
/// }
/// ```
pub struct Validation {
    session: ValidationSession,
}

impl Validation {
    /// Run every declared chain; the first failure becomes a 400 rejection
    pub async fn validate(self) -> Result<(), ValidationRejection> {
        self.session.validate_all().await?;
        Ok(())
    }

    pub fn into_session(self) -> ValidationSession {
        self.session
    }
}

impl Deref for Validation {
    type Target = ValidationSession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for Validation {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

#[async_trait]
impl<S> FromRequest<S> for Validation
where
    S: Send + Sync,
    ValidationEngine: FromRef<S>,
{
    type Rejection = ValidationRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let engine = ValidationEngine::from_ref(state);
        let (mut parts, body) = req.into_parts();

        // Routes without parameters and malformed query strings both read as empty
        let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Path(params)| params)
            .unwrap_or_default();
        let query = Query::<HashMap<String, String>>::from_request_parts(&mut parts, state)
            .await
            .map(|Query(query)| query)
            .unwrap_or_default();

        let kind = BodyKind::of(&parts.headers);
        let req = Request::from_parts(parts, body);
        let sources = RequestSources::new().with_params(params).with_query(query);

        let sources = match kind {
            BodyKind::Json => {
                let bytes = Bytes::from_request(req, state).await.map_err(|err| {
                    debug!(%err, "failed to read request body");
                    ValidationRejection::invalid_body()
                })?;
                if bytes.is_empty() {
                    sources
                } else {
                    let body: Value = serde_json::from_slice(&bytes).map_err(|err| {
                        debug!(%err, "request body is not valid JSON");
                        ValidationRejection::invalid_body()
                    })?;
                    sources.with_body(body)
                }
            }
            BodyKind::Form => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|err| {
                        debug!(%err, "request body is not a valid form");
                        ValidationRejection::invalid_body()
                    })?;
                sources.with_form(fields)
            }
            BodyKind::None => sources,
        };

        Ok(Validation {
            session: engine.session(sources),
        })
    }
}
