// File: src/session.rs
// Purpose: Per-request collection of field chains and the single validation trigger

use crate::chain::FieldChain;
use crate::engine::ValidationEngine;
use crate::error::ValidationFailure;
use crate::handle::FieldHandle;
use crate::sources::{FieldSource, RequestSources};
use serde_json::Value;
use tracing::{debug, trace};

/// Lifecycle of a session before it is consumed by validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No field registered yet
    Empty,

    /// At least one field registered
    Collecting,
}

/// Every chain declared while handling one request.
///
/// Chains are evaluated in registration order by [`validate_all`](Self::validate_all),
/// which consumes the session.
pub struct ValidationSession {
    engine: ValidationEngine,
    sources: RequestSources,
    chains: Vec<FieldChain>,
}

impl ValidationSession {
    pub fn new(engine: ValidationEngine, sources: RequestSources) -> Self {
        Self {
            engine,
            sources,
            chains: Vec::new(),
        }
    }

    /// Register a field with an explicit value.
    ///
    /// `message` replaces the configured default message for this field.
    pub fn register_field(
        &mut self,
        name: &str,
        value: Option<Value>,
        message: Option<String>,
    ) -> FieldHandle<'_> {
        let chain = self.engine.chain(name, value, message);
        self.chains.push(chain);

        let last = self.chains.len() - 1;
        FieldHandle::new(&mut self.chains[last])
    }

    /// Register a field read from `source`.
    ///
    /// The field starts with the derived default message; chain
    /// [`FieldHandle::message`] to supply an explicit one.
    pub fn field(&mut self, source: FieldSource, name: &str) -> FieldHandle<'_> {
        let value = self.sources.get(source, name);
        trace!(field = %name, source = %source, present = value.is_some(), "field registered");
        self.register_field(name, value, None)
    }

    /// Register a field from the request body.
    ///
    /// `session.body("email").message("email is required")` sets the optional
    /// default message, as with [`register_field`](Self::register_field).
    pub fn body(&mut self, name: &str) -> FieldHandle<'_> {
        self.field(FieldSource::Body, name)
    }

    /// Register a field from the query string; see [`body`](Self::body) for messages
    pub fn query(&mut self, name: &str) -> FieldHandle<'_> {
        self.field(FieldSource::Query, name)
    }

    /// Register a field from the path parameters; see [`body`](Self::body) for messages
    pub fn param(&mut self, name: &str) -> FieldHandle<'_> {
        self.field(FieldSource::Params, name)
    }

    pub fn state(&self) -> SessionState {
        if self.chains.is_empty() {
            SessionState::Empty
        } else {
            SessionState::Collecting
        }
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    /// Registered field names, in evaluation order
    pub fn fields(&self) -> Vec<&str> {
        self.chains.iter().map(FieldChain::field).collect()
    }

    pub fn sources(&self) -> &RequestSources {
        &self.sources
    }

    /// Run every chain in registration order.
    ///
    /// Stops at the first chain that does not pass and returns its failure;
    /// later chains are never evaluated.
    pub async fn validate_all(self) -> Result<(), ValidationFailure> {
        debug!(fields = self.chains.len(), "validation started");

        for chain in &self.chains {
            if let Err(failure) = chain.execute().await {
                debug!(field = %failure.field(), "validation blocked");
                return Err(failure);
            }
        }

        debug!("validation passed");
        Ok(())
    }
}

impl std::fmt::Debug for ValidationSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationSession")
            .field("chains", &self.chains)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::predicate;
    use crate::registry::CheckRegistry;
    use serde_json::json;
    use std::collections::HashMap;

    fn engine() -> ValidationEngine {
        ValidationEngine::new(CheckRegistry::new().with(
            "string",
            "required",
            predicate(|v, _| v.and_then(Value::as_str).is_some_and(|s| !s.is_empty())),
        ))
    }

    #[test]
    fn test_state_transitions() {
        let mut session = engine().session(RequestSources::new());
        assert_eq!(session.state(), SessionState::Empty);

        session.body("a");
        assert_eq!(session.state(), SessionState::Collecting);

        session.query("b");
        assert_eq!(session.state(), SessionState::Collecting);
        assert_eq!(session.fields(), vec!["a", "b"]);
    }

    #[test]
    fn test_fields_read_from_their_source() {
        let mut query = HashMap::new();
        query.insert("q".to_string(), "rust".to_string());
        let mut params = HashMap::new();
        params.insert("id".to_string(), "7".to_string());
        let sources = RequestSources::new()
            .with_body(json!({ "name": "Ada" }))
            .with_query(query)
            .with_params(params);

        let mut session = engine().session(sources);
        assert_eq!(session.body("name").chain().value(), Some(&json!("Ada")));
        assert_eq!(session.query("q").chain().value(), Some(&json!("rust")));
        assert_eq!(session.param("id").chain().value(), Some(&json!("7")));
        assert_eq!(session.body("q").chain().value(), None);
    }

    #[tokio::test]
    async fn test_empty_session_passes() {
        let session = engine().session(RequestSources::new());
        assert_eq!(session.validate_all().await, Ok(()));
    }

    #[tokio::test]
    async fn test_register_field_with_message() {
        let mut session = engine().session(RequestSources::new());
        session
            .register_field("code", Some(json!("")), Some("code is required".into()))
            .check("string", "required", ());

        let failure = session.validate_all().await.unwrap_err();
        assert_eq!(failure.to_string(), "code is required");
        assert_eq!(failure.field(), "code");
    }

    #[tokio::test]
    async fn test_empty_message_falls_back_to_derived() {
        let mut session = engine().session(RequestSources::new());
        session
            .register_field("b", Some(json!("")), Some(String::new()))
            .check("string", "required", ());

        let failure = session.validate_all().await.unwrap_err();
        assert_eq!(failure.to_string(), "invalid value for b");
    }

    #[tokio::test]
    async fn test_accessor_message_via_handle() {
        let mut session = engine().session(RequestSources::new());
        session
            .query("page")
            .message("page is required")
            .check("string", "required", ());
        session.body("title").message("").check("string", "required", ());

        assert_eq!(session.fields(), vec!["page", "title"]);
        let failure = session.validate_all().await.unwrap_err();
        assert_eq!(failure.to_string(), "page is required");
    }
}
