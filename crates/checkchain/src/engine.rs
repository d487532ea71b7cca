// File: src/engine.rs
// Purpose: Shared, read-only entry point that hands out per-request sessions

use crate::chain::FieldChain;
use crate::config::ValidationConfig;
use crate::registry::CheckLookup;
use crate::session::ValidationSession;
use crate::sources::RequestSources;
use serde_json::Value;
use std::sync::Arc;

/// Validation engine shared across requests.
///
/// Cloning is cheap; the lookup and configuration are never mutated after
/// construction.
#[derive(Clone)]
pub struct ValidationEngine {
    lookup: Arc<dyn CheckLookup>,
    config: Arc<ValidationConfig>,
}

impl ValidationEngine {
    /// Create an engine with the default configuration
    pub fn new(lookup: impl CheckLookup + 'static) -> Self {
        Self::from_shared(Arc::new(lookup), ValidationConfig::default())
    }

    /// Create an engine around an already shared lookup
    pub fn from_shared(lookup: Arc<dyn CheckLookup>, config: ValidationConfig) -> Self {
        Self {
            lookup,
            config: Arc::new(config),
        }
    }

    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    pub fn lookup(&self) -> Arc<dyn CheckLookup> {
        Arc::clone(&self.lookup)
    }

    /// Start a session for one request
    pub fn session(&self, sources: RequestSources) -> ValidationSession {
        ValidationSession::new(self.clone(), sources)
    }

    /// Build a standalone chain, outside of any session.
    ///
    /// A missing or empty `message` falls back to the configured template.
    pub fn chain(&self, field: &str, value: Option<Value>, message: Option<String>) -> FieldChain {
        let message = message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.config.message_for(field));
        FieldChain::new(field, value, message, self.lookup())
            .with_timeout(self.config.check_timeout())
    }
}

impl std::fmt::Debug for ValidationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationEngine")
            .field("config", &self.config)
            .finish()
    }
}
