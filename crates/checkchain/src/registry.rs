//! Check registry - resolves `(namespace, name)` pairs to checks

use crate::check::Check;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Resolves a declared check to its implementation.
///
/// The engine only ever reads through this trait, so one lookup is shared by
/// every request.
pub trait CheckLookup: Send + Sync {
    /// Find the check registered under `namespace` and `name`
    fn lookup(&self, namespace: &str, name: &str) -> Option<Arc<dyn Check>>;
}

impl<F> CheckLookup for F
where
    F: Fn(&str, &str) -> Option<Arc<dyn Check>> + Send + Sync,
{
    fn lookup(&self, namespace: &str, name: &str) -> Option<Arc<dyn Check>> {
        self(namespace, name)
    }
}

/// In-memory registry of checks keyed by namespace and name
#[derive(Default, Clone)]
pub struct CheckRegistry {
    checks: HashMap<(String, String), Arc<dyn Check>>,
}

impl CheckRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check, replacing any previous one with the same key
    pub fn register(&mut self, namespace: &str, name: &str, check: Arc<dyn Check>) {
        debug!("Registering check: {}/{}", namespace, name);
        self.checks
            .insert((namespace.to_string(), name.to_string()), check);
    }

    /// Builder form of [`register`](Self::register)
    pub fn with(mut self, namespace: &str, name: &str, check: Arc<dyn Check>) -> Self {
        self.register(namespace, name, check);
        self
    }

    pub fn contains(&self, namespace: &str, name: &str) -> bool {
        self.checks
            .contains_key(&(namespace.to_string(), name.to_string()))
    }

    /// All registered checks as sorted `namespace/name` labels
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .checks
            .keys()
            .map(|(namespace, name)| format!("{}/{}", namespace, name))
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl CheckLookup for CheckRegistry {
    fn lookup(&self, namespace: &str, name: &str) -> Option<Arc<dyn Check>> {
        self.checks
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }
}

impl std::fmt::Debug for CheckRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckRegistry")
            .field("checks", &self.names())
            .finish()
    }
}
