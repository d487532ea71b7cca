// File: src/invocation.rs
// Purpose: One declared check bound to the shared lookup

use crate::check::{CheckOutcome, Params};
use crate::registry::CheckLookup;
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, trace};

/// A single `namespace.name(params)` declaration inside a chain.
///
/// The owning chain passes its value in when it runs the invocation.
#[derive(Clone)]
pub struct CheckInvocation {
    namespace: String,
    name: String,
    params: Params,
    lookup: Arc<dyn CheckLookup>,
}

impl CheckInvocation {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        params: Params,
        lookup: Arc<dyn CheckLookup>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            params,
            lookup,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// `namespace/name`, as used in logs
    pub fn label(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Resolve and run the check against `value`.
    ///
    /// A missing check is logged and reported as `Fail`, so the client sees the
    /// field's default message. Errors from the check itself are returned as-is.
    pub async fn run(&self, value: Option<&Value>) -> Result<CheckOutcome> {
        let Some(check) = self.lookup.lookup(&self.namespace, &self.name) else {
            error!("validator \"{}\" not found", self.label());
            return Ok(CheckOutcome::Fail);
        };

        trace!(check = %self.label(), params = ?self.params, "running check");
        check.check(value, &self.params).await
    }
}

impl std::fmt::Debug for CheckInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckInvocation")
            .field("namespace", &self.namespace)
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}
