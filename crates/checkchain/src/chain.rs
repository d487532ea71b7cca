// File: src/chain.rs
// Purpose: Ordered checks for one field and the executor that resolves them

use crate::check::{CheckOutcome, Params};
use crate::error::{CheckFault, ValidationFailure};
use crate::invocation::CheckInvocation;
use crate::registry::CheckLookup;
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// All checks declared for one field within one request.
///
/// Checks run in declaration order and every one must pass. Evaluation stops at
/// the first check that fails, rejects or breaks.
pub struct FieldChain {
    field: String,
    value: Option<Value>,
    default_message: String,
    checks: Vec<CheckInvocation>,
    optional: bool,
    lookup: Arc<dyn CheckLookup>,
    timeout: Option<Duration>,
}

impl FieldChain {
    /// Create an empty chain.
    ///
    /// `default_message` is what the client sees for every failure that does not
    /// carry its own message.
    pub fn new(
        field: impl Into<String>,
        value: Option<Value>,
        default_message: impl Into<String>,
        lookup: Arc<dyn CheckLookup>,
    ) -> Self {
        Self {
            field: field.into(),
            value,
            default_message: default_message.into(),
            checks: Vec::new(),
            optional: false,
            lookup,
            timeout: None,
        }
    }

    /// Bound every check in this chain by `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Append one check declaration
    pub fn append(
        &mut self,
        namespace: impl Into<String>,
        name: impl Into<String>,
        params: impl Into<Params>,
    ) -> &mut Self {
        let invocation =
            CheckInvocation::new(namespace, name, params.into(), Arc::clone(&self.lookup));
        self.checks.push(invocation);
        self
    }

    /// Skip the whole chain when the value is absent
    pub fn set_optional(&mut self, optional: bool) -> &mut Self {
        self.optional = optional;
        self
    }

    /// Replace the default message; an empty message is ignored
    pub fn set_message(&mut self, message: impl Into<String>) -> &mut Self {
        let message = message.into();
        if !message.is_empty() {
            self.default_message = message;
        }
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn default_message(&self) -> &str {
        &self.default_message
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Declared checks as `namespace/name` labels, in evaluation order
    pub fn labels(&self) -> Vec<String> {
        self.checks.iter().map(CheckInvocation::label).collect()
    }

    /// Run the chain.
    ///
    /// Resolves to `Ok(())` only if every declared check passes. A rejection
    /// surfaces its own message; every other failure surfaces the default message.
    pub async fn execute(&self) -> Result<(), ValidationFailure> {
        if self.optional && is_absent(self.value.as_ref()) {
            debug!(field = %self.field, "optional field absent, skipping checks");
            return Ok(());
        }

        for invocation in &self.checks {
            let label = invocation.label();

            match self.attempt(invocation).await {
                Ok(CheckOutcome::Pass) => {
                    debug!(field = %self.field, "validating => {}, PASS", label);
                }
                Ok(CheckOutcome::Fail) => {
                    debug!(field = %self.field, "validating => {}, BLOCKED", label);
                    return Err(self.failed());
                }
                Ok(CheckOutcome::Reject(message)) => {
                    debug!(field = %self.field, "validating => {}, BLOCKED", label);
                    return Err(ValidationFailure::rejected(&self.field, message));
                }
                Err(fault @ CheckFault::Misbehaved(_)) => {
                    warn!(field = %self.field, err = %fault, "validating => {}, BLOCKED", label);
                    return Err(self.failed());
                }
                Err(fault) => {
                    debug!(field = %self.field, err = %fault, "validating => {}, BLOCKED", label);
                    return Err(self.failed());
                }
            }
        }

        Ok(())
    }

    /// Run one invocation, turning errors, panics and timeouts into faults
    async fn attempt(&self, invocation: &CheckInvocation) -> Result<CheckOutcome, CheckFault> {
        let run = AssertUnwindSafe(invocation.run(self.value.as_ref())).catch_unwind();

        let caught = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, run)
                .await
                .map_err(|_| CheckFault::TimedOut(limit))?,
            None => run.await,
        };

        match caught {
            Ok(Ok(outcome)) => Ok(outcome),
            Ok(Err(err)) => Err(CheckFault::from_error(err)),
            Err(payload) => Err(CheckFault::from_panic(payload)),
        }
    }

    fn failed(&self) -> ValidationFailure {
        ValidationFailure::failed(&self.field, &self.default_message)
    }
}

impl std::fmt::Debug for FieldChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldChain")
            .field("field", &self.field)
            .field("checks", &self.labels())
            .field("optional", &self.optional)
            .finish()
    }
}

/// Absent means missing, `null`, or an empty string
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}
