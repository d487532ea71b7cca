// File: src/check.rs
// Purpose: The pluggable check contract, its parameters, outcomes and closure adapters

use crate::error::MalformedReply;
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;

/// A single validation rule, registered under a `(namespace, name)` pair.
///
/// Checks may suspend (database lookups, remote calls). Returning `Err` means the
/// check itself broke; the chain logs the detail and answers the client with the
/// field's default message.
#[async_trait]
pub trait Check: Send + Sync {
    /// Decide whether `value` satisfies this rule.
    ///
    /// `value` is `None` when the field was absent from its source.
    async fn check(&self, value: Option<&Value>, params: &Params) -> Result<CheckOutcome>;
}

/// Outcome of one check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Value satisfies the rule
    Pass,

    /// Value does not satisfy the rule; the chain reports its default message
    Fail,

    /// Value does not satisfy the rule; this message is sent to the client verbatim
    Reject(String),
}

impl CheckOutcome {
    /// Reject with an explicit client-facing message
    pub fn reject(message: impl Into<String>) -> Self {
        CheckOutcome::Reject(message.into())
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CheckOutcome::Pass)
    }

    /// Normalize a raw JSON reply from a dynamic check.
    ///
    /// `true` passes, `false` fails, `{"error": "..."}` rejects with that message.
    /// Anything else is malformed.
    pub fn from_reply(reply: Value) -> std::result::Result<Self, MalformedReply> {
        match reply {
            Value::Bool(true) => Ok(CheckOutcome::Pass),
            Value::Bool(false) => Ok(CheckOutcome::Fail),
            Value::Object(ref map) => match map.get("error") {
                Some(Value::String(message)) => Ok(CheckOutcome::Reject(message.clone())),
                _ => Err(MalformedReply::new(reply)),
            },
            other => Err(MalformedReply::new(other)),
        }
    }
}

impl From<bool> for CheckOutcome {
    fn from(passed: bool) -> Self {
        if passed {
            CheckOutcome::Pass
        } else {
            CheckOutcome::Fail
        }
    }
}

/// Positional arguments given to a check after its name.
///
/// `string.length({"min": 3})` produces a single object argument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    args: Vec<Value>,
}

impl Params {
    /// No arguments
    pub fn none() -> Self {
        Self::default()
    }

    /// Create from positional arguments
    pub fn from_args(args: Vec<Value>) -> Self {
        Self { args }
    }

    /// Get an argument by position
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.args.get(index)
    }

    pub fn first(&self) -> Option<&Value> {
        self.args.first()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Deserialize an argument into a concrete type
    pub fn arg<T: DeserializeOwned>(&self, index: usize) -> Result<T> {
        let raw = self
            .args
            .get(index)
            .with_context(|| format!("missing check argument #{}", index))?;
        serde_json::from_value(raw.clone())
            .with_context(|| format!("invalid check argument #{}: {}", index, raw))
    }

    /// Look up a named option in the first argument, when it is an object
    pub fn option(&self, key: &str) -> Option<&Value> {
        self.first()?.as_object()?.get(key)
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.args
    }
}

impl From<()> for Params {
    fn from(_: ()) -> Self {
        Self::none()
    }
}

impl From<Value> for Params {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::none(),
            other => Self { args: vec![other] },
        }
    }
}

impl From<Vec<Value>> for Params {
    fn from(args: Vec<Value>) -> Self {
        Self { args }
    }
}

// ════════════════════════════════════════════════════════════
// Closure adapters
// ════════════════════════════════════════════════════════════

/// Check backed by an async closure taking owned copies of the value and params
pub struct FnCheck<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> Check for FnCheck<F>
where
    F: Fn(Option<Value>, Params) -> Fut + Send + Sync,
    Fut: Future<Output = Result<CheckOutcome>> + Send,
{
    async fn check(&self, value: Option<&Value>, params: &Params) -> Result<CheckOutcome> {
        (self.f)(value.cloned(), params.clone()).await
    }
}

/// Wrap an async closure as a check
pub fn check_fn<F, Fut>(f: F) -> Arc<dyn Check>
where
    F: Fn(Option<Value>, Params) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<CheckOutcome>> + Send + 'static,
{
    Arc::new(FnCheck { f })
}

/// Check backed by a synchronous closure
pub struct SyncCheck<F> {
    f: F,
}

#[async_trait]
impl<F> Check for SyncCheck<F>
where
    F: Fn(Option<&Value>, &Params) -> Result<CheckOutcome> + Send + Sync,
{
    async fn check(&self, value: Option<&Value>, params: &Params) -> Result<CheckOutcome> {
        (self.f)(value, params)
    }
}

/// Wrap a synchronous closure as a check
pub fn sync_check<F>(f: F) -> Arc<dyn Check>
where
    F: Fn(Option<&Value>, &Params) -> Result<CheckOutcome> + Send + Sync + 'static,
{
    Arc::new(SyncCheck { f })
}

/// Wrap a boolean predicate as a check
pub fn predicate<F>(f: F) -> Arc<dyn Check>
where
    F: Fn(Option<&Value>, &Params) -> bool + Send + Sync + 'static,
{
    sync_check(move |value, params| Ok(CheckOutcome::from(f(value, params))))
}

/// Check whose closure answers with a raw JSON reply.
///
/// Useful for checks bridged from scripts or remote services, where the reply
/// shape is not enforced by the type system. See [`CheckOutcome::from_reply`].
pub struct ReplyCheck<F> {
    f: F,
}

#[async_trait]
impl<F> Check for ReplyCheck<F>
where
    F: Fn(Option<&Value>, &Params) -> Value + Send + Sync,
{
    async fn check(&self, value: Option<&Value>, params: &Params) -> Result<CheckOutcome> {
        let reply = (self.f)(value, params);
        Ok(CheckOutcome::from_reply(reply)?)
    }
}

/// Wrap a raw-reply closure as a check
pub fn reply_check<F>(f: F) -> Arc<dyn Check>
where
    F: Fn(Option<&Value>, &Params) -> Value + Send + Sync + 'static,
{
    Arc::new(ReplyCheck { f })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_normalization() {
        assert_eq!(CheckOutcome::from_reply(json!(true)).unwrap(), CheckOutcome::Pass);
        assert_eq!(CheckOutcome::from_reply(json!(false)).unwrap(), CheckOutcome::Fail);
        assert_eq!(
            CheckOutcome::from_reply(json!({ "error": "too short" })).unwrap(),
            CheckOutcome::reject("too short")
        );
    }

    #[test]
    fn test_malformed_replies() {
        for reply in [json!(1), json!("yes"), json!(null), json!([true]), json!({ "ok": true })] {
            let err = CheckOutcome::from_reply(reply.clone()).unwrap_err();
            assert_eq!(err.reply(), &reply);
        }
    }

    #[test]
    fn test_params_conversions() {
        assert!(Params::from(()).is_empty());
        assert!(Params::from(Value::Null).is_empty());

        let params = Params::from(json!({ "min": 3 }));
        assert_eq!(params.len(), 1);
        assert_eq!(params.option("min"), Some(&json!(3)));
        assert_eq!(params.option("max"), None);

        let params = Params::from(vec![json!(1), json!("two")]);
        assert_eq!(params.get(1), Some(&json!("two")));
    }

    #[test]
    fn test_params_typed_args() {
        let params = Params::from_args(vec![json!(5), json!("x")]);
        assert_eq!(params.arg::<u32>(0).unwrap(), 5);
        assert!(params.arg::<u32>(1).is_err());
        assert!(params.arg::<u32>(2).is_err());
    }

    #[tokio::test]
    async fn test_closure_adapters() {
        let value = json!("abc");

        let check = predicate(|v, _| v.is_some());
        assert_eq!(check.check(Some(&value), &Params::none()).await.unwrap(), CheckOutcome::Pass);
        assert_eq!(check.check(None, &Params::none()).await.unwrap(), CheckOutcome::Fail);

        let check = check_fn(|v, _| async move {
            Ok(CheckOutcome::from(v == Some(json!("abc"))))
        });
        assert!(check.check(Some(&value), &Params::none()).await.unwrap().is_pass());

        let check = reply_check(|_, _| json!(42));
        let err = check.check(Some(&value), &Params::none()).await.unwrap_err();
        assert!(err.downcast_ref::<MalformedReply>().is_some());
    }
}
