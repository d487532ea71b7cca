// File: src/error.rs
// Purpose: Client-facing validation failures and the log-only faults behind them

use serde_json::Value;
use std::time::Duration;

/// HTTP status used for every validation failure
pub const BAD_REQUEST: u16 = 400;

/// Why a field was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCause {
    /// A check failed (or broke); the field's default message is reported
    Failed,

    /// A check rejected the value with its own message
    Rejected,
}

/// A client-safe validation failure.
///
/// `Display` renders only the message, which is either the field's default
/// message or a message a check chose to return.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationFailure {
    field: String,
    message: String,
    cause: FailureCause,
}

impl ValidationFailure {
    pub fn failed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            cause: FailureCause::Failed,
        }
    }

    pub fn rejected(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            cause: FailureCause::Rejected,
        }
    }

    /// Name of the field whose chain failed
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> FailureCause {
        self.cause
    }

    /// Status classification for the boundary (always "bad request")
    pub fn status(&self) -> u16 {
        BAD_REQUEST
    }
}

/// A dynamic check answered with something that is neither a boolean nor an error
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("check returned neither a boolean nor an error: {reply}")]
pub struct MalformedReply {
    reply: Value,
}

impl MalformedReply {
    pub fn new(reply: Value) -> Self {
        Self { reply }
    }

    pub fn reply(&self) -> &Value {
        &self.reply
    }
}

/// Internal failure while running one check.
///
/// Faults are only ever logged. The client sees the field's default message.
#[derive(thiserror::Error, Debug)]
pub enum CheckFault {
    #[error(transparent)]
    Misbehaved(#[from] MalformedReply),

    #[error("check returned an error: {0:#}")]
    Threw(anyhow::Error),

    #[error("check panicked: {0}")]
    Panicked(String),

    #[error("check timed out after {0:?}")]
    TimedOut(Duration),
}

impl CheckFault {
    /// Classify an error returned by a check
    pub fn from_error(err: anyhow::Error) -> Self {
        match err.downcast::<MalformedReply>() {
            Ok(malformed) => CheckFault::Misbehaved(malformed),
            Err(err) => CheckFault::Threw(err),
        }
    }

    /// Build from a caught panic payload
    pub fn from_panic(payload: Box<dyn std::any::Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic payload".to_string()
        };
        CheckFault::Panicked(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failure_displays_only_message() {
        let failure = ValidationFailure::failed("email", "invalid value for email");
        assert_eq!(failure.to_string(), "invalid value for email");
        assert_eq!(failure.field(), "email");
        assert_eq!(failure.cause(), FailureCause::Failed);
        assert_eq!(failure.status(), 400);

        let failure = ValidationFailure::rejected("email", "email already taken");
        assert_eq!(failure.to_string(), "email already taken");
        assert_eq!(failure.cause(), FailureCause::Rejected);
    }

    #[test]
    fn test_fault_classification() {
        let err = anyhow::Error::new(MalformedReply::new(json!(7)));
        assert!(matches!(CheckFault::from_error(err), CheckFault::Misbehaved(_)));

        let err = anyhow::anyhow!("connection refused");
        let fault = CheckFault::from_error(err);
        assert!(matches!(fault, CheckFault::Threw(_)));
        assert_eq!(fault.to_string(), "check returned an error: connection refused");
    }

    #[test]
    fn test_panic_payloads() {
        let fault = CheckFault::from_panic(Box::new("boom"));
        assert_eq!(fault.to_string(), "check panicked: boom");

        let fault = CheckFault::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(fault.to_string(), "check panicked: kaboom");

        let fault = CheckFault::from_panic(Box::new(42_u8));
        assert_eq!(fault.to_string(), "check panicked: unknown panic payload");
    }
}
