//! # checkchain - per-field validation chains
//!
//! Request handlers declare, per incoming field, an ordered list of named checks
//! (`namespace.name(params)`). Checks live in a pluggable registry, so the engine
//! never needs to know them in advance. A session collects every chain declared
//! while handling one request and resolves them to a single pass/fail decision.
//!
//! ## Features
//!
//! - **Pluggable checks**: any `(namespace, name)` pair resolved through [`CheckLookup`]
//! - **Short-circuit chains**: all checks must pass, evaluation stops at the first failure
//! - **Masked failures**: panics, errors, malformed replies and missing checks never
//!   reach the client; only the default message or an explicit rejection does
//! - **Optional fields**: absent values skip their chain entirely
//!
//! ## Example
//!
//! ```rust
//! use checkchain::{checks, predicate, CheckRegistry, RequestSources, ValidationEngine};
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = CheckRegistry::new().with(
//!         "string",
//!         "required",
//!         predicate(|value, _| value.and_then(|v| v.as_str()).is_some_and(|s| !s.is_empty())),
//!     );
//!     let engine = ValidationEngine::new(registry);
//!
//!     let sources = RequestSources::new().with_body(json!({ "name": "" }));
//!     let mut session = engine.session(sources);
//!     checks!(session.body("name"), string.required());
//!
//!     let failure = session.validate_all().await.unwrap_err();
//!     assert_eq!(failure.to_string(), "invalid value for name");
//! }
//! ```

pub mod chain;
pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod handle;
pub mod invocation;
pub mod registry;
pub mod session;
pub mod sources;

pub use chain::FieldChain;
pub use check::{
    check_fn, predicate, reply_check, sync_check, Check, CheckOutcome, Params, ReplyCheck,
};
pub use config::ValidationConfig;
pub use engine::ValidationEngine;
pub use error::{CheckFault, FailureCause, MalformedReply, ValidationFailure};
pub use handle::{FieldHandle, NamespaceCall};
pub use invocation::CheckInvocation;
pub use registry::{CheckLookup, CheckRegistry};
pub use session::{SessionState, ValidationSession};
pub use sources::{FieldSource, RequestSources};

// Used by the `checks!` macro
#[doc(hidden)]
pub use serde_json;
