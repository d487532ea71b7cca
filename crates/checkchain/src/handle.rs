// File: src/handle.rs
// Purpose: Chainable declaration handle returned for each registered field

use crate::chain::FieldChain;
use crate::check::Params;

/// Declaration handle for one field's chain.
///
/// Namespaces are open-ended and registered elsewhere, so every declaration goes
/// through the generic [`check`](Self::check). [`ns`](Self::ns) and the
/// [`checks!`](crate::checks) macro are sugar over it.
///
/// ```rust
/// # use checkchain::{CheckRegistry, RequestSources, ValidationEngine};
/// # use serde_json::json;
/// let engine = ValidationEngine::new(CheckRegistry::new());
/// let mut session = engine.session(RequestSources::new());
///
/// session
///     .body("password")
///     .check("string", "required", ())
///     .ns("string")
///     .call_with("length", json!({ "min": 8 }));
/// ```
pub struct FieldHandle<'a> {
    chain: &'a mut FieldChain,
}

impl<'a> FieldHandle<'a> {
    pub fn new(chain: &'a mut FieldChain) -> Self {
        Self { chain }
    }

    /// Declare `namespace.name(params)` on this field
    pub fn check(self, namespace: &str, name: &str, params: impl Into<Params>) -> Self {
        self.chain.append(namespace, name, params);
        self
    }

    /// Start a declaration in `namespace`
    pub fn ns(self, namespace: &'a str) -> NamespaceCall<'a> {
        NamespaceCall {
            handle: self,
            namespace,
        }
    }

    /// Pass immediately when the value is absent
    pub fn optional(self) -> Self {
        self.chain.set_optional(true);
        self
    }

    /// Replace the field's default error message
    pub fn message(self, message: impl Into<String>) -> Self {
        self.chain.set_message(message);
        self
    }

    /// The chain being declared
    pub fn chain(&self) -> &FieldChain {
        self.chain
    }
}

/// A namespace picked on a [`FieldHandle`], waiting for the check name
pub struct NamespaceCall<'a> {
    handle: FieldHandle<'a>,
    namespace: &'a str,
}

impl<'a> NamespaceCall<'a> {
    /// Declare `namespace.name()` with no parameters
    pub fn call(self, name: &str) -> FieldHandle<'a> {
        self.call_with(name, ())
    }

    /// Declare `namespace.name(params)`
    pub fn call_with(self, name: &str, params: impl Into<Params>) -> FieldHandle<'a> {
        self.handle.check(self.namespace, name, params)
    }
}

/// Declare checks with method-call syntax.
///
/// Each `namespace.name(args...)` becomes one declaration: the member name is the
/// namespace, the method name is the check, and every argument (one token tree in
/// JSON syntax, parenthesize anything longer) becomes a positional parameter.
///
/// ```rust
/// # use checkchain::{checks, CheckRegistry, RequestSources, ValidationEngine};
/// let engine = ValidationEngine::new(CheckRegistry::new());
/// let mut session = engine.session(RequestSources::new());
///
/// checks!(
///     session.body("username").message("pick a username"),
///     string.required(),
///     string.length({ "min": 3, "max": 20 }),
///     account.unique("users", (-1)),
/// );
/// assert_eq!(session.len(), 1);
/// ```
#[macro_export]
macro_rules! checks {
    ($handle:expr $(, $ns:ident . $name:ident ( $($arg:tt),* $(,)? ))* $(,)?) => {{
        let handle = $handle;
        $(
            let handle = handle.check(
                stringify!($ns),
                stringify!($name),
                $crate::Params::from_args(vec![$($crate::serde_json::json!($arg)),*]),
            );
        )*
        handle
    }};
}
