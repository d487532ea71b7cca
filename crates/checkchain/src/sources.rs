// File: src/sources.rs
// Purpose: The three value sources of a request (body, query string, path params)

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Where a field's value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSource {
    /// Parsed request body
    Body,

    /// Query parameters from URL (?key=value)
    Query,

    /// Path parameters from the matched route (/users/:id)
    Params,
}

impl std::fmt::Display for FieldSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldSource::Body => write!(f, "body"),
            FieldSource::Query => write!(f, "query"),
            FieldSource::Params => write!(f, "params"),
        }
    }
}

/// Already-parsed request data that field values are read from.
///
/// Every source defaults to an empty mapping.
#[derive(Debug, Clone, Default)]
pub struct RequestSources {
    body: Map<String, Value>,
    query: HashMap<String, String>,
    params: HashMap<String, String>,
}

impl RequestSources {
    /// Create with all sources empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body. Anything other than a JSON object is treated as an empty body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = match body {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    /// Set the body from form fields
    pub fn with_form(mut self, fields: HashMap<String, String>) -> Self {
        self.body = fields
            .into_iter()
            .map(|(key, value)| (key, Value::String(value)))
            .collect();
        self
    }

    pub fn with_query(mut self, query: HashMap<String, String>) -> Self {
        self.query = query;
        self
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Read a field from one source. `None` means the field is absent.
    pub fn get(&self, source: FieldSource, name: &str) -> Option<Value> {
        match source {
            FieldSource::Body => self.body.get(name).cloned(),
            FieldSource::Query => self.query.get(name).cloned().map(Value::String),
            FieldSource::Params => self.params.get(name).cloned().map(Value::String),
        }
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn query(&self) -> &HashMap<String, String> {
        &self.query
    }

    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }
}
