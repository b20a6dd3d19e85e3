//! Logical REST calls
//!
//! A [`LogicalCall`] describes a REST operation before it is turned into a
//! concrete HTTP request: relative path, verb, ordered query parameters and
//! an optional JSON body. It is built once and then only read.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP verbs used against the DreamFactory REST API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

crate::impl_wire_name_conversions!(HttpMethod {
    Get => "GET",
    Post => "POST",
    Put => "PUT",
    Patch => "PATCH",
    Delete => "DELETE",
});

/// An abstract REST operation
///
/// Query parameters keep the order in which the caller added them; the
/// request builder never re-sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalCall {
    relative_path: String,
    method: HttpMethod,
    query_params: Vec<(String, String)>,
    body: Option<Value>,
}

impl LogicalCall {
    pub fn new(method: HttpMethod, relative_path: impl Into<String>) -> Self {
        Self { relative_path: relative_path.into(), method, query_params: Vec::new(), body: None }
    }

    pub fn get(relative_path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, relative_path)
    }

    pub fn post(relative_path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, relative_path)
    }

    pub fn patch(relative_path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, relative_path)
    }

    pub fn delete(relative_path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, relative_path)
    }

    /// Append one query parameter after any already present
    #[must_use]
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Append query parameters in iteration order
    #[must_use]
    pub fn with_query_params<K, V>(mut self, params: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query_params.extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub const fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }
}
