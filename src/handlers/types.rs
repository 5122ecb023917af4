use axum::http::StatusCode;
use std::collections::BTreeMap;
use std::net::SocketAddr;

use crate::auth::Principal;

pub const TEXT_HTML: &str = "text/html;charset=utf-8";
pub const TEXT_PLAIN: &str = "text/plain;charset=utf-8";
pub const APPLICATION_JSON: &str = "application/json;charset=utf-8";

/// Query parameters; the first occurrence of a key wins.
pub type Params = BTreeMap<String, String>;

/// Everything a handler gets to see about one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_line: String,
    /// Path only, query string removed
    pub url: String,
    pub params: Params,
    pub origin: SocketAddr,
    pub principal: Principal,
}

impl RequestContext {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Whether `key` appears in the query at all, whatever its value.
    pub fn has_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }
}

/// Response under construction: status, ordered headers, body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebResponse {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Default for WebResponse {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}

impl WebResponse {
    pub fn new(status: StatusCode, content_type: &str, body: impl Into<String>) -> Self {
        let mut response = Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        };
        response.push_header("Content-Type", content_type);
        response
    }

    pub fn push_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// A response that set no headers at all is served as HTML.
    pub fn ensure_content_type(&mut self) {
        if self.headers.is_empty() {
            self.push_header("Content-Type", TEXT_HTML);
        }
    }
}
