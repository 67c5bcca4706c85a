//! HTTP request types and the pure functions that assemble them.
//!
//! # Design
//! A request is described as plain data before anything touches the network.
//! URL composition, query encoding, and header merging are free functions
//! that take shared maps by reference and return new values, so a
//! `JsonClient` can be shared across threads without locking.

use std::collections::BTreeMap;
use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// Header name → value.
pub type Headers = BTreeMap<String, String>;

/// Query parameter name → value.
pub type Params = BTreeMap<String, String>;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const ACCEPT: &str = "Accept";
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    /// Uppercase method name as sent on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully assembled request: absolute URL with query, final headers, and
/// the serialized JSON body for POST/PUT.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Assemble a request for `url`, appending `params`.
    ///
    /// `headers` are sent as given; produce them with `merge_headers`.
    pub fn new(
        method: HttpMethod,
        url: &str,
        params: &Params,
        headers: Headers,
        body: Option<String>,
    ) -> Result<Self> {
        Ok(Self {
            method,
            url: build_url(url, params)?,
            headers,
            body,
        })
    }
}

/// A decoded JSON response and the status it arrived with.
///
/// Non-2xx statuses are not errors; check `is_success` if it matters.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonResponse<T> {
    pub status: u16,
    pub body: T,
}

impl<T> JsonResponse<T> {
    /// True for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Merge `defaults` with `overrides` into a new map, then force
/// `Content-Type` and `Accept` to `application/json`.
///
/// Names match case-insensitively; the later entry wins and keeps its own
/// spelling.
pub fn merge_headers(defaults: &Headers, overrides: &Headers) -> Headers {
    let mut merged = Headers::new();
    let forced = [(CONTENT_TYPE, APPLICATION_JSON), (ACCEPT, APPLICATION_JSON)];
    let entries = defaults
        .iter()
        .chain(overrides.iter())
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .chain(forced);
    for (name, value) in entries {
        merged.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        merged.insert(name.to_string(), value.to_string());
    }
    merged
}

/// Percent-encode `params` as `k=v` pairs joined by `&`, in key order.
pub fn encode_query(params: &Params) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Validate `url` as an absolute http(s) URL and append `params` to its
/// query string.
pub fn build_url(url: &str, params: &Params) -> Result<String> {
    let invalid = |reason: String| Error::InvalidUrl {
        url: url.to_string(),
        reason,
    };
    let mut parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", parsed.scheme())));
    }
    if !params.is_empty() {
        let encoded = encode_query(params);
        let query = match parsed.query() {
            Some(existing) if !existing.is_empty() => format!("{existing}&{encoded}"),
            _ => encoded,
        };
        parsed.set_query(Some(&query));
    }
    Ok(parsed.into())
}
