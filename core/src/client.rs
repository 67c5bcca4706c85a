//! Reusable JSON client handle and the free request functions.
//!
//! # Design
//! `JsonClient` holds a base URL, default headers, and a ureq agent built with
//! the configured timeout. All of it is read-only after construction; each
//! call merges headers into a fresh map. Every operation is split into a
//! `build_*` method that produces an `HttpRequest` without I/O and a
//! `*_json` method that builds, sends, and decodes in one go.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::http::{merge_headers, Headers, HttpMethod, HttpRequest, JsonResponse, Params};
use crate::transport;

/// Synchronous JSON client bound to one service.
///
/// Cheap to clone and safe to share between threads.
#[derive(Clone)]
pub struct JsonClient {
    base_url: String,
    default_headers: Headers,
    timeout: Duration,
    agent: ureq::Agent,
}

impl fmt::Debug for JsonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonClient")
            .field("base_url", &self.base_url)
            .field("default_headers", &self.default_headers.keys().collect::<Vec<_>>())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl JsonClient {
    /// Create a client for `base_url`. Paths passed to the request methods
    /// are appended to it verbatim.
    ///
    /// A zero `timeout` means requests never time out.
    pub fn new(base_url: &str, default_headers: Headers, timeout: Duration) -> Result<Self> {
        if base_url.is_empty() {
            return Err(Error::MissingBaseUrl);
        }
        Ok(Self {
            base_url: base_url.to_string(),
            default_headers,
            timeout,
            agent: transport::new_agent(timeout),
        })
    }

    /// Create a client from deserialized settings.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(
            &config.base_url,
            config.default_headers.clone(),
            config.timeout(),
        )
    }

    /// Base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers sent with every request unless overridden per call.
    pub fn default_headers(&self) -> &Headers {
        &self.default_headers
    }

    /// Global timeout applied to each round trip.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Assemble a GET for `path` without sending it.
    pub fn build_get(&self, path: &str, params: &Params, headers: &Headers) -> Result<HttpRequest> {
        self.build(HttpMethod::Get, path, params, headers, None)
    }

    /// Assemble a POST with `body` serialized as JSON, without sending it.
    pub fn build_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: &Headers,
    ) -> Result<HttpRequest> {
        self.build(HttpMethod::Post, path, &Params::new(), headers, Some(to_json(body)?))
    }

    /// Assemble a PUT with `body` serialized as JSON, without sending it.
    pub fn build_put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        headers: &Headers,
    ) -> Result<HttpRequest> {
        self.build(HttpMethod::Put, path, &Params::new(), headers, Some(to_json(body)?))
    }

    /// Assemble a DELETE for `path` without sending it.
    pub fn build_delete(&self, path: &str, params: &Params, headers: &Headers) -> Result<HttpRequest> {
        self.build(HttpMethod::Delete, path, params, headers, None)
    }

    /// GET `path` with `params` and decode the JSON response.
    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<JsonResponse<T>> {
        transport::execute(&self.agent, self.build_get(path, params, headers)?)
    }

    /// POST `body` to `path` and decode the JSON response.
    pub fn post_json<B, T>(&self, path: &str, body: &B, headers: &Headers) -> Result<JsonResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        transport::execute(&self.agent, self.build_post(path, body, headers)?)
    }

    /// PUT `body` to `path` and decode the JSON response.
    pub fn put_json<B, T>(&self, path: &str, body: &B, headers: &Headers) -> Result<JsonResponse<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        transport::execute(&self.agent, self.build_put(path, body, headers)?)
    }

    /// DELETE `path` with `params` and decode the JSON response.
    pub fn delete_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &Params,
        headers: &Headers,
    ) -> Result<JsonResponse<T>> {
        transport::execute(&self.agent, self.build_delete(path, params, headers)?)
    }

    fn build(
        &self,
        method: HttpMethod,
        path: &str,
        params: &Params,
        headers: &Headers,
        body: Option<String>,
    ) -> Result<HttpRequest> {
        let url = format!("{}{path}", self.base_url);
        let headers = merge_headers(&self.default_headers, headers);
        HttpRequest::new(method, &url, params, headers, body)
    }
}

fn to_json<B: Serialize + ?Sized>(body: &B) -> Result<String> {
    serde_json::to_string(body).map_err(Error::Serialize)
}

/// Caller headers with the JSON pair forced, for calls without a handle.
fn json_headers(headers: &Headers) -> Headers {
    merge_headers(&Headers::new(), headers)
}

/// GET `url` with `params` and decode the JSON response.
pub fn get_json<T: DeserializeOwned>(
    url: &str,
    params: &Params,
    headers: &Headers,
) -> Result<JsonResponse<T>> {
    let request = HttpRequest::new(HttpMethod::Get, url, params, json_headers(headers), None)?;
    transport::execute(transport::default_agent(), request)
}

/// POST `body` as JSON to `url` and decode the JSON response.
pub fn post_json<B, T>(url: &str, body: &B, headers: &Headers) -> Result<JsonResponse<T>>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = Some(to_json(body)?);
    let request = HttpRequest::new(HttpMethod::Post, url, &Params::new(), json_headers(headers), body)?;
    transport::execute(transport::default_agent(), request)
}

/// PUT `body` as JSON to `url` and decode the JSON response.
pub fn put_json<B, T>(url: &str, body: &B, headers: &Headers) -> Result<JsonResponse<T>>
where
    B: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let body = Some(to_json(body)?);
    let request = HttpRequest::new(HttpMethod::Put, url, &Params::new(), json_headers(headers), body)?;
    transport::execute(transport::default_agent(), request)
}

/// DELETE `url` with `params` and decode the JSON response.
pub fn delete_json<T: DeserializeOwned>(
    url: &str,
    params: &Params,
    headers: &Headers,
) -> Result<JsonResponse<T>> {
    let request = HttpRequest::new(HttpMethod::Delete, url, params, json_headers(headers), None)?;
    transport::execute(transport::default_agent(), request)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use serde::ser::Error as _;
    use serde_json::json;

    use super::*;
    use crate::http::{ACCEPT, APPLICATION_JSON, CONTENT_TYPE};

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn client() -> JsonClient {
        JsonClient::new(
            "http://localhost:3000",
            map(&[("X-Api-Key", "secret")]),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(S::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn empty_base_url_is_rejected() {
        let err = JsonClient::new("", Headers::new(), Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, Error::MissingBaseUrl));
        assert!(err.to_string().contains("base_url"));
    }

    #[test]
    fn from_config_carries_every_setting() {
        let mut config = ClientConfig::new("http://localhost:3000/api");
        config.default_headers = map(&[("X-Tenant", "acme")]);
        config.timeout_ms = 1500;
        let client = JsonClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.default_headers(), &map(&[("X-Tenant", "acme")]));
        assert_eq!(client.timeout(), Duration::from_millis(1500));
    }

    #[test]
    fn from_config_rejects_empty_base_url() {
        let err = JsonClient::from_config(&ClientConfig::new("")).unwrap_err();
        assert!(matches!(err, Error::MissingBaseUrl));
    }

    #[test]
    fn build_get_concatenates_path_and_encodes_query() {
        let req = client()
            .build_get("/search", &map(&[("q", "a b")]), &Headers::new())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/search?q=a%20b");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_get_sorts_params_by_key() {
        let req = client()
            .build_get("/search", &map(&[("z", "1"), ("a", "2")]), &Headers::new())
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/search?a=2&z=1");
    }

    #[test]
    fn build_delete_carries_query() {
        let req = client()
            .build_delete("/items/7", &map(&[("force", "true")]), &Headers::new())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.url, "http://localhost:3000/items/7?force=true");
    }

    #[test]
    fn build_post_serializes_body_without_query() {
        let req = client()
            .build_post("/items", &json!({"name": "widget"}), &Headers::new())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:3000/items");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, json!({"name": "widget"}));
    }

    #[test]
    fn build_put_serializes_body() {
        let req = client()
            .build_put("/items/7", &map(&[("name", "gadget")]), &Headers::new())
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"gadget"}"#));
    }

    #[test]
    fn unserializable_body_is_an_error() {
        let err = client()
            .build_post("/items", &Unserializable, &Headers::new())
            .unwrap_err();
        assert!(matches!(err, Error::Serialize(_)));
        assert_eq!(err.status_code(), -1);
    }

    #[test]
    fn defaults_present_and_json_headers_forced() {
        let overrides = map(&[("Content-Type", "text/xml"), ("X-Request-Id", "r1")]);
        let req = client().build_get("/", &Params::new(), &overrides).unwrap();
        assert_eq!(req.headers["X-Api-Key"], "secret");
        assert_eq!(req.headers["X-Request-Id"], "r1");
        assert_eq!(req.headers[CONTENT_TYPE], APPLICATION_JSON);
        assert_eq!(req.headers[ACCEPT], APPLICATION_JSON);
    }

    #[test]
    fn per_call_override_does_not_mutate_defaults() {
        let c = client();
        let req = c
            .build_get("/", &Params::new(), &map(&[("X-Api-Key", "other")]))
            .unwrap();
        assert_eq!(req.headers["X-Api-Key"], "other");
        assert_eq!(c.default_headers(), &map(&[("X-Api-Key", "secret")]));

        let next = c.build_get("/", &Params::new(), &Headers::new()).unwrap();
        assert_eq!(next.headers["X-Api-Key"], "secret");
    }

    #[test]
    fn empty_path_gets_root_slash_from_url_parser() {
        let req = client().build_get("", &Params::new(), &Headers::new()).unwrap();
        assert_eq!(req.url, "http://localhost:3000/");
    }

    #[test]
    fn dot_segments_in_path_are_resolved() {
        let req = client()
            .build_get("/a/../b", &Params::new(), &Headers::new())
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/b");
    }

    #[test]
    fn malformed_base_url_fails_at_build_time() {
        let c = JsonClient::new("not a url", Headers::new(), Duration::ZERO).unwrap();
        let err = c.build_get("/x", &Params::new(), &Headers::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn free_function_rejects_relative_url_without_network() {
        let err = get_json::<serde_json::Value>("/relative", &Params::new(), &Headers::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
    }

    #[test]
    fn client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JsonClient>();
    }
}
