//! Executes an `HttpRequest` over the network with ureq.

use std::sync::LazyLock;
use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::config::DEFAULT_TIMEOUT;
use crate::error::{Error, Result};
use crate::http::{Headers, HttpMethod, HttpRequest, JsonResponse};

/// Shared agent for the free request functions.
static DEFAULT_AGENT: LazyLock<ureq::Agent> = LazyLock::new(|| new_agent(DEFAULT_TIMEOUT));

pub(crate) fn default_agent() -> &'static ureq::Agent {
    &DEFAULT_AGENT
}

/// Build an agent whose global timeout covers the whole round trip.
///
/// 4xx/5xx responses come back as data so their bodies can still be decoded.
pub(crate) fn new_agent(timeout: Duration) -> ureq::Agent {
    let timeout = (!timeout.is_zero()).then_some(timeout);
    ureq::Agent::config_builder()
        .timeout_global(timeout)
        .http_status_as_error(false)
        .build()
        .new_agent()
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, headers: &Headers) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Send `request` and decode the response body as JSON into `T`.
pub(crate) fn execute<T: DeserializeOwned>(
    agent: &ureq::Agent,
    request: HttpRequest,
) -> Result<JsonResponse<T>> {
    let HttpRequest {
        method,
        url,
        headers,
        body,
    } = request;
    debug!("{method} {url}");

    let sent = match method {
        HttpMethod::Get => with_headers(agent.get(url.as_str()), &headers).call(),
        HttpMethod::Delete => with_headers(agent.delete(url.as_str()), &headers).call(),
        HttpMethod::Post => send(with_headers(agent.post(url.as_str()), &headers), body),
        HttpMethod::Put => send(with_headers(agent.put(url.as_str()), &headers), body),
    };
    let mut response = sent.map_err(|e| transport_failure(method, &url, e))?;

    let status = response.status().as_u16();
    debug!("{method} {url} -> {status}");

    let bytes = response
        .body_mut()
        .read_to_vec()
        .map_err(|e| transport_failure(method, &url, e))?;
    let body = serde_json::from_slice(&bytes).map_err(|error| Error::Decode { status, error })?;
    Ok(JsonResponse { status, body })
}

fn send(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: Option<String>,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        Some(body) => builder.send(body.as_bytes()),
        None => builder.send_empty(),
    }
}

fn transport_failure(method: HttpMethod, url: &str, err: ureq::Error) -> Error {
    let err = match Error::from(err) {
        Error::InvalidUrl { reason, .. } => Error::InvalidUrl {
            url: url.to_string(),
            reason,
        },
        other => other,
    };
    if err.is_transport() {
        warn!("{method} {url} failed: {err}");
    }
    err
}
