//! Synchronous JSON-over-HTTP client helper.
//!
//! # Overview
//! Issues GET/POST/PUT/DELETE requests with JSON bodies and decodes JSON
//! responses into caller-chosen types, either through a reusable
//! `JsonClient` bound to a base URL or through free functions taking a full
//! URL.
//!
//! # Design
//! - `JsonClient` is immutable after construction; per-call headers are
//!   merged into a new map, so one handle can serve many threads.
//! - `Content-Type` and `Accept` are always `application/json`, whatever the
//!   caller passes.
//! - Requests are assembled as plain `HttpRequest` data first (`build_*`),
//!   then sent with ureq.
//! - Non-2xx responses are returned, not raised; only failures to build,
//!   send, or decode are errors.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
mod transport;

pub use client::{delete_json, get_json, post_json, put_json, JsonClient};
pub use config::{ClientConfig, DEFAULT_TIMEOUT};
pub use error::{Error, Result, FAILURE_STATUS};
pub use http::{
    build_url, encode_query, merge_headers, Headers, HttpMethod, HttpRequest, JsonResponse, Params,
};
