use std::{collections::BTreeMap, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, Query},
    http::{HeaderMap, Method, StatusCode, Uri},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_millis(1500);

/// Everything the server saw about a request, sent back as the response body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub raw_query: Option<String>,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/echo/{*rest}", any(echo))
        .route("/status/{code}", any(status))
        .route("/text", get(text))
        .route("/slow", get(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Echo>, StatusCode> {
    let body = if body.is_empty() {
        None
    } else {
        Some(serde_json::from_slice(&body).map_err(|_| StatusCode::BAD_REQUEST)?)
    };
    let headers = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect();
    Ok(Json(Echo {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        raw_query: uri.query().map(str::to_string),
        query,
        headers,
        body,
    }))
}

async fn status(Path(code): Path<u16>) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "status": status.as_u16() })))
}

async fn text() -> &'static str {
    "plain text, not json"
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(json!({ "slow": true }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn echo_serializes_missing_body_as_null() {
        let echo = Echo {
            method: "GET".to_string(),
            path: "/echo".to_string(),
            raw_query: None,
            query: BTreeMap::new(),
            headers: BTreeMap::new(),
            body: None,
        };
        let json = serde_json::to_value(&echo).unwrap();
        assert_eq!(json["method"], "GET");
        assert!(json["body"].is_null());
        assert!(json["raw_query"].is_null());
    }

    #[test]
    fn echo_deserializes_from_wire_shape() {
        let echo: Echo = serde_json::from_str(
            r#"{"method":"POST","path":"/echo/a","raw_query":"q=1","query":{"q":"1"},"headers":{"accept":"application/json"},"body":{"k":"v"}}"#,
        )
        .unwrap();
        assert_eq!(echo.path, "/echo/a");
        assert_eq!(echo.query["q"], "1");
        assert_eq!(echo.body, Some(json!({"k": "v"})));
    }
}
