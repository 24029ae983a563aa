//! HTTP proxy integration processor (`httpProxy`).
//!
//! Claims API-gateway style proxy events, i.e. events carrying both an
//! `httpMethod` and a `path`. Requests are matched against the configured
//! routes and answered with a proxy response object.
//!
//! # Configuration
//!
//! ```json
//! {
//!   "basePath": "/api",
//!   "cors": true,
//!   "routes": [
//!     { "method": "GET", "path": "/users/:id", "action": "getUser" }
//!   ],
//!   "errorMapping": { "NotFound": 404 }
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use switchyard_core::{Event, EventProcessor, InvocationContext, Outcome, ProcessorError};
use tracing::debug;

use crate::action::ActionTable;
use crate::slice::parse_slice;

/// Configuration key of this processor.
pub const KEY: &str = "httpProxy";

const ALLOW_METHODS: &str = "GET,POST,PUT,PATCH,DELETE,OPTIONS";
const ALLOW_HEADERS: &str = "Origin, X-Requested-With, Content-Type, Accept, Authorization";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HttpProxyConfig {
    #[serde(default)]
    base_path: Option<String>,
    #[serde(default)]
    cors: bool,
    #[serde(default)]
    routes: Vec<HttpRoute>,
    #[serde(default)]
    error_mapping: HashMap<String, u16>,
}

#[derive(Debug, Deserialize)]
struct HttpRoute {
    method: String,
    path: String,
    action: String,
}

impl HttpRoute {
    fn accepts(&self, method: &str) -> bool {
        self.method == "*" || self.method.eq_ignore_ascii_case(method)
    }
}

/// Processor for HTTP proxy events.
#[derive(Debug, Clone)]
pub struct HttpProxyProcessor {
    actions: ActionTable,
}

impl HttpProxyProcessor {
    /// Creates the processor over the given action table.
    pub fn new(actions: ActionTable) -> Self {
        Self { actions }
    }

    async fn handle(
        &self,
        config: &HttpProxyConfig,
        method: &str,
        path: &str,
        event: &Event,
        ctx: &InvocationContext,
    ) -> Result<Value, ProcessorError> {
        if config.cors && method.eq_ignore_ascii_case("OPTIONS") {
            return Ok(response(200, Value::String(String::new()), config.cors));
        }

        let path = strip_base_path(path, config.base_path.as_deref());
        let matched = config.routes.iter().find_map(|route| {
            if !route.accepts(method) {
                return None;
            }
            match_path(&route.path, &path).map(|params| (route, params))
        });

        let Some((route, params)) = matched else {
            debug!(method, path = %path, "No HTTP route matched");
            return Ok(error_response(
                404,
                &format!("Could not find route for {method} {path}"),
                "RouteNotFound",
                config.cors,
            ));
        };

        let request = match build_request(event, params) {
            Ok(request) => request,
            Err(message) => {
                return Ok(error_response(400, &message, "MalformedBody", config.cors));
            }
        };

        match self.actions.invoke(&route.action, request, ctx).await {
            Ok(result) => Ok(into_response(result, config.cors)),
            Err(err) => {
                let mapped = err.name().and_then(|name| config.error_mapping.get(name));
                match mapped {
                    Some(&status) => Ok(error_response(
                        status,
                        err.message(),
                        err.name().unwrap_or_default(),
                        config.cors,
                    )),
                    None => Err(err),
                }
            }
        }
    }
}

#[async_trait]
impl EventProcessor for HttpProxyProcessor {
    async fn process(&self, config: &Value, event: &Event, ctx: &InvocationContext) -> Outcome {
        let (Some(method), Some(path)) = (
            event.get("httpMethod").and_then(Value::as_str),
            event.get("path").and_then(Value::as_str),
        ) else {
            return Outcome::Skipped;
        };

        let config: HttpProxyConfig = match parse_slice(KEY, config) {
            Ok(config) => config,
            Err(err) => return Outcome::Failed(err),
        };

        self.handle(&config, method, path, event, ctx).await.into()
    }
}

/// Removes the configured base path prefix and normalises slashes.
fn strip_base_path(path: &str, base_path: Option<&str>) -> String {
    let base = base_path.unwrap_or("").trim_end_matches('/');
    // Only strip at a segment boundary: "/api" must not eat "/apiary".
    let rest = match path.strip_prefix(base) {
        Some(rest) if !base.is_empty() && (rest.is_empty() || rest.starts_with('/')) => rest,
        _ => path,
    };

    let trimmed = rest.trim_matches('/');
    format!("/{trimmed}")
}

/// Matches a request path against a route template with `:name` segments.
fn match_path(template: &str, path: &str) -> Option<Map<String, Value>> {
    let template: Vec<&str> = template.trim_matches('/').split('/').collect();
    let actual: Vec<&str> = path.trim_matches('/').split('/').collect();

    if template.len() != actual.len() {
        return None;
    }

    let mut params = Map::new();
    for (expected, segment) in template.iter().zip(&actual) {
        if let Some(name) = expected.strip_prefix(':') {
            if segment.is_empty() {
                return None;
            }
            params.insert(name.to_string(), Value::String(segment.to_string()));
        } else if expected != segment {
            return None;
        }
    }
    Some(params)
}

/// Builds the action payload: the proxy event plus extracted path params,
/// with a JSON body decoded when the request declares it.
fn build_request(event: &Event, params: Map<String, Value>) -> Result<Value, String> {
    let mut request = match event.to_value() {
        Value::Object(map) => map,
        _ => Map::new(),
    };

    if is_json_request(&request)
        && let Some(Value::String(body)) = request.get("body")
        && !body.is_empty()
    {
        let parsed: Value = serde_json::from_str(body)
            .map_err(|e| format!("Request body is not valid JSON: {e}"))?;
        request.insert("body".to_string(), parsed);
    }

    request.insert("paths".to_string(), Value::Object(params));
    Ok(Value::Object(request))
}

fn is_json_request(request: &Map<String, Value>) -> bool {
    request
        .get("headers")
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .any(|(name, value)| {
            name.eq_ignore_ascii_case("content-type")
                && value
                    .as_str()
                    .is_some_and(|v| v.contains("application/json"))
        })
}

fn cors_headers(headers: &mut Map<String, Value>) {
    headers.insert("Access-Control-Allow-Origin".into(), json!("*"));
    headers.insert("Access-Control-Allow-Methods".into(), json!(ALLOW_METHODS));
    headers.insert("Access-Control-Allow-Headers".into(), json!(ALLOW_HEADERS));
}

fn response(status: u16, body: Value, cors: bool) -> Value {
    let mut headers = Map::new();
    headers.insert("Content-Type".into(), json!("application/json"));
    if cors {
        cors_headers(&mut headers);
    }
    json!({
        "statusCode": status,
        "headers": headers,
        "body": body,
    })
}

fn error_response(status: u16, message: &str, error: &str, cors: bool) -> Value {
    let body = json!({ "message": message, "error": error }).to_string();
    response(status, Value::String(body), cors)
}

/// Turns an action result into a proxy response.
///
/// Results that already look like a response (an object with `statusCode`)
/// pass through; anything else becomes a 200 JSON body. A null result
/// answers 204.
fn into_response(result: Value, cors: bool) -> Value {
    match result {
        Value::Object(mut map) if map.contains_key("statusCode") => {
            if cors {
                let headers = map
                    .entry("headers")
                    .or_insert_with(|| Value::Object(Map::new()));
                if let Value::Object(headers) = headers {
                    cors_headers(headers);
                }
            }
            Value::Object(map)
        }
        Value::Null => response(204, Value::String(String::new()), cors),
        other => response(200, Value::String(other.to_string()), cors),
    }
}
