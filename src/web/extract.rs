//! Request-context extraction
//!
//! Builds the explicit [`RequestContext`] from an HTTP request: the query
//! string, the body (form or JSON, routed to the body/put/delete source
//! according to the method), cookies, and the derived merged map. Sources a
//! transport-agnostic filter cannot observe (session, server variables,
//! process environment, uploaded files) are supplied explicitly by the host
//! through a [`SourceOverlay`] request extension; nothing is read from
//! ambient process state.

use axum::http::header::{CONTENT_TYPE, COOKIE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use serde_json::Value;
use url::form_urlencoded;

use crate::core::context::{ParamMap, RequestContext};
use crate::core::source::ParamSource;

/// Current action identifier, set by the host as a request extension
///
/// When absent, the adapter falls back to the last non-empty path segment,
/// or `"index"` for the root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionId(pub String);

/// Host-supplied dictionaries for sources not derivable from the wire
///
/// Insert as a request extension from middleware that owns the respective
/// state (session store, etc.). Empty maps behave exactly like absent ones.
#[derive(Debug, Clone, Default)]
pub struct SourceOverlay {
    pub session: ParamMap,
    pub server: ParamMap,
    pub env: ParamMap,
    pub files: ParamMap,
}

/// Host-supplied merged parameter map, overriding the default query+body merge
///
/// This is the map the gate validates; set it when the host binds action
/// parameters through its own merge logic.
#[derive(Debug, Clone, Default)]
pub struct SubmittedParams(pub ParamMap);

/// Parse a query string or urlencoded body into a parameter map
///
/// Values are percent-decoded and kept as strings; a repeated key keeps the
/// last occurrence.
pub fn parse_urlencoded(input: &str) -> ParamMap {
    form_urlencoded::parse(input.as_bytes())
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect()
}

/// Parse `Cookie` headers into a parameter map
pub fn parse_cookies(headers: &HeaderMap) -> ParamMap {
    let mut cookies = ParamMap::new();
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else {
            continue;
        };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.split_once('=') {
                cookies.insert(
                    name.trim().to_string(),
                    Value::String(value.trim().to_string()),
                );
            }
        }
    }
    cookies
}

/// Parse a request body into a parameter map
///
/// A JSON body contributes its top-level object keys with their typed
/// values; an urlencoded form body contributes string values. Anything else
/// (including non-object JSON) yields an empty map.
pub fn parse_body(headers: &HeaderMap, bytes: &[u8]) -> ParamMap {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if content_type.starts_with("application/json") {
        match serde_json::from_slice::<Value>(bytes) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => ParamMap::new(),
        }
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        parse_urlencoded(&String::from_utf8_lossy(bytes))
    } else {
        ParamMap::new()
    }
}

/// Build the full request context from request parts and the buffered body
///
/// The body is routed by method: POST fills the body source, PUT and DELETE
/// fill their dedicated raw-body sources. The merged source is derived from
/// query and body (body winning), matching the conventional GET+POST merge.
pub fn context_from_parts(parts: &Parts, body_bytes: &[u8]) -> RequestContext {
    let query = parts
        .uri
        .query()
        .map(parse_urlencoded)
        .unwrap_or_default();
    let cookies = parse_cookies(&parts.headers);
    let body_params = parse_body(&parts.headers, body_bytes);

    let mut builder = RequestContext::builder()
        .query(query)
        .cookies(cookies);

    builder = match parts.method.as_str() {
        "POST" => builder.body(body_params),
        "PUT" => builder.with_source(ParamSource::PutBody, body_params),
        "DELETE" => builder.with_source(ParamSource::DeleteBody, body_params),
        _ => builder,
    };

    builder = builder.merged_from_query_and_body();

    if let Some(overlay) = parts.extensions.get::<SourceOverlay>() {
        builder = builder
            .with_source(ParamSource::Session, overlay.session.clone())
            .with_source(ParamSource::Server, overlay.server.clone())
            .with_source(ParamSource::Env, overlay.env.clone())
            .with_source(ParamSource::Files, overlay.files.clone());
    }

    builder.build()
}

/// Resolve the action id for a request
///
/// Prefers a host-set [`ActionId`] extension; falls back to the last
/// non-empty path segment, and to `"index"` for the root path.
pub fn resolve_action_id(parts: &Parts) -> String {
    if let Some(ActionId(id)) = parts.extensions.get::<ActionId>() {
        return id.clone();
    }
    parts
        .uri
        .path()
        .rsplit('/')
        .find(|segment| !segment.is_empty())
        .unwrap_or("index")
        .to_string()
}
