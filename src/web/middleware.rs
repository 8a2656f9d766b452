//! Gate middleware
//!
//! Runs the parameter filter before the handler. Denied requests are
//! rejected with a 400 JSON error body and never reach the handler. When
//! provider mode is enabled, the re-derived parameter map is inserted as a
//! request extension and handlers receive it through the [`Provided`]
//! extractor instead of doing their own source merging.
//!
//! ```rust,ignore
//! let state = GateState::new(config.into_filter()?);
//! let app = Router::new()
//!     .route("/articles/delete", post(delete_article))
//!     .layer(middleware::from_fn_with_state(state, enforce));
//!
//! async fn delete_article(Provided(params): Provided) -> impl IntoResponse {
//!     // params came strictly from the configured sources
//! }
//! ```

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::core::context::ParamMap;
use crate::filter::{GateDecision, ParamFilter};
use crate::web::extract::{context_from_parts, resolve_action_id, SubmittedParams};

/// Request bodies larger than this are rejected instead of buffered
const MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Shared middleware state: the configured filter
#[derive(Clone)]
pub struct GateState {
    filter: Arc<ParamFilter>,
}

impl GateState {
    pub fn new(filter: ParamFilter) -> Self {
        Self {
            filter: Arc::new(filter),
        }
    }

    pub fn filter(&self) -> &ParamFilter {
        &self.filter
    }
}

/// The parameter map re-derived from configured sources, for handlers
///
/// Present only when provider mode is enabled on the filter and the request
/// passed the gate.
#[derive(Debug, Clone)]
pub struct Provided(pub ParamMap);

impl<S> FromRequestParts<S> for Provided
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<Provided>().cloned().ok_or_else(|| {
            // Reaching this means the route is not behind the gate or
            // provider mode is off.
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "provided params missing; enable provide_params and attach the gate middleware"
                })),
            )
                .into_response()
        })
    }
}

/// Gate middleware entry point
///
/// Buffers the body (bounded), builds the request context, validates the
/// submitted parameter map for the resolved action, and either rejects the
/// request or forwards it. The body is restored for downstream extractors.
pub async fn enforce(State(state): State<GateState>, req: Request, next: Next) -> Response {
    let (mut parts, body) = req.into_parts();

    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(error = %err, "failed to buffer request body");
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "unreadable request body" })),
            )
                .into_response();
        }
    };

    let ctx = context_from_parts(&parts, &bytes);
    let action_id = resolve_action_id(&parts);

    // The host may hand us its own merged map; default to query+body.
    let submitted = match parts.extensions.get::<SubmittedParams>() {
        Some(SubmittedParams(params)) => params.clone(),
        None => ctx
            .source(crate::core::source::ParamSource::Merged)
            .cloned()
            .unwrap_or_default(),
    };

    match state.filter.check(&action_id, &submitted, &ctx) {
        GateDecision::Allowed => {}
        GateDecision::Denied(violation) => {
            return crate::core::error::GateError::Validation(violation).into_response();
        }
    }

    if state.filter.provides_params() {
        let provided = state.filter.provide(&action_id, &ctx);
        parts.extensions.insert(Provided(provided));
    }

    let req = Request::from_parts(parts, Body::from(bytes));
    next.run(req).await
}
