//! axum adapter
//!
//! The core filter is transport-agnostic; this module is the edge that wires
//! it into an axum application:
//!
//! - [`extract`] builds the per-request [`RequestContext`] from the raw
//!   request (query string, body, cookies) plus host-supplied overlays for
//!   the sources a transport cannot see (session, server, env, files).
//! - [`middleware`] runs the gate before the handler and, in provider mode,
//!   hands the re-derived parameter map to handlers via the [`Provided`]
//!   extractor.
//!
//! [`RequestContext`]: crate::core::context::RequestContext
//! [`Provided`]: middleware::Provided

pub mod extract;
pub mod middleware;

pub use extract::{ActionId, SourceOverlay, SubmittedParams};
pub use middleware::{enforce, GateState, Provided};
