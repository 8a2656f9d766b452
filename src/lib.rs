//! # param-gate
//!
//! Fine-grained control over where action parameters come from.
//!
//! For each action and parameter you declare which request sources (query
//! string, body, cookies, session, and so on) may supply the value and in
//! what precedence. The gate then verifies, before the action runs, that
//! every submitted parameter really was supplied by one of its allowed
//! sources with exactly the submitted value. Actions can rely solely on the
//! parameters passed to them without caring where they came from, and a
//! merged parameter map can no longer smuggle in a cookie value where a
//! query parameter was expected.
//!
//! ## Quick Start
//!
//! ```rust
//! use param_gate::config::GateConfig;
//! use param_gate::core::context::RequestContext;
//! use serde_json::json;
//!
//! let filter = GateConfig::from_yaml_str(
//!     r#"
//! actions:
//!   delete:
//!     id: query
//!     return_url: body
//!     ajax: query,body
//! "#,
//! )
//! .unwrap()
//! .into_filter()
//! .unwrap();
//!
//! let ctx = RequestContext::builder()
//!     .query([("id".to_string(), json!("42"))])
//!     .body([("return_url".to_string(), json!("/admin"))])
//!     .build();
//!
//! let submitted = [
//!     ("id".to_string(), json!("42")),
//!     ("return_url".to_string(), json!("/admin")),
//! ]
//! .into_iter()
//! .collect();
//!
//! assert!(filter.check("delete", &submitted, &ctx).is_allowed());
//! ```
//!
//! ## Provider mode
//!
//! With `provide_params: true` the filter also re-derives the action's
//! parameter set strictly from the configured sources
//! ([`ParamFilter::provide`](filter::ParamFilter::provide)), so the host can
//! skip its default merge entirely. In the axum adapter the map arrives in
//! handlers through the [`Provided`](web::Provided) extractor.
//!
//! Comparisons are strict: a query value `"42"` (string) never equals a
//! submitted `42` (number).

pub mod config;
pub mod core;
pub mod filter;
pub mod logging;
pub mod web;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        context::{ParamMap, RequestContext},
        error::{ConfigError, GateError, GateResult, ValidationError},
        rule::ParamRule,
        ruleset::ActionRuleSet,
        source::ParamSource,
    };

    // === Filter ===
    pub use crate::filter::{GateDecision, ParamFilter};

    // === Config ===
    pub use crate::config::GateConfig;

    // === Web adapter ===
    pub use crate::web::{enforce, ActionId, GateState, Provided, SourceOverlay, SubmittedParams};

    // === Logging ===
    pub use crate::logging::init_tracing;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}
