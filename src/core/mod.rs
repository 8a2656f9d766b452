//! Core module containing the source model, request context, and rules

pub mod context;
pub mod error;
pub mod rule;
pub mod ruleset;
pub mod source;

pub use context::{ParamMap, RequestContext, RequestContextBuilder};
pub use error::{ConfigError, ErrorResponse, GateError, GateResult, ValidationError};
pub use rule::ParamRule;
pub use ruleset::{ActionRuleSet, ActionRuleSetBuilder};
pub use source::{parse_source_list, ParamSource};
