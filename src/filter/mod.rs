//! The action parameter filter
//!
//! [`ParamFilter`] is the pass/fail gate invoked before an action runs. For
//! the current action it validates every configured rule against the
//! submitted parameter map and denies the request on the first failing rule.
//! Unconfigured actions pass trivially.
//!
//! In provider mode the filter can also re-derive the action's parameter set
//! strictly from the configured sources via [`ParamFilter::provide`],
//! replacing whatever ad-hoc merging the host would otherwise perform. The
//! provider map is constructed and returned to the caller directly; nothing
//! is attached to or mutated on the host side.

use crate::core::context::{ParamMap, RequestContext};
use crate::core::error::{GateError, ValidationError};
use crate::core::ruleset::ActionRuleSet;

/// Outcome of gating one request
///
/// A request starts pending, and checking moves it to exactly one of these
/// terminal states. Denial carries the first failing rule's violation;
/// later rules are not evaluated.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    /// Every rule for the action validated
    Allowed,
    /// A rule failed; request processing stops with a client error
    Denied(ValidationError),
}

impl GateDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateDecision::Allowed)
    }

    /// Convert into a `Result`, mapping denial to a [`GateError`]
    pub fn into_result(self) -> Result<(), GateError> {
        match self {
            GateDecision::Allowed => Ok(()),
            GateDecision::Denied(violation) => Err(violation.into()),
        }
    }
}

/// Validates action parameters against their configured sources
///
/// Holds the read-only rule set; safe to share across concurrent requests
/// (each request carries its own [`RequestContext`]).
///
/// ```rust
/// use param_gate::core::ruleset::ActionRuleSet;
/// use param_gate::core::context::RequestContext;
/// use param_gate::filter::ParamFilter;
/// use serde_json::json;
///
/// let filter = ParamFilter::new(
///     ActionRuleSet::builder()
///         .rule("delete", "id", "query")
///         .build()
///         .unwrap(),
/// );
///
/// let ctx = RequestContext::builder()
///     .query([("id".to_string(), json!("42"))])
///     .build();
/// let submitted = [("id".to_string(), json!("42"))].into_iter().collect();
///
/// assert!(filter.check("delete", &submitted, &ctx).is_allowed());
/// ```
#[derive(Debug, Clone)]
pub struct ParamFilter {
    rules: ActionRuleSet,
    provide_params: bool,
}

impl ParamFilter {
    /// Create a filter over a configured rule set, provider mode off
    pub fn new(rules: ActionRuleSet) -> Self {
        Self {
            rules,
            provide_params: false,
        }
    }

    /// Enable or disable provider mode
    pub fn with_provide_params(mut self, enabled: bool) -> Self {
        self.provide_params = enabled;
        self
    }

    /// Whether provider mode is enabled
    pub fn provides_params(&self) -> bool {
        self.provide_params
    }

    /// The configured rule set
    pub fn rules(&self) -> &ActionRuleSet {
        &self.rules
    }

    /// Gate one request: validate every rule for the action
    ///
    /// `submitted` is the merged parameter map the host would bind to the
    /// action; `ctx` carries the raw per-source dictionaries. Evaluation
    /// stops at the first failing rule.
    pub fn check(
        &self,
        action_id: &str,
        submitted: &ParamMap,
        ctx: &RequestContext,
    ) -> GateDecision {
        for rule in self.rules.rules_for(action_id) {
            if let Err(violation) = rule.validate(submitted, ctx) {
                tracing::warn!(
                    action = action_id,
                    param = rule.name(),
                    code = violation.error_code(),
                    "action param validation failed"
                );
                return GateDecision::Denied(violation);
            }
        }
        tracing::debug!(action = action_id, "action params validated");
        GateDecision::Allowed
    }

    /// Re-derive the action's parameters strictly from configured sources
    ///
    /// Returns name → resolved value for every rule whose parameter is
    /// provided by one of its allowed sources, in rule declaration order.
    /// Parameters found in no allowed source are simply omitted, and keys
    /// outside the configured rule set never appear.
    pub fn provide(&self, action_id: &str, ctx: &RequestContext) -> ParamMap {
        self.rules
            .rules_for(action_id)
            .filter_map(|rule| {
                let source = rule.resolve_source(ctx)?;
                let value = ctx.get(source, rule.name())?;
                Some((rule.name().to_string(), value.clone()))
            })
            .collect()
    }
}
