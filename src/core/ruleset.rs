//! Per-action rule registry
//!
//! Maps action identifiers to the parameter rules configured for them.
//! Built once at configuration time and read-only afterwards.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::core::error::ConfigError;
use crate::core::rule::ParamRule;
use crate::core::source::ParamSource;

/// All configured rules, keyed by action id and parameter name
///
/// Parameter names are unique per action; registering a second rule for the
/// same action/name replaces the first. Declaration order is preserved, so
/// validation order and provider output are deterministic.
#[derive(Debug, Clone, Default)]
pub struct ActionRuleSet {
    actions: HashMap<String, IndexMap<String, ParamRule>>,
}

impl ActionRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for fluent registration
    pub fn builder() -> ActionRuleSetBuilder {
        ActionRuleSetBuilder {
            rules: Self::new(),
            error: None,
        }
    }

    /// Register a rule for an action
    pub fn insert(&mut self, action_id: impl Into<String>, rule: ParamRule) {
        self.actions
            .entry(action_id.into())
            .or_default()
            .insert(rule.name().to_string(), rule);
    }

    /// The rules configured for an action, in declaration order
    ///
    /// Unconfigured actions yield an empty iterator.
    pub fn rules_for(&self, action_id: &str) -> impl Iterator<Item = &ParamRule> {
        self.actions
            .get(action_id)
            .into_iter()
            .flat_map(|rules| rules.values())
    }

    /// Look up one rule by action and parameter name
    pub fn rule(&self, action_id: &str, param: &str) -> Option<&ParamRule> {
        self.actions.get(action_id).and_then(|rules| rules.get(param))
    }

    /// Whether any rules are configured for an action
    pub fn has_rules_for(&self, action_id: &str) -> bool {
        self.actions
            .get(action_id)
            .is_some_and(|rules| !rules.is_empty())
    }

    /// Number of configured actions
    pub fn action_count(&self) -> usize {
        self.actions.len()
    }
}

/// Fluent builder for [`ActionRuleSet`]
///
/// ```rust
/// use param_gate::core::ruleset::ActionRuleSet;
///
/// let rules = ActionRuleSet::builder()
///     .rule("delete", "id", "query")
///     .rule("delete", "return_url", "body")
///     .rule("delete", "ajax", "query,body")
///     .build()
///     .unwrap();
/// assert!(rules.has_rules_for("delete"));
/// ```
#[derive(Debug, Clone)]
pub struct ActionRuleSetBuilder {
    rules: ActionRuleSet,
    error: Option<ConfigError>,
}

impl ActionRuleSetBuilder {
    /// Register a rule from the textual source encoding
    ///
    /// The first parse failure is remembered and reported by
    /// [`build`](Self::build); later registrations are ignored after a
    /// failure.
    pub fn rule(
        mut self,
        action_id: impl Into<String>,
        param: impl Into<String>,
        sources: &str,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match ParamRule::parse(param, sources) {
            Ok(rule) => self.rules.insert(action_id, rule),
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Register a rule with explicit sources
    pub fn rule_with_sources(
        mut self,
        action_id: impl Into<String>,
        param: impl Into<String>,
        sources: Vec<ParamSource>,
    ) -> Self {
        if self.error.is_some() {
            return self;
        }
        match ParamRule::new(param, sources) {
            Ok(rule) => self.rules.insert(action_id, rule),
            Err(err) => self.error = Some(err),
        }
        self
    }

    /// Finish building, surfacing the first configuration error
    pub fn build(self) -> Result<ActionRuleSet, ConfigError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.rules),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_ruleset_yields_nothing() {
        let rules = ActionRuleSet::new();
        assert_eq!(rules.rules_for("delete").count(), 0);
        assert!(!rules.has_rules_for("delete"));
        assert_eq!(rules.action_count(), 0);
    }

    #[test]
    fn test_rules_for_unconfigured_action_is_empty() {
        let rules = ActionRuleSet::builder()
            .rule("delete", "id", "query")
            .build()
            .unwrap();
        assert_eq!(rules.rules_for("update").count(), 0);
        assert_eq!(rules.rules_for("delete").count(), 1);
    }

    #[test]
    fn test_rules_preserve_declaration_order() {
        let rules = ActionRuleSet::builder()
            .rule("delete", "id", "query")
            .rule("delete", "return_url", "body")
            .rule("delete", "ajax", "query,body")
            .build()
            .unwrap();
        let names: Vec<&str> = rules.rules_for("delete").map(|r| r.name()).collect();
        assert_eq!(names, vec!["id", "return_url", "ajax"]);
    }

    #[test]
    fn test_same_param_name_last_registration_wins() {
        let rules = ActionRuleSet::builder()
            .rule("delete", "id", "query")
            .rule("delete", "id", "body")
            .build()
            .unwrap();
        let rule = rules.rule("delete", "id").unwrap();
        assert_eq!(rule.sources(), &[crate::core::source::ParamSource::Body]);
        assert_eq!(rules.rules_for("delete").count(), 1);
    }

    #[test]
    fn test_builder_surfaces_first_parse_error() {
        let result = ActionRuleSet::builder()
            .rule("delete", "id", "query")
            .rule("delete", "bogus", "astral-plane")
            .rule("delete", "later", "body")
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigError::UnknownSource { name } if name == "astral-plane"
        ));
    }

    #[test]
    fn test_actions_are_independent() {
        let rules = ActionRuleSet::builder()
            .rule("create", "article", "body")
            .rule("update", "id", "query")
            .rule("update", "article", "body")
            .build()
            .unwrap();
        assert_eq!(rules.rules_for("create").count(), 1);
        assert_eq!(rules.rules_for("update").count(), 2);
        assert_eq!(rules.action_count(), 2);
    }
}
