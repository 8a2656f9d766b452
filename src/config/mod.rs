//! Configuration loading and management
//!
//! Declarative filter configuration, loadable from YAML:
//!
//! ```yaml
//! provide_params: true
//! actions:
//!   delete:
//!     id: query
//!     return_url: body
//!     ajax: query,body
//! ```
//!
//! Source lists use the case-insensitive, comma-separated encoding; every
//! list is validated when the config is turned into a filter, so an unknown
//! source name fails at load time rather than during a request.

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::error::GateError;
use crate::core::ruleset::ActionRuleSet;
use crate::filter::ParamFilter;

/// Complete configuration for the parameter gate
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GateConfig {
    /// Action id → (parameter name → allowed-source list)
    ///
    /// Order matters: rules are validated, and the provider map is built,
    /// in declaration order.
    #[serde(default)]
    pub actions: IndexMap<String, IndexMap<String, String>>,

    /// Whether the web adapter exposes the re-derived parameter map to
    /// handlers instead of the default query+body merge
    #[serde(default)]
    pub provide_params: bool,
}

impl GateConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Validate all source lists and build the immutable filter
    ///
    /// # Errors
    ///
    /// Returns a configuration error for any unknown source name or empty
    /// source list. Nothing is built on failure.
    pub fn into_filter(self) -> Result<ParamFilter, GateError> {
        let mut builder = ActionRuleSet::builder();
        for (action_id, params) in &self.actions {
            for (param, sources) in params {
                builder = builder.rule(action_id.clone(), param.clone(), sources);
            }
        }
        let rules = builder.build()?;
        tracing::debug!(
            actions = rules.action_count(),
            provide_params = self.provide_params,
            "param filter configured"
        );
        Ok(ParamFilter::new(rules).with_provide_params(self.provide_params))
    }
}
