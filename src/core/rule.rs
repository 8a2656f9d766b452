//! Per-parameter source rules
//!
//! A [`ParamRule`] declares which sources may supply one named parameter and
//! in what precedence. Validation checks that a submitted parameter was
//! actually supplied by one of its allowed sources and that the submitted
//! value is exactly the value found there, so a merged parameter map cannot
//! smuggle in a value from a source the action never agreed to accept.

use serde_json::Value;

use crate::core::context::{ParamMap, RequestContext};
use crate::core::error::{ConfigError, GateResult, ValidationError};
use crate::core::source::{parse_source_list, ParamSource};

/// Source allowlist for one named parameter
///
/// Immutable once configured. The source list is the precedence order:
/// the first source that contains the parameter name wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamRule {
    name: String,
    sources: Vec<ParamSource>,
}

impl ParamRule {
    /// Create a rule from an explicit source list
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptySourceList`] when no sources are given.
    pub fn new(name: impl Into<String>, sources: Vec<ParamSource>) -> Result<Self, ConfigError> {
        if sources.is_empty() {
            return Err(ConfigError::EmptySourceList);
        }
        Ok(Self {
            name: name.into(),
            sources,
        })
    }

    /// Create a rule from the textual encoding, e.g. `"query,body"`
    ///
    /// Names are case-insensitive; legacy aliases ("get", "post", "request")
    /// are accepted. Unknown names fail here, at configuration time.
    pub fn parse(name: impl Into<String>, sources: &str) -> Result<Self, ConfigError> {
        Self::new(name, parse_source_list(sources)?)
    }

    /// The parameter name this rule applies to
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The allowed sources, in precedence order
    pub fn sources(&self) -> &[ParamSource] {
        &self.sources
    }

    /// Resolve the first allowed source that supplies this parameter
    ///
    /// Sources are tried in configured precedence order; the first whose
    /// dictionary contains the parameter name wins, regardless of what any
    /// later source holds.
    pub fn resolve_source(&self, ctx: &RequestContext) -> Option<ParamSource> {
        self.sources
            .iter()
            .copied()
            .find(|&source| ctx.contains(source, &self.name))
    }

    /// Whether any allowed source supplies this parameter
    pub fn is_provided(&self, ctx: &RequestContext) -> bool {
        self.resolve_source(ctx).is_some()
    }

    /// The value at the resolved source
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValueUnresolved`] when no allowed source
    /// supplies the parameter. Guard with [`is_provided`](Self::is_provided)
    /// or go through [`validate`](Self::validate), which never hits this.
    pub fn value<'ctx>(&self, ctx: &'ctx RequestContext) -> GateResult<&'ctx Value> {
        let source = self
            .resolve_source(ctx)
            .ok_or_else(|| ConfigError::ValueUnresolved {
                param: self.name.clone(),
            })?;
        Ok(ctx
            .get(source, &self.name)
            .ok_or_else(|| ConfigError::ValueUnresolved {
                param: self.name.clone(),
            })?)
    }

    /// Validate this parameter against the submitted parameter map
    ///
    /// - absent from `submitted`: nothing to check, valid;
    /// - present: valid iff an allowed source supplies the parameter and the
    ///   submitted value is strictly equal (same type, same value) to the
    ///   value found in the resolved source.
    pub fn validate(
        &self,
        submitted: &ParamMap,
        ctx: &RequestContext,
    ) -> Result<(), ValidationError> {
        let Some(submitted_value) = submitted.get(&self.name) else {
            return Ok(());
        };

        let Some(source) = self.resolve_source(ctx) else {
            return Err(ValidationError::NotInAllowedSources {
                param: self.name.clone(),
                sources: self.sources.clone(),
            });
        };

        let source_value = ctx.get(source, &self.name).unwrap_or(&Value::Null);
        if source_value == submitted_value {
            Ok(())
        } else {
            Err(ValidationError::ValueMismatch {
                param: self.name.clone(),
                source,
            })
        }
    }
}
