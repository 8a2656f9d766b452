//! Explicit request context
//!
//! Every rule evaluation receives an explicit [`RequestContext`]
//! carrying one dictionary per source; sources that were never populated
//! behave as empty dictionaries. Values are `serde_json::Value` so that
//! equality checks are strict: same type and same value, no coercion.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::Value;

use crate::core::source::ParamSource;

/// An order-preserving parameter dictionary
pub type ParamMap = IndexMap<String, Value>;

/// Per-request snapshot of all parameter sources
///
/// Built once per request, read-only during rule evaluation. Each request
/// carries its own context, so evaluation is trivially safe across
/// concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    sources: HashMap<ParamSource, ParamMap>,
}

impl RequestContext {
    /// Create an empty context (every source is an empty dictionary)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context builder
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder {
            context: Self::new(),
        }
    }

    /// Look up a parameter in a single source
    pub fn get(&self, source: ParamSource, name: &str) -> Option<&Value> {
        self.sources.get(&source).and_then(|map| map.get(name))
    }

    /// Whether a source dictionary contains the given key
    pub fn contains(&self, source: ParamSource, name: &str) -> bool {
        self.get(source, name).is_some()
    }

    /// The full dictionary for a source, if it was populated
    pub fn source(&self, source: ParamSource) -> Option<&ParamMap> {
        self.sources.get(&source)
    }
}

/// Builder for [`RequestContext`]
///
/// ```rust
/// use param_gate::core::context::RequestContext;
/// use param_gate::core::source::ParamSource;
/// use serde_json::json;
///
/// let ctx = RequestContext::builder()
///     .query([("id".to_string(), json!("42"))])
///     .body([("return_url".to_string(), json!("/admin"))])
///     .build();
/// assert_eq!(ctx.get(ParamSource::Query, "id"), Some(&json!("42")));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContextBuilder {
    context: RequestContext,
}

impl RequestContextBuilder {
    /// Populate an arbitrary source dictionary
    ///
    /// Setting the same source twice replaces the earlier dictionary.
    pub fn with_source<I>(mut self, source: ParamSource, params: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        self.context
            .sources
            .insert(source, params.into_iter().collect());
        self
    }

    /// Populate the query-string source
    pub fn query<I: IntoIterator<Item = (String, Value)>>(self, params: I) -> Self {
        self.with_source(ParamSource::Query, params)
    }

    /// Populate the body source
    pub fn body<I: IntoIterator<Item = (String, Value)>>(self, params: I) -> Self {
        self.with_source(ParamSource::Body, params)
    }

    /// Populate the cookie source
    pub fn cookies<I: IntoIterator<Item = (String, Value)>>(self, params: I) -> Self {
        self.with_source(ParamSource::Cookie, params)
    }

    /// Populate the session source
    pub fn session<I: IntoIterator<Item = (String, Value)>>(self, params: I) -> Self {
        self.with_source(ParamSource::Session, params)
    }

    /// Derive the merged request map from the query and body dictionaries
    ///
    /// Body entries win over query entries for the same key, matching the
    /// original's documented GET+POST merge. Call after `query`/`body`;
    /// an explicit `with_source(ParamSource::Merged, ..)` takes precedence
    /// if called later.
    pub fn merged_from_query_and_body(self) -> Self {
        let mut merged = ParamMap::new();
        if let Some(query) = self.context.source(ParamSource::Query) {
            merged.extend(query.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        if let Some(body) = self.context.source(ParamSource::Body) {
            merged.extend(body.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        self.with_source(ParamSource::Merged, merged)
    }

    /// Finish building
    pub fn build(self) -> RequestContext {
        self.context
    }
}
