//! Request-parameter sources
//!
//! A source is one of the request-data containers a parameter value may
//! legitimately come from. Rules reference sources by name in configuration;
//! parsing is case-insensitive and accepts both the native names and the
//! HTTP-verb aliases ("get", "post", "request", ...).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::ConfigError;

/// A container request parameters can be drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamSource {
    /// URL query string
    Query,
    /// Request body (form fields or top-level JSON object keys)
    Body,
    /// Request cookies
    Cookie,
    /// Server-side session store (host-supplied)
    Session,
    /// Server variables (host-supplied)
    Server,
    /// Process environment (host-supplied)
    Env,
    /// Uploaded files (host-supplied)
    Files,
    /// Merged request map (query + body, body winning)
    Merged,
    /// Raw PUT body parsed as key-value pairs
    PutBody,
    /// Raw DELETE body parsed as key-value pairs
    DeleteBody,
}

impl ParamSource {
    /// All sources, in a stable order
    pub const ALL: [ParamSource; 10] = [
        ParamSource::Query,
        ParamSource::Body,
        ParamSource::Cookie,
        ParamSource::Session,
        ParamSource::Server,
        ParamSource::Env,
        ParamSource::Files,
        ParamSource::Merged,
        ParamSource::PutBody,
        ParamSource::DeleteBody,
    ];

    /// Canonical configuration name for this source
    pub fn name(&self) -> &'static str {
        match self {
            ParamSource::Query => "query",
            ParamSource::Body => "body",
            ParamSource::Cookie => "cookie",
            ParamSource::Session => "session",
            ParamSource::Server => "server",
            ParamSource::Env => "env",
            ParamSource::Files => "files",
            ParamSource::Merged => "merged",
            ParamSource::PutBody => "put",
            ParamSource::DeleteBody => "delete",
        }
    }
}

impl fmt::Display for ParamSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ParamSource {
    type Err = ConfigError;

    /// Parse a single source name, case-insensitively.
    ///
    /// Accepts the canonical names plus the legacy aliases used by the
    /// original configuration encoding. Note that "cookie" maps to the
    /// cookie source proper, not to the merged request map.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" | "get" => Ok(ParamSource::Query),
            "body" | "post" => Ok(ParamSource::Body),
            "cookie" => Ok(ParamSource::Cookie),
            "session" => Ok(ParamSource::Session),
            "server" => Ok(ParamSource::Server),
            "env" => Ok(ParamSource::Env),
            "files" => Ok(ParamSource::Files),
            "merged" | "request" => Ok(ParamSource::Merged),
            "put" => Ok(ParamSource::PutBody),
            "delete" => Ok(ParamSource::DeleteBody),
            _ => Err(ConfigError::UnknownSource {
                name: s.trim().to_string(),
            }),
        }
    }
}

/// Parse a comma-separated source list into precedence order
///
/// The resulting order is the precedence order used by rule resolution:
/// `"query,body"` means the query string wins over the body.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownSource`] for any unrecognized name and
/// [`ConfigError::EmptySourceList`] when the list contains no names at all.
/// Both are fatal at configuration-load time.
pub fn parse_source_list(list: &str) -> Result<Vec<ParamSource>, ConfigError> {
    let sources = list
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(ParamSource::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    if sources.is_empty() {
        return Err(ConfigError::EmptySourceList);
    }

    Ok(sources)
}
