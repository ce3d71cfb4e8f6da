// error.rs - Error types for the Slack client and configuration loading
//
// The argument classifier has no error type: a token that matches nothing
// is simply a plain string.

use thiserror::Error;

/// Errors returned by `SlackClient` calls
#[derive(Error, Debug)]
pub enum SlackError {
    /// Transport failure (connect, timeout, TLS, non-JSON body).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to decode Slack response: {0}")]
    Json(#[from] serde_json::Error),

    /// Slack answered with `"ok": false`.
    #[error("Slack API call {method} failed: {error}")]
    Api { method: String, error: String },

    /// A name lookup found no matching channel or user.
    #[error("could not find {kind} named '{name}'")]
    NotFound { kind: &'static str, name: String },

    #[error("Slack API call {method} returned no '{field}' field")]
    MalformedResponse { method: String, field: &'static str },
}

/// Errors from loading `botconfig.txt` or the command registry file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no config file found in any expected location ({0})")]
    NotFound(String),

    #[error("required setting '{0}' not found")]
    MissingKey(String),

    #[error("setting '{0}' is still set to its placeholder value")]
    Placeholder(String),

    #[error("invalid value '{value}' for setting '{key}'")]
    InvalidValue { key: String, value: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid command registry: {0}")]
    Json(#[from] serde_json::Error),
}
