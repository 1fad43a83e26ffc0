//! Error types for the reactloop domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The top-level error type surfaced to callers of the agent.
///
/// Only backend and configuration failures reach this level. Tool failures
/// are converted into observations inside the loop and never appear here.
#[derive(Debug, Error)]
pub enum Error {
    // --- Model backend errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Run control ---
    #[error("Run cancelled after {iterations} reasoning step(s)")]
    Cancelled { iterations: u32 },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the model backend call. Fatal for the current query only.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures local to one tool call.
///
/// Stored inside `ToolResult` entries of the Message Log, hence serializable.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ToolError {
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    #[error("Tool already registered: {name}")]
    DuplicateTool { name: String },

    #[error("Invalid arguments for {tool_name}: {reason}")]
    InvalidArguments { tool_name: String, reason: String },

    #[error("Tool execution failed: {tool_name} ({cause})")]
    ExecutionFailed { tool_name: String, cause: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },
}

impl ToolError {
    /// Name of the tool the error refers to.
    pub fn tool_name(&self) -> &str {
        match self {
            Self::UnknownTool { name } | Self::DuplicateTool { name } => name,
            Self::InvalidArguments { tool_name, .. }
            | Self::ExecutionFailed { tool_name, .. }
            | Self::Timeout { tool_name, .. } => tool_name,
        }
    }

    /// Build an `InvalidArguments` error. Tools call this with an empty name;
    /// the registry fills it in.
    pub fn invalid_arguments(reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            tool_name: String::new(),
            reason: reason.into(),
        }
    }

    /// Build an `ExecutionFailed` error. Tools call this with an empty name;
    /// the registry fills it in.
    pub fn execution_failed(cause: impl Into<String>) -> Self {
        Self::ExecutionFailed {
            tool_name: String::new(),
            cause: cause.into(),
        }
    }

    pub(crate) fn with_tool_name(self, name: &str) -> Self {
        match self {
            Self::InvalidArguments { reason, .. } => Self::InvalidArguments {
                tool_name: name.to_string(),
                reason,
            },
            Self::ExecutionFailed { cause, .. } => Self::ExecutionFailed {
                tool_name: name.to_string(),
                cause,
            },
            Self::Timeout { timeout_secs, .. } => Self::Timeout {
                tool_name: name.to_string(),
                timeout_secs,
            },
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = ToolError::ExecutionFailed {
            tool_name: "calculator".into(),
            cause: "division by zero".into(),
        };
        assert!(err.to_string().contains("calculator"));
        assert!(err.to_string().contains("division by zero"));
    }

    #[test]
    fn tool_name_is_filled_in() {
        let err = ToolError::invalid_arguments("missing 'a'").with_tool_name("add");
        assert_eq!(err.tool_name(), "add");

        let unknown = ToolError::UnknownTool { name: "foo".into() }.with_tool_name("bar");
        assert_eq!(unknown.tool_name(), "foo");
    }

    #[test]
    fn tool_error_serializes_with_kind_tag() {
        let err = ToolError::UnknownTool { name: "foo".into() };
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains(r#""kind":"unknown_tool""#));
        let back: ToolError = serde_json::from_str(&json).unwrap();
        assert_eq!(back, err);
    }
}
