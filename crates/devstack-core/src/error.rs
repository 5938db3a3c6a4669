//! Error types for devstack operations.
//!
//! This module defines [`DevstackError`], the single error enum shared by every
//! devstack crate. Validation errors carry the offending value and, where one
//! exists, the list of accepted alternatives, so their `Display` output can be
//! shown to the user as-is.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`DevstackError`].
pub type Result<T> = std::result::Result<T, DevstackError>;

/// Comprehensive error type for all devstack operations.
///
/// Errors are never retried automatically. The only place an error leads to a
/// second attempt is the interactive prompt loop, and only for the kinds
/// reported by [`DevstackError::is_reprompt_allowed`].
#[derive(Debug, Error)]
pub enum DevstackError {
    // =========================================================================
    // Option Errors
    // =========================================================================
    /// A raw string did not match any token of a closed option set
    #[error("unknown {category} '{input}'. Options are: {}", .valid.join(", "))]
    UnknownOption {
        category: &'static str,
        input: String,
        valid: Vec<String>,
    },

    /// The blockchain provider resolved but cannot be used yet
    #[error("support for {provider} is coming soon")]
    UnsupportedProvider { provider: String },

    /// The remote-rpc node needs somewhere to connect to
    #[error("blockchain node '{node}' requires --remote-node-url to be set")]
    MissingRemoteNodeUrl { node: String },

    /// Manifest override points at nothing
    #[error("manifest file not found: {path}")]
    ManifestNotFound { path: PathBuf },

    // =========================================================================
    // Name Errors
    // =========================================================================
    /// Org or node name violates the member name rule
    #[error("invalid name '{input}': {rule}")]
    InvalidName { input: String, rule: &'static str },

    /// Stack name contains characters outside [-_a-z0-9]
    #[error(
        "invalid stack name '{input}': stack name may only contain lowercase letters, digits, dash (-) and underscore (_)"
    )]
    InvalidStackName { input: String },

    /// Stack name is empty or only whitespace
    #[error("stack name must not be empty")]
    EmptyName,

    /// A stack with this name is already registered
    #[error("stack '{name}' already exists")]
    StackAlreadyExists { name: String },

    /// The registry could not answer the existence check
    #[error("failed to look up stack '{name}'")]
    RegistryLookupFailed {
        name: String,
        #[source]
        source: std::io::Error,
    },

    // =========================================================================
    // Count Errors
    // =========================================================================
    /// Member count is not a positive integer
    #[error("invalid member count '{input}': {reason}")]
    InvalidCount { input: String, reason: &'static str },

    /// Not a single managed member would be left to deploy contracts
    #[error(
        "number of external processes ({external}) must be less than the number of members ({members}) - at least one managed core must exist to extract and deploy smart contracts"
    )]
    ExternalProcessesExceedMembers { external: u32, members: u32 },

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Interactive input ended before a valid answer was given
    #[error("input closed while waiting for {label}")]
    InputClosed { label: String },

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Configuration file is invalid YAML
    #[error("Invalid configuration at {path}: {message}")]
    ConfigInvalid { path: PathBuf, message: String },

    /// Home directory could not be determined
    #[error("Could not determine home directory; set DEVSTACK_HOME")]
    HomeNotFound,

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Generic I/O error with context
    #[error("I/O error {operation}: {path}")]
    Io {
        operation: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory creation failed
    #[error("Failed to create directory: {path}")]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Terminal read or write failed while prompting
    #[error("Terminal I/O error: {0}")]
    Terminal(#[source] std::io::Error),

    /// JSON serialization error
    #[error("JSON error in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Internal error (bug in devstack)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DevstackError {
    // =========================================================================
    // Constructor helpers for common error patterns
    // =========================================================================

    /// Create an UnknownOption error from a category and its valid tokens
    pub fn unknown_option<I, S>(category: &'static str, input: impl Into<String>, valid: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::UnknownOption {
            category,
            input: input.into(),
            valid: valid.into_iter().map(Into::into).collect(),
        }
    }

    /// Create an InvalidCount error
    pub fn invalid_count(input: impl Into<String>, reason: &'static str) -> Self {
        Self::InvalidCount {
            input: input.into(),
            reason,
        }
    }

    /// Create a RegistryLookupFailed error
    pub fn registry_lookup(name: impl Into<String>, source: std::io::Error) -> Self {
        Self::RegistryLookupFailed {
            name: name.into(),
            source,
        }
    }

    /// Create an I/O error
    pub fn io(operation: impl Into<String>, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a JSON error
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    // =========================================================================
    // Error classification helpers
    // =========================================================================

    /// Returns true if an interactive prompt should ask again after this error.
    ///
    /// Only bad answers qualify. Environment problems such as a failed registry
    /// lookup abort even inside a prompt loop.
    pub fn is_reprompt_allowed(&self) -> bool {
        matches!(
            self,
            Self::InvalidName { .. }
                | Self::InvalidStackName { .. }
                | Self::EmptyName
                | Self::StackAlreadyExists { .. }
                | Self::InvalidCount { .. }
                | Self::ExternalProcessesExceedMembers { .. }
        )
    }

    /// Returns true if this error was caused by user input rather than the environment
    pub fn is_validation_error(&self) -> bool {
        self.is_reprompt_allowed()
            || matches!(
                self,
                Self::UnknownOption { .. }
                    | Self::UnsupportedProvider { .. }
                    | Self::MissingRemoteNodeUrl { .. }
                    | Self::ManifestNotFound { .. }
            )
    }

    /// Returns the accepted alternatives, if this error lists any
    pub fn valid_choices(&self) -> Option<&[String]> {
        match self {
            Self::UnknownOption { valid, .. } => Some(valid),
            _ => None,
        }
    }

    /// Returns actionable guidance for the user
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::StackAlreadyExists { .. } => {
                Some("Pick another name or remove the existing stack first")
            }
            Self::ExternalProcessesExceedMembers { .. } => {
                Some("Lower --external or increase the member count")
            }
            Self::MissingRemoteNodeUrl { .. } => Some("Pass --remote-node-url <url>"),
            Self::ConfigInvalid { .. } => Some("Check YAML syntax in ~/.devstack/config.yaml"),
            Self::HomeNotFound => Some("Set DEVSTACK_HOME or pass --home"),
            _ => None,
        }
    }
}
