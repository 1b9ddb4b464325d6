//! Parse-time error types for table-creation directives.

/// Result alias for directive parsing.
pub type Result<T> = std::result::Result<T, DirectiveError>;

/// Errors raised while parsing a table-creation directive.
///
/// All variants are local parse failures: they are never retried and never
/// reach the external catalog or storage layers.
#[derive(Debug, thiserror::Error)]
pub enum DirectiveError {
    /// The directive does not match the
    /// `CREATE EXTERNAL TABLE ... LOCATION ... AS SELECT ...` shape.
    #[error("invalid CREATE EXTERNAL TABLE AS SELECT directive: {message}")]
    InvalidDirectiveSyntax {
        /// Description of the shape mismatch.
        message: String,
    },

    /// The table name is not a three-part `catalog.schema.table` identifier.
    #[error("invalid table name: {message}")]
    InvalidTargetName {
        /// Description of what made the name invalid.
        message: String,
    },

    /// An `OPTIONS (...)` entry is not a `key=value` pair.
    #[error("invalid OPTIONS entry: {message}")]
    InvalidOptionSyntax {
        /// The offending entry.
        message: String,
    },
}

impl DirectiveError {
    /// Creates an invalid-directive error.
    #[must_use]
    pub fn invalid_directive(message: impl Into<String>) -> Self {
        Self::InvalidDirectiveSyntax {
            message: message.into(),
        }
    }

    /// Creates an invalid-target-name error.
    #[must_use]
    pub fn invalid_target_name(message: impl Into<String>) -> Self {
        Self::InvalidTargetName {
            message: message.into(),
        }
    }

    /// Creates an invalid-option error.
    #[must_use]
    pub fn invalid_option(message: impl Into<String>) -> Self {
        Self::InvalidOptionSyntax {
            message: message.into(),
        }
    }
}
