//! Error types for the materialization pipeline.

use std::time::Duration;

use silt_core::DirectiveError;
use silt_delta::WriteError;
use silt_uc::CatalogError;

use crate::engine::EngineError;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors surfaced by [`crate::Materializer`].
///
/// Lower-layer errors pass through unchanged; the pipeline adds only the
/// supervision outcomes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The directive failed to parse.
    #[error(transparent)]
    Directive(#[from] DirectiveError),

    /// A catalog round trip failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// The write strategy engine failed. When the same invocation created
    /// the catalog entry, compensation already ran before this surfaced.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// The query engine failed to execute the residual select.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The store operation did not finish within its budget.
    ///
    /// This is an *unknown outcome*, not a failure: the operation was
    /// abandoned, keeps running without a caller-visible handle, and may
    /// still mutate durable state after this error is observed.
    #[error("store operation did not finish within {budget:?}; outcome unknown")]
    TimedOut {
        /// The budget that elapsed.
        budget: Duration,
    },

    /// An internal error that should not happen in normal operation.
    #[error("internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl StoreError {
    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
