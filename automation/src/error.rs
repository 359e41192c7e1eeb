//! Standardized error handling for the automation engine.
//!
//! Not-found tracked entities and empty pending sets are deliberately not
//! errors: the orchestrators treat them as silent no-ops. Only store I/O,
//! timeouts and misconfigured flow templates surface here.

use std::time::Duration;

use thiserror::Error;

use crate::flows::EntityKind;

#[derive(Debug, Error)]
pub enum AutomationError {
    /// A flow node is configured to produce an entity kind the engine has
    /// no materializer for yet. Surfaced distinctly so operators can spot
    /// misconfigured flow templates.
    #[error("automation target '{0}' is not implemented")]
    UnimplementedTarget(EntityKind),

    /// A query, insert or update against the document store failed. The
    /// original cause is preserved for logging.
    #[error("automation store error")]
    Store(#[from] sqlx::Error),

    /// A persisted document could not be decoded into its model.
    #[error("malformed stored document: {0}")]
    Decode(#[source] serde_json::Error),

    /// An orchestrator run exceeded its configured deadline. Retryable.
    #[error("automation run timed out after {0:?}")]
    Timeout(Duration),

    #[error("internal automation error: {0}")]
    Internal(String),
}

impl AutomationError {
    /// Whether the caller may safely retry the whole orchestrator call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

pub type AutomationResult<T> = Result<T, AutomationError>;
