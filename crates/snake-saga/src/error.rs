use std::fmt::Debug;

use thiserror::Error;

/// Error from a failed compensation operation.
#[derive(Debug, thiserror::Error)]
#[error("compensation failed for action '{action}' at position {position}: {description}")]
pub struct CompensationError<E> {
    /// Name of the action whose compensation failed.
    pub action: String,
    /// Registry position of that action.
    pub position: usize,
    /// Description of what the compensation was trying to do.
    pub description: String,
    /// The underlying error.
    #[source]
    pub error: E,
}

/// Error from committing a saga.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SagaError<E: Debug> {
    /// An action failed to apply and every compensation succeeded.
    #[error("action '{action}' at position {position} failed")]
    ApplyFailed {
        /// Name of the action that failed.
        action: String,
        /// Registry position of the failed action.
        position: usize,
        /// The error returned by the failed apply, untouched.
        #[source]
        source: E,
    },

    /// One or more compensations failed.
    ///
    /// Raised during the rollback after an apply failure, or during a forced
    /// rollback after a fully successful run (then `failed_action` and
    /// `apply_error` are `None`).
    #[error("{} compensation(s) failed{}", compensation_errors.len(), rollback_cause(failed_action.as_deref()))]
    CompensationFailed {
        /// Name of the action whose apply failed, if any.
        failed_action: Option<String>,
        /// The error returned by the failed apply, if any.
        apply_error: Option<E>,
        /// Errors from failed compensations, in rollback order.
        compensation_errors: Vec<CompensationError<E>>,
    },

    /// The saga was already committed; a saga runs at most once.
    #[error("saga was already committed")]
    AlreadyCommitted,
}

fn rollback_cause(failed_action: Option<&str>) -> String {
    match failed_action {
        Some(action) => format!(" while rolling back action '{action}'"),
        None => String::new(),
    }
}

impl<E: Debug> SagaError<E> {
    /// The error returned by the apply that failed, if one did.
    #[must_use]
    pub fn apply_error(&self) -> Option<&E> {
        match self {
            Self::ApplyFailed { source, .. } => Some(source),
            Self::CompensationFailed { apply_error, .. } => apply_error.as_ref(),
            Self::AlreadyCommitted => None,
        }
    }

    /// Take back the error returned by the apply that failed, if one did.
    #[must_use]
    pub fn into_apply_error(self) -> Option<E> {
        match self {
            Self::ApplyFailed { source, .. } => Some(source),
            Self::CompensationFailed { apply_error, .. } => apply_error,
            Self::AlreadyCommitted => None,
        }
    }

    /// Compensation failures collected during rollback.
    #[must_use]
    pub fn compensation_errors(&self) -> &[CompensationError<E>] {
        match self {
            Self::CompensationFailed {
                compensation_errors,
                ..
            } => compensation_errors,
            Self::ApplyFailed { .. } | Self::AlreadyCommitted => &[],
        }
    }
}
