//! Error types for the progressive renderer.
//!
//! This module defines all error types that can occur while driving a render
//! session: caller mistakes (bad arguments, out-of-order calls) and failures
//! reported by the raster backend.

use crate::rendering::{RenderTarget, SessionState};

/// Result type alias for renderer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during progressive rendering.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// An argument was rejected before any work was done
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation called in a session state that does not allow it
    #[error("Invalid state: cannot {operation} while session is {state}")]
    InvalidState {
        /// Operation that was attempted
        operation: &'static str,
        /// State the session was in
        state: SessionState,
    },

    /// The raster backend could not allocate or paint
    #[error("Backend failure{}: {reason}", work_unit_suffix(.object))]
    Backend {
        /// Cursor position of the work unit that failed, if any
        object: Option<usize>,
        /// Reason reported by the backend
        reason: String,
    },
}

fn work_unit_suffix(object: &Option<usize>) -> String {
    match object {
        Some(index) => format!(" at work unit {}", index),
        None => String::new(),
    }
}

impl Error {
    /// Create a backend error that is not tied to a work unit.
    pub fn backend(reason: impl Into<String>) -> Self {
        Error::Backend {
            object: None,
            reason: reason.into(),
        }
    }

    /// Attach the failing cursor position to a backend error.
    pub(crate) fn at_work_unit(self, index: usize) -> Self {
        match self {
            Error::Backend { reason, .. } => Error::Backend {
                object: Some(index),
                reason,
            },
            other => other,
        }
    }

    /// True for errors caused by calling the session out of order.
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState { .. })
    }
}

/// Failure of [`RenderSession::start`](crate::rendering::RenderSession::start).
///
/// A rejected start hands the target back in `target`. If the start was
/// accepted and the backend failed while painting, `target` is `None` and
/// the partial buffer is returned by `close`.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct StartError {
    /// What went wrong
    pub error: Error,
    /// The caller's target, when the session did not take it
    pub target: Option<RenderTarget>,
}

impl StartError {
    pub(crate) fn rejected(error: Error, target: RenderTarget) -> Self {
        Self {
            error,
            target: Some(target),
        }
    }

    pub(crate) fn failed(error: Error) -> Self {
        Self { error, target: None }
    }

    /// Take back the target of a rejected start.
    pub fn into_target(self) -> Option<RenderTarget> {
        self.target
    }

    /// True for errors caused by calling the session out of order.
    pub fn is_invalid_state(&self) -> bool {
        self.error.is_invalid_state()
    }
}

impl From<StartError> for Error {
    fn from(err: StartError) -> Self {
        err.error
    }
}
