//! Error types for focus arbitration.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FocusError {
    /// The request is missing its descriptor or listener. No state was changed.
    #[error("invalid focus request: {0}")]
    InvalidRequest(&'static str),
}

pub type FocusResult<T = ()> = Result<T, FocusError>;
