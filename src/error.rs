use thiserror::Error;

/// Failures that can escape [`crate::Signal::new`], [`crate::TimeAxis::new`],
/// [`crate::Options::validate`], or [`crate::Decomposer::decompose`].
///
/// Most of the soft-failure paths named in the decomposition's state machine
/// (amplitude underflow, hitting `maxiter`, running out of extrema mid-mode)
/// never construct one of these: they are resolved internally and, where the
/// algorithm calls for a warning, surfaced through the `log` crate instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmdError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("not enough extrema to continue sifting this mode")]
    InsufficientExtrema,

    #[error("internal invariant violated: {0}")]
    InternalInvariantViolated(String),
}
