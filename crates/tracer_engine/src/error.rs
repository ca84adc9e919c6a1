//! Shading pipeline errors.

use thiserror::Error;

/// Errors raised by a trace or by ray generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShadingError {
    /// A trace found a hit, but the pipeline has neither an any-hit nor a
    /// closest-hit shader to resolve it.
    #[error("closest-hit shader not installed")]
    MissingClosestHit,
}

pub type ShadingResult<T> = Result<T, ShadingError>;
