//! Errors of whole-buffer LUT application.

use thiserror::Error;

/// Why a buffer could not be graded.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Buffer length or image size is unusable.
    #[error("invalid buffer: {0}")]
    InvalidDimensions(String),

    /// Channel layout the evaluator cannot take.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Layout or atlas rejected by the LUT crate.
    #[error(transparent)]
    Lut(#[from] tlut_lut::LutError),
}

/// Result of a grading call.
pub type OpsResult<T> = Result<T, OpsError>;
