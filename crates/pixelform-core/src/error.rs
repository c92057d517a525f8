//! Error types for transform operations.

use thiserror::Error;

/// Errors that can occur while running a transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Target size or buffer/stride invariants are invalid.
    #[error("Invalid dimensions: {0}")]
    InvalidDimension(String),

    /// An unrecognized resample-filter or convolution-kernel selector.
    #[error("Unsupported kernel: {0}")]
    UnsupportedKernel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TransformError::InvalidDimension("both targets are zero".to_string());
        assert_eq!(err.to_string(), "Invalid dimensions: both targets are zero");

        let err = TransformError::UnsupportedKernel("gauss7".to_string());
        assert_eq!(err.to_string(), "Unsupported kernel: gauss7");
    }
}
