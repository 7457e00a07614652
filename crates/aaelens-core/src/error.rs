use thiserror::Error;

/// Errors raised by tensor construction, numeric ops and checkpoint handling
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    #[error("Shape mismatch in operation '{operation}': expected {expected}, got {got}")]
    ShapeMismatch {
        operation: String,
        expected: String,
        got: String,
    },

    #[error("Invalid shape in operation '{operation}': {reason}")]
    InvalidShape {
        operation: String,
        reason: String,
        shape: Option<Vec<usize>>,
    },

    #[error("Invalid axis {axis} in operation '{operation}' for tensor with {ndim} dimensions")]
    InvalidAxis {
        operation: String,
        axis: usize,
        ndim: usize,
    },

    #[error("Invalid argument in operation '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },

    #[error("Serialization error in operation '{operation}': {details}")]
    SerializationError { operation: String, details: String },

    #[error("IO error in operation '{operation}': {details}")]
    IoError {
        operation: String,
        details: String,
        path: Option<String>,
    },
}

impl TensorError {
    /// Create a shape mismatch error
    pub fn shape_mismatch(operation: &str, expected: &str, got: &str) -> Self {
        Self::ShapeMismatch {
            operation: operation.to_string(),
            expected: expected.to_string(),
            got: got.to_string(),
        }
    }

    /// Create an invalid shape error carrying the offending shape
    pub fn invalid_shape(operation: &str, reason: &str, shape: &[usize]) -> Self {
        Self::InvalidShape {
            operation: operation.to_string(),
            reason: reason.to_string(),
            shape: Some(shape.to_vec()),
        }
    }

    /// Create an invalid shape error without operation context
    pub fn invalid_shape_simple(reason: String) -> Self {
        Self::InvalidShape {
            operation: "unknown".to_string(),
            reason,
            shape: None,
        }
    }

    pub fn invalid_axis(operation: &str, axis: usize, ndim: usize) -> Self {
        Self::InvalidAxis {
            operation: operation.to_string(),
            axis,
            ndim,
        }
    }

    /// Create an invalid argument error without operation context
    pub fn invalid_argument(reason: String) -> Self {
        Self::InvalidArgument {
            operation: "unknown".to_string(),
            reason,
        }
    }

    /// Create an invalid argument error for a named operation
    pub fn invalid_argument_op(operation: &str, reason: &str) -> Self {
        Self::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a serialization error without operation context
    pub fn serialization_error_simple(details: String) -> Self {
        Self::SerializationError {
            operation: "serialization".to_string(),
            details,
        }
    }

    pub fn serialization_error(operation: &str, details: &str) -> Self {
        Self::SerializationError {
            operation: operation.to_string(),
            details: details.to_string(),
        }
    }

    /// Wrap an IO error, keeping the path that caused it
    pub fn io_error(operation: &str, error: &std::io::Error, path: Option<&std::path::Path>) -> Self {
        Self::IoError {
            operation: operation.to_string(),
            details: error.to_string(),
            path: path.map(|p| p.display().to_string()),
        }
    }

    /// Name of the operation that failed
    pub fn operation(&self) -> &str {
        match self {
            Self::ShapeMismatch { operation, .. }
            | Self::InvalidShape { operation, .. }
            | Self::InvalidAxis { operation, .. }
            | Self::InvalidArgument { operation, .. }
            | Self::SerializationError { operation, .. }
            | Self::IoError { operation, .. } => operation,
        }
    }
}

pub type Result<T> = std::result::Result<T, TensorError>;
