use aaelens_core::TensorError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while configuring, loading or rendering diagnostics
#[derive(Error, Debug)]
pub enum AaeError {
    #[error(transparent)]
    Tensor(#[from] TensorError),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument for {operation}: {reason}")]
    InvalidArgument { operation: String, reason: String },

    #[error("No {0} loaded")]
    MissingModel(String),

    #[error("Failed to render {figure}: {reason}")]
    Render { figure: String, reason: String },
}

impl AaeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub fn render(figure: &str, reason: impl std::fmt::Display) -> Self {
        Self::Render {
            figure: figure.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AaeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tensor_errors_pass_through() {
        let err: AaeError = TensorError::invalid_argument("bad".to_string()).into();
        assert_eq!(err.to_string(), "Invalid argument in operation 'unknown': bad");
    }

    #[test]
    fn test_render_error_message() {
        let err = AaeError::render("learned_modes", "no font");
        assert_eq!(err.to_string(), "Failed to render learned_modes: no font");
    }
}
