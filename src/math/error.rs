// src/math/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Insufficient points for operation: expected at least {expected}, got {actual}")]
    InsufficientPoints { expected: usize, actual: usize },

    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Boolean polygon operation failed: {operation}")]
    BooleanOperationFailed { operation: String },

    #[error("No wall geometry has been computed for this scene.")]
    EmptyScene,
}

pub type GeometryResult<T> = Result<T, GeometryError>;
