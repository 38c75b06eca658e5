use thiserror::Error;

use super::model::LocationId;

/// Fatal problems with the location catalog or its source file. Raised before
/// any simulation starts.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Location {0} has a non-positive capacity")]
    NonPositiveCapacity(LocationId),

    #[error("Duplicate location id: {0}")]
    DuplicateLocationId(LocationId),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
