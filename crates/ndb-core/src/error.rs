use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A setting was read but its value is unusable.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A layer could not be read or did not match the expected shape.
    #[error("Failed to extract configuration: {0}")]
    Extract(#[from] figment::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
