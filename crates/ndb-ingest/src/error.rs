use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("read_file({}): {source}", .path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Every distinct failure from one `read_file` call, processor and I/O alike.
    #[error("read_file({}) encountered the following errors:\n\t{}", .path.display(), .messages.join("\n\t"))]
    Aggregate { path: PathBuf, messages: Vec<String> },

    #[error(transparent)]
    Config(#[from] ndb_core::Error),

    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl IngestError {
    /// Individual messages behind an aggregate; empty for other variants.
    pub fn messages(&self) -> &[String] {
        match self {
            IngestError::Aggregate { messages, .. } => messages,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, IngestError>;
