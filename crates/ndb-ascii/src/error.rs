use thiserror::Error;

use ndb_ingest::IngestError;

use crate::schema::Table;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("loading {}: {source}", .table.file_name())]
    Table {
        table: Table,
        source: IngestError,
    },

    #[error("search index builder did not finish: {0}")]
    IndexBuilder(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, LoadError>;
