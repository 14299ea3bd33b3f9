//! ndb-ingest
//!
//! Streams large line-oriented files through bounded memory. The file is read
//! in fixed-size chunks trimmed back to the last full line; each chunk is
//! split into lines on a blocking worker and every line is handed to a
//! caller-supplied [`LineProcessor`]. See `reader` for the read loop,
//! `splitter` for line framing and `coordinator` for worker accounting.
#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

mod coordinator;
pub mod error;
pub mod reader;
pub mod splitter;

use std::path::Path;

pub use error::{IngestError, Result};
pub use ndb_core::config::ReaderSettings;
pub use ndb_core::LineProcessor;
pub use reader::{ChunkReader, ReadStats};
pub use splitter::LineSplitter;

/// Read `path` with default settings, feeding every line to `processor`.
pub async fn read_file<P, F>(path: P, processor: F) -> Result<ReadStats>
where
    P: AsRef<Path>,
    F: LineProcessor + 'static,
{
    ChunkReader::default().read_file(path, processor).await
}

/// Blocking variant for callers without a runtime; builds a fresh one per call.
pub fn read_file_blocking<P, F>(path: P, processor: F, settings: ReaderSettings) -> Result<ReadStats>
where
    P: AsRef<Path>,
    F: LineProcessor + 'static,
{
    let reader = ChunkReader::new(settings)?;
    let rt = tokio::runtime::Runtime::new().map_err(IngestError::Runtime)?;
    rt.block_on(reader.read_file(path, processor))
}
