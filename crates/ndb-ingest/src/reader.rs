use std::io::{self, SeekFrom};
use std::path::Path;
use std::sync::Arc;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{info, warn};

use ndb_core::config::{Config, ReaderSettings};
use ndb_core::LineProcessor;

use crate::coordinator::Coordinator;
use crate::error::{IngestError, Result};

/// Totals for a completed read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub chunks: usize,
    pub lines: usize,
    pub bytes: u64,
}

/// Reads a file in line-aligned chunks and fans them out to parallel workers.
///
/// The read loop is sequential and owns the only cursor. Lines within a chunk
/// reach the processor in file order; chunks may finish in any order.
#[derive(Debug, Clone, Default)]
pub struct ChunkReader {
    settings: ReaderSettings,
}

impl ChunkReader {
    pub fn new(settings: ReaderSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.reader_settings()?)
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    pub async fn read_file<P, F>(&self, path: P, processor: F) -> Result<ReadStats>
    where
        P: AsRef<Path>,
        F: LineProcessor + 'static,
    {
        self.read_file_shared(path, Arc::new(processor)).await
    }

    /// Like [`ChunkReader::read_file`] for a processor the caller keeps a handle to.
    pub async fn read_file_shared<P>(&self, path: P, processor: Arc<dyn LineProcessor>) -> Result<ReadStats>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let mut file = File::open(path)
            .await
            .map_err(|source| IngestError::Open { path: path.to_path_buf(), source })?;

        let mut coordinator = Coordinator::new(self.settings.max_workers);
        let fed = self.feed(&mut file, &processor, &mut coordinator).await;
        coordinator.read_loop_finished(fed.map_err(|e| format!("reading {}: {}", path.display(), e)));
        let stats = coordinator.finish(path).await?;
        info!(path = %path.display(), chunks = stats.chunks, lines = stats.lines, bytes = stats.bytes, "file ingested");
        Ok(stats)
    }

    async fn feed(
        &self,
        file: &mut File,
        processor: &Arc<dyn LineProcessor>,
        coordinator: &mut Coordinator,
    ) -> io::Result<()> {
        let chunk_size = self.settings.chunk_size;
        let mut buf = vec![0u8; chunk_size];
        loop {
            let n = fill(file, &mut buf).await?;
            if n == 0 {
                return Ok(());
            }

            // A short read means EOF, so the tail is dispatched whole even
            // without a trailing terminator.
            let keep = if n < buf.len() {
                n
            } else {
                match last_line_end(&buf[..n]) {
                    Some(end) => end,
                    None => {
                        let grown = buf.len() * 2;
                        warn!(line_prefix_bytes = n, grown, "line exceeds chunk size, growing read buffer");
                        file.seek(SeekFrom::Current(-(n as i64))).await?;
                        buf.resize(grown, 0);
                        continue;
                    }
                }
            };
            if keep < n {
                file.seek(SeekFrom::Current(-((n - keep) as i64))).await?;
            }

            coordinator.dispatch(buf[..keep].to_vec(), Arc::clone(processor)).await;
            if buf.len() != chunk_size {
                buf.truncate(chunk_size);
            }
        }
    }
}

/// Offset just past the last `\n` in `chunk`, if there is one.
pub fn last_line_end(chunk: &[u8]) -> Option<usize> {
    chunk.iter().rposition(|&b| b == b'\n').map(|i| i + 1)
}

/// Read until `buf` is full or the file is exhausted.
async fn fill(file: &mut File, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match file.read(&mut buf[filled..]).await {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
