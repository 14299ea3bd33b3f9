//! Accounting for one `read_file` call.
//!
//! One unit is outstanding for the read loop plus one per dispatched chunk
//! worker. When the count reaches zero every distinct error message collected
//! along the way is folded into a single result.
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use ndb_core::LineProcessor;

use crate::error::{IngestError, Result};
use crate::reader::ReadStats;
use crate::splitter::{process_chunk, ChunkOutcome};

struct WorkerReport {
    chunk: usize,
    outcome: ChunkOutcome,
}

pub(crate) struct Coordinator {
    workers: JoinSet<WorkerReport>,
    permits: Arc<Semaphore>,
    outstanding: usize,
    errors: Vec<String>,
    stats: ReadStats,
}

impl Coordinator {
    pub(crate) fn new(max_workers: usize) -> Self {
        Self {
            workers: JoinSet::new(),
            permits: Arc::new(Semaphore::new(max_workers)),
            outstanding: 1,
            errors: Vec::new(),
            stats: ReadStats::default(),
        }
    }

    /// Hand a trimmed chunk to a blocking worker. Waits while `max_workers`
    /// chunks are already in flight, which holds the read loop back.
    pub(crate) async fn dispatch(&mut self, chunk: Vec<u8>, processor: Arc<dyn LineProcessor>) {
        let permit = match Arc::clone(&self.permits).acquire_owned().await {
            Ok(permit) => permit,
            Err(e) => {
                self.record(format!("chunk dispatch: {}", e));
                return;
            }
        };
        let index = self.stats.chunks;
        self.stats.chunks += 1;
        self.stats.bytes += chunk.len() as u64;
        self.outstanding += 1;
        debug!(chunk = index, bytes = chunk.len(), outstanding = self.outstanding, "dispatching chunk");
        self.workers.spawn_blocking(move || {
            let _permit = permit;
            WorkerReport { chunk: index, outcome: process_chunk(&chunk, processor.as_ref()) }
        });
    }

    /// The read loop is done; `result` carries its I/O failure, if any.
    pub(crate) fn read_loop_finished(&mut self, result: std::result::Result<(), String>) {
        self.outstanding -= 1;
        if let Err(message) = result {
            warn!(error = %message, "read loop stopped early");
            self.record(message);
        }
    }

    /// Wait for every dispatched worker, then fold the collected errors.
    pub(crate) async fn finish(mut self, path: &Path) -> Result<ReadStats> {
        while let Some(joined) = self.workers.join_next().await {
            self.outstanding -= 1;
            match joined {
                Ok(WorkerReport { chunk, outcome }) => {
                    self.stats.lines += outcome.lines;
                    if let Some(message) = outcome.error {
                        warn!(chunk, lines_done = outcome.lines, error = %message, "chunk worker failed");
                        self.record(message);
                    }
                }
                Err(e) => self.record(format!("chunk worker did not complete: {}", e)),
            }
        }
        debug_assert_eq!(self.outstanding, 0, "read loop or worker never reported");

        if self.errors.is_empty() {
            debug!(chunks = self.stats.chunks, lines = self.stats.lines, "read complete");
            Ok(self.stats)
        } else {
            Err(IngestError::Aggregate { path: path.to_path_buf(), messages: self.errors })
        }
    }

    fn record(&mut self, message: String) {
        if !self.errors.contains(&message) {
            self.errors.push(message);
        }
    }
}
