use std::borrow::Cow;

use ndb_core::LineProcessor;

/// Splits a chunk into lines on `\n`, dropping a `\r` right before it.
///
/// Blank lines come through as empty slices. Bytes after the last `\n` form a
/// final unterminated line and are returned untouched.
pub struct LineSplitter<'a> {
    rest: &'a [u8],
}

impl<'a> LineSplitter<'a> {
    pub fn new(chunk: &'a [u8]) -> Self {
        Self { rest: chunk }
    }
}

impl<'a> Iterator for LineSplitter<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.is_empty() {
            return None;
        }
        match self.rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                let line = &self.rest[..i];
                self.rest = &self.rest[i + 1..];
                Some(line.strip_suffix(b"\r").unwrap_or(line))
            }
            None => Some(std::mem::take(&mut self.rest)),
        }
    }
}

/// What one chunk worker did before it stopped.
#[derive(Debug)]
pub(crate) struct ChunkOutcome {
    pub lines: usize,
    pub error: Option<String>,
}

/// Feed each line of `chunk` to `processor` in order, stopping at the first error.
pub(crate) fn process_chunk(chunk: &[u8], processor: &dyn LineProcessor) -> ChunkOutcome {
    let mut lines = 0;
    for raw in LineSplitter::new(chunk) {
        let line: Cow<'_, str> = String::from_utf8_lossy(raw);
        if let Err(e) = processor.process(&line) {
            return ChunkOutcome { lines, error: Some(format!("{:#}", e)) };
        }
        lines += 1;
    }
    ChunkOutcome { lines, error: None }
}
