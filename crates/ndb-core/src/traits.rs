/// Receives one line of a flat file at a time.
///
/// Chunk workers call `process` concurrently, so implementations must be
/// `Send + Sync` and serialize any shared state themselves. Returning an error
/// stops the calling worker; other workers keep going.
pub trait LineProcessor: Send + Sync {
    fn process(&self, line: &str) -> anyhow::Result<()>;
}

impl<F> LineProcessor for F
where
    F: Fn(&str) -> anyhow::Result<()> + Send + Sync,
{
    fn process(&self, line: &str) -> anyhow::Result<()> {
        self(line)
    }
}
