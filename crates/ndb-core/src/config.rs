//! Layered configuration and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys, so
//! `APP_READER__CHUNK_SIZE=4096` sets `reader.chunk_size`).
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Bytes read per chunk unless configured otherwise.
pub const DEFAULT_CHUNK_SIZE: usize = 524_288;
pub const DEFAULT_ASCIIDB_DIR: &str = "../dev_data/asciidb";

/// Tuning for the chunked line reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Size of each read; chunks are trimmed back to the last full line.
    pub chunk_size: usize,
    /// Upper bound on chunk workers running at once.
    pub max_workers: usize,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        let max_workers = std::thread::available_parallelism().map(NonZeroUsize::get).unwrap_or(4);
        Self { chunk_size: DEFAULT_CHUNK_SIZE, max_workers }
    }
}

impl ReaderSettings {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidConfig("reader.chunk_size must be greater than zero".into()));
        }
        if self.max_workers == 0 {
            return Err(Error::InvalidConfig("reader.max_workers must be greater than zero".into()));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
}

impl Config {
    /// Load from the current directory, selecting the env file by `RUST_ENV`.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    pub fn load_from(dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Self::defaults().merge(Toml::file(dir.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.validate()?;
        Ok(config)
    }

    /// Wrap an already-assembled figment; the built-in defaults sit underneath it.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config = Self { figment: Self::defaults().merge(figment) };
        config.validate()?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn reader_settings(&self) -> Result<ReaderSettings> {
        let settings: ReaderSettings = self.figment.extract_inner("reader")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Directory holding the ASCII database dump, with `~` and `$VAR` expanded.
    pub fn asciidb_dir(&self) -> Result<PathBuf> {
        let dir: String = self.figment.extract_inner("data.asciidb_dir")?;
        Ok(expand_path(dir))
    }

    fn defaults() -> Figment {
        Figment::from(Serialized::default("reader", ReaderSettings::default()))
            .merge(Serialized::default("data.asciidb_dir", DEFAULT_ASCIIDB_DIR))
    }

    fn validate(&self) -> Result<()> {
        self.reader_settings().map(|_| ())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
