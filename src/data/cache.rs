use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::error::LoadError;
use super::model::Dataset;

/// Lifetime of a cached snapshot when none is configured.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct Entry {
    path: PathBuf,
    version: u64,
    loaded_at: Instant,
    dataset: Arc<Dataset>,
}

/// Holds at most one loaded dataset snapshot.
///
/// A snapshot is reused while its `(path, version)` key matches the request
/// and it is younger than `ttl`. Bumping the version token or calling
/// [`invalidate`](Self::invalidate) forces the next request to reload.
/// Failed loads are never cached.
pub struct DatasetCache {
    ttl: Duration,
    entry: Option<Entry>,
}

impl Default for DatasetCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl DatasetCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entry: None }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached snapshot for `(path, version)` or load a new one.
    pub fn get_or_load<F>(
        &mut self,
        path: &Path,
        version: u64,
        load: F,
    ) -> Result<Arc<Dataset>, LoadError>
    where
        F: FnOnce(&Path) -> Result<Dataset, LoadError>,
    {
        self.get_or_load_at(Instant::now(), path, version, load)
    }

    fn get_or_load_at<F>(
        &mut self,
        now: Instant,
        path: &Path,
        version: u64,
        load: F,
    ) -> Result<Arc<Dataset>, LoadError>
    where
        F: FnOnce(&Path) -> Result<Dataset, LoadError>,
    {
        if let Some(entry) = &self.entry {
            let fresh = now.saturating_duration_since(entry.loaded_at) < self.ttl;
            if fresh && entry.version == version && entry.path.as_path() == path {
                log::trace!("dataset cache hit for {} (version {version})", path.display());
                return Ok(Arc::clone(&entry.dataset));
            }
        }

        log::debug!("dataset cache miss for {} (version {version})", path.display());
        let dataset = Arc::new(load(path)?);
        self.entry = Some(Entry {
            path: path.to_path_buf(),
            version,
            loaded_at: now,
            dataset: Arc::clone(&dataset),
        });
        Ok(dataset)
    }

    /// Drop the cached snapshot.
    pub fn invalidate(&mut self) {
        if self.entry.take().is_some() {
            log::debug!("dataset cache invalidated");
        }
    }
}
