//! Modification-time cached configuration loading

use super::{ConfigError, LabDashConfig};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

/// A parsed configuration snapshot together with its generation number.
///
/// The generation increases every time the file is re-parsed, so callers
/// can cheaply tell whether derived state (the widget registry) is stale.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Arc<LabDashConfig>,
    pub generation: u64,
}

enum Source {
    File(PathBuf),
    Static(Arc<LabDashConfig>),
}

struct CachedConfig {
    config: Arc<LabDashConfig>,
    modified: Option<SystemTime>,
    generation: u64,
}

/// Loads the dashboard configuration, re-parsing only when the file changes.
///
/// # Example
///
/// ```no_run
/// use labdash::config::ConfigLoader;
///
/// let loader = ConfigLoader::new("labdash.toml");
/// let first = loader.load().unwrap();
/// let second = loader.load().unwrap();
/// // Unchanged file: same snapshot, same generation.
/// assert_eq!(first.generation, second.generation);
/// ```
pub struct ConfigLoader {
    source: Source,
    cache: RwLock<Option<CachedConfig>>,
}

impl ConfigLoader {
    /// Loader backed by a TOML file on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::File(path.into()),
            cache: RwLock::new(None),
        }
    }

    /// Loader that always returns the given configuration (generation 0).
    pub fn from_config(config: LabDashConfig) -> Self {
        Self {
            source: Source::Static(Arc::new(config)),
            cache: RwLock::new(None),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.source {
            Source::File(path) => Some(path),
            Source::Static(_) => None,
        }
    }

    /// Return the current configuration, re-reading the file if its
    /// modification time moved past the cached one.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let path = match &self.source {
            Source::Static(config) => {
                return Ok(LoadedConfig {
                    config: Arc::clone(config),
                    generation: 0,
                })
            }
            Source::File(path) => path,
        };

        let modified = file_modified(path)?;

        if let Some(loaded) = self.fresh_cached(modified) {
            return Ok(loaded);
        }

        let mut cache = self.cache.write().unwrap_or_else(|e| e.into_inner());

        // Another request may have reloaded while we waited for the lock.
        if let Some(cached) = cache.as_ref() {
            if !is_stale(cached.modified, modified) {
                return Ok(LoadedConfig {
                    config: Arc::clone(&cached.config),
                    generation: cached.generation,
                });
            }
        }

        let config = LabDashConfig::load(Some(path))?;
        config.validate()?;

        let generation = cache.as_ref().map(|c| c.generation + 1).unwrap_or(1);
        let config = Arc::new(config);

        tracing::info!(
            path = %path.display(),
            generation,
            widgets = config.widgets.len(),
            "Loaded configuration"
        );

        *cache = Some(CachedConfig {
            config: Arc::clone(&config),
            modified,
            generation,
        });

        Ok(LoadedConfig { config, generation })
    }

    fn fresh_cached(&self, modified: Option<SystemTime>) -> Option<LoadedConfig> {
        let cache = self.cache.read().unwrap_or_else(|e| e.into_inner());
        cache
            .as_ref()
            .filter(|cached| !is_stale(cached.modified, modified))
            .map(|cached| LoadedConfig {
                config: Arc::clone(&cached.config),
                generation: cached.generation,
            })
    }
}

/// A cache entry is stale when the file is newer, or when either timestamp
/// is unavailable.
fn is_stale(cached: Option<SystemTime>, current: Option<SystemTime>) -> bool {
    match (cached, current) {
        (Some(cached), Some(current)) => current > cached,
        _ => true,
    }
}

fn file_modified(path: &Path) -> Result<Option<SystemTime>, ConfigError> {
    match std::fs::metadata(path) {
        Ok(metadata) => Ok(metadata.modified().ok()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(ConfigError::NotFound(path.to_path_buf()))
        }
        Err(e) => Err(ConfigError::Io(e)),
    }
}
