mod confirmed_dir;

use std::path::{Component, Path, PathBuf};

use log::{debug, info, trace};
use thiserror::Error;

pub use confirmed_dir::ConfirmedDir;

/// Resolves cache keys to directories, creating them on first use.
pub trait CacheDirectory {
    fn confirmed_dir(&self, key: &str) -> Result<ConfirmedDir, CacheError>;
}

impl<C> CacheDirectory for &C
where
    C: CacheDirectory + ?Sized,
{
    fn confirmed_dir(&self, key: &str) -> Result<ConfirmedDir, CacheError> {
        (**self).confirmed_dir(key)
    }
}

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache location {location} does not exist")]
    BadLocation { location: String },
    #[error("Cache key `{key}` does not map to a directory inside the cache")]
    InvalidKey { key: String },
    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

/// Filesystem cache of repository checkouts, one directory per cache key.
///
/// No locking is performed: two processes acquiring the same key at the same
/// time may race.
#[derive(Debug, Clone)]
pub struct RepoCache {
    location: PathBuf,
}

impl RepoCache {
    pub fn new(location: PathBuf) -> Result<RepoCache, CacheError> {
        if location.exists() {
            if !location.is_dir() {
                return Err(CacheError::BadLocation {
                    location: location.to_str().unwrap_or("").to_string(),
                });
            }
        } else {
            debug!("Creating cache location {}", location.display());
            std::fs::create_dir_all(&location)?;
        }

        Ok(RepoCache { location })
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn clear(&self) -> Result<(), CacheError> {
        if self.location.exists() {
            info!(
                "Clearing repofetch repository cache {}.",
                self.location.display()
            );
            std::fs::remove_dir_all(&self.location)?;
        }
        Ok(())
    }

    fn entry_path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && key
                .split('/')
                .all(|segment| !matches!(segment, "" | "." | ".."))
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));
        if !is_plain {
            return Err(CacheError::InvalidKey {
                key: key.to_string(),
            });
        }
        Ok(self.location.join(relative))
    }
}

impl CacheDirectory for RepoCache {
    fn confirmed_dir(&self, key: &str) -> Result<ConfirmedDir, CacheError> {
        let path = self.entry_path(key)?;
        if path.is_dir() {
            trace!("Found cache entry {} at {}", key, path.display());
        } else {
            debug!("Creating cache entry {} at {}", key, path.display());
            std::fs::create_dir_all(&path)?;
        }
        Ok(ConfirmedDir::assume_exists(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn creates_missing_location() {
        let temp = tempfile::tempdir().unwrap();
        let location = temp.path().join("nested/cache");
        let cache = RepoCache::new(location.clone()).unwrap();
        assert!(location.is_dir());
        assert_eq!(cache.location(), location.as_path());
    }

    #[test]
    fn rejects_file_location() {
        let temp = tempfile::tempdir().unwrap();
        let location = temp.path().join("cache");
        std::fs::write(&location, "not a directory").unwrap();
        assert!(matches!(
            RepoCache::new(location),
            Err(CacheError::BadLocation { .. })
        ));
    }

    #[test]
    fn confirmed_dir_is_created_and_stable() {
        let temp = tempfile::tempdir().unwrap();
        let cache = RepoCache::new(temp.path().to_path_buf()).unwrap();

        let first = cache.confirmed_dir("example/repomaster").unwrap();
        let second = cache.confirmed_dir("example/repomaster").unwrap();

        assert_eq!(first, second);
        assert_eq!(first.path(), temp.path().join("example/repomaster"));
        assert!(first.path().is_dir());
    }

    #[test]
    fn different_keys_get_different_directories() {
        let temp = tempfile::tempdir().unwrap();
        let cache = RepoCache::new(temp.path().to_path_buf()).unwrap();

        let master = cache.confirmed_dir("example/repomaster").unwrap();
        let tag = cache.confirmed_dir("example/repov1.0.0").unwrap();

        assert_ne!(master, tag);
    }

    #[test]
    fn rejects_keys_escaping_the_cache() {
        let temp = tempfile::tempdir().unwrap();
        let cache = RepoCache::new(temp.path().join("cache")).unwrap();

        for key in ["", "../escape", "org//repo", "/etc/passwd", "org/./repo"] {
            assert!(
                matches!(
                    cache.confirmed_dir(key),
                    Err(CacheError::InvalidKey { .. })
                ),
                "key {key:?} should be rejected"
            );
        }
        assert!(!temp.path().join("escape").exists());
    }

    #[test]
    fn clear_removes_everything() {
        let temp = tempfile::tempdir().unwrap();
        let location = temp.path().join("cache");
        let cache = RepoCache::new(location.clone()).unwrap();
        cache.confirmed_dir("org/repomaster").unwrap();

        cache.clear().unwrap();

        assert!(!location.exists());
        cache.clear().unwrap();
    }
}
