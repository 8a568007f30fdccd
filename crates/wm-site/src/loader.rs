//! Page loading with in-memory caching.
//!
//! [`PageLoader`] reads a content file once, splits off its front matter,
//! validates it, and keeps both the metadata and the raw bytes for the rest of
//! the build. Metadata can then be inspected (e.g. by a page listing in some
//! other page's template) without re-reading or rendering the file.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use wm_meta::{MetadataError, PageMetadata};

use crate::paths::normalize_path;

/// Error returned when a content file cannot be loaded.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("Error opening file {}: {source}", path.display())]
    Io {
        /// Normalized file path.
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The front matter failed to parse or validate.
    #[error("Error while loading metadata for {}: {source}", path.display())]
    Metadata {
        /// Normalized file path.
        path: PathBuf,
        #[source]
        source: MetadataError,
    },
}

impl LoadError {
    /// Path of the file that failed to load.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Metadata { path, .. } => path,
        }
    }
}

/// One loaded content file. Never mutated after creation.
#[derive(Debug)]
struct CacheEntry {
    meta: PageMetadata,
    bytes: Arc<[u8]>,
}

/// Loader for page content files.
///
/// Entries are keyed by the lexically normalized path, so `content/a.md` and
/// `content/./a.md` share one entry. Entries are never evicted.
///
/// The cache sits behind a [`Mutex`] so the loader can be shared with template
/// helper functions, which must be `Send + Sync`.
#[derive(Debug, Default)]
pub struct PageLoader {
    cache: Mutex<HashMap<PathBuf, Arc<CacheEntry>>>,
}

impl PageLoader {
    /// Create an empty loader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Metadata of the file at `path`.
    ///
    /// Returns a fresh copy on every call; mutating it does not affect the
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on I/O failures and metadata parse or validation
    /// errors.
    pub fn get_metadata(&self, path: impl AsRef<Path>) -> Result<PageMetadata, LoadError> {
        Ok(self.get_or_load(path.as_ref())?.meta.clone())
    }

    /// Complete raw content of the file at `path`, front matter included.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError`] on I/O failures and metadata parse or validation
    /// errors.
    pub fn load_raw(&self, path: impl AsRef<Path>) -> Result<Arc<[u8]>, LoadError> {
        Ok(Arc::clone(&self.get_or_load(path.as_ref())?.bytes))
    }

    /// Whether the file at `path` has already been loaded.
    pub fn is_cached(&self, path: impl AsRef<Path>) -> bool {
        self.lock().contains_key(&normalize_path(path))
    }

    /// Number of cached files.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been loaded yet.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Arc<CacheEntry>>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_load(&self, path: &Path) -> Result<Arc<CacheEntry>, LoadError> {
        let key = normalize_path(path);
        let mut cache = self.lock();

        if let Some(entry) = cache.get(&key) {
            return Ok(Arc::clone(entry));
        }

        tracing::debug!(path = %key.display(), "Page cache miss");
        let entry = Arc::new(load_entry(&key)?);
        cache.insert(key, Arc::clone(&entry));
        Ok(entry)
    }
}

/// Read a file and parse its front matter.
fn load_entry(path: &Path) -> Result<CacheEntry, LoadError> {
    let data = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let meta = PageMetadata::from_content(&data).map_err(|source| LoadError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), title = %meta.title, "Metadata loaded");

    Ok(CacheEntry {
        meta,
        bytes: data.into(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_get_metadata_parses_front_matter() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(
            temp_dir.path(),
            "post.md",
            "---\ntitle: Post\ntemplate: post.html\n---\n# Post\n",
        );

        let loader = PageLoader::new();
        let meta = loader.get_metadata(&path).unwrap();
        assert_eq!(meta.title, "Post");
        assert_eq!(meta.template.as_deref(), Some("post.html"));
        assert!(!meta.draft);
    }

    #[test]
    fn test_no_front_matter_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(temp_dir.path(), "plain.md", "# Plain\n");

        let loader = PageLoader::new();
        assert_eq!(loader.get_metadata(&path).unwrap(), PageMetadata::default());
    }

    #[test]
    fn test_returned_metadata_is_independent() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(temp_dir.path(), "a.md", "---\ntitle: Original\n---\n");

        let loader = PageLoader::new();
        let mut first = loader.get_metadata(&path).unwrap();
        first.title = "Changed".to_owned();
        first.extra.insert("x".to_owned(), serde_json::json!(1));

        let second = loader.get_metadata(&path).unwrap();
        assert_eq!(second.title, "Original");
        assert!(second.extra.is_empty());
    }

    #[test]
    fn test_load_raw_returns_whole_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let content = "---\ntitle: A\n---\nbody\n";
        let path = write(temp_dir.path(), "a.md", content);

        let loader = PageLoader::new();
        assert_eq!(&*loader.load_raw(&path).unwrap(), content.as_bytes());
    }

    #[test]
    fn test_cache_survives_file_changes() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(temp_dir.path(), "a.md", "---\ntitle: First\n---\none\n");

        let loader = PageLoader::new();
        let meta = loader.get_metadata(&path).unwrap();
        let raw = loader.load_raw(&path).unwrap();

        fs::write(&path, "---\ntitle: Second\n---\ntwo\n").unwrap();

        assert_eq!(loader.get_metadata(&path).unwrap(), meta);
        assert_eq!(loader.load_raw(&path).unwrap(), raw);
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn test_cache_key_is_normalized() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::create_dir(temp_dir.path().join("sub")).unwrap();
        let path = write(temp_dir.path(), "a.md", "# A\n");
        let detour = temp_dir.path().join("sub/.././a.md");

        let loader = PageLoader::new();
        loader.get_metadata(&path).unwrap();
        assert!(loader.is_cached(&detour));
        loader.load_raw(&detour).unwrap();
        assert_eq!(loader.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("missing.md");

        let loader = PageLoader::new();
        let err = loader.get_metadata(&path).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }), "{err:?}");
        assert_eq!(err.path(), normalize_path(&path).as_path());
        assert!(loader.is_empty());
    }

    #[test]
    fn test_invalid_metadata_is_metadata_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(temp_dir.path(), "bad.md", "---\ndraft: sometimes\n---\n");

        let loader = PageLoader::new();
        let err = loader.load_raw(&path).unwrap_err();
        assert!(
            matches!(
                err,
                LoadError::Metadata {
                    source: MetadataError::Validation(_),
                    ..
                }
            ),
            "{err:?}"
        );
        assert!(err.to_string().contains("bad.md"));
        assert!(!loader.is_cached(&path));
    }

    #[test]
    fn test_unbalanced_marker_yields_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = write(temp_dir.path(), "a.md", "---\ntitle: [broken\nbody\n");

        let loader = PageLoader::new();
        assert_eq!(loader.get_metadata(&path).unwrap(), PageMetadata::default());
    }
}
