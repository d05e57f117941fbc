//! Corpus access with an optional read-through cache.
//!
//! Without the cache every [`CorpusStore::load`] re-reads the file, so an
//! updated artifact is picked up on the next request. With the cache the
//! parsed corpus is reused until the file's modification time or length
//! changes.

use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use syllabus_core::config::CorpusSettings;
use syllabus_core::{Error, Result};

use crate::corpus::{load_corpus, Corpus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn of(path: &Path) -> Result<Self> {
        let meta = std::fs::metadata(path)
            .map_err(|e| Error::corpus(path, format!("cannot stat file: {e}")))?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

struct Cached {
    stamp: FileStamp,
    corpus: Arc<Corpus>,
}

pub struct CorpusStore {
    path: PathBuf,
    cache: Option<RwLock<Option<Cached>>>,
}

impl CorpusStore {
    /// A store that reads the file on every call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: None,
        }
    }

    /// A store that keeps the parsed corpus until the file changes.
    pub fn cached(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Some(RwLock::new(None)),
        }
    }

    /// Build from settings; relative paths resolve against `base`.
    pub fn from_settings(settings: &CorpusSettings, base: &Path) -> Self {
        let path = settings.resolved_path(base);
        if settings.cache {
            Self::cached(path)
        } else {
            Self::new(path)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    pub fn load(&self) -> Result<Arc<Corpus>> {
        let Some(cache) = &self.cache else {
            return load_corpus(&self.path).map(Arc::new);
        };

        let stamp = FileStamp::of(&self.path)?;
        {
            let guard = cache.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(hit) = guard.as_ref().filter(|c| c.stamp == stamp) {
                tracing::debug!(path = %self.path.display(), "corpus cache hit");
                return Ok(Arc::clone(&hit.corpus));
            }
        }

        let corpus = Arc::new(load_corpus(&self.path)?);
        let mut guard = cache.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = Some(Cached {
            stamp,
            corpus: Arc::clone(&corpus),
        });
        Ok(corpus)
    }

    /// Forget any cached corpus.
    pub fn invalidate(&self) {
        if let Some(cache) = &self.cache {
            *cache.write().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(path: &Path, body: &str) {
        let mut f = std::fs::File::create(path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f.sync_all().unwrap();
    }

    const ONE: &str = r#"[{"chunk_id": 1, "text": "one", "embedding": [1.0, 0.0]}]"#;
    const TWO: &str = r#"[{"chunk_id": 1, "text": "one", "embedding": [1.0, 0.0]},
                         {"chunk_id": 2, "text": "two", "embedding": [0.0, 1.0]}]"#;

    #[test]
    fn uncached_store_sees_every_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        write(&path, ONE);
        let store = CorpusStore::new(&path);
        assert_eq!(store.load().unwrap().len(), 1);
        write(&path, TWO);
        assert_eq!(store.load().unwrap().len(), 2);
    }

    #[test]
    fn cached_store_reuses_until_the_file_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        write(&path, ONE);
        let store = CorpusStore::cached(&path);
        let a = store.load().unwrap();
        let b = store.load().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        // Different length, so the stamp changes even on coarse mtime clocks.
        write(&path, TWO);
        let c = store.load().unwrap();
        assert_eq!(c.len(), 2);
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn invalidate_forces_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corpus.json");
        write(&path, ONE);
        let store = CorpusStore::cached(&path);
        let a = store.load().unwrap();
        store.invalidate();
        let b = store.load().unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(*a, *b);
    }

    #[test]
    fn missing_file_is_corpus_unavailable_in_both_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        for store in [CorpusStore::new(&path), CorpusStore::cached(&path)] {
            assert!(matches!(store.load(), Err(Error::CorpusUnavailable { .. })));
        }
    }

    #[test]
    fn from_settings_resolves_relative_paths() {
        let settings = CorpusSettings {
            path: "data/c.json".into(),
            cache: true,
        };
        let store = CorpusStore::from_settings(&settings, Path::new("/srv/app"));
        assert_eq!(store.path(), Path::new("/srv/app/data/c.json"));
        assert!(store.is_cached());
    }
}
