//! In-memory parse cache shared by the pipeline's workers.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;

use sassguide_syntax::{parse_with_options, ParseOptions, ParseResult, StyleSheet};

#[derive(Debug)]
struct CacheEntry {
    hash: blake3::Hash,
    sheet: Arc<StyleSheet>,
}

/// Parsed trees keyed by path and BLAKE3 content hash.
///
/// An entry whose content hash no longer matches is replaced on the next parse.
/// Cloning the cache shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct ParseCache {
    entries: Arc<Mutex<HashMap<PathBuf, CacheEntry>>>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The cached tree for `path` if `source` is unchanged, otherwise a fresh parse.
    /// Parse failures are not cached.
    pub fn get_or_parse(
        &self,
        path: &Path,
        source: &str,
        options: ParseOptions,
    ) -> ParseResult<Arc<StyleSheet>> {
        let hash = blake3::hash(source.as_bytes());
        if let Some(entry) = self.lock().get(path) {
            if entry.hash == hash {
                trace!("Parse cache hit for {:?}", path);
                return Ok(Arc::clone(&entry.sheet));
            }
        }

        let sheet = Arc::new(parse_with_options(source, options)?);
        self.lock().insert(
            path.to_path_buf(),
            CacheEntry {
                hash,
                sheet: Arc::clone(&sheet),
            },
        );
        Ok(sheet)
    }

    pub fn invalidate(&self, path: &Path) {
        self.lock().remove(path);
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
