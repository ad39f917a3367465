//! A single named store and its backing file.

use std::collections::HashMap;
use std::error::Error as StdError;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::fs::{self, create_dir_all};
use std::hash::Hash;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};

use exn::{Exn, ResultExt};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::instrument;

use crate::error::{ErrorKind, Result};

/// Memoization store backed by one file.
///
/// The store is an explicit value owned by whoever performs lookups; there
/// is no process-wide registry. Two stores pointing at the same file do not
/// coordinate, and the last one to write wins.
///
/// # Examples
///
/// ```no_run
/// use cube_cache::CacheStore;
///
/// # #[derive(Debug, derive_more::Display, derive_more::Error)]
/// # struct Never;
/// let mut squares: CacheStore<(u64,), u64> = CacheStore::new("squares.cache");
/// let value = squares.get_or_try_insert_with((12,), || Ok::<_, exn::Exn<Never>>(12 * 12)).unwrap();
/// assert_eq!(value, 144);
/// ```
pub struct CacheStore<K, V> {
    name: String,
    path: PathBuf,
    entries: Option<HashMap<K, V>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash + Serialize + DeserializeOwned,
    V: Serialize + DeserializeOwned,
{
    /// Create a store for `path` without touching the file system; the file
    /// is loaded on first use.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| "cache".to_string());
        Self { name, path, entries: None }
    }

    /// Create a store and load its file immediately.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new(path);
        store.entries()?;
        Ok(store)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.entries.is_some()
    }

    pub fn len(&mut self) -> Result<usize> {
        Ok(self.entries()?.len())
    }

    pub fn is_empty(&mut self) -> Result<bool> {
        Ok(self.entries()?.is_empty())
    }

    pub fn get(&mut self, key: &K) -> Result<Option<&V>> {
        Ok(self.entries()?.get(key))
    }

    pub fn contains_key(&mut self, key: &K) -> Result<bool> {
        Ok(self.entries()?.contains_key(key))
    }

    /// Insert (or replace) an entry and write the whole store out.
    ///
    /// If the write fails the entry is rolled back, so memory never holds a
    /// value the backing file does not.
    pub fn put(&mut self, key: K, value: V) -> Result<()>
    where
        K: Clone,
    {
        let previous = self.entries()?.insert(key.clone(), value);
        if let Err(e) = self.flush() {
            let entries = self.entries()?;
            match previous {
                Some(previous) => entries.insert(key, previous),
                None => entries.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    /// Write every entry to the backing file.
    ///
    /// The new contents go to a temporary file in the same directory which
    /// then replaces the old file, so an interrupted write leaves the
    /// previous store intact.
    #[instrument(skip(self), fields(store = %self.name))]
    pub fn flush(&mut self) -> Result<()> {
        let path = self.path.clone();
        let bytes = bincode::serde::encode_to_vec(self.entries()?, bincode::config::standard())
            .or_raise(|| ErrorKind::InvalidData(path.clone()))?;
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        create_dir_all(&directory).or_raise(|| ErrorKind::Io(directory.clone()))?;
        let mut file = NamedTempFile::new_in(&directory).or_raise(|| ErrorKind::Io(directory.clone()))?;
        file.write_all(&bytes).or_raise(|| ErrorKind::Io(path.clone()))?;
        file.as_file().sync_all().or_raise(|| ErrorKind::Io(path.clone()))?;
        file.persist(&path).or_raise(|| ErrorKind::Io(path.clone()))?;
        tracing::trace!(bytes = bytes.len(), "Cache store written");
        Ok(())
    }

    /// Return the stored value for `key`, or run `compute` and store what it
    /// returns.
    ///
    /// `compute` runs at most once per key across the lifetime of the store
    /// file. A `None` result is returned but not stored, so the next call
    /// asks again; an error is propagated (as [`ErrorKind::Compute`] with
    /// the original error as its child) and nothing is stored.
    #[instrument(skip(self, key, compute), fields(store = %self.name))]
    pub fn get_or_compute<F, E>(&mut self, key: K, compute: F) -> Result<Option<V>>
    where
        K: Clone,
        V: Clone,
        F: FnOnce() -> std::result::Result<Option<V>, Exn<E>>,
        E: StdError + Send + Sync + 'static,
    {
        if let Some(value) = self.entries()?.get(&key) {
            tracing::trace!("Cache hit");
            return Ok(Some(value.clone()));
        }
        tracing::debug!("Cache miss");
        let Some(value) = compute().or_raise(|| ErrorKind::Compute)? else {
            tracing::debug!("Computation produced no value; not storing");
            return Ok(None);
        };
        self.put(key, value.clone())?;
        tracing::debug!("Stored new cache entry");
        Ok(Some(value))
    }

    /// [`get_or_compute`](Self::get_or_compute) for computations that always
    /// produce a value.
    pub fn get_or_try_insert_with<F, E>(&mut self, key: K, compute: F) -> Result<V>
    where
        K: Clone,
        V: Clone,
        F: FnOnce() -> std::result::Result<V, Exn<E>>,
        E: StdError + Send + Sync + 'static,
    {
        if let Some(value) = self.entries()?.get(&key) {
            return Ok(value.clone());
        }
        let value = compute().or_raise(|| ErrorKind::Compute)?;
        self.put(key, value.clone())?;
        Ok(value)
    }

    fn entries(&mut self) -> Result<&mut HashMap<K, V>> {
        if self.entries.is_none() {
            self.entries = Some(self.load()?);
        }
        Ok(self.entries.get_or_insert_with(HashMap::new))
    }

    #[instrument(skip(self), fields(store = %self.name, path = %self.path.display()))]
    fn load(&self) -> Result<HashMap<K, V>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == IoErrorKind::NotFound => {
                tracing::debug!("No cache store on disk yet; starting empty");
                return Ok(HashMap::new());
            },
            Err(e) => return Err(e).or_raise(|| ErrorKind::Io(self.path.clone())),
        };
        let (entries, _): (HashMap<K, V>, usize) =
            bincode::serde::decode_from_slice(&bytes, bincode::config::standard())
                .or_raise(|| ErrorKind::InvalidData(self.path.clone()))?;
        tracing::info!(entries = entries.len(), "Loaded cache store");
        Ok(entries)
    }
}

impl<K, V> Debug for CacheStore<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CacheStore")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("entries", &self.entries.as_ref().map(HashMap::len))
            .finish()
    }
}
