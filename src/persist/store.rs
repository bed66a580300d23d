//! Key-value stores for saved records.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::trace;

use super::error::PersistError;

/// Opaque blob storage keyed by string.
///
/// Stores know nothing about what they hold; encoding is done by
/// [`save_record`] and [`load_record`].
pub trait PersistenceService {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), PersistError>;

    /// `Ok(None)` when nothing was ever saved under `key`.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError>;
}

impl<P: PersistenceService + ?Sized> PersistenceService for &mut P {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
        (**self).save(key, blob)
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        (**self).load(key)
    }
}

/// Encode `record` with bincode and save it.
pub fn save_record<P, T>(store: &mut P, key: &str, record: &T) -> Result<(), PersistError>
where
    P: PersistenceService + ?Sized,
    T: Serialize,
{
    let blob = bincode::serialize(record).map_err(|source| PersistError::Codec {
        key: key.to_string(),
        source,
    })?;
    store.save(key, &blob)
}

/// Load and decode a record, `Ok(None)` if absent.
pub fn load_record<P, T>(store: &P, key: &str) -> Result<Option<T>, PersistError>
where
    P: PersistenceService + ?Sized,
    T: DeserializeOwned,
{
    let Some(blob) = store.load(key)? else {
        return Ok(None);
    };
    bincode::deserialize(&blob)
        .map(Some)
        .map_err(|source| PersistError::Codec {
            key: key.to_string(),
            source,
        })
}

/// In-process store.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    blobs: FxHashMap<String, Vec<u8>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }

    pub fn remove(&mut self, key: &str) -> Option<Vec<u8>> {
        self.blobs.remove(key)
    }
}

impl PersistenceService for MemoryStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
        self.blobs.insert(key.to_string(), blob.to_vec());
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.blobs.get(key).cloned())
    }
}

/// One file per key under a directory.
///
/// The directory is created on first save. Writes go to a temporary file
/// that is then renamed over the target.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(PersistError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.bin")))
    }
}

impl PersistenceService for FileStore {
    fn save(&mut self, key: &str, blob: &[u8]) -> Result<(), PersistError> {
        let path = self.path_for(key)?;
        let io = |source: std::io::Error| PersistError::Io {
            key: key.to_string(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io)?;
        let temp = path.with_extension("bin.tmp");
        let mut file = fs::File::create(&temp).map_err(io)?;
        file.write_all(blob).map_err(io)?;
        file.sync_all().map_err(io)?;
        if let Err(source) = fs::rename(&temp, &path) {
            let _ = fs::remove_file(&temp);
            return Err(io(source));
        }
        trace!(key, bytes = blob.len(), "record saved");
        Ok(())
    }

    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, PersistError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }
}
