use std::{
    collections::HashMap,
    fs, io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use thiserror::Error;

use super::CartSnapshot;

#[derive(Debug, Error)]
pub enum CartStoreError {
    #[error("cart storage io error")]
    Io(#[from] io::Error),

    #[error("stored cart is unreadable")]
    Corrupt(#[from] serde_json::Error),
}

/// Durable storage for carts, keyed by identity key.
pub trait CartStore {
    /// Returns `Ok(None)` when nothing is stored under `key`.
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, CartStoreError>;

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), CartStoreError>;

    /// Succeeds when nothing is stored under `key`.
    fn clear(&self, key: &str) -> Result<(), CartStoreError>;
}

impl<S: CartStore + ?Sized> CartStore for &S {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, CartStoreError> {
        (**self).load(key)
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), CartStoreError> {
        (**self).save(key, snapshot)
    }

    fn clear(&self, key: &str) -> Result<(), CartStoreError> {
        (**self).clear(key)
    }
}

/// Keeps carts in memory; also counts writes so callers can observe them.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    carts: Mutex<HashMap<String, CartSnapshot>>,
    writes: Mutex<usize>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` and `clear` calls so far.
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn bump(&self) {
        *self.writes.lock().unwrap_or_else(|p| p.into_inner()) += 1;
    }
}

impl CartStore for MemoryCartStore {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, CartStoreError> {
        let carts = self.carts.lock().unwrap_or_else(|p| p.into_inner());
        Ok(carts.get(key).cloned())
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), CartStoreError> {
        self.carts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .insert(key.to_string(), snapshot.clone());
        self.bump();
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CartStoreError> {
        self.carts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .remove(key);
        self.bump();
        Ok(())
    }
}

/// One JSON file per identity key inside a directory.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    dir: PathBuf,
}

impl FileCartStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, CartStoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", urlencoding::encode(key)))
    }
}

impl CartStore for FileCartStore {
    fn load(&self, key: &str) -> Result<Option<CartSnapshot>, CartStoreError> {
        let raw = match fs::read(self.path_for(key)) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_slice(&raw)?))
    }

    fn save(&self, key: &str, snapshot: &CartSnapshot) -> Result<(), CartStoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(snapshot)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), CartStoreError> {
        match fs::remove_file(self.path_for(key)) {
            Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}
