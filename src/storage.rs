use std::collections::HashMap;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

pub const PATIENTS: &str = "patients";
pub const APPOINTMENTS: &str = "appointments";
pub const BILLS: &str = "bills";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to read {name}: {source}")]
    Read {
        name: String,
        source: std::io::Error,
    },
    #[error("failed to write {name}: {source}")]
    Write {
        name: String,
        source: std::io::Error,
    },
    #[error("failed to serialize {name}: {source}")]
    Serialize {
        name: String,
        source: serde_json::Error,
    },
}

/// Raw document storage: one JSON text blob per collection name.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// `None` means the collection has never been written.
    async fn read(&self, name: &str) -> Result<Option<String>, StorageError>;
    async fn write(&self, name: &str, contents: &str) -> Result<(), StorageError>;
}

/// One `<name>.json` file per collection under a data directory.
///
/// Reads and writes are whole-file and non-atomic: two concurrent writers
/// race and the last write wins. There is no locking layer.
pub struct FileBackend {
    data_dir: PathBuf,
}

impl FileBackend {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.data_dir.join(format!("{name}.json"))
    }

    /// Creates the data directory and seeds missing collections with `[]`.
    pub async fn prepare(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.data_dir)
            .await
            .map_err(|source| StorageError::Write {
                name: self.data_dir.display().to_string(),
                source,
            })?;

        for name in [PATIENTS, APPOINTMENTS, BILLS] {
            match tokio::fs::metadata(self.path_for(name)).await {
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => self.write(name, "[]").await?,
                Err(source) => {
                    return Err(StorageError::Read {
                        name: name.to_string(),
                        source,
                    });
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn read(&self, name: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(name)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Read {
                name: name.to_string(),
                source,
            }),
        }
    }

    async fn write(&self, name: &str, contents: &str) -> Result<(), StorageError> {
        tokio::fs::write(self.path_for(name), contents)
            .await
            .map_err(|source| StorageError::Write {
                name: name.to_string(),
                source,
            })
    }
}

/// In-memory backend, mainly for tests.
#[derive(Default)]
pub struct MemoryBackend {
    documents: Mutex<HashMap<String, String>>,
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn read(&self, name: &str) -> Result<Option<String>, StorageError> {
        Ok(self.documents.lock().unwrap().get(name).cloned())
    }

    async fn write(&self, name: &str, contents: &str) -> Result<(), StorageError> {
        self.documents
            .lock()
            .unwrap()
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }
}

/// Outcome of reading a collection. "Never written" and "written but
/// unparseable" stay distinguishable instead of both collapsing to empty.
#[derive(Debug)]
pub enum Loaded<T> {
    Records(Vec<T>),
    Missing,
    Corrupt(serde_json::Error),
}

/// Typed view over one JSON-array collection.
pub struct Repository<T> {
    backend: Arc<dyn StorageBackend>,
    name: &'static str,
    _records: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            name: self.name,
            _records: PhantomData,
        }
    }
}

impl<T: Serialize + DeserializeOwned> Repository<T> {
    pub fn new(backend: Arc<dyn StorageBackend>, name: &'static str) -> Self {
        Self {
            backend,
            name,
            _records: PhantomData,
        }
    }

    pub async fn load(&self) -> Result<Loaded<T>, StorageError> {
        let Some(contents) = self.backend.read(self.name).await? else {
            return Ok(Loaded::Missing);
        };
        match serde_json::from_str(&contents) {
            Ok(records) => Ok(Loaded::Records(records)),
            Err(err) => Ok(Loaded::Corrupt(err)),
        }
    }

    /// Serving behavior: a missing or corrupt collection reads as empty.
    pub async fn load_or_empty(&self) -> Result<Vec<T>, StorageError> {
        match self.load().await? {
            Loaded::Records(records) => Ok(records),
            Loaded::Missing => Ok(Vec::new()),
            Loaded::Corrupt(err) => {
                tracing::warn!("collection {} is unparseable, serving it as empty: {err}", self.name);
                Ok(Vec::new())
            }
        }
    }

    pub async fn save(&self, records: &[T]) -> Result<(), StorageError> {
        let contents =
            serde_json::to_string_pretty(records).map_err(|source| StorageError::Serialize {
                name: self.name.to_string(),
                source,
            })?;
        self.backend.write(self.name, &contents).await
    }
}
