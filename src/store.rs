//! Snapshot persistence for murmur.

use crate::storage::{Backend, MURMUR_DIR, MemoryBackend, SqliteBackend};
use crate::types::{Collection, Snapshot};
use eyre::{Context, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Errors that can occur at the store boundary.
#[derive(Debug)]
pub enum StoreError {
    /// No store directory at the given root.
    NotInitialized(String),
    /// A persisted value could not be parsed.
    Corrupt { key: &'static str, reason: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotInitialized(root) => {
                write!(f, "no {} directory found in {}. Run 'mur init' first.", MURMUR_DIR, root)
            }
            StoreError::Corrupt { key, reason } => write!(f, "persisted '{}' is corrupt: {}", key, reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Owns the in-memory snapshot and the backend it is persisted to.
pub struct Store {
    backend: Box<dyn Backend>,
    snapshot: Snapshot,
}

impl Store {
    /// Initialize a new store in the given directory.
    pub fn init(root: &Path) -> Result<Self> {
        let backend = SqliteBackend::init(root)?;
        Self::with_backend(Box::new(backend))
    }

    /// Open an existing store.
    pub fn open(root: &Path) -> Result<Self> {
        if !root.join(MURMUR_DIR).exists() {
            return Err(eyre::eyre!(StoreError::NotInitialized(root.display().to_string())));
        }
        let backend = SqliteBackend::open(root)?;
        Self::with_backend(Box::new(backend))
    }

    /// A store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self {
            backend: Box::new(MemoryBackend::new()),
            snapshot: Snapshot::default(),
        }
    }

    /// Load the snapshot held by `backend`.
    pub fn with_backend(backend: Box<dyn Backend>) -> Result<Self> {
        let snapshot = load(backend.as_ref())?;
        log::debug!(
            "Loaded {} accounts, {} posts, session: {:?}",
            snapshot.accounts.len(),
            snapshot.posts.len(),
            snapshot.session_user()
        );
        Ok(Self { backend, snapshot })
    }

    /// The current in-memory state.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Discard in-memory state and read it back from the backend.
    pub fn reload(&mut self) -> Result<()> {
        self.snapshot = load(self.backend.as_ref())?;
        Ok(())
    }

    /// Apply `mutate` to a copy of the snapshot and persist the collection it
    /// touched. The in-memory state only changes once the write succeeds.
    pub(crate) fn commit<F>(&mut self, collection: Collection, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Snapshot),
    {
        let mut next = self.snapshot.clone();
        mutate(&mut next);
        persist(self.backend.as_mut(), &next, collection)?;
        self.snapshot = next;
        Ok(())
    }

    /// Persist all four collections.
    pub fn save(&mut self) -> Result<()> {
        for collection in Collection::ALL {
            persist(self.backend.as_mut(), &self.snapshot, collection)?;
        }
        Ok(())
    }

    /// Replace the whole state and persist it.
    ///
    /// Collections are written one at a time; if a write fails, the ones
    /// before it are already on disk and the in-memory state is unchanged.
    pub fn replace(&mut self, snapshot: Snapshot) -> Result<()> {
        for collection in Collection::ALL {
            persist(self.backend.as_mut(), &snapshot, collection)?;
        }
        self.snapshot = snapshot;
        Ok(())
    }
}

fn persist(backend: &mut dyn Backend, snapshot: &Snapshot, collection: Collection) -> Result<()> {
    let json = match collection {
        Collection::Accounts => serde_json::to_string(&snapshot.accounts),
        Collection::Posts => serde_json::to_string(&snapshot.posts),
        Collection::Follows => serde_json::to_string(&snapshot.follows),
        Collection::Session => serde_json::to_string(&snapshot.session),
    }
    .with_context(|| format!("Failed to serialize '{}'", collection.key()))?;

    backend
        .put(collection.key(), &json)
        .with_context(|| format!("Failed to persist '{}'", collection.key()))
}

/// Read a snapshot from `backend`. Absent keys load as empty collections.
pub fn load(backend: &dyn Backend) -> Result<Snapshot> {
    Ok(Snapshot {
        accounts: read(backend, Collection::Accounts)?,
        posts: read(backend, Collection::Posts)?,
        follows: read(backend, Collection::Follows)?,
        session: read(backend, Collection::Session)?,
    })
}

fn read<T: DeserializeOwned + Default>(backend: &dyn Backend, collection: Collection) -> Result<T> {
    let key = collection.key();
    match backend.get(key)? {
        Some(json) => serde_json::from_str(&json).map_err(|e| {
            eyre::eyre!(StoreError::Corrupt {
                key,
                reason: e.to_string()
            })
        }),
        None => Ok(T::default()),
    }
}
