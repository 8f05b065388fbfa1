//! Credential persistence.
//!
//! [`TomlCredentialStore`] keeps the token pair in a small TOML file next to
//! `config.toml`, so a restarted client resumes its session.  The file is
//! deleted on logout rather than truncated.
//!
//! [`MemoryCredentialStore`] is process-local and used by tests and by
//! short-lived sessions that should not touch the disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use shop_core::Credential;
use tokio::sync::RwLock;
use tracing::debug;

use crate::application::request_client::{CredentialStore, StoreError};

// ── In-memory ─────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    current: RwLock<Option<Credential>>,
}

impl MemoryCredentialStore {
    pub fn new(initial: Option<Credential>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<Credential>, StoreError> {
        Ok(self.current.read().await.clone())
    }

    async fn set(&self, credential: Credential) -> Result<(), StoreError> {
        *self.current.write().await = Some(credential);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.current.write().await = None;
        Ok(())
    }
}

// ── TOML file ─────────────────────────────────────────────────────────────────

/// File-backed store.  Writes are serialized through an internal lock.
#[derive(Debug)]
pub struct TomlCredentialStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl TomlCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl CredentialStore for TomlCredentialStore {
    async fn get(&self) -> Result<Option<Credential>, StoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let credential: Credential =
            toml::from_str(&content).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        Ok(Some(credential))
    }

    async fn set(&self, credential: Credential) -> Result<(), StoreError> {
        let content =
            toml::to_string(&credential).map_err(|e| StoreError::Encode(e.to_string()))?;

        let _guard = self.write_lock.lock().await;
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| self.io_error(e))?;
        }
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| self.io_error(e))?;
        debug!(path = %self.path.display(), "credential saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "credential removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
