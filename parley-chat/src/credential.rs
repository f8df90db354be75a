//! API key storage.
//!
//! The key is kept in memory and mirrored to a plaintext file so it survives
//! restarts. The file is written owner-only on unix, but it is still
//! unencrypted; deployments that care should use a secret store instead.

use std::fs;
use std::path::{Path, PathBuf};

use parley_common::error::{Error, Result, ResultExt};
use tokio::sync::RwLock;

/// In-memory API key backed by a file.
pub struct CredentialStore {
    path: PathBuf,
    key: RwLock<Option<String>>,
}

impl CredentialStore {
    /// Open the store, reading an existing key file if there is one.
    ///
    /// Surrounding whitespace is trimmed; an empty file means no key.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let key = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Credential(format!("cannot read API key file {}: {e}", path.display()))
            })?;
            non_empty(content.trim())
        } else {
            None
        };

        if key.is_some() {
            tracing::info!(path = %path.display(), "Loaded API key");
        } else {
            tracing::info!(path = %path.display(), "No API key on disk");
        }

        Ok(Self {
            path,
            key: RwLock::new(key),
        })
    }

    /// A store that starts empty and writes to `path` on save.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: RwLock::new(None),
        }
    }

    /// The current key, if one is set.
    pub async fn get(&self) -> Option<String> {
        self.key.read().await.clone()
    }

    pub async fn is_set(&self) -> bool {
        self.key.read().await.is_some()
    }

    /// Persist `api_key` and make it the active key.
    ///
    /// The file is written before memory is updated, so a failed write leaves
    /// the previous key active.
    pub async fn save(&self, api_key: &str) -> Result<()> {
        let api_key = non_empty(api_key.trim())
            .ok_or_else(|| Error::InvalidInput("API key must not be empty".into()))?;

        let mut guard = self.key.write().await;
        write_key_file(&self.path, &api_key).await?;
        *guard = Some(api_key);

        tracing::info!(path = %self.path.display(), "Saved API key");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

async fn write_key_file(path: &Path, api_key: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    tokio::fs::write(path, api_key)
        .await
        .context(format!("Failed to write API key to {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(path, fs::Permissions::from_mode(0o600))
            .await
            .context("Failed to set API key file permissions")?;
    }

    Ok(())
}
