//! File operations

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::warn;

use crate::errors::CoolifyError;

/// A file wrapper with path
#[derive(Debug, Clone)]
pub struct File {
    path: PathBuf,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path).await.is_ok()
    }

    /// Read the file, or `None` when it does not exist
    pub async fn read_string(&self) -> Result<Option<String>, CoolifyError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Read file as JSON, or `None` when it does not exist
    pub async fn read_json<T: DeserializeOwned>(&self) -> Result<Option<T>, CoolifyError> {
        match self.read_string().await? {
            Some(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            None => Ok(None),
        }
    }

    /// Replace the file contents through a temporary sibling and a rename
    pub async fn write_atomic(&self, contents: &[u8]) -> Result<(), CoolifyError> {
        self.write_atomic_with_mode(contents, None).await
    }

    /// Same as [`File::write_atomic`], creating the temporary file with `mode`
    /// so the contents are never readable beyond it. `mode` is ignored off Unix.
    ///
    /// The temporary file is removed when the write or the rename fails.
    pub async fn write_atomic_with_mode(
        &self,
        contents: &[u8],
        mode: Option<u32>,
    ) -> Result<(), CoolifyError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp = File::new(self.path.with_extension("tmp"));
        // A leftover temp file would keep its old permissions
        temp.delete().await?;

        let result = self.write_through(&temp, contents, mode).await;
        if result.is_err() {
            if let Err(e) = temp.delete().await {
                warn!("Failed to remove {}: {}", temp.path.display(), e);
            }
        }
        result
    }

    async fn write_through(
        &self,
        temp: &File,
        contents: &[u8],
        mode: Option<u32>,
    ) -> Result<(), CoolifyError> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            if let Some(mode) = mode {
                options.mode(mode);
            }
        }
        #[cfg(not(unix))]
        let _ = mode;

        let mut file = options.open(&temp.path).await?;
        file.write_all(contents).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp.path, &self.path).await?;
        Ok(())
    }

    pub async fn write_json<T: Serialize>(&self, value: &T) -> Result<(), CoolifyError> {
        let contents = serde_json::to_vec_pretty(value)?;
        self.write_atomic(&contents).await
    }

    /// Delete the file; a missing file is not an error
    pub async fn delete(&self) -> Result<(), CoolifyError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Restrict the file to owner read/write (0o600). No-op off Unix.
    pub async fn restrict_to_owner(&self) -> Result<(), CoolifyError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600)).await?;
        }
        Ok(())
    }
}
