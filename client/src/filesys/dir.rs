//! Directory operations

use std::path::{Path, PathBuf};

use tokio::fs;

use crate::errors::CoolifyError;
use crate::filesys::file::File;

/// A directory wrapper with path
#[derive(Debug, Clone)]
pub struct Dir {
    path: PathBuf,
}

impl Dir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> bool {
        fs::metadata(&self.path)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
    }

    /// Create the directory (and parents)
    pub async fn create(&self) -> Result<(), CoolifyError> {
        fs::create_dir_all(&self.path).await?;
        Ok(())
    }

    /// Create the directory (and parents), restricting it to its owner (0o700)
    ///
    /// An existing directory is tightened as well. No-op beyond `create` off Unix.
    pub async fn create_private(&self) -> Result<(), CoolifyError> {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            builder.mode(0o700);
        }
        builder.create(&self.path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o700)).await?;
        }
        Ok(())
    }

    /// Delete the directory and all contents
    pub async fn delete(&self) -> Result<(), CoolifyError> {
        if self.exists().await {
            fs::remove_dir_all(&self.path).await?;
        }
        Ok(())
    }

    pub fn file(&self, name: &str) -> File {
        File::new(self.path.join(name))
    }

    pub fn subdir(&self, name: &str) -> Dir {
        Dir::new(self.path.join(name))
    }

    /// Create a uniquely named directory under the system temp dir
    pub async fn create_temp_dir(prefix: &str) -> Result<Dir, CoolifyError> {
        let dir = Dir::new(std::env::temp_dir().join(format!("{}-{}", prefix, uuid::Uuid::new_v4())));
        dir.create().await?;
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[tokio::test]
    async fn test_create_private_restricts_existing_dir() {
        use std::os::unix::fs::PermissionsExt;

        let root = Dir::create_temp_dir("coolkit-dir").await.unwrap();
        let secure = root.subdir("secure");
        secure.create().await.unwrap();
        std::fs::set_permissions(secure.path(), std::fs::Permissions::from_mode(0o755)).unwrap();

        secure.create_private().await.unwrap();

        let meta = std::fs::metadata(secure.path()).unwrap();
        assert_eq!(meta.permissions().mode() & 0o777, 0o700);
        root.delete().await.unwrap();
    }
}
