//! Storage layout configuration

use std::path::PathBuf;

use crate::errors::CoolifyError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// Overrides the default base directory
pub const HOME_ENV: &str = "COOLKIT_HOME";

/// Storage layout for the client
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Client settings (`settings.json`)
    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Plain preferences, one file per key
    pub fn preferences_dir(&self) -> Dir {
        Dir::new(self.base_dir.join("preferences"))
    }

    /// Credentials, one owner-only file per key
    pub fn secure_dir(&self) -> Dir {
        Dir::new(self.base_dir.join("secure"))
    }

    pub fn logs_dir(&self) -> Dir {
        Dir::new(self.base_dir.join("logs"))
    }

    /// Create the directories
    pub async fn setup(&self) -> Result<(), CoolifyError> {
        self.preferences_dir().create().await?;
        self.secure_dir().create_private().await?;
        self.logs_dir().create().await?;
        Ok(())
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        if let Some(dir) = std::env::var_os(HOME_ENV) {
            return Self::new(PathBuf::from(dir));
        }

        let base_dir = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".coolkit");

        Self::new(base_dir)
    }
}
