//! Key/value stores

use async_trait::async_trait;
use tracing::debug;

use crate::errors::CoolifyError;
use crate::filesys::dir::Dir;
use crate::filesys::file::File;

/// Permissions of every file a secure store writes
const SECURE_FILE_MODE: u32 = 0o600;

/// String blobs under fixed keys
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CoolifyError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CoolifyError>;

    async fn remove_item(&self, key: &str) -> Result<(), CoolifyError>;
}

/// One file per key inside a directory
///
/// A secure store restricts every file it writes to its owner.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: Dir,
    secure: bool,
}

impl FileStore {
    pub fn new(dir: Dir) -> Self {
        Self { dir, secure: false }
    }

    pub fn secure(dir: Dir) -> Self {
        Self { dir, secure: true }
    }

    pub fn dir(&self) -> &Dir {
        &self.dir
    }

    fn file(&self, key: &str) -> Result<File, CoolifyError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CoolifyError::Storage(format!("Invalid storage key: {:?}", key)));
        }
        Ok(self.dir.file(key))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get_item(&self, key: &str) -> Result<Option<String>, CoolifyError> {
        self.file(key)?.read_string().await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), CoolifyError> {
        let file = self.file(key)?;
        debug!("Writing storage key {}", key);
        if self.secure {
            file.write_atomic_with_mode(value.as_bytes(), Some(SECURE_FILE_MODE))
                .await?;
            // Tightens a file written before the store was secured
            file.restrict_to_owner().await
        } else {
            file.write_atomic(value.as_bytes()).await
        }
    }

    async fn remove_item(&self, key: &str) -> Result<(), CoolifyError> {
        self.file(key)?.delete().await
    }
}

/// Read a JSON value stored under `key`
pub async fn get_json<T, S>(store: &S, key: &str) -> Result<Option<T>, CoolifyError>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    match store.get_item(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Store `value` as JSON under `key`
pub async fn set_json<T, S>(store: &S, key: &str, value: &T) -> Result<(), CoolifyError>
where
    T: serde::Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set_item(key, &raw).await
}
