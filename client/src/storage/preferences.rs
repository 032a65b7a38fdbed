//! User preferences persisted next to the favorites

use std::sync::Arc;
use std::time::Duration;

use crate::errors::CoolifyError;
use crate::storage::keys;
use crate::storage::store::{get_json, set_json, KeyValueStore};

/// Logs refetch interval used until the user picks one
pub const DEFAULT_LOGS_REFETCH_INTERVAL: Duration = Duration::from_secs(5);

pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn logs_refetch_interval(&self) -> Result<Duration, CoolifyError> {
        let secs: Option<u64> = get_json(self.store.as_ref(), keys::LOGS_REFETCH_INTERVAL).await?;
        Ok(secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_LOGS_REFETCH_INTERVAL))
    }

    pub async fn set_logs_refetch_interval(&self, interval: Duration) -> Result<(), CoolifyError> {
        if interval.is_zero() {
            return Err(CoolifyError::Validation(
                "Logs refetch interval must be positive".to_string(),
            ));
        }
        set_json(self.store.as_ref(), keys::LOGS_REFETCH_INTERVAL, &interval.as_secs()).await
    }

    /// Server picked in resource creation flows
    pub async fn selected_server(&self) -> Result<Option<String>, CoolifyError> {
        self.store.get_item(keys::SELECTED_SERVER).await
    }

    pub async fn set_selected_server(&self, server_uuid: Option<&str>) -> Result<(), CoolifyError> {
        match server_uuid {
            Some(uuid) => self.store.set_item(keys::SELECTED_SERVER, uuid).await,
            None => self.store.remove_item(keys::SELECTED_SERVER).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesys::dir::Dir;
    use crate::storage::store::FileStore;

    #[tokio::test]
    async fn test_logs_refetch_interval_default_and_update() {
        let dir = Dir::create_temp_dir("coolkit-prefs").await.unwrap();
        let prefs = Preferences::new(Arc::new(FileStore::new(dir.clone())));

        assert_eq!(
            prefs.logs_refetch_interval().await.unwrap(),
            DEFAULT_LOGS_REFETCH_INTERVAL
        );
        prefs
            .set_logs_refetch_interval(Duration::from_secs(30))
            .await
            .unwrap();
        assert_eq!(
            prefs.logs_refetch_interval().await.unwrap(),
            Duration::from_secs(30)
        );
        assert!(prefs.set_logs_refetch_interval(Duration::ZERO).await.is_err());

        dir.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_selected_server() {
        let dir = Dir::create_temp_dir("coolkit-prefs").await.unwrap();
        let prefs = Preferences::new(Arc::new(FileStore::new(dir.clone())));

        assert_eq!(prefs.selected_server().await.unwrap(), None);
        prefs.set_selected_server(Some("srv-1")).await.unwrap();
        assert_eq!(prefs.selected_server().await.unwrap().as_deref(), Some("srv-1"));
        prefs.set_selected_server(None).await.unwrap();
        assert_eq!(prefs.selected_server().await.unwrap(), None);

        dir.delete().await.unwrap();
    }
}
