//! Favorite resources

use std::sync::{Arc, RwLock};

use openapi_client::models::ResourceType;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::CoolifyError;
use crate::storage::keys;
use crate::storage::store::{get_json, set_json, KeyValueStore};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FavoriteResource {
    pub uuid: String,
    #[serde(rename = "type")]
    pub resource_type: ResourceType,
}

impl FavoriteResource {
    pub fn new(uuid: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            uuid: uuid.into(),
            resource_type,
        }
    }
}

/// Outcome of a toggle, with enough state to undo it
#[derive(Debug, Clone)]
pub struct FavoriteChange {
    pub favorite: FavoriteResource,
    pub added: bool,
    previous: Vec<FavoriteResource>,
}

impl FavoriteChange {
    pub fn message(&self) -> String {
        let verb = if self.added { "added to" } else { "removed from" };
        format!("{} {} favorites", capitalize(self.favorite.resource_type.as_str()), verb)
    }

    /// Write back the list as it was before the toggle
    pub async fn undo(self, favorites: &FavoritesStore) -> Result<(), CoolifyError> {
        favorites.persist(self.previous).await
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Favorites persisted as one JSON list
///
/// Every mutation re-reads the stored list first; concurrent writers
/// overwrite each other.
pub struct FavoritesStore {
    store: Arc<dyn KeyValueStore>,
    mirror: RwLock<Vec<FavoriteResource>>,
}

impl FavoritesStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            mirror: RwLock::new(Vec::new()),
        }
    }

    /// Load the stored list into memory
    pub async fn load(&self) -> Result<Vec<FavoriteResource>, CoolifyError> {
        let list = self.read().await?;
        self.set_mirror(list.clone());
        Ok(list)
    }

    /// Favorites as of the last load or write
    pub fn favorites(&self) -> Vec<FavoriteResource> {
        self.mirror
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn is_favorite(&self, favorite: &FavoriteResource) -> bool {
        self.mirror
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains(favorite)
    }

    pub async fn toggle_favorite(&self, favorite: FavoriteResource) -> Result<FavoriteChange, CoolifyError> {
        let previous = self.read().await?;
        let mut next = previous.clone();

        let added = match next.iter().position(|f| *f == favorite) {
            Some(i) => {
                next.remove(i);
                false
            }
            None => {
                next.push(favorite.clone());
                true
            }
        };
        self.persist(next).await?;
        debug!("Favorite {} {} {}", favorite.resource_type, favorite.uuid, if added { "added" } else { "removed" });

        Ok(FavoriteChange {
            favorite,
            added,
            previous,
        })
    }

    /// Drop every favorite with `uuid`, whatever its type
    pub async fn remove_favorite(&self, uuid: &str) -> Result<(), CoolifyError> {
        let mut list = self.read().await?;
        let before = list.len();
        list.retain(|f| f.uuid != uuid);
        if list.len() == before {
            self.set_mirror(list);
            return Ok(());
        }
        self.persist(list).await
    }

    async fn read(&self) -> Result<Vec<FavoriteResource>, CoolifyError> {
        Ok(get_json(self.store.as_ref(), keys::FAVORITES)
            .await?
            .unwrap_or_default())
    }

    async fn persist(&self, list: Vec<FavoriteResource>) -> Result<(), CoolifyError> {
        set_json(self.store.as_ref(), keys::FAVORITES, &list).await?;
        self.set_mirror(list);
        Ok(())
    }

    fn set_mirror(&self, list: Vec<FavoriteResource>) {
        *self.mirror.write().unwrap_or_else(|e| e.into_inner()) = list;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesys::dir::Dir;
    use crate::storage::store::FileStore;

    async fn store() -> (Dir, FavoritesStore) {
        let dir = Dir::create_temp_dir("coolkit-favorites").await.unwrap();
        let favorites = FavoritesStore::new(Arc::new(FileStore::new(dir.clone())));
        (dir, favorites)
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_membership() {
        let (dir, favorites) = store().await;
        let app = FavoriteResource::new("a1", ResourceType::Application);

        let change = favorites.toggle_favorite(app.clone()).await.unwrap();
        assert!(change.added);
        assert_eq!(change.message(), "Application added to favorites");
        assert!(favorites.is_favorite(&app));

        let change = favorites.toggle_favorite(app.clone()).await.unwrap();
        assert!(!change.added);
        assert!(!favorites.is_favorite(&app));
        assert!(favorites.load().await.unwrap().is_empty());

        dir.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_membership_is_by_uuid_and_type() {
        let (dir, favorites) = store().await;
        favorites
            .toggle_favorite(FavoriteResource::new("x1", ResourceType::Application))
            .await
            .unwrap();

        assert!(!favorites.is_favorite(&FavoriteResource::new("x1", ResourceType::Database)));

        favorites
            .toggle_favorite(FavoriteResource::new("x1", ResourceType::Database))
            .await
            .unwrap();
        assert_eq!(favorites.favorites().len(), 2);

        dir.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_favorite_drops_all_types_and_is_idempotent() {
        let (dir, favorites) = store().await;
        for ty in [ResourceType::Application, ResourceType::Service] {
            favorites
                .toggle_favorite(FavoriteResource::new("x1", ty))
                .await
                .unwrap();
        }
        favorites
            .toggle_favorite(FavoriteResource::new("x2", ResourceType::Database))
            .await
            .unwrap();

        favorites.remove_favorite("x1").await.unwrap();
        let once = favorites.load().await.unwrap();
        favorites.remove_favorite("x1").await.unwrap();
        let twice = favorites.load().await.unwrap();

        assert_eq!(once, vec![FavoriteResource::new("x2", ResourceType::Database)]);
        assert_eq!(once, twice);

        dir.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_undo_restores_previous_list() {
        let (dir, favorites) = store().await;
        let app = FavoriteResource::new("a1", ResourceType::Application);

        let change = favorites.toggle_favorite(app.clone()).await.unwrap();
        change.undo(&favorites).await.unwrap();
        assert!(!favorites.is_favorite(&app));
        assert!(favorites.load().await.unwrap().is_empty());

        dir.delete().await.unwrap();
    }

    #[tokio::test]
    async fn test_stored_format() {
        let (dir, favorites) = store().await;
        favorites
            .toggle_favorite(FavoriteResource::new("s1", ResourceType::Service))
            .await
            .unwrap();

        let raw = dir.file(keys::FAVORITES).read_string().await.unwrap().unwrap();
        assert_eq!(raw, r#"[{"uuid":"s1","type":"service"}]"#);

        dir.delete().await.unwrap();
    }
}
