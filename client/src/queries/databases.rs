//! Database queries

use openapi_client::models::{
    ActionResponse, CreateDatabase, CreatedResource, Database, DatabaseEngine, UpdateDatabase,
};
use serde_json::Value;

use crate::cache::sync::{Patch, UUID_FIELD};
use crate::errors::CoolifyError;
use crate::queries::keys;
use crate::queries::mutation::{Action, MutationKey};
use crate::queries::Queries;

impl Queries {
    pub async fn databases(&self) -> Result<Vec<Database>, CoolifyError> {
        self.fetch_list(keys::databases(), UUID_FIELD, || self.http.list_databases())
            .await
    }

    pub async fn database(&self, uuid: &str) -> Result<Database, CoolifyError> {
        self.fetch_single(keys::database(uuid), || self.http.get_database(uuid))
            .await
    }

    pub async fn refetch_database(&self, uuid: &str) -> Result<Database, CoolifyError> {
        self.refetch_single(keys::database(uuid), || self.http.get_database(uuid))
            .await
    }

    pub async fn start_database(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::DATABASES, Action::Start, uuid),
            keys::database(uuid),
            || self.http.start_database(uuid),
        )
        .await
    }

    pub async fn stop_database(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::DATABASES, Action::Stop, uuid),
            keys::database(uuid),
            || self.http.stop_database(uuid),
        )
        .await
    }

    pub async fn restart_database(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::DATABASES, Action::Restart, uuid),
            keys::database(uuid),
            || self.http.restart_database(uuid),
        )
        .await
    }

    pub async fn update_database(
        &self,
        uuid: &str,
        update: &UpdateDatabase,
    ) -> Result<Value, CoolifyError> {
        let patch = Patch::from_serializable(update)?;
        self.run_update(
            MutationKey::new(keys::DATABASES, Action::Update, uuid),
            keys::databases(),
            keys::database(uuid),
            patch,
            || self.http.update_database(uuid, update),
        )
        .await
    }

    pub async fn create_database(
        &self,
        engine: DatabaseEngine,
        request: &CreateDatabase,
    ) -> Result<CreatedResource, CoolifyError> {
        let _pending = self.mutations.begin(MutationKey::create(keys::DATABASES));
        let created = self.http.create_database(engine, request).await?;
        self.seed_created(&keys::databases(), &created.uuid, request, &created)?;
        Ok(created)
    }

    pub async fn delete_database(&self, uuid: &str) -> Result<(), CoolifyError> {
        let _pending = self
            .mutations
            .begin(MutationKey::new(keys::DATABASES, Action::Delete, uuid));
        self.http.delete_database(uuid).await?;
        self.forget(&keys::databases(), uuid);
        Ok(())
    }
}
