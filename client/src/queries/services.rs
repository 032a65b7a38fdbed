//! Service queries

use openapi_client::models::{
    ActionResponse, CreateService, CreatedResource, DeleteServiceOptions, Service,
};
use serde_json::Value;

use crate::cache::sync::{Patch, UUID_FIELD};
use crate::errors::CoolifyError;
use crate::queries::keys;
use crate::queries::mutation::{Action, MutationKey};
use crate::queries::Queries;

impl Queries {
    pub async fn services(&self) -> Result<Vec<Service>, CoolifyError> {
        self.fetch_list(keys::services(), UUID_FIELD, || self.http.list_services())
            .await
    }

    pub async fn service(&self, uuid: &str) -> Result<Service, CoolifyError> {
        self.fetch_single(keys::service(uuid), || self.http.get_service(uuid))
            .await
    }

    pub async fn refetch_service(&self, uuid: &str) -> Result<Service, CoolifyError> {
        self.refetch_single(keys::service(uuid), || self.http.get_service(uuid))
            .await
    }

    pub async fn start_service(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::SERVICES, Action::Start, uuid),
            keys::service(uuid),
            || self.http.start_service(uuid),
        )
        .await
    }

    pub async fn stop_service(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::SERVICES, Action::Stop, uuid),
            keys::service(uuid),
            || self.http.stop_service(uuid),
        )
        .await
    }

    pub async fn restart_service(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::SERVICES, Action::Restart, uuid),
            keys::service(uuid),
            || self.http.restart_service(uuid),
        )
        .await
    }

    /// The API has no service update endpoint yet
    pub async fn update_service(&self, _uuid: &str, _patch: &Patch) -> Result<Value, CoolifyError> {
        Err(CoolifyError::UnsupportedOperation(
            "update service".to_string(),
        ))
    }

    pub async fn create_service(
        &self,
        request: &CreateService,
    ) -> Result<CreatedResource, CoolifyError> {
        let _pending = self.mutations.begin(MutationKey::create(keys::SERVICES));
        let created = self.http.create_service(request).await?;
        self.seed_created(&keys::services(), &created.uuid, request, &created)?;
        Ok(created)
    }

    pub async fn delete_service(
        &self,
        uuid: &str,
        options: &DeleteServiceOptions,
    ) -> Result<(), CoolifyError> {
        let _pending = self
            .mutations
            .begin(MutationKey::new(keys::SERVICES, Action::Delete, uuid));
        self.http.delete_service(uuid, options).await?;
        self.forget(&keys::services(), uuid);
        Ok(())
    }
}
