//! Application queries

use openapi_client::models::{
    ActionResponse, Application, CreateDockerImageApplication, CreateDockerfileApplication,
    CreateEnvironmentVariable, CreatePublicApplication, CreatedResource, EnvironmentVariable,
    UpdateApplication,
};
use serde_json::{json, Value};

use crate::cache::sync::{optimistic_update_insert_one_to_many, Patch, UUID_FIELD};
use crate::errors::CoolifyError;
use crate::http::applications::StartOptions;
use crate::queries::keys;
use crate::queries::mutation::{Action, MutationKey};
use crate::queries::Queries;

impl Queries {
    pub async fn applications(&self) -> Result<Vec<Application>, CoolifyError> {
        self.fetch_list(keys::applications(), UUID_FIELD, || {
            self.http.list_applications()
        })
        .await
    }

    pub async fn application(&self, uuid: &str) -> Result<Application, CoolifyError> {
        self.fetch_single(keys::application(uuid), || self.http.get_application(uuid))
            .await
    }

    pub async fn refetch_application(&self, uuid: &str) -> Result<Application, CoolifyError> {
        self.refetch_single(keys::application(uuid), || self.http.get_application(uuid))
            .await
    }

    /// Always fetched; callers poll this at the logs refetch interval
    pub async fn application_logs(&self, uuid: &str, lines: u32) -> Result<String, CoolifyError> {
        let logs = self
            .refetch_single(keys::application_logs(uuid, lines), || {
                self.http.get_application_logs(uuid, lines)
            })
            .await?;
        Ok(logs.logs)
    }

    pub async fn application_envs(
        &self,
        uuid: &str,
    ) -> Result<Vec<EnvironmentVariable>, CoolifyError> {
        self.fetch_single(keys::application_envs(uuid), || {
            self.http.list_application_envs(uuid)
        })
        .await
    }

    pub async fn create_application_env(
        &self,
        uuid: &str,
        env: &CreateEnvironmentVariable,
    ) -> Result<CreatedResource, CoolifyError> {
        if env.key.trim().is_empty() {
            return Err(CoolifyError::Validation("Key is required".to_string()));
        }
        let created = self.http.create_application_env(uuid, env).await?;
        self.cache.invalidate(&keys::application_envs(uuid));
        Ok(created)
    }

    /// Start (deploy) an application
    ///
    /// The deployment the server queues is inserted into the in-progress
    /// deployments list until the next fetch replaces it.
    pub async fn start_application(
        &self,
        uuid: &str,
        options: StartOptions,
    ) -> Result<ActionResponse, CoolifyError> {
        let response = self
            .run_action(
                MutationKey::new(keys::APPLICATIONS, Action::Start, uuid),
                keys::application(uuid),
                || self.http.start_application(uuid, options),
            )
            .await?;
        self.track_queued_deployment(uuid, &response);
        Ok(response)
    }

    pub async fn stop_application(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.run_action(
            MutationKey::new(keys::APPLICATIONS, Action::Stop, uuid),
            keys::application(uuid),
            || self.http.stop_application(uuid),
        )
        .await
    }

    pub async fn restart_application(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        let response = self
            .run_action(
                MutationKey::new(keys::APPLICATIONS, Action::Restart, uuid),
                keys::application(uuid),
                || self.http.restart_application(uuid),
            )
            .await?;
        self.track_queued_deployment(uuid, &response);
        Ok(response)
    }

    pub async fn update_application(
        &self,
        uuid: &str,
        update: &UpdateApplication,
    ) -> Result<Value, CoolifyError> {
        let patch = Patch::from_serializable(update)?;
        self.run_update(
            MutationKey::new(keys::APPLICATIONS, Action::Update, uuid),
            keys::applications(),
            keys::application(uuid),
            patch,
            || self.http.update_application(uuid, update),
        )
        .await
    }

    pub async fn create_public_application(
        &self,
        request: &CreatePublicApplication,
    ) -> Result<CreatedResource, CoolifyError> {
        let _pending = self.mutations.begin(MutationKey::create(keys::APPLICATIONS));
        let created = self.http.create_public_application(request).await?;
        self.seed_created(&keys::applications(), &created.uuid, request, &created)?;
        Ok(created)
    }

    pub async fn create_dockerfile_application(
        &self,
        request: &CreateDockerfileApplication,
    ) -> Result<CreatedResource, CoolifyError> {
        let _pending = self.mutations.begin(MutationKey::create(keys::APPLICATIONS));
        let created = self.http.create_dockerfile_application(request).await?;
        self.seed_created(&keys::applications(), &created.uuid, request, &created)?;
        Ok(created)
    }

    pub async fn create_docker_image_application(
        &self,
        request: &CreateDockerImageApplication,
    ) -> Result<CreatedResource, CoolifyError> {
        let _pending = self.mutations.begin(MutationKey::create(keys::APPLICATIONS));
        let created = self.http.create_docker_image_application(request).await?;
        self.seed_created(&keys::applications(), &created.uuid, request, &created)?;
        Ok(created)
    }

    pub async fn delete_application(&self, uuid: &str) -> Result<(), CoolifyError> {
        let _pending = self
            .mutations
            .begin(MutationKey::new(keys::APPLICATIONS, Action::Delete, uuid));
        self.http.delete_application(uuid).await?;
        self.forget(&keys::applications(), uuid);
        Ok(())
    }

    fn track_queued_deployment(&self, application_uuid: &str, response: &ActionResponse) {
        if let Some(deployment_uuid) = &response.deployment_uuid {
            let placeholder = json!({
                "deployment_uuid": deployment_uuid,
                "application_uuid": application_uuid,
                "status": "queued",
            });
            optimistic_update_insert_one_to_many(&self.cache, &keys::deployments(), &placeholder);
        }
    }
}
