//! Application API client

use base64::Engine;
use openapi_client::models::{
    ActionResponse, Application, ApplicationLogs, CreateDockerImageApplication,
    CreateDockerfileApplication, CreateEnvironmentVariable, CreatePublicApplication,
    CreatedResource, EnvironmentVariable, UpdateApplication,
};
use serde_json::Value;

use crate::errors::CoolifyError;
use crate::http::client::{decode_outcome, endpoint, HttpClient};

/// Flags for `POST /applications/{uuid}/start`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StartOptions {
    /// Rebuild without cache
    pub force: bool,
    /// Skip the deployment queue
    pub instant_deploy: bool,
}

impl HttpClient {
    pub async fn list_applications(&self) -> Result<Vec<Application>, CoolifyError> {
        self.get("/applications").await
    }

    pub async fn get_application(&self, uuid: &str) -> Result<Application, CoolifyError> {
        self.get(&endpoint(&["applications", uuid])?).await
    }

    /// Last `lines` lines of the running container's output
    pub async fn get_application_logs(
        &self,
        uuid: &str,
        lines: u32,
    ) -> Result<ApplicationLogs, CoolifyError> {
        let path = endpoint(&["applications", uuid, "logs"])?;
        self.get(&format!("{}?lines={}", path, lines)).await
    }

    pub async fn list_application_envs(
        &self,
        uuid: &str,
    ) -> Result<Vec<EnvironmentVariable>, CoolifyError> {
        self.get(&endpoint(&["applications", uuid, "envs"])?).await
    }

    /// Create an environment variable; a `{message}` body in a 200 is a failure
    pub async fn create_application_env(
        &self,
        uuid: &str,
        env: &CreateEnvironmentVariable,
    ) -> Result<CreatedResource, CoolifyError> {
        let body: Value = self
            .post(&endpoint(&["applications", uuid, "envs"])?, env)
            .await?;
        decode_outcome(body)
    }

    pub async fn start_application(
        &self,
        uuid: &str,
        options: StartOptions,
    ) -> Result<ActionResponse, CoolifyError> {
        let path = endpoint(&["applications", uuid, "start"])?;
        self.post_empty(&format!(
            "{}?force={}&instant_deploy={}",
            path, options.force, options.instant_deploy
        ))
        .await
    }

    pub async fn stop_application(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["applications", uuid, "stop"])?).await
    }

    pub async fn restart_application(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["applications", uuid, "restart"])?)
            .await
    }

    pub async fn update_application(
        &self,
        uuid: &str,
        update: &UpdateApplication,
    ) -> Result<Value, CoolifyError> {
        self.patch(&endpoint(&["applications", uuid])?, update).await
    }

    pub async fn create_public_application(
        &self,
        request: &CreatePublicApplication,
    ) -> Result<CreatedResource, CoolifyError> {
        let body: Value = self.post("/applications/public", request).await?;
        decode_outcome(body)
    }

    /// The dockerfile is sent base64-encoded
    pub async fn create_dockerfile_application(
        &self,
        request: &CreateDockerfileApplication,
    ) -> Result<CreatedResource, CoolifyError> {
        let mut encoded = request.clone();
        encoded.dockerfile = base64::engine::general_purpose::STANDARD.encode(&request.dockerfile);
        let body: Value = self.post("/applications/dockerfile", &encoded).await?;
        decode_outcome(body)
    }

    pub async fn create_docker_image_application(
        &self,
        request: &CreateDockerImageApplication,
    ) -> Result<CreatedResource, CoolifyError> {
        let body: Value = self.post("/applications/dockerimage", request).await?;
        decode_outcome(body)
    }

    pub async fn delete_application(&self, uuid: &str) -> Result<Value, CoolifyError> {
        self.delete(&endpoint(&["applications", uuid])?).await
    }
}
