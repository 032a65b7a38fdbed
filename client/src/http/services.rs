//! Service API client

use base64::Engine;
use openapi_client::models::{
    ActionResponse, CreateService, CreatedResource, DeleteServiceOptions, Service,
};
use serde_json::Value;

use crate::errors::CoolifyError;
use crate::http::client::{decode_outcome, endpoint, HttpClient};

impl HttpClient {
    pub async fn list_services(&self) -> Result<Vec<Service>, CoolifyError> {
        self.get("/services").await
    }

    pub async fn get_service(&self, uuid: &str) -> Result<Service, CoolifyError> {
        self.get(&endpoint(&["services", uuid])?).await
    }

    pub async fn start_service(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["services", uuid, "start"])?).await
    }

    pub async fn stop_service(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["services", uuid, "stop"])?).await
    }

    pub async fn restart_service(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["services", uuid, "restart"])?).await
    }

    /// A raw compose file is sent base64-encoded
    pub async fn create_service(
        &self,
        request: &CreateService,
    ) -> Result<CreatedResource, CoolifyError> {
        if request.service_type.is_none() && request.docker_compose_raw.is_none() {
            return Err(CoolifyError::Validation(
                "Either a service type or a compose file is required".to_string(),
            ));
        }

        let mut encoded = request.clone();
        encoded.docker_compose_raw = request
            .docker_compose_raw
            .as_ref()
            .map(|raw| base64::engine::general_purpose::STANDARD.encode(raw));
        let body: Value = self.post("/services", &encoded).await?;
        decode_outcome(body)
    }

    pub async fn delete_service(
        &self,
        uuid: &str,
        options: &DeleteServiceOptions,
    ) -> Result<Value, CoolifyError> {
        let path = endpoint(&["services", uuid])?;
        self.delete(&format!("{}?{}", path, options.to_query())).await
    }
}
