//! Deployment API client

use openapi_client::models::{Deployment, DeploymentsPage};

use crate::errors::CoolifyError;
use crate::http::client::{endpoint, HttpClient};

impl HttpClient {
    /// Deployments currently queued or running across the instance
    pub async fn list_deployments(&self) -> Result<Vec<Deployment>, CoolifyError> {
        self.get("/deployments").await
    }

    pub async fn get_deployment(&self, uuid: &str) -> Result<Deployment, CoolifyError> {
        self.get(&endpoint(&["deployments", uuid])?).await
    }

    /// One page of an application's deployment history, newest first
    pub async fn list_application_deployments(
        &self,
        application_uuid: &str,
        skip: u32,
        take: u32,
    ) -> Result<DeploymentsPage, CoolifyError> {
        let path = endpoint(&["deployments", "applications", application_uuid])?;
        self.get(&format!("{}?skip={}&take={}", path, skip, take))
            .await
    }
}
