//! Database API client

use openapi_client::models::{
    ActionResponse, CreateDatabase, CreatedResource, Database, DatabaseEngine, UpdateDatabase,
};
use serde_json::Value;

use crate::errors::CoolifyError;
use crate::http::client::{decode_outcome, endpoint, HttpClient};

impl HttpClient {
    pub async fn list_databases(&self) -> Result<Vec<Database>, CoolifyError> {
        self.get("/databases").await
    }

    pub async fn get_database(&self, uuid: &str) -> Result<Database, CoolifyError> {
        self.get(&endpoint(&["databases", uuid])?).await
    }

    pub async fn start_database(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["databases", uuid, "start"])?).await
    }

    pub async fn stop_database(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["databases", uuid, "stop"])?).await
    }

    pub async fn restart_database(&self, uuid: &str) -> Result<ActionResponse, CoolifyError> {
        self.post_empty(&endpoint(&["databases", uuid, "restart"])?).await
    }

    pub async fn update_database(
        &self,
        uuid: &str,
        update: &UpdateDatabase,
    ) -> Result<Value, CoolifyError> {
        self.patch(&endpoint(&["databases", uuid])?, update).await
    }

    pub async fn create_database(
        &self,
        engine: DatabaseEngine,
        request: &CreateDatabase,
    ) -> Result<CreatedResource, CoolifyError> {
        let body: Value = self
            .post(&format!("/databases/{}", engine.as_path()), request)
            .await?;
        decode_outcome(body)
    }

    pub async fn delete_database(&self, uuid: &str) -> Result<Value, CoolifyError> {
        self.delete(&endpoint(&["databases", uuid])?).await
    }
}
