//! Server and private key API client

use openapi_client::models::{PrivateKey, Server, ServerResource};

use crate::errors::CoolifyError;
use crate::http::client::{endpoint, HttpClient};

impl HttpClient {
    pub async fn list_servers(&self) -> Result<Vec<Server>, CoolifyError> {
        self.get("/servers").await
    }

    pub async fn get_server(&self, uuid: &str) -> Result<Server, CoolifyError> {
        self.get(&endpoint(&["servers", uuid])?).await
    }

    /// Applications, databases and services placed on a server
    pub async fn list_server_resources(
        &self,
        uuid: &str,
    ) -> Result<Vec<ServerResource>, CoolifyError> {
        self.get(&endpoint(&["servers", uuid, "resources"])?).await
    }

    pub async fn list_private_keys(&self) -> Result<Vec<PrivateKey>, CoolifyError> {
        self.get("/security/keys").await
    }

    pub async fn get_private_key(&self, uuid: &str) -> Result<PrivateKey, CoolifyError> {
        self.get(&endpoint(&["security", "keys", uuid])?).await
    }
}
