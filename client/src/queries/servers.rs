//! Server and private key queries

use openapi_client::models::{PrivateKey, Server, ServerResource};

use crate::cache::sync::UUID_FIELD;
use crate::errors::CoolifyError;
use crate::queries::keys;
use crate::queries::Queries;

impl Queries {
    pub async fn servers(&self) -> Result<Vec<Server>, CoolifyError> {
        self.fetch_list(keys::servers(), UUID_FIELD, || self.http.list_servers())
            .await
    }

    pub async fn server(&self, uuid: &str) -> Result<Server, CoolifyError> {
        self.fetch_single(keys::server(uuid), || self.http.get_server(uuid))
            .await
    }

    pub async fn server_resources(&self, uuid: &str) -> Result<Vec<ServerResource>, CoolifyError> {
        self.refetch_single(keys::server_resources(uuid), || {
            self.http.list_server_resources(uuid)
        })
        .await
    }

    pub async fn private_keys(&self) -> Result<Vec<PrivateKey>, CoolifyError> {
        self.fetch_list(keys::private_keys(), UUID_FIELD, || {
            self.http.list_private_keys()
        })
        .await
    }

    pub async fn private_key(&self, uuid: &str) -> Result<PrivateKey, CoolifyError> {
        self.fetch_single(keys::private_key(uuid), || self.http.get_private_key(uuid))
            .await
    }
}
