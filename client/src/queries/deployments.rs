//! Deployment queries and pagination

use openapi_client::models::{Deployment, DeploymentStatus};
use serde_json::Value;
use tracing::debug;

use crate::cache::sync::{optimistic_update_insert_one_to_many, DEPLOYMENT_UUID_FIELD};
use crate::errors::CoolifyError;
use crate::queries::keys;
use crate::queries::Queries;

/// Offset of the page after one of `page_len` items fetched at `skip`
///
/// `None` once a page comes back empty or short, or the offset would not fit.
pub fn next_page_offset(skip: u32, take: u32, page_len: usize) -> Option<u32> {
    if page_len == 0 || page_len < take as usize {
        None
    } else {
        skip.checked_add(take)
    }
}

/// One page of an application's deployment history
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentPage {
    pub deployments: Vec<Deployment>,
    /// Offset of the next page, `None` when this was the last
    pub next_skip: Option<u32>,
    /// Total reported by the server
    pub total: Option<u64>,
}

impl Queries {
    /// Queued and running deployments across the instance
    pub async fn deployments(&self) -> Result<Vec<Deployment>, CoolifyError> {
        self.fetch_list(keys::deployments(), DEPLOYMENT_UUID_FIELD, || {
            self.http.list_deployments()
        })
        .await
    }

    pub async fn deployment(&self, uuid: &str) -> Result<Deployment, CoolifyError> {
        self.fetch_single(keys::deployment(uuid), || self.http.get_deployment(uuid))
            .await
    }

    pub async fn refetch_deployment(&self, uuid: &str) -> Result<Deployment, CoolifyError> {
        self.refetch_single(keys::deployment(uuid), || self.http.get_deployment(uuid))
            .await
    }

    /// Fetch one page of an application's deployments
    ///
    /// Every item is stored under its own deployment key; items still
    /// `in_progress` are also merged into the in-progress deployments list.
    pub async fn application_deployments(
        &self,
        application_uuid: &str,
        skip: u32,
        take: u32,
    ) -> Result<DeploymentPage, CoolifyError> {
        if take == 0 {
            return Err(CoolifyError::Validation(
                "Page size must be positive".to_string(),
            ));
        }

        let page = self
            .http
            .list_application_deployments(application_uuid, skip, take)
            .await?;

        let mut values = Vec::with_capacity(page.deployments.len());
        for deployment in &page.deployments {
            let value = serde_json::to_value(deployment)?;
            self.cache
                .set(keys::deployment(&deployment.deployment_uuid), value.clone());
            if deployment.status == DeploymentStatus::InProgress {
                optimistic_update_insert_one_to_many(&self.cache, &keys::deployments(), &value);
            }
            values.push(value);
        }
        self.cache.set(
            keys::application_deployments(application_uuid, skip, take),
            Value::Array(values),
        );

        let next_skip = next_page_offset(skip, take, page.deployments.len());
        debug!(
            "Fetched {} deployments for {} at offset {}, next {:?}",
            page.deployments.len(),
            application_uuid,
            skip,
            next_skip
        );

        Ok(DeploymentPage {
            deployments: page.deployments,
            next_skip,
            total: page.count,
        })
    }
}

/// Walks an application's deployments page by page from offset 0
#[derive(Debug, Clone)]
pub struct DeploymentPager {
    application_uuid: String,
    take: u32,
    next_skip: Option<u32>,
}

impl DeploymentPager {
    pub fn new(application_uuid: impl Into<String>, take: u32) -> Self {
        Self {
            application_uuid: application_uuid.into(),
            take,
            next_skip: Some(0),
        }
    }

    pub fn is_done(&self) -> bool {
        self.next_skip.is_none()
    }

    /// The next page, or `None` once the history is exhausted.
    ///
    /// The terminating fetch may return an empty page, which is reported as
    /// `Some(vec![])` followed by `None`.
    pub async fn next_page(
        &mut self,
        queries: &Queries,
    ) -> Result<Option<Vec<Deployment>>, CoolifyError> {
        let Some(skip) = self.next_skip else {
            return Ok(None);
        };
        let page = queries
            .application_deployments(&self.application_uuid, skip, self.take)
            .await?;
        self.next_skip = page.next_skip;
        Ok(Some(page.deployments))
    }
}
