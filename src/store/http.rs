//! HTTP adapter for the configuration store.

use crate::agent::domain::AgentConfig;
use crate::config::StoreConfig;
use crate::error::SyncError;
use crate::store::{ConfigStoreClient, ModelCatalog};
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// reqwest-backed [`ConfigStoreClient`].
pub struct HttpConfigStore {
    base_url: String,
    agents_path: String,
    check_support_path: String,
    models_path: String,
    http_client: Client,
}

impl HttpConfigStore {
    /// Create a client from store configuration
    pub fn new(config: &StoreConfig) -> Result<Self, SyncError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            agents_path: config.agents_path.clone(),
            check_support_path: config.check_support_path.clone(),
            models_path: config.models_path.clone(),
            http_client,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn agents_url(&self) -> String {
        format!("{}{}", self.base_url, self.agents_path)
    }

    fn agent_url(&self, agent_id: &str) -> String {
        format!("{}{}/{}", self.base_url, self.agents_path, agent_id)
    }

    /// Map non-2xx responses onto the error taxonomy.
    async fn check_status(response: Response) -> Result<Response, SyncError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let detail = if body.is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, body)
        };
        Err(match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                SyncError::Validation(detail)
            }
            StatusCode::NOT_FOUND => SyncError::NotFound(detail),
            _ => SyncError::Transport(detail),
        })
    }
}

#[async_trait]
impl ConfigStoreClient for HttpConfigStore {
    async fn list(&self) -> Result<Vec<AgentConfig>, SyncError> {
        let response = self.http_client.get(self.agents_url()).send().await?;
        let agents = Self::check_status(response)
            .await?
            .json::<Vec<AgentConfig>>()
            .await?;
        Ok(agents)
    }

    async fn create(&self, config: &AgentConfig) -> Result<AgentConfig, SyncError> {
        let response = self
            .http_client
            .post(self.agents_url())
            .json(config)
            .send()
            .await?;
        let created = Self::check_status(response)
            .await?
            .json::<AgentConfig>()
            .await?;
        Ok(created)
    }

    async fn update(
        &self,
        agent_id: &str,
        config: &AgentConfig,
    ) -> Result<AgentConfig, SyncError> {
        let response = self
            .http_client
            .put(self.agent_url(agent_id))
            .json(config)
            .send()
            .await?;
        let updated = Self::check_status(response)
            .await?
            .json::<AgentConfig>()
            .await?;
        Ok(updated)
    }

    async fn delete(&self, agent_id: &str) -> Result<(), SyncError> {
        let response = self
            .http_client
            .delete(self.agent_url(agent_id))
            .send()
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn check_feature_support(&self) -> Result<bool, SyncError> {
        let url = format!("{}{}", self.base_url, self.check_support_path);
        let response = self.http_client.get(url).send().await?;
        let supported = Self::check_status(response).await?.json::<bool>().await?;
        Ok(supported)
    }
}

#[async_trait]
impl ModelCatalog for HttpConfigStore {
    async fn fetch_models(&self, provider: &str) -> Result<Vec<String>, SyncError> {
        let url = format!("{}{}", self.base_url, self.models_path);
        let response = self
            .http_client
            .get(url)
            .query(&[("provider", provider)])
            .send()
            .await?;
        let models = Self::check_status(response)
            .await?
            .json::<Vec<String>>()
            .await?;
        Ok(models)
    }
}
