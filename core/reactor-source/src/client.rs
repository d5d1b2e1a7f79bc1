//! Reactor API client.
//!
//! Implements [`RemoteSource`] over HTTP using the Reactor JSON:API routes.

use crate::error::{SourceError, SourceResult};
use crate::source::{Document, Page, PageRequest, RemoteSource};
use async_trait::async_trait;
use reactor_types::{Entity, ExtensionPackage};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

const ACCEPT: &str = "application/vnd.api+json;revision=1";

/// Reactor API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactorConfig {
    /// Base URL of the Reactor API (e.g. `https://reactor.adobe.io`).
    pub base_url: String,
    /// Bearer access token issued by the identity service.
    pub access_token: String,
    /// API key (client id) of the integration.
    pub api_key: String,
    /// Organization id, sent as `x-gw-ims-org-id` when set.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://reactor.adobe.io".to_string(),
            access_token: String::new(),
            api_key: String::new(),
            org_id: None,
            timeout_secs: 60,
        }
    }
}

/// HTTP implementation of [`RemoteSource`].
pub struct ReactorClient {
    config: ReactorConfig,
    client: Client,
}

impl ReactorClient {
    /// Creates a new client. Fails when the configuration lacks credentials
    /// or the HTTP client cannot be built.
    pub fn new(config: ReactorConfig) -> SourceResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(SourceError::Config("no reactor base URL".to_string()));
        }
        if config.access_token.trim().is_empty() {
            return Err(SourceError::Config("no access token".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SourceError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Returns the configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), route)
    }

    fn request(&self, route: &str) -> RequestBuilder {
        let mut request = self
            .client
            .get(self.url(route))
            .bearer_auth(&self.config.access_token)
            .header("Accept", ACCEPT)
            .header("x-api-key", &self.config.api_key);

        if let Some(org_id) = &self.config.org_id {
            request = request.header("x-gw-ims-org-id", org_id);
        }

        request
    }

    async fn fetch<T: DeserializeOwned>(
        &self,
        route: &str,
        request: RequestBuilder,
    ) -> SourceResult<T> {
        debug!("GET {}", route);

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("GET {route} failed: {e}")))?;

        let status = response.status();
        if status.as_u16() == 404 {
            return Err(SourceError::NotFound(route.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("read {route} body failed: {e}")))?;

        serde_json::from_slice(&body).map_err(|e| SourceError::Decode(format!("{route}: {e}")))
    }

    async fn get_one<T: DeserializeOwned>(&self, route: &str) -> SourceResult<T> {
        let document: Document<T> = self.fetch(route, self.request(route)).await?;
        Ok(document.data)
    }

    async fn get_page(&self, route: &str, page: PageRequest) -> SourceResult<Page<Entity>> {
        let request = self.request(route).query(&[
            ("page[size]", page.size.to_string()),
            ("page[number]", page.number.to_string()),
        ]);
        self.fetch(route, request).await
    }
}

#[async_trait]
impl RemoteSource for ReactorClient {
    fn source_name(&self) -> &'static str {
        "Reactor API"
    }

    async fn get_property(&self, property_id: &str) -> SourceResult<Entity> {
        self.get_one(&format!("/properties/{property_id}")).await
    }

    async fn list_environments(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.get_page(&format!("/properties/{property_id}/environments"), page)
            .await
    }

    async fn list_data_elements(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.get_page(&format!("/properties/{property_id}/data_elements"), page)
            .await
    }

    async fn list_extensions(
        &self,
        property_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.get_page(&format!("/properties/{property_id}/extensions"), page)
            .await
    }

    async fn list_rules(&self, property_id: &str, page: PageRequest) -> SourceResult<Page<Entity>> {
        self.get_page(&format!("/properties/{property_id}/rules"), page)
            .await
    }

    async fn list_rule_components_for_rule(
        &self,
        rule_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.get_page(&format!("/rules/{rule_id}/rule_components"), page)
            .await
    }

    async fn list_rules_for_rule_component(
        &self,
        rule_component_id: &str,
        page: PageRequest,
    ) -> SourceResult<Page<Entity>> {
        self.get_page(&format!("/rule_components/{rule_component_id}/rules"), page)
            .await
    }

    async fn get_extension_package(&self, package_id: &str) -> SourceResult<ExtensionPackage> {
        self.get_one(&format!("/extension_packages/{package_id}"))
            .await
    }
}
