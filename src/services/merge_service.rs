use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::info;
use url::Url;

use crate::config::Config;
use crate::dto::merge_dto::Page;
use crate::error::{Error, Result};

/// Read-only client for the Merge ATS list endpoints.
#[derive(Clone)]
pub struct MergeClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl MergeClient {
    pub fn new(client: Client, config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.merge_base_url).map_err(|e| {
            Error::Config(format!(
                "Invalid MERGE_BASE_URL {}: {}",
                config.merge_base_url, e
            ))
        })?;
        Ok(Self {
            client,
            base_url,
            api_key: config.merge_api_key.clone(),
        })
    }

    pub fn resource_url(&self, resource: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("MERGE_BASE_URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .push(resource);
        Ok(url)
    }

    /// Follows the `next` cursor from `{base}/{resource}` until it is null.
    /// Any failed or undecodable page aborts the whole fetch.
    pub async fn fetch_all<T>(&self, resource: &str, account_token: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Config("Missing Merge API key (MERGE_API_KEY)".to_string()))?;

        let mut items = Vec::new();
        let mut next_page = Some(self.resource_url(resource)?);
        while let Some(url) = next_page.take() {
            let response = self
                .client
                .get(url)
                .bearer_auth(api_key)
                .header("X-Account-Token", account_token)
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(Error::UpstreamStatus {
                    service: "merge",
                    status: status.as_u16(),
                    body,
                });
            }

            let page = response.json::<Page<T>>().await?;
            items.extend(page.results);
            next_page = match page.next.as_deref().filter(|next| !next.is_empty()) {
                Some(next) => Some(Url::parse(next).map_err(|e| Error::UpstreamStatus {
                    service: "merge",
                    status: status.as_u16(),
                    body: format!("invalid next cursor {}: {}", next, e),
                })?),
                None => None,
            };
        }

        info!("Fetched {} {} from Merge API", items.len(), resource);
        Ok(items)
    }
}
