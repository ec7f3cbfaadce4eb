use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::config::Config;
use crate::error::{Error, Result};

/// Non-JWT bearer tokens longer than this are taken as Merge account tokens.
const DIRECT_TOKEN_MIN_LEN: usize = 20;

#[derive(Debug, Deserialize)]
struct ExchangeResponse {
    token: Option<String>,
}

/// Produces the Merge account token for a request.
#[derive(Clone)]
pub struct TokenService {
    client: Client,
    backend_url: Option<String>,
    backend_api_key: Option<String>,
    fallback_token: Option<String>,
}

pub fn looks_like_jwt(token: &str) -> bool {
    jsonwebtoken::decode_header(token).is_ok()
}

impl TokenService {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            backend_url: config.backend_url.clone(),
            backend_api_key: config.backend_api_key.clone(),
            fallback_token: config.merge_account_token.clone(),
        }
    }

    /// A long non-JWT bearer is used as-is, anything else is exchanged with
    /// the backend. Without a bearer the configured account token is used.
    pub async fn account_token(&self, bearer: Option<&str>) -> Result<String> {
        let bearer = bearer.map(str::trim).filter(|t| !t.is_empty());
        match bearer {
            Some(token) if !looks_like_jwt(token) && token.len() > DIRECT_TOKEN_MIN_LEN => {
                info!("Token appears to be a Merge account token, using it directly");
                Ok(token.to_string())
            }
            Some(token) => self.exchange(token).await,
            None => self.fallback_token.clone().ok_or_else(|| {
                Error::bad_request("Missing user token. Authentication required.")
            }),
        }
    }

    async fn exchange(&self, user_token: &str) -> Result<String> {
        let (Some(backend_url), Some(api_key)) =
            (self.backend_url.as_deref(), self.backend_api_key.as_deref())
        else {
            return Err(Error::Config(
                "Missing backend configuration (BACKEND_URL, BACKEND_API_KEY)".to_string(),
            ));
        };

        let url = format!(
            "{}/functions/v1/exchange-token",
            backend_url.trim_end_matches('/')
        );
        info!("Exchanging user token at {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(user_token)
            .header("apikey", api_key)
            .json(&json!({ "action": "get_merge_token" }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Token exchange failed with HTTP {}", status);
            return Err(Error::UpstreamStatus {
                service: "token-exchange",
                status: status.as_u16(),
                body,
            });
        }

        let data = response.json::<ExchangeResponse>().await?;
        match data.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                info!("Successfully obtained Merge token from token exchange");
                Ok(token)
            }
            None => Err(Error::UpstreamStatus {
                service: "token-exchange",
                status: status.as_u16(),
                body: "No token returned from token exchange".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn service(fallback: Option<&str>) -> TokenService {
        let config = Config {
            merge_account_token: fallback.map(str::to_string),
            ..Config::default()
        };
        TokenService::new(Client::new(), &config)
    }

    #[test]
    fn jwt_detection_reads_the_header() {
        let jwt = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.eyJzdWIiOiIxIn0.c2ln";
        assert!(looks_like_jwt(jwt));
        assert!(!looks_like_jwt("merge_account_token_0123456789"));
    }

    #[tokio::test]
    async fn long_opaque_token_is_used_directly() {
        let token = service(None)
            .account_token(Some("merge_account_token_0123456789"))
            .await
            .unwrap();
        assert_eq!(token, "merge_account_token_0123456789");
    }

    #[tokio::test]
    async fn no_bearer_uses_configured_token_or_fails() {
        let token = service(Some("configured")).account_token(None).await.unwrap();
        assert_eq!(token, "configured");

        let err = service(None).account_token(None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.to_string(), "Missing user token. Authentication required.");
    }

    #[tokio::test]
    async fn exchange_without_backend_is_a_config_error() {
        let err = service(None).account_token(Some("short")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
