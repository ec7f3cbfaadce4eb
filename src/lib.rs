pub mod cli;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::database::store::RecordStore;
use crate::error::Result;
use crate::services::{
    import_service::Importer, merge_service::MergeClient, token_service::TokenService,
};
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub importer: Importer,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        let merge = MergeClient::new(http_client.clone(), &config)?;
        let tokens = TokenService::new(http_client, &config);
        let importer = Importer::new(store, merge, tokens);

        Ok(Self {
            config: Arc::new(config),
            importer,
        })
    }
}
