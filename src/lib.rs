pub mod config;
pub mod dto;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    evaluation_service::EvaluationService,
    huntflow_service::HuntflowService,
    llm_service::{LlmClient, OpenAiService},
    status_service::StatusService,
    token_store::EnvFileTokenStore,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub huntflow_service: HuntflowService,
    pub evaluation_service: EvaluationService,
    pub status_service: StatusService,
}

impl AppState {
    pub fn new() -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .unwrap();

        let token_store = Arc::new(EnvFileTokenStore::new(&config.token_store_path));
        let huntflow_service = HuntflowService::new(
            http_client.clone(),
            config.huntflow_base_url.clone(),
            config.huntflow_account_id.clone(),
            config.huntflow_api_token.clone(),
            config.huntflow_refresh_token.clone(),
            token_store,
        );
        let llm: Arc<dyn LlmClient> =
            Arc::new(OpenAiService::new(config.openai_api_key.clone(), http_client));

        Self::with_services(huntflow_service, llm, config.target_city.clone())
    }

    /// Wires the service bundle from pre-built parts; tests use this to
    /// substitute the LLM client and point the ATS client at a stub server.
    pub fn with_services(
        huntflow_service: HuntflowService,
        llm: Arc<dyn LlmClient>,
        target_city: String,
    ) -> Self {
        let evaluation_service =
            EvaluationService::new(huntflow_service.clone(), llm, target_city);
        let status_service = StatusService::new(huntflow_service.clone());

        Self {
            huntflow_service,
            evaluation_service,
            status_service,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
