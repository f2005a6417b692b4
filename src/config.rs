use crate::error::{Error, Result};
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub huntflow_base_url: String,
    pub huntflow_account_id: String,
    pub huntflow_api_token: String,
    pub huntflow_refresh_token: String,
    pub webhook_secret: String,
    pub openai_api_key: String,
    pub trigger_stage: String,
    pub target_city: String,
    pub token_store_path: String,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            huntflow_base_url: get_env("HUNTFLOW_BASE_URL")?,
            huntflow_account_id: get_env("HUNTFLOW_ACCOUNT_ID")?,
            huntflow_api_token: get_env("HUNTFLOW_API_TOKEN")?,
            huntflow_refresh_token: get_env("HUNTFLOW_REFRESH_TOKEN")?,
            webhook_secret: get_env("WEBHOOK_SECRET")?,
            openai_api_key: get_env("OPENAI_API_KEY")?,
            trigger_stage: get_env_or("TRIGGER_STAGE", "Отклики"),
            target_city: get_env_or("TARGET_CITY", "Пермь"),
            token_store_path: get_env_or("TOKEN_STORE_PATH", ".env"),
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
