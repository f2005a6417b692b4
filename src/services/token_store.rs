use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{error, info};

/// Durable home for the Huntflow token pair. The client writes through this
/// whenever a refresh succeeds so a restart picks up the live tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn save(&self, access_token: &str, refresh_token: &str) -> Result<()>;
}

/// Persists tokens by rewriting the `KEY=value` lines of the `.env` file the
/// process was configured from.
pub struct EnvFileTokenStore {
    path: PathBuf,
}

impl EnvFileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

fn upsert_line(content: &mut String, key: &str, value: &str) {
    let prefix = format!("{}=", key);
    let replacement = format!("{}={}", key, value);
    let mut lines: Vec<String> = content.lines().map(|l| l.to_string()).collect();
    match lines.iter_mut().find(|line| line.starts_with(&prefix)) {
        Some(line) => *line = replacement,
        None => lines.push(replacement),
    }
    *content = lines.join("\n");
    content.push('\n');
}

#[async_trait]
impl TokenStore for EnvFileTokenStore {
    async fn save(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        let mut content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) => {
                // Missing env file is not fatal; the in-memory pair stays valid.
                error!(
                    "Env file not found at {}: {}. Refreshed tokens kept in memory only.",
                    self.path.display(),
                    e
                );
                return Ok(());
            }
        };

        upsert_line(&mut content, "HUNTFLOW_API_TOKEN", access_token);
        upsert_line(&mut content, "HUNTFLOW_REFRESH_TOKEN", refresh_token);

        tokio::fs::write(&self.path, content).await?;
        info!("Env file updated at {}", self.path.display());
        Ok(())
    }
}
