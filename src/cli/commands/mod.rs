use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::config::WorkflowConsoleConfig;
use crate::http::HttpWorkflowClient;

pub mod browse;
pub mod delete;
pub mod init_config;
pub mod list;

/// Build the HTTP client, printing a short diagnostic when the configuration is unusable
pub fn connect(config: &WorkflowConsoleConfig) -> Result<Arc<HttpWorkflowClient>> {
    match HttpWorkflowClient::new(&config.api) {
        Ok(client) => {
            tracing::debug!(api_root = %client.api_root(), "Workflow API client ready");
            Ok(Arc::new(client))
        }
        Err(e) => {
            println!("❌ {e}");
            println!("   → Set it with: workflow-console --api-root http://host:port <command>");
            println!("   → Or export WORKFLOW_CONSOLE_API__ROOT=http://host:port");
            Err(e.into())
        }
    }
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
pub async fn confirm(prompt: &str) -> Result<bool> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
    Ok(is_yes(&line))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_yes() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }
}
