use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the workflow console
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConsoleConfig {
    /// Workflow API settings
    pub api: ApiConfig,
    /// Logging and metrics settings
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ApiConfig {
    /// Base URL the `/workflow` endpoints hang off
    pub root: String,
    /// Bearer token (can be set via env var)
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Client-side rate limiting settings
    pub rate_limit: RateLimitConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,
    /// Burst capacity
    pub burst_capacity: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    /// Log level / filter directive
    pub log_level: String,
    /// Emit JSON log lines instead of compact text
    pub json_logs: bool,
    /// Log API counters when the console exits
    pub metrics_enabled: bool,
}

impl Default for WorkflowConsoleConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                root: "http://localhost:8080".to_string(),
                token: None, // Will be read from env var or .workflow-console-rc
                timeout_seconds: 10,
                rate_limit: RateLimitConfig {
                    requests_per_second: 5,
                    burst_capacity: 10,
                },
            },
            observability: ObservabilityConfig {
                log_level: "warn".to_string(),
                json_logs: false,
                metrics_enabled: false,
            },
        }
    }
}

impl WorkflowConsoleConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (workflow-console.toml, .workflow-console-rc)
    /// 3. Environment variables (prefixed with WORKFLOW_CONSOLE_, `__` between sections)
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Same as [`load`](Self::load) but looks for configuration files in `dir`.
    pub fn load_from(dir: &Path) -> Result<Self> {
        let defaults = Config::try_from(&WorkflowConsoleConfig::default())?;
        let mut builder = Config::builder().add_source(defaults);

        let toml_path = dir.join("workflow-console.toml");
        if toml_path.exists() {
            builder = builder.add_source(File::from(toml_path));
        }

        let rc_path = dir.join(".workflow-console-rc");
        if rc_path.exists() {
            builder = builder.add_source(File::from(rc_path).format(config::FileFormat::Toml));
        }

        // Override with environment variables
        builder = builder.add_source(
            Environment::with_prefix("WORKFLOW_CONSOLE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let mut console_config: WorkflowConsoleConfig = config.try_deserialize()?;

        if console_config.api.token.is_none() {
            if let Ok(token) = std::env::var("WORKFLOW_API_TOKEN") {
                console_config.api.token = Some(token);
            }
        }

        Ok(console_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<WorkflowConsoleConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = WorkflowConsoleConfig::load_env_file();
        WorkflowConsoleConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static WorkflowConsoleConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_when_no_files_present() {
        let dir = TempDir::new().unwrap();
        let loaded = WorkflowConsoleConfig::load_from(dir.path()).unwrap();
        let defaults = WorkflowConsoleConfig::default();

        assert_eq!(loaded.api.root, defaults.api.root);
        assert_eq!(loaded.api.timeout_seconds, defaults.api.timeout_seconds);
        assert_eq!(loaded.observability, defaults.observability);
    }

    #[test]
    fn test_toml_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("workflow-console.toml"),
            "[api]\nroot = \"http://eventmesh.internal:10106\"\ntimeout_seconds = 3\n",
        )
        .unwrap();

        let loaded = WorkflowConsoleConfig::load_from(dir.path()).unwrap();
        assert_eq!(loaded.api.root, "http://eventmesh.internal:10106");
        assert_eq!(loaded.api.timeout_seconds, 3);
        // Untouched sections keep their defaults
        assert_eq!(loaded.api.rate_limit.burst_capacity, 10);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut cfg = WorkflowConsoleConfig::default();
        cfg.observability.json_logs = true;
        cfg.save_to_file(dir.path().join("workflow-console.toml")).unwrap();

        let loaded = WorkflowConsoleConfig::load_from(dir.path()).unwrap();
        assert!(loaded.observability.json_logs);
    }
}
