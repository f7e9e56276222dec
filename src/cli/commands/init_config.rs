use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::WorkflowConsoleConfig;

pub struct InitConfigCommand {
    pub path: PathBuf,
    pub force: bool,
}

impl InitConfigCommand {
    pub fn new(path: PathBuf) -> Self {
        Self { path, force: false }
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    pub fn execute(&self) -> Result<()> {
        if self.path.exists() && !self.force {
            println!("⚠️  {} already exists", self.path.display());
            println!("   → Re-run with --force to overwrite it");
            bail!("refusing to overwrite {}", self.path.display());
        }

        WorkflowConsoleConfig::default().save_to_file(&self.path)?;
        println!("✅ Wrote default configuration to {}", self.path.display());
        println!("   → Point [api].root at your workflow API");
        println!("   → Put the token in WORKFLOW_API_TOKEN rather than the file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_writes_loadable_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workflow-console.toml");

        InitConfigCommand::new(path.clone()).execute().unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: WorkflowConsoleConfig = toml::from_str(&written).unwrap();
        assert_eq!(parsed, WorkflowConsoleConfig::default());
    }

    #[test]
    fn test_refuses_to_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workflow-console.toml");
        std::fs::write(&path, "# mine").unwrap();

        assert!(InitConfigCommand::new(path.clone()).execute().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# mine");

        InitConfigCommand::new(path.clone())
            .with_force(true)
            .execute()
            .unwrap();
        assert_ne!(std::fs::read_to_string(&path).unwrap(), "# mine");
    }
}
