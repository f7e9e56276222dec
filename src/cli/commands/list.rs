use anyhow::{anyhow, Result};

use super::connect;
use crate::config::WorkflowConsoleConfig;
use crate::presentation::render_listing;
use crate::query::{FetchOutcome, QueryController};
use crate::workflows::StatusFilter;

pub struct ListCommand {
    pub page: u32,
    pub status: StatusFilter,
    pub workflow_id: Option<String>,
    pub json: bool,
}

impl ListCommand {
    pub fn new() -> Self {
        Self {
            page: 1,
            status: StatusFilter::Any,
            workflow_id: None,
            json: false,
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: Option<String>) -> Self {
        self.workflow_id = workflow_id;
        self
    }

    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Controller configured with this command's filters, not yet fetched
    pub fn controller(&self) -> QueryController {
        let mut controller = QueryController::new();
        controller.set_keyword(self.workflow_id.clone().unwrap_or_default());
        controller.set_status_filter(self.status);
        controller.set_page(self.page);
        controller
    }

    pub async fn execute(&self, config: &WorkflowConsoleConfig) -> Result<()> {
        let client = connect(config)?;
        let mut controller = self.controller();

        match controller.fetch_page(client.as_ref()).await {
            Some(FetchOutcome::Failed(error)) => {
                println!("❌ Failed to load workflows: {}", error.payload());
                return Err(anyhow!(error));
            }
            Some(_) | None => {}
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&controller.snapshot())?);
        } else {
            println!("📋 WORKFLOWS");
            println!("============");
            print!("{}", render_listing(&controller.snapshot()));
        }
        Ok(())
    }
}

impl Default for ListCommand {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_controller_carries_filters() {
        let command = ListCommand::new()
            .with_page(3)
            .with_status(StatusFilter::Deleted)
            .with_workflow_id(Some("wf-1".to_string()));
        let params = command.controller().request_params();

        assert_eq!(params.page, 3);
        assert_eq!(params.status.as_deref(), Some("-1"));
        assert_eq!(params.workflow_id.as_deref(), Some("wf-1"));
    }

    #[test]
    fn test_default_controller_sends_no_filters() {
        let params = ListCommand::new().controller().request_params();
        assert_eq!(params.page, 1);
        assert!(params.status.is_none());
        assert!(params.workflow_id.is_none());
    }
}
