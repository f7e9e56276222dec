use anyhow::{anyhow, Result};

use super::{confirm, connect};
use crate::config::WorkflowConsoleConfig;
use crate::presentation::delete_confirmation_prompt;
use crate::query::{DeleteOutcome, FetchOutcome, QueryController};
use crate::workflows::WorkflowRecord;

pub struct DeleteCommand {
    pub id: String,
    pub assume_yes: bool,
}

impl DeleteCommand {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            assume_yes: false,
        }
    }

    pub fn with_assume_yes(mut self, assume_yes: bool) -> Self {
        self.assume_yes = assume_yes;
        self
    }

    pub async fn execute(&self, config: &WorkflowConsoleConfig) -> Result<()> {
        let client = connect(config)?;

        // Look the workflow up first so the prompt can show its name
        let mut controller = QueryController::new();
        controller.set_keyword(self.id.clone());
        let record = match controller.fetch_page(client.as_ref()).await {
            Some(FetchOutcome::Applied) => pick_record(controller.items(), &self.id),
            _ => None,
        }
        .unwrap_or_else(|| {
            tracing::debug!(workflow_id = %self.id, "Workflow not found in listing, deleting by ID");
            WorkflowRecord::reference(&self.id)
        });

        controller.request_delete(record.clone());
        if !self.assume_yes && !confirm(&delete_confirmation_prompt(&record)).await? {
            controller.cancel_delete();
            println!("↩️  Cancelled, workflow {} was not deleted", record.id);
            return Ok(());
        }

        match controller.delete_selected(client.as_ref()).await {
            DeleteOutcome::Deleted(record) => {
                println!("✅ Workflow has been deleted");
                println!("   Workflow ID: {}", record.id);
                if !record.name.is_empty() {
                    println!("   Workflow Name: {}", record.name);
                }
                Ok(())
            }
            DeleteOutcome::Failed { record, error } => {
                println!("❌ Failed to delete workflow {}", record.id);
                println!("   {}", error.payload());
                if error.is_not_found() {
                    println!("   → Check the ID with: workflow-console list --workflow-id {}", record.id);
                }
                Err(anyhow!(error))
            }
            DeleteOutcome::NothingPending => Err(anyhow!("no workflow awaiting deletion")),
        }
    }
}

/// Exact ID match within a filtered page
fn pick_record(items: &[WorkflowRecord], id: &str) -> Option<WorkflowRecord> {
    items.iter().find(|record| record.id == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_record_requires_exact_id() {
        let mut a = WorkflowRecord::reference("wf-10");
        a.name = "ten".to_string();
        let mut b = WorkflowRecord::reference("wf-1");
        b.name = "one".to_string();

        let picked = pick_record(&[a, b], "wf-1").unwrap();
        assert_eq!(picked.name, "one");
        assert!(pick_record(&[], "wf-1").is_none());
    }
}
