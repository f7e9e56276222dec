//! Collaborator interfaces consumed by the query controller.
//!
//! The controller never talks HTTP directly; it is handed something that can
//! list workflows and something that can delete one. Tests substitute mocks.

use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::errors::ApiError;
use crate::workflows::{ListParams, ResultPage};

/// Read side: `GET {api_root}/workflow`
#[cfg_attr(test, automock)]
#[async_trait]
pub trait WorkflowTransport: Send + Sync {
    async fn list_workflows(&self, params: &ListParams) -> Result<ResultPage, ApiError>;
}

/// Write side: `DELETE {api_root}/workflow/{id}`
#[cfg_attr(test, automock)]
#[async_trait]
pub trait MutationGateway: Send + Sync {
    async fn delete_workflow(&self, id: &str) -> Result<(), ApiError>;
}
