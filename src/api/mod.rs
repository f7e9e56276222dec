pub mod errors;
pub mod traits;

pub use errors::ApiError;
pub use traits::{MutationGateway, WorkflowTransport};

#[cfg(test)]
pub use traits::{MockMutationGateway, MockWorkflowTransport};
