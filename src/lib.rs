// Workflow Console Library - paginated, filtered workflow listing against a workflow admin API
// This exposes the core components for testing and integration

pub mod api;
pub mod cli;
pub mod config;
pub mod http;
pub mod observability;
pub mod presentation;
pub mod query;
pub mod telemetry;
pub mod workflows;

// Re-export key types for easy access
pub use api::{ApiError, MutationGateway, WorkflowTransport};
pub use config::{config, WorkflowConsoleConfig};
pub use http::HttpWorkflowClient;
pub use observability::{api_metrics, ApiMetrics, ApiStats};
pub use query::{
    DeleteOutcome, FetchOutcome, FetchTicket, QueryController, ReadModel, SelectionEvent,
    SelectionMachine,
};
pub use telemetry::{create_query_span, generate_correlation_id, init_telemetry};
pub use workflows::{
    page_count, ListParams, ResultPage, StatusFilter, WorkflowRecord, WorkflowStatus, PAGE_SIZE,
};
