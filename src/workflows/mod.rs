// Workflow domain model shared by the query controller, the HTTP client and the CLI

pub mod types;

pub use types::{
    page_count, ListParams, ResultPage, StatusFilter, WorkflowRecord, WorkflowStatus, PAGE_SIZE,
};
