// Paginated, filtered workflow listing - explicit state machine for the query contract
//
// Watched inputs are keyword, status filter, page and refresh token. Changing any of
// them marks a fetch as pending; the driver asks for it with `begin_fetch` and hands the
// result back with `complete_fetch`. Only the most recently issued ticket may mutate the
// result page, whatever order the responses arrive in.

use serde::Serialize;
use statig::prelude::*;
use tracing::{debug, info, warn, Instrument};

use crate::api::{ApiError, MutationGateway, WorkflowTransport};
use crate::observability::api_metrics;
use crate::query::selection::{SelectionEvent, SelectionMachine};
use crate::telemetry::{create_query_span, generate_correlation_id};
use crate::workflows::{page_count, ListParams, ResultPage, StatusFilter, WorkflowRecord, PAGE_SIZE};

/// A fetch that has been initiated but not yet applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub seq: u64,
    pub params: ListParams,
    pub correlation_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The response replaced items and total.
    Applied,
    /// The list query failed; the previous items and total are untouched.
    Failed(ApiError),
    /// A newer fetch was initiated after this one; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted(WorkflowRecord),
    Failed { record: WorkflowRecord, error: ApiError },
    /// No record was awaiting confirmation.
    NothingPending,
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadModel {
    pub items: Vec<WorkflowRecord>,
    pub total: u64,
    pub page: u32,
    pub page_count: u32,
    pub is_loading: bool,
    pub keyword: String,
    pub status_filter: StatusFilter,
    pub can_go_prev: bool,
    pub can_go_next: bool,
}

pub struct QueryController {
    keyword: String,
    status_filter: StatusFilter,
    page: u32,
    refresh_token: u64,
    result: ResultPage,
    is_loading: bool,
    latest_seq: u64,
    fetch_pending: bool,
    selection: StateMachine<SelectionMachine>,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryController {
    /// A fresh controller. The first `begin_fetch` always yields a ticket.
    pub fn new() -> Self {
        Self {
            keyword: String::new(),
            status_filter: StatusFilter::Any,
            page: 1,
            refresh_token: 0,
            result: ResultPage::default(),
            is_loading: false,
            latest_seq: 0,
            fetch_pending: true,
            selection: SelectionMachine::default().state_machine(),
        }
    }

    // --- intents -----------------------------------------------------------

    /// Empty means no filter. Anything else is passed through as `workflow_id`.
    pub fn set_keyword(&mut self, value: impl Into<String>) {
        let value = value.into();
        if value != self.keyword {
            self.keyword = value;
            self.fetch_pending = true;
        }
    }

    pub fn set_status_filter(&mut self, value: StatusFilter) {
        if value != self.status_filter {
            self.status_filter = value;
            self.fetch_pending = true;
        }
    }

    /// Pages are 1-based; 0 is read as 1. No upper clamp: an out-of-range page is
    /// sent to the server and whatever comes back is rendered.
    pub fn set_page(&mut self, n: u32) {
        let n = n.max(1);
        if n != self.page {
            self.page = n;
            self.fetch_pending = true;
        }
    }

    /// Force a re-fetch with unchanged filters and page.
    pub fn refresh(&mut self) {
        self.refresh_token = self.refresh_token.wrapping_add(1);
        self.fetch_pending = true;
        debug!(refresh_token = self.refresh_token, "Refresh requested");
    }

    /// Returns false when already on the first page.
    pub fn prev_page(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }
        self.set_page(self.page - 1);
        true
    }

    /// Returns false when already on the last page.
    pub fn next_page(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.set_page(self.page + 1);
        true
    }

    /// A workflow was created elsewhere; jump back to the first page and re-fetch.
    pub fn created(&mut self) {
        self.set_page(1);
        self.refresh();
    }

    pub fn inspect(&mut self, record: WorkflowRecord) {
        self.selection.handle(&SelectionEvent::Inspect(record));
    }

    pub fn close_details(&mut self) {
        self.selection.handle(&SelectionEvent::CloseDetails);
    }

    /// The details dialog saved a change to the inspected workflow.
    pub fn details_saved(&mut self) {
        self.selection.handle(&SelectionEvent::CloseDetails);
        self.refresh();
    }

    pub fn request_delete(&mut self, record: WorkflowRecord) {
        self.selection.handle(&SelectionEvent::RequestDelete(record));
    }

    pub fn cancel_delete(&mut self) {
        self.selection.handle(&SelectionEvent::CancelDelete);
    }

    // --- fetch lifecycle ---------------------------------------------------

    /// Parameters for the list query as the state stands right now.
    pub fn request_params(&self) -> ListParams {
        ListParams {
            page: self.page,
            size: PAGE_SIZE,
            status: self.status_filter.wire_value().map(str::to_string),
            workflow_id: if self.keyword.is_empty() {
                None
            } else {
                Some(self.keyword.clone())
            },
        }
    }

    pub fn fetch_pending(&self) -> bool {
        self.fetch_pending
    }

    /// Start a fetch if a watched input changed since the last one was initiated.
    /// Any fetch still outstanding becomes stale.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if !self.fetch_pending {
            return None;
        }
        self.fetch_pending = false;
        self.latest_seq += 1;
        self.is_loading = true;

        let ticket = FetchTicket {
            seq: self.latest_seq,
            params: self.request_params(),
            correlation_id: generate_correlation_id(),
        };
        debug!(
            seq = ticket.seq,
            page = ticket.params.page,
            status = ?ticket.params.status,
            workflow_id = ?ticket.params.workflow_id,
            "Fetch initiated"
        );
        Some(ticket)
    }

    /// Reconcile a finished fetch into the read model.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<ResultPage, ApiError>,
    ) -> FetchOutcome {
        if ticket.seq != self.latest_seq {
            api_metrics().record_stale_response();
            debug!(
                seq = ticket.seq,
                latest_seq = self.latest_seq,
                "Discarding response from superseded fetch"
            );
            return FetchOutcome::Stale;
        }

        self.is_loading = false;
        match result {
            Ok(page) => {
                let previous_total = self.result.total;
                self.result = page;
                info!(
                    seq = ticket.seq,
                    total = self.result.total,
                    items = self.result.items.len(),
                    "Workflow page loaded"
                );
                self.clamp_page_after_shrink(previous_total);
                FetchOutcome::Applied
            }
            Err(error) => {
                warn!(seq = ticket.seq, error = %error, "Workflow list query failed; keeping previous page");
                FetchOutcome::Failed(error)
            }
        }
    }

    /// Issue the pending fetch (if any) and apply its result.
    pub async fn fetch_page(&mut self, transport: &dyn WorkflowTransport) -> Option<FetchOutcome> {
        let ticket = self.begin_fetch()?;
        let span = create_query_span(
            "list_workflows",
            ticket.seq,
            &ticket.params,
            Some(&ticket.correlation_id),
        );
        let result = transport
            .list_workflows(&ticket.params)
            .instrument(span)
            .await;
        Some(self.complete_fetch(ticket, result))
    }

    /// Keep `page` within `[1, page_count]` when the result set shrinks under it.
    fn clamp_page_after_shrink(&mut self, previous_total: u64) {
        let count = self.page_count();
        if self.result.total < previous_total && self.page > count {
            info!(
                from = self.page,
                to = count,
                total = self.result.total,
                "Result set shrank below current page; moving to last page"
            );
            self.page = count;
            self.fetch_pending = true;
        }
    }

    // --- deletion ----------------------------------------------------------

    /// Delete the record awaiting confirmation.
    ///
    /// Selection and confirmation are cleared whatever the outcome. On success the
    /// list is refreshed rather than edited locally; on failure it is left as is.
    pub async fn delete_selected(&mut self, gateway: &dyn MutationGateway) -> DeleteOutcome {
        let Some(record) = self.selection.inner().pending_delete().cloned() else {
            return DeleteOutcome::NothingPending;
        };

        let result = gateway.delete_workflow(&record.id).await;
        self.selection.handle(&SelectionEvent::DeleteSettled);

        match result {
            Ok(()) => {
                api_metrics().record_delete();
                info!(workflow_id = %record.id, workflow_name = %record.name, "Workflow deleted");
                self.refresh();
                DeleteOutcome::Deleted(record)
            }
            Err(error) => {
                warn!(workflow_id = %record.id, error = %error, "Failed to delete workflow");
                DeleteOutcome::Failed { record, error }
            }
        }
    }

    // --- read model --------------------------------------------------------

    pub fn page_count(&self) -> u32 {
        page_count(self.result.total, PAGE_SIZE)
    }

    pub fn can_go_prev(&self) -> bool {
        self.page > 1
    }

    pub fn can_go_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn status_filter(&self) -> StatusFilter {
        self.status_filter
    }

    pub fn refresh_token(&self) -> u64 {
        self.refresh_token
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn items(&self) -> &[WorkflowRecord] {
        &self.result.items
    }

    pub fn total(&self) -> u64 {
        self.result.total
    }

    pub fn selection(&self) -> &SelectionMachine {
        self.selection.inner()
    }

    pub fn snapshot(&self) -> ReadModel {
        ReadModel {
            items: self.result.items.clone(),
            total: self.result.total,
            page: self.page,
            page_count: self.page_count(),
            is_loading: self.is_loading,
            keyword: self.keyword.clone(),
            status_filter: self.status_filter,
            can_go_prev: self.can_go_prev(),
            can_go_next: self.can_go_next(),
        }
    }
}
