use anyhow::Result;
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, Instrument};

use super::{connect, is_yes};
use crate::api::{ApiError, MutationGateway, WorkflowTransport};
use crate::config::WorkflowConsoleConfig;
use crate::presentation::{delete_confirmation_prompt, render_details, render_listing};
use crate::query::{DeleteOutcome, FetchOutcome, FetchTicket, QueryController};
use crate::telemetry::create_query_span;
use crate::workflows::{ResultPage, StatusFilter, WorkflowRecord};

type FetchCompletion = (FetchTicket, Result<ResultPage, ApiError>);

/// One line of user input in the browse loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseInput {
    Next,
    Prev,
    GoTo(u32),
    Keyword(String),
    Status(StatusFilter),
    Refresh,
    /// Row numbers are 1-based, as printed in the table
    Inspect(usize),
    Delete(usize),
    CloseDetails,
    Created,
    Help,
    Quit,
}

impl FromStr for BrowseInput {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        let row = |arg: &str| {
            arg.parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| format!("expected a row number, got '{arg}'"))
        };

        match command {
            "n" | "next" => Ok(Self::Next),
            "p" | "prev" => Ok(Self::Prev),
            "g" | "goto" => arg
                .parse()
                .map(Self::GoTo)
                .map_err(|_| format!("expected a page number, got '{arg}'")),
            "k" | "id" => Ok(Self::Keyword(arg.to_string())),
            "s" | "status" => arg.parse().map(Self::Status),
            "r" | "refresh" => Ok(Self::Refresh),
            "i" | "inspect" => row(arg).map(Self::Inspect),
            "d" | "delete" => row(arg).map(Self::Delete),
            "c" | "close" => Ok(Self::CloseDetails),
            "created" => Ok(Self::Created),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command '{other}'")),
        }
    }
}

const HELP: &str = "\
Commands:
  n / p            next / previous page
  g <page>         go to page
  k <workflow id>  filter by workflow ID (k alone clears it)
  s <status>       status filter: any, running, deleted
  r                reload the current page
  i <row>          show details of a row
  c                close details
  d <row>          delete a row (asks for confirmation)
  created          a workflow was created elsewhere: jump to page 1 and reload
  q                quit";

pub struct BrowseCommand {
    pub status: StatusFilter,
    pub workflow_id: Option<String>,
}

impl BrowseCommand {
    pub fn new() -> Self {
        Self {
            status: StatusFilter::Any,
            workflow_id: None,
        }
    }

    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    pub fn with_workflow_id(mut self, workflow_id: Option<String>) -> Self {
        self.workflow_id = workflow_id;
        self
    }

    pub async fn execute(&self, config: &WorkflowConsoleConfig) -> Result<()> {
        let client = connect(config)?;
        let transport: Arc<dyn WorkflowTransport> = client.clone();

        let mut controller = QueryController::new();
        controller.set_keyword(self.workflow_id.clone().unwrap_or_default());
        controller.set_status_filter(self.status);

        let (tx, mut rx) = mpsc::channel::<FetchCompletion>(16);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("🗂️  WORKFLOW CONSOLE ({})", client.api_root());
        println!("   Type 'h' for commands");
        dispatch_fetch(&mut controller, &transport, &tx);
        print_screen(&controller).await?;

        loop {
            tokio::select! {
                Some((ticket, result)) = rx.recv() => {
                    match controller.complete_fetch(ticket, result) {
                        FetchOutcome::Stale => continue,
                        // A failed list query leaves the table as it was; the log has the detail
                        FetchOutcome::Applied | FetchOutcome::Failed(_) => {}
                    }
                    dispatch_fetch(&mut controller, &transport, &tx);
                    print_screen(&controller).await?;
                }
                line = lines.next_line() => {
                    let Some(line) = line? else { break };
                    if line.trim().is_empty() {
                        print_prompt(&controller).await?;
                        continue;
                    }

                    if controller.selection().confirm_open() {
                        self.settle_delete(&mut controller, client.as_ref(), &line).await;
                    } else {
                        match line.parse::<BrowseInput>() {
                            Ok(BrowseInput::Quit) => break,
                            Ok(input) => apply_input(&mut controller, input),
                            Err(message) => println!("⚠️  {message} (type 'h' for help)"),
                        }
                    }

                    dispatch_fetch(&mut controller, &transport, &tx);
                    print_screen(&controller).await?;
                }
            }
        }

        println!("👋 Bye");
        Ok(())
    }

    async fn settle_delete(
        &self,
        controller: &mut QueryController,
        gateway: &dyn MutationGateway,
        answer: &str,
    ) {
        if !is_yes(answer) {
            controller.cancel_delete();
            println!("↩️  Delete cancelled");
            return;
        }

        match controller.delete_selected(gateway).await {
            DeleteOutcome::Deleted(record) => {
                println!("✅ Workflow has been deleted");
                println!("   Workflow ID: {}", record.id);
                if !record.name.is_empty() {
                    println!("   Workflow Name: {}", record.name);
                }
            }
            DeleteOutcome::Failed { record, error } => {
                println!("❌ Failed to delete workflow {}", record.id);
                println!("   {}", error.payload());
            }
            DeleteOutcome::NothingPending => {}
        }
    }
}

impl Default for BrowseCommand {
    fn default() -> Self {
        Self::new()
    }
}

/// Route a parsed input to the matching controller intent
pub fn apply_input(controller: &mut QueryController, input: BrowseInput) {
    match input {
        BrowseInput::Next => {
            if !controller.next_page() {
                println!("⚠️  Already on the last page");
            }
        }
        BrowseInput::Prev => {
            if !controller.prev_page() {
                println!("⚠️  Already on the first page");
            }
        }
        BrowseInput::GoTo(page) => controller.set_page(page),
        BrowseInput::Keyword(keyword) => controller.set_keyword(keyword),
        BrowseInput::Status(status) => controller.set_status_filter(status),
        BrowseInput::Refresh => controller.refresh(),
        BrowseInput::Created => controller.created(),
        BrowseInput::CloseDetails => controller.close_details(),
        BrowseInput::Inspect(row) => match row_record(controller, row) {
            Some(record) => controller.inspect(record),
            None => println!("⚠️  No row {row} on this page"),
        },
        BrowseInput::Delete(row) => match row_record(controller, row) {
            Some(record) => controller.request_delete(record),
            None => println!("⚠️  No row {row} on this page"),
        },
        BrowseInput::Help => println!("{HELP}"),
        BrowseInput::Quit => {}
    }
}

fn row_record(controller: &QueryController, row: usize) -> Option<WorkflowRecord> {
    row.checked_sub(1)
        .and_then(|index| controller.items().get(index))
        .cloned()
}

/// Spawn the pending fetch, if any. Completions come back on `tx`.
fn dispatch_fetch(
    controller: &mut QueryController,
    transport: &Arc<dyn WorkflowTransport>,
    tx: &mpsc::Sender<FetchCompletion>,
) {
    let Some(ticket) = controller.begin_fetch() else {
        return;
    };
    let span = create_query_span(
        "list_workflows",
        ticket.seq,
        &ticket.params,
        Some(&ticket.correlation_id),
    );
    let transport = Arc::clone(transport);
    let tx = tx.clone();

    tokio::spawn(
        async move {
            let result = transport.list_workflows(&ticket.params).await;
            if tx.send((ticket, result)).await.is_err() {
                debug!("Browse loop closed before fetch completed");
            }
        }
        .instrument(span),
    );
}

async fn print_screen(controller: &QueryController) -> Result<()> {
    println!();
    print!("{}", render_listing(&controller.snapshot()));

    let selection = controller.selection();
    if selection.details_open() {
        if let Some(record) = selection.selected() {
            println!();
            println!("{}", render_details(record));
        }
    }
    print_prompt(controller).await
}

/// The delete question while a confirmation is open, the command prompt otherwise
fn prompt_for(controller: &QueryController) -> String {
    match controller.selection().pending_delete() {
        Some(record) => delete_confirmation_prompt(record),
        None => "> ".to_string(),
    }
}

async fn print_prompt(controller: &QueryController) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt_for(controller).as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_navigation() {
        assert_eq!("n".parse::<BrowseInput>(), Ok(BrowseInput::Next));
        assert_eq!(" prev ".parse::<BrowseInput>(), Ok(BrowseInput::Prev));
        assert_eq!("g 4".parse::<BrowseInput>(), Ok(BrowseInput::GoTo(4)));
        assert!("g four".parse::<BrowseInput>().is_err());
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!(
            "k wf-12".parse::<BrowseInput>(),
            Ok(BrowseInput::Keyword("wf-12".to_string()))
        );
        assert_eq!(
            "k".parse::<BrowseInput>(),
            Ok(BrowseInput::Keyword(String::new()))
        );
        assert_eq!(
            "s deleted".parse::<BrowseInput>(),
            Ok(BrowseInput::Status(StatusFilter::Deleted))
        );
        assert!("s paused".parse::<BrowseInput>().is_err());
    }

    #[test]
    fn test_parse_rows_are_one_based() {
        assert_eq!("i 1".parse::<BrowseInput>(), Ok(BrowseInput::Inspect(1)));
        assert_eq!("d 10".parse::<BrowseInput>(), Ok(BrowseInput::Delete(10)));
        assert!("i 0".parse::<BrowseInput>().is_err());
        assert!("d".parse::<BrowseInput>().is_err());
        assert!("x".parse::<BrowseInput>().is_err());
    }

    fn loaded_controller() -> QueryController {
        let mut controller = QueryController::new();
        let ticket = controller.begin_fetch().unwrap();
        let mut first = WorkflowRecord::reference("wf-1");
        first.name = "orders".to_string();
        controller.complete_fetch(
            ticket,
            Ok(ResultPage {
                items: vec![first, WorkflowRecord::reference("wf-2")],
                total: 25,
            }),
        );
        controller
    }

    #[test]
    fn test_apply_navigation_marks_fetch() {
        let mut controller = loaded_controller();
        assert!(!controller.fetch_pending());

        apply_input(&mut controller, BrowseInput::Next);
        assert_eq!(controller.page(), 2);
        assert!(controller.fetch_pending());

        controller.begin_fetch();
        apply_input(&mut controller, BrowseInput::Prev);
        assert_eq!(controller.page(), 1);
        assert!(controller.fetch_pending());
    }

    #[test]
    fn test_apply_row_selection() {
        let mut controller = loaded_controller();

        apply_input(&mut controller, BrowseInput::Inspect(1));
        assert!(controller.selection().details_open());
        assert_eq!(controller.selection().selected().unwrap().name, "orders");

        apply_input(&mut controller, BrowseInput::Delete(2));
        assert!(!controller.selection().details_open());
        assert_eq!(controller.selection().pending_delete().unwrap().id, "wf-2");
    }

    #[test]
    fn test_prompt_repeats_delete_question_until_answered() {
        let mut controller = loaded_controller();
        assert_eq!(prompt_for(&controller), "> ");

        apply_input(&mut controller, BrowseInput::Delete(1));
        let prompt = prompt_for(&controller);
        assert!(prompt.contains("wf-1"));
        assert!(prompt.ends_with("[y/N] "));

        controller.cancel_delete();
        assert_eq!(prompt_for(&controller), "> ");
    }

    #[test]
    fn test_apply_missing_row_changes_nothing() {
        let mut controller = loaded_controller();
        apply_input(&mut controller, BrowseInput::Delete(9));
        assert!(controller.selection().pending_delete().is_none());
        assert!(!controller.fetch_pending());
    }
}
