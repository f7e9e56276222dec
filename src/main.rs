use anyhow::Result;
use clap::Parser;

use workflow_console::cli::commands::browse::BrowseCommand;
use workflow_console::cli::commands::delete::DeleteCommand;
use workflow_console::cli::commands::init_config::InitConfigCommand;
use workflow_console::cli::commands::list::ListCommand;
use workflow_console::cli::{Cli, Commands};
use workflow_console::{api_metrics, config, init_telemetry, WorkflowConsoleConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = effective_config(&cli)?;
    init_telemetry(&settings.observability)?;

    let result = match cli.command {
        // Default behavior: no subcommand starts the interactive browser
        None => tokio::runtime::Runtime::new()?
            .block_on(async { BrowseCommand::new().execute(&settings).await }),
        Some(Commands::List {
            page,
            status,
            workflow_id,
            json,
        }) => tokio::runtime::Runtime::new()?.block_on(async {
            ListCommand::new()
                .with_page(page)
                .with_status(status)
                .with_workflow_id(workflow_id)
                .with_json(json)
                .execute(&settings)
                .await
        }),
        Some(Commands::Delete { id, yes }) => tokio::runtime::Runtime::new()?.block_on(async {
            DeleteCommand::new(id)
                .with_assume_yes(yes)
                .execute(&settings)
                .await
        }),
        Some(Commands::Browse {
            status,
            workflow_id,
        }) => tokio::runtime::Runtime::new()?.block_on(async {
            BrowseCommand::new()
                .with_status(status)
                .with_workflow_id(workflow_id)
                .execute(&settings)
                .await
        }),
        Some(Commands::InitConfig { path, force }) => {
            InitConfigCommand::new(path).with_force(force).execute()
        }
    };

    if settings.observability.metrics_enabled {
        api_metrics().log_stats();
    }
    result
}

/// Loaded configuration with command-line overrides applied
fn effective_config(cli: &Cli) -> Result<WorkflowConsoleConfig> {
    let mut settings = config()?.clone();
    if let Some(root) = &cli.api_root {
        settings.api.root = root.clone();
    }
    if cli.json_logs {
        settings.observability.json_logs = true;
    }
    Ok(settings)
}
