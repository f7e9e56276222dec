use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::workflows::StatusFilter;

pub mod commands;

#[derive(Parser)]
#[command(name = "workflow-console")]
#[command(about = "Browse, filter and delete workflows on a workflow admin API")]
#[command(long_about = "Terminal console for a workflow admin API. Lists workflow definitions \
                       page by page with their instance counters, filters by workflow ID and status, \
                       and deletes workflows after confirmation. Start with 'workflow-console browse'.")]
pub struct Cli {
    /// Override the configured API root (e.g. http://localhost:8080)
    #[arg(long, global = true)]
    pub api_root: Option<String>,

    /// Emit JSON log lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one page of workflows
    List {
        /// Page number (1-based)
        #[arg(long, default_value = "1")]
        page: u32,
        /// Status filter: any, running or deleted
        #[arg(long, default_value = "any", help = "Status filter: any, running or deleted")]
        status: StatusFilter,
        /// Only workflows matching this workflow ID
        #[arg(long, help = "Filter by workflow ID (passed to the server as-is)")]
        workflow_id: Option<String>,
        /// Print the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Delete a workflow by ID
    Delete {
        /// Workflow ID to delete
        id: String,
        /// Skip the confirmation prompt
        #[arg(short = 'y', long, help = "Delete without asking for confirmation")]
        yes: bool,
    },
    /// Interactive listing with paging, filters, details and delete
    Browse {
        /// Initial status filter
        #[arg(long, default_value = "any")]
        status: StatusFilter,
        /// Initial workflow ID filter
        #[arg(long)]
        workflow_id: Option<String>,
    },
    /// Write a configuration file with the default settings
    InitConfig {
        /// Where to write the file
        #[arg(long, default_value = "workflow-console.toml")]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
