use std::path::PathBuf;

use clap::{ArgAction, Parser};
use zbxapi::types::Severity;

#[allow(clippy::struct_excessive_bools)]
#[derive(Parser, Debug)]
#[command(author, version, about = "List Zabbix problems", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Include problems resolved recently.
    #[arg(long, action = ArgAction::SetTrue)]
    pub recent: bool,

    /// Only acknowledged problems.
    #[arg(long, action = ArgAction::SetTrue, conflicts_with = "unacknowledged")]
    pub acknowledged: bool,

    /// Only unacknowledged problems.
    #[arg(long, action = ArgAction::SetTrue)]
    pub unacknowledged: bool,

    /// Severity to include, by name or code (repeatable).
    #[arg(long = "severity", value_name = "SEVERITY")]
    pub severities: Vec<Severity>,

    /// Host ID to restrict to (repeatable).
    #[arg(long = "host-id", value_name = "ID")]
    pub host_ids: Vec<String>,

    /// Maximum number of problems; overrides `problems.limit`.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Fetch and print problem tags.
    #[arg(long, action = ArgAction::SetTrue)]
    pub tags: bool,

    /// Fetch problem updates (acknowledgements, messages).
    #[arg(long, action = ArgAction::SetTrue)]
    pub acknowledges: bool,

    /// Print problems as JSON in the API's wire format.
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Allow plain HTTP API URLs.
    #[arg(long, action = ArgAction::SetTrue)]
    pub insecure: bool,

    /// Emit logs as JSON (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "zbxapi=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
