use std::io::{self, Write};
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};
use tracing::info;
use zbxapi::Result;
use zbxapi::config::Config;
use zbxapi::telemetry::init_tracing;
use zbxapi::types::{SelectQuery, SortOrder};
use zbxapi::zbx_client::{GetParameters, Problem, ProblemGetParams, Session, ZbxClient};

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "config.toml";

/// Run the query described by `cli`. `Ok(None)` means nothing matched.
pub async fn run(cli: &Cli) -> Result<Option<Vec<Problem>>> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG));
    let mut config = Config::from_env_and_file(&config_path)?;
    if cli.insecure {
        config.insecure_http = true;
    }

    let session = Session::new(ZbxClient::from_config(&config)?);
    let params = build_params(cli, config.problem_limit);
    info!(url = %config.base_url, limit = ?params.base.limit, "querying problems");

    match session.get_problems(&params).await {
        Ok(problems) => Ok(Some(problems)),
        Err(err) if err.is_not_found() => {
            info!("no problems matched");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn build_params(cli: &Cli, default_limit: u32) -> ProblemGetParams {
    let acknowledged = if cli.acknowledged {
        Some(true)
    } else if cli.unacknowledged {
        Some(false)
    } else {
        None
    };

    ProblemGetParams {
        base: GetParameters {
            output: Some(SelectQuery::Extend),
            limit: Some(cli.limit.unwrap_or(default_limit)),
            sort_field: vec!["eventid".to_string()],
            sort_order: Some(SortOrder::Desc),
            editable: None,
        },
        host_ids: cli.host_ids.clone(),
        acknowledged,
        severities: cli.severities.clone(),
        recent: cli.recent.then_some(true),
        select_tags: cli.tags.then_some(SelectQuery::Extend),
        select_acknowledges: cli.acknowledges.then_some(SelectQuery::Extend),
        ..ProblemGetParams::default()
    }
}

pub fn render(problems: &[Problem], json: bool) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if json {
        serde_json::to_writer_pretty(&mut out, problems)?;
        writeln!(out)?;
        return Ok(());
    }
    for problem in problems {
        writeln!(out, "{}", format_line(problem))?;
        for ack in &problem.acknowledges {
            writeln!(
                out,
                "    {} user {}: {}",
                fmt_local(ack.clock),
                ack.user_id,
                ack.message
            )?;
        }
    }
    Ok(())
}

fn format_line(problem: &Problem) -> String {
    let status = if problem.is_resolved() {
        "RESOLVED"
    } else {
        "PROBLEM"
    };
    let ack = if problem.acknowledged { "ack" } else { "-" };
    let mut line = format!(
        "{}  #{:<10} {:<14} {:<8} {:<3}  {}",
        fmt_local(problem.clock),
        problem.event_id,
        problem.severity.label(),
        status,
        ack,
        problem.name
    );
    if !problem.tags.is_empty() {
        let tags: Vec<String> = problem
            .tags
            .iter()
            .map(|t| {
                if t.value.is_empty() {
                    t.tag.clone()
                } else {
                    format!("{}:{}", t.tag, t.value)
                }
            })
            .collect();
        line.push_str(&format!("  [{}]", tags.join(", ")));
    }
    line
}

fn fmt_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
