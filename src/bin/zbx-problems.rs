#[path = "zbx-problems/app.rs"]
mod app;
#[path = "zbx-problems/cli.rs"]
mod cli;

use std::error::Error as StdError;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::Cli::parse_args();
    match app::run(&cli).await {
        Ok(Some(problems)) => match app::render(&problems, cli.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: failed to write output: {err}");
                ExitCode::from(1)
            }
        },
        Ok(None) => ExitCode::from(2),
        Err(err) => {
            report_error(&err);
            ExitCode::from(1)
        }
    }
}

fn report_error(err: &zbxapi::error::Error) {
    eprintln!("Error: {err}");
    let mut source: Option<&dyn StdError> = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
}
