//! jiradmin - administer JIRA from the command line.

use std::process::ExitCode;

use clap::Parser;

use jiradmin::cli::{self, Cli, Outcome};
use jiradmin::logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    let code = match cli::run(cli).await {
        Ok(Outcome::Complete) => ExitCode::SUCCESS,
        Ok(Outcome::Partial) => ExitCode::from(2),
        Err(e) => {
            tracing::error!("Command failed: {}", e);
            eprintln!("error: {}", e.user_message());
            if let Some(action) = e.suggested_action() {
                eprintln!("hint: {}", action);
            }
            ExitCode::FAILURE
        }
    };

    tracing::info!("jiradmin shutting down");
    code
}
