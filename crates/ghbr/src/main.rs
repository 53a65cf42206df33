//! ghbr CLI Application
//!
//! Publishes a Homebrew formula for a GitHub project and keeps it pointed at
//! the latest release.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use ghbr::cli::{self, Cli, EXIT_ERROR, EXIT_OK, exit_code_for, render_error};
use ghbr::commands;
use ghbr::tracing::{TracingConfig, TracingFormat, command_span, init_tracing};
use std::io::Write;
use tracing::Instrument;

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = match cli::parse_from(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => std::process::exit(EXIT_OK),
        Err(code) => std::process::exit(code),
    };

    let exit_code = run_with_tokio(cli);
    std::process::exit(exit_code);
}

/// Create tokio runtime and run the command
fn run_with_tokio(cli: Cli) -> i32 {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            // Tracing is not initialized yet at this point in startup.
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            return EXIT_ERROR;
        }
    };

    rt.block_on(run(cli))
}

async fn run(cli: Cli) -> i32 {
    let tracing_config = TracingConfig {
        format: TracingFormat::for_json(cli.json),
        level: cli.level.into(),
    };
    // Ignore error if tracing already initialized (e.g., in tests)
    let _ = init_tracing(tracing_config);

    let span = command_span(cli.command.name());
    let result = commands::execute(cli.command)
        .instrument(span)
        .await
        .and_then(|output| output.render(cli.json));

    match result {
        Ok(text) => {
            print!("{text}");
            let _ = std::io::stdout().flush();
            EXIT_OK
        }
        Err(err) => {
            let code = exit_code_for(&err);
            render_error(err, cli.json);
            code
        }
    }
}
