mod cli;
mod commands;
mod config;
#[allow(unused_assignments)]
mod diagnostic;
mod diff;
mod error;
mod output;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Log to stderr at a level picked by `-v`/`-q`; `RUST_LOG` overrides.
fn init_tracing(global: &cli::GlobalOpts) {
    let level = match (global.quiet, global.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_tracing(&cli.global);
    let output = output::OutputContext::from_global(&cli.global);

    let result = match cli.command {
        cli::Commands::Upgrade(args) => commands::upgrade::run(args, &cli.global, &output).await,
        cli::Commands::Check(args) => commands::check::run(args, &cli.global, &output).await,
        cli::Commands::Rules(args) => commands::rules::run(args, &cli.global, &output),
        cli::Commands::Completions(args) => commands::completions::run(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            output.print_error(&e);
            std::process::exit(e.exit_code() as i32);
        }
    }
}
