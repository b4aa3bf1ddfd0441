use clap::CommandFactory;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::CliError;

/// Generate shell completion scripts and write to stdout.
pub fn run(args: CompletionsArgs) -> Result<(), CliError> {
    let shell: clap_complete::Shell = args
        .shell
        .parse()
        .map_err(|e| CliError::Other(format!("unsupported shell: {e}")))?;

    clap_complete::generate(
        shell,
        &mut Cli::command(),
        "schema-upgrade",
        &mut std::io::stdout(),
    );

    Ok(())
}
