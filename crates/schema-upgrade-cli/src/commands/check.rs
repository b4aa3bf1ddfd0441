use super::{discover_ruby_files, report_skips, upgrade_files};
use crate::cli::{CheckArgs, GlobalOpts};
use crate::config::{load_config, resolve_options};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `check` command: fail with exit code 4 when any file would change.
pub async fn run(
    args: CheckArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let options = resolve_options(&config, &args.pipeline)?;
    let files = discover_ruby_files(&args.paths, &config.cli)?;
    let results = upgrade_files(files, options, output).await?;

    let mut pending = 0usize;
    for file in &results {
        report_skips(file, output);
        if !file.changed() {
            continue;
        }
        pending += 1;
        match output.mode {
            OutputMode::Human => output.status(&format!(
                "  {} .... needs upgrade ({} rewrites)",
                file.display_path(),
                file.report.total_rewrites()
            )),
            OutputMode::Plain => println!("{}", file.display_path()),
            OutputMode::Json => {}
        }
    }

    match output.mode {
        OutputMode::Human if pending == 0 => {
            output.success(&format!("{} files are up to date", results.len()));
        }
        OutputMode::Json => {
            let json_results: Vec<serde_json::Value> =
                results.iter().map(|file| file.to_json()).collect();
            output.print_json(&serde_json::json!({
                "files": results.len(),
                "needs_upgrade": pending,
                "results": json_results,
            }));
        }
        _ => {}
    }

    if pending > 0 {
        Err(CliError::NeedsUpgrade { count: pending })
    } else {
        Ok(())
    }
}
