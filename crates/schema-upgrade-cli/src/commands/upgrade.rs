use console::Term;

use super::{discover_ruby_files, report_skips, upgrade_files, FileUpgrade};
use crate::cli::{GlobalOpts, UpgradeArgs};
use crate::config::{load_config, resolve_options};
use crate::diff::{line_changes, unified_diff};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `upgrade` command: rewrite legacy definitions, or preview the
/// rewrite as a diff when `--write` is not given.
pub async fn run(
    args: UpgradeArgs,
    global: &GlobalOpts,
    output: &OutputContext,
) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let options = resolve_options(&config, &args.pipeline)?;
    let files = discover_ruby_files(&args.paths, &config.cli)?;

    let results = upgrade_files(files, options, output).await?;
    let changed: Vec<&FileUpgrade> = results.iter().filter(|f| f.changed()).collect();
    let show_diff = args.diff || !args.write;

    let mut json_results = Vec::new();
    for file in &results {
        report_skips(file, output);

        let mut entry = file.to_json();
        if file.changed() {
            let diff = unified_diff(&file.display_path(), &file.source, &file.report.output);
            if show_diff {
                output.print_diff(&diff);
            }
            if output.mode == OutputMode::Json && show_diff {
                entry["diff"] = serde_json::json!(diff);
            }
        }
        json_results.push(entry);
    }

    let written = if args.write && !changed.is_empty() {
        confirm_write(&changed, args.force, output)?;
        write_files(&changed)?;
        changed.len()
    } else {
        0
    };

    let rewrites: usize = results.iter().map(|f| f.report.total_rewrites()).sum();
    let skipped: usize = results.iter().map(|f| f.report.skipped.len()).sum();

    match output.mode {
        OutputMode::Human => {
            let (inserted, deleted) = changed.iter().fold((0, 0), |(ins, del), file| {
                let (i, d) = line_changes(&file.source, &file.report.output);
                (ins + i, del + d)
            });
            let verb = if args.write {
                "upgraded"
            } else {
                "would be upgraded"
            };
            output.success(&format!(
                "{} of {} files {verb} ({rewrites} rewrites, +{inserted} -{deleted} lines, {skipped} skipped)",
                changed.len(),
                results.len(),
            ));
            if !args.write && !changed.is_empty() {
                output.status("Run again with --write to apply.");
            }
        }
        OutputMode::Json => {
            output.print_json(&serde_json::json!({
                "files": results.len(),
                "changed": changed.len(),
                "written": written,
                "rewrites": rewrites,
                "skipped": skipped,
                "results": json_results,
            }));
        }
        OutputMode::Plain => {
            println!("{}\t{}\t{written}\t{skipped}", results.len(), changed.len());
        }
    }

    Ok(())
}

/// Ask before rewriting files in place. Non-interactive runs need `--force`.
fn confirm_write(
    changed: &[&FileUpgrade],
    force: bool,
    output: &OutputContext,
) -> Result<(), CliError> {
    if force {
        return Ok(());
    }
    if !Term::stderr().is_term() {
        return Err(CliError::RequiresForce);
    }

    output.status(&format!("{} files will be rewritten:", changed.len()));
    for file in changed {
        output.status(&format!("  {}", file.display_path()));
    }

    let confirm = dialoguer::Confirm::new()
        .with_prompt(format!("Rewrite {} files in place?", changed.len()))
        .default(false)
        .interact()
        .map_err(|_| CliError::Cancelled)?;

    if confirm {
        Ok(())
    } else {
        Err(CliError::Cancelled)
    }
}

fn write_files(changed: &[&FileUpgrade]) -> Result<(), CliError> {
    for file in changed {
        std::fs::write(&file.path, &file.report.output).map_err(|e| CliError::Io {
            path: file.path.clone(),
            source: e,
        })?;
        tracing::info!(file = %file.path.display(), "rewrote file");
    }
    Ok(())
}
