use schema_upgrade_core::{RuleKind, Upgrader};

use crate::cli::{GlobalOpts, RulesArgs};
use crate::config::{load_config, resolve_options};
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};

/// Run the `rules` command: list the pipeline in order, marking disabled rules.
pub fn run(args: RulesArgs, global: &GlobalOpts, output: &OutputContext) -> Result<(), CliError> {
    let config = load_config(global.config.as_deref())?;
    let options = resolve_options(&config, &args.pipeline)?;
    let enabled = Upgrader::with_options(options).rules();

    match output.mode {
        OutputMode::Human => {
            for (position, kind) in RuleKind::ALL.iter().enumerate() {
                let marker = if enabled.contains(kind) {
                    ""
                } else {
                    " (disabled)"
                };
                println!(
                    "{:>2}. {:<20} {}{marker}",
                    position + 1,
                    kind.as_str(),
                    kind.description()
                );
            }
        }
        OutputMode::Json => {
            let rules: Vec<serde_json::Value> = RuleKind::ALL
                .iter()
                .enumerate()
                .map(|(position, kind)| {
                    serde_json::json!({
                        "position": position + 1,
                        "name": kind.as_str(),
                        "description": kind.description(),
                        "enabled": enabled.contains(kind),
                    })
                })
                .collect();
            output.print_json(&serde_json::json!({ "rules": rules }));
        }
        OutputMode::Plain => {
            for kind in RuleKind::ALL {
                let state = if enabled.contains(&kind) {
                    "enabled"
                } else {
                    "disabled"
                };
                println!("{kind}\t{state}");
            }
        }
    }

    Ok(())
}
