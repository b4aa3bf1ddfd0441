pub mod check;
pub mod completions;
pub mod rules;
pub mod upgrade;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use schema_upgrade_core::{UpgradeOptions, UpgradeReport, Upgrader};
use tokio::task::JoinSet;

use crate::config::CliSettings;
use crate::diagnostic::render_skips;
use crate::error::CliError;
use crate::output::{OutputContext, OutputMode};
use crate::progress;

/// One file run through the pipeline.
pub struct FileUpgrade {
    pub path: PathBuf,
    pub source: String,
    pub report: UpgradeReport,
}

impl FileUpgrade {
    pub fn changed(&self) -> bool {
        self.report.output != self.source
    }

    pub fn display_path(&self) -> String {
        relative_display(&self.path)
    }

    /// Per-file JSON summary shared by `upgrade` and `check`.
    pub fn to_json(&self) -> serde_json::Value {
        let rewrites: serde_json::Map<String, serde_json::Value> = self
            .report
            .applied
            .iter()
            .map(|(rule, count)| (rule.to_string(), serde_json::json!(count)))
            .collect();
        let skipped: Vec<serde_json::Value> = self
            .report
            .skipped
            .iter()
            .map(|skip| {
                serde_json::json!({
                    "rule": skip.rule.to_string(),
                    "line": skip.line,
                    "reason": skip.reason.to_string(),
                })
            })
            .collect();
        serde_json::json!({
            "file": self.display_path(),
            "changed": self.changed(),
            "rewrites": rewrites,
            "skipped": skipped,
        })
    }
}

/// Discover Ruby files from a list of paths.
///
/// Paths can be files (used directly) or directories (searched with the
/// configured `file_pattern`). No paths means the configured `default_dir`.
pub fn discover_ruby_files(
    paths: &[PathBuf],
    settings: &CliSettings,
) -> Result<Vec<PathBuf>, CliError> {
    let defaults = [PathBuf::from(&settings.default_dir)];
    let paths = if paths.is_empty() { &defaults[..] } else { paths };
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let pattern = path.join(&settings.file_pattern);
            let entries = glob::glob(&pattern.to_string_lossy())
                .map_err(|e| CliError::Config {
                    message: format!("invalid file_pattern '{}': {e}", settings.file_pattern),
                })?;
            let before = files.len();
            for entry in entries {
                let entry = entry.map_err(|e| CliError::Other(e.to_string()))?;
                if entry.is_file() {
                    files.push(entry);
                }
            }
            if files.len() == before {
                return Err(CliError::NoRubyFiles { path: path.clone() });
            }
        } else {
            return Err(CliError::NoRubyFiles { path: path.clone() });
        }
    }

    files.sort();
    files.dedup();
    tracing::info!(count = files.len(), "discovered Ruby files");
    Ok(files)
}

fn upgrade_file(upgrader: &Upgrader, path: PathBuf) -> Result<FileUpgrade, CliError> {
    let source = std::fs::read_to_string(&path).map_err(|e| CliError::Io {
        path: path.clone(),
        source: e,
    })?;
    let report = upgrader.upgrade_with_report(&source);
    tracing::debug!(
        file = %path.display(),
        rewrites = report.total_rewrites(),
        skipped = report.skipped.len(),
        "file upgraded"
    );
    Ok(FileUpgrade {
        path,
        source,
        report,
    })
}

/// Run every file through one shared pipeline, one blocking task per file.
///
/// Results come back sorted by path.
pub async fn upgrade_files(
    files: Vec<PathBuf>,
    options: UpgradeOptions,
    output: &OutputContext,
) -> Result<Vec<FileUpgrade>, CliError> {
    let upgrader = Arc::new(Upgrader::with_options(options));
    let bar = output
        .show_progress()
        .then(|| progress::create_file_bar(files.len(), "Upgrading"));

    let mut tasks = JoinSet::new();
    for path in files {
        let upgrader = Arc::clone(&upgrader);
        tasks.spawn_blocking(move || upgrade_file(&upgrader, path));
    }

    let mut results = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        let result =
            joined.map_err(|e| CliError::Other(format!("upgrade task failed: {e}")))??;
        if let Some(bar) = &bar {
            bar.inc(1);
        }
        results.push(result);
    }

    if let Some(bar) = &bar {
        progress::finish_bar(bar, &format!("Processed {} files", results.len()));
    }
    results.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(results)
}

/// Report the constructs a file left untouched.
pub fn report_skips(file: &FileUpgrade, output: &OutputContext) {
    if file.report.skipped.is_empty() || output.quiet {
        return;
    }
    let filename = file.display_path();
    match output.mode {
        OutputMode::Human => {
            for report in render_skips(&file.report.skipped, &file.source, &filename) {
                eprintln!("{report:?}");
            }
        }
        OutputMode::Plain => {
            for skip in &file.report.skipped {
                eprintln!("{filename}\t{}\t{}\t{}", skip.line, skip.rule, skip.reason);
            }
        }
        OutputMode::Json => {}
    }
}

fn relative_display(path: &Path) -> String {
    path.strip_prefix(".").unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> CliSettings {
        CliSettings::default()
    }

    #[test]
    fn discover_nonexistent_path() {
        let result = discover_ruby_files(&[PathBuf::from("/nonexistent/path")], &settings());
        assert!(matches!(result, Err(CliError::NoRubyFiles { .. })));
    }

    #[test]
    fn discover_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = discover_ruby_files(&[dir.path().to_path_buf()], &settings());
        assert!(matches!(result, Err(CliError::NoRubyFiles { .. })));
    }

    #[test]
    fn discover_finds_nested_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("types")).unwrap();
        let nested = dir.path().join("types/user_type.rb");
        std::fs::write(&nested, "UserType = 1").unwrap();
        std::fs::write(dir.path().join("README.md"), "docs").unwrap();
        let files = discover_ruby_files(&[dir.path().to_path_buf()], &settings()).unwrap();
        assert_eq!(files, vec![nested]);
    }

    #[test]
    fn discover_accepts_direct_file_and_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.rb");
        std::fs::write(&path, "").unwrap();
        let files = discover_ruby_files(&[path.clone(), path.clone()], &settings()).unwrap();
        assert_eq!(files, vec![path]);
    }

    #[test]
    fn discover_uses_configured_pattern() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("user_type.rb"), "").unwrap();
        std::fs::write(dir.path().join("helper.rb"), "").unwrap();
        let settings = CliSettings {
            file_pattern: "*_type.rb".into(),
            ..CliSettings::default()
        };
        let files = discover_ruby_files(&[dir.path().to_path_buf()], &settings).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("user_type.rb"));
    }

    #[test]
    fn relative_display_strips_current_dir() {
        assert_eq!(relative_display(Path::new("./a/b.rb")), "a/b.rb");
        assert_eq!(relative_display(Path::new("/a/b.rb")), "/a/b.rb");
    }

    #[tokio::test]
    async fn upgrade_files_reports_changes() {
        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("a.rb");
        let plain = dir.path().join("b.rb");
        std::fs::write(&legacy, "A = GraphQL::ObjectType.define do\nend\n").unwrap();
        std::fs::write(&plain, "puts 1\n").unwrap();

        let output = OutputContext {
            mode: OutputMode::Plain,
            quiet: true,
            use_color: false,
        };
        let results = upgrade_files(
            vec![plain.clone(), legacy.clone()],
            UpgradeOptions::default(),
            &output,
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path, legacy);
        assert!(results[0].changed());
        assert_eq!(results[0].report.output, "class A < Types::BaseObject\nend\n");
        assert!(!results[1].changed());
        assert_eq!(results[0].to_json()["rewrites"]["type_definition"], 1);
    }
}
