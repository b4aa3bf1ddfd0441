use console::Term;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Output format mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

/// Output context derived from global flags.
///
/// Provides methods for printing success, warning, error, and JSON
/// messages respecting the chosen output mode and color settings.
pub struct OutputContext {
    pub mode: OutputMode,
    pub quiet: bool,
    pub use_color: bool,
}

impl OutputContext {
    /// Construct from global CLI options.
    pub fn from_global(global: &GlobalOpts) -> Self {
        let mode = match global.format.as_str() {
            "json" => OutputMode::Json,
            "plain" => OutputMode::Plain,
            _ => OutputMode::Human,
        };

        let use_color = !global.no_color
            && std::env::var("TERM").map_or(true, |t| t != "dumb")
            && Term::stderr().is_term();

        Self {
            mode,
            quiet: global.quiet,
            use_color,
        }
    }

    /// Print a success message to stderr (human mode only, not in quiet mode).
    pub fn success(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        if self.use_color {
            let style = console::Style::new().green().bold();
            eprintln!("{} {}", style.apply_to("ok"), msg);
        } else {
            eprintln!("ok {msg}");
        }
    }

    /// Print an error using the appropriate output mode.
    pub fn print_error(&self, err: &CliError) {
        match self.mode {
            OutputMode::Human => {
                if self.use_color {
                    let style = console::Style::new().red().bold();
                    eprintln!("{} {}", style.apply_to("error:"), err);
                } else {
                    eprintln!("error: {err}");
                }
            }
            OutputMode::Json => {
                let json = err.to_json();
                eprintln!("{json}");
            }
            OutputMode::Plain => {
                eprintln!("error\t{err}");
            }
        }
    }

    /// Print JSON data to stdout.
    pub fn print_json(&self, value: &serde_json::Value) {
        if let Ok(s) = serde_json::to_string_pretty(value) {
            println!("{s}");
        }
    }

    /// Print a unified diff to stdout, colouring hunks in human mode.
    pub fn print_diff(&self, diff: &str) {
        if self.mode == OutputMode::Json {
            return;
        }
        if !self.use_color || self.mode != OutputMode::Human {
            print!("{diff}");
            return;
        }
        for line in diff.lines() {
            let style = if line.starts_with("+++") || line.starts_with("---") {
                console::Style::new().bold()
            } else if line.starts_with('+') {
                console::Style::new().green()
            } else if line.starts_with('-') {
                console::Style::new().red()
            } else if line.starts_with("@@") {
                console::Style::new().cyan()
            } else {
                console::Style::new()
            };
            println!("{}", style.apply_to(line));
        }
    }

    /// Print a status message to stderr (human mode only, not in quiet mode).
    pub fn status(&self, msg: &str) {
        if self.quiet || self.mode != OutputMode::Human {
            return;
        }
        eprintln!("{msg}");
    }

    /// Whether to show progress spinners.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.mode == OutputMode::Human && Term::stderr().is_term()
    }
}
