use std::path::PathBuf;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments, configuration or paths
/// - 4: `check` found files that still need upgrading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    NeedsUpgrade = 4,
}

/// Errors returned by CLI command handlers.
///
/// Each variant maps to an `ExitCode` and can produce structured
/// output in JSON mode.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// IO errors (file not found, permission denied).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Configuration errors, including unknown rule names.
    #[error("configuration error: {message}")]
    Config { message: String },

    /// User cancelled operation.
    #[error("operation cancelled")]
    Cancelled,

    /// A path matched no Ruby files.
    #[error("no Ruby files found in {path}")]
    NoRubyFiles { path: PathBuf },

    /// Non-TTY requires --force for in-place rewrites.
    #[error("rewriting files requires --force in non-interactive mode")]
    RequiresForce,

    /// `check` found files that the pipeline would change.
    #[error("{count} file(s) need upgrading")]
    NeedsUpgrade { count: usize },

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    /// Maps this error to the appropriate exit code.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::Config { .. } | Self::NoRubyFiles { .. } => ExitCode::InvalidArguments,
            Self::NeedsUpgrade { .. } => ExitCode::NeedsUpgrade,
            Self::Io { .. } | Self::Cancelled | Self::RequiresForce | Self::Other(_) => {
                ExitCode::GeneralError
            }
        }
    }

    /// Serializes this error as a JSON value for `--format json` output.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Io { path, source } => serde_json::json!({
                "error": "io_error",
                "path": path.display().to_string(),
                "message": source.to_string(),
            }),
            Self::Config { message } => serde_json::json!({
                "error": "config_error",
                "message": message,
            }),
            Self::NeedsUpgrade { count } => serde_json::json!({
                "error": "needs_upgrade",
                "files": count,
                "message": self.to_string(),
            }),
            other => serde_json::json!({
                "error": "error",
                "message": other.to_string(),
            }),
        }
    }
}
