use std::path::{Path, PathBuf};

use schema_upgrade_core::{RuleKind, UpgradeOptions};
use serde::{Deserialize, Serialize};

use crate::cli::PipelineOpts;
use crate::error::CliError;

/// CLI configuration loaded from config.toml.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    #[serde(default)]
    pub upgrade: UpgradeSettings,
    #[serde(default)]
    pub cli: CliSettings,
}

/// Pipeline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeSettings {
    #[serde(default = "default_base_namespace")]
    pub base_namespace: String,
    /// Rule names, snake_case or kebab-case.
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl Default for UpgradeSettings {
    fn default() -> Self {
        Self {
            base_namespace: default_base_namespace(),
            disabled_rules: Vec::new(),
        }
    }
}

/// CLI-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliSettings {
    #[serde(default = "default_dir")]
    pub default_dir: String,
    #[serde(default = "default_file_pattern")]
    pub file_pattern: String,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            default_dir: default_dir(),
            file_pattern: default_file_pattern(),
        }
    }
}

fn default_base_namespace() -> String {
    "Types".to_string()
}

fn default_dir() -> String {
    "app/graphql/".to_string()
}

fn default_file_pattern() -> String {
    "**/*.rb".to_string()
}

/// Discovery order for config file:
/// 1. `--config <path>` (explicit)
/// 2. `SCHEMA_UPGRADE_CONFIG` env var
/// 3. `./config.toml` (project-local)
/// 4. `$XDG_CONFIG_HOME/schema-upgrade/config.toml`
/// 5. `~/.config/schema-upgrade/config.toml`
pub fn load_config(explicit_path: Option<&Path>) -> Result<CliConfig, CliError> {
    if let Some(path) = explicit_path {
        return load_config_from_path(path);
    }

    if let Ok(env_path) = std::env::var("SCHEMA_UPGRADE_CONFIG") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    let local = PathBuf::from("config.toml");
    if local.exists() {
        return load_config_from_path(&local);
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg).join("schema-upgrade/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    if let Some(home) = std::env::var_os("HOME") {
        let path = PathBuf::from(home).join(".config/schema-upgrade/config.toml");
        if path.exists() {
            return load_config_from_path(&path);
        }
    }

    Ok(CliConfig::default())
}

fn load_config_from_path(path: &Path) -> Result<CliConfig, CliError> {
    tracing::debug!(path = %path.display(), "loading config");
    let contents = std::fs::read_to_string(path).map_err(|e| CliError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    toml::from_str(&contents).map_err(|e| CliError::Config {
        message: format!("failed to parse {}: {}", path.display(), e),
    })
}

/// Resolve pipeline options from config + CLI overrides.
///
/// `--base-namespace` replaces the configured namespace; `--disable` adds to
/// the configured disabled rules.
pub fn resolve_options(
    config: &CliConfig,
    overrides: &PipelineOpts,
) -> Result<UpgradeOptions, CliError> {
    let base_namespace = overrides
        .base_namespace
        .clone()
        .unwrap_or_else(|| config.upgrade.base_namespace.clone());

    let mut disabled_rules = Vec::new();
    for name in config.upgrade.disabled_rules.iter().chain(&overrides.disable) {
        let kind: RuleKind = name.parse().map_err(|e| CliError::Config {
            message: format!("{e}"),
        })?;
        if !disabled_rules.contains(&kind) {
            disabled_rules.push(kind);
        }
    }

    Ok(UpgradeOptions {
        base_namespace,
        disabled_rules,
    })
}
