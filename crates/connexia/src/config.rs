//! CLI configuration: a thin wrapper around `connexia_config` shared types.
//!
//! Re-exports the shared types and resolves the effective settings for
//! one invocation: global flags first, then the config file and
//! environment, then built-in defaults.

use std::path::PathBuf;

use clap::ValueEnum;

use connexia_core::RiskPolicy;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use connexia_config::{
    Config, DashboardSettings, Defaults, RiskSettings, config_path, load_config,
    load_config_or_default, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Everything a data command needs besides the snapshot.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output: OutputFormat,
    pub color: ColorMode,
    pub policy: RiskPolicy,
    pub activity_limit: usize,
    /// Dataset file, or `None` for the built-in sample.
    pub data: Option<PathBuf>,
}

/// The config file this invocation reads and writes.
pub fn active_config_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config file for this invocation.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config(global.config.as_deref())?)
}

/// Merge global flags over the loaded config.
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Settings, CliError> {
    let output = match global.output {
        Some(output) => output,
        None => parse_choice("defaults.output", &cfg.defaults.output)?,
    };
    let color = match global.color {
        Some(color) => color,
        None => parse_choice("defaults.color", &cfg.defaults.color)?,
    };

    Ok(Settings {
        output,
        color,
        policy: connexia_config::risk_policy(cfg)?,
        activity_limit: cfg.dashboard.activity_limit,
        data: global.data.clone().or_else(|| cfg.defaults.data.clone()),
    })
}

pub(crate) fn parse_choice<T: ValueEnum>(field: &str, value: &str) -> Result<T, CliError> {
    T::from_str(value, true).map_err(|_| {
        let expected: Vec<String> = T::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|p| p.get_name().to_owned())
            .collect();
        CliError::ConfigInvalid {
            field: field.into(),
            reason: format!("'{value}' (expected one of: {})", expected.join(", ")),
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["connexia"];
        argv.extend_from_slice(args);
        argv.push("dashboard");
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn flags_win_over_config() {
        let mut cfg = Config::default();
        cfg.defaults.output = "yaml".into();
        let settings = resolve(&global(&["--output", "json"]), &cfg).unwrap();
        assert_eq!(settings.output, OutputFormat::Json);
    }

    #[test]
    fn config_output_applies_without_flag() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json-compact".into();
        cfg.defaults.color = "never".into();
        let settings = resolve(&global(&[]), &cfg).unwrap();
        assert_eq!(settings.output, OutputFormat::JsonCompact);
        assert_eq!(settings.color, ColorMode::Never);
        assert_eq!(settings.policy, RiskPolicy::default());
    }

    #[test]
    fn unknown_config_output_is_a_config_error() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();
        let err = resolve(&global(&[]), &cfg).unwrap_err();
        assert!(matches!(err, CliError::ConfigInvalid { ref field, .. } if field == "defaults.output"));
    }
}
