//! Shared configuration for the Connexia tools.
//!
//! TOML config file, `CONNEXIA_*` environment overrides, and translation
//! into `connexia_core::RiskPolicy`. The CLI layers its own flags on top.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use connexia_core::RiskPolicy;

/// Prefix for environment overrides. Nested keys use `__`, e.g.
/// `CONNEXIA_RISK__ORDER_WINDOW_DAYS=4`.
pub const ENV_PREFIX: &str = "CONNEXIA_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// At-risk thresholds.
    #[serde(default)]
    pub risk: RiskSettings,

    #[serde(default)]
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Dataset file loaded when `--data` is not given. The built-in
    /// sample is used when neither is set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            data: None,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RiskSettings {
    #[serde(default = "default_order_window_days")]
    pub order_window_days: i64,

    #[serde(default = "default_sla_threshold_hours")]
    pub sla_threshold_hours: i64,
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self {
            order_window_days: default_order_window_days(),
            sla_threshold_hours: default_sla_threshold_hours(),
        }
    }
}

fn default_order_window_days() -> i64 {
    RiskPolicy::DEFAULT_ORDER_WINDOW_DAYS
}
fn default_sla_threshold_hours() -> i64 {
    RiskPolicy::DEFAULT_SLA_THRESHOLD_HOURS
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DashboardSettings {
    /// Recent events shown on the dashboard and site overview.
    #[serde(default = "default_activity_limit")]
    pub activity_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            activity_limit: default_activity_limit(),
        }
    }
}

fn default_activity_limit() -> usize {
    connexia_core::metrics::DEFAULT_ACTIVITY_LIMIT
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "connexia", "connexia").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("connexia");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from defaults, file, then environment.
///
/// `path` overrides the platform config path. A missing file is not an
/// error; the defaults and environment still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if anything goes wrong.
pub fn load_config_or_default(path: Option<&Path>) -> Config {
    load_config(path).unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path` (or the canonical
/// config path). Returns the path written.
pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(&path, toml_str)?;
    Ok(path)
}

// ── Translation ─────────────────────────────────────────────────────

/// Build the core risk policy, rejecting thresholds that would flag
/// nothing or everything.
pub fn risk_policy(cfg: &Config) -> Result<RiskPolicy, ConfigError> {
    let risk = &cfg.risk;
    if risk.order_window_days <= 0 {
        return Err(ConfigError::Validation {
            field: "risk.order_window_days".into(),
            reason: format!("must be at least 1 day, got {}", risk.order_window_days),
        });
    }
    if risk.order_window_days > RiskPolicy::MAX_ORDER_WINDOW_DAYS {
        return Err(ConfigError::Validation {
            field: "risk.order_window_days".into(),
            reason: format!(
                "must be at most {} days, got {}",
                RiskPolicy::MAX_ORDER_WINDOW_DAYS,
                risk.order_window_days
            ),
        });
    }
    if risk.sla_threshold_hours < 0 {
        return Err(ConfigError::Validation {
            field: "risk.sla_threshold_hours".into(),
            reason: format!("must not be negative, got {}", risk.sla_threshold_hours),
        });
    }
    Ok(RiskPolicy {
        order_window_days: risk.order_window_days,
        sla_threshold_hours: risk.sla_threshold_hours,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_core_policy() {
        let cfg = Config::default();
        assert_eq!(risk_policy(&cfg).unwrap(), RiskPolicy::default());
        assert_eq!(cfg.dashboard.activity_limit, 10);
        assert_eq!(cfg.defaults.output, "table");
    }

    #[test]
    fn missing_file_yields_defaults() {
        Jail::expect_with(|_jail| {
            let cfg =
                load_config(Some(Path::new("does-not-exist.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_then_environment_overrides() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "connexia.toml",
                r#"
                    [defaults]
                    output = "json"

                    [risk]
                    order_window_days = 4
                    sla_threshold_hours = 12
                "#,
            )?;
            jail.set_env("CONNEXIA_RISK__SLA_THRESHOLD_HOURS", "2");
            jail.set_env("CONNEXIA_DASHBOARD__ACTIVITY_LIMIT", "3");

            let cfg = load_config(Some(Path::new("connexia.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(cfg.defaults.output, "json");
            assert_eq!(cfg.defaults.color, "auto");
            assert_eq!(cfg.risk.order_window_days, 4);
            assert_eq!(cfg.risk.sla_threshold_hours, 2);
            assert_eq!(cfg.dashboard.activity_limit, 3);
            Ok(())
        });
    }

    #[test]
    fn non_positive_window_is_rejected() {
        let mut cfg = Config::default();
        cfg.risk.order_window_days = 0;
        let err = risk_policy(&cfg).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "risk.order_window_days"
        ));
    }

    #[test]
    fn oversized_window_is_rejected() {
        let mut cfg = Config::default();
        cfg.risk.order_window_days = i64::MAX;
        let err = risk_policy(&cfg).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation { ref field, .. } if field == "risk.order_window_days"
        ));

        cfg.risk.order_window_days = RiskPolicy::MAX_ORDER_WINDOW_DAYS;
        assert_eq!(
            risk_policy(&cfg).unwrap().order_window_days,
            RiskPolicy::MAX_ORDER_WINDOW_DAYS
        );
    }

    #[test]
    fn save_then_load_keeps_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.defaults.data = Some(PathBuf::from("/srv/connexia/dataset.json"));
        cfg.risk.order_window_days = 9;

        let written = save_config(&cfg, Some(&path)).unwrap();
        assert_eq!(written, path);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("order_window_days = 9"));
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, cfg);
    }
}
