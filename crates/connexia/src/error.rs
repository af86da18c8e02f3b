//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and stable exit codes.

use std::path::Path;

use miette::Diagnostic;
use thiserror::Error;

use connexia_config::ConfigError;
use connexia_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    /// Input data was malformed (sysexits `EX_DATAERR`).
    pub const DATA: i32 = 65;
    /// Configuration error (sysexits `EX_CONFIG`).
    pub const CONFIG: i32 = 78;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Resources ────────────────────────────────────────────────────

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(connexia::not_found),
        help("Run: connexia {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(connexia::validation))]
    Validation { field: String, reason: String },

    // ── Dataset ──────────────────────────────────────────────────────

    #[error("Dataset {path} is invalid: {reason}")]
    #[diagnostic(
        code(connexia::dataset),
        help(
            "Fix the record named above, or run without --data to use the built-in sample."
        )
    )]
    Dataset { path: String, reason: String },

    #[error("Could not read dataset {path}")]
    #[diagnostic(
        code(connexia::dataset_unreadable),
        help("Check the path given with --data or defaults.data in the config file.")
    )]
    DatasetUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Repository error: {message}")]
    #[diagnostic(code(connexia::repository))]
    Repository { message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("Invalid configuration for {field}: {reason}")]
    #[diagnostic(
        code(connexia::config_invalid),
        help("Edit the config file (connexia config path) or the CONNEXIA_* variable.")
    )]
    ConfigInvalid { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(connexia::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Operation '{action}' requires confirmation")]
    #[diagnostic(
        code(connexia::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(connexia::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(connexia::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(connexia::toml))]
    Toml(#[from] toml::ser::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::Dataset { .. } | Self::DatasetUnreadable { .. } => exit_code::DATA,
            Self::ConfigInvalid { .. } | Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }

    /// Attribute a core error raised while loading `path` to the dataset.
    pub fn dataset(path: &Path, err: CoreError) -> Self {
        Self::Dataset {
            path: path.display().to_string(),
            reason: err.to_string(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound {
                entity_type,
                identifier,
            } => CliError::NotFound {
                list_command: format!("{entity_type}s list"),
                resource_type: entity_type,
                identifier,
            },

            // Outside dataset loading these come from flags and queries.
            CoreError::InvalidValue {
                field,
                value,
                expected,
            } => CliError::Validation {
                field,
                reason: format!("'{value}' (expected one of: {expected})"),
            },

            CoreError::InvalidDate {
                field,
                value,
                reason,
            } => CliError::Validation {
                field,
                reason: format!("'{value}' ({reason})"),
            },

            err @ (CoreError::DuplicateId { .. } | CoreError::Dataset { .. }) => {
                CliError::Dataset {
                    path: "(dataset)".into(),
                    reason: err.to_string(),
                }
            }

            CoreError::Repository { message } => CliError::Repository { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::ConfigInvalid { field, reason },
            ConfigError::Figment(err) => CliError::Config(err),
            ConfigError::Serialization(err) => CliError::Toml(err),
            ConfigError::Io(err) => CliError::Io(err),
        }
    }
}
