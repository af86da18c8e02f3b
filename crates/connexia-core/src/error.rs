// ── Core error types ──
//
// The derivations themselves are total: lookups fall back, dangling
// references exclude records, empty milestone lists derive `planned`.
// What remains are data-quality failures at the edges (bad dates, bad
// enum values, malformed documents) and explicit detail lookups.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Data quality ─────────────────────────────────────────────────
    #[error("Invalid date in {field}: '{value}' ({reason})")]
    InvalidDate {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid value for {field}: '{value}' (expected one of: {expected})")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Duplicate {entity_type} id: {identifier}")]
    DuplicateId {
        entity_type: String,
        identifier: String,
    },

    // ── Lookups ──────────────────────────────────────────────────────
    #[error("Entity not found: {entity_type} with id {identifier}")]
    NotFound {
        entity_type: String,
        identifier: String,
    },

    // ── Dataset documents ────────────────────────────────────────────
    #[error("Dataset could not be read as {format}: {message}")]
    Dataset { format: String, message: String },

    // ── Repository ───────────────────────────────────────────────────
    #[error("Repository error: {message}")]
    Repository { message: String },
}

impl CoreError {
    /// Build an `InvalidValue` listing the accepted spellings.
    pub(crate) fn invalid_value(field: &str, value: &str, expected: &[&str]) -> Self {
        Self::InvalidValue {
            field: field.to_owned(),
            value: value.to_owned(),
            expected: expected.join(", "),
        }
    }

    pub(crate) fn not_found(entity_type: &str, identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_owned(),
            identifier: identifier.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Dataset {
            format: "JSON".into(),
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Dataset {
            format: "YAML".into(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        Self::Dataset {
            format: "TOML".into(),
            message: err.to_string(),
        }
    }
}
