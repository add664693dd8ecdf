//! Error types for galaxy-schema

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while parsing or constructing metadata value objects.
///
/// Collection metadata failures and legacy role failures are kept apart so
/// callers can report them against the right manifest family.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A collection metadata field or cross-field rule was violated.
    #[error("Invalid collection metadata. {0}")]
    InvalidMetadata(String),

    /// Legacy role metadata (`meta/main.yml`) violated its schema.
    #[error("{0}")]
    LegacyRoleSchema(String),

    /// An artifact filename did not follow `{namespace}-{name}-{version}.tar.gz`.
    #[error("{0}")]
    InvalidFilename(String),

    #[error("invalid version range '{expression}': {reason}")]
    InvalidVersionRange { expression: String, reason: String },

    #[error("MANIFEST.json did not contain a 'file_manifest_file' item pointing to FILES.json")]
    MissingFileManifest,

    #[error("Invalid file manifest. {0}")]
    InvalidFileManifest(String),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid validation policy: {0}")]
    InvalidPolicy(String),
}

impl Error {
    pub(crate) fn metadata(message: impl Into<String>) -> Self {
        Self::InvalidMetadata(message.into())
    }

    pub(crate) fn legacy(message: impl Into<String>) -> Self {
        Self::LegacyRoleSchema(message.into())
    }

    pub fn is_invalid_metadata(&self) -> bool {
        matches!(self, Self::InvalidMetadata(_))
    }

    pub fn is_legacy_schema(&self) -> bool {
        matches!(self, Self::LegacyRoleSchema(_))
    }
}
