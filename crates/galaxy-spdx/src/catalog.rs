//! License identifier lookup backed by the bundled SPDX table.
//!
//! The table maps each SPDX identifier to a small record carrying its
//! deprecation status. [`catalog`] loads it lazily on first use; a failed
//! load is logged and leaves an empty catalog in place, so every license
//! check afterwards reports the identifier as invalid instead of aborting
//! the process.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable naming an alternate license table to load instead
/// of the bundled copy.
pub const LICENSES_PATH_ENV: &str = "GALAXY_SPDX_LICENSES";

const BUNDLED_LICENSES: &str = include_str!("../data/spdx_licenses.json");

static CATALOG: OnceLock<LicenseCatalog> = OnceLock::new();

/// Status record for a single SPDX identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LicenseEntry {
    /// The identifier is still listed by SPDX but should no longer be used.
    #[serde(default)]
    pub deprecated: bool,
}

/// Immutable table of known SPDX license identifiers.
#[derive(Debug, Clone, Default)]
pub struct LicenseCatalog {
    entries: HashMap<String, LicenseEntry>,
}

impl LicenseCatalog {
    /// Parse a catalog from its JSON representation.
    pub fn from_json(content: &str) -> Result<Self> {
        let entries: HashMap<String, LicenseEntry> = serde_json::from_str(content)?;
        Ok(Self { entries })
    }

    /// Read and parse a catalog from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// The table compiled into this crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_LICENSES)
    }

    /// Load the catalog the process should use.
    ///
    /// Honors [`LICENSES_PATH_ENV`] when set, otherwise uses the bundled
    /// table. Never fails: load errors degrade to an empty catalog.
    pub fn load() -> Self {
        match std::env::var_os(LICENSES_PATH_ENV) {
            Some(path) => Self::load_from(Some(Path::new(&path))),
            None => Self::load_from(None),
        }
    }

    /// Load from `path`, or from the bundled table when `path` is `None`,
    /// degrading to an empty catalog on failure.
    pub fn load_from(path: Option<&Path>) -> Self {
        let loaded = match path {
            Some(path) => Self::from_path(path),
            None => Self::bundled(),
        };

        match loaded {
            Ok(catalog) => {
                tracing::info!(count = catalog.len(), "Loaded SPDX license catalog");
                catalog
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to load the list of acceptable open source licenses: {}",
                    e
                );
                Self::default()
            }
        }
    }

    /// Look up the record for an identifier.
    pub fn get(&self, license_id: &str) -> Option<&LicenseEntry> {
        self.entries.get(license_id)
    }

    /// Check that `license_id` is a known, non-deprecated SPDX identifier.
    pub fn is_valid(&self, license_id: Option<&str>) -> bool {
        let Some(license_id) = license_id else {
            return false;
        };

        match self.get(license_id) {
            Some(entry) => !entry.deprecated,
            None => false,
        }
    }

    /// Whether the identifier is known but deprecated.
    pub fn is_deprecated(&self, license_id: &str) -> bool {
        self.get(license_id).is_some_and(|entry| entry.deprecated)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The process-wide catalog, loaded on first access.
pub fn catalog() -> &'static LicenseCatalog {
    CATALOG.get_or_init(LicenseCatalog::load)
}

/// Check if `license_id` is a valid and non-deprecated SPDX identifier.
pub fn is_valid_license_id(license_id: Option<&str>) -> bool {
    catalog().is_valid(license_id)
}
