//! Validation policy flags.
//!
//! Two checks depend on deployment configuration rather than on the
//! manifest alone: whether collection versions must be at least `1.0.0`,
//! and whether at least one tag from [`REQUIRED_TAG_LIST`] is mandatory.
//! Both are carried by [`ValidationPolicy`], which callers resolve once and
//! pass into every constructor that needs it.
//!
//! # Example TOML
//!
//! ```toml
//! require_v1_or_greater = true
//! check_required_tags = false
//! ```
//!
//! [`REQUIRED_TAG_LIST`]: crate::constants::REQUIRED_TAG_LIST

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Environment variable overriding [`ValidationPolicy::require_v1_or_greater`].
pub const REQUIRE_V1_OR_GREATER_ENV: &str = "GALAXY_IMPORTER_REQUIRE_V1_OR_GREATER";

/// Environment variable overriding [`ValidationPolicy::check_required_tags`].
pub const CHECK_REQUIRED_TAGS_ENV: &str = "GALAXY_IMPORTER_CHECK_REQUIRED_TAGS";

/// Policy flags consulted during collection metadata validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidationPolicy {
    /// Reject collection versions lower than `1.0.0`.
    pub require_v1_or_greater: bool,
    /// Require at least one tag from the fixed category list.
    pub check_required_tags: bool,
}

impl ValidationPolicy {
    /// A policy with every optional check disabled.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require_v1_or_greater(mut self, enabled: bool) -> Self {
        self.require_v1_or_greater = enabled;
        self
    }

    pub fn check_required_tags(mut self, enabled: bool) -> Self {
        self.check_required_tags = enabled;
        self
    }

    /// Parse a policy from a TOML string. Missing keys keep their defaults.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::InvalidPolicy(e.to_string()))
    }

    /// Read and parse a policy from a TOML file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Default policy with process environment overrides applied.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides looked up by environment variable name.
    ///
    /// Variables that are unset leave the current value untouched.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(REQUIRE_V1_OR_GREATER_ENV) {
            self.require_v1_or_greater = parse_flag(REQUIRE_V1_OR_GREATER_ENV, &value)?;
        }
        if let Some(value) = lookup(CHECK_REQUIRED_TAGS_ENV) {
            self.check_required_tags = parse_flag(CHECK_REQUIRED_TAGS_ENV, &value)?;
        }
        Ok(self)
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(Error::InvalidPolicy(format!(
            "{key} must be a boolean, got '{other}'"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_disables_everything() {
        let policy = ValidationPolicy::default();
        assert!(!policy.require_v1_or_greater);
        assert!(!policy.check_required_tags);
    }

    #[test]
    fn test_builder_methods() {
        let policy = ValidationPolicy::new()
            .require_v1_or_greater(true)
            .check_required_tags(true);
        assert!(policy.require_v1_or_greater);
        assert!(policy.check_required_tags);
    }

    #[test]
    fn test_from_toml_partial() {
        let policy = ValidationPolicy::from_toml("require_v1_or_greater = true\n").unwrap();
        assert!(policy.require_v1_or_greater);
        assert!(!policy.check_required_tags);
    }

    #[test]
    fn test_from_toml_empty() {
        assert_eq!(
            ValidationPolicy::from_toml("").unwrap(),
            ValidationPolicy::default()
        );
    }

    #[test]
    fn test_from_toml_unknown_key_rejected() {
        let err = ValidationPolicy::from_toml("require_tags = true\n").unwrap_err();
        assert!(matches!(err, Error::InvalidPolicy(_)));
    }

    #[test]
    fn test_from_toml_wrong_type_rejected() {
        assert!(ValidationPolicy::from_toml("check_required_tags = \"maybe\"\n").is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("policy.toml");
        std::fs::write(&path, "check_required_tags = true\n").unwrap();

        let policy = ValidationPolicy::from_path(&path).unwrap();
        assert!(policy.check_required_tags);
    }

    #[test]
    fn test_from_path_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = ValidationPolicy::from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_overrides_apply_over_file_values() {
        let policy = ValidationPolicy::from_toml("require_v1_or_greater = true\n")
            .unwrap()
            .with_overrides(lookup_from(&[
                (REQUIRE_V1_OR_GREATER_ENV, "false"),
                (CHECK_REQUIRED_TAGS_ENV, "YES"),
            ]))
            .unwrap();
        assert!(!policy.require_v1_or_greater);
        assert!(policy.check_required_tags);
    }

    #[test]
    fn test_unset_overrides_keep_values() {
        let policy = ValidationPolicy::new()
            .check_required_tags(true)
            .with_overrides(lookup_from(&[]))
            .unwrap();
        assert!(policy.check_required_tags);
    }

    #[test]
    fn test_override_rejects_non_boolean() {
        let err = ValidationPolicy::new()
            .with_overrides(lookup_from(&[(CHECK_REQUIRED_TAGS_ENV, "sometimes")]))
            .unwrap_err();
        assert!(err.to_string().contains(CHECK_REQUIRED_TAGS_ENV));
    }
}
