//! Collection artifact filename parsing.
//!
//! Built collection archives are named `{namespace}-{name}-{version}.tar.gz`.
//! [`CollectionFilename::parse`] splits such a name with a permissive
//! pattern, then [`CollectionFilename::new`] applies the stricter identifier
//! grammar and semantic version parsing, so a name can match the pattern
//! and still be rejected.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use semver::Version;
use serde::Serialize;

use crate::constants::is_valid_name;
use crate::error::{Error, Result};

static FILENAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<namespace>\w+)-(?P<name>\w+)-(?P<version>[0-9a-zA-Z.+-]+)\.tar\.gz$")
        .unwrap()
});

/// Identity of a collection as encoded in its archive filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionFilename {
    namespace: String,
    name: String,
    version: Version,
}

impl CollectionFilename {
    /// The version is parsed before the namespace and name are checked.
    pub fn new(namespace: &str, name: &str, version: &str) -> Result<Self> {
        let version = Version::parse(version).map_err(|e| {
            Error::InvalidFilename(format!("Invalid version: '{version}': {e}"))
        })?;

        for (field, value) in [("namespace", namespace), ("name", name)] {
            if !is_valid_name(value) {
                return Err(Error::InvalidFilename(format!(
                    "Invalid {field}: '{value}'"
                )));
            }
        }

        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version,
        })
    }

    /// Parse a `{namespace}-{name}-{version}.tar.gz` filename.
    pub fn parse(filename: &str) -> Result<Self> {
        let captures = FILENAME_PATTERN.captures(filename).ok_or_else(|| {
            Error::InvalidFilename(
                "Invalid filename. Expected: {namespace}-{name}-{version}.tar.gz".to_string(),
            )
        })?;

        Self::new(&captures["namespace"], &captures["name"], &captures["version"])
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &Version {
        &self.version
    }
}

impl fmt::Display for CollectionFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}.tar.gz", self.namespace, self.name, self.version)
    }
}

impl FromStr for CollectionFilename {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
