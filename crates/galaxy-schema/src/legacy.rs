//! Legacy role metadata (`meta/main.yml`).
//!
//! Roles predate collections and describe themselves with a `galaxy_info`
//! mapping plus a list of role dependencies. Every failure here is reported
//! as [`Error::LegacyRoleSchema`].
//!
//! # Example YAML
//!
//! ```yaml
//! galaxy_info:
//!   role_name: nginx
//!   namespace: acme
//!   author: Jane Doe
//!   license: MIT
//!   min_ansible_version: 2.9
//!   platforms:
//!     - name: Ubuntu
//!       versions: [focal]
//!   galaxy_tags: [web]
//! dependencies:
//!   - acme.common
//!   - role: acme.firewall
//!     vars: {open_ports: [80, 443]}
//! ```

use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_yaml::{Mapping, Value};

use crate::constants::{
    MAX_LEGACY_ROLE_LENGTH_COMPANY, MAX_LEGACY_ROLE_LENGTH_DESCRIPTION,
    MAX_LEGACY_ROLE_LENGTH_LICENSE, MAX_LEGACY_ROLE_LENGTH_VERSION, MAX_LENGTH_AUTHOR,
    MAX_LENGTH_NAMESPACE, MAX_LENGTH_TAG, MAX_LENGTH_URL, char_len, is_valid_legacy_namespace,
    is_valid_legacy_role_name,
};
use crate::error::{Error, Result};

/// Keys accepted inside `galaxy_info`, in validation order.
pub const LEGACY_GALAXY_INFO_FIELDS: &[&str] = &[
    "role_name",
    "namespace",
    "author",
    "description",
    "company",
    "issue_tracker_url",
    "license",
    "min_ansible_version",
    "min_ansible_container_version",
    "github_branch",
    "platforms",
    "galaxy_tags",
];

const DEPENDENCIES_SHAPE: &str =
    "dependencies must be either a list of strings or a list of dictionaries.";

/// Validated `galaxy_info` section of a legacy role.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyGalaxyInfo {
    role_name: Option<String>,
    namespace: Option<String>,
    author: Option<String>,
    description: Option<String>,
    company: Option<String>,
    issue_tracker_url: Option<String>,
    license: Option<String>,
    min_ansible_version: Option<String>,
    min_ansible_container_version: Option<String>,
    github_branch: Option<String>,
    platforms: Vec<Mapping>,
    galaxy_tags: Vec<String>,
}

impl LegacyGalaxyInfo {
    /// Validate a `galaxy_info` mapping.
    ///
    /// Unknown keys are rejected before any field is checked.
    pub fn from_mapping(mut mapping: Mapping) -> Result<Self> {
        for key in mapping.keys() {
            let known = key
                .as_str()
                .is_some_and(|k| LEGACY_GALAXY_INFO_FIELDS.contains(&k));
            if !known {
                return Err(Error::legacy(format!(
                    "unknown field in galaxy_info: {}",
                    display_key(key)
                )));
            }
        }

        let role_name = legacy_str("role_name", mapping.remove("role_name"))?;
        if let Some(role_name) = &role_name {
            if !is_valid_legacy_role_name(role_name) {
                return Err(Error::legacy(format!("role name {role_name} is invalid")));
            }
        }

        let namespace = legacy_str("namespace", mapping.remove("namespace"))?;
        if let Some(namespace) = &namespace {
            if !is_valid_legacy_namespace(namespace) || char_len(namespace) > MAX_LENGTH_NAMESPACE
            {
                return Err(Error::legacy(format!("namespace {namespace} is invalid")));
            }
        }

        let author = limited_str("author", mapping.remove("author"), MAX_LENGTH_AUTHOR)?;
        let description = limited_str(
            "description",
            mapping.remove("description"),
            MAX_LEGACY_ROLE_LENGTH_DESCRIPTION,
        )?;
        let company = limited_str(
            "company",
            mapping.remove("company"),
            MAX_LEGACY_ROLE_LENGTH_COMPANY,
        )?;

        let issue_tracker_url = legacy_str("issue_tracker_url", mapping.remove("issue_tracker_url"))?;
        if issue_tracker_url
            .as_deref()
            .is_some_and(|url| char_len(url) > MAX_LENGTH_URL)
        {
            return Err(Error::legacy(format!(
                "url must not exceed {MAX_LENGTH_URL} characters"
            )));
        }

        let license = legacy_str("license", mapping.remove("license"))?;
        if license
            .as_deref()
            .is_some_and(|l| char_len(l) > MAX_LEGACY_ROLE_LENGTH_LICENSE)
        {
            return Err(Error::legacy(format!(
                "role license must not exceed {MAX_LEGACY_ROLE_LENGTH_LICENSE} characters"
            )));
        }

        let min_ansible_version =
            version_text("min_ansible_version", mapping.remove("min_ansible_version"))?;
        let min_ansible_container_version = version_text(
            "min_ansible_container_version",
            mapping.remove("min_ansible_container_version"),
        )?;
        let github_branch = legacy_str("github_branch", mapping.remove("github_branch"))?;
        let platforms = check_platforms(mapping.remove("platforms"))?;
        let galaxy_tags = check_galaxy_tags(mapping.remove("galaxy_tags"))?;

        Ok(Self {
            role_name,
            namespace,
            author,
            description,
            company,
            issue_tracker_url,
            license,
            min_ansible_version,
            min_ansible_container_version,
            github_branch,
            platforms,
            galaxy_tags,
        })
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role_name.as_deref()
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }

    pub fn issue_tracker_url(&self) -> Option<&str> {
        self.issue_tracker_url.as_deref()
    }

    pub fn license(&self) -> Option<&str> {
        self.license.as_deref()
    }

    pub fn min_ansible_version(&self) -> Option<&str> {
        self.min_ansible_version.as_deref()
    }

    pub fn min_ansible_container_version(&self) -> Option<&str> {
        self.min_ansible_container_version.as_deref()
    }

    pub fn github_branch(&self) -> Option<&str> {
        self.github_branch.as_deref()
    }

    pub fn platforms(&self) -> &[Mapping] {
        &self.platforms
    }

    pub fn galaxy_tags(&self) -> &[String] {
        &self.galaxy_tags
    }
}

fn display_key(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn legacy_str(field: &str, value: Option<Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(Error::legacy(format!("{field} must be a string"))),
    }
}

fn limited_str(field: &str, value: Option<Value>, max: usize) -> Result<Option<String>> {
    let value = legacy_str(field, value)?;
    if value.as_deref().is_some_and(|v| char_len(v) > max) {
        return Err(Error::legacy(format!(
            "{field} must not exceed {max} characters"
        )));
    }
    Ok(value)
}

/// Versions are often written unquoted (`2.9`), so numbers and booleans are
/// accepted and checked by their string form. Booleans render as `True` or
/// `False`.
fn version_text(field: &str, value: Option<Value>) -> Result<Option<String>> {
    let text = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "True".to_string(),
        Some(Value::Bool(false)) => "False".to_string(),
        Some(_) => {
            return Err(Error::legacy(format!(
                "version for {field} must be a string"
            )));
        }
    };

    if char_len(&text) > MAX_LEGACY_ROLE_LENGTH_VERSION {
        return Err(Error::legacy(format!(
            "version for {field} must not exceed {MAX_LEGACY_ROLE_LENGTH_VERSION} characters"
        )));
    }
    Ok(Some(text))
}

fn check_platforms(value: Option<Value>) -> Result<Vec<Mapping>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Mapping(m) => Ok(m),
                _ => Err(Error::legacy("platforms must be a list of dictionaries")),
            })
            .collect(),
        Some(_) => Err(Error::legacy("platforms must be a list")),
    }
}

fn check_galaxy_tags(value: Option<Value>) -> Result<Vec<String>> {
    let tags = match value {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Sequence(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(Error::legacy("galaxy_tags must be a list of strings")),
            })
            .collect::<Result<Vec<_>>>()?,
        Some(_) => return Err(Error::legacy("galaxy_tags must be a list")),
    };

    if tags.iter().any(|tag| char_len(tag) > MAX_LENGTH_TAG) {
        return Err(Error::legacy(format!(
            "tag must not exceed {MAX_LENGTH_TAG} characters"
        )));
    }
    Ok(tags)
}

/// Key used to name the target role in a mapping-style dependency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKey {
    Role,
    Name,
    Src,
}

impl ReferenceKey {
    /// Lookup order when several keys are present.
    pub const PRIORITY: [ReferenceKey; 3] = [Self::Role, Self::Name, Self::Src];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Role => "role",
            Self::Name => "name",
            Self::Src => "src",
        }
    }
}

impl fmt::Display for ReferenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A mapping-style dependency such as `{role: acme.firewall, vars: {...}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct LegacyRoleReference {
    key: ReferenceKey,
    target: String,
    raw: Mapping,
}

impl LegacyRoleReference {
    pub fn from_mapping(raw: Mapping) -> Result<Self> {
        for key in ReferenceKey::PRIORITY {
            let Some(value) = raw.get(key.as_str()) else {
                continue;
            };
            let Value::String(target) = value else {
                return Err(Error::legacy(format!(
                    "dependency '{key}' value must be a string"
                )));
            };
            check_role_path(target)?;
            return Ok(Self {
                key,
                target: target.clone(),
                raw,
            });
        }

        Err(Error::legacy(
            "dependency must include either the 'role,' 'name,' or 'src' keyword.",
        ))
    }

    /// Which key supplied the target.
    pub fn key(&self) -> ReferenceKey {
        self.key
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// The mapping as written, including keys such as `vars` or `version`.
    pub fn raw(&self) -> &Mapping {
        &self.raw
    }
}

impl Serialize for LegacyRoleReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

fn check_role_path(resolved: &str) -> Result<()> {
    if resolved.matches('.').count() != 1 {
        return Err(Error::legacy(format!(
            "{resolved} must have namespace and name separated by '.'"
        )));
    }
    Ok(())
}

/// A `namespace.name` role path with exactly one dot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DependencyName(String);

impl DependencyName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_role_path(&name)?;
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DependencyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One entry of a legacy role's `dependencies` list.
///
/// Both variants hold types that can only be built through validating
/// constructors, so every entry resolves to a `namespace.name` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LegacyDependency {
    /// A bare `namespace.name` string.
    Name(DependencyName),
    /// A mapping naming the role through `role`, `name` or `src`.
    Reference(LegacyRoleReference),
}

impl LegacyDependency {
    /// Normalize and validate a raw dependency entry.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(Self::Name(DependencyName::new(s)?)),
            Value::Mapping(m) => Ok(Self::Reference(LegacyRoleReference::from_mapping(m)?)),
            _ => Err(Error::legacy(DEPENDENCIES_SHAPE)),
        }
    }

    /// The `namespace.name` string this entry refers to.
    pub fn resolve(&self) -> &str {
        match self {
            Self::Name(name) => name.as_str(),
            Self::Reference(reference) => reference.target(),
        }
    }

    /// Split into `(namespace, name)`.
    pub fn namespace_and_name(&self) -> (&str, &str) {
        // Construction guarantees exactly one dot.
        let resolved = self.resolve();
        resolved.split_once('.').unwrap_or((resolved, ""))
    }
}

/// Validated legacy role metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyMetadata {
    galaxy_info: LegacyGalaxyInfo,
    dependencies: Vec<LegacyDependency>,
}

impl LegacyMetadata {
    pub(crate) fn new(galaxy_info: LegacyGalaxyInfo, dependencies: Vec<LegacyDependency>) -> Self {
        Self {
            galaxy_info,
            dependencies,
        }
    }

    /// Read and validate a `meta/main.yml` file.
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Validate legacy metadata from a YAML string.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let document: Value = serde_yaml::from_str(content)?;
        let Value::Mapping(mut metadata) = document else {
            return Err(Error::legacy(
                "metadata must be in the form of a yaml dictionary",
            ));
        };

        let galaxy_info = match metadata.remove("galaxy_info") {
            None => return Err(Error::legacy("galaxy_info field not found in metadata")),
            Some(Value::Mapping(mapping)) => LegacyGalaxyInfo::from_mapping(mapping)?,
            Some(_) => {
                return Err(Error::legacy(
                    "galaxy_info field must contain a dictionary",
                ));
            }
        };

        let dependencies = match metadata.remove("dependencies") {
            None => Vec::new(),
            Some(Value::Sequence(items)) => items
                .into_iter()
                .map(LegacyDependency::from_value)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => return Err(Error::legacy(DEPENDENCIES_SHAPE)),
        };

        tracing::debug!(
            role = galaxy_info.role_name().unwrap_or("<unnamed>"),
            dependencies = dependencies.len(),
            "Parsed legacy role metadata"
        );
        Ok(Self::new(galaxy_info, dependencies))
    }

    pub fn galaxy_info(&self) -> &LegacyGalaxyInfo {
        &self.galaxy_info
    }

    pub fn dependencies(&self) -> &[LegacyDependency] {
        &self.dependencies
    }

    /// Resolved `namespace.name` of every dependency, in declaration order.
    pub fn dependency_names(&self) -> Vec<&str> {
        self.dependencies.iter().map(LegacyDependency::resolve).collect()
    }
}

/// Validated product of a legacy role import.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegacyImportResult {
    namespace: String,
    name: String,
    metadata: LegacyMetadata,
    readme_file: Option<String>,
    readme_html: Option<String>,
}

impl LegacyImportResult {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        metadata: LegacyMetadata,
    ) -> Result<Self> {
        let namespace = namespace.into();
        let name = name.into();

        if !is_valid_legacy_role_name(&name) {
            return Err(Error::legacy(format!("role name {name} is invalid")));
        }

        let depends_on_self = metadata
            .dependencies()
            .iter()
            .any(|dep| dep.namespace_and_name() == (namespace.as_str(), name.as_str()));
        if depends_on_self {
            return Err(Error::legacy(format!(
                "role {namespace}.{name} cannot depend on itself"
            )));
        }

        Ok(Self {
            namespace,
            name,
            metadata,
            readme_file: None,
            readme_html: None,
        })
    }

    /// Attach the rendered README.
    pub fn with_readme(mut self, file: impl Into<String>, html: impl Into<String>) -> Self {
        self.readme_file = Some(file.into());
        self.readme_html = Some(html.into());
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn metadata(&self) -> &LegacyMetadata {
        &self.metadata
    }

    pub fn readme_file(&self) -> Option<&str> {
        self.readme_file.as_deref()
    }

    pub fn readme_html(&self) -> Option<&str> {
        self.readme_html.as_deref()
    }
}
