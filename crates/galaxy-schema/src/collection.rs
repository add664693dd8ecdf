//! Collection metadata (`collection_info` in `MANIFEST.json`).
//!
//! [`CollectionInfo`] can only be obtained through
//! [`CollectionInfoBuilder::build`], which runs every field check in a fixed
//! order and stops at the first failure:
//!
//! 1. `namespace`, `name`: required, identifier grammar, length
//! 2. `version`: required, semantic version, length, optional `>= 1.0.0`
//! 3. `license`: list of valid SPDX identifiers
//! 4. `description`, `repository`, `documentation`, `homepage`, `issues`
//! 5. `authors`, `tags`, `license_file`, `readme`
//! 6. `dependencies`: `namespace.name` keys, range values, no self dependency
//!
//! Once every field has passed, `license` and `license_file` are checked
//! against each other.
//!
//! # Example
//!
//! ```
//! use galaxy_schema::{CollectionInfo, ValidationPolicy};
//!
//! let info = CollectionInfo::builder()
//!     .namespace("acme")
//!     .name("widgets")
//!     .version("1.0.0")
//!     .license(["MIT"])
//!     .authors(["Jane Doe"])
//!     .repository("https://example.com/acme/widgets")
//!     .readme("README.md")
//!     .dependency("acme.core", ">=1.0.0")
//!     .build(&ValidationPolicy::default())
//!     .unwrap();
//!
//! assert_eq!(info.label(), "acme.widgets");
//! ```

use std::collections::BTreeMap;

use semver::Version;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::constants::{
    MAX_LENGTH_AUTHOR, MAX_LENGTH_LICENSE, MAX_LENGTH_NAME, MAX_LENGTH_TAG, MAX_LENGTH_URL,
    MAX_LENGTH_VERSION, MAX_TAGS_COUNT, REQUIRED_TAG_LIST, char_len, is_valid_name,
};
use crate::error::{Error, Result};
use crate::policy::ValidationPolicy;
use crate::version::VersionRange;

/// Keys accepted in a `collection_info` object, in validation order.
pub const COLLECTION_INFO_FIELDS: &[&str] = &[
    "namespace",
    "name",
    "version",
    "license",
    "description",
    "repository",
    "documentation",
    "homepage",
    "issues",
    "authors",
    "tags",
    "license_file",
    "readme",
    "dependencies",
];

/// Validated collection metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionInfo {
    namespace: String,
    name: String,
    version: Version,
    license: Vec<String>,
    description: Option<String>,
    repository: String,
    documentation: Option<String>,
    homepage: Option<String>,
    issues: Option<String>,
    authors: Vec<String>,
    tags: Vec<String>,
    license_file: Option<String>,
    readme: String,
    dependencies: BTreeMap<String, VersionRange>,
}

impl CollectionInfo {
    pub fn builder() -> CollectionInfoBuilder {
        CollectionInfoBuilder::new()
    }

    /// Validate a raw `collection_info` JSON object.
    pub fn from_value(value: Value, policy: &ValidationPolicy) -> Result<Self> {
        CollectionInfoBuilder::from_value(value)?.build(policy)
    }

    /// `namespace.name`
    pub fn label(&self) -> String {
        format!("{}.{}", self.namespace, self.name)
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

    pub fn license(&self) -> &[String] {
        &self.license
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_deref()
    }

    pub fn issues(&self) -> Option<&str> {
        self.issues.as_deref()
    }

    pub fn authors(&self) -> &[String] {
        &self.authors
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn license_file(&self) -> Option<&str> {
        self.license_file.as_deref()
    }

    pub fn readme(&self) -> &str {
        &self.readme
    }

    /// Dependencies keyed by `namespace.name`.
    pub fn dependencies(&self) -> &BTreeMap<String, VersionRange> {
        &self.dependencies
    }
}

/// Staged constructor for [`CollectionInfo`].
///
/// Values are held as raw JSON until [`build`](Self::build), so the same
/// checks apply whether fields come from typed setters or a parsed manifest.
#[derive(Debug, Clone, Default)]
pub struct CollectionInfoBuilder {
    fields: Map<String, Value>,
}

impl CollectionInfoBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a raw `collection_info` object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(Error::metadata("'collection_info' must be an object")),
        }
    }

    /// Set any field to a raw JSON value.
    pub fn field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }

    fn string(self, key: &str, value: impl Into<String>) -> Self {
        self.field(key, Value::String(value.into()))
    }

    fn strings<I, S>(self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values
            .into_iter()
            .map(|v| Value::String(v.into()))
            .collect();
        self.field(key, Value::Array(values))
    }

    pub fn namespace(self, value: impl Into<String>) -> Self {
        self.string("namespace", value)
    }

    pub fn name(self, value: impl Into<String>) -> Self {
        self.string("name", value)
    }

    pub fn version(self, value: impl Into<String>) -> Self {
        self.string("version", value)
    }

    pub fn license<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings("license", values)
    }

    pub fn description(self, value: impl Into<String>) -> Self {
        self.string("description", value)
    }

    pub fn repository(self, value: impl Into<String>) -> Self {
        self.string("repository", value)
    }

    pub fn documentation(self, value: impl Into<String>) -> Self {
        self.string("documentation", value)
    }

    pub fn homepage(self, value: impl Into<String>) -> Self {
        self.string("homepage", value)
    }

    pub fn issues(self, value: impl Into<String>) -> Self {
        self.string("issues", value)
    }

    pub fn authors<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings("authors", values)
    }

    pub fn tags<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strings("tags", values)
    }

    pub fn license_file(self, value: impl Into<String>) -> Self {
        self.string("license_file", value)
    }

    pub fn readme(self, value: impl Into<String>) -> Self {
        self.string("readme", value)
    }

    /// Add one `namespace.name` → version range entry.
    pub fn dependency(mut self, collection: impl Into<String>, spec: impl Into<String>) -> Self {
        let entry = self
            .fields
            .entry("dependencies")
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(deps) = entry {
            deps.insert(collection.into(), Value::String(spec.into()));
        }
        self
    }

    /// Run every check and produce the validated metadata.
    pub fn build(self, policy: &ValidationPolicy) -> Result<CollectionInfo> {
        let mut fields = self.fields;

        if let Some(unknown) = fields
            .keys()
            .find(|key| !COLLECTION_INFO_FIELDS.contains(&key.as_str()))
        {
            return Err(Error::metadata(format!(
                "unknown field in collection_info: '{unknown}'"
            )));
        }

        let namespace = check_name("namespace", fields.remove("namespace"))?;
        let name = check_name("name", fields.remove("name"))?;
        let version = check_version(fields.remove("version"), policy)?;
        let license = check_licenses(fields.remove("license"))?;
        let description = optional_str("description", fields.remove("description"))?;
        let repository = required_str("repository", fields.remove("repository"))?;
        check_url("repository", Some(repository.as_str()))?;
        let documentation = optional_url("documentation", fields.remove("documentation"))?;
        let homepage = optional_url("homepage", fields.remove("homepage"))?;
        let issues = optional_url("issues", fields.remove("issues"))?;
        let authors = check_authors(fields.remove("authors"))?;
        let tags = check_tags(fields.remove("tags"), policy)?;
        let license_file = optional_str("license_file", fields.remove("license_file"))?;
        let readme = required_str("readme", fields.remove("readme"))?;
        let dependencies =
            check_dependencies(fields.remove("dependencies"), &namespace, &name)?;

        check_license_or_license_file(&license, license_file.as_deref())?;

        let info = CollectionInfo {
            namespace,
            name,
            version,
            license,
            description,
            repository,
            documentation,
            homepage,
            issues,
            authors,
            tags,
            license_file,
            readme,
            dependencies,
        };
        tracing::debug!(
            collection = %info.label(),
            version = %info.version,
            "Validated collection metadata"
        );
        Ok(info)
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn required_str(field: &str, value: Option<Value>) -> Result<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        Some(ref v) if !is_falsy(v) => Err(Error::metadata(format!("'{field}' must be a string"))),
        _ => Err(Error::metadata(format!("'{field}' is required"))),
    }
}

fn optional_str(field: &str, value: Option<Value>) -> Result<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(Error::metadata(format!("'{field}' must be a string"))),
    }
}

fn check_url(field: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(url) if char_len(url) > MAX_LENGTH_URL => Err(Error::metadata(format!(
            "'{field}' must not be greater than {MAX_LENGTH_URL} characters"
        ))),
        _ => Ok(()),
    }
}

fn optional_url(field: &str, value: Option<Value>) -> Result<Option<String>> {
    let url = optional_str(field, value)?;
    check_url(field, url.as_deref())?;
    Ok(url)
}

/// Missing key means empty; anything present must be an array of strings.
fn list_of_str(field: &str, value: Option<Value>) -> Result<Vec<String>> {
    let err = || Error::metadata(format!("Expecting '{field}' to be a list of strings"));
    match value {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(err()),
            })
            .collect(),
        Some(_) => Err(err()),
    }
}

fn check_name(field: &str, value: Option<Value>) -> Result<String> {
    let value = required_str(field, value)?;
    if !is_valid_name(&value) {
        return Err(Error::metadata(format!(
            "'{field}' has invalid format: {value}"
        )));
    }
    if char_len(&value) > MAX_LENGTH_NAME {
        return Err(Error::metadata(format!(
            "'{field}' must not be greater than {MAX_LENGTH_NAME} characters"
        )));
    }
    Ok(value)
}

fn check_version(value: Option<Value>, policy: &ValidationPolicy) -> Result<Version> {
    let raw = required_str("version", value)?;
    let version = Version::parse(&raw).map_err(|_| {
        Error::metadata(format!(
            "Expecting 'version' to be in semantic version format, instead found '{raw}'."
        ))
    })?;
    if char_len(&raw) > MAX_LENGTH_VERSION {
        return Err(Error::metadata(format!(
            "'version' must not be greater than {MAX_LENGTH_VERSION} characters"
        )));
    }
    if policy.require_v1_or_greater && version < Version::new(1, 0, 0) {
        return Err(Error::metadata(
            "Config is enabled that requires version to be 1.0.0 or greater.",
        ));
    }
    Ok(version)
}

fn check_licenses(value: Option<Value>) -> Result<Vec<String>> {
    let licenses = list_of_str("license", value)?;
    if licenses.iter().any(|l| char_len(l) > MAX_LENGTH_LICENSE) {
        return Err(Error::metadata(format!(
            "Each license in 'licenses' list must not be greater than {MAX_LENGTH_LICENSE} characters"
        )));
    }

    let invalid: Vec<&str> = licenses
        .iter()
        .map(String::as_str)
        .filter(|id| !galaxy_spdx::is_valid_license_id(Some(id)))
        .collect();
    if !invalid.is_empty() {
        return Err(Error::metadata(format!(
            "Expecting 'license' to be a list of valid SPDX license identifiers, \
             instead found invalid license identifiers: '{}' in 'license' value {:?}. \
             For more info, visit https://spdx.org",
            invalid.join(", "),
            licenses
        )));
    }
    Ok(licenses)
}

fn check_authors(value: Option<Value>) -> Result<Vec<String>> {
    if value.as_ref().is_none_or(is_falsy) {
        return Err(Error::metadata("'authors' is required"));
    }
    let authors = list_of_str("authors", value)?;
    if authors.iter().any(|a| char_len(a) > MAX_LENGTH_AUTHOR) {
        return Err(Error::metadata(format!(
            "Each author in 'authors' list must not be greater than {MAX_LENGTH_AUTHOR} characters"
        )));
    }
    Ok(authors)
}

fn check_tags(value: Option<Value>, policy: &ValidationPolicy) -> Result<Vec<String>> {
    let tags = list_of_str("tags", value)?;

    if policy.check_required_tags
        && !tags.iter().any(|tag| REQUIRED_TAG_LIST.contains(&tag.as_str()))
    {
        return Err(Error::metadata(format!(
            "At least one tag required from tag list: {}",
            REQUIRED_TAG_LIST.join(", ")
        )));
    }

    if tags.len() > MAX_TAGS_COUNT {
        return Err(Error::metadata(format!(
            "Expecting no more than {MAX_TAGS_COUNT} tags in metadata"
        )));
    }

    for tag in &tags {
        if !is_valid_name(tag) {
            return Err(Error::metadata(format!("'tag' has invalid format: {tag}")));
        }
        if char_len(tag) > MAX_LENGTH_TAG {
            return Err(Error::metadata(format!(
                "Each tag in 'tags' list must not be greater than {MAX_LENGTH_TAG} characters"
            )));
        }
    }
    Ok(tags)
}

/// Entries are checked in key order.
fn check_dependencies(
    value: Option<Value>,
    namespace: &str,
    name: &str,
) -> Result<BTreeMap<String, VersionRange>> {
    let entries = match value {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(entries)) => entries,
        Some(_) => return Err(Error::metadata("Expecting 'dependencies' to be a dictionary")),
    };

    let mut dependencies = BTreeMap::new();
    for (collection, spec) in entries {
        let Value::String(spec) = spec else {
            return Err(Error::metadata("Expecting depencency version to be string"));
        };

        let segments: Vec<&str> = collection.split('.').collect();
        let [dep_namespace, dep_name] = segments[..] else {
            return Err(Error::metadata(format!(
                "Invalid dependency format: '{collection}'"
            )));
        };

        for segment in [dep_namespace, dep_name] {
            if !is_valid_name(segment) {
                return Err(Error::metadata(format!(
                    "Invalid dependency format: '{segment}' in '{collection}'"
                )));
            }
        }

        if dep_namespace == namespace && dep_name == name {
            return Err(Error::metadata("Cannot have self dependency"));
        }

        let range = VersionRange::parse(&spec).map_err(|_| {
            Error::metadata(format!(
                "Dependency version spec range invalid: {collection} {spec}"
            ))
        })?;
        dependencies.insert(collection, range);
    }
    Ok(dependencies)
}

fn check_license_or_license_file(license: &[String], license_file: Option<&str>) -> Result<()> {
    let has_license = !license.is_empty();
    let has_license_file = license_file.is_some_and(|f| !f.is_empty());
    if has_license != has_license_file {
        return Ok(());
    }

    if has_license {
        return Err(Error::metadata(
            "The 'license' and 'license_file' keys are mutually exclusive",
        ));
    }

    Err(Error::metadata(format!(
        "Valid values for 'license' or 'license_file' are required. \
         But 'license' ({license:?}) and 'license_file' ({license_file:?}) were invalid."
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal() -> CollectionInfoBuilder {
        CollectionInfo::builder()
            .namespace("acme")
            .name("widgets")
            .version("1.0.0")
            .license(["MIT"])
            .authors(["Jane Doe"])
            .repository("https://example.com/acme/widgets")
            .readme("README.md")
    }

    fn message(err: Error) -> String {
        match err {
            Error::InvalidMetadata(msg) => msg,
            other => panic!("expected InvalidMetadata, got {other:?}"),
        }
    }

    #[test]
    fn test_build_minimal() {
        let info = minimal().build(&ValidationPolicy::default()).unwrap();
        assert_eq!(info.namespace(), "acme");
        assert_eq!(info.name(), "widgets");
        assert_eq!(info.version(), &Version::new(1, 0, 0));
        assert_eq!(info.label(), "acme.widgets");
        assert!(info.tags().is_empty());
        assert!(info.dependencies().is_empty());
    }

    #[test]
    fn test_is_falsy() {
        assert!(is_falsy(&json!(null)));
        assert!(is_falsy(&json!("")));
        assert!(is_falsy(&json!([])));
        assert!(is_falsy(&json!(0)));
        assert!(!is_falsy(&json!("x")));
        assert!(!is_falsy(&json!(1)));
    }

    #[test]
    fn test_required_str_non_string() {
        let err = required_str("namespace", Some(json!(42))).unwrap_err();
        assert_eq!(message(err), "'namespace' must be a string");
    }

    #[test]
    fn test_list_of_str_rejects_mixed() {
        let err = list_of_str("tags", Some(json!(["ok", 1]))).unwrap_err();
        assert_eq!(message(err), "Expecting 'tags' to be a list of strings");
    }

    #[test]
    fn test_list_of_str_rejects_scalar() {
        let err = list_of_str("license", Some(json!("MIT"))).unwrap_err();
        assert_eq!(message(err), "Expecting 'license' to be a list of strings");
    }

    #[test]
    fn test_list_of_str_rejects_explicit_null() {
        assert!(list_of_str("tags", Some(Value::Null)).is_err());
        assert!(list_of_str("tags", None).unwrap().is_empty());
    }

    #[test]
    fn test_dependency_setter_replaces_non_object() {
        let builder = minimal()
            .field("dependencies", json!("oops"))
            .dependency("other.coll", "*");
        let info = builder.build(&ValidationPolicy::default()).unwrap();
        assert_eq!(info.dependencies().len(), 1);
    }

    #[test]
    fn test_license_file_alone_is_enough() {
        let info = CollectionInfo::builder()
            .namespace("acme")
            .name("widgets")
            .version("1.0.0")
            .license_file("LICENSE")
            .authors(["Jane Doe"])
            .repository("https://example.com")
            .readme("README.md")
            .build(&ValidationPolicy::default())
            .unwrap();
        assert_eq!(info.license_file(), Some("LICENSE"));
        assert!(info.license().is_empty());
    }

    #[test]
    fn test_serializes_version_and_ranges_as_strings() {
        let info = minimal()
            .dependency("other.coll", ">=1.0.0")
            .build(&ValidationPolicy::default())
            .unwrap();
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["version"], json!("1.0.0"));
        assert_eq!(value["dependencies"]["other.coll"], json!(">=1.0.0"));
    }
}
