//! Command implementations
//!
//! Each command validates its input and returns the validated entity as
//! JSON for `main` to print.

use std::fs;
use std::path::{Component, Path};

use galaxy_schema::{
    CollectionArtifactFileManifest, CollectionArtifactManifest, CollectionFilename, FileType,
    LegacyImportResult, LegacyMetadata, ValidationPolicy,
};
use serde_json::{Value, json};

use crate::error::{CliError, Result};

/// Build the policy from an optional TOML file, the process environment,
/// and the command-line switches, in that order.
pub fn resolve_policy(
    config: Option<&Path>,
    require_v1: bool,
    require_tags: bool,
) -> Result<ValidationPolicy> {
    let base = match config {
        Some(path) => ValidationPolicy::from_path(path)?,
        None => ValidationPolicy::default(),
    };
    let mut policy = base.with_overrides(|key| std::env::var(key).ok())?;

    if require_v1 {
        policy = policy.require_v1_or_greater(true);
    }
    if require_tags {
        policy = policy.check_required_tags(true);
    }

    tracing::debug!(?policy, "Resolved validation policy");
    Ok(policy)
}

pub fn run_filename(name: &str) -> Result<Value> {
    let basename = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(name);
    let filename = CollectionFilename::parse(basename)?;
    Ok(serde_json::to_value(filename)?)
}

pub fn run_manifest(path: &Path, policy: &ValidationPolicy) -> Result<Value> {
    let data = read(path)?;
    let manifest = CollectionArtifactManifest::parse(&data, policy)?;
    Ok(serde_json::to_value(manifest)?)
}

pub fn run_files(path: &Path, root: Option<&Path>) -> Result<Value> {
    let data = read(path)?;
    let manifest = CollectionArtifactFileManifest::parse(&data)?;

    if let Some(root) = root {
        verify_checksums(&manifest, root)?;
    }
    Ok(serde_json::to_value(manifest)?)
}

fn verify_checksums(manifest: &CollectionArtifactFileManifest, root: &Path) -> Result<()> {
    let mut mismatched = Vec::new();

    for file in manifest.files() {
        if file.ftype() != FileType::File || file.chksum_sha256().is_none() {
            continue;
        }
        let path = root.join(contained_path(file.name())?);
        let content = fs::read(&path).map_err(|source| CliError::Read { path, source })?;
        if !file.verify_sha256(&content) {
            mismatched.push(file.name());
        }
    }

    if !mismatched.is_empty() {
        return Err(CliError::user(format!(
            "checksum mismatch: {}",
            mismatched.join(", ")
        )));
    }
    tracing::info!(root = %root.display(), "All file checksums match");
    Ok(())
}

/// Manifest names must stay below the root they are checked against.
fn contained_path(name: &str) -> Result<&Path> {
    let path = Path::new(name);
    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes {
        return Err(CliError::user(format!("unsafe path in FILES.json: '{name}'")));
    }
    Ok(path)
}

pub fn run_role(path: &Path, identity: Option<(&str, &str)>) -> Result<Value> {
    let metadata = LegacyMetadata::parse(path)?;

    match identity {
        Some((namespace, name)) => {
            let result = LegacyImportResult::new(namespace, name, metadata)?;
            Ok(serde_json::to_value(result)?)
        }
        None => Ok(serde_json::to_value(metadata)?),
    }
}

pub fn run_license(id: &str) -> Result<Value> {
    let catalog = galaxy_spdx::catalog();
    if !catalog.is_valid(Some(id)) {
        let reason = if catalog.is_deprecated(id) {
            "is deprecated"
        } else {
            "is not a known SPDX license identifier"
        };
        return Err(CliError::user(format!("'{id}' {reason}")));
    }
    Ok(json!({ "license": id, "valid": true }))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}
