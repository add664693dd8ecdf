//! Tests for MANIFEST.json and FILES.json parsing

use galaxy_schema::{
    CollectionArtifactFileManifest, CollectionArtifactManifest, Error, FileType, ValidationPolicy,
};
use pretty_assertions::assert_eq;

const MANIFEST: &str = r#"{
  "collection_info": {
    "namespace": "acme",
    "name": "widgets",
    "version": "2.1.0",
    "authors": ["Jane Doe <jane@example.com>"],
    "readme": "README.md",
    "tags": ["tools"],
    "description": "Widgets for everyone",
    "license": ["GPL-3.0-or-later"],
    "license_file": null,
    "dependencies": {"acme.core": ">=1.0.0"},
    "repository": "https://example.com/acme/widgets",
    "documentation": null,
    "homepage": null,
    "issues": null
  },
  "file_manifest_file": {
    "name": "FILES.json",
    "ftype": "file",
    "chksum_type": "sha256",
    "chksum_sha256": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824",
    "format": 1
  },
  "format": 1
}"#;

const FILES: &str = r#"{
  "files": [
    {"name": ".", "ftype": "dir", "chksum_type": null, "chksum_sha256": null, "format": 1},
    {"name": "README.md", "ftype": "file", "chksum_type": "sha256",
     "chksum_sha256": "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824", "format": 1},
    {"name": "plugins", "ftype": "dir", "chksum_type": null, "chksum_sha256": null, "format": 1}
  ],
  "format": 1
}"#;

// ============================================================================
// MANIFEST.json
// ============================================================================

#[test]
fn test_parse_manifest() {
    let manifest = CollectionArtifactManifest::parse(MANIFEST, &ValidationPolicy::default()).unwrap();

    assert_eq!(manifest.format(), 1);
    assert_eq!(manifest.collection_info().label(), "acme.widgets");
    assert_eq!(manifest.collection_info().version().to_string(), "2.1.0");
    assert_eq!(manifest.file_manifest_file().name(), "FILES.json");
    assert_eq!(manifest.file_manifest_file().ftype(), FileType::File);
}

#[test]
fn test_manifest_missing_file_manifest_file() {
    let mut doc: serde_json::Value = serde_json::from_str(MANIFEST).unwrap();
    doc.as_object_mut().unwrap().remove("file_manifest_file");

    let err = CollectionArtifactManifest::parse(&doc.to_string(), &ValidationPolicy::default())
        .unwrap_err();
    assert!(matches!(err, Error::MissingFileManifest));
    assert!(err.to_string().contains("'file_manifest_file'"));
}

#[test]
fn test_manifest_missing_collection_info() {
    let err = CollectionArtifactManifest::parse(r#"{"format": 1}"#, &ValidationPolicy::default())
        .unwrap_err();
    assert!(err.is_invalid_metadata());
}

#[test]
fn test_manifest_invalid_collection_info_propagates() {
    let doc = MANIFEST.replace(r#""name": "widgets""#, r#""name": "Widgets""#);
    let err = CollectionArtifactManifest::parse(&doc, &ValidationPolicy::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid collection metadata. 'name' has invalid format: Widgets"
    );
}

#[test]
fn test_manifest_policy_applies() {
    let policy = ValidationPolicy::new().check_required_tags(true);
    let doc = MANIFEST.replace(r#""tags": ["tools"]"#, r#""tags": ["widgets"]"#);

    assert!(CollectionArtifactManifest::parse(MANIFEST, &policy).is_ok());
    assert!(CollectionArtifactManifest::parse(&doc, &policy).is_err());
}

#[test]
fn test_manifest_not_json() {
    let err = CollectionArtifactManifest::parse("{not json", &ValidationPolicy::default())
        .unwrap_err();
    assert!(matches!(err, Error::Json(_)));
}

#[test]
fn test_manifest_top_level_array() {
    let err = CollectionArtifactManifest::parse("[]", &ValidationPolicy::default()).unwrap_err();
    assert!(err.is_invalid_metadata());
}

// ============================================================================
// FILES.json
// ============================================================================

#[test]
fn test_parse_file_manifest() {
    let manifest = CollectionArtifactFileManifest::parse(FILES).unwrap();

    assert_eq!(manifest.len(), 3);
    let names: Vec<&str> = manifest.files().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec![".", "README.md", "plugins"]);

    let readme = manifest.get("README.md").unwrap();
    assert_eq!(readme.ftype(), FileType::File);
    assert!(readme.verify_sha256(b"hello"));
    assert!(!readme.verify_sha256(b"goodbye"));

    let plugins = manifest.get("plugins").unwrap();
    assert_eq!(plugins.ftype(), FileType::Dir);
    assert!(plugins.chksum_sha256().is_none());
}

#[test]
fn test_file_manifest_without_files() {
    let err = CollectionArtifactFileManifest::parse(r#"{"format": 1}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidFileManifest(_)));
}

#[test]
fn test_file_manifest_bad_entry() {
    let err = CollectionArtifactFileManifest::parse(r#"{"files": [{"name": "x"}]}"#).unwrap_err();
    assert!(matches!(err, Error::InvalidFileManifest(_)));
}

#[test]
fn test_file_manifest_empty_list() {
    let manifest = CollectionArtifactFileManifest::parse(r#"{"files": []}"#).unwrap();
    assert!(manifest.is_empty());
    assert_eq!(manifest.format(), 1);
}
