//! `MANIFEST.json` and `FILES.json` parsing.
//!
//! A built collection archive carries two machine-readable manifests:
//! `MANIFEST.json` holds the collection metadata plus a pointer to
//! `FILES.json`, which lists every packaged file with its checksum.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::collection::CollectionInfo;
use crate::error::{Error, Result};
use crate::policy::ValidationPolicy;

/// Manifest format version written by current build tooling.
pub const DEFAULT_FORMAT: u64 = 1;

const DEFAULT_CHECKSUM_TYPE: &str = "sha256";

/// Whether a manifest entry describes a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    File,
    Dir,
}

/// One file record, either the `FILES.json` pointer in `MANIFEST.json` or
/// an entry of the `FILES.json` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionArtifactFile {
    name: String,
    ftype: FileType,
    #[serde(default)]
    src_name: Option<String>,
    #[serde(default)]
    chksum_type: Option<String>,
    #[serde(default)]
    chksum_sha256: Option<String>,
    #[serde(default = "default_format")]
    format: u64,
}

fn default_format() -> u64 {
    DEFAULT_FORMAT
}

impl CollectionArtifactFile {
    pub fn new(name: impl Into<String>, ftype: FileType) -> Self {
        Self {
            name: name.into(),
            ftype,
            src_name: None,
            chksum_type: Some(DEFAULT_CHECKSUM_TYPE.to_string()),
            chksum_sha256: None,
            format: DEFAULT_FORMAT,
        }
    }

    pub fn with_sha256(mut self, digest: impl Into<String>) -> Self {
        self.chksum_type = Some(DEFAULT_CHECKSUM_TYPE.to_string());
        self.chksum_sha256 = Some(digest.into());
        self
    }

    fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::InvalidFileManifest(e.to_string()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ftype(&self) -> FileType {
        self.ftype
    }

    pub fn src_name(&self) -> Option<&str> {
        self.src_name.as_deref()
    }

    pub fn chksum_type(&self) -> Option<&str> {
        self.chksum_type.as_deref()
    }

    pub fn chksum_sha256(&self) -> Option<&str> {
        self.chksum_sha256.as_deref()
    }

    pub fn format(&self) -> u64 {
        self.format
    }

    /// Compare `content` against the recorded SHA-256 digest.
    ///
    /// Returns `false` when no digest is recorded.
    pub fn verify_sha256(&self, content: &[u8]) -> bool {
        let Some(expected) = self.chksum_sha256.as_deref() else {
            return false;
        };
        let actual = format!("{:x}", Sha256::digest(content));
        actual.eq_ignore_ascii_case(expected)
    }
}

/// Validated `MANIFEST.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionArtifactManifest {
    collection_info: CollectionInfo,
    format: u64,
    file_manifest_file: CollectionArtifactFile,
}

impl CollectionArtifactManifest {
    /// Parse and validate a `MANIFEST.json` document.
    pub fn parse(data: &str, policy: &ValidationPolicy) -> Result<Self> {
        let mut meta = into_object(serde_json::from_str(data)?, "MANIFEST.json")
            .map_err(Error::metadata)?;

        let collection_info = match meta.remove("collection_info") {
            Some(value @ Value::Object(_)) => CollectionInfo::from_value(value, policy)?,
            _ => {
                return Err(Error::metadata(
                    "MANIFEST.json did not contain a 'collection_info' object",
                ));
            }
        };

        let file_manifest_file = meta
            .remove("file_manifest_file")
            .ok_or(Error::MissingFileManifest)?;
        let file_manifest_file = CollectionArtifactFile::from_value(file_manifest_file)?;

        let format = take_format(&mut meta).map_err(Error::metadata)?;

        if let Some(unknown) = meta.keys().next() {
            return Err(Error::metadata(format!(
                "unknown field in MANIFEST.json: '{unknown}'"
            )));
        }

        tracing::debug!(
            collection = %collection_info.label(),
            files = %file_manifest_file.name(),
            "Parsed collection manifest"
        );
        Ok(Self {
            collection_info,
            format,
            file_manifest_file,
        })
    }

    pub fn collection_info(&self) -> &CollectionInfo {
        &self.collection_info
    }

    pub fn format(&self) -> u64 {
        self.format
    }

    pub fn file_manifest_file(&self) -> &CollectionArtifactFile {
        &self.file_manifest_file
    }
}

/// Validated `FILES.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionArtifactFileManifest {
    files: Vec<CollectionArtifactFile>,
    format: u64,
}

impl CollectionArtifactFileManifest {
    pub fn new(files: Vec<CollectionArtifactFile>) -> Self {
        Self {
            files,
            format: DEFAULT_FORMAT,
        }
    }

    /// Parse a `FILES.json` document.
    pub fn parse(data: &str) -> Result<Self> {
        let mut meta = into_object(serde_json::from_str(data)?, "FILES.json")
            .map_err(Error::InvalidFileManifest)?;

        let Some(Value::Array(entries)) = meta.remove("files") else {
            return Err(Error::InvalidFileManifest(
                "FILES.json did not contain a 'files' list".to_string(),
            ));
        };

        let files = entries
            .into_iter()
            .map(CollectionArtifactFile::from_value)
            .collect::<Result<Vec<_>>>()?;
        let format = take_format(&mut meta).map_err(Error::InvalidFileManifest)?;

        tracing::debug!(count = files.len(), "Parsed file manifest");
        Ok(Self { files, format })
    }

    pub fn files(&self) -> &[CollectionArtifactFile] {
        &self.files
    }

    pub fn format(&self) -> u64 {
        self.format
    }

    /// Look up an entry by its path inside the archive.
    pub fn get(&self, name: &str) -> Option<&CollectionArtifactFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn into_object(value: Value, document: &str) -> std::result::Result<Map<String, Value>, String> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(format!("{document} must contain a JSON object")),
    }
}

fn take_format(meta: &mut Map<String, Value>) -> std::result::Result<u64, String> {
    match meta.remove("format") {
        None => Ok(DEFAULT_FORMAT),
        Some(value) => value
            .as_u64()
            .ok_or_else(|| format!("'format' must be a non-negative integer, found {value}")),
    }
}
