//! Product of a successful collection import.

use serde::Serialize;

use crate::collection::CollectionInfo;
use crate::content::{Content, ResultContentItem};
use crate::docs::DocsBlob;

/// Validated collection metadata together with what was found inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    metadata: CollectionInfo,
    docs_blob: Option<DocsBlob>,
    contents: Vec<ResultContentItem>,
    custom_license: Option<String>,
    requires_ansible: Option<String>,
}

impl ImportResult {
    pub fn new(metadata: CollectionInfo) -> Self {
        Self {
            metadata,
            docs_blob: None,
            contents: Vec::new(),
            custom_license: None,
            requires_ansible: None,
        }
    }

    pub fn with_docs_blob(mut self, docs_blob: DocsBlob) -> Self {
        self.docs_blob = Some(docs_blob);
        self
    }

    /// Summarize each content item into the result.
    pub fn with_contents<'a, I>(mut self, contents: I) -> Self
    where
        I: IntoIterator<Item = &'a Content>,
    {
        self.contents = contents.into_iter().map(ResultContentItem::from).collect();
        self
    }

    pub fn with_custom_license(mut self, license: impl Into<String>) -> Self {
        self.custom_license = Some(license.into());
        self
    }

    pub fn with_requires_ansible(mut self, spec: impl Into<String>) -> Self {
        self.requires_ansible = Some(spec.into());
        self
    }

    pub fn metadata(&self) -> &CollectionInfo {
        &self.metadata
    }

    pub fn docs_blob(&self) -> Option<&DocsBlob> {
        self.docs_blob.as_ref()
    }

    pub fn contents(&self) -> &[ResultContentItem] {
        &self.contents
    }

    pub fn custom_license(&self) -> Option<&str> {
        self.custom_license.as_deref()
    }

    pub fn requires_ansible(&self) -> Option<&str> {
        self.requires_ansible.as_deref()
    }
}
