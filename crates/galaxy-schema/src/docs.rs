//! Rendered documentation attached to an import.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::content::{Content, ContentType};

/// A documentation file rendered to HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedDocFile {
    pub name: Option<String>,
    pub html: Option<String>,
}

impl RenderedDocFile {
    pub fn new(name: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            html: Some(html.into()),
        }
    }
}

/// Per-content documentation entry of a [`DocsBlob`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocsBlobContentItem {
    pub content_name: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub doc_strings: Map<String, Value>,
    pub readme_file: Option<String>,
    pub readme_html: Option<String>,
}

impl From<&Content> for DocsBlobContentItem {
    fn from(content: &Content) -> Self {
        Self {
            content_name: content.name().to_string(),
            content_type: content.content_type(),
            doc_strings: content.doc_strings().clone(),
            readme_file: content.readme_file().map(str::to_string),
            readme_html: content.readme_html().map(str::to_string),
        }
    }
}

/// All rendered documentation for a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocsBlob {
    pub collection_readme: RenderedDocFile,
    #[serde(default)]
    pub documentation_files: Vec<RenderedDocFile>,
    #[serde(default)]
    pub contents: Vec<DocsBlobContentItem>,
}
