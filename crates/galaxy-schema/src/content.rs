//! Content items discovered inside a collection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Kind of content shipped by a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Playbook,
    Role,
    Module,
    ModuleUtils,
    Action,
    Become,
    Cache,
    Callback,
    Cliconf,
    Connection,
    DocFragments,
    Filter,
    Httpapi,
    Inventory,
    Lookup,
    Netconf,
    Shell,
    Strategy,
    Terminal,
    Test,
    Vars,
}

impl ContentType {
    pub const ALL: &'static [ContentType] = &[
        Self::Playbook,
        Self::Role,
        Self::Module,
        Self::ModuleUtils,
        Self::Action,
        Self::Become,
        Self::Cache,
        Self::Callback,
        Self::Cliconf,
        Self::Connection,
        Self::DocFragments,
        Self::Filter,
        Self::Httpapi,
        Self::Inventory,
        Self::Lookup,
        Self::Netconf,
        Self::Shell,
        Self::Strategy,
        Self::Terminal,
        Self::Test,
        Self::Vars,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Playbook => "playbook",
            Self::Role => "role",
            Self::Module => "module",
            Self::ModuleUtils => "module_utils",
            Self::Action => "action",
            Self::Become => "become",
            Self::Cache => "cache",
            Self::Callback => "callback",
            Self::Cliconf => "cliconf",
            Self::Connection => "connection",
            Self::DocFragments => "doc_fragments",
            Self::Filter => "filter",
            Self::Httpapi => "httpapi",
            Self::Inventory => "inventory",
            Self::Lookup => "lookup",
            Self::Netconf => "netconf",
            Self::Shell => "shell",
            Self::Strategy => "strategy",
            Self::Terminal => "terminal",
            Self::Test => "test",
            Self::Vars => "vars",
        }
    }

    /// True for everything loaded from a `plugins/<type>/` directory.
    pub fn is_plugin(&self) -> bool {
        !matches!(self, Self::Playbook | Self::Role)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::metadata(format!("unknown content type: '{s}'")))
    }
}

/// A piece of content with its extracted documentation.
///
/// When the doc strings carry a non-empty `doc` section, the description is
/// always taken from `doc.short_description`, replacing any explicit value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    name: String,
    content_type: ContentType,
    doc_strings: Map<String, Value>,
    description: Option<String>,
    readme_file: Option<String>,
    readme_html: Option<String>,
}

impl Content {
    pub fn new(name: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            name: name.into(),
            content_type,
            doc_strings: Map::new(),
            description: None,
            readme_file: None,
            readme_html: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self.sync_description();
        self
    }

    pub fn with_doc_strings(mut self, doc_strings: Map<String, Value>) -> Self {
        self.doc_strings = doc_strings;
        self.sync_description();
        self
    }

    pub fn with_readme(mut self, file: impl Into<String>, html: impl Into<String>) -> Self {
        self.readme_file = Some(file.into());
        self.readme_html = Some(html.into());
        self
    }

    fn sync_description(&mut self) {
        let Some(doc) = self.doc_strings.get("doc").filter(|doc| has_content(doc)) else {
            return;
        };
        self.description = doc
            .get("short_description")
            .and_then(Value::as_str)
            .map(str::to_string);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    pub fn doc_strings(&self) -> &Map<String, Value> {
        &self.doc_strings
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn readme_file(&self) -> Option<&str> {
        self.readme_file.as_deref()
    }

    pub fn readme_html(&self) -> Option<&str> {
        self.readme_html.as_deref()
    }
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

/// Summary of a content item as reported in an import result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultContentItem {
    pub name: String,
    pub content_type: ContentType,
    pub description: Option<String>,
}

impl From<&Content> for ResultContentItem {
    fn from(content: &Content) -> Self {
        Self {
            name: content.name.clone(),
            content_type: content.content_type,
            description: content.description.clone(),
        }
    }
}
