//! Metadata schema and validation for collections and legacy roles.
//!
//! Every value object in this crate is validated when it is constructed:
//! holding a [`CollectionInfo`] or a [`LegacyMetadata`] means all field and
//! cross-field rules already passed. Validation stops at the first failure
//! and reports it as an [`Error`].
//!
//! Behavior that depends on deployment settings is driven by an explicit
//! [`ValidationPolicy`] passed into each top-level call.

pub mod artifact;
pub mod collection;
pub mod constants;
pub mod content;
pub mod docs;
pub mod error;
pub mod filename;
pub mod legacy;
pub mod policy;
pub mod result;
pub mod version;

pub use artifact::{
    CollectionArtifactFile, CollectionArtifactFileManifest, CollectionArtifactManifest, FileType,
};
pub use collection::{CollectionInfo, CollectionInfoBuilder};
pub use content::{Content, ContentType, ResultContentItem};
pub use docs::{DocsBlob, DocsBlobContentItem, RenderedDocFile};
pub use error::{Error, Result};
pub use filename::CollectionFilename;
pub use legacy::{
    DependencyName, LegacyDependency, LegacyGalaxyInfo, LegacyImportResult, LegacyMetadata,
    LegacyRoleReference, ReferenceKey,
};
pub use policy::ValidationPolicy;
pub use result::ImportResult;
pub use version::VersionRange;
