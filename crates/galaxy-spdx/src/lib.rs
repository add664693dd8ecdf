//! SPDX license identifier catalog.
//!
//! This crate bundles the SPDX license list used to decide whether a license
//! identifier declared in collection metadata is acceptable. The table is
//! loaded once per process and shared read-only afterwards.

pub mod catalog;
pub mod error;

pub use catalog::{
    LICENSES_PATH_ENV, LicenseCatalog, LicenseEntry, catalog, is_valid_license_id,
};
pub use error::{Error, Result};
