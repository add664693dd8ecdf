//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Validate collection and legacy role metadata
#[derive(Parser, Debug)]
#[command(name = "galaxy-schema")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Load the validation policy from a TOML file
    #[arg(long, global = true, value_name = "POLICY.toml")]
    pub config: Option<PathBuf>,

    /// Require collection versions of 1.0.0 or greater
    #[arg(long, global = true)]
    pub require_v1: bool,

    /// Require at least one tag from the curated tag list
    #[arg(long, global = true)]
    pub require_tags: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Parse a `{namespace}-{name}-{version}.tar.gz` artifact filename
    Filename {
        /// Filename to parse (directories are ignored)
        name: String,
    },

    /// Validate a collection MANIFEST.json
    Manifest {
        /// Path to MANIFEST.json
        path: PathBuf,
    },

    /// Validate a collection FILES.json
    Files {
        /// Path to FILES.json
        path: PathBuf,

        /// Verify file checksums against an extracted collection directory
        #[arg(long, value_name = "DIR")]
        root: Option<PathBuf>,
    },

    /// Validate a legacy role's meta/main.yml
    ///
    /// Examples:
    ///   galaxy-schema role meta/main.yml
    ///   galaxy-schema role meta/main.yml --namespace acme --name nginx
    Role {
        /// Path to meta/main.yml
        path: PathBuf,

        /// Role namespace, checked together with --name
        #[arg(long, requires = "name")]
        namespace: Option<String>,

        /// Role name, checked together with --namespace
        #[arg(long, requires = "namespace")]
        name: Option<String>,
    },

    /// Look up an SPDX license identifier
    License {
        /// License identifier, e.g. MIT
        id: String,
    },
}
