//! galaxy-schema CLI
//!
//! Validates collection artifacts and legacy role metadata from the command
//! line and prints the validated entity as JSON.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use serde_json::Value;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;

    let output = execute_command(&cli)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn execute_command(cli: &Cli) -> Result<Value> {
    match &cli.command {
        Commands::Filename { name } => commands::run_filename(name),
        Commands::Manifest { path } => {
            let policy = policy(cli)?;
            commands::run_manifest(path, &policy)
        }
        Commands::Files { path, root } => commands::run_files(path, root.as_deref()),
        Commands::Role {
            path,
            namespace,
            name,
        } => {
            let identity = namespace.as_deref().zip(name.as_deref());
            commands::run_role(path, identity)
        }
        Commands::License { id } => commands::run_license(id),
    }
}

fn policy(cli: &Cli) -> Result<galaxy_schema::ValidationPolicy> {
    commands::resolve_policy(cli.config.as_deref(), cli.require_v1, cli.require_tags)
}
