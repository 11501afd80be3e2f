//! # CLI Argument Definitions
//!
//! This module defines the command-line interface (CLI) structure using the `clap` crate.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "joinery")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Generate, merge and validate parameterized-join domain files")]
pub struct Cli {
    /// Configuration file, with or without extension
    #[arg(long, global = true, default_value = "joinery")]
    pub config: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Machine-readable output for `validate`, `refs` and `param`
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: AppCommands,
}

/// Enumeration of available application subcommands.
#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// Regenerate domain files from the schema directory
    Generate(GenerateArgs),
    /// Validate persisted domain files (every file in the output directory by default)
    Validate {
        /// Domain files to check
        paths: Vec<PathBuf>,
    },
    /// Parse a comma-separated list of field references
    Refs {
        /// e.g. "products.name,products:'consumer electronics':true.price"
        list: String,

        /// Also check arity against the joins of this domain
        #[arg(short, long)]
        domain: Option<String>,
    },
    /// Parse a parameter spec such as "discount:float,default=0.15"
    Param {
        spec: String,
    },
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Overwrite existing files, discarding customized entries
    #[arg(long)]
    pub force: bool,

    /// Build, merge and validate without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Only regenerate these schemas
    #[arg(short, long = "schema", value_name = "NAME")]
    pub schemas: Vec<String>,
}
