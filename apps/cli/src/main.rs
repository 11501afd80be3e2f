#![allow(clippy::print_stderr, clippy::print_stdout)]

pub mod handlers;
pub mod models;
pub mod services;

use crate::handlers::{generate, param, refs, validate};
use crate::models::args::{AppCommands, Cli};
use crate::services::workspace::{init_logger, load_settings};

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let settings = load_settings(&cli.config)?;
    let _logger = init_logger(&settings, cli.verbose)?;

    let code = match cli.command {
        AppCommands::Generate(args) => generate::generate(&settings, args).await?,
        AppCommands::Validate { paths } => validate::validate(&settings, paths, cli.json).await?,
        AppCommands::Refs { list, domain } => {
            refs::refs(&settings, &list, domain.as_deref(), cli.json).await?
        },
        AppCommands::Param { spec } => {
            param::param(&spec, cli.json)?;
            ExitCode::SUCCESS
        },
    };

    Ok(code)
}
