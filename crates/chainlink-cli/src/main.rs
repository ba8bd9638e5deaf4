use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

mod cli;
mod commands;
mod config;
mod demo;
mod render;

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let config = config::CliConfig::load(cli.config.as_deref())?;
    if !config.color || cli.format == cli::OutputFormat::Json {
        colored::control::set_override(false);
    }

    let ctx = commands::Context::new(&cli, &config);
    commands::run_command(cli, &ctx)
}
