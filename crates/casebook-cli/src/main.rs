//! Casebook CLI Application
//!
//! Command-line interface for the casebook test case manager.

mod args;
mod cli;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use casebook_core::CasebookBuilder;
use clap::Parser;
use cli::Cli;
use log::info;
use renderer::TerminalRenderer;
use Commands::*;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let casebook = CasebookBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .context("Failed to initialize casebook")?;

    let cli = Cli::new(casebook, TerminalRenderer::new(!no_color));

    info!("Casebook started");

    match command {
        Some(Case { command }) => cli.handle_case_command(command).await,
        Some(Fixture { command }) => cli.handle_fixture_command(command).await,
        Some(Step { command }) => cli.handle_step_command(command).await,
        None => cli.list_test_cases().await,
    }
}
