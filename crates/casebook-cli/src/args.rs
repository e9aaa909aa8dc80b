use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{CaseCommands, FixtureCommands, StepCommands};

/// Main command-line interface for the casebook test case manager
///
/// Casebook keeps manual test cases and reusable fixtures as ordered step
/// sequences. Every change is recorded as a numbered version that can be
/// inspected or restored later.
#[derive(Parser)]
#[command(version, about, name = "cb")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/casebook/casebook.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the casebook CLI
///
/// - `case`: manage test cases and their version history
/// - `fixture`: manage fixtures and their version history
/// - `step`: add, edit, move and delete steps of either
#[derive(Subcommand)]
pub enum Commands {
    /// Manage test cases
    #[command(alias = "c")]
    Case {
        #[command(subcommand)]
        command: CaseCommands,
    },
    /// Manage fixtures
    #[command(alias = "f")]
    Fixture {
        #[command(subcommand)]
        command: FixtureCommands,
    },
    /// Manage steps of a test case or fixture
    #[command(alias = "s")]
    Step {
        #[command(subcommand)]
        command: StepCommands,
    },
}
