//! Command-line interface for campmap.
//!
//! This module provides the CLI structure for the `campmap` binary; the
//! handlers live in `main.rs`.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, ConfigCommand, ImportCommand, ListCommand, RemoveCommand, RenderCommand,
    ShowCommand, TemplateCommand, UpdateCommand,
};

/// campmap - Catalog refugee camps and map them
///
/// Keeps a JSON catalog of camps with their coordinates, population, radar
/// polarisation and icon category, and renders it as an interactive map.
#[derive(Debug, Parser)]
#[command(name = "campmap")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add one camp
    Add(AddCommand),

    /// Import camps from a CSV file
    Import(ImportCommand),

    /// Add a camp through guided prompts
    Interactive,

    /// Write an example CSV file
    Template(TemplateCommand),

    /// List all camps
    List(ListCommand),

    /// Show one camp
    Show(ShowCommand),

    /// Change fields of a camp
    Update(UpdateCommand),

    /// Remove a camp
    Remove(RemoveCommand),

    /// Count camps per icon category
    Stats,

    /// Generate the interactive map
    Render(RenderCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
