//! CLI for the getter downloader.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use getter_core::config;
use std::path::PathBuf;

use commands::{run_get, run_probe};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "getter")]
#[command(about = "getter: parallel HTTP/1.0 range downloader", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download a resource in parallel chunks and save it to a file.
    Get {
        /// `host[:port]/path` or `http://host[:port]/path`.
        url: String,
        /// Number of workers (and chunks). Defaults to `workers` from config.toml.
        #[arg(short, long, value_name = "N")]
        workers: Option<usize>,
        /// Output file. Defaults to the last path segment of the URL.
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
        /// Work queue capacity. Defaults to the worker count.
        #[arg(long, value_name = "N")]
        queue_capacity: Option<usize>,
    },

    /// Send only the HEAD probe and print the planned chunks.
    Probe {
        /// `host[:port]/path` or `http://host[:port]/path`.
        url: String,
        /// Number of workers to plan for.
        #[arg(short, long, value_name = "N")]
        workers: Option<usize>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Get {
                url,
                workers,
                output,
                queue_capacity,
            } => run_get(&cfg, &url, workers, output.as_deref(), queue_capacity)?,
            CliCommand::Probe { url, workers } => run_probe(&cfg, &url, workers)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
