//! CLI for picfetch.

mod commands;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use picfetch_core::config;
use std::path::PathBuf;

use commands::{run_grab, run_scan};

/// Top-level CLI for the picfetch page image downloader.
#[derive(Debug, Parser)]
#[command(name = "picfetch")]
#[command(about = "picfetch: download every image referenced by a web page", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch a page and download every image it references.
    Grab {
        /// Page URL; `http://` is assumed when no scheme is given.
        url: String,
        /// Directory in which the `<host>_<timestamp>` folder is created (default: current dir).
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Download up to N images concurrently (overrides `jobs` in config.toml).
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Fetch a page and list the image references found, without downloading.
    Scan {
        /// Page URL; `http://` is assumed when no scheme is given.
        url: String,
    },
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Grab { url, out_dir, jobs } => {
                let out_dir = match out_dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                let jobs = jobs.unwrap_or(cfg.jobs);
                run_grab(&cfg, &url, &out_dir, jobs).await?;
            }
            CliCommand::Scan { url } => run_scan(&cfg, &url).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
