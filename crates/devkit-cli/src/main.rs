//! find-module
//!
//! Locate source modules by feature keyword using the `intentIndex` of a
//! project's structure map.
//!
//! ```bash
//! find-module github          # search by feature or concept
//! find-module --list          # list every feature
//! ```

mod cli;
mod commands;
mod error;

use std::io::{self, Write};

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::Cli;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(io::stderr)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!(map = ?cli.map, "Verbose mode enabled");
        }
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.list {
        commands::run_list(&cli.map, cli.json, &mut out)?;
    } else if let Some(keyword) = cli.joined_keyword() {
        commands::run_search(&cli.map, &keyword, cli.json, &mut out)?;
    } else {
        write!(out, "{}", commands::USAGE)?;
    }

    out.flush()?;
    Ok(())
}
