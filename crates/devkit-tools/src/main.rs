//! Tool authority over stdio or TCP
//!
//! # Usage
//!
//! ```bash
//! tool-authority [--tools <tools.toml>] [--locked] [--listen <addr>]
//! ```
//!
//! Requests and responses are JSON lines on stdin/stdout, or on every
//! connection accepted at `--listen`. Logs go to stderr; `RUST_LOG`
//! overrides the default `devkit_tools=info`.

use std::path::PathBuf;

use clap::Parser;
use devkit_tools::{Authority, AuthorityServer, LockedPolicy, SyncSettings, ToolRegistry};
use tokio::net::TcpListener;

/// Serve the active coding-assistant selection over stdio or TCP
#[derive(Parser)]
#[command(name = "tool-authority")]
#[command(version)]
struct Args {
    /// TOML tool registry (defaults to the built-in tools)
    #[arg(short, long)]
    tools: Option<PathBuf>,

    /// Reject every switch request
    #[arg(long)]
    locked: bool,

    /// Accept any number of peers on this address instead of using stdio
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Broadcast buffer per subscriber
    #[arg(long, default_value_t = devkit_tools::DEFAULT_BROADCAST_CAPACITY)]
    capacity: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // stdout carries the protocol, so logs go to stderr
    devkit_tools::logging::init_with("devkit_tools=info")?;

    let args = Args::parse();

    let registry = match &args.tools {
        Some(path) => ToolRegistry::load(path)?,
        None => ToolRegistry::with_builtins(),
    };
    tracing::info!(tools = ?registry.list(), active = %registry.active().id, "Loaded tool registry");

    let settings = SyncSettings::default().with_broadcast_capacity(args.capacity);
    let mut authority = Authority::new(registry, settings);
    if args.locked {
        authority = authority.with_policy(LockedPolicy);
    }

    let server = AuthorityServer::new(authority);
    match &args.listen {
        Some(addr) => server.listen(TcpListener::bind(addr).await?).await?,
        None => server.run().await?,
    }
    Ok(())
}
