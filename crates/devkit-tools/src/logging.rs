use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install a compact stderr subscriber for processes embedding a mirror.
///
/// `RUST_LOG` wins when set; otherwise logs at `info`.
pub fn init() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_with("info")
}

/// Like [`init`], with `directive` as the fallback filter.
pub fn init_with(directive: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(directive))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
