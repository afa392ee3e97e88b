use crate::errors::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Install the global tracing subscriber.
///
/// Stdout carries the inventory JSON that the orchestration tool parses, so all
/// diagnostics go to stderr. Verbosity follows `RUST_LOG` and defaults to errors only.
pub fn setup_tracing() -> Result<(), Error> {
    let console_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());

    let subscriber = Registry::default().with(console_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}
