// src/logging.rs

use color_eyre::eyre::Result;
use tracing_error::ErrorLayer;
use tracing_subscriber::{self, EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes stderr logging through the tracing subscriber.
///
/// The filter honors `RUST_LOG`, defaulting to info level for this crate.
pub fn initialize_logging() -> Result<()> {
    let filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| format!("{}=info", env!("CARGO_CRATE_NAME")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
