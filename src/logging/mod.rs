// Logging module for structured logging using the tracing crate

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber for structured logging
///
/// The subscriber writes to stderr so that progress output never mixes with
/// anything a command prints on stdout. It is configured with:
/// - A level filter built from `level` (`RUST_LOG`, when set, takes precedence)
/// - Human-readable output, or one JSON object per event when `json` is set
///
/// # Errors
///
/// Returns an error if `level` is not a valid filter directive or if a
/// global subscriber is already installed.
///
/// # Examples
///
/// ```
/// use watermarker::logging::init_subscriber;
///
/// // Initialize logging at application startup
/// init_subscriber("info", false).expect("Failed to initialize logging");
///
/// // Now you can use tracing macros throughout the application
/// tracing::info!("Application started");
/// ```
pub fn init_subscriber(level: &str, json: bool) -> anyhow::Result<()> {
    let filter = build_filter(level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {}", e))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to install subscriber: {}", e))?;
    }

    Ok(())
}

/// Filter from `RUST_LOG`, falling back to `level`.
fn build_filter(level: &str) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(level)?),
    }
}
