use tracing_subscriber::EnvFilter;

use super::VerbDeckError;

/// Installs the global subscriber. `RUST_LOG` wins over `verbose`.
pub fn init_logging(verbose: bool) -> Result<(), VerbDeckError> {
    let default_level = if verbose { "verbdeck=debug" } else { "verbdeck=info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| VerbDeckError::Custom(format!("Logging init failed: {e}")))
}
