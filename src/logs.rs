use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::{GameError, Result};

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` filter.
pub fn setup_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::Layer::new().with_writer(std::io::stdout).with_target(false));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| GameError::Logging(e.to_string()))?;

    info!("Logging initialized");
    Ok(())
}
