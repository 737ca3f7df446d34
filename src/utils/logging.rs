/// Tracing setup
///
/// Batch commands log to stderr. The dashboard owns the terminal, so it only
/// logs when `DOCKTUI_LOG` is set, and then to a daily file in the cache dir.

use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::utils::{APP_DIR_NAME, LOG_ENV_VAR};

pub fn init_cli() {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

pub fn init_dashboard() -> Result<()> {
    let Ok(level) = std::env::var(LOG_ENV_VAR) else {
        return Ok(());
    };

    let log_dir = dirs::cache_dir()
        .context("Could not determine the user cache directory")?
        .join(APP_DIR_NAME);
    std::fs::create_dir_all(&log_dir)
        .context("Failed to create log directory")?;

    let file_appender = tracing_appender::rolling::daily(&log_dir, "docktui.log");

    tracing_subscriber::registry()
        .with(EnvFilter::new(&level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(false)
                .with_writer(file_appender),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    tracing::info!(dir = %log_dir.display(), level = %level, "dashboard file logging enabled");
    Ok(())
}
