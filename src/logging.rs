use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Mutex, Once};

use tracing_subscriber::{fmt, EnvFilter};

pub(crate) const LOG_FILE: &str = "ledgerui.log";
const LOG_ENV: &str = "LEDGERUI_LOG";
const DEFAULT_DIRECTIVE: &str = "ledgerui=info";

static TRACING_INIT: Once = Once::new();

/// Route tracing output to a log file; the terminal belongs to the TUI.
pub(crate) fn init(log_dir: &Path) -> Result<()> {
    let path = log_dir.join(LOG_FILE);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    TRACING_INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(false)
            .try_init();
    });
    Ok(())
}
