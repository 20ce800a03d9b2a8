// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, fmt::time::uptime, EnvFilter};

use crate::error::ScrapeError;

/// Install the global subscriber. `filter` is an `EnvFilter` directive
/// (`info`, `router_bw=debug`, ...). With `log_file` set, lines are appended
/// there instead of going to stderr.
///
/// A second call is a no-op; the first subscriber stays.
pub fn init(filter: &str, log_file: Option<&Path>) -> Result<(), ScrapeError> {
    let filter = EnvFilter::try_new(filter)
        .map_err(|e| ScrapeError::Config(format!("log filter {filter:?}: {e}")))?;

    let builder = fmt()
        .with_env_filter(filter)
        .with_timer(uptime())
        .with_target(false);

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            let _ = builder.with_ansi(false).with_writer(Mutex::new(file)).try_init();
        }
        None => {
            let _ = builder.with_writer(std::io::stderr).try_init();
        }
    }
    Ok(())
}
