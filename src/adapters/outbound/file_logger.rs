use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;

use crate::domains::logger::{DomainLogger, DynLogger};

const TARGET: &str = "inmaps_router::routing";

/// Forwards domain log lines to the `log` facade, which `fast_log` owns
/// once [`init_file_logger`] has run.
struct FastLogBridge;

impl DomainLogger for FastLogBridge {
    fn info(&self, msg: &str) {
        log::info!(target: TARGET, "{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn warn(&self, msg: &str) {
        log::warn!(target: TARGET, "{} - {}", Utc::now().to_rfc3339(), msg);
    }

    fn error(&self, msg: &str) {
        log::error!(target: TARGET, "{} - {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Install `fast_log` writing to `path` and return a domain logger that goes through it.
///
/// No console appender: stdout carries the JSON-lines responses. Must run
/// before anything else claims the `log` facade.
pub fn init_file_logger(path: &str) -> anyhow::Result<DynLogger> {
    fast_log::init(
        fast_log::config::Config::new()
            .file(path)
            .level(log::LevelFilter::Info),
    )
    .map_err(|e| anyhow!("failed to initialize fast_log at {}: {}", path, e))?;
    Ok(Arc::new(FastLogBridge))
}
