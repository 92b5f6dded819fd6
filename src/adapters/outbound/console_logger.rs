use chrono::Utc;
use std::sync::Arc;

use crate::domains::logger::{DomainLogger, DynLogger};

/// Writes to stderr; stdout carries the JSON-lines responses.
struct ConsoleBridge;

impl DomainLogger for ConsoleBridge {
    fn info(&self, msg: &str) {
        eprintln!("{} INFO {}", Utc::now().to_rfc3339(), msg);
    }
    fn warn(&self, msg: &str) {
        eprintln!("{} WARN {}", Utc::now().to_rfc3339(), msg);
    }
    fn error(&self, msg: &str) {
        eprintln!("{} ERROR {}", Utc::now().to_rfc3339(), msg);
    }
}

/// Initialize a console-backed DomainLogger (the fallback when no log file is configured)
pub fn init_console_logger() -> DynLogger {
    Arc::new(ConsoleBridge)
}
