use std::sync::Arc;

/// Domain-level logging port (Hexagonal port).
///
/// The routing service reports requests, goal redirects and outcomes through
/// it; adapters decide where the lines end up.
pub trait DomainLogger: Send + Sync + 'static {
    fn info(&self, msg: &str);
    fn warn(&self, msg: &str);
    fn error(&self, msg: &str);
}

pub type DynLogger = Arc<dyn DomainLogger>;
