use crate::common::DomainResult;
use crate::domains::routing::types::VenueArea;

/// Port the routing domain depends on for venue geometry.
/// Adapters provide filesystem or network-backed sources.
pub trait VenueDataSource: Send + Sync {
    fn load_areas(&self, name: &str) -> DomainResult<Vec<VenueArea>>;
}
