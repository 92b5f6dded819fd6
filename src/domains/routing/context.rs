use std::collections::HashSet;

use tracing::{info, warn};

use crate::common::DomainResult;
use crate::domains::routing::goal::{resolve_goal, ResolvedGoal};
use crate::domains::routing::grid::{BlockingPolicy, OccupancyGrid};
use crate::domains::routing::search::{find_path, SearchOutcome};
use crate::domains::routing::types::{normalize_name, GridCell, VenueArea};

/// Venue areas and the grid built from them, created once at startup and
/// shared read-only between requests.
#[derive(Debug, Clone)]
pub struct VenueContext {
    areas: Vec<VenueArea>,
    grid: OccupancyGrid,
}

impl VenueContext {
    pub fn initialize(
        areas: Vec<VenueArea>,
        cell_size: i32,
        policy: BlockingPolicy,
    ) -> DomainResult<Self> {
        let grid = OccupancyGrid::build(&areas, cell_size, policy)?;
        info!(
            "venue initialized: {} areas, {}x{} grid, {} blocked cells",
            areas.len(),
            grid.width(),
            grid.height(),
            grid.blocked_count()
        );
        warn_duplicate_names(&areas);
        Ok(Self { areas, grid })
    }

    /// Pair areas with an externally prepared grid, e.g. a test fixture.
    pub fn with_grid(areas: Vec<VenueArea>, grid: OccupancyGrid) -> Self {
        warn_duplicate_names(&areas);
        Self { areas, grid }
    }

    pub fn areas(&self) -> &[VenueArea] {
        &self.areas
    }

    pub fn area(&self, id: usize) -> Option<&VenueArea> {
        self.areas.get(id)
    }

    pub fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    pub fn resolve_goal(&self, name: &str) -> DomainResult<ResolvedGoal<'_>> {
        resolve_goal(&self.areas, &self.grid, name)
    }

    pub fn find_path(&self, start: GridCell, goal: GridCell) -> DomainResult<SearchOutcome> {
        find_path(&self.grid, start, goal)
    }
}

fn warn_duplicate_names(areas: &[VenueArea]) {
    let mut seen = HashSet::new();
    for area in areas {
        if !seen.insert(normalize_name(&area.name)) {
            warn!("duplicate area name {:?}; the first one loaded wins", area.name.trim());
        }
    }
}
