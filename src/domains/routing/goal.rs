use tracing::{debug, trace};

use crate::common::{DomainError, DomainResult};
use crate::domains::routing::grid::OccupancyGrid;
use crate::domains::routing::types::{GridCell, VenueArea};

/// Neighbour offsets tried when the nominal goal cell is blocked:
/// right, down, up, left, then the diagonals.
pub const REPAIR_OFFSETS: [(i32, i32); 8] = [
    (1, 0),
    (0, 1),
    (0, -1),
    (-1, 0),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// A destination translated to a traversable cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGoal<'a> {
    pub area: &'a VenueArea,
    /// Cell under the area center.
    pub nominal: GridCell,
    /// Cell the search should target.
    pub cell: GridCell,
}

impl ResolvedGoal<'_> {
    pub fn repaired(&self) -> bool {
        self.nominal != self.cell
    }
}

/// First area whose name matches, in load order.
pub fn find_area<'a>(areas: &'a [VenueArea], name: &str) -> DomainResult<&'a VenueArea> {
    areas.iter().find(|a| a.matches(name)).ok_or_else(|| DomainError::NotFound {
        name: name.trim().to_string(),
    })
}

/// First in-bounds traversable neighbour of `cell` in [`REPAIR_OFFSETS`] order.
pub fn nearest_free_neighbour(grid: &OccupancyGrid, cell: GridCell) -> Option<GridCell> {
    REPAIR_OFFSETS
        .iter()
        .map(|&(dx, dy)| cell.offset(dx, dy))
        .find(|candidate| grid.is_traversable(*candidate))
}

pub fn resolve_goal<'a>(
    areas: &'a [VenueArea],
    grid: &OccupancyGrid,
    name: &str,
) -> DomainResult<ResolvedGoal<'a>> {
    let area = find_area(areas, name)?;
    let nominal = grid.world_to_cell(area.center());
    trace!(area = %area.name, "nominal goal {}\n{}", nominal, grid.render_window(nominal, 1));

    if grid.is_traversable(nominal) {
        return Ok(ResolvedGoal { area, nominal, cell: nominal });
    }

    match nearest_free_neighbour(grid, nominal) {
        Some(cell) => {
            debug!(area = %area.name, "goal {} blocked, redirected to {}", nominal, cell);
            Ok(ResolvedGoal { area, nominal, cell })
        }
        None => Err(DomainError::Unreachable {
            name: area.name.clone(),
            x: nominal.x,
            y: nominal.y,
        }),
    }
}
