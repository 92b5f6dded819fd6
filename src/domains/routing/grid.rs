use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::common::{DomainError, DomainResult};
use crate::domains::routing::types::{AreaKind, GridCell, Position2D, VenueArea};

/// Upper bound on `width * height` for a built grid (a 4000x4000 floor).
pub const MAX_GRID_CELLS: usize = 16_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    Traversable,
    Blocked,
}

/// Decides which venue areas become blocked cells.
///
/// Obstacle areas always block. Booths are walkable points of interest
/// unless `block_booths` is set, which turns every booth footprint into a
/// solid stand and relies on goal repair to reach it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingPolicy {
    #[serde(default)]
    pub block_booths: bool,
}

impl BlockingPolicy {
    pub fn blocks(&self, kind: AreaKind) -> bool {
        match kind {
            AreaKind::Obstacle => true,
            AreaKind::Booth => self.block_booths,
        }
    }
}

/// Fixed-size traversability map of the venue, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cell_size: i32,
    cells: Vec<CellState>,
}

impl OccupancyGrid {
    /// Build the grid covering every area.
    ///
    /// Dimensions are `ceil(max_extent / cell_size)` on each axis. An area
    /// is treated as the half-open rectangle `[min, max)` and blocks every
    /// cell it overlaps, clipped to the grid.
    pub fn build(
        areas: &[VenueArea],
        cell_size: i32,
        policy: BlockingPolicy,
    ) -> DomainResult<Self> {
        if areas.is_empty() {
            return Err(DomainError::InvalidConfiguration {
                reason: "no venue areas supplied".to_string(),
            });
        }
        if cell_size <= 0 {
            return Err(DomainError::InvalidConfiguration {
                reason: format!("cell size must be positive, got {}", cell_size),
            });
        }

        let max_x = areas.iter().map(|a| a.area.max_x()).max().unwrap_or(0);
        let max_y = areas.iter().map(|a| a.area.max_y()).max().unwrap_or(0);
        if max_x <= 0 || max_y <= 0 {
            return Err(DomainError::InvalidConfiguration {
                reason: format!("venue extent ({}, {}) yields an empty grid", max_x, max_y),
            });
        }

        let width = ceil_div(max_x, cell_size);
        let height = ceil_div(max_y, cell_size);
        let cell_count = match width.checked_mul(height) {
            Some(count) if count <= MAX_GRID_CELLS => count,
            _ => {
                return Err(DomainError::InvalidConfiguration {
                    reason: format!(
                        "{}x{} grid exceeds the limit of {} cells; use a larger cell size",
                        width, height, MAX_GRID_CELLS
                    ),
                });
            }
        };
        let mut grid = Self {
            width,
            height,
            cell_size,
            cells: vec![CellState::Traversable; cell_count],
        };

        for area in areas.iter().filter(|a| policy.blocks(a.kind)) {
            let bounds = &area.area;
            let Some((x0, x1)) = covered_span(bounds.min_x(), bounds.max_x(), cell_size, width)
            else {
                continue;
            };
            let Some((y0, y1)) = covered_span(bounds.min_y(), bounds.max_y(), cell_size, height)
            else {
                continue;
            };
            for y in y0..=y1 {
                for x in x0..=x1 {
                    grid.cells[y * width + x] = CellState::Blocked;
                }
            }
        }

        debug!(
            width,
            height,
            cell_size,
            blocked = grid.blocked_count(),
            "built occupancy grid from {} areas",
            areas.len()
        );
        Ok(grid)
    }

    /// Build a grid from text rows: `.` is traversable, `#` is blocked.
    pub fn from_rows(rows: &[&str], cell_size: i32) -> DomainResult<Self> {
        if cell_size <= 0 {
            return Err(DomainError::InvalidConfiguration {
                reason: format!("cell size must be positive, got {}", cell_size),
            });
        }
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width == 0 {
            return Err(DomainError::InvalidConfiguration {
                reason: "grid fixture has no cells".to_string(),
            });
        }

        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_idx, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(DomainError::InvalidConfiguration {
                    reason: format!("row {} has a different width than row 0", row_idx),
                });
            }
            for ch in row.chars() {
                cells.push(match ch {
                    '.' => CellState::Traversable,
                    '#' => CellState::Blocked,
                    other => {
                        return Err(DomainError::InvalidConfiguration {
                            reason: format!(
                                "unexpected grid character {:?} in row {}",
                                other, row_idx
                            ),
                        })
                    }
                });
            }
        }

        Ok(Self {
            width,
            height: rows.len(),
            cell_size,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as usize) < self.width
            && (cell.y as usize) < self.height
    }

    pub fn state(&self, cell: GridCell) -> Option<CellState> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// In bounds and not blocked.
    pub fn is_traversable(&self, cell: GridCell) -> bool {
        self.state(cell) == Some(CellState::Traversable)
    }

    pub fn blocked_count(&self) -> usize {
        self.cells.iter().filter(|c| **c == CellState::Blocked).count()
    }

    pub(crate) fn index(&self, cell: GridCell) -> Option<usize> {
        if self.contains(cell) {
            Some(cell.y as usize * self.width + cell.x as usize)
        } else {
            None
        }
    }

    pub(crate) fn cell_at(&self, index: usize) -> GridCell {
        GridCell::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Map a world position to its nominal cell, truncating toward zero.
    /// The result may lie outside the grid.
    pub fn world_to_cell(&self, position: Position2D) -> GridCell {
        let size = self.cell_size as f64;
        GridCell::new(
            (position.x / size).trunc() as i32,
            (position.y / size).trunc() as i32,
        )
    }

    /// Text view of the square window around `center` (`#` blocked, `.` free,
    /// space outside the grid).
    pub fn render_window(&self, center: GridCell, radius: i32) -> String {
        let mut lines = Vec::new();
        for dy in -radius..=radius {
            let line: String = (-radius..=radius)
                .map(|dx| match self.state(center.offset(dx, dy)) {
                    Some(CellState::Traversable) => '.',
                    Some(CellState::Blocked) => '#',
                    None => ' ',
                })
                .collect();
            lines.push(line);
        }
        lines.join("\n")
    }
}

fn ceil_div(extent: i32, cell_size: i32) -> usize {
    ((extent as i64 + cell_size as i64 - 1) / cell_size as i64) as usize
}

/// Inclusive cell range overlapped by `[lo, hi)`, clipped to `0..cells`.
fn covered_span(lo: i32, hi: i32, cell_size: i32, cells: usize) -> Option<(usize, usize)> {
    let first = lo.div_euclid(cell_size);
    let last = if hi > lo { (hi - 1).div_euclid(cell_size) } else { first };
    let first = first.max(0);
    let last = last.min(cells as i32 - 1);
    if first > last {
        None
    } else {
        Some((first as usize, last as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covered_span_is_half_open() {
        // [0, 50) touches only cell 0 at size 50
        assert_eq!(covered_span(0, 50, 50, 4), Some((0, 0)));
        assert_eq!(covered_span(0, 51, 50, 4), Some((0, 1)));
        assert_eq!(covered_span(49, 49, 50, 4), Some((0, 0)));
    }

    #[test]
    fn covered_span_clips_to_grid() {
        assert_eq!(covered_span(-120, 10, 50, 4), Some((0, 0)));
        assert_eq!(covered_span(-120, -60, 50, 4), None);
        assert_eq!(covered_span(150, 900, 50, 4), Some((3, 3)));
        assert_eq!(covered_span(200, 300, 50, 4), None);
    }
}
