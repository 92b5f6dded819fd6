//! A* search over the occupancy grid.
//!
//! Unit step cost, 4-connected moves and the Manhattan heuristic, which is
//! admissible and consistent here, so the first time the goal leaves the
//! frontier its path is a shortest one.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::{debug, trace};

use crate::common::{DomainError, DomainResult};
use crate::domains::routing::grid::OccupancyGrid;
use crate::domains::routing::types::GridCell;

/// Expansion order of neighbours: down, right, left, up.
pub const SEARCH_NEIGHBOURS: [(i32, i32); 4] = [(0, 1), (1, 0), (-1, 0), (0, -1)];

/// Frontier entry. The parent is the expanded cell that discovered this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchNode {
    f_cost: u32,
    g_cost: u32,
    cell: GridCell,
    parent: Option<GridCell>,
}

impl Ord for SearchNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour: lowest f, then lowest g, then lowest
        // (x, y) for the cell and finally for its parent
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.g_cost.cmp(&self.g_cost))
            .then_with(|| other.cell.cmp(&self.cell))
            .then_with(|| other.parent.cmp(&self.parent))
    }
}

impl PartialOrd for SearchNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a search. An empty path means the goal is not reachable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOutcome {
    pub path: Vec<GridCell>,
    pub nodes_expanded: usize,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of steps, one less than the number of cells.
    pub fn edge_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

fn check_endpoint(grid: &OccupancyGrid, cell: GridCell, role: &str) -> DomainResult<()> {
    if !grid.contains(cell) {
        return Err(DomainError::InvalidRequest {
            reason: format!(
                "{} {} is outside the {}x{} grid",
                role,
                cell,
                grid.width(),
                grid.height()
            ),
        });
    }
    if !grid.is_traversable(cell) {
        return Err(DomainError::InvalidRequest {
            reason: format!("{} {} is blocked", role, cell),
        });
    }
    Ok(())
}

/// Shortest 4-connected path from `start` to `goal`, both inclusive.
///
/// Both endpoints must be in bounds and traversable; goal repair is the
/// caller's job.
pub fn find_path(
    grid: &OccupancyGrid,
    start: GridCell,
    goal: GridCell,
) -> DomainResult<SearchOutcome> {
    check_endpoint(grid, start, "start")?;
    check_endpoint(grid, goal, "goal")?;

    let mut open_set = BinaryHeap::new();
    let mut visited = vec![false; grid.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];
    let mut nodes_expanded = 0;

    open_set.push(SearchNode {
        f_cost: start.manhattan(&goal),
        g_cost: 0,
        cell: start,
        parent: None,
    });

    while let Some(current) = open_set.pop() {
        let Some(index) = grid.index(current.cell) else {
            continue;
        };
        if visited[index] {
            continue;
        }
        visited[index] = true;
        came_from[index] = current.parent.and_then(|p| grid.index(p));
        nodes_expanded += 1;

        if current.cell == goal {
            let path = reconstruct_path(grid, &came_from, index);
            trace!(
                "path {} -> {}: {} cells, {} nodes expanded",
                start,
                goal,
                path.len(),
                nodes_expanded
            );
            return Ok(SearchOutcome { path, nodes_expanded });
        }

        for (dx, dy) in SEARCH_NEIGHBOURS {
            let next = current.cell.offset(dx, dy);
            let Some(next_index) = grid.index(next) else {
                continue;
            };
            if visited[next_index] || !grid.is_traversable(next) {
                continue;
            }
            let g_cost = current.g_cost + 1;
            open_set.push(SearchNode {
                f_cost: g_cost + next.manhattan(&goal),
                g_cost,
                cell: next,
                parent: Some(current.cell),
            });
        }
    }

    debug!(
        "no path {} -> {} after expanding {} nodes",
        start, goal, nodes_expanded
    );
    Ok(SearchOutcome {
        path: Vec::new(),
        nodes_expanded,
    })
}

fn reconstruct_path(
    grid: &OccupancyGrid,
    came_from: &[Option<usize>],
    goal_index: usize,
) -> Vec<GridCell> {
    let mut path = vec![grid.cell_at(goal_index)];
    let mut current = goal_index;
    while let Some(prev) = came_from[current] {
        path.push(grid.cell_at(prev));
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(f_cost: u32, g_cost: u32, x: i32, y: i32) -> SearchNode {
        SearchNode {
            f_cost,
            g_cost,
            cell: GridCell::new(x, y),
            parent: None,
        }
    }

    #[test]
    fn heap_pops_lowest_estimate_first() {
        let mut heap = BinaryHeap::new();
        heap.push(node(7, 1, 0, 0));
        heap.push(node(3, 1, 5, 5));
        heap.push(node(5, 1, 1, 1));
        assert_eq!(heap.pop().map(|n| n.f_cost), Some(3));
        assert_eq!(heap.pop().map(|n| n.f_cost), Some(5));
        assert_eq!(heap.pop().map(|n| n.f_cost), Some(7));
    }

    #[test]
    fn ties_prefer_lower_cost_then_lower_cell() {
        let mut heap = BinaryHeap::new();
        heap.push(node(4, 3, 0, 0));
        heap.push(node(4, 1, 2, 0));
        heap.push(node(4, 1, 1, 9));
        assert_eq!(heap.pop().map(|n| n.cell), Some(GridCell::new(1, 9)));
        assert_eq!(heap.pop().map(|n| n.cell), Some(GridCell::new(2, 0)));
        assert_eq!(heap.pop().map(|n| n.cell), Some(GridCell::new(0, 0)));
    }
}
