use crate::grid::{GridCoord, GridSize, PositionSet};

/// Cells within `max_distance` of `cell` (Chebyshev window), clipped to the
/// grid. With `orthogonal_only` only offsets along a single axis are kept.
/// The cell itself is never part of the result.
pub fn neighbors_of(
    cell: GridCoord,
    grid: GridSize,
    max_distance: u32,
    orthogonal_only: bool,
) -> PositionSet {
    let mut result = PositionSet::new();
    if grid.is_empty() {
        return result;
    }
    // Clip the offset window to the grid up front so large distances stay cheap.
    let reach = max_distance.min(i32::MAX as u32) as i64;
    let (x, y) = (cell.x as i64, cell.y as i64);
    let dx_range = (-reach).max(-x)..=reach.min(grid.width as i64 - 1 - x);
    let dy_range = (-reach).max(-y)..=reach.min(grid.height as i64 - 1 - y);
    for dy in dy_range {
        for dx in dx_range.clone() {
            if dx == 0 && dy == 0 {
                continue;
            }
            if orthogonal_only && dx != 0 && dy != 0 {
                continue;
            }
            let candidate = GridCoord::new((x + dx) as i32, (y + dy) as i32);
            if grid.contains(candidate) {
                result.insert(candidate);
            }
        }
    }
    result
}

/// Union of [`neighbors_of`] over every cell in `cells`, minus the cells
/// themselves.
pub fn neighbors_of_set(
    cells: &PositionSet,
    grid: GridSize,
    max_distance: u32,
    orthogonal_only: bool,
) -> PositionSet {
    let mut result = PositionSet::new();
    for &cell in cells {
        result.extend(
            neighbors_of(cell, grid, max_distance, orthogonal_only)
                .into_iter()
                .filter(|candidate| !cells.contains(candidate)),
        );
    }
    result
}
