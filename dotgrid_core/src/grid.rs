use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer cell position. Negative or oversized values are representable so
/// callers can pass raw shape data; bounds are checked against a [`GridSize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    pub x: i32,
    pub y: i32,
}

impl GridCoord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two cell centres.
    pub fn distance_to(self, other: GridCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn distance_to_point(self, point: (f32, f32)) -> f32 {
        let dx = self.x as f32 - point.0;
        let dy = self.y as f32 - point.1;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for GridCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<[i32; 2]> for GridCoord {
    fn from([x, y]: [i32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for GridCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Unordered, duplicate-free collection of cells. Iteration is ordered by
/// `(x, y)` so results are reproducible.
pub type PositionSet = BTreeSet<GridCoord>;

/// Collect anything coordinate-like into a [`PositionSet`].
pub fn position_set<I, C>(cells: I) -> PositionSet
where
    I: IntoIterator<Item = C>,
    C: Into<GridCoord>,
{
    cells.into_iter().map(Into::into).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    #[inline]
    pub fn contains(&self, cell: GridCoord) -> bool {
        cell.x >= 0
            && cell.y >= 0
            && (cell.x as i64) < self.width as i64
            && (cell.y as i64) < self.height as i64
    }

    pub fn area(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Every cell of the grid, row by row.
    pub fn cells(&self) -> impl Iterator<Item = GridCoord> {
        let width = self.width.min(i32::MAX as u32) as i32;
        let height = self.height.min(i32::MAX as u32) as i32;
        (0..height).flat_map(move |y| (0..width).map(move |x| GridCoord::new(x, y)))
    }
}

/// Arithmetic mean of the set. An empty set has its centroid at the origin.
pub fn centroid(cells: &PositionSet) -> (f32, f32) {
    if cells.is_empty() {
        return (0.0, 0.0);
    }
    let (sum_x, sum_y) = cells.iter().fold((0.0f64, 0.0f64), |(sx, sy), cell| {
        (sx + cell.x as f64, sy + cell.y as f64)
    });
    let count = cells.len() as f64;
    ((sum_x / count) as f32, (sum_y / count) as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_rejects_negative_and_overflowing_cells() {
        let grid = GridSize::square(5);
        assert!(grid.contains(GridCoord::new(0, 0)));
        assert!(grid.contains(GridCoord::new(4, 4)));
        assert!(!grid.contains(GridCoord::new(-1, 2)));
        assert!(!grid.contains(GridCoord::new(5, 0)));
        assert!(!GridSize::square(0).contains(GridCoord::new(0, 0)));
    }

    #[test]
    fn cells_walks_every_position_once() {
        let grid = GridSize::new(3, 2);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), grid.area());
        assert_eq!(cells[0], GridCoord::new(0, 0));
        assert_eq!(cells[3], GridCoord::new(0, 1));
    }

    #[test]
    fn centroid_of_empty_set_is_origin() {
        assert_eq!(centroid(&PositionSet::new()), (0.0, 0.0));
    }

    #[test]
    fn centroid_is_mean_position() {
        let cells = position_set([(0, 0), (2, 0), (2, 4)]);
        let (cx, cy) = centroid(&cells);
        assert!((cx - 4.0 / 3.0).abs() < 1e-6);
        assert!((cy - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn diagonal_distance_is_euclidean() {
        let d = GridCoord::new(0, 0).distance_to(GridCoord::new(1, 1));
        assert!((d - std::f32::consts::SQRT_2).abs() < 1e-6);
    }
}
