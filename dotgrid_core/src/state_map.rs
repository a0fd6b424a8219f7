use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::grid::{GridCoord, GridSize, PositionSet};
use crate::neighbors::neighbors_of_set;

/// Per-cell intensity, ordered by visual priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DotState {
    #[default]
    Empty,
    Mid,
    Full,
}

impl DotState {
    pub fn glyph(self) -> char {
        match self {
            DotState::Full => '#',
            DotState::Mid => '+',
            DotState::Empty => '.',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEntry {
    pub x: i32,
    pub y: i32,
    pub state: DotState,
}

/// Final cell states for one frame. Only full and mid cells are stored; any
/// coordinate missing from the map is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateMap {
    cells: BTreeMap<GridCoord, DotState>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a map with every in-bounds position marked full.
    pub fn with_full<'a, I>(positions: I, grid: GridSize) -> Self
    where
        I: IntoIterator<Item = &'a GridCoord>,
    {
        let mut map = Self::new();
        map.mark_full(positions, grid);
        map
    }

    pub fn mark_full<'a, I>(&mut self, positions: I, grid: GridSize)
    where
        I: IntoIterator<Item = &'a GridCoord>,
    {
        for &cell in positions {
            if grid.contains(cell) {
                self.cells.insert(cell, DotState::Full);
            }
        }
    }

    /// Mark candidates as mid unless they are out of bounds or already full.
    /// Returns how many cells became mid.
    pub fn merge_mid<'a, I>(&mut self, candidates: I, grid: GridSize) -> usize
    where
        I: IntoIterator<Item = &'a GridCoord>,
    {
        let mut added = 0;
        for &cell in candidates {
            if !grid.contains(cell) {
                continue;
            }
            let state = self.cells.entry(cell).or_insert(DotState::Empty);
            if *state == DotState::Empty {
                *state = DotState::Mid;
                added += 1;
            }
        }
        added
    }

    pub fn state_at(&self, cell: GridCoord) -> DotState {
        self.cells.get(&cell).copied().unwrap_or_default()
    }

    pub fn full_cells(&self) -> PositionSet {
        self.cells_in(DotState::Full)
    }

    pub fn mid_cells(&self) -> PositionSet {
        self.cells_in(DotState::Mid)
    }

    fn cells_in(&self, wanted: DotState) -> PositionSet {
        self.cells
            .iter()
            .filter(|(_, state)| **state == wanted)
            .map(|(&cell, _)| cell)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GridCoord, DotState)> + '_ {
        self.cells.iter().map(|(&cell, &state)| (cell, state))
    }

    pub fn entries(&self) -> Vec<StateEntry> {
        self.iter()
            .map(|(cell, state)| StateEntry {
                x: cell.x,
                y: cell.y,
                state,
            })
            .collect()
    }

    /// Debug rendering, one text row per grid row, rows joined by newlines.
    pub fn render(&self, grid: GridSize) -> String {
        let mut out = String::with_capacity(grid.area() + grid.height as usize);
        for y in 0..grid.height as i32 {
            if y > 0 {
                out.push('\n');
            }
            for x in 0..grid.width as i32 {
                out.push(self.state_at(GridCoord::new(x, y)).glyph());
            }
        }
        out
    }
}

/// Full cells plus a one-cell, all-direction halo of mid cells. Used for path
/// sources such as usage series that do not pick a strategy.
pub fn halo_state_map(positions: &PositionSet, grid: GridSize) -> StateMap {
    let mut map = StateMap::with_full(positions, grid);
    let halo = neighbors_of_set(positions, grid, 1, false);
    map.merge_mid(&halo, grid);
    map
}
