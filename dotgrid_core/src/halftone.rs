//! Halftone engine: expands the full cells of a frame into mid cells.
//!
//! Every strategy is a pure function of its inputs. The only state carried
//! between frames is the caller's [`FrameHistory`], which the engine reads but
//! never appends to.

use crate::grid::{centroid, GridCoord, GridSize, PositionSet};
use crate::neighbors::neighbors_of_set;
use crate::state_map::StateMap;
use crate::strategy::{GradientDirection, HalftoneError, HalftoneStrategy};

/// Upper bound on how many past frames a trail may draw from.
pub const MAX_TRAIL_FRAMES: usize = 10;

/// Build the state map for one frame.
///
/// `frame_history` holds earlier frames, most recent first, and must not
/// contain the current frame. Only the trail strategy reads it.
pub fn generate_halftone_states(
    full_positions: &PositionSet,
    strategy: &HalftoneStrategy,
    grid: GridSize,
    frame_history: &[PositionSet],
) -> Result<StateMap, HalftoneError> {
    strategy.validate()?;

    // Only in-bounds cells are seeded, but every full position still drives
    // the strategies; the merge clips whatever lands outside the grid.
    let mut states = StateMap::with_full(full_positions, grid);
    if full_positions.is_empty() {
        return Ok(states);
    }

    let full = full_positions;
    let candidates = match *strategy {
        HalftoneStrategy::Neighbors {
            orthogonal_only,
            distance,
        } => neighbors_of_set(full, grid, distance, orthogonal_only),
        HalftoneStrategy::Trail { length } => trail_candidates(full, length, frame_history),
        HalftoneStrategy::Distance { radius } => distance_candidates(full, radius, grid),
        HalftoneStrategy::Gradient { direction } => gradient_candidates(full, direction, grid),
    };
    let mid = states.merge_mid(&candidates, grid);

    tracing::debug!(
        target: "dotgrid::halftone",
        strategy = strategy.kind(),
        full = full.len(),
        mid,
        width = grid.width,
        height = grid.height,
        "halftone.generated"
    );
    Ok(states)
}

fn trail_candidates(
    full: &PositionSet,
    length: usize,
    frame_history: &[PositionSet],
) -> PositionSet {
    let frames = length.min(MAX_TRAIL_FRAMES).min(frame_history.len());
    frame_history[..frames]
        .iter()
        .flat_map(|frame| frame.iter().copied())
        .filter(|cell| !full.contains(cell))
        .collect()
}

fn distance_candidates(full: &PositionSet, radius: f32, grid: GridSize) -> PositionSet {
    grid.cells()
        .filter(|cell| !full.contains(cell))
        .filter(|cell| {
            let nearest = full
                .iter()
                .map(|target| cell.distance_to(*target))
                .fold(f32::INFINITY, f32::min);
            nearest > 0.0 && nearest <= radius
        })
        .collect()
}

/// A neighbour qualifies when at least one full cell sits nearer to (outward)
/// or further from (inward) the centroid than the neighbour does.
fn gradient_candidates(
    full: &PositionSet,
    direction: GradientDirection,
    grid: GridSize,
) -> PositionSet {
    let center = centroid(full);
    let (nearest_full, furthest_full) = full
        .iter()
        .map(|cell| cell.distance_to_point(center))
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        });

    neighbors_of_set(full, grid, 1, false)
        .into_iter()
        .filter(|cell: &GridCoord| {
            let d = cell.distance_to_point(center);
            match direction {
                GradientDirection::Outward => nearest_full < d,
                GradientDirection::Inward => furthest_full > d,
            }
        })
        .collect()
}

/// Caller-owned record of recent frames for the trail strategy, most recent
/// first. Record a frame after generating its state map.
#[derive(Debug, Clone)]
pub struct FrameHistory {
    frames: Vec<PositionSet>,
    capacity: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::with_capacity(MAX_TRAIL_FRAMES)
    }
}

impl FrameHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record(&mut self, frame: PositionSet) {
        self.frames.insert(0, frame);
        self.frames.truncate(self.capacity);
    }

    pub fn frames(&self) -> &[PositionSet] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::position_set;
    use crate::state_map::DotState;

    fn halo(orthogonal_only: bool, distance: u32) -> HalftoneStrategy {
        HalftoneStrategy::Neighbors {
            orthogonal_only,
            distance,
        }
    }

    #[test]
    fn single_interior_cell_gets_eight_neighbors() {
        let full = position_set([(2, 2)]);
        let grid = GridSize::square(5);
        let states = generate_halftone_states(&full, &halo(false, 1), grid, &[]).unwrap();

        assert_eq!(states.state_at(GridCoord::new(2, 2)), DotState::Full);
        let mid = states.mid_cells();
        assert_eq!(mid.len(), 8);
        for y in 1..=3 {
            for x in 1..=3 {
                if (x, y) != (2, 2) {
                    assert!(mid.contains(&GridCoord::new(x, y)));
                }
            }
        }
        assert_eq!(states.len(), 9);
        insta::assert_snapshot!(states.render(grid), @r"
        .....
        .+++.
        .+#+.
        .+++.
        .....
        ");
    }

    #[test]
    fn orthogonal_halo_has_four_cells() {
        let full = position_set([(2, 2)]);
        let states =
            generate_halftone_states(&full, &halo(true, 1), GridSize::square(5), &[]).unwrap();
        assert_eq!(
            states.mid_cells(),
            position_set([(2, 1), (1, 2), (3, 2), (2, 3)])
        );
    }

    #[test]
    fn empty_shape_yields_empty_map_for_every_strategy() {
        let history = vec![position_set([(1, 1)])];
        let strategies = [
            halo(false, 2),
            HalftoneStrategy::Trail { length: 3 },
            HalftoneStrategy::Distance { radius: 2.0 },
            HalftoneStrategy::Gradient {
                direction: GradientDirection::Inward,
            },
        ];
        for strategy in strategies {
            let states = generate_halftone_states(
                &PositionSet::new(),
                &strategy,
                GridSize::square(5),
                &history,
            )
            .unwrap();
            assert!(states.is_empty(), "{strategy} produced cells for an empty shape");
        }
    }

    #[test]
    fn out_of_bounds_full_cells_still_project_into_grid() {
        let grid = GridSize::square(5);
        let full = position_set([(-1, 0), (2, 2)]);
        let states = generate_halftone_states(&full, &halo(false, 1), grid, &[]).unwrap();

        assert_eq!(states.full_cells(), position_set([(2, 2)]));
        assert_eq!(states.state_at(GridCoord::new(-1, 0)), DotState::Empty);
        let mid = states.mid_cells();
        assert!(mid.contains(&GridCoord::new(0, 0)));
        assert!(mid.contains(&GridCoord::new(0, 1)));
        assert_eq!(mid.len(), 10);
        assert!(mid.iter().all(|cell| grid.contains(*cell)));
    }

    #[test]
    fn out_of_bounds_full_cell_counts_for_distance() {
        let grid = GridSize::square(5);
        let full = position_set([(-1, 0)]);
        let states = generate_halftone_states(
            &full,
            &HalftoneStrategy::Distance { radius: 1.5 },
            grid,
            &[],
        )
        .unwrap();
        assert!(states.full_cells().is_empty());
        assert_eq!(states.mid_cells(), position_set([(0, 0), (0, 1)]));
    }

    #[test]
    fn far_out_of_bounds_full_cells_leave_grid_untouched() {
        let full = position_set([(-3, 0), (9, 9)]);
        let states =
            generate_halftone_states(&full, &halo(false, 1), GridSize::square(5), &[]).unwrap();
        assert!(states.is_empty());
    }

    #[test]
    fn out_of_bounds_full_cell_shifts_gradient_centroid() {
        // Centroid of (-2, 2) and (2, 2) is (0, 2). Without the off-grid cell
        // the centroid would sit on (2, 2) and inward would add nothing.
        let grid = GridSize::square(5);
        let full = position_set([(-2, 2), (2, 2)]);
        let states = generate_halftone_states(
            &full,
            &HalftoneStrategy::Gradient {
                direction: GradientDirection::Inward,
            },
            grid,
            &[],
        )
        .unwrap();
        assert_eq!(states.mid_cells(), position_set([(1, 1), (1, 2), (1, 3)]));
    }

    #[test]
    fn invalid_parameters_are_reported() {
        let full = position_set([(1, 1)]);
        let err = generate_halftone_states(
            &full,
            &HalftoneStrategy::Distance { radius: 0.0 },
            GridSize::square(3),
            &[],
        )
        .unwrap_err();
        assert!(matches!(err, HalftoneError::InvalidParameter { parameter: "radius", .. }));
    }

    #[test]
    fn trail_uses_recent_frames_only() {
        let full = position_set([(0, 0)]);
        let history = vec![
            position_set([(1, 0), (0, 0)]),
            position_set([(2, 0)]),
            position_set([(3, 0)]),
        ];
        let states = generate_halftone_states(
            &full,
            &HalftoneStrategy::Trail { length: 2 },
            GridSize::square(5),
            &history,
        )
        .unwrap();
        assert_eq!(states.mid_cells(), position_set([(1, 0), (2, 0)]));
        assert_eq!(states.state_at(GridCoord::new(0, 0)), DotState::Full);
    }

    #[test]
    fn trail_with_zero_length_or_no_history_adds_nothing() {
        let full = position_set([(0, 0)]);
        let grid = GridSize::square(3);
        let history = vec![position_set([(1, 1)])];
        let zero =
            generate_halftone_states(&full, &HalftoneStrategy::Trail { length: 0 }, grid, &history)
                .unwrap();
        assert!(zero.mid_cells().is_empty());
        let none = generate_halftone_states(&full, &HalftoneStrategy::Trail { length: 5 }, grid, &[])
            .unwrap();
        assert!(none.mid_cells().is_empty());
    }

    #[test]
    fn trail_never_reads_past_ten_frames() {
        let full = position_set([(0, 0)]);
        let grid = GridSize::new(20, 1);
        let history: Vec<PositionSet> = (1..=15).map(|x| position_set([(x, 0)])).collect();
        let capped = generate_halftone_states(
            &full,
            &HalftoneStrategy::Trail { length: 50 },
            grid,
            &history,
        )
        .unwrap();
        let exact = generate_halftone_states(
            &full,
            &HalftoneStrategy::Trail { length: 50 },
            grid,
            &history[..MAX_TRAIL_FRAMES],
        )
        .unwrap();
        assert_eq!(capped, exact);
        assert_eq!(capped.mid_cells().len(), MAX_TRAIL_FRAMES);
    }

    #[test]
    fn distance_radius_one_matches_orthogonal_halo() {
        let full = position_set([(2, 2)]);
        let grid = GridSize::square(5);
        let by_distance =
            generate_halftone_states(&full, &HalftoneStrategy::Distance { radius: 1.0 }, grid, &[])
                .unwrap();
        let by_neighbors = generate_halftone_states(&full, &halo(true, 1), grid, &[]).unwrap();
        assert_eq!(by_distance, by_neighbors);
    }

    #[test]
    fn distance_grows_monotonically_with_radius() {
        let full = position_set([(1, 1), (3, 2)]);
        let grid = GridSize::square(5);
        let mut previous = PositionSet::new();
        for radius in [0.5, 1.0, 1.5, 2.0, 3.0, 6.0] {
            let strategy = HalftoneStrategy::Distance { radius };
            let mid = generate_halftone_states(&full, &strategy, grid, &[])
                .unwrap()
                .mid_cells();
            assert!(previous.is_subset(&mid), "radius {radius} dropped cells");
            previous = mid;
        }
        assert_eq!(previous.len(), grid.area() - full.len());
    }

    #[test]
    fn gradient_outward_from_single_cell_is_full_halo() {
        let full = position_set([(2, 2)]);
        let grid = GridSize::square(5);
        let outward = generate_halftone_states(
            &full,
            &HalftoneStrategy::Gradient {
                direction: GradientDirection::Outward,
            },
            grid,
            &[],
        )
        .unwrap();
        assert_eq!(outward.mid_cells().len(), 8);

        let inward = generate_halftone_states(
            &full,
            &HalftoneStrategy::Gradient {
                direction: GradientDirection::Inward,
            },
            grid,
            &[],
        )
        .unwrap();
        assert!(inward.mid_cells().is_empty());
    }

    #[test]
    fn gradient_inward_fills_ring_center() {
        // Ring around (2, 2): the centre is the only neighbour closer to the
        // centroid than some ring cell.
        let ring = position_set([
            (1, 1),
            (2, 1),
            (3, 1),
            (1, 2),
            (3, 2),
            (1, 3),
            (2, 3),
            (3, 3),
        ]);
        let grid = GridSize::square(5);
        let inward = generate_halftone_states(
            &ring,
            &HalftoneStrategy::Gradient {
                direction: GradientDirection::Inward,
            },
            grid,
            &[],
        )
        .unwrap();
        assert_eq!(inward.mid_cells(), position_set([(2, 2)]));

        let outward = generate_halftone_states(
            &ring,
            &HalftoneStrategy::Gradient {
                direction: GradientDirection::Outward,
            },
            grid,
            &[],
        )
        .unwrap();
        assert_eq!(outward.mid_cells().len(), 16);
        assert!(!outward.mid_cells().contains(&GridCoord::new(2, 2)));
    }

    #[test]
    fn frame_history_keeps_most_recent_first() {
        let mut history = FrameHistory::with_capacity(2);
        history.record(position_set([(0, 0)]));
        history.record(position_set([(1, 0)]));
        history.record(position_set([(2, 0)]));
        assert_eq!(history.len(), 2);
        assert_eq!(history.frames()[0], position_set([(2, 0)]));
        assert_eq!(history.frames()[1], position_set([(1, 0)]));
    }
}
