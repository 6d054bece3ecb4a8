//! Depth-first carving with an explicit stack

use super::{GenerationStrategy, random_interior};
use crate::dungeon::{CARDINALS, CellState, Grid, Location};
use crate::rng::DungeonRng;

/// Depth-first carve from a random interior cell
///
/// A cell is opened only while it is wall and touches fewer than two
/// corridors, which keeps passages one cell thick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecursiveBacktracker;

/// One cell on the walk, with its remaining directions
struct Frame {
    location: Location,
    directions: [Location; 4],
    next: usize,
}

impl Frame {
    fn new<R: DungeonRng>(location: Location, rng: &mut R) -> Self {
        let mut directions = CARDINALS;
        rng.shuffle(&mut directions);
        Self {
            location,
            directions,
            next: 0,
        }
    }
}

fn try_carve(grid: &mut Grid, loc: Location) -> bool {
    grid.is_inside(loc)
        && grid.state(loc) == CellState::Wall
        && grid.cross_count(loc, CellState::Corridor) < 2
        && grid.carve(loc)
}

impl GenerationStrategy for RecursiveBacktracker {
    fn name(&self) -> &'static str {
        "recursive_backtracker"
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        let start = random_interior(grid, rng);
        let mut stack = Vec::new();
        if try_carve(grid, start) {
            stack.push(Frame::new(start, rng));
        }

        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }
            let candidate = frame.location + frame.directions[frame.next];
            frame.next += 1;

            if try_carve(grid, candidate) {
                stack.push(Frame::new(candidate, rng));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::find_path;
    use crate::rng::GameRng;

    #[test]
    fn test_carved_cells_are_connected() {
        let mut grid = Grid::new(21, 15).unwrap();
        let mut rng = GameRng::new(42);
        RecursiveBacktracker.generate(&mut grid, &mut rng);

        let open = grid.open_cells();
        assert!(open.len() > 10);
        for target in open.iter().skip(1).step_by(7) {
            assert!(find_path(&grid, open[0], *target).is_ok());
        }
    }

    #[test]
    fn test_no_open_two_by_two_block() {
        let mut grid = Grid::new(21, 15).unwrap();
        let mut rng = GameRng::new(5);
        RecursiveBacktracker.generate(&mut grid, &mut rng);

        for x in 1..grid.width() - 2 {
            for z in 1..grid.height() - 2 {
                let block = [(0, 0), (1, 0), (0, 1), (1, 1)]
                    .iter()
                    .all(|(dx, dz)| grid.is_open(Location::new(x + dx, z + dz)));
                assert!(!block, "open block at ({x}, {z})");
            }
        }
    }
}
