//! Randomised Prim's algorithm

use super::{GenerationStrategy, random_interior};
use crate::dungeon::{CellState, Grid};
use crate::rng::DungeonRng;

/// Grows a maze from one cell by opening random frontier walls
///
/// A frontier cell is opened only if exactly one of its cardinal neighbours
/// is already corridor, so the maze never closes a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrimFrontier;

impl GenerationStrategy for PrimFrontier {
    fn name(&self) -> &'static str {
        "prim_frontier"
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        let start = random_interior(grid, rng);
        grid.carve(start);
        let mut frontier = start.cardinal_neighbors().to_vec();

        while !frontier.is_empty() {
            let index = rng.range(0, frontier.len() as i32) as usize;
            let cell = frontier.remove(index);

            if grid.is_inside(cell)
                && grid.state(cell) == CellState::Wall
                && grid.cross_count(cell, CellState::Corridor) == 1
            {
                grid.carve(cell);
                frontier.extend(cell.cardinal_neighbors());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::Location;
    use crate::rng::GameRng;

    #[test]
    fn test_prim_builds_a_tree() {
        let mut grid = Grid::new(17, 13).unwrap();
        let mut rng = GameRng::new(9);
        PrimFrontier.generate(&mut grid, &mut rng);

        let open = grid.open_cells();
        assert!(open.len() > 1);
        // A tree on a 4-connected grid has exactly one edge fewer than nodes
        let edges: usize = open
            .iter()
            .map(|loc| {
                [Location::new(1, 0), Location::new(0, 1)]
                    .iter()
                    .filter(|d| grid.is_open(*loc + **d))
                    .count()
            })
            .sum();
        assert_eq!(edges, open.len() - 1);
    }
}
