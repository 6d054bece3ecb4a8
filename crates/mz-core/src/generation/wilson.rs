//! Wilson-style loop-erased random walks
//!
//! The growing maze is tracked with [`CellState::Marked`]; walk cells are
//! [`CellState::Corridor`] until the walk either joins the maze (and is
//! marked) or fails (and is reverted to wall).

use serde::{Deserialize, Serialize};

use super::{GenerationStrategy, random_interior};
use crate::dungeon::{CARDINALS, CellState, Grid, Location};
use crate::rng::DungeonRng;
use crate::{WILSON_MAX_TRIES, WILSON_STEP_RETRIES};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WilsonLoopErasedWalk {
    /// Failed direction picks allowed before a walk is abandoned
    pub step_retries: u32,
    /// Total walks attempted before giving up on the remaining cells
    pub max_tries: u32,
}

impl Default for WilsonLoopErasedWalk {
    fn default() -> Self {
        Self {
            step_retries: WILSON_STEP_RETRIES,
            max_tries: WILSON_MAX_TRIES,
        }
    }
}

/// Wall cells with no corridor or maze next to them
fn available_cells(grid: &Grid) -> Vec<Location> {
    grid.locations()
        .filter(|loc| {
            grid.is_inside(*loc)
                && grid.state(*loc) == CellState::Wall
                && grid.cross_count(*loc, CellState::Corridor) == 0
                && grid.cross_count(*loc, CellState::Marked) == 0
        })
        .collect()
}

impl WilsonLoopErasedWalk {
    /// Walk from `start` until the maze is touched. Returns true if the walk
    /// joined the maze at exactly one point.
    fn walk<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R, start: Location) -> bool {
        let mut pos = start;
        let mut path = vec![start];
        grid.set(start, CellState::Corridor);

        let mut joined = false;
        let mut retry = 0;
        while retry < self.step_retries {
            let dir = CARDINALS[rng.range(0, CARDINALS.len() as i32) as usize];
            retry += 1;

            let next = pos + dir;
            if grid.is_inside(next)
                && grid.state(next) == CellState::Wall
                && grid.cross_count(next, CellState::Corridor) < 2
            {
                pos = next;
                retry = 0;
                grid.set(pos, CellState::Corridor);
                path.push(pos);
            }

            match grid.cross_count(pos, CellState::Marked) {
                0 => {}
                1 => {
                    joined = true;
                    break;
                }
                _ => break,
            }
        }

        let state = if joined {
            CellState::Marked
        } else {
            CellState::Wall
        };
        for loc in path {
            grid.set(loc, state);
        }
        joined
    }
}

impl GenerationStrategy for WilsonLoopErasedWalk {
    fn name(&self) -> &'static str {
        "wilson_loop_erased_walk"
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        let seed = random_interior(grid, rng);
        grid.set(seed, CellState::Marked);

        let mut tries = 0;
        let mut joined = 0;
        while tries < self.max_tries {
            let available = available_cells(grid);
            if available.len() < 2 {
                break;
            }
            let Some(&start) = rng.choose(&available) else {
                break;
            };
            if self.walk(grid, rng, start) {
                joined += 1;
            }
            tries += 1;
        }
        log::debug!("wilson: {joined} of {tries} walks joined the maze");
    }
}
