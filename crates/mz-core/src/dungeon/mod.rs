//! Levels and the multi-level dungeon built from them

mod connectivity;
mod grid;
mod level;
mod pathfind;
mod piece;
mod room;
mod stitch;

pub use connectivity::{
    ConnectivityMode, ConnectivityReport, Edge, EdgeStatus, carve_path, dig_from_edges,
    dig_from_edges_within,
};
pub use grid::{CARDINALS, CellState, Grid, Location, NEIGHBOR_OFFSETS};
pub(crate) use grid::check_max_size;
pub use level::Level;
pub use pathfind::{PathFinder, PathMarker, PathTrace, find_path};
pub use piece::{Piece, PieceType, classify};
pub use room::{Room, add_rooms, validate_room_size};
pub use stitch::{LevelStitcher, Stair, StitchOutcome, StitchReport, apply_offsets};

use serde::Serialize;

use crate::config::DungeonConfig;
use crate::error::GenerationError;
use crate::render::PieceRenderer;
use crate::rng::DungeonRng;

/// Every level, bottom first, and how each pair was stitched
#[derive(Debug, Clone, Serialize)]
pub struct Dungeon {
    pub levels: Vec<Level>,
    pub stitches: Vec<StitchReport>,
}

impl Dungeon {
    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    /// Total staircases built across all pairs
    pub fn stair_count(&self) -> usize {
        self.stitches.iter().map(|s| s.outcome.stairs().len()).sum()
    }

    /// Pairs of levels left without a staircase
    pub fn disconnected_pairs(&self) -> Vec<(usize, usize)> {
        self.stitches
            .iter()
            .filter(|s| !s.outcome.is_connected())
            .map(|s| (s.lower, s.upper))
            .collect()
    }
}

/// Generate every level in order, then stitch them together
///
/// A level whose generation fails for a reason that a new random draw could
/// fix is retried up to `max_attempts` times.
pub fn build_dungeon<R: DungeonRng, P: PieceRenderer>(
    config: &DungeonConfig,
    rng: &mut R,
    renderer: &mut P,
) -> Result<Dungeon, GenerationError> {
    config.validate()?;
    let max_attempts = config.max_attempts.max(1);

    let mut levels = Vec::with_capacity(config.levels.len());
    for (index, level_config) in config.levels.iter().enumerate() {
        let mut attempt = 1;
        let level = loop {
            match Level::generate(level_config, rng, renderer) {
                Ok(level) => break level,
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    log::warn!("level {index}: attempt {attempt} failed: {err}");
                    attempt += 1;
                }
                Err(err) if err.is_retryable() => {
                    return Err(GenerationError::Exhausted {
                        level: index,
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                Err(err) => return Err(err),
            }
        };
        levels.push(level);
    }

    let stitches = LevelStitcher::new(rng, renderer).connect_levels(&mut levels);
    Ok(Dungeon { levels, stitches })
}
