//! Independent per-cell fill

use serde::{Deserialize, Serialize};

use super::GenerationStrategy;
use crate::FILL_PERCENT;
use crate::dungeon::{Grid, Location};
use crate::rng::DungeonRng;

/// Opens each interior cell with a fixed probability
///
/// No connectivity guarantee; the connectivity pass is expected to fix up
/// the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniformRandomFill {
    pub fill_percent: u8,
}

impl Default for UniformRandomFill {
    fn default() -> Self {
        Self {
            fill_percent: FILL_PERCENT,
        }
    }
}

impl GenerationStrategy for UniformRandomFill {
    fn name(&self) -> &'static str {
        "uniform_random_fill"
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        for x in 1..grid.width() - 1 {
            for z in 1..grid.height() - 1 {
                if rng.percent(self.fill_percent) {
                    grid.carve(Location::new(x, z));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::CellState;
    use crate::rng::{GameRng, SequenceRng};

    #[test]
    fn test_full_and_empty_fill() {
        let mut grid = Grid::new(6, 5).unwrap();
        let mut rng = GameRng::new(1);
        UniformRandomFill { fill_percent: 100 }.generate(&mut grid, &mut rng);
        assert_eq!(grid.count(CellState::Corridor), 4 * 3);

        let mut grid = Grid::new(6, 5).unwrap();
        UniformRandomFill { fill_percent: 0 }.generate(&mut grid, &mut rng);
        assert_eq!(grid.count(CellState::Corridor), 0);
    }

    #[test]
    fn test_scripted_fill() {
        // 10 < 50 opens, 90 does not
        let mut rng = SequenceRng::new(vec![10, 90]);
        let mut grid = Grid::new(4, 4).unwrap();
        UniformRandomFill::default().generate(&mut grid, &mut rng);
        assert_eq!(grid.state(Location::new(1, 1)), CellState::Corridor);
        assert_eq!(grid.state(Location::new(1, 2)), CellState::Wall);
        assert_eq!(grid.state(Location::new(2, 1)), CellState::Corridor);
        assert_eq!(grid.state(Location::new(2, 2)), CellState::Wall);
    }
}
