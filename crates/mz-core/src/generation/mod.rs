//! Grid generation strategies
//!
//! Every strategy starts from an all-wall [`Grid`] and opens corridors in
//! its interior. The concrete variant is chosen through [`StrategyKind`],
//! which is what level configurations store.

mod backtracker;
mod crawler;
mod fill;
mod prim;
mod wilson;

pub use backtracker::RecursiveBacktracker;
pub use crawler::{BoundedCrawl, Crawler};
pub use fill::UniformRandomFill;
pub use prim::PrimFrontier;
pub use wilson::WilsonLoopErasedWalk;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::dungeon::{Grid, Location};
use crate::rng::DungeonRng;

/// Fills a blank grid with corridors
pub trait GenerationStrategy {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Open corridors in `grid`. Border cells are never written.
    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R);
}

/// Strategy selection as stored in a level configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StrategyKind {
    UniformRandomFill(UniformRandomFill),
    Crawler(Crawler),
    BoundedCrawl(BoundedCrawl),
    #[default]
    RecursiveBacktracker,
    PrimFrontier,
    WilsonLoopErasedWalk(WilsonLoopErasedWalk),
}

impl StrategyKind {
    /// Look up a strategy with default tunables by its snake_case name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|kind| kind.to_string() == name)
    }

    /// Names of every strategy
    pub fn names() -> Vec<String> {
        Self::iter().map(|kind| kind.to_string()).collect()
    }
}

impl GenerationStrategy for StrategyKind {
    fn name(&self) -> &'static str {
        match self {
            StrategyKind::UniformRandomFill(s) => s.name(),
            StrategyKind::Crawler(s) => s.name(),
            StrategyKind::BoundedCrawl(s) => s.name(),
            StrategyKind::RecursiveBacktracker => RecursiveBacktracker.name(),
            StrategyKind::PrimFrontier => PrimFrontier.name(),
            StrategyKind::WilsonLoopErasedWalk(s) => s.name(),
        }
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        match self {
            StrategyKind::UniformRandomFill(s) => s.generate(grid, rng),
            StrategyKind::Crawler(s) => s.generate(grid, rng),
            StrategyKind::BoundedCrawl(s) => s.generate(grid, rng),
            StrategyKind::RecursiveBacktracker => RecursiveBacktracker.generate(grid, rng),
            StrategyKind::PrimFrontier => PrimFrontier.generate(grid, rng),
            StrategyKind::WilsonLoopErasedWalk(s) => s.generate(grid, rng),
        }
    }
}

/// Uniform random interior cell
fn random_interior<R: DungeonRng>(grid: &Grid, rng: &mut R) -> Location {
    Location::new(
        rng.range(1, grid.width() - 1),
        rng.range(1, grid.height() - 1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::CellState;
    use crate::rng::GameRng;

    #[test]
    fn test_from_name() {
        assert_eq!(
            StrategyKind::from_name("prim_frontier"),
            Some(StrategyKind::PrimFrontier)
        );
        assert_eq!(
            StrategyKind::from_name("crawler"),
            Some(StrategyKind::Crawler(Crawler::default()))
        );
        assert_eq!(StrategyKind::from_name("labyrinth"), None);
        assert_eq!(StrategyKind::names().len(), 6);
    }

    #[test]
    fn test_serde_tagged() {
        let json = serde_json::to_string(&StrategyKind::PrimFrontier).unwrap();
        assert_eq!(json, r#"{"kind":"prim_frontier"}"#);

        let kind: StrategyKind =
            serde_json::from_str(r#"{"kind":"uniform_random_fill","fill_percent":30}"#).unwrap();
        assert_eq!(
            kind,
            StrategyKind::UniformRandomFill(UniformRandomFill { fill_percent: 30 })
        );

        let kind: StrategyKind =
            serde_json::from_str(r#"{"kind":"wilson_loop_erased_walk"}"#).unwrap();
        assert_eq!(
            kind,
            StrategyKind::WilsonLoopErasedWalk(WilsonLoopErasedWalk::default())
        );
    }

    #[test]
    fn test_every_strategy_keeps_border() {
        for kind in StrategyKind::iter() {
            for seed in 0..5 {
                let mut grid = Grid::new(20, 15).unwrap();
                let mut rng = GameRng::new(seed);
                kind.generate(&mut grid, &mut rng);
                for loc in grid.locations().filter(|l| grid.is_border(*l)) {
                    assert_eq!(grid.state(loc), CellState::Wall, "{kind} broke the border");
                }
            }
        }
    }

    #[test]
    fn test_every_strategy_opens_cells() {
        for kind in StrategyKind::iter() {
            let mut grid = Grid::new(20, 15).unwrap();
            let mut rng = GameRng::new(42);
            kind.generate(&mut grid, &mut rng);
            assert!(
                grid.count(CellState::Wall) < 20 * 15,
                "{} opened nothing",
                kind.name()
            );
        }
    }
}
