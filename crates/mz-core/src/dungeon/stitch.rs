//! Connecting adjacent levels with staircases
//!
//! Each consecutive pair of levels is joined where a dead-end on the lower
//! level sits exactly under the opposite dead-end on the upper one. If the
//! two layouts share no such spot, one stair is built between any pair of
//! compatible dead-ends and the upper level is shifted so the two line up.

use serde::Serialize;
use strum::Display;

use super::grid::Location;
use super::level::Level;
use super::piece::PieceType;
use crate::render::{PieceRenderer, PieceRequest, WorldPosition};
use crate::rng::DungeonRng;

/// Dead-end pairings tried when the footprints share no candidate
const FALLBACK_PAIRS: [(PieceType, PieceType); 4] = [
    (PieceType::DeadEndLeft, PieceType::DeadEndRight),
    (PieceType::DeadEndRight, PieceType::DeadEndLeft),
    (PieceType::DeadEndTop, PieceType::DeadEndBottom),
    (PieceType::DeadEndBottom, PieceType::DeadEndTop),
];

/// One staircase between two levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stair {
    /// `LadderUp` cell on the lower level
    pub from: Location,
    /// `LadderDown` cell on the upper level
    pub to: Location,
    /// Yaw in degrees
    pub rotation: u16,
}

/// What happened when a pair of levels was stitched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StitchOutcome {
    /// Stairs built at aligned dead-ends
    Direct { stairs: Vec<Stair>, candidates: usize },
    /// One stair built and the upper level offset to match
    Offset { stair: Stair, offset: Location },
    /// No compatible dead-ends anywhere; the levels stay unconnected
    NoConnectionFound,
}

impl StitchOutcome {
    pub fn stairs(&self) -> Vec<Stair> {
        match self {
            StitchOutcome::Direct { stairs, .. } => stairs.clone(),
            StitchOutcome::Offset { stair, .. } => vec![*stair],
            StitchOutcome::NoConnectionFound => Vec::new(),
        }
    }

    /// At least one stair joins the pair
    pub fn is_connected(&self) -> bool {
        !self.stairs().is_empty()
    }
}

/// Result for one pair of levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StitchReport {
    pub lower: usize,
    pub upper: usize,
    pub outcome: StitchOutcome,
}

/// Builds staircases between consecutive levels
pub struct LevelStitcher<'a, R, P> {
    rng: &'a mut R,
    renderer: &'a mut P,
}

impl<'a, R: DungeonRng, P: PieceRenderer> LevelStitcher<'a, R, P> {
    pub fn new(rng: &'a mut R, renderer: &'a mut P) -> Self {
        Self { rng, renderer }
    }

    /// Stitch every consecutive pair, bottom up, then apply offsets
    pub fn connect_levels(&mut self, levels: &mut [Level]) -> Vec<StitchReport> {
        let mut reports = Vec::new();
        for lower_index in 1..levels.len() {
            let (below, above) = levels.split_at_mut(lower_index);
            let lower = &mut below[lower_index - 1];
            let upper = &mut above[0];

            let outcome = self.connect_pair(lower, upper);
            match &outcome {
                outcome if !outcome.is_connected() => log::warn!(
                    "levels {} and {} are not joined by any stair",
                    lower_index - 1,
                    lower_index
                ),
                outcome => log::info!(
                    "levels {} and {}: {} with {} stairs",
                    lower_index - 1,
                    lower_index,
                    outcome,
                    outcome.stairs().len()
                ),
            }
            reports.push(StitchReport {
                lower: lower_index - 1,
                upper: lower_index,
                outcome,
            });
        }
        apply_offsets(levels);
        reports
    }

    /// Stitch `lower` to the level directly above it
    ///
    /// Any offset already stored on `upper` is cleared first.
    pub fn connect_pair(&mut self, lower: &mut Level, upper: &mut Level) -> StitchOutcome {
        upper.set_offset(Location::default());
        let mut candidates = direct_candidates(lower, upper);

        if !candidates.is_empty() {
            let total = candidates.len();
            let ladders = lower.config().ladders;
            // Aligned candidates always yield at least one stair
            let wanted = self.rng.range_inclusive(ladders.min, ladders.max).max(1) as usize;
            self.rng.shuffle(&mut candidates);

            let stairs = candidates
                .into_iter()
                .take(wanted.min(total))
                .map(|loc| self.build_stair(lower, upper, loc, loc))
                .collect();
            return StitchOutcome::Direct {
                stairs,
                candidates: total,
            };
        }

        for (from_type, to_type) in FALLBACK_PAIRS {
            let sources = lower.locations_of(from_type);
            let targets = upper.locations_of(to_type);
            let (Some(&from), Some(&to)) = (self.rng.choose(&sources), self.rng.choose(&targets))
            else {
                continue;
            };

            let stair = self.build_stair(lower, upper, from, to);
            let offset = from - to;
            upper.set_offset(offset);
            log::debug!("offset stair {from} -> {to}, upper level shifted by {offset}");
            return StitchOutcome::Offset { stair, offset };
        }

        StitchOutcome::NoConnectionFound
    }

    /// Turn `from` into `LadderUp` on the lower level and `to` into
    /// `LadderDown` on the upper level
    ///
    /// Only the lower cell gets a new visual; the upper end is drawn by it.
    fn build_stair(
        &mut self,
        lower: &mut Level,
        upper: &mut Level,
        from: Location,
        to: Location,
    ) -> Stair {
        let rotation = lower.piece_type(from).stair_rotation().unwrap_or(0);

        if let Some(handle) = lower.replace_piece(from, PieceType::LadderUp) {
            self.renderer.destroy(handle);
        }
        if let Some(handle) = upper.replace_piece(to, PieceType::LadderDown) {
            self.renderer.destroy(handle);
        }
        lower.push_exit(from);
        upper.push_start(to);

        let handle = self.renderer.instantiate(PieceRequest {
            position: lower.world_position(from),
            piece_type: PieceType::LadderUp,
            rotation,
            neighbors: lower.grid().neighborhood(from),
        });
        lower.set_handle(from, handle);

        Stair { from, to, rotation }
    }
}

/// Footprint cells where the two levels hold opposite dead-ends, row by row
fn direct_candidates(lower: &Level, upper: &Level) -> Vec<Location> {
    let width = lower.width().min(upper.width());
    let depth = lower.height().min(upper.height());

    let mut candidates = Vec::new();
    for z in 0..depth {
        for x in 0..width {
            let loc = Location::new(x, z);
            if let Some(opposite) = lower.piece_type(loc).opposite()
                && upper.piece_type(loc) == opposite
            {
                candidates.push(loc);
            }
        }
    }
    candidates
}

/// Set each level's placement from the running sum of stored offsets
///
/// Level 0 never moves; level `k` is translated by the offsets of levels
/// `1..=k`, scaled by its own piece size.
pub fn apply_offsets(levels: &mut [Level]) {
    let mut carry = Location::default();
    for (index, level) in levels.iter_mut().enumerate() {
        if index > 0 {
            carry = carry + level.config().offset();
        }
        let scale = level.config().piece_scale;
        level.set_placement(WorldPosition::new(
            carry.x as f32 * scale,
            0.0,
            carry.z as f32 * scale,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LevelConfig, SizeRange};
    use crate::dungeon::Grid;
    use crate::render::RecordingRenderer;
    use crate::rng::{GameRng, SequenceRng};

    fn level_with(index: u32, cells: &[(i32, i32)], renderer: &mut RecordingRenderer) -> Level {
        let mut grid = Grid::new(16, 12).unwrap();
        for &(x, z) in cells {
            grid.carve(Location::new(x, z));
        }
        let config = LevelConfig {
            level: index,
            ladders: SizeRange::new(1, 3),
            ..LevelConfig::default()
        };
        Level::from_grid(&config, grid, renderer)
    }

    #[test]
    fn test_direct_single_candidate() {
        let mut renderer = RecordingRenderer::new();
        // Lower: (5,5) is a dead-end opening left. Upper: (5,5) opens right.
        let mut lower = level_with(0, &[(4, 5), (5, 5)], &mut renderer);
        let mut upper = level_with(1, &[(5, 5), (6, 5)], &mut renderer);
        assert_eq!(lower.piece_type(Location::new(5, 5)), PieceType::DeadEndLeft);
        assert_eq!(upper.piece_type(Location::new(5, 5)), PieceType::DeadEndRight);

        let mut rng = GameRng::new(42);
        let outcome =
            LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);

        let stair = Stair {
            from: Location::new(5, 5),
            to: Location::new(5, 5),
            rotation: 180,
        };
        assert_eq!(
            outcome,
            StitchOutcome::Direct {
                stairs: vec![stair],
                candidates: 1,
            }
        );
        assert_eq!(lower.exit_locations(), &[Location::new(5, 5)]);
        assert_eq!(upper.start_locations(), &[Location::new(5, 5)]);
        assert_eq!(upper.config().offset(), Location::new(0, 0));
        assert_eq!(lower.piece_type(Location::new(5, 5)), PieceType::LadderUp);
        assert_eq!(upper.piece_type(Location::new(5, 5)), PieceType::LadderDown);
    }

    #[test]
    fn test_stair_handles() {
        let mut renderer = RecordingRenderer::new();
        let mut lower = level_with(0, &[(4, 5), (5, 5)], &mut renderer);
        let mut upper = level_with(1, &[(5, 5), (6, 5)], &mut renderer);
        assert_eq!(renderer.live_count(), 4);

        let mut rng = GameRng::new(1);
        LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);

        // Both old visuals gone, one new ladder visual on the lower level
        assert_eq!(renderer.destroyed(), 2);
        assert_eq!(renderer.live_count(), 3);
        let ladder = lower.piece(Location::new(5, 5)).unwrap();
        assert!(renderer.is_live(ladder.handle.unwrap()));
        assert!(upper.piece(Location::new(5, 5)).unwrap().handle.is_none());

        let last = renderer.requests().last().unwrap();
        assert_eq!(last.piece_type, PieceType::LadderUp);
        assert_eq!(last.rotation, 180);
    }

    #[test]
    fn test_offset_stitch() {
        let mut renderer = RecordingRenderer::new();
        let mut lower = level_with(0, &[(4, 5), (5, 5)], &mut renderer);
        let mut upper = level_with(1, &[(10, 8), (11, 8)], &mut renderer);

        let mut rng = GameRng::new(3);
        let outcome =
            LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);

        let expected = Stair {
            from: Location::new(5, 5),
            to: Location::new(10, 8),
            rotation: 180,
        };
        assert_eq!(
            outcome,
            StitchOutcome::Offset {
                stair: expected,
                offset: Location::new(-5, -3),
            }
        );
        assert_eq!(upper.config().offset(), Location::new(-5, -3));
        assert_eq!(upper.start_locations(), &[Location::new(10, 8)]);
    }

    #[test]
    fn test_no_connection() {
        let mut renderer = RecordingRenderer::new();
        let mut lower = level_with(0, &[(5, 5), (5, 6)], &mut renderer);
        let mut upper = level_with(1, &[(10, 8), (11, 8)], &mut renderer);

        let mut rng = GameRng::new(3);
        let outcome =
            LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);
        assert_eq!(outcome, StitchOutcome::NoConnectionFound);
        assert!(!outcome.is_connected());
        assert!(lower.exit_locations().is_empty());
        assert!(upper.start_locations().is_empty());
        assert_eq!(renderer.destroyed(), 0);
    }

    #[test]
    fn test_ladder_count_capped_by_candidates() {
        let mut renderer = RecordingRenderer::new();
        // Two separate aligned pairs
        let mut lower = level_with(0, &[(4, 3), (5, 3), (4, 8), (5, 8)], &mut renderer);
        let mut upper = level_with(1, &[(5, 3), (6, 3), (5, 8), (6, 8)], &mut renderer);

        // Ask for 3 stairs
        let mut rng = SequenceRng::new(vec![2]);
        let outcome =
            LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);
        match outcome {
            StitchOutcome::Direct { stairs, candidates } => {
                assert_eq!(candidates, 2);
                assert_eq!(stairs.len(), 2);
            }
            other => panic!("expected direct stitch, got {other:?}"),
        }
        assert_eq!(lower.exit_locations().len(), 2);
    }

    #[test]
    fn test_connect_levels_reports_every_pair() {
        let mut renderer = RecordingRenderer::new();
        let mut levels = vec![
            level_with(0, &[(4, 5), (5, 5)], &mut renderer),
            level_with(1, &[(5, 5), (6, 5)], &mut renderer),
            level_with(2, &[(9, 2), (9, 3)], &mut renderer),
        ];
        let mut rng = GameRng::new(5);
        let reports = LevelStitcher::new(&mut rng, &mut renderer).connect_levels(&mut levels);

        assert_eq!(reports.len(), 2);
        assert_eq!((reports[0].lower, reports[0].upper), (0, 1));
        assert!(matches!(reports[0].outcome, StitchOutcome::Direct { .. }));
        // Level 1 is left with a left-facing dead-end, level 2 only has vertical ones
        assert_eq!(reports[1].outcome, StitchOutcome::NoConnectionFound);
    }

    #[test]
    fn test_zero_ladder_range_still_builds_a_stair() {
        let mut renderer = RecordingRenderer::new();
        let mut grid = Grid::new(16, 12).unwrap();
        grid.carve(Location::new(4, 5));
        grid.carve(Location::new(5, 5));
        let no_ladders = LevelConfig {
            ladders: SizeRange::new(0, 0),
            ..LevelConfig::default()
        };
        let mut lower = Level::from_grid(&no_ladders, grid, &mut renderer);
        let mut upper = level_with(1, &[(5, 5), (6, 5)], &mut renderer);

        let mut rng = SequenceRng::new(vec![0]);
        let outcome =
            LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);
        assert!(outcome.is_connected());
        assert_eq!(outcome.stairs().len(), 1);
        assert_eq!(lower.exit_locations(), &[Location::new(5, 5)]);
    }

    #[test]
    fn test_empty_direct_outcome_is_not_connected() {
        let outcome = StitchOutcome::Direct {
            stairs: Vec::new(),
            candidates: 3,
        };
        assert!(!outcome.is_connected());
    }

    #[test]
    fn test_connect_pair_clears_stale_offset() {
        let mut renderer = RecordingRenderer::new();
        let mut lower = level_with(0, &[(4, 5), (5, 5)], &mut renderer);
        let mut upper = level_with(1, &[(5, 5), (6, 5)], &mut renderer);
        upper.set_offset(Location::new(7, 7));

        let mut rng = GameRng::new(2);
        let outcome =
            LevelStitcher::new(&mut rng, &mut renderer).connect_pair(&mut lower, &mut upper);
        assert!(matches!(outcome, StitchOutcome::Direct { .. }));
        assert_eq!(upper.config().offset(), Location::new(0, 0));
    }

    #[test]
    fn test_apply_offsets_accumulates() {
        let mut renderer = RecordingRenderer::new();
        let mut levels: Vec<Level> = (0..3)
            .map(|i| level_with(i, &[(4, 5), (5, 5)], &mut renderer))
            .collect();
        levels[1].set_offset(Location::new(3, -1));
        levels[2].set_offset(Location::new(2, 0));

        apply_offsets(&mut levels);
        let scale = levels[0].config().piece_scale;
        assert_eq!(levels[0].placement(), WorldPosition::new(0.0, 0.0, 0.0));
        assert_eq!(levels[1].placement(), WorldPosition::new(3.0 * scale, 0.0, -scale));
        assert_eq!(levels[2].placement(), WorldPosition::new(5.0 * scale, 0.0, -scale));
    }
}
