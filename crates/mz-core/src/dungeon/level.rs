//! A single generated level
//!
//! Generation runs once per level: strategy, rooms, optional padding,
//! connectivity, then classification of every open cell into a piece and a
//! request to the renderer for each.

use serde::{Serialize, Serializer};

use super::connectivity::{ConnectivityMode, ConnectivityReport, carve_path, dig_from_edges};
use super::grid::{Grid, Location};
use super::pathfind::find_path;
use super::piece::{Piece, PieceType, classify};
use super::room::{Room, add_rooms};
use crate::config::LevelConfig;
use crate::error::{GenerationError, PathError};
use crate::generation::GenerationStrategy;
use crate::render::{PieceRenderer, PieceRequest, VisualHandle, WorldPosition};
use crate::rng::DungeonRng;

#[derive(Debug, Clone, Serialize)]
pub struct Level {
    config: LevelConfig,
    grid: Grid,
    /// Indexed `[x][z]` like the grid; wall cells hold `PieceType::None`
    #[serde(serialize_with = "serialize_pieces")]
    pieces: Vec<Vec<Piece>>,
    start_locations: Vec<Location>,
    exit_locations: Vec<Location>,
    rooms: Vec<Room>,
    connectivity: Option<ConnectivityReport>,
    placement: WorldPosition,
}

/// Only non-wall pieces are written out
fn serialize_pieces<S: Serializer>(
    pieces: &[Vec<Piece>],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        pieces
            .iter()
            .flatten()
            .filter(|p| p.piece_type != PieceType::None),
    )
}

impl Level {
    /// Run the whole generation pipeline for one level
    pub fn generate<R: DungeonRng, P: PieceRenderer>(
        config: &LevelConfig,
        rng: &mut R,
        renderer: &mut P,
    ) -> Result<Level, GenerationError> {
        config.validate()?;
        let mut config = config.clone();

        let mut grid = Grid::new(config.width, config.height)?;
        config.strategy.generate(&mut grid, rng);
        grid.settle_marked();
        log::debug!(
            "level {}: {} opened {} cells",
            config.level,
            config.strategy.name(),
            grid.open_cells().len()
        );

        let mut rooms = add_rooms(
            &mut grid,
            config.num_rooms,
            config.room_size.min,
            config.room_size.max,
            rng,
        )?;

        if config.padding > 0 {
            grid = grid.padded(config.padding)?;
            let shift = Location::new(config.padding, config.padding);
            rooms = rooms.iter().map(|r| r.translated(shift)).collect();
            config.width = grid.width();
            config.height = grid.height();
        }

        let report = match config.connectivity {
            ConnectivityMode::EdgeDig => dig_from_edges(&mut grid, rng),
            ConnectivityMode::PathCarver => carve_path(&mut grid, rng)?,
        };
        if !report.is_fully_connected() {
            log::warn!(
                "level {}: edges {:?} are not connected",
                config.level,
                report.disconnected_edges()
            );
        }

        let mut level = Level::classified(config, grid);
        level.rooms = rooms;
        level.connectivity = Some(report);
        level.decorate(renderer);
        log::info!(
            "level {}: {}x{} with {} pieces",
            level.config.level,
            level.width(),
            level.height(),
            level.piece_count()
        );
        Ok(level)
    }

    /// Classify an existing grid without generating anything
    ///
    /// The config's dimensions are replaced by the grid's.
    pub fn from_grid<P: PieceRenderer>(
        config: &LevelConfig,
        grid: Grid,
        renderer: &mut P,
    ) -> Level {
        let mut config = config.clone();
        config.width = grid.width();
        config.height = grid.height();
        let mut level = Level::classified(config, grid);
        level.decorate(renderer);
        level
    }

    fn classified(config: LevelConfig, grid: Grid) -> Level {
        let pieces = (0..grid.width())
            .map(|x| {
                (0..grid.height())
                    .map(|z| {
                        let loc = Location::new(x, z);
                        let piece_type = if grid.is_open(loc) {
                            classify(grid.neighborhood(loc))
                        } else {
                            PieceType::None
                        };
                        Piece::new(loc, piece_type)
                    })
                    .collect()
            })
            .collect();

        Level {
            config,
            grid,
            pieces,
            start_locations: Vec::new(),
            exit_locations: Vec::new(),
            rooms: Vec::new(),
            connectivity: None,
            placement: WorldPosition::default(),
        }
    }

    /// Ask the renderer for a visual for every non-wall piece
    fn decorate<P: PieceRenderer>(&mut self, renderer: &mut P) {
        for x in 0..self.grid.width() {
            for z in 0..self.grid.height() {
                let loc = Location::new(x, z);
                let piece_type = self.pieces[x as usize][z as usize].piece_type;
                if piece_type == PieceType::None {
                    continue;
                }
                let request = PieceRequest {
                    position: self.world_position(loc),
                    piece_type,
                    rotation: piece_type.rotation(),
                    neighbors: self.grid.neighborhood(loc),
                };
                self.pieces[x as usize][z as usize].handle = renderer.instantiate(request);
            }
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Report from the connectivity pass, if the level was generated
    pub fn connectivity(&self) -> Option<&ConnectivityReport> {
        self.connectivity.as_ref()
    }

    /// Where players arrive from the level below
    pub fn start_locations(&self) -> &[Location] {
        &self.start_locations
    }

    /// Staircases up to the next level
    pub fn exit_locations(&self) -> &[Location] {
        &self.exit_locations
    }

    /// World translation from offset propagation
    pub fn placement(&self) -> WorldPosition {
        self.placement
    }

    pub fn piece(&self, loc: Location) -> Option<&Piece> {
        if self.grid.in_bounds(loc) {
            Some(&self.pieces[loc.x as usize][loc.z as usize])
        } else {
            None
        }
    }

    pub fn piece_type(&self, loc: Location) -> PieceType {
        self.piece(loc).map_or(PieceType::None, |p| p.piece_type)
    }

    /// Every non-wall piece, column by column
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces
            .iter()
            .flatten()
            .filter(|p| p.piece_type != PieceType::None)
    }

    pub fn piece_count(&self) -> usize {
        self.pieces().count()
    }

    /// Locations holding `piece_type`, row by row from the bottom
    pub fn locations_of(&self, piece_type: PieceType) -> Vec<Location> {
        let mut found = Vec::new();
        for z in 0..self.height() {
            for x in 0..self.width() {
                let loc = Location::new(x, z);
                if self.piece_type(loc) == piece_type {
                    found.push(loc);
                }
            }
        }
        found
    }

    /// Centre of a cell in world space, ignoring placement
    pub fn world_position(&self, loc: Location) -> WorldPosition {
        let scale = self.config.piece_scale;
        WorldPosition::new(
            loc.x as f32 * scale,
            self.config.level as f32 * scale * self.config.height_scale,
            loc.z as f32 * scale,
        )
    }

    /// Path from `from` to a randomly chosen exit
    pub fn reveal_path<R: DungeonRng>(
        &self,
        from: Location,
        rng: &mut R,
    ) -> Result<Vec<Location>, PathError> {
        let exit = rng.choose(&self.exit_locations).ok_or(PathError::NoExit)?;
        find_path(&self.grid, from, *exit)
    }

    /// Text map of classified pieces, top row first
    pub fn piece_map(&self) -> String {
        let mut map = String::new();
        for z in (0..self.height()).rev() {
            for x in 0..self.width() {
                map.push(self.piece_type(Location::new(x, z)).symbol());
            }
            map.push('\n');
        }
        map
    }

    /// Change a piece's type and hand back its old visual, if any
    pub(super) fn replace_piece(
        &mut self,
        loc: Location,
        piece_type: PieceType,
    ) -> Option<VisualHandle> {
        if !self.grid.in_bounds(loc) {
            return None;
        }
        let piece = &mut self.pieces[loc.x as usize][loc.z as usize];
        piece.piece_type = piece_type;
        piece.handle.take()
    }

    pub(super) fn set_handle(&mut self, loc: Location, handle: Option<VisualHandle>) {
        if self.grid.in_bounds(loc) {
            self.pieces[loc.x as usize][loc.z as usize].handle = handle;
        }
    }

    pub(super) fn push_start(&mut self, loc: Location) {
        self.start_locations.push(loc);
    }

    pub(super) fn push_exit(&mut self, loc: Location) {
        self.exit_locations.push(loc);
    }

    pub(super) fn set_offset(&mut self, offset: Location) {
        self.config.set_offset(offset);
    }

    pub(super) fn set_placement(&mut self, placement: WorldPosition) {
        self.placement = placement;
    }
}
