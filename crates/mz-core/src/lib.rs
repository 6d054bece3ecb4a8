//! mz-core: procedural multi-level maze dungeons
//!
//! Builds a wall/corridor grid per level with one of several interchangeable
//! strategies, classifies every corridor cell into an architectural piece,
//! guarantees edge connectivity and stitches consecutive levels together with
//! staircases.
//!
//! The crate never renders anything. Visual instantiation is delegated to a
//! [`PieceRenderer`] supplied by the caller.

pub mod config;
pub mod dungeon;
pub mod generation;
pub mod render;

mod consts;
mod error;
mod rng;

pub use config::{DungeonConfig, LevelConfig, SizeRange};
pub use consts::*;
pub use dungeon::{
    CellState, Dungeon, Grid, Level, LevelStitcher, Location, PieceType, StitchOutcome,
    build_dungeon, classify, find_path,
};
pub use error::{ConfigError, GenerationError, PathError};
pub use generation::{GenerationStrategy, StrategyKind};
pub use render::{
    NullRenderer, PieceRenderer, PieceRequest, RecordingRenderer, VisualHandle, WorldPosition,
};
pub use rng::{DungeonRng, GameRng, SequenceRng};
