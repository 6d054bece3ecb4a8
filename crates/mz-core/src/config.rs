//! Level and dungeon configuration
//!
//! Configurations are plain serde structs with every field defaulted, so a
//! JSON file only has to name what it changes.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::dungeon::{ConnectivityMode, Location, check_max_size, validate_room_size};
use crate::error::ConfigError;
use crate::generation::StrategyKind;

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: i32,
    pub max: i32,
}

impl SizeRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn is_valid(&self) -> bool {
        self.min >= 0 && self.min <= self.max
    }
}

/// Settings for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub width: i32,
    pub height: i32,
    /// Vertical index, 0 at the bottom
    pub level: u32,
    /// World size of one cell
    pub piece_scale: f32,
    /// Storey height as a multiple of `piece_scale`
    pub height_scale: f32,
    pub num_rooms: u32,
    pub room_size: SizeRange,
    /// Staircases to build towards the level above
    pub ladders: SizeRange,
    pub strategy: StrategyKind,
    pub connectivity: ConnectivityMode,
    /// Wall cells added on every side after rooms are carved
    pub padding: i32,
    /// Offset to the level below, written by the stitcher
    #[serde(skip_deserializing)]
    pub x_offset: i32,
    #[serde(skip_deserializing)]
    pub z_offset: i32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            level: 0,
            piece_scale: DEFAULT_PIECE_SCALE,
            height_scale: DEFAULT_HEIGHT_SCALE,
            num_rooms: DEFAULT_NUM_ROOMS,
            room_size: SizeRange::new(DEFAULT_ROOM_MIN, DEFAULT_ROOM_MAX),
            ladders: SizeRange::new(DEFAULT_LADDERS_MIN, DEFAULT_LADDERS_MAX),
            strategy: StrategyKind::default(),
            connectivity: ConnectivityMode::default(),
            padding: 0,
            x_offset: 0,
            z_offset: 0,
        }
    }
}

impl LevelConfig {
    /// Reject anything that would make generation write out of range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width < MIN_GRID_SIZE || self.height < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                width: self.width,
                height: self.height,
                min: MIN_GRID_SIZE,
            });
        }
        if self.padding < 0 {
            return Err(ConfigError::InvalidRange {
                name: "padding",
                min: self.padding,
                max: self.padding,
            });
        }
        let grow = i64::from(self.padding) * 2;
        check_max_size(
            i64::from(self.width) + grow,
            i64::from(self.height) + grow,
        )?;
        if self.num_rooms > 0 {
            validate_room_size(
                self.width,
                self.height,
                self.room_size.min,
                self.room_size.max,
            )?;
        }
        if !self.ladders.is_valid() || self.ladders.min < 1 {
            return Err(ConfigError::InvalidRange {
                name: "ladders",
                min: self.ladders.min,
                max: self.ladders.max,
            });
        }
        for (name, value) in [
            ("piece_scale", self.piece_scale),
            ("height_scale", self.height_scale),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NonPositiveScale { name, value });
            }
        }
        Ok(())
    }

    /// Offset to the level below
    pub fn offset(&self) -> Location {
        Location::new(self.x_offset, self.z_offset)
    }

    pub fn set_offset(&mut self, offset: Location) {
        self.x_offset = offset.x;
        self.z_offset = offset.z;
    }
}

/// A whole dungeon: one config per level, bottom first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    /// Seed for the generator; random when absent
    pub seed: Option<u64>,
    /// Generation attempts per level before giving up
    pub max_attempts: u32,
    pub levels: Vec<LevelConfig>,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            levels: vec![LevelConfig::default()],
        }
    }
}

impl DungeonConfig {
    /// `count` copies of `template`, numbered from the bottom
    pub fn uniform(count: u32, template: &LevelConfig) -> Self {
        let levels = (0..count)
            .map(|level| LevelConfig {
                level,
                ..template.clone()
            })
            .collect();
        Self {
            levels,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check every level before anything is generated
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        self.levels.iter().try_for_each(LevelConfig::validate)
    }
}
