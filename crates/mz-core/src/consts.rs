//! Generation constants
//!
//! Defaults used when a configuration leaves a tunable unspecified.

/// Default level dimensions
pub const DEFAULT_WIDTH: i32 = 30;
pub const DEFAULT_HEIGHT: i32 = 30;

/// Smallest grid that still has an interior cell
pub const MIN_GRID_SIZE: i32 = 3;

/// Largest grid side, padding included
pub const MAX_GRID_SIZE: i32 = 1024;

/// Rooms keep at least this many cells between themselves and the border
pub const ROOM_MARGIN: i32 = 3;

/// Default world-space size of one cell
pub const DEFAULT_PIECE_SCALE: f32 = 6.0;
pub const DEFAULT_HEIGHT_SCALE: f32 = 2.0;

/// Default room placement
pub const DEFAULT_NUM_ROOMS: u32 = 3;
pub const DEFAULT_ROOM_MIN: i32 = 3;
pub const DEFAULT_ROOM_MAX: i32 = 6;

/// Default staircase count per pair of levels
pub const DEFAULT_LADDERS_MIN: i32 = 1;
pub const DEFAULT_LADDERS_MAX: i32 = 3;

/// Default number of generation attempts per level
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// UniformRandomFill: chance for an interior cell to open
pub const FILL_PERCENT: u8 = 50;

/// Crawlers: chance of stepping forward instead of sideways
pub const CRAWL_FORWARD_PERCENT: u8 = 40;

/// Wilson: attempts to find a legal step before a walk is abandoned
pub const WILSON_STEP_RETRIES: u32 = 10;

/// Wilson: global cap on random walks
pub const WILSON_MAX_TRIES: u32 = 5000;

/// PathCarver: endpoint pairs tried before the level attempt fails
pub const PATH_CARVER_ATTEMPTS: u32 = 5;
