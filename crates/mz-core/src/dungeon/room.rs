//! Rectangular room stamping

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Location};
use crate::ROOM_MARGIN;
use crate::error::ConfigError;
use crate::rng::DungeonRng;

/// Open rectangle covering `origin..=origin + (width, height)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub origin: Location,
    pub width: i32,
    pub height: i32,
}

impl Room {
    /// Corner opposite the origin, inclusive
    pub fn far_corner(&self) -> Location {
        self.origin + Location::new(self.width, self.height)
    }

    pub fn contains(&self, loc: Location) -> bool {
        let far = self.far_corner();
        loc.x >= self.origin.x && loc.x <= far.x && loc.z >= self.origin.z && loc.z <= far.z
    }

    pub fn cells(&self) -> impl Iterator<Item = Location> + '_ {
        let far = self.far_corner();
        (self.origin.x..=far.x)
            .flat_map(move |x| (self.origin.z..=far.z).map(move |z| Location::new(x, z)))
    }

    /// Same room moved by `delta`
    pub fn translated(&self, delta: Location) -> Room {
        Room {
            origin: self.origin + delta,
            ..*self
        }
    }
}

/// Check that rooms of up to `max` cells fit a `width` x `height` grid
pub fn validate_room_size(width: i32, height: i32, min: i32, max: i32) -> Result<(), ConfigError> {
    if min < 0 || min > max {
        return Err(ConfigError::InvalidRange {
            name: "room_size",
            min,
            max,
        });
    }
    if max >= width - 2 * ROOM_MARGIN || max >= height - 2 * ROOM_MARGIN {
        return Err(ConfigError::RoomTooLarge { max, width, height });
    }
    Ok(())
}

/// Stamp `count` rooms onto the grid and return where they went
///
/// Rooms may overlap. Each keeps at least [`ROOM_MARGIN`] cells between
/// itself and the border.
pub fn add_rooms<R: DungeonRng>(
    grid: &mut Grid,
    count: u32,
    min: i32,
    max: i32,
    rng: &mut R,
) -> Result<Vec<Room>, ConfigError> {
    if count == 0 {
        return Ok(Vec::new());
    }
    validate_room_size(grid.width(), grid.height(), min, max)?;

    let mut rooms = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let width = rng.range_inclusive(min, max);
        let height = rng.range_inclusive(min, max);
        let origin = Location::new(
            rng.range(ROOM_MARGIN, grid.width() - width - ROOM_MARGIN),
            rng.range(ROOM_MARGIN, grid.height() - height - ROOM_MARGIN),
        );
        let room = Room {
            origin,
            width,
            height,
        };
        log::debug!("room {width}x{height} at {origin}");
        for cell in room.cells() {
            grid.carve(cell);
        }
        rooms.push(room);
    }
    Ok(rooms)
}
