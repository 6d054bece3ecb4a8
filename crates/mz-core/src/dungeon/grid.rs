//! Wall/corridor grid
//!
//! Cells are stored column-major as `cells[x][z]`. The outermost ring of
//! cells is a permanent wall border: `set` refuses to write it.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::error::ConfigError;

/// State of a single grid cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum CellState {
    #[default]
    Wall,
    Corridor,
    /// Transient maze membership used while a strategy is running
    Marked,
}

impl CellState {
    /// Anything that is not wall can be walked on
    pub const fn is_open(self) -> bool {
        !matches!(self, CellState::Wall)
    }

    pub const fn symbol(self) -> char {
        match self {
            CellState::Wall => '#',
            CellState::Corridor => '.',
            CellState::Marked => '*',
        }
    }
}

/// Integer grid coordinate, also used as a direction delta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub z: i32,
}

impl Location {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Projection to a 2D real vector
    pub fn to_vector(self) -> (f32, f32) {
        (self.x as f32, self.z as f32)
    }

    /// Euclidean distance
    pub fn distance(self, other: Location) -> f32 {
        let (ax, az) = self.to_vector();
        let (bx, bz) = other.to_vector();
        ((ax - bx).powi(2) + (az - bz).powi(2)).sqrt()
    }

    /// The four cardinal neighbours, in [`CARDINALS`] order
    pub fn cardinal_neighbors(self) -> [Location; 4] {
        CARDINALS.map(|d| self + d)
    }
}

impl Add for Location {
    type Output = Location;

    fn add(self, rhs: Location) -> Location {
        Location::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Location {
    type Output = Location;

    fn sub(self, rhs: Location) -> Location {
        Location::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// Unit steps right, up, left, down
pub const CARDINALS: [Location; 4] = [
    Location::new(1, 0),
    Location::new(0, 1),
    Location::new(-1, 0),
    Location::new(0, -1),
];

/// Neighbour offsets clockwise from up-left: UL, U, UR, R, DR, D, DL, L
///
/// Up is `z + 1`.
pub const NEIGHBOR_OFFSETS: [Location; 8] = [
    Location::new(-1, 1),
    Location::new(0, 1),
    Location::new(1, 1),
    Location::new(1, 0),
    Location::new(1, -1),
    Location::new(0, -1),
    Location::new(-1, -1),
    Location::new(-1, 0),
];

/// Rectangular cell array with a protected border
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Vec<CellState>>,
}

impl Grid {
    /// All-wall grid
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width < MIN_GRID_SIZE || height < MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                width,
                height,
                min: MIN_GRID_SIZE,
            });
        }
        check_max_size(width.into(), height.into())?;
        Ok(Self {
            width,
            height,
            cells: vec![vec![CellState::Wall; height as usize]; width as usize],
        })
    }

    /// Build a grid from text rows, top row first
    ///
    /// `#` is wall, `*` is marked, anything else is corridor. Rows shorter
    /// than the first are padded with wall. Border cells are read as given,
    /// so this can describe grids the generators would never produce.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ConfigError> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        let mut grid = Self::new(width, height)?;
        for (row, line) in rows.iter().enumerate() {
            let z = height - 1 - row as i32;
            for (x, ch) in line.chars().enumerate().take(width as usize) {
                grid.cells[x][z as usize] = match ch {
                    '#' => CellState::Wall,
                    '*' => CellState::Marked,
                    _ => CellState::Corridor,
                };
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Inside the array at all
    pub fn in_bounds(&self, loc: Location) -> bool {
        loc.x >= 0 && loc.x < self.width && loc.z >= 0 && loc.z < self.height
    }

    /// On the outermost ring
    pub fn is_border(&self, loc: Location) -> bool {
        self.in_bounds(loc)
            && (loc.x == 0 || loc.z == 0 || loc.x == self.width - 1 || loc.z == self.height - 1)
    }

    /// Strictly inside the border
    pub fn is_inside(&self, loc: Location) -> bool {
        loc.x >= 1 && loc.x < self.width - 1 && loc.z >= 1 && loc.z < self.height - 1
    }

    pub fn get(&self, loc: Location) -> Option<CellState> {
        if self.in_bounds(loc) {
            Some(self.cells[loc.x as usize][loc.z as usize])
        } else {
            None
        }
    }

    /// Cell state, with everything outside the grid reading as wall
    pub fn state(&self, loc: Location) -> CellState {
        self.get(loc).unwrap_or(CellState::Wall)
    }

    pub fn is_open(&self, loc: Location) -> bool {
        self.state(loc).is_open()
    }

    /// Write an interior cell. Returns false for border or outside cells.
    pub fn set(&mut self, loc: Location, state: CellState) -> bool {
        if !self.is_inside(loc) {
            return false;
        }
        self.cells[loc.x as usize][loc.z as usize] = state;
        true
    }

    pub fn carve(&mut self, loc: Location) -> bool {
        self.set(loc, CellState::Corridor)
    }

    /// Cardinal neighbours of `loc` currently in `state`
    pub fn cross_count(&self, loc: Location, state: CellState) -> usize {
        loc.cardinal_neighbors()
            .iter()
            .filter(|n| self.state(**n) == state)
            .count()
    }

    /// The 8 surrounding cells in [`NEIGHBOR_OFFSETS`] order
    pub fn neighborhood(&self, loc: Location) -> [CellState; 8] {
        NEIGHBOR_OFFSETS.map(|d| self.state(loc + d))
    }

    /// Every location, column by column
    pub fn locations(&self) -> impl Iterator<Item = Location> + '_ {
        (0..self.width).flat_map(move |x| (0..self.height).map(move |z| Location::new(x, z)))
    }

    /// Every non-wall location, column by column
    pub fn open_cells(&self) -> Vec<Location> {
        self.locations().filter(|l| self.is_open(*l)).collect()
    }

    pub fn count(&self, state: CellState) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|c| **c == state)
            .count()
    }

    /// Convert every transient mark to corridor
    pub fn settle_marked(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            if *cell == CellState::Marked {
                *cell = CellState::Corridor;
            }
        }
    }

    /// Copy into a larger all-wall grid, `padding` cells wider on every side
    pub fn padded(&self, padding: i32) -> Result<Grid, ConfigError> {
        let padding = padding.max(0);
        let grow = i64::from(padding) * 2;
        check_max_size(i64::from(self.width) + grow, i64::from(self.height) + grow)?;
        let width = self.width + 2 * padding;
        let height = self.height + 2 * padding;
        let mut cells = vec![vec![CellState::Wall; height as usize]; width as usize];
        for (x, column) in self.cells.iter().enumerate() {
            for (z, cell) in column.iter().enumerate() {
                cells[x + padding as usize][z + padding as usize] = *cell;
            }
        }
        Ok(Grid {
            width,
            height,
            cells,
        })
    }
}

/// Reject sizes past `MAX_GRID_SIZE`, computed wide so padding cannot wrap
pub(crate) fn check_max_size(width: i64, height: i64) -> Result<(), ConfigError> {
    let max = i64::from(MAX_GRID_SIZE);
    if width > max || height > max {
        return Err(ConfigError::GridTooLarge {
            width,
            height,
            max: MAX_GRID_SIZE,
        });
    }
    Ok(())
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for z in (0..self.height).rev() {
            for x in 0..self.width {
                write!(f, "{}", self.state(Location::new(x, z)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_all_wall() {
        let grid = Grid::new(5, 4).unwrap();
        assert_eq!(grid.count(CellState::Wall), 20);
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 4);
    }

    #[test]
    fn test_grid_too_small() {
        assert!(matches!(
            Grid::new(2, 10),
            Err(ConfigError::GridTooSmall { .. })
        ));
    }

    #[test]
    fn test_grid_too_large() {
        assert!(matches!(
            Grid::new(10, MAX_GRID_SIZE + 1),
            Err(ConfigError::GridTooLarge { .. })
        ));
        let grid = Grid::new(5, 5).unwrap();
        assert!(matches!(
            grid.padded(i32::MAX),
            Err(ConfigError::GridTooLarge { .. })
        ));
        assert!(grid.padded(MAX_GRID_SIZE).is_err());
    }

    #[test]
    fn test_set_refuses_border() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(!grid.carve(Location::new(0, 2)));
        assert!(!grid.carve(Location::new(4, 2)));
        assert!(!grid.carve(Location::new(2, 0)));
        assert!(!grid.carve(Location::new(2, 4)));
        assert!(!grid.carve(Location::new(-1, 7)));
        assert!(grid.carve(Location::new(2, 2)));
        assert_eq!(grid.count(CellState::Corridor), 1);
    }

    #[test]
    fn test_predicates() {
        let grid = Grid::new(5, 5).unwrap();
        assert!(grid.is_border(Location::new(0, 0)));
        assert!(!grid.is_border(Location::new(5, 0)));
        assert!(grid.is_inside(Location::new(3, 3)));
        assert!(!grid.is_inside(Location::new(4, 3)));
        assert_eq!(grid.get(Location::new(9, 9)), None);
        assert_eq!(grid.state(Location::new(9, 9)), CellState::Wall);
    }

    #[test]
    fn test_neighborhood_orientation() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.carve(Location::new(2, 3)); // up
        grid.carve(Location::new(3, 2)); // right
        let n = grid.neighborhood(Location::new(2, 2));
        assert_eq!(n[1], CellState::Corridor);
        assert_eq!(n[3], CellState::Corridor);
        assert_eq!(n.iter().filter(|c| c.is_open()).count(), 2);
        assert_eq!(grid.cross_count(Location::new(2, 2), CellState::Corridor), 2);
    }

    #[test]
    fn test_from_rows_and_display() {
        let rows = ["#####", "#..*#", "#.#.#", "#####"];
        let grid = Grid::from_rows(&rows).unwrap();
        assert_eq!(grid.state(Location::new(1, 2)), CellState::Corridor);
        assert_eq!(grid.state(Location::new(3, 2)), CellState::Marked);
        assert_eq!(grid.state(Location::new(2, 1)), CellState::Wall);
        assert_eq!(grid.to_string(), "#####\n#..*#\n#.#.#\n#####\n");
    }

    #[test]
    fn test_settle_marked() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(Location::new(1, 1), CellState::Marked);
        grid.settle_marked();
        assert_eq!(grid.count(CellState::Marked), 0);
        assert_eq!(grid.state(Location::new(1, 1)), CellState::Corridor);
    }

    #[test]
    fn test_padded() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.carve(Location::new(1, 1));
        let padded = grid.padded(3).unwrap();
        assert_eq!(padded.width(), 11);
        assert_eq!(padded.height(), 11);
        assert_eq!(padded.state(Location::new(4, 4)), CellState::Corridor);
        assert_eq!(padded.count(CellState::Corridor), 1);
    }

    #[test]
    fn test_location_math() {
        let a = Location::new(1, 2);
        let b = Location::new(4, 6);
        assert_eq!(a + b, Location::new(5, 8));
        assert_eq!(b - a, Location::new(3, 4));
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.to_string(), "(1, 2)");
    }
}
