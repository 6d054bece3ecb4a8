//! Error types for dungeon configuration, pathfinding and generation

use thiserror::Error;

use crate::dungeon::Location;

/// A configuration that cannot produce a valid level
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid {width}x{height} is too small (minimum {min}x{min})")]
    GridTooSmall { width: i32, height: i32, min: i32 },

    #[error("grid {width}x{height} is too large (maximum {max}x{max})")]
    GridTooLarge { width: i64, height: i64, max: i32 },

    #[error("invalid {name} range [{min}, {max}]")]
    InvalidRange {
        name: &'static str,
        min: i32,
        max: i32,
    },

    #[error("room size {max} does not fit a {width}x{height} grid")]
    RoomTooLarge { max: i32, width: i32, height: i32 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveScale { name: &'static str, value: f32 },

    #[error("dungeon has no levels")]
    NoLevels,

    #[error("could not read config '{path}': {reason}")]
    Unreadable { path: String, reason: String },

    #[error("could not parse config: {0}")]
    Parse(String),
}

/// A pathfinding query that has no answer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("location {0} is outside the walkable interior")]
    OutOfBounds(Location),

    #[error("no path from {start} to {goal} after {expanded} expansions")]
    NotFound {
        start: Location,
        goal: Location,
        expanded: usize,
    },

    #[error("level has no exit locations")]
    NoExit,
}

/// Failure while generating a level or a dungeon
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("need two open cells to carve a path, found {0}")]
    NotEnoughOpenCells(usize),

    #[error("level {level} failed after {attempts} attempts: {source}")]
    Exhausted {
        level: usize,
        attempts: u32,
        source: Box<GenerationError>,
    },
}

impl GenerationError {
    /// Whether a fresh attempt with new random draws could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Path(_) | Self::NotEnoughOpenCells(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PathError::NotFound {
            start: Location::new(1, 1),
            goal: Location::new(3, 3),
            expanded: 9,
        };
        assert_eq!(
            err.to_string(),
            "no path from (1, 1) to (3, 3) after 9 expansions"
        );

        let err = ConfigError::RoomTooLarge {
            max: 8,
            width: 12,
            height: 20,
        };
        assert!(err.to_string().contains("12x20"));
    }

    #[test]
    fn test_retryable() {
        assert!(GenerationError::NotEnoughOpenCells(1).is_retryable());
        assert!(GenerationError::from(PathError::NoExit).is_retryable());
        assert!(!GenerationError::from(ConfigError::NoLevels).is_retryable());
    }

    #[test]
    fn test_exhausted_wraps_source() {
        let err = GenerationError::Exhausted {
            level: 2,
            attempts: 3,
            source: Box::new(GenerationError::NotEnoughOpenCells(0)),
        };
        let text = err.to_string();
        assert!(text.starts_with("level 2 failed after 3 attempts"));
        assert!(text.contains("found 0"));
    }
}
