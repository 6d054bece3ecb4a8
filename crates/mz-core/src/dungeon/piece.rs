//! Piece classification
//!
//! A corridor cell's piece type is decided only by its 8-cell neighbourhood.
//! Templates are tried in priority order and the first full match wins;
//! anything left over is [`PieceType::Custom`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::grid::{CellState, Location};
use crate::render::VisualHandle;

/// Architectural piece for one cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum PieceType {
    /// Wall cell, nothing to build
    #[default]
    None,
    Horizontal,
    Vertical,
    CornerTopRight,
    CornerTopLeft,
    CornerBottomRight,
    CornerBottomLeft,
    JunctionTop,
    JunctionRight,
    JunctionBottom,
    JunctionLeft,
    DeadEndTop,
    DeadEndRight,
    DeadEndBottom,
    DeadEndLeft,
    Intersection,
    OpenRoom,
    LadderUp,
    LadderDown,
    /// Corridor matching no template; decorate from the raw neighbourhood
    Custom,
}

impl PieceType {
    pub const DEAD_ENDS: [PieceType; 4] = [
        PieceType::DeadEndTop,
        PieceType::DeadEndRight,
        PieceType::DeadEndBottom,
        PieceType::DeadEndLeft,
    ];

    pub const fn is_dead_end(self) -> bool {
        matches!(
            self,
            PieceType::DeadEndTop
                | PieceType::DeadEndRight
                | PieceType::DeadEndBottom
                | PieceType::DeadEndLeft
        )
    }

    pub const fn is_ladder(self) -> bool {
        matches!(self, PieceType::LadderUp | PieceType::LadderDown)
    }

    /// Dead-end facing the other way, for pairing stairs across levels
    pub const fn opposite(self) -> Option<PieceType> {
        match self {
            PieceType::DeadEndTop => Some(PieceType::DeadEndBottom),
            PieceType::DeadEndBottom => Some(PieceType::DeadEndTop),
            PieceType::DeadEndLeft => Some(PieceType::DeadEndRight),
            PieceType::DeadEndRight => Some(PieceType::DeadEndLeft),
            _ => None,
        }
    }

    /// Yaw in degrees for the renderer
    pub const fn rotation(self) -> u16 {
        match self {
            PieceType::Horizontal => 90,
            PieceType::CornerTopLeft => 270,
            PieceType::CornerBottomRight => 90,
            PieceType::CornerBottomLeft => 180,
            PieceType::DeadEndTop => 180,
            PieceType::DeadEndRight => 270,
            PieceType::DeadEndLeft => 90,
            PieceType::JunctionTop => 270,
            PieceType::JunctionBottom => 90,
            PieceType::JunctionLeft => 180,
            _ => 0,
        }
    }

    /// Yaw of a staircase built on this dead-end
    pub const fn stair_rotation(self) -> Option<u16> {
        match self {
            PieceType::DeadEndRight => Some(0),
            PieceType::DeadEndBottom => Some(90),
            PieceType::DeadEndLeft => Some(180),
            PieceType::DeadEndTop => Some(270),
            _ => None,
        }
    }

    /// One-character glyph for text maps
    pub const fn symbol(self) -> char {
        match self {
            PieceType::None => '#',
            PieceType::Horizontal => '─',
            PieceType::Vertical => '│',
            PieceType::CornerTopRight => '└',
            PieceType::CornerTopLeft => '┘',
            PieceType::CornerBottomRight => '┌',
            PieceType::CornerBottomLeft => '┐',
            PieceType::JunctionTop => '┴',
            PieceType::JunctionRight => '├',
            PieceType::JunctionBottom => '┬',
            PieceType::JunctionLeft => '┤',
            PieceType::DeadEndTop => '╵',
            PieceType::DeadEndRight => '╶',
            PieceType::DeadEndBottom => '╷',
            PieceType::DeadEndLeft => '╴',
            PieceType::Intersection => '┼',
            PieceType::OpenRoom => '.',
            PieceType::LadderUp => '<',
            PieceType::LadderDown => '>',
            PieceType::Custom => '?',
        }
    }
}

/// One template slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Wall,
    Corridor,
    Any,
}

impl Slot {
    const fn matches(self, state: CellState) -> bool {
        match self {
            Slot::Wall => matches!(state, CellState::Wall),
            Slot::Corridor => matches!(state, CellState::Corridor),
            Slot::Any => true,
        }
    }
}

use Slot::{Any as A, Corridor as C, Wall as W};

/// Slot order: UL, U, UR, R, DR, D, DL, L
const TEMPLATES: [(PieceType, [Slot; 8]); 16] = [
    (PieceType::OpenRoom, [C, C, C, C, C, C, C, C]),
    (PieceType::Intersection, [W, C, W, C, W, C, W, C]),
    (PieceType::JunctionTop, [W, C, W, C, A, W, A, C]),
    (PieceType::JunctionRight, [A, C, W, C, W, C, A, W]),
    (PieceType::JunctionBottom, [A, W, A, C, W, C, W, C]),
    (PieceType::JunctionLeft, [W, C, A, W, A, C, W, C]),
    (PieceType::CornerTopRight, [A, C, W, C, A, W, A, W]),
    (PieceType::CornerTopLeft, [W, C, A, W, A, W, A, C]),
    (PieceType::CornerBottomRight, [A, W, A, C, W, C, A, W]),
    (PieceType::CornerBottomLeft, [A, W, A, W, A, C, W, C]),
    (PieceType::Horizontal, [A, W, A, C, A, W, A, C]),
    (PieceType::Vertical, [A, C, A, W, A, C, A, W]),
    (PieceType::DeadEndTop, [A, C, A, W, A, W, A, W]),
    (PieceType::DeadEndRight, [A, W, A, C, A, W, A, W]),
    (PieceType::DeadEndBottom, [A, W, A, W, A, C, A, W]),
    (PieceType::DeadEndLeft, [A, W, A, W, A, W, A, C]),
];

/// Classify a corridor cell from its neighbourhood
///
/// Total and pure: every input maps to exactly one piece type.
pub fn classify(neighbors: [CellState; 8]) -> PieceType {
    TEMPLATES
        .iter()
        .find(|(_, slots)| slots.iter().zip(neighbors).all(|(s, n)| s.matches(n)))
        .map_or(PieceType::Custom, |(piece, _)| *piece)
}

/// Classified cell and the renderer's handle for it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Piece {
    pub location: Location,
    pub piece_type: PieceType,
    pub handle: Option<VisualHandle>,
}

impl Piece {
    pub fn new(location: Location, piece_type: PieceType) -> Self {
        Self {
            location,
            piece_type,
            handle: None,
        }
    }
}
