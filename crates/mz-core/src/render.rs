//! Renderer collaborator interface
//!
//! The core never draws anything. After classification it hands each
//! corridor cell to a [`PieceRenderer`], which may return an opaque handle;
//! the core only stores that handle so it can ask for it to be destroyed
//! when a cell is rebuilt as a staircase.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::dungeon::{CellState, PieceType};

/// Opaque reference to a visual owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u64);

/// World-space position of a piece
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPosition {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Everything a renderer needs to build one piece
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PieceRequest {
    pub position: WorldPosition,
    pub piece_type: PieceType,
    /// Yaw in degrees
    pub rotation: u16,
    /// Raw neighbourhood, for decorating `Custom` pieces side by side
    pub neighbors: [CellState; 8],
}

/// External visual instantiation
pub trait PieceRenderer {
    /// Build a visual for a piece; `None` means nothing was created
    fn instantiate(&mut self, request: PieceRequest) -> Option<VisualHandle>;

    /// Tear down a visual previously returned by `instantiate`
    fn destroy(&mut self, handle: VisualHandle);
}

impl<T: PieceRenderer + ?Sized> PieceRenderer for &mut T {
    fn instantiate(&mut self, request: PieceRequest) -> Option<VisualHandle> {
        (**self).instantiate(request)
    }

    fn destroy(&mut self, handle: VisualHandle) {
        (**self).destroy(handle)
    }
}

/// Renderer that creates nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl PieceRenderer for NullRenderer {
    fn instantiate(&mut self, _request: PieceRequest) -> Option<VisualHandle> {
        None
    }

    fn destroy(&mut self, _handle: VisualHandle) {}
}

/// Renderer that hands out sequential handles and remembers every request
///
/// Used by the CLI to count pieces and by tests to check what the core
/// asked for.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    next: u64,
    live: BTreeSet<VisualHandle>,
    requests: Vec<PieceRequest>,
    destroyed: usize,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: VisualHandle) -> bool {
        self.live.contains(&handle)
    }

    /// Every instantiate request, in order
    pub fn requests(&self) -> &[PieceRequest] {
        &self.requests
    }

    pub fn destroyed(&self) -> usize {
        self.destroyed
    }
}

impl PieceRenderer for RecordingRenderer {
    fn instantiate(&mut self, request: PieceRequest) -> Option<VisualHandle> {
        let handle = VisualHandle(self.next);
        self.next += 1;
        self.live.insert(handle);
        self.requests.push(request);
        Some(handle)
    }

    fn destroy(&mut self, handle: VisualHandle) {
        if self.live.remove(&handle) {
            self.destroyed += 1;
        }
    }
}
