//! A* search over open grid cells
//!
//! Movement is 4-directional with unit step cost and a Euclidean heuristic.
//! Searches stop after a bounded number of expansions so an unreachable goal
//! is reported as [`PathError::NotFound`] instead of spinning.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

use super::grid::{CARDINALS, Grid, Location};
use crate::error::PathError;

/// Search node; markers are compared by location only
#[derive(Debug, Clone, Copy)]
pub struct PathMarker {
    pub location: Location,
    pub g: f32,
    pub h: f32,
    pub f: f32,
    /// Index of the previous marker in the owning [`PathTrace`]
    pub parent: Option<usize>,
}

impl PartialEq for PathMarker {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
    }
}

impl Eq for PathMarker {}

/// Open-list entry for the priority queue
#[derive(Clone, Copy, PartialEq)]
struct OpenEntry {
    f: f32,
    h: f32,
    index: usize,
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.h.total_cmp(&self.h))
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Result of a successful search: the goal marker and its ancestry
#[derive(Debug, Clone)]
pub struct PathTrace {
    markers: Vec<PathMarker>,
    terminal: usize,
    expanded: usize,
}

impl PathTrace {
    /// The marker that reached the goal
    pub fn terminal(&self) -> &PathMarker {
        &self.markers[self.terminal]
    }

    /// Markers from start to goal
    pub fn path(&self) -> Vec<PathMarker> {
        let mut path = Vec::new();
        let mut current = Some(self.terminal);
        while let Some(index) = current {
            let marker = self.markers[index];
            path.push(marker);
            current = marker.parent;
        }
        path.reverse();
        path
    }

    /// Locations from start to goal, both included
    pub fn locations(&self) -> Vec<Location> {
        self.path().iter().map(|m| m.location).collect()
    }

    /// Number of moves along the path
    pub fn steps(&self) -> usize {
        self.path().len().saturating_sub(1)
    }

    /// Nodes expanded before the goal was reached
    pub fn expanded(&self) -> usize {
        self.expanded
    }
}

/// A* search bound to one grid
#[derive(Debug, Clone, Copy)]
pub struct PathFinder<'a> {
    grid: &'a Grid,
    expansion_cap: usize,
}

impl<'a> PathFinder<'a> {
    /// Search with the default cap of one expansion per grid cell
    pub fn new(grid: &'a Grid) -> Self {
        let cap = (grid.width().max(0) as usize) * (grid.height().max(0) as usize);
        Self {
            grid,
            expansion_cap: cap,
        }
    }

    pub fn with_expansion_cap(mut self, cap: usize) -> Self {
        self.expansion_cap = cap;
        self
    }

    pub fn expansion_cap(&self) -> usize {
        self.expansion_cap
    }

    /// Find the cheapest route from `start` to `goal`
    pub fn search(&self, start: Location, goal: Location) -> Result<PathTrace, PathError> {
        for loc in [start, goal] {
            if !self.grid.is_inside(loc) {
                return Err(PathError::OutOfBounds(loc));
            }
        }

        let h = start.distance(goal);
        let mut markers = vec![PathMarker {
            location: start,
            g: 0.0,
            h,
            f: h,
            parent: None,
        }];
        let mut open = BinaryHeap::new();
        let mut open_index: HashMap<Location, usize> = HashMap::new();
        let mut closed: HashSet<Location> = HashSet::new();
        closed.insert(start);

        let mut current = 0;
        let mut expanded = 0;

        while markers[current].location != goal {
            if expanded >= self.expansion_cap {
                return Err(PathError::NotFound {
                    start,
                    goal,
                    expanded,
                });
            }
            expanded += 1;

            let node = markers[current];
            for dir in CARDINALS {
                let next = node.location + dir;
                if !self.grid.is_inside(next)
                    || !self.grid.is_open(next)
                    || closed.contains(&next)
                {
                    continue;
                }

                let g = node.g + node.location.distance(next);
                if let Some(&existing) = open_index.get(&next)
                    && markers[existing].g <= g
                {
                    continue;
                }

                let h = next.distance(goal);
                let index = markers.len();
                markers.push(PathMarker {
                    location: next,
                    g,
                    h,
                    f: g + h,
                    parent: Some(current),
                });
                open_index.insert(next, index);
                open.push(OpenEntry { f: g + h, h, index });
            }

            current = loop {
                let Some(entry) = open.pop() else {
                    return Err(PathError::NotFound {
                        start,
                        goal,
                        expanded,
                    });
                };
                let location = markers[entry.index].location;
                // Superseded by a cheaper marker for the same location
                if open_index.get(&location) != Some(&entry.index) {
                    continue;
                }
                open_index.remove(&location);
                closed.insert(location);
                break entry.index;
            };
        }

        Ok(PathTrace {
            markers,
            terminal: current,
            expanded,
        })
    }
}

/// Ordered locations from `start` to `goal`
pub fn find_path(grid: &Grid, start: Location, goal: Location) -> Result<Vec<Location>, PathError> {
    PathFinder::new(grid)
        .search(start, goal)
        .map(|trace| trace.locations())
}
