//! Edge connectivity passes
//!
//! After a layout is generated it may not reach the level edges. Two
//! carvers fix that up: [`carve_path`] threads an A* path between two open
//! cells and extends it to both side walls, [`dig_from_edges`] digs inward
//! from all four edges until each digger meets open floor or runs out of
//! steps. Either way the result is a [`ConnectivityReport`].

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::grid::{Grid, Location};
use super::pathfind::PathFinder;
use crate::PATH_CARVER_ATTEMPTS;
use crate::error::GenerationError;
use crate::rng::DungeonRng;

/// Which connectivity pass a level uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConnectivityMode {
    #[default]
    EdgeDig,
    PathCarver,
}

/// Level edge a digger starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Edge {
    Left,
    Right,
    Bottom,
    Top,
}

impl Edge {
    /// Direction of travel away from this edge
    pub const fn inward(self) -> Location {
        match self {
            Edge::Left => Location::new(1, 0),
            Edge::Right => Location::new(-1, 0),
            Edge::Bottom => Location::new(0, 1),
            Edge::Top => Location::new(0, -1),
        }
    }
}

/// How one edge ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStatus {
    pub edge: Edge,
    /// First cell carved from this edge
    pub start: Location,
    /// Rounds this edge worked for
    pub steps: u32,
    pub connected: bool,
}

/// Outcome of a connectivity pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectivityReport {
    pub mode: ConnectivityMode,
    pub edges: Vec<EdgeStatus>,
    /// Cells that went from wall to corridor
    pub carved: usize,
}

impl ConnectivityReport {
    /// Every edge the pass worked on reached open floor
    pub fn is_fully_connected(&self) -> bool {
        self.edges.iter().all(|e| e.connected)
    }

    pub fn disconnected_edges(&self) -> Vec<Edge> {
        self.edges
            .iter()
            .filter(|e| !e.connected)
            .map(|e| e.edge)
            .collect()
    }
}

fn carve_counted(grid: &mut Grid, loc: Location, carved: &mut usize) {
    if !grid.is_open(loc) && grid.carve(loc) {
        *carved += 1;
    }
}

/// Carve an A* path between two random open cells, then extend it to
/// column 1 on the left and column `width - 2` on the right
///
/// Pairs are redrawn up to [`PATH_CARVER_ATTEMPTS`] times when A* finds no
/// route between them.
pub fn carve_path<R: DungeonRng>(
    grid: &mut Grid,
    rng: &mut R,
) -> Result<ConnectivityReport, GenerationError> {
    let mut open = grid.open_cells();
    if open.len() < 2 {
        return Err(GenerationError::NotEnoughOpenCells(open.len()));
    }

    let mut attempt = 0;
    let route = loop {
        attempt += 1;
        rng.shuffle(&mut open);
        match PathFinder::new(grid).search(open[0], open[1]) {
            Ok(trace) => break trace.locations(),
            Err(err) if attempt < PATH_CARVER_ATTEMPTS => log::debug!("path carver: {err}"),
            Err(err) => return Err(err.into()),
        }
    };

    let mut carved = 0;
    for loc in &route {
        carve_counted(grid, *loc, &mut carved);
    }

    let (first, last) = (route[0], route[route.len() - 1]);
    let (left, right) = if first.x <= last.x {
        (first, last)
    } else {
        (last, first)
    };
    for x in 1..=left.x {
        carve_counted(grid, Location::new(x, left.z), &mut carved);
    }
    for x in right.x..=grid.width() - 2 {
        carve_counted(grid, Location::new(x, right.z), &mut carved);
    }

    Ok(ConnectivityReport {
        mode: ConnectivityMode::PathCarver,
        edges: vec![
            EdgeStatus {
                edge: Edge::Left,
                start: Location::new(1, left.z),
                steps: left.x as u32,
                connected: true,
            },
            EdgeStatus {
                edge: Edge::Right,
                start: Location::new(grid.width() - 2, right.z),
                steps: (grid.width() - 1 - right.x) as u32,
                connected: true,
            },
        ],
        carved,
    })
}

/// Digger working inward from one edge
struct Digger {
    status: EdgeStatus,
    pos: Location,
    done: bool,
}

/// Dig inward from all four edges, interleaved, for `max(width, height)` rounds
///
/// A digger stops as soon as it steps onto open floor. One that runs out of
/// rounds, or would step onto the far border, is reported as not connected.
/// A digger reaches the far border within `max(width, height) - 2` rounds,
/// so the default budget never cuts a walk short.
pub fn dig_from_edges<R: DungeonRng>(grid: &mut Grid, rng: &mut R) -> ConnectivityReport {
    let budget = grid.width().max(grid.height()).max(0) as u32;
    dig_from_edges_within(grid, rng, budget)
}

/// [`dig_from_edges`] with an explicit round budget
pub fn dig_from_edges_within<R: DungeonRng>(
    grid: &mut Grid,
    rng: &mut R,
    budget: u32,
) -> ConnectivityReport {
    let (width, height) = (grid.width(), grid.height());
    // Starts stay inside even on a 3-cell-wide grid
    let mut row = || rng.range((height / 4).max(1), (height - height / 4).min(height - 1));
    let left = Location::new(1, row());
    let right = Location::new(width - 2, row());
    let mut column = || rng.range((width / 4).max(1), (width - width / 4).min(width - 1));
    let bottom = Location::new(column(), 1);
    let top = Location::new(column(), height - 2);

    let mut diggers: Vec<Digger> = [
        (Edge::Left, left),
        (Edge::Right, right),
        (Edge::Bottom, bottom),
        (Edge::Top, top),
    ]
    .into_iter()
    .map(|(edge, start)| Digger {
        status: EdgeStatus {
            edge,
            start,
            steps: 0,
            connected: false,
        },
        pos: start,
        done: false,
    })
    .collect();

    let mut carved = 0;
    for _ in 0..budget {
        if diggers.iter().all(|d| d.done) {
            break;
        }
        for digger in diggers.iter_mut().filter(|d| !d.done) {
            carve_counted(grid, digger.pos, &mut carved);
            digger.status.steps += 1;

            let next = digger.pos + digger.status.edge.inward();
            if !grid.is_inside(next) {
                digger.done = true;
                continue;
            }
            digger.pos = next;
            if grid.is_open(next) {
                digger.status.connected = true;
                digger.done = true;
            }
        }
    }

    let edges: Vec<EdgeStatus> = diggers.into_iter().map(|d| d.status).collect();
    for status in edges.iter().filter(|s| !s.connected) {
        log::warn!(
            "{} edge digger from {} stopped after {} steps without reaching a corridor",
            status.edge,
            status.start,
            status.steps
        );
    }

    ConnectivityReport {
        mode: ConnectivityMode::EdgeDig,
        edges,
        carved,
    }
}
