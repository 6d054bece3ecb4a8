//! Biased random-walk crawlers
//!
//! A horizontal crawl starts on the left edge and drifts right: each step
//! either moves forward by 0 or 1 column or sideways by -1, 0 or +1 rows.
//! Vertical crawls do the same bottom to top. A crawl ends when it leaves
//! its allowed band.

use serde::{Deserialize, Serialize};

use super::GenerationStrategy;
use crate::CRAWL_FORWARD_PERCENT;
use crate::dungeon::{Grid, Location};
use crate::rng::DungeonRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Run one crawl. `margin` is the first allowed index on each side.
fn crawl<R: DungeonRng>(
    grid: &mut Grid,
    rng: &mut R,
    axis: Axis,
    margin: i32,
    forward_percent: u8,
) {
    let (width, height) = (grid.width(), grid.height());
    let start = match axis {
        Axis::Horizontal => rng.range(height / 6, height - height / 6),
        Axis::Vertical => rng.range(width / 6, width - width / 6),
    };
    let mut pos = match axis {
        Axis::Horizontal => Location::new(margin, start),
        Axis::Vertical => Location::new(start, margin),
    };

    // A walk that stops advancing ends at the step cap
    let budget = width as usize * height as usize * 8;
    for _ in 0..budget {
        grid.carve(pos);

        let forward = rng.percent(forward_percent);
        let step = if forward {
            rng.range(0, 2)
        } else {
            rng.range(-1, 2)
        };
        match (axis, forward) {
            (Axis::Horizontal, true) | (Axis::Vertical, false) => pos.x += step,
            (Axis::Horizontal, false) | (Axis::Vertical, true) => pos.z += step,
        }

        let outside = pos.x < margin
            || pos.x >= width - margin
            || pos.z < margin
            || pos.z >= height - margin;
        if outside {
            return;
        }
    }
    log::debug!("crawl from {start} hit its step budget");
}

/// Crawls that run edge to edge, interleaving horizontal and vertical walks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Crawler {
    pub forward_percent: u8,
    pub horizontal: u32,
    pub vertical: u32,
}

impl Default for Crawler {
    fn default() -> Self {
        Self {
            forward_percent: CRAWL_FORWARD_PERCENT,
            horizontal: 3,
            vertical: 3,
        }
    }
}

impl GenerationStrategy for Crawler {
    fn name(&self) -> &'static str {
        "crawler"
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        for i in 0..self.horizontal.max(self.vertical) {
            if i < self.horizontal {
                crawl(grid, rng, Axis::Horizontal, 0, self.forward_percent);
            }
            if i < self.vertical {
                crawl(grid, rng, Axis::Vertical, 0, self.forward_percent);
            }
        }
    }
}

/// Crawls confined inside the border ring: all horizontal walks, then all vertical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoundedCrawl {
    pub forward_percent: u8,
    pub horizontal: u32,
    pub vertical: u32,
}

impl Default for BoundedCrawl {
    fn default() -> Self {
        Self {
            forward_percent: CRAWL_FORWARD_PERCENT,
            horizontal: 2,
            vertical: 3,
        }
    }
}

impl GenerationStrategy for BoundedCrawl {
    fn name(&self) -> &'static str {
        "bounded_crawl"
    }

    fn generate<R: DungeonRng>(&self, grid: &mut Grid, rng: &mut R) {
        for _ in 0..self.horizontal {
            crawl(grid, rng, Axis::Horizontal, 1, self.forward_percent);
        }
        for _ in 0..self.vertical {
            crawl(grid, rng, Axis::Vertical, 1, self.forward_percent);
        }
    }
}
