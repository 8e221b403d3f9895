//! Occupancy tracking for a single generation run.
//!
//! Every placement that claims map space marks its footprint here so later
//! stages never build on top of it. Cells outside the grid are ignored by
//! both queries and writes.

use crate::geometry::Point;
use crate::tilemap::Tilemap;

#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    cells: Tilemap<bool>,
}

impl OccupancyGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            cells: Tilemap::new(width, height),
        }
    }

    pub fn is_occupied(&self, p: Point) -> bool {
        self.cells.get(p).copied().unwrap_or(false)
    }

    /// True if any cell of the `size`×`size` square at `origin` is claimed.
    pub fn is_area_occupied(&self, origin: Point, size: i32) -> bool {
        (0..size).any(|dy| (0..size).any(|dx| self.is_occupied(Point::new(origin.x + dx, origin.y + dy))))
    }

    pub fn occupy_block(&mut self, origin: Point, size: i32) {
        for dy in 0..size {
            for dx in 0..size {
                self.cells.set(Point::new(origin.x + dx, origin.y + dy), true);
            }
        }
    }

    /// Claim every cell whose center lies within `radius` of `origin`.
    pub fn occupy_disk(&mut self, origin: Point, radius: i32) {
        let r2 = radius as i64 * radius as i64;
        for y in origin.y - radius..=origin.y + radius {
            for x in origin.x - radius..=origin.x + radius {
                let p = Point::new(x, y);
                if origin.distance_sq(p) <= r2 {
                    self.cells.set(p, true);
                }
            }
        }
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.count(|c| *c)
    }
}
