//! Cliff generation
//!
//! A cliff grows from a seed in two arms. Each step advances one randomly
//! chosen arm by one tile in its current heading, then maybe turns that arm
//! left or right. Steps onto claimed ground are dropped, so arms bend around
//! bases, deposits and other cliffs instead of crossing them.
//!
//! Once grown, the path is read end to end and every position is painted
//! with a tile matching how the path enters and leaves it
//! (see [`connections`]).

pub mod connections;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Direction, Point};
use crate::map::Map;
use crate::occupancy::OccupancyGrid;
use crate::tileset::Tileset;
use connections::{Connection, ConnectionTable};

/// A grown cliff: tile origins from one end to the other.
#[derive(Clone, Debug, PartialEq)]
pub struct CliffSegment {
    pub seed: Point,
    pub cells: Vec<Point>,
    /// Template painted at each cell, `None` where the tileset had nothing to offer.
    pub tiles: Vec<Option<u16>>,
}

struct Arm {
    head: Point,
    heading: Direction,
    cells: Vec<Point>,
}

pub struct CliffSynthesizer<'a> {
    table: &'a ConnectionTable,
    avg_length: i32,
    length_variance: i32,
    jitter_probability: f64,
}

impl<'a> CliffSynthesizer<'a> {
    pub fn new(table: &'a ConnectionTable, avg_length: i32, length_variance: i32, jitter_probability: f64) -> Self {
        Self {
            table,
            avg_length,
            length_variance: length_variance.max(0),
            jitter_probability: jitter_probability.clamp(0.0, 1.0),
        }
    }

    fn step(&self, from: Point, dir: Direction) -> Point {
        let o = dir.offset();
        Point::new(from.x + o.x * self.table.tile_size, from.y + o.y * self.table.tile_size)
    }

    fn footprint_free(&self, map: &Map, occupancy: &OccupancyGrid, origin: Point) -> bool {
        let size = self.table.tile_size;
        map.contains_block(origin, size) && !occupancy.is_area_occupied(origin, size)
    }

    /// Grow a cliff path from `seed`, claiming every accepted tile.
    ///
    /// Returns `None` without drawing from `rng` if the seed tile itself is
    /// not free.
    pub fn grow<R: Rng + ?Sized>(
        &self,
        map: &Map,
        occupancy: &mut OccupancyGrid,
        seed: Point,
        rng: &mut R,
    ) -> Option<Vec<Point>> {
        if !self.footprint_free(map, occupancy, seed) {
            return None;
        }
        occupancy.occupy_block(seed, self.table.tile_size);

        let first = Direction::ALL[rng.gen_range(0..4)];
        let others: Vec<Direction> = Direction::ALL.into_iter().filter(|d| *d != first).collect();
        let second = others[rng.gen_range(0..others.len())];
        let mut arms = [
            Arm { head: seed, heading: first, cells: Vec::new() },
            Arm { head: seed, heading: second, cells: Vec::new() },
        ];

        let spread = if self.length_variance > 0 {
            rng.gen_range(-self.length_variance..=self.length_variance)
        } else {
            0
        };
        let length = (self.avg_length + spread).max(2);

        for _ in 0..length {
            let arm = &mut arms[usize::from(rng.gen_bool(0.5))];
            let next = self.step(arm.head, arm.heading);
            if self.footprint_free(map, occupancy, next) {
                occupancy.occupy_block(next, self.table.tile_size);
                arm.head = next;
                arm.cells.push(next);
            }
            if rng.gen_bool(self.jitter_probability) {
                arm.heading = if rng.gen_bool(0.5) { arm.heading.rotate_cw() } else { arm.heading.rotate_ccw() };
            }
        }

        let [first_arm, second_arm] = arms;
        let mut path: Vec<Point> = first_arm.cells.into_iter().rev().collect();
        path.push(seed);
        path.extend(second_arm.cells);
        Some(path)
    }

    /// Paint `path` onto `map`, one template per position.
    ///
    /// Only templates covering exactly the claimed tile footprint are
    /// painted; anything else is skipped and recorded as `None`.
    pub fn paint<R: Rng + ?Sized>(&self, map: &mut Map, tileset: &Tileset, path: &[Point], rng: &mut R) -> Vec<Option<u16>> {
        let size = self.table.tile_size;
        classify_path(path)
            .into_iter()
            .zip(path)
            .map(|(conn, &origin)| {
                let variants = select_variants(self.table, conn);
                let id = *variants.choose(rng)?;
                let Some(template) = tileset.template(id) else {
                    log::warn!("tileset {} has no template {id} for cliff at {origin}", tileset.id);
                    return None;
                };
                if template.size != (size, size) {
                    log::warn!(
                        "cliff template {id} is {}x{}, not {size}x{size}; skipping {origin}",
                        template.size.0,
                        template.size.1
                    );
                    return None;
                }
                map.paint_template(origin, id, template);
                Some(id)
            })
            .collect()
    }

    /// Grow and paint one cliff.
    pub fn synthesize<R: Rng + ?Sized>(
        &self,
        map: &mut Map,
        tileset: &Tileset,
        occupancy: &mut OccupancyGrid,
        seed: Point,
        rng: &mut R,
    ) -> Option<CliffSegment> {
        let cells = self.grow(map, occupancy, seed, rng)?;
        let tiles = self.paint(map, tileset, &cells, rng);
        Some(CliffSegment { seed, cells, tiles })
    }
}

/// Connection for every position of a path; `None` for a lone seed.
pub fn classify_path(path: &[Point]) -> Vec<Option<Connection>> {
    (0..path.len())
        .map(|i| {
            let here = path[i];
            let prev = i.checked_sub(1).and_then(|j| Direction::between(here, path[j]));
            let next = path.get(i + 1).and_then(|&p| Direction::between(here, p));
            match (prev, next) {
                (Some(entry), Some(exit)) => Some(Connection::Interior { entry, exit }),
                (None, Some(exit)) => Some(Connection::Start { exit }),
                (Some(entry), None) => Some(Connection::End { entry }),
                (None, None) => None,
            }
        })
        .collect()
}

/// Tiles to draw from for a position. Anything the table does not cover
/// falls back to the default straight tiles.
pub fn select_variants(table: &ConnectionTable, conn: Option<Connection>) -> &[u16] {
    conn.and_then(|c| table.lookup(c)).unwrap_or_else(|| table.default_straight())
}
