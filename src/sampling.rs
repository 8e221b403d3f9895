//! Point sampling
//!
//! Two tools live here:
//! - [`PoissonSampler`]: blue-noise dart throwing with an active list and a
//!   background grid for constant-time neighbourhood checks.
//! - [`sample_with_rejection`]: the bounded draw/test/accept loop every
//!   placement stage (spawns, mines, extra deposits) is built on.

use std::f32::consts::{SQRT_2, TAU};

use rand::Rng;

use crate::geometry::{Point, Rect};
use crate::map::Map;

/// Attempts each item gets in [`sample_with_rejection`] before the batch stops.
pub const ATTEMPTS_PER_ITEM: usize = 10;

/// Default number of candidates tried around each active point.
pub const DEFAULT_FAN_OUT: usize = 6;

/// An area of cell space points may be sampled in.
pub trait Region {
    /// Smallest rectangle containing every cell of the region.
    fn bounding_box(&self) -> Rect;

    fn contains(&self, p: Point) -> bool;

    /// A uniformly chosen cell of the region, or `None` if it has none.
    fn random_cell<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Point> {
        let bbox = self.bounding_box();
        if bbox.is_empty() {
            return None;
        }
        // Rejection against the bounding box keeps the draw uniform for
        // non-rectangular regions.
        for _ in 0..64 {
            let p = Point::new(rng.gen_range(bbox.left..bbox.right), rng.gen_range(bbox.top..bbox.bottom));
            if self.contains(p) {
                return Some(p);
            }
        }
        None
    }
}

/// A plain rectangle of cells.
#[derive(Clone, Copy, Debug)]
pub struct RectRegion(pub Rect);

impl Region for RectRegion {
    fn bounding_box(&self) -> Rect {
        self.0
    }

    fn contains(&self, p: Point) -> bool {
        self.0.contains(p)
    }
}

/// The playable cells of a map, kept `edge_distance` cells away from its edge.
pub struct MapRegion<'a> {
    map: &'a Map,
    inner: Rect,
}

impl<'a> MapRegion<'a> {
    pub fn new(map: &'a Map, edge_distance: i32) -> Self {
        Self {
            map,
            inner: map.bounds.inset(edge_distance),
        }
    }
}

impl Region for MapRegion<'_> {
    fn bounding_box(&self) -> Rect {
        self.inner
    }

    fn contains(&self, p: Point) -> bool {
        self.inner.contains(p) && self.map.contains(p)
    }
}

/// Grid of at most one sample per slot, slot size `min_distance / √2`.
struct BackgroundGrid {
    origin: Point,
    cell_size: f32,
    cols: i32,
    rows: i32,
    slots: Vec<Option<Point>>,
}

impl BackgroundGrid {
    fn new(bbox: Rect, min_distance: f32) -> Self {
        let cell_size = min_distance / SQRT_2;
        let cols = ((bbox.width() as f32 / cell_size).ceil() as i32).max(1);
        let rows = ((bbox.height() as f32 / cell_size).ceil() as i32).max(1);
        Self {
            origin: Point::new(bbox.left, bbox.top),
            cell_size,
            cols,
            rows,
            slots: vec![None; (cols * rows) as usize],
        }
    }

    fn slot_of(&self, p: Point) -> (i32, i32) {
        (
            ((p.x - self.origin.x) as f32 / self.cell_size).floor() as i32,
            ((p.y - self.origin.y) as f32 / self.cell_size).floor() as i32,
        )
    }

    fn slot_index(&self, gx: i32, gy: i32) -> Option<usize> {
        if gx >= 0 && gy >= 0 && gx < self.cols && gy < self.rows {
            Some((gy * self.cols + gx) as usize)
        } else {
            None
        }
    }

    fn insert(&mut self, p: Point) {
        let (gx, gy) = self.slot_of(p);
        if let Some(i) = self.slot_index(gx, gy) {
            self.slots[i] = Some(p);
        }
    }

    /// True if a stored sample closer than `min_distance` sits in the 5×5 slot neighbourhood.
    fn has_neighbour_within(&self, p: Point, min_distance: f32) -> bool {
        let (gx, gy) = self.slot_of(p);
        for y in gy - 2..=gy + 2 {
            for x in gx - 2..=gx + 2 {
                let Some(i) = self.slot_index(x, y) else { continue };
                if let Some(q) = self.slots[i] {
                    if q.distance_to(p) < min_distance {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Blue-noise point sampler.
#[derive(Clone, Copy, Debug)]
pub struct PoissonSampler {
    /// Candidates tried around each active point before it retires.
    pub fan_out: usize,
}

impl Default for PoissonSampler {
    fn default() -> Self {
        Self { fan_out: DEFAULT_FAN_OUT }
    }
}

impl PoissonSampler {
    pub fn new(fan_out: usize) -> Self {
        Self { fan_out }
    }

    /// Fill `region` with points at least `min_distance` apart.
    ///
    /// Regions too small for even a seed point yield an empty list.
    pub fn generate<G, R>(&self, region: &G, min_distance: f32, rng: &mut R) -> Vec<Point>
    where
        G: Region,
        R: Rng + ?Sized,
    {
        let min_distance = min_distance.max(1.0);
        let mut samples = Vec::new();

        let bbox = region.bounding_box();
        let Some(first) = region.random_cell(rng) else {
            return samples;
        };

        let mut grid = BackgroundGrid::new(bbox, min_distance);
        let mut active = vec![first];
        samples.push(first);
        grid.insert(first);

        while !active.is_empty() {
            let idx = rng.gen_range(0..active.len());
            let point = active.swap_remove(idx);

            for _ in 0..self.fan_out {
                let radius = min_distance * (rng.gen::<f32>() + 1.0);
                let angle = TAU * rng.gen::<f32>();
                let candidate = point.offset_polar(radius, angle);

                if region.contains(candidate) && !grid.has_neighbour_within(candidate, min_distance) {
                    active.push(candidate);
                    samples.push(candidate);
                    grid.insert(candidate);
                }
            }
        }

        log::debug!(
            "poisson sampler placed {} points in {}x{} (min distance {:.1})",
            samples.len(),
            bbox.width(),
            bbox.height(),
            min_distance
        );
        samples
    }
}

/// Draw up to `count` points, giving each `attempts_per_item` draws.
///
/// A draw is kept when `accept(candidate, accepted_so_far)` holds. The batch
/// stops at the first item that exhausts its attempts, so the result may be
/// shorter than `count`.
pub fn sample_with_rejection<R, D, A>(
    count: usize,
    attempts_per_item: usize,
    rng: &mut R,
    mut draw: D,
    mut accept: A,
) -> Vec<Point>
where
    R: Rng + ?Sized,
    D: FnMut(&mut R) -> Point,
    A: FnMut(Point, &[Point]) -> bool,
{
    let mut accepted = Vec::with_capacity(count);
    for _ in 0..count {
        let mut placed = false;
        for _ in 0..attempts_per_item {
            let candidate = draw(rng);
            if accept(candidate, &accepted) {
                accepted.push(candidate);
                placed = true;
                break;
            }
        }
        if !placed {
            break;
        }
    }
    accepted
}

/// True when `p` is at least `min_distance` from every point in `others`.
pub fn is_far_from_all(p: Point, min_distance: f32, others: &[Point]) -> bool {
    others.iter().all(|&o| o.distance_to(p) >= min_distance)
}

/// Uniform cell inside `bounds` (which must not be empty).
pub fn random_location<R: Rng + ?Sized>(bounds: Rect, rng: &mut R) -> Point {
    Point::new(rng.gen_range(bounds.left..bounds.right), rng.gen_range(bounds.top..bounds.bottom))
}
