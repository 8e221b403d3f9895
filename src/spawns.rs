//! Player spawn placement
//!
//! Two policies:
//! - ring: spawns evenly spaced on an ellipse around the map center, rotated
//!   by one random angle, so every player gets an equivalent position;
//! - scatter: the older approach of drawing random points and keeping those
//!   far enough from the others, retried in whole batches.

use std::f32::consts::TAU;

use rand::Rng;

use crate::geometry::{Point, Rect};
use crate::sampling::{is_far_from_all, random_location, sample_with_rejection, ATTEMPTS_PER_ITEM};

/// Whole-batch retries for the scatter policy.
pub const SCATTER_BATCH_RETRIES: usize = 20;

#[derive(Clone, Debug, PartialEq)]
pub struct SpawnPlan {
    pub requested: usize,
    pub locations: Vec<Point>,
}

impl SpawnPlan {
    pub fn shortfall(&self) -> usize {
        self.requested.saturating_sub(self.locations.len())
    }
}

/// Place `count` spawns on the ellipse inscribed in `bounds`, scaled to
/// `radius_pct` percent. Consumes exactly one random draw.
///
/// Points that fall outside `bounds`, or closer than `min_spacing` to a spawn
/// already kept, are dropped and show up as a shortfall.
pub fn plan_ring<R: Rng + ?Sized>(
    bounds: Rect,
    count: usize,
    radius_pct: i32,
    min_spacing: f32,
    rng: &mut R,
) -> SpawnPlan {
    let start = rng.gen::<f32>() * TAU;
    let mut locations = Vec::with_capacity(count);

    if count > 0 && !bounds.is_empty() {
        let (cx, cy) = bounds.center();
        let scale = radius_pct as f32 / 100.0;
        let rx = bounds.width() as f32 / 2.0 * scale;
        let ry = bounds.height() as f32 / 2.0 * scale;
        let step = TAU / count as f32;

        for i in 0..count {
            let angle = start + step * i as f32;
            let p = Point::new(
                (cx + rx * angle.cos()).floor() as i32,
                (cy + ry * angle.sin()).floor() as i32,
            );
            if !bounds.contains(p) {
                log::debug!("ring spawn {i} at {p} falls outside the map");
            } else if !is_far_from_all(p, min_spacing, &locations) {
                log::debug!("ring spawn {i} at {p} is too close to another spawn");
            } else {
                locations.push(p);
            }
        }
    }

    SpawnPlan {
        requested: count,
        locations,
    }
}

/// Scatter `count` spawns inside `area`, at least `2 * land_size` apart.
///
/// Whole batches are retried up to [`SCATTER_BATCH_RETRIES`] times; when
/// none succeeds the largest partial batch is kept.
pub fn plan_scatter<R: Rng + ?Sized>(area: Rect, count: usize, land_size: i32, rng: &mut R) -> SpawnPlan {
    let mut best: Vec<Point> = Vec::new();

    if !area.is_empty() {
        let min_distance = (land_size * 2) as f32;
        for _ in 0..SCATTER_BATCH_RETRIES {
            let batch = sample_with_rejection(
                count,
                ATTEMPTS_PER_ITEM,
                rng,
                |r| random_location(area, r),
                |p, accepted| is_far_from_all(p, min_distance, accepted),
            );
            if batch.len() == count {
                best = batch;
                break;
            }
            if batch.len() > best.len() {
                best = batch;
            }
        }
    }

    SpawnPlan {
        requested: count,
        locations: best,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ring_spacing_is_even() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let bounds = Rect::from_size(0, 0, 200, 200);
        let plan = plan_ring(bounds, 4, 50, 0.0, &mut rng);
        assert_eq!(plan.locations.len(), 4);
        assert_eq!(plan.shortfall(), 0);

        // On a circle, 90° spacing puts opposite spawns a diameter apart
        // and neighbours √2 radii apart.
        let l = &plan.locations;
        let radius = 50.0;
        for i in 0..4 {
            let opposite = l[i].distance_to(l[(i + 2) % 4]);
            let neighbour = l[i].distance_to(l[(i + 1) % 4]);
            assert!((opposite - 2.0 * radius).abs() <= 3.0, "opposite {opposite}");
            assert!((neighbour - radius * 2f32.sqrt()).abs() <= 3.0, "neighbour {neighbour}");
        }
    }

    #[test]
    fn test_ring_uses_one_draw() {
        let mut a = ChaCha8Rng::seed_from_u64(77);
        let mut b = ChaCha8Rng::seed_from_u64(77);
        plan_ring(Rect::from_size(0, 0, 64, 64), 6, 70, 0.0, &mut a);
        let _: f32 = b.gen();
        assert_eq!(a.gen::<u64>(), b.gen::<u64>());
    }

    #[test]
    fn test_ring_is_deterministic() {
        let bounds = Rect::from_size(1, 1, 96, 104);
        let a = plan_ring(bounds, 5, 70, 28.0, &mut ChaCha8Rng::seed_from_u64(3));
        let b = plan_ring(bounds, 5, 70, 28.0, &mut ChaCha8Rng::seed_from_u64(3));
        assert_eq!(a, b);
    }

    #[test]
    fn test_ring_drops_crowded_spawns() {
        let bounds = Rect::from_size(1, 1, 96, 104);
        let stacked = plan_ring(bounds, 4, 0, 28.0, &mut ChaCha8Rng::seed_from_u64(2));
        assert_eq!(stacked.locations.len(), 1);
        assert_eq!(stacked.shortfall(), 3);

        // Four spawns on this ring sit well under 28 cells apart.
        let small = plan_ring(Rect::from_size(1, 1, 32, 40), 4, 70, 28.0, &mut ChaCha8Rng::seed_from_u64(2));
        assert!(small.locations.len() < 4);
        for (i, a) in small.locations.iter().enumerate() {
            for b in &small.locations[i + 1..] {
                assert!(a.distance_to(*b) >= 28.0);
            }
        }
    }

    #[test]
    fn test_scatter_keeps_spacing() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let area = Rect::from_size(10, 10, 100, 100);
        let plan = plan_scatter(area, 4, 10, &mut rng);
        assert!(!plan.locations.is_empty());
        for (i, a) in plan.locations.iter().enumerate() {
            assert!(area.contains(*a));
            for b in &plan.locations[i + 1..] {
                assert!(a.distance_to(*b) >= 20.0);
            }
        }
    }

    #[test]
    fn test_scatter_reports_shortfall_when_crowded() {
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        // A 10×10 area cannot hold two points 40 apart.
        let plan = plan_scatter(Rect::from_size(0, 0, 10, 10), 3, 20, &mut rng);
        assert_eq!(plan.locations.len(), 1);
        assert_eq!(plan.shortfall(), 2);

        let empty = plan_scatter(Rect::from_size(0, 0, 0, 10), 3, 20, &mut rng);
        assert!(empty.locations.is_empty());
        assert_eq!(empty.shortfall(), 3);
    }
}
