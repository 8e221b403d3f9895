//! Debug tool for checking the Poisson disk sampler
//! Samples a rectangle at several spacings and compares counts with the packing estimate

use std::f32::consts::PI;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use skirmish_mapgen::geometry::{Point, Rect};
use skirmish_mapgen::logging;
use skirmish_mapgen::sampling::{PoissonSampler, RectRegion};

const WIDTH: i32 = 60;
const HEIGHT: i32 = 60;
const SEED: u64 = 42;

fn min_pairwise_distance(points: &[Point]) -> Option<f32> {
    let mut min: Option<f32> = None;
    for (i, a) in points.iter().enumerate() {
        for b in &points[i + 1..] {
            let d = a.distance_to(*b);
            min = Some(min.map_or(d, |m| m.min(d)));
        }
    }
    min
}

fn main() {
    logging::init(None);
    println!("Sampling a {}x{} region (seed {})", WIDTH, HEIGHT, SEED);

    let region = RectRegion(Rect::from_size(0, 0, WIDTH, HEIGHT));
    for fan_out in [6, 12, 30] {
        let sampler = PoissonSampler::new(fan_out);
        for min_distance in [4.0f32, 8.0, 12.0, 20.0] {
            let mut rng = ChaCha8Rng::seed_from_u64(SEED);
            let points = sampler.generate(&region, min_distance, &mut rng);
            let expected = (WIDTH * HEIGHT) as f32 / (PI * (min_distance / 2.0).powi(2));
            let min = min_pairwise_distance(&points)
                .map(|d| format!("{:.2}", d))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "fan-out {:>2}  d={:>4.1}  points {:>4}  estimate {:>6.1}  min distance {}",
                fan_out,
                min_distance,
                points.len(),
                expected,
                min
            );
        }
    }
}
