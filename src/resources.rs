//! Resource deposit placement
//!
//! A deposit grows one cell at a time. Each cell is found by a short
//! self-avoiding random walk from the deposit seed that stops at the first
//! cell able to take a resource, so deposits come out as irregular blobs
//! that flow around obstacles.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::{Point, NEIGHBOURS_8};
use crate::map::{Map, ResourceTile};
use crate::occupancy::OccupancyGrid;
use crate::rules::ResourceTypeInfo;

/// How many walks a single deposit cell gets before the deposit stops growing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryBudget {
    /// Placement that should succeed when at all possible.
    Routine,
    /// Bulk placement where giving up early is acceptable.
    Tight,
}

impl RetryBudget {
    pub fn walks_per_cell(self) -> usize {
        match self {
            RetryBudget::Routine => 10,
            RetryBudget::Tight => 3,
        }
    }
}

pub struct ResourcePlacer<'a> {
    pub resource: &'a ResourceTypeInfo,
    pub budget: RetryBudget,
}

impl<'a> ResourcePlacer<'a> {
    pub fn new(resource: &'a ResourceTypeInfo, budget: RetryBudget) -> Self {
        Self { resource, budget }
    }

    /// Grow a deposit of up to `size` cells around `seed` and return the cells written.
    ///
    /// Starting deposits sit inside a player's claimed base area, so they
    /// ignore occupancy; every other deposit only grows onto unclaimed cells.
    /// Written cells are claimed afterwards either way.
    pub fn place_deposit<R: Rng + ?Sized>(
        &self,
        map: &mut Map,
        occupancy: &mut OccupancyGrid,
        seed: Point,
        size: usize,
        is_starting_deposit: bool,
        rng: &mut R,
    ) -> Vec<Point> {
        let tile = ResourceTile {
            kind: self.resource.id,
            density: self.resource.max_density,
        };
        let mut written = Vec::with_capacity(size);

        for _ in 0..size {
            let mut cell = None;
            for _ in 0..self.budget.walks_per_cell() {
                cell = walk_to_free_cell(map, occupancy, seed, size, is_starting_deposit, rng);
                if cell.is_some() {
                    break;
                }
            }
            let Some(cell) = cell else {
                log::debug!("deposit at {seed} stopped at {} of {size} cells", written.len());
                break;
            };

            map.resources.set(cell, tile);
            occupancy.occupy_block(cell, 1);
            written.push(cell);
        }

        written
    }
}

fn can_take_resource(map: &Map, occupancy: &OccupancyGrid, p: Point, ignore_occupancy: bool) -> bool {
    map.contains(p) && !map.has_resource(p) && (ignore_occupancy || !occupancy.is_occupied(p))
}

/// Self-avoiding walk from `seed` taking at most `max_steps` steps. The seed
/// and every cell stepped onto are checked, and the first that can take a
/// resource is returned. `None` if the walk ends without finding one.
fn walk_to_free_cell<R: Rng + ?Sized>(
    map: &Map,
    occupancy: &OccupancyGrid,
    seed: Point,
    max_steps: usize,
    ignore_occupancy: bool,
    rng: &mut R,
) -> Option<Point> {
    let mut visited = HashSet::with_capacity(max_steps + 1);
    let mut current = seed;

    for steps in 0..=max_steps {
        if can_take_resource(map, occupancy, current, ignore_occupancy) {
            return Some(current);
        }
        if steps == max_steps {
            break;
        }
        visited.insert(current);

        let options: Vec<Point> = NEIGHBOURS_8
            .iter()
            .map(|&d| current + d)
            .filter(|p| !visited.contains(p))
            .collect();
        let Some(&next) = options.choose(rng) else {
            break;
        };
        current = next;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Ruleset;
    use crate::tileset::TilesetCatalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(width: i32, height: i32) -> (Map, OccupancyGrid, ResourceTypeInfo) {
        let rules = Ruleset::builtin();
        let catalog = TilesetCatalog::builtin();
        let map = Map::new_empty(catalog.get("temperate").unwrap(), &rules, width, height);
        let (w, h) = map.grid_size();
        let ore = rules.resource_type("Ore").unwrap().clone();
        (map, OccupancyGrid::new(w, h), ore)
    }

    fn chebyshev(a: Point, b: Point) -> i32 {
        (a.x - b.x).abs().max((a.y - b.y).abs())
    }

    #[test]
    fn test_starting_deposit_size_and_reach() {
        for seed in 0..10 {
            let (mut map, mut occ, ore) = setup(64, 64);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let center = Point::new(32, 32);
            // A claimed base must not block a starting deposit.
            occ.occupy_disk(center, 12);

            let placer = ResourcePlacer::new(&ore, RetryBudget::Routine);
            let cells = placer.place_deposit(&mut map, &mut occ, center, 32, true, &mut rng);

            assert!(!cells.is_empty() && cells.len() <= 32, "{} cells", cells.len());
            assert_eq!(cells[0], center);
            assert!(cells.iter().all(|c| chebyshev(*c, center) <= 32));
            assert_eq!(map.resource_cell_count(), cells.len());
            let unique: HashSet<Point> = cells.iter().copied().collect();
            assert_eq!(unique.len(), cells.len());
            let tile = map.resources.get(center).unwrap();
            assert_eq!(tile.kind, ore.id);
            assert_eq!(tile.density, ore.max_density);
        }
    }

    #[test]
    fn test_routine_deposit_avoids_claimed_cells() {
        let (mut map, mut occ, ore) = setup(64, 64);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        occ.occupy_block(Point::new(20, 20), 6);
        let before: Vec<Point> = map.bounds.cells().filter(|p| occ.is_occupied(*p)).collect();

        let placer = ResourcePlacer::new(&ore, RetryBudget::Tight);
        let cells = placer.place_deposit(&mut map, &mut occ, Point::new(23, 26), 20, false, &mut rng);

        assert!(!cells.is_empty());
        assert!(cells.iter().all(|c| !before.contains(c)));
        assert!(cells.iter().all(|c| occ.is_occupied(*c)));
    }

    #[test]
    fn test_existing_resources_are_not_overwritten() {
        let (mut map, mut occ, ore) = setup(32, 32);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let gems = ResourceTile { kind: 2, density: 3 };
        map.resources.set(Point::new(10, 10), gems);

        let placer = ResourcePlacer::new(&ore, RetryBudget::Routine);
        let cells = placer.place_deposit(&mut map, &mut occ, Point::new(10, 10), 8, true, &mut rng);

        assert!(!cells.contains(&Point::new(10, 10)));
        assert_eq!(*map.resources.get(Point::new(10, 10)).unwrap(), gems);
    }

    #[test]
    fn test_single_cell_deposit_steps_off_a_taken_seed() {
        for seed in 0..5 {
            let (mut map, mut occ, ore) = setup(32, 32);
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let center = Point::new(10, 10);
            map.resources.set(center, ResourceTile { kind: 2, density: 3 });

            let placer = ResourcePlacer::new(&ore, RetryBudget::Tight);
            let cells = placer.place_deposit(&mut map, &mut occ, center, 1, true, &mut rng);

            assert_eq!(cells.len(), 1);
            assert_eq!(chebyshev(cells[0], center), 1);
            assert_eq!(map.resource_cell_count(), 2);
        }
    }

    #[test]
    fn test_deposit_outside_bounds_writes_nothing() {
        let (mut map, mut occ, ore) = setup(16, 16);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let placer = ResourcePlacer::new(&ore, RetryBudget::Tight);
        // Too far from the playable area for a 4-step walk to reach it.
        let cells = placer.place_deposit(&mut map, &mut occ, Point::new(-20, -20), 4, true, &mut rng);
        assert!(cells.is_empty());
        assert_eq!(map.resource_cell_count(), 0);
    }
}
