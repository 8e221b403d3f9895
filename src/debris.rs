//! Decorative debris clusters

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::geometry::Point;
use crate::map::Map;
use crate::occupancy::OccupancyGrid;
use crate::tileset::Tileset;

pub struct DebrisScatterer<'a> {
    tiles: &'a [u16],
    per_group: usize,
    radius: i32,
}

impl<'a> DebrisScatterer<'a> {
    pub fn new(tiles: &'a [u16], per_group: usize, radius: i32) -> Self {
        Self {
            tiles,
            per_group,
            radius: radius.max(0),
        }
    }

    /// Try `per_group` single-cell tiles around `center` and return the cells painted.
    ///
    /// Each candidate sits at a random angle and distance within the cluster
    /// radius. Claimed or out-of-bounds candidates are skipped, not retried.
    pub fn scatter<R: Rng + ?Sized>(
        &self,
        map: &mut Map,
        tileset: &Tileset,
        occupancy: &mut OccupancyGrid,
        center: Point,
        rng: &mut R,
    ) -> Vec<Point> {
        let mut painted = Vec::new();
        if self.tiles.is_empty() {
            return painted;
        }

        for _ in 0..self.per_group {
            let angle = rng.gen::<f32>() * TAU;
            let distance = rng.gen_range(0..=self.radius) as f32;
            let p = center.offset_polar(distance, angle);
            let Some(&tile) = self.tiles.choose(rng) else {
                break;
            };

            if !map.contains(p) || occupancy.is_occupied(p) {
                continue;
            }

            let height = tileset.template(tile).map_or(0, |t| t.height);
            map.paint_cell(p, tile, height);
            occupancy.occupy_block(p, 1);
            painted.push(p);
        }

        painted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::Ruleset;
    use crate::tileset::TilesetCatalog;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_cluster_stays_within_radius() {
        let catalog = TilesetCatalog::builtin();
        let tileset = catalog.get("temperate").unwrap();
        let mut map = Map::new_empty(tileset, &Ruleset::builtin(), 48, 48);
        let (w, h) = map.grid_size();
        let mut occ = OccupancyGrid::new(w, h);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let center = Point::new(24, 24);

        let scatterer = DebrisScatterer::new(tileset.land_debris(), 20, 4);
        let painted = scatterer.scatter(&mut map, tileset, &mut occ, center, &mut rng);

        assert!(!painted.is_empty() && painted.len() <= 20);
        for p in &painted {
            assert!(p.distance_to(center) <= 4.5);
            let tile = map.tiles.get(*p).unwrap().template;
            assert!(tileset.land_debris().contains(&tile));
        }
        assert_eq!(occ.occupied_count(), painted.len());
    }

    #[test]
    fn test_claimed_cells_are_never_painted() {
        let catalog = TilesetCatalog::builtin();
        let tileset = catalog.get("temperate").unwrap();
        let mut map = Map::new_empty(tileset, &Ruleset::builtin(), 32, 32);
        let (w, h) = map.grid_size();
        let mut occ = OccupancyGrid::new(w, h);
        occ.occupy_disk(Point::new(16, 16), 2);
        let claimed: Vec<Point> = map.bounds.cells().filter(|p| occ.is_occupied(*p)).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(14);

        let scatterer = DebrisScatterer::new(tileset.land_debris(), 30, 3);
        let painted = scatterer.scatter(&mut map, tileset, &mut occ, Point::new(16, 16), &mut rng);

        assert!(painted.iter().all(|p| !claimed.contains(p)));
        for p in &claimed {
            assert_eq!(map.tiles.get(*p).unwrap().template, tileset.clear_template);
        }
        let mut unique = painted.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), painted.len());
    }

    #[test]
    fn test_debris_height_comes_from_template() {
        let catalog = TilesetCatalog::builtin();
        let tileset = catalog.get("desert").unwrap();
        let mut map = Map::new_empty(tileset, &Ruleset::builtin(), 32, 32);
        let (w, h) = map.grid_size();
        let mut occ = OccupancyGrid::new(w, h);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let raised = [302];
        let scatterer = DebrisScatterer::new(&raised, 4, 0);
        let painted = scatterer.scatter(&mut map, tileset, &mut occ, Point::new(10, 10), &mut rng);

        assert_eq!(painted, vec![Point::new(10, 10)]);
        assert_eq!(*map.heights.get(Point::new(10, 10)).unwrap(), 1);
    }

    #[test]
    fn test_no_tiles_paints_nothing() {
        let catalog = TilesetCatalog::builtin();
        let tileset = catalog.get("barren").unwrap();
        let mut map = Map::new_empty(tileset, &Ruleset::builtin(), 16, 16);
        let (w, h) = map.grid_size();
        let mut occ = OccupancyGrid::new(w, h);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let scatterer = DebrisScatterer::new(tileset.land_debris(), 6, 3);
        assert!(scatterer.scatter(&mut map, tileset, &mut occ, Point::new(8, 8), &mut rng).is_empty());
    }
}
