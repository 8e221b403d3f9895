//! Map assembly
//!
//! A run builds an empty map and then fills it in a fixed order, all from one
//! random stream:
//!
//! 1. spawn points
//! 2. starting deposits around each spawn
//! 3. cliffs
//! 4. debris
//! 5. extra deposits away from every base
//! 6. one player record per placed spawn
//!
//! Every stage claims the cells it uses in the run's occupancy grid, so later
//! stages work around earlier ones. Nothing here fails: when space runs out a
//! stage places fewer items and the shortfall shows up in the report.

use std::f32::consts::TAU;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::cliffs::CliffSynthesizer;
use crate::debris::DebrisScatterer;
use crate::error::CatalogError;
use crate::geometry::Point;
use crate::map::Map;
use crate::occupancy::OccupancyGrid;
use crate::resources::{ResourcePlacer, RetryBudget};
use crate::rules::{MissingPrerequisite, PlayerReference, Prerequisites, Ruleset};
use crate::sampling::{
    is_far_from_all, random_location, sample_with_rejection, MapRegion, PoissonSampler, ATTEMPTS_PER_ITEM,
};
use crate::settings::{GenerationSettings, SpawnPolicy};
use crate::spawns::{plan_ring, plan_scatter};
use crate::tileset::{Tileset, TilesetCatalog};

/// State owned by one run and threaded through every stage.
pub struct GenerationContext {
    pub occupancy: OccupancyGrid,
    next_actor: usize,
}

impl GenerationContext {
    pub fn new(map: &Map) -> Self {
        let (w, h) = map.grid_size();
        Self {
            occupancy: OccupancyGrid::new(w, h),
            next_actor: 0,
        }
    }

    /// Next unique actor id of the run: `Actor0`, `Actor1`, ...
    pub fn next_actor_id(&mut self) -> String {
        let id = format!("Actor{}", self.next_actor);
        self.next_actor += 1;
        id
    }
}

/// What a run managed to place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationReport {
    pub spawns_requested: usize,
    pub spawns_placed: usize,
    pub starting_mines: usize,
    pub extra_mines_requested: usize,
    pub extra_mines: usize,
    pub resource_cells: usize,
    pub cliffs: usize,
    pub cliff_tiles: usize,
    pub debris_tiles: usize,
    /// Set when the ruleset lacked something the run needs; the map is then empty.
    pub aborted: Option<MissingPrerequisite>,
}

impl GenerationReport {
    pub fn spawn_shortfall(&self) -> usize {
        self.spawns_requested.saturating_sub(self.spawns_placed)
    }
}

#[derive(Clone, Debug)]
pub struct GeneratedMap {
    pub map: Map,
    pub report: GenerationReport,
}

pub struct MapGenerator<'a> {
    rules: &'a Ruleset,
    tileset: &'a Tileset,
    settings: GenerationSettings,
}

impl<'a> MapGenerator<'a> {
    pub fn new(rules: &'a Ruleset, tileset: &'a Tileset, settings: GenerationSettings) -> Self {
        Self { rules, tileset, settings }
    }

    /// Run with a fresh stream seeded from `seed`.
    pub fn generate_seeded(&self, seed: u64) -> GeneratedMap {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(&mut rng)
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> GeneratedMap {
        let s = &self.settings;
        let mut map = Map::new_empty(self.tileset, self.rules, s.width, s.height);
        let mut report = GenerationReport {
            spawns_requested: s.player_num,
            extra_mines_requested: s.extra_mine_num,
            ..Default::default()
        };

        let pre = match self.rules.resolve_prerequisites() {
            Ok(pre) => pre,
            Err(missing) => {
                log::warn!("Map generation aborted: {missing}");
                report.aborted = Some(missing);
                return GeneratedMap { map, report };
            }
        };

        log::info!(
            "Generating {}x{} {} map for {} players",
            s.width,
            s.height,
            self.tileset.id,
            s.player_num
        );

        let mut ctx = GenerationContext::new(&map);
        let spawns = self.place_spawns(&mut map, &mut ctx, &pre, rng);
        report.spawns_placed = spawns.len();

        report.starting_mines = self.place_starting_mines(&mut map, &mut ctx, &pre, &spawns, rng);
        (report.cliffs, report.cliff_tiles) = self.place_cliffs(&mut map, &mut ctx, rng);
        report.debris_tiles = self.scatter_debris(&mut map, &mut ctx, rng);
        report.extra_mines = self.place_extra_mines(&mut map, &mut ctx, &pre, &spawns, rng);
        report.resource_cells = map.resource_cell_count();

        self.add_players(&mut map, spawns.len());

        log::info!(
            "Placed {} spawns, {} mines ({} resource cells), {} cliffs, {} debris tiles",
            report.spawns_placed,
            report.starting_mines + report.extra_mines,
            report.resource_cells,
            report.cliffs,
            report.debris_tiles
        );
        GeneratedMap { map, report }
    }

    fn place_spawns<R: Rng + ?Sized>(
        &self,
        map: &mut Map,
        ctx: &mut GenerationContext,
        pre: &Prerequisites,
        rng: &mut R,
    ) -> Vec<Point> {
        let s = &self.settings;
        let land = s.player_land_size();
        let plan = match s.spawn_policy {
            SpawnPolicy::Ring => plan_ring(map.bounds, s.player_num, s.player_radius_pct, (land * 2) as f32, rng),
            SpawnPolicy::Scatter => plan_scatter(map.bounds.inset(land), s.player_num, land, rng),
        };

        if plan.shortfall() > 0 {
            log::warn!(
                "Couldn't place all players: {} of {} spawns placed",
                plan.locations.len(),
                plan.requested
            );
        }

        for &spawn in &plan.locations {
            let id = ctx.next_actor_id();
            map.add_actor(id, &pre.spawn_actor, &self.rules.neutral_player, spawn);
            ctx.occupancy.occupy_disk(spawn, land);
        }
        plan.locations
    }

    fn place_starting_mines<R: Rng + ?Sized>(
        &self,
        map: &mut Map,
        ctx: &mut GenerationContext,
        pre: &Prerequisites,
        spawns: &[Point],
        rng: &mut R,
    ) -> usize {
        let s = &self.settings;
        let distance = s.starting_mine_distance as f32;
        let inter_distance = s.starting_mine_inter_distance as f32;
        let placer = ResourcePlacer::new(&pre.resource, RetryBudget::Routine);
        let mut placed = 0;

        for &spawn in spawns {
            let mines = sample_with_rejection(
                s.starting_mine_num,
                ATTEMPTS_PER_ITEM,
                rng,
                |r| spawn.offset_polar(distance, r.gen::<f32>() * TAU),
                |p, accepted| map.contains(p) && is_far_from_all(p, inter_distance, accepted),
            );
            if mines.len() < s.starting_mine_num {
                log::debug!("spawn at {spawn} got {} of {} starting mines", mines.len(), s.starting_mine_num);
            }

            for mine in mines {
                let id = ctx.next_actor_id();
                map.add_actor(id, &pre.mine_actor, &self.rules.neutral_player, mine);
                placer.place_deposit(map, &mut ctx.occupancy, mine, s.starting_mine_size, true, rng);
                placed += 1;
            }
        }
        placed
    }

    /// Returns (cliffs grown, tiles painted).
    fn place_cliffs<R: Rng + ?Sized>(&self, map: &mut Map, ctx: &mut GenerationContext, rng: &mut R) -> (usize, usize) {
        let s = &self.settings;
        let Some(table) = self.tileset.cliffs.as_ref() else {
            log::debug!("tileset {} has no cliffs", self.tileset.id);
            return (0, 0);
        };
        if s.cliff_num == 0 {
            return (0, 0);
        }

        let sampler = PoissonSampler::new(s.sampler_fan_out);
        let mut seeds = sampler.generate(&MapRegion::new(map, s.edge_distance), s.cliff_spacing(), rng);
        seeds.shuffle(rng);

        let synth = CliffSynthesizer::new(
            table,
            s.cliff_avg_length,
            s.cliff_length_variance,
            s.cliff_jitter_probability(),
        );
        let mut cliffs = 0;
        let mut tiles = 0;
        for seed in seeds {
            if cliffs == s.cliff_num {
                break;
            }
            if let Some(segment) = synth.synthesize(map, self.tileset, &mut ctx.occupancy, seed, rng) {
                cliffs += 1;
                tiles += segment.tiles.iter().flatten().count();
            }
        }

        if cliffs < s.cliff_num {
            log::warn!("Only {} of {} cliffs fit on the map", cliffs, s.cliff_num);
        }
        (cliffs, tiles)
    }

    fn scatter_debris<R: Rng + ?Sized>(&self, map: &mut Map, ctx: &mut GenerationContext, rng: &mut R) -> usize {
        let s = &self.settings;
        let tiles = self.tileset.land_debris();
        if tiles.is_empty() || s.debris_num_groups == 0 {
            return 0;
        }

        let sampler = PoissonSampler::new(s.sampler_fan_out);
        let mut centers = sampler.generate(&MapRegion::new(map, s.edge_distance), s.debris_spacing(), rng);
        centers.shuffle(rng);

        let scatterer = DebrisScatterer::new(tiles, s.debris_num_per_group, s.debris_group_size);
        let centers: Vec<Point> = centers
            .into_iter()
            .filter(|c| !ctx.occupancy.is_occupied(*c))
            .take(s.debris_num_groups)
            .collect();

        let mut painted = 0;
        for center in centers {
            painted += scatterer.scatter(map, self.tileset, &mut ctx.occupancy, center, rng).len();
        }
        painted
    }

    fn place_extra_mines<R: Rng + ?Sized>(
        &self,
        map: &mut Map,
        ctx: &mut GenerationContext,
        pre: &Prerequisites,
        spawns: &[Point],
        rng: &mut R,
    ) -> usize {
        let s = &self.settings;
        let land = s.player_land_size();
        let area = map.bounds.inset(land);
        if s.extra_mine_num == 0 || area.is_empty() {
            return 0;
        }

        let spacing = s.extra_mine_distance as f32;
        let base_clearance = land as f32;
        let occupancy = &ctx.occupancy;
        let mines = sample_with_rejection(
            s.extra_mine_num,
            ATTEMPTS_PER_ITEM,
            rng,
            |r| random_location(area, r),
            |p, accepted| {
                !occupancy.is_occupied(p)
                    && is_far_from_all(p, base_clearance, spawns)
                    && is_far_from_all(p, spacing, accepted)
            },
        );
        if mines.len() < s.extra_mine_num {
            log::warn!("Only {} of {} extra mines fit on the map", mines.len(), s.extra_mine_num);
        }

        let placer = ResourcePlacer::new(&pre.resource, RetryBudget::Tight);
        let mut placed = 0;
        for mine in mines {
            // An earlier deposit of this stage may have grown over the seed.
            if ctx.occupancy.is_occupied(mine) {
                log::debug!("extra mine at {mine} was overgrown, skipping");
                continue;
            }
            let id = ctx.next_actor_id();
            map.add_actor(id, &pre.mine_actor, &self.rules.neutral_player, mine);
            placer.place_deposit(map, &mut ctx.occupancy, mine, s.extra_mine_size, false, rng);
            placed += 1;
        }
        placed
    }

    /// One playable `Multi<i>` per placed spawn, all enemies of the creeps.
    fn add_players(&self, map: &mut Map, count: usize) {
        let creeps = &self.rules.creep_player;
        let names: Vec<String> = (0..count).map(|i| format!("Multi{i}")).collect();
        for name in &names {
            map.players.add(PlayerReference {
                name: name.clone(),
                playable: true,
                faction: "Random".to_string(),
                enemies: vec![creeps.clone()],
                ..Default::default()
            });
        }
        if let Some(creep) = map.players.get_mut(creeps) {
            creep.enemies = names;
        }
    }
}

/// Look up the settings' tileset in `catalog` and run once with `seed`.
pub fn generate_map(
    settings: &GenerationSettings,
    rules: &Ruleset,
    catalog: &TilesetCatalog,
    seed: u64,
) -> Result<GeneratedMap, CatalogError> {
    let tileset = catalog.get(&settings.tileset)?;
    Ok(MapGenerator::new(rules, tileset, settings.clone()).generate_seeded(seed))
}
