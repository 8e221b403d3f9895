use clap::Parser;
use rayon::prelude::*;

use skirmish_mapgen::ascii::{self, AsciiMode};
use skirmish_mapgen::export;
use skirmish_mapgen::generator::{GeneratedMap, MapGenerator};
use skirmish_mapgen::logging;
use skirmish_mapgen::rules::Ruleset;
use skirmish_mapgen::settings::{GenerationSettings, SpawnPolicy};
use skirmish_mapgen::tileset::TilesetCatalog;

#[derive(Parser, Debug)]
#[command(name = "skirmish_mapgen")]
#[command(about = "Generate random skirmish maps with spawns, resources, cliffs and debris")]
struct Args {
    /// Playable width in cells
    #[arg(short = 'W', long)]
    width: Option<i32>,

    /// Playable height in cells
    #[arg(short = 'H', long)]
    height: Option<i32>,

    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of players
    #[arg(short = 'p', long)]
    players: Option<usize>,

    /// Tileset id (e.g. temperate, desert, barren)
    #[arg(long)]
    tileset: Option<String>,

    /// Load generation settings from a JSON file (flags override it)
    #[arg(long)]
    settings: Option<String>,

    /// Load the actor/player ruleset from a JSON file
    #[arg(long)]
    ruleset: Option<String>,

    /// Load the tileset catalog from a JSON file
    #[arg(long)]
    tilesets: Option<String>,

    /// Scatter spawns randomly instead of placing them on a ring
    #[arg(long)]
    legacy_spawns: bool,

    /// Print the map as ASCII to stdout
    #[arg(long)]
    ascii: bool,

    /// Export the map and its statistics to a text file
    #[arg(long)]
    export_ascii: Option<String>,

    /// Export a PNG preview of the map
    #[arg(long)]
    export_png: Option<String>,

    /// Pixels per cell for the PNG preview
    #[arg(long, default_value = "4")]
    png_scale: u32,

    /// Generate this many maps with consecutive seeds, in parallel
    #[arg(long, default_value = "1")]
    batch: u64,

    /// Print the effective settings as JSON and exit
    #[arg(long)]
    dump_settings: bool,

    /// Log filter (RUST_LOG takes precedence)
    #[arg(long)]
    log_level: Option<String>,
}

impl Args {
    fn settings(&self) -> Result<GenerationSettings, Box<dyn std::error::Error>> {
        let mut settings = match &self.settings {
            Some(path) => GenerationSettings::load(path)?,
            None => GenerationSettings::default(),
        };
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(players) = self.players {
            settings.player_num = players;
        }
        if let Some(tileset) = &self.tileset {
            settings.tileset = tileset.clone();
        }
        if self.legacy_spawns {
            settings.spawn_policy = SpawnPolicy::Scatter;
        }
        Ok(settings.sanitized())
    }
}

fn summary(seed: u64, generated: &GeneratedMap) -> String {
    let r = &generated.report;
    if let Some(missing) = &r.aborted {
        return format!("seed {seed}: aborted ({missing})");
    }
    format!(
        "seed {seed}: {}/{} spawns, {} mines, {} resource cells, {} cliffs, {} debris tiles",
        r.spawns_placed,
        r.spawns_requested,
        r.starting_mines + r.extra_mines,
        r.resource_cells,
        r.cliffs,
        r.debris_tiles
    )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(args.log_level.as_deref());

    let settings = args.settings()?;
    if args.dump_settings {
        println!("{}", serde_json::to_string_pretty(&settings)?);
        return Ok(());
    }

    let rules = match &args.ruleset {
        Some(path) => Ruleset::load(path)?,
        None => Ruleset::builtin(),
    };
    let catalog = match &args.tilesets {
        Some(path) => TilesetCatalog::load(path)?,
        None => TilesetCatalog::builtin(),
    };
    let tileset = catalog.get(&settings.tileset).inspect_err(|_| {
        println!("Available tilesets: {}", catalog.ids().collect::<Vec<_>>().join(", "));
    })?;

    // Initialize seed
    let seed = args.seed.unwrap_or_else(rand::random);

    if args.batch > 1 {
        println!("Generating {} maps from seed {}", args.batch, seed);
        let results: Vec<(u64, GeneratedMap)> = (seed..seed.saturating_add(args.batch))
            .into_par_iter()
            .map(|s| (s, MapGenerator::new(&rules, tileset, settings.clone()).generate_seeded(s)))
            .collect();
        for (s, generated) in &results {
            println!("{}", summary(*s, generated));
        }
        return Ok(());
    }

    println!("Generating map with seed: {}", seed);
    println!(
        "Map size: {}x{}, tileset {}, {} players ({} spawns)",
        settings.width, settings.height, settings.tileset, settings.player_num, settings.spawn_policy
    );

    let generator = MapGenerator::new(&rules, tileset, settings);
    let generated = generator.generate_seeded(seed);
    println!("{}", summary(seed, &generated));

    if generated.report.spawn_shortfall() > 0 {
        println!(
            "Warning: only {} of {} players could be placed",
            generated.report.spawns_placed, generated.report.spawns_requested
        );
    }

    if args.ascii {
        ascii::print_ascii_map(&generated.map, tileset, &rules, AsciiMode::Terrain);
        print!("{}", ascii::legend());
    }

    if let Some(path) = &args.export_ascii {
        println!("Exporting map to {}...", path);
        ascii::export_map_file(&generated, tileset, &rules, seed, path)?;
    }

    if let Some(path) = &args.export_png {
        println!("Exporting preview to {}...", path);
        export::export_preview(&generated.map, tileset, &rules, args.png_scale, path)?;
    }

    println!("Done!");
    Ok(())
}
