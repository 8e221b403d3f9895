//! ASCII rendering and export for generated maps
//!
//! Provides functions to render a map as text and export it to a file.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};

use chrono::Local;

use crate::generator::GeneratedMap;
use crate::geometry::Point;
use crate::map::Map;
use crate::rules::Ruleset;
use crate::tileset::{TileClass, Tileset};

/// ASCII rendering modes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AsciiMode {
    /// Terrain features, resources and actors
    Terrain,
    /// Height per cell, 0-9
    Height,
}

impl AsciiMode {
    pub fn name(&self) -> &'static str {
        match self {
            AsciiMode::Terrain => "Terrain",
            AsciiMode::Height => "Height",
        }
    }

    pub fn all() -> &'static [AsciiMode] {
        &[AsciiMode::Terrain, AsciiMode::Height]
    }
}

/// Get ASCII character for a painted tile
pub fn tile_char(class: TileClass) -> char {
    match class {
        TileClass::Clear => '.',
        TileClass::Cliff => '#',
        TileClass::Debris => '%',
        TileClass::Other => '?',
    }
}

pub fn height_char(height: u8) -> char {
    char::from_digit(height.min(9) as u32, 10).unwrap_or('9')
}

/// Characters drawn over the terrain for actors: spawns by index, mines as `M`.
fn actor_overlay(map: &Map, rules: &Ruleset) -> HashMap<Point, char> {
    let mut overlay = HashMap::new();
    let mut spawn_index = 0;
    for actor in &map.actors {
        let ch = if actor.actor_type == rules.spawn_actor {
            let ch = char::from_digit(spawn_index % 36, 36).unwrap_or('P');
            spawn_index += 1;
            ch
        } else if rules.actors.get(&actor.actor_type).is_some_and(|a| a.seeds_resource.is_some()) {
            'M'
        } else {
            'A'
        };
        overlay.insert(actor.location, ch);
    }
    overlay
}

/// Render a map to ASCII string. Cells outside the playable bounds are blank.
pub fn render_ascii_map(map: &Map, tileset: &Tileset, rules: &Ruleset, mode: AsciiMode) -> String {
    let (width, height) = map.grid_size();
    let overlay = match mode {
        AsciiMode::Terrain => actor_overlay(map, rules),
        AsciiMode::Height => HashMap::new(),
    };
    let mut result = String::with_capacity((width + 1) * height);

    for y in 0..height as i32 {
        for x in 0..width as i32 {
            let p = Point::new(x, y);
            let ch = if !map.contains(p) {
                ' '
            } else {
                match mode {
                    AsciiMode::Terrain => match overlay.get(&p) {
                        Some(&ch) => ch,
                        None if map.has_resource(p) => '$',
                        None => map.tiles.get(p).map_or(' ', |t| tile_char(tileset.classify(t.template))),
                    },
                    AsciiMode::Height => map.heights.get(p).map_or(' ', |h| height_char(*h)),
                }
            };
            result.push(ch);
        }
        result.push('\n');
    }

    result
}

pub fn legend() -> String {
    let mut legend = String::new();
    legend.push_str("=== LEGEND ===\n");
    legend.push_str("  . Clear        # Cliff       % Debris      ? Other\n");
    legend.push_str("  $ Resource     M Mine        0-9,a-z Spawn\n");
    legend
}

/// Print ASCII map to stdout
pub fn print_ascii_map(map: &Map, tileset: &Tileset, rules: &Ruleset, mode: AsciiMode) {
    print!("{}", render_ascii_map(map, tileset, rules, mode));
}

/// Export a generated map and its report to a text file
pub fn export_map_file(
    generated: &GeneratedMap,
    tileset: &Tileset,
    rules: &Ruleset,
    seed: u64,
    path: &str,
) -> io::Result<()> {
    let mut file = File::create(path)?;
    let map = &generated.map;
    let report = &generated.report;

    // Header
    writeln!(file, "=== SKIRMISH MAP FILE ===")?;
    writeln!(file, "Title: {}", map.title)?;
    writeln!(file, "Seed: {}", seed)?;
    writeln!(file, "Tileset: {}", map.tileset)?;
    writeln!(file, "Playable: {}x{}", map.bounds.width(), map.bounds.height())?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    for &mode in AsciiMode::all() {
        writeln!(file, "=== MAP ({} View) ===", mode.name())?;
        write!(file, "{}", render_ascii_map(map, tileset, rules, mode))?;
        writeln!(file)?;
    }

    write!(file, "{}", legend())?;
    writeln!(file)?;

    writeln!(file, "=== STATISTICS ===")?;
    if let Some(missing) = &report.aborted {
        writeln!(file, "Aborted: {}", missing)?;
    }
    writeln!(file, "Spawns: {} of {}", report.spawns_placed, report.spawns_requested)?;
    writeln!(file, "Starting mines: {}", report.starting_mines)?;
    writeln!(file, "Extra mines: {} of {}", report.extra_mines, report.extra_mines_requested)?;
    writeln!(file, "Resource cells: {}", report.resource_cells)?;
    writeln!(file, "Cliffs: {} ({} tiles)", report.cliffs, report.cliff_tiles)?;
    writeln!(file, "Debris tiles: {}", report.debris_tiles)?;
    writeln!(file)?;

    writeln!(file, "=== ACTORS ===")?;
    for actor in &map.actors {
        writeln!(file, "{} {} {} {}", actor.id, actor.actor_type, actor.owner, actor.location)?;
    }
    writeln!(file)?;

    writeln!(file, "=== PLAYERS ===")?;
    for player in map.players.players.values() {
        writeln!(
            file,
            "{} playable={} faction={} enemies=[{}]",
            player.name,
            player.playable,
            player.faction,
            player.enemies.join(", ")
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_map;
    use crate::settings::GenerationSettings;
    use crate::tileset::TilesetCatalog;

    #[test]
    fn test_render_dimensions_and_border() {
        let rules = Ruleset::builtin();
        let catalog = TilesetCatalog::builtin();
        let out = generate_map(&GenerationSettings::default(), &rules, &catalog, 3).unwrap();
        let tileset = catalog.get("temperate").unwrap();
        let text = render_ascii_map(&out.map, tileset, &rules, AsciiMode::Terrain);

        let (w, h) = out.map.grid_size();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), h);
        assert!(lines.iter().all(|l| l.chars().count() == w));
        assert!(lines[0].chars().all(|c| c == ' '));
        assert_eq!(lines[1].chars().next(), Some(' '));

        for i in 0..out.report.spawns_placed {
            let digit = char::from_digit(i as u32, 36).unwrap();
            assert!(text.contains(digit));
        }
        assert!(text.contains('#'));
        assert!(text.contains('$'));
    }

    #[test]
    fn test_height_chars() {
        assert_eq!(height_char(0), '0');
        assert_eq!(height_char(2), '2');
        assert_eq!(height_char(200), '9');
    }

    #[test]
    fn test_export_writes_sections() {
        let rules = Ruleset::builtin();
        let catalog = TilesetCatalog::builtin();
        let out = generate_map(&GenerationSettings::default(), &rules, &catalog, 8).unwrap();
        let tileset = catalog.get("temperate").unwrap();
        let path = std::env::temp_dir().join("skirmish_mapgen_ascii_export_test.txt");
        let path = path.to_string_lossy().to_string();

        export_map_file(&out, tileset, &rules, 8, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert!(text.starts_with("=== SKIRMISH MAP FILE ==="));
        assert!(text.contains("Seed: 8"));
        assert!(text.contains("=== MAP (Height View) ==="));
        assert!(text.contains("Multi0 playable=true"));
        assert!(text.contains("Actor0 mpspawn Neutral"));
    }
}
