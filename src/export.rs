use image::{ImageBuffer, Rgb, RgbImage};

use crate::geometry::Point;
use crate::map::Map;
use crate::rules::Ruleset;
use crate::tileset::{TileClass, Tileset};

const SHROUD: [u8; 3] = [0, 0, 0];
const RESOURCE: [u8; 3] = [214, 170, 40];
const SPAWN: [u8; 3] = [220, 30, 30];
const MINE: [u8; 3] = [255, 230, 80];

/// Base color for a painted tile class.
pub fn tile_color(class: TileClass) -> [u8; 3] {
    match class {
        TileClass::Clear => [96, 140, 70],
        TileClass::Cliff => [120, 100, 80],
        TileClass::Debris => [70, 90, 60],
        TileClass::Other => [150, 60, 150],
    }
}

/// Brighten a color by terrain height.
fn shade(color: [u8; 3], height: u8, max_height: u8) -> [u8; 3] {
    if max_height == 0 {
        return color;
    }
    let t = height.min(max_height) as f32 / max_height as f32;
    let lift = |c: u8| (c as f32 + (255.0 - c as f32) * t * 0.5) as u8;
    [lift(color[0]), lift(color[1]), lift(color[2])]
}

fn cell_color(map: &Map, tileset: &Tileset, p: Point) -> [u8; 3] {
    if !map.contains(p) {
        return SHROUD;
    }
    if map.has_resource(p) {
        return RESOURCE;
    }
    let class = map.tiles.get(p).map_or(TileClass::Other, |t| tileset.classify(t.template));
    let height = map.heights.get(p).copied().unwrap_or(0);
    shade(tile_color(class), height, map.max_terrain_height)
}

fn fill_cell(img: &mut RgbImage, p: Point, scale: u32, color: [u8; 3]) {
    let (x0, y0) = (p.x as u32 * scale, p.y as u32 * scale);
    for py in 0..scale {
        for px in 0..scale {
            if x0 + px < img.width() && y0 + py < img.height() {
                img.put_pixel(x0 + px, y0 + py, Rgb(color));
            }
        }
    }
}

/// Render a map preview, `scale` pixels per cell.
pub fn render_preview(map: &Map, tileset: &Tileset, rules: &Ruleset, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let (width, height) = map.grid_size();
    let mut img: RgbImage = ImageBuffer::new(width as u32 * scale, height as u32 * scale);

    for (p, _) in map.tiles.iter() {
        fill_cell(&mut img, p, scale, cell_color(map, tileset, p));
    }

    for actor in &map.actors {
        if !map.tiles.contains(actor.location) {
            continue;
        }
        let color = if actor.actor_type == rules.spawn_actor { SPAWN } else { MINE };
        fill_cell(&mut img, actor.location, scale, color);
    }

    img
}

/// Export a map preview as a PNG.
pub fn export_preview(
    map: &Map,
    tileset: &Tileset,
    rules: &Ruleset,
    scale: u32,
    path: &str,
) -> Result<(), image::ImageError> {
    render_preview(map, tileset, rules, scale).save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_map;
    use crate::settings::GenerationSettings;
    use crate::tileset::TilesetCatalog;

    #[test]
    fn test_preview_size_and_markers() {
        let rules = Ruleset::builtin();
        let catalog = TilesetCatalog::builtin();
        let tileset = catalog.get("temperate").unwrap();
        let out = generate_map(&GenerationSettings::default(), &rules, &catalog, 12).unwrap();

        let img = render_preview(&out.map, tileset, &rules, 3);
        let (w, h) = out.map.grid_size();
        assert_eq!(img.dimensions(), (w as u32 * 3, h as u32 * 3));
        assert_eq!(img.get_pixel(0, 0).0, SHROUD);

        let spawn = out.map.actors_of_type("mpspawn").next().unwrap().location;
        let px = img.get_pixel(spawn.x as u32 * 3 + 1, spawn.y as u32 * 3 + 1);
        assert_eq!(px.0, SPAWN);
    }

    #[test]
    fn test_shade_brightens_with_height() {
        let base = tile_color(TileClass::Clear);
        assert_eq!(shade(base, 0, 8), base);
        let high = shade(base, 8, 8);
        assert!(high.iter().zip(base.iter()).all(|(h, b)| h >= b));
        assert_eq!(shade(base, 5, 0), base);
    }
}
