//! The generated map: terrain, height and resource layers plus the actor and
//! player records a game loads alongside them.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::geometry::{Point, Rect};
use crate::rules::{PlayerReference, Ruleset};
use crate::tilemap::Tilemap;
use crate::tileset::{TerrainTemplate, Tileset};

/// One cell of a terrain template: which template, and which of its cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub struct TerrainTile {
    pub template: u16,
    pub index: u8,
}

/// Resource content of a cell. `kind == 0` means no resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub struct ResourceTile {
    pub kind: u8,
    pub density: u8,
}

impl ResourceTile {
    pub fn is_empty(&self) -> bool {
        self.kind == 0
    }
}

/// A placed actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ActorDefinition {
    /// Unique within the map, `Actor<n>`.
    pub id: String,
    pub actor_type: String,
    pub owner: String,
    pub location: Point,
}

/// Player records keyed by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct MapPlayers {
    pub players: BTreeMap<String, PlayerReference>,
}

impl MapPlayers {
    pub fn from_ruleset(rules: &Ruleset) -> Self {
        Self {
            players: rules.players.iter().map(|p| (p.name.clone(), p.clone())).collect(),
        }
    }

    pub fn add(&mut self, player: PlayerReference) {
        self.players.insert(player.name.clone(), player);
    }

    pub fn get(&self, name: &str) -> Option<&PlayerReference> {
        self.players.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut PlayerReference> {
        self.players.get_mut(name)
    }

    pub fn playable(&self) -> impl Iterator<Item = &PlayerReference> {
        self.players.values().filter(|p| p.playable)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Map {
    pub title: String,
    pub author: String,
    pub tileset: String,
    /// Playable area; the rest of the grid is shroud border.
    pub bounds: Rect,
    pub max_terrain_height: u8,
    pub tiles: Tilemap<TerrainTile>,
    pub heights: Tilemap<u8>,
    pub resources: Tilemap<ResourceTile>,
    pub actors: Vec<ActorDefinition>,
    pub players: MapPlayers,
}

impl Map {
    /// A blank map with at least a 2×2 playable area.
    ///
    /// The grid carries a one-cell border on every side, plus
    /// `max_terrain_height` extra rows so raised ground at the bottom edge
    /// stays visible through the edge shroud.
    pub fn new_empty(tileset: &Tileset, rules: &Ruleset, width: i32, height: i32) -> Self {
        let width = width.max(2);
        let height = height.max(2);
        let max_h = rules.max_terrain_height as i32;

        let grid_w = (width + 2) as usize;
        let grid_h = (height + max_h + 2) as usize;
        let clear = TerrainTile {
            template: tileset.clear_template,
            index: 0,
        };

        Self {
            title: "Random Map".to_string(),
            author: "Random map generator".to_string(),
            tileset: tileset.id.clone(),
            bounds: Rect::from_ltrb(1, 1, width + 1, height + max_h + 1),
            max_terrain_height: rules.max_terrain_height,
            tiles: Tilemap::new_with(grid_w, grid_h, clear),
            heights: Tilemap::new(grid_w, grid_h),
            resources: Tilemap::new(grid_w, grid_h),
            actors: Vec::new(),
            players: MapPlayers::from_ruleset(rules),
        }
    }

    pub fn grid_size(&self) -> (usize, usize) {
        (self.tiles.width, self.tiles.height)
    }

    /// True if `p` is inside the playable bounds.
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains(p)
    }

    /// True if the whole `size`×`size` square at `origin` is playable.
    pub fn contains_block(&self, origin: Point, size: i32) -> bool {
        self.contains(origin) && self.contains(Point::new(origin.x + size - 1, origin.y + size - 1))
    }

    pub fn has_resource(&self, p: Point) -> bool {
        self.resources.get(p).is_some_and(|r| !r.is_empty())
    }

    /// Raise (or lower) a cell, clamped to `[0, max_terrain_height]`.
    pub fn adjust_height(&mut self, p: Point, delta: i8) {
        let max = self.max_terrain_height as i16;
        if let Some(h) = self.heights.get_mut(p) {
            *h = (*h as i16 + delta as i16).clamp(0, max) as u8;
        }
    }

    /// Paint a single cell with a one-cell tile.
    pub fn paint_cell(&mut self, p: Point, template: u16, height: i8) {
        if self.tiles.set(p, TerrainTile { template, index: 0 }) {
            self.adjust_height(p, height);
        }
    }

    /// Paint every cell of a template with its top-left corner at `origin`.
    pub fn paint_template(&mut self, origin: Point, id: u16, template: &TerrainTemplate) {
        let (w, h) = template.size;
        for dy in 0..h {
            for dx in 0..w {
                let p = Point::new(origin.x + dx, origin.y + dy);
                let tile = TerrainTile {
                    template: id,
                    index: (dy * w + dx) as u8,
                };
                if self.tiles.set(p, tile) {
                    self.adjust_height(p, template.height);
                }
            }
        }
    }

    pub fn add_actor(&mut self, id: String, actor_type: &str, owner: &str, location: Point) {
        self.actors.push(ActorDefinition {
            id,
            actor_type: actor_type.to_string(),
            owner: owner.to_string(),
            location,
        });
    }

    pub fn actors_of_type<'a>(&'a self, actor_type: &'a str) -> impl Iterator<Item = &'a ActorDefinition> + 'a {
        self.actors.iter().filter(move |a| a.actor_type == actor_type)
    }

    pub fn resource_cell_count(&self) -> usize {
        self.resources.count(|r| !r.is_empty())
    }
}
