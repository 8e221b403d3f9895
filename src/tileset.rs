//! Tileset catalog
//!
//! A tileset names its terrain templates and optionally carries the data the
//! generator needs for cliffs and debris. A tileset without a cliff table or
//! debris list simply gets no cliffs or debris.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::cliffs::connections::ConnectionTable;
use crate::error::{read_catalog_file, CatalogError};

pub const BUILTIN_TILESETS: &str = include_str!("data/tilesets.json");

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TerrainTemplate {
    /// Footprint in cells (width, height).
    pub size: (i32, i32),
    /// Height added to every cell the template is painted on.
    #[serde(default)]
    pub height: i8,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DebrisSet {
    #[serde(default)]
    pub land: Vec<u16>,
    #[serde(default)]
    pub water: Vec<u16>,
}

/// Broad category of a painted tile, used by the debug renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileClass {
    Clear,
    Cliff,
    Debris,
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tileset {
    pub id: String,
    pub clear_template: u16,
    pub templates: BTreeMap<u16, TerrainTemplate>,
    #[serde(default)]
    pub cliffs: Option<ConnectionTable>,
    #[serde(default)]
    pub debris: Option<DebrisSet>,
}

impl Tileset {
    pub fn template(&self, id: u16) -> Option<&TerrainTemplate> {
        self.templates.get(&id)
    }

    /// Land debris tiles, empty when the tileset has none.
    pub fn land_debris(&self) -> &[u16] {
        self.debris.as_ref().map(|d| d.land.as_slice()).unwrap_or(&[])
    }

    /// Every cliff tile must be a template exactly one cliff tile in size,
    /// since cliffs claim `tile_size`×`tile_size` cells per position.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let Some(cliffs) = &self.cliffs else {
            return Ok(());
        };
        for id in cliffs.tile_ids() {
            let template = self.template(id).ok_or_else(|| CatalogError::MissingCliffTemplate {
                tileset: self.id.clone(),
                template: id,
            })?;
            if template.size != (cliffs.tile_size, cliffs.tile_size) {
                return Err(CatalogError::CliffTemplateSize {
                    tileset: self.id.clone(),
                    template: id,
                    size: template.size,
                    tile_size: cliffs.tile_size,
                });
            }
        }
        Ok(())
    }

    pub fn classify(&self, template: u16) -> TileClass {
        if template == self.clear_template {
            TileClass::Clear
        } else if self.cliffs.as_ref().is_some_and(|c| c.tile_ids().any(|t| t == template)) {
            TileClass::Cliff
        } else if self
            .debris
            .as_ref()
            .is_some_and(|d| d.land.contains(&template) || d.water.contains(&template))
        {
            TileClass::Debris
        } else {
            TileClass::Other
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TilesetCatalog {
    pub tilesets: Vec<Tileset>,
}

impl TilesetCatalog {
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_TILESETS).expect("embedded tilesets are valid")
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        for tileset in &catalog.tilesets {
            tileset.validate()?;
        }
        Ok(catalog)
    }

    pub fn load(path: &str) -> Result<Self, CatalogError> {
        Self::from_json(&read_catalog_file(path)?)
    }

    pub fn get(&self, id: &str) -> Result<&Tileset, CatalogError> {
        self.tilesets
            .iter()
            .find(|t| t.id == id)
            .ok_or_else(|| CatalogError::UnknownTileset(id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tilesets.iter().map(|t| t.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cliffs::connections::Connection;

    #[test]
    fn test_builtin_catalog() {
        let catalog = TilesetCatalog::builtin();
        let ids: Vec<&str> = catalog.ids().collect();
        assert_eq!(ids, vec!["temperate", "desert", "barren"]);

        let temperate = catalog.get("temperate").unwrap();
        let cliffs = temperate.cliffs.as_ref().unwrap();
        for conn in Connection::all() {
            let tiles = cliffs.lookup(conn).unwrap_or_else(|| panic!("missing {}", conn.key()));
            for id in tiles {
                let template = temperate.template(*id).unwrap();
                assert_eq!(template.size, (cliffs.tile_size, cliffs.tile_size));
            }
        }
        for id in temperate.land_debris() {
            assert_eq!(temperate.template(*id).unwrap().size, (1, 1));
        }

        let barren = catalog.get("barren").unwrap();
        assert!(barren.cliffs.is_none());
        assert!(barren.land_debris().is_empty());

        assert!(matches!(catalog.get("snow"), Err(CatalogError::UnknownTileset(_))));
    }

    #[test]
    fn test_classify_tiles() {
        let catalog = TilesetCatalog::builtin();
        let temperate = catalog.get("temperate").unwrap();
        assert_eq!(temperate.classify(temperate.clear_template), TileClass::Clear);
        let cliff = temperate.cliffs.as_ref().unwrap().default_straight()[0];
        assert_eq!(temperate.classify(cliff), TileClass::Cliff);
        assert_eq!(temperate.classify(temperate.land_debris()[0]), TileClass::Debris);
        assert_eq!(temperate.classify(9999), TileClass::Other);
    }

    #[test]
    fn test_cliff_templates_must_match_tile_size() {
        let json = r#"{ "tilesets": [{
            "id": "ridge",
            "clear_template": 255,
            "templates": { "100": {"size": [2, 2], "height": 2}, "255": {"size": [1, 1]} },
            "cliffs": { "tile_size": 1, "connections": { "NS": [100] } }
        }] }"#;
        let err = TilesetCatalog::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::CliffTemplateSize { template: 100, size: (2, 2), tile_size: 1, .. }
        ));

        let json = r#"{ "tilesets": [{
            "id": "ridge",
            "clear_template": 255,
            "templates": { "255": {"size": [1, 1]} },
            "cliffs": { "tile_size": 1, "connections": { "NS": [100] } }
        }] }"#;
        let err = TilesetCatalog::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::MissingCliffTemplate { template: 100, .. }));

        let json = r#"{ "tilesets": [{
            "id": "ridge",
            "clear_template": 255,
            "templates": { "100": {"size": [1, 1], "height": 1}, "255": {"size": [1, 1]} },
            "cliffs": { "tile_size": 1, "connections": { "NS": [100] } }
        }] }"#;
        assert!(TilesetCatalog::from_json(json).is_ok());
    }
}
