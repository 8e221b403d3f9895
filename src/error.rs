//! Errors raised while loading catalogs.
//!
//! Generation itself never fails; see `generator::GenerationReport` for how
//! shortfalls and aborted runs are surfaced.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("unknown tileset `{0}`")]
    UnknownTileset(String),
    #[error("invalid cliff connection key `{0}`")]
    InvalidConnection(String),
    #[error("cliff tile size must be positive, got {0}")]
    InvalidTileSize(i32),
    #[error("tileset `{tileset}` has no template {template} for its cliff table")]
    MissingCliffTemplate { tileset: String, template: u16 },
    #[error("tileset `{tileset}` cliff template {template} is {}x{}, expected {tile_size}x{tile_size}", size.0, size.1)]
    CliffTemplateSize {
        tileset: String,
        template: u16,
        size: (i32, i32),
        tile_size: i32,
    },
}

pub(crate) fn read_catalog_file(path: &str) -> Result<String, CatalogError> {
    std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_string(),
        source,
    })
}
