//! Skirmish map generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod ascii;
pub mod cliffs;
pub mod debris;
pub mod error;
pub mod export;
pub mod generator;
pub mod geometry;
pub mod logging;
pub mod map;
pub mod occupancy;
pub mod resources;
pub mod rules;
pub mod sampling;
pub mod settings;
pub mod spawns;
pub mod tilemap;
pub mod tileset;
