//! Generation settings
//!
//! Every knob has a default, so a settings file only needs the values it
//! changes. The generator trusts what it is given; callers that take
//! settings from users run [`GenerationSettings::sanitized`] first.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How spawn points are chosen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPolicy {
    /// Evenly spaced on an ellipse around the map center.
    #[default]
    Ring,
    /// Random positions kept apart by rejection sampling.
    Scatter,
}

impl fmt::Display for SpawnPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ring => write!(f, "ring"),
            Self::Scatter => write!(f, "scatter"),
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    // =========================================================================
    // Map
    // =========================================================================
    /// Playable width in cells
    pub width: i32,
    /// Playable height in cells
    pub height: i32,
    pub tileset: String,

    // =========================================================================
    // Players
    // =========================================================================
    pub spawn_policy: SpawnPolicy,
    pub player_num: usize,
    /// Clearance kept around a base beyond its starting mines
    pub player_min_distance: i32,
    /// Ring radius as a percentage of the map's half-extent
    pub player_radius_pct: i32,

    // =========================================================================
    // Resources
    // =========================================================================
    pub starting_mine_num: usize,
    /// Distance from a spawn to each of its starting mines
    pub starting_mine_distance: i32,
    pub starting_mine_size: usize,
    /// Minimum spacing between the starting mines of one spawn
    pub starting_mine_inter_distance: i32,
    pub extra_mine_num: usize,
    /// Minimum spacing between extra mines
    pub extra_mine_distance: i32,
    pub extra_mine_size: usize,

    // =========================================================================
    // Decoration
    // =========================================================================
    pub debris_num_groups: usize,
    pub debris_num_per_group: usize,
    /// Radius of a debris cluster
    pub debris_group_size: i32,
    pub cliff_num: usize,
    /// Average number of growth steps per cliff
    pub cliff_avg_length: i32,
    pub cliff_length_variance: i32,
    /// Percent chance a cliff arm turns after each step
    pub cliff_jitter_pct: i32,

    // =========================================================================
    // Sampling
    // =========================================================================
    /// Margin kept between sampled feature seeds and the map edge
    pub edge_distance: i32,
    /// Candidates tried around each sampled point
    pub sampler_fan_out: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            width: 96,
            height: 96,
            tileset: "temperate".to_string(),
            spawn_policy: SpawnPolicy::Ring,
            player_num: 4,
            player_min_distance: 4,
            player_radius_pct: 70,
            starting_mine_num: 2,
            starting_mine_distance: 10,
            starting_mine_size: 32,
            starting_mine_inter_distance: 4,
            extra_mine_num: 10,
            extra_mine_distance: 10,
            extra_mine_size: 42,
            debris_num_groups: 12,
            debris_num_per_group: 6,
            debris_group_size: 4,
            cliff_num: 6,
            cliff_avg_length: 8,
            cliff_length_variance: 3,
            cliff_jitter_pct: 25,
            edge_distance: 2,
            sampler_fan_out: 6,
        }
    }
}

impl GenerationSettings {
    pub fn from_json(json: &str, path: &str) -> Result<Self, SettingsError> {
        serde_json::from_str(json).map_err(|source| SettingsError::Parse {
            path: path.to_string(),
            source,
        })
    }

    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_string(),
            source,
        })?;
        Self::from_json(&json, path)
    }

    /// Radius claimed around each spawn: its mines plus clearance.
    pub fn player_land_size(&self) -> i32 {
        self.starting_mine_distance + self.player_min_distance
    }

    pub fn cliff_jitter_probability(&self) -> f64 {
        (self.cliff_jitter_pct as f64 / 100.0).clamp(0.0, 1.0)
    }

    /// Spacing between sampled cliff seeds.
    pub fn cliff_spacing(&self) -> f32 {
        self.cliff_avg_length.max(4) as f32
    }

    /// Spacing between sampled debris cluster centers.
    pub fn debris_spacing(&self) -> f32 {
        (self.debris_group_size * 2 + 1).max(2) as f32
    }

    /// Copy with every knob clamped into its supported range.
    /// Each clamped value is logged.
    pub fn sanitized(&self) -> Self {
        let mut s = self.clone();
        clamp_i32(&mut s.width, 16, 512, "width");
        clamp_i32(&mut s.height, 16, 512, "height");
        clamp_usize(&mut s.player_num, 1, 16, "player_num");
        clamp_i32(&mut s.player_min_distance, 0, 32, "player_min_distance");
        clamp_i32(&mut s.player_radius_pct, 0, 100, "player_radius_pct");
        clamp_usize(&mut s.starting_mine_num, 0, 8, "starting_mine_num");
        clamp_i32(&mut s.starting_mine_distance, 1, 32, "starting_mine_distance");
        clamp_usize(&mut s.starting_mine_size, 1, 128, "starting_mine_size");
        clamp_i32(&mut s.starting_mine_inter_distance, 0, 32, "starting_mine_inter_distance");
        clamp_usize(&mut s.extra_mine_num, 0, 64, "extra_mine_num");
        clamp_i32(&mut s.extra_mine_distance, 0, 64, "extra_mine_distance");
        clamp_usize(&mut s.extra_mine_size, 1, 128, "extra_mine_size");
        clamp_usize(&mut s.debris_num_groups, 0, 128, "debris_num_groups");
        clamp_usize(&mut s.debris_num_per_group, 0, 64, "debris_num_per_group");
        clamp_i32(&mut s.debris_group_size, 1, 32, "debris_group_size");
        clamp_usize(&mut s.cliff_num, 0, 64, "cliff_num");
        clamp_i32(&mut s.cliff_avg_length, 2, 64, "cliff_avg_length");
        clamp_i32(&mut s.cliff_length_variance, 0, 32, "cliff_length_variance");
        clamp_i32(&mut s.cliff_jitter_pct, 0, 100, "cliff_jitter_pct");
        clamp_i32(&mut s.edge_distance, 0, 32, "edge_distance");
        clamp_usize(&mut s.sampler_fan_out, 1, 64, "sampler_fan_out");
        s
    }
}

fn clamp_i32(value: &mut i32, min: i32, max: i32, name: &str) {
    let clamped = (*value).clamp(min, max);
    if clamped != *value {
        log::warn!("setting {name}={} out of range, using {clamped}", *value);
        *value = clamped;
    }
}

fn clamp_usize(value: &mut usize, min: usize, max: usize, name: &str) {
    let clamped = (*value).clamp(min, max);
    if clamped != *value {
        log::warn!("setting {name}={} out of range, using {clamped}", *value);
        *value = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let s = GenerationSettings::from_json(r#"{ "player_num": 6, "spawn_policy": "scatter" }"#, "inline").unwrap();
        assert_eq!(s.player_num, 6);
        assert_eq!(s.spawn_policy, SpawnPolicy::Scatter);
        assert_eq!(s.width, GenerationSettings::default().width);
        assert_eq!(s.tileset, "temperate");
    }

    #[test]
    fn test_bad_json_reports_path() {
        let err = GenerationSettings::from_json("{ nope", "broken.json").unwrap_err();
        assert!(err.to_string().contains("broken.json"));
        assert!(matches!(GenerationSettings::load("/nonexistent/settings.json"), Err(SettingsError::Io { .. })));
    }

    #[test]
    fn test_sanitized_clamps() {
        let s = GenerationSettings {
            width: 4,
            player_num: 40,
            player_radius_pct: 150,
            cliff_jitter_pct: -5,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.width, 16);
        assert_eq!(s.player_num, 16);
        assert_eq!(s.player_radius_pct, 100);
        assert_eq!(s.cliff_jitter_pct, 0);
        assert_eq!(GenerationSettings::default().sanitized(), GenerationSettings::default());
    }

    #[test]
    fn test_derived_values() {
        let s = GenerationSettings::default();
        assert_eq!(s.player_land_size(), 14);
        assert!((s.cliff_jitter_probability() - 0.25).abs() < 1e-9);
        assert_eq!(s.debris_spacing(), 9.0);
    }
}
