//! File-path configuration, loaded from an optional JSON file. A missing
//! or corrupt file falls back to the defaults with a warning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assets::AssetPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Persisted entry list (JSON).
    pub storage_path: PathBuf,
    /// Target of the download action (plain text).
    pub export_path: PathBuf,
    pub font_path: PathBuf,
    pub env_map_path: PathBuf,
    pub ring_texture_path: PathBuf,
    pub ring_model_paths: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("murmur_texts.json"),
            export_path: PathBuf::from("murmur_texts.txt"),
            font_path: PathBuf::from("assets/fonts/display.ttf"),
            env_map_path: PathBuf::from("assets/textures/spectrum.jpg"),
            ring_texture_path: PathBuf::from("assets/textures/ring.jpg"),
            ring_model_paths: vec![
                PathBuf::from("assets/models/ring.1.obj"),
                PathBuf::from("assets/models/ring.2.obj"),
                PathBuf::from("assets/models/ring.3.obj"),
            ],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&data) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("invalid config at {}, using defaults: {e}", path.display());
                Self::default()
            }
        }
    }

    pub fn asset_paths(&self) -> AssetPaths {
        AssetPaths {
            font: self.font_path.clone(),
            env_map: self.env_map_path.clone(),
            ring_texture: self.ring_texture_path.clone(),
            ring_models: self.ring_model_paths.clone(),
        }
    }
}
