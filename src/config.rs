//! Runtime settings: a JSON file for tunables plus command line switches
//! choosing the map source.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GameError, Result};

const MIN_SCREEN: u32 = 64;
const MAX_SCREEN: u32 = 4096;
const MAX_MINIMAP_SCALE: u32 = 32;

#[derive(Parser, Debug, Default)]
#[command(name = "doorcaster", about = "Grid ray caster with sliding doors")]
pub struct Args {
    /// JSON file with screen size, speeds and wall height.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Text map to load instead of generating one.
    #[arg(long)]
    pub map: Option<PathBuf>,

    /// Use the built-in demo map.
    #[arg(long)]
    pub demo: bool,

    /// Seed for the random map generator.
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long)]
    pub width: Option<usize>,

    #[arg(long)]
    pub height: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub screen_width: u32,
    pub screen_height: u32,
    pub move_speed: f32,   // units per second
    pub sprint_speed: f32, // units per second
    pub rot_speed: f32,    // radians per second
    pub wall_height: f32,
    pub fov_plane: f32, // camera plane length, 0.66 ≈ 66°
    pub target_fps: u32,
    pub minimap_scale: u32,
    pub show_fps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            screen_width: 960,
            screen_height: 640,
            move_speed: 3.0,
            sprint_speed: 5.0,
            rot_speed: 1.8,
            wall_height: 1.0,
            fov_plane: 0.66,
            target_fps: 60,
            minimap_scale: 4,
            show_fps: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| GameError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        let cfg: Config = serde_json::from_str(text)?;
        Ok(cfg.validate())
    }

    /// Replaces values the renderer or movement code cannot work with by defaults.
    pub fn validate(mut self) -> Self {
        let d = Config::default();
        let screen_ok = |v: u32| (MIN_SCREEN..=MAX_SCREEN).contains(&v);
        if !screen_ok(self.screen_width) || !screen_ok(self.screen_height) {
            warn!(w = self.screen_width, h = self.screen_height, "screen size out of range, using default size");
            self.screen_width = d.screen_width;
            self.screen_height = d.screen_height;
        }
        if !(self.move_speed > 0.0) {
            warn!(value = self.move_speed, "invalid move_speed");
            self.move_speed = d.move_speed;
        }
        if !(self.sprint_speed > 0.0) {
            warn!(value = self.sprint_speed, "invalid sprint_speed");
            self.sprint_speed = d.sprint_speed;
        }
        if !(self.rot_speed > 0.0) {
            warn!(value = self.rot_speed, "invalid rot_speed");
            self.rot_speed = d.rot_speed;
        }
        if !(self.wall_height > 0.1) {
            warn!(value = self.wall_height, "invalid wall_height");
            self.wall_height = d.wall_height;
        }
        if !(self.fov_plane > 0.0) {
            self.fov_plane = d.fov_plane;
        }
        if self.target_fps == 0 {
            self.target_fps = d.target_fps;
        }
        if self.minimap_scale == 0 || self.minimap_scale > MAX_MINIMAP_SCALE {
            warn!(value = self.minimap_scale, "invalid minimap_scale");
            self.minimap_scale = d.minimap_scale;
        }
        self
    }
}
