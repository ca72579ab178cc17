use raylib::prelude::*;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::core::grid::DOOR_TILE;

/// Per-surface texture lookup used by the column renderer. A surface with no
/// texture is drawn in its palette color instead.
pub trait TextureSource {
    fn size(&self, id: i32) -> Option<(u32, u32)>;
    /// Samples with wrap-around; `None` when `id` has no texture.
    fn sample(&self, id: i32, x: u32, y: u32) -> Option<Color>;
}

/// An immutable CPU pixmap, sampled per pixel without touching raylib.
#[derive(Clone, Debug)]
pub struct Pixmap {
    w: u32,
    h: u32,
    px: Vec<Color>,
}

impl Pixmap {
    pub fn new(w: u32, h: u32, px: Vec<Color>) -> Self {
        debug_assert_eq!(px.len(), (w * h) as usize);
        Self { w: w.max(1), h: h.max(1), px }
    }

    pub fn from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> Color) -> Self {
        let mut px = Vec::with_capacity((w * h) as usize);
        for y in 0..h {
            for x in 0..w {
                px.push(f(x, y));
            }
        }
        Self::new(w, h, px)
    }

    #[inline]
    pub fn sample(&self, x: u32, y: u32) -> Color {
        let xi = (x % self.w) as usize;
        let yi = (y % self.h) as usize;
        self.px[(yi * self.w as usize) + xi]
    }
}

#[derive(Default)]
pub struct TextureManager {
    maps: HashMap<i32, Pixmap>,
}

impl TextureSource for TextureManager {
    fn size(&self, id: i32) -> Option<(u32, u32)> {
        self.maps.get(&id).map(|p| (p.w, p.h))
    }

    fn sample(&self, id: i32, x: u32, y: u32) -> Option<Color> {
        self.maps.get(&id).map(|p| p.sample(x, y))
    }
}

impl TextureManager {
    /// Loads the wall and door textures that exist on disk. Missing files
    /// are logged and left to the palette fallback.
    pub fn load() -> Self {
        let mut tm = Self::default();

        let candidates: &[(&str, i32)] = &[
            ("resources/textures/redbrick.png", 1),
            ("resources/textures/greystone.png", 2),
            ("resources/textures/wood.png", 3),
            ("resources/textures/bluestone.png", 4),
            ("resources/textures/eagle.png", DOOR_TILE),
        ];

        for &(path, id) in candidates {
            match Image::load_image(path) {
                Ok(img) => {
                    let w = img.width().max(1) as u32;
                    let h = img.height().max(1) as u32;
                    let data = img.get_image_data().to_vec(); // Vec<Color>
                    if data.len() == (w * h) as usize {
                        info!(id, path, w, h, "texture loaded");
                        tm.insert(id, Pixmap::new(w, h, data));
                    } else {
                        warn!(id, path, "texture has unexpected pixel count, using palette");
                    }
                }
                Err(e) => warn!(id, path, error = %e, "texture missing, using palette"),
            }
        }

        tm
    }

    pub fn insert(&mut self, id: i32, pixmap: Pixmap) {
        self.maps.insert(id, pixmap);
    }

    pub fn len(&self) -> usize { self.maps.len() }
}
