//! CPU framebuffer the renderer draws into before it is uploaded to the GPU.

use raylib::prelude::*;
use raylib::core::texture::RaylibTexture2D; // update_texture()
use tracing::warn;

/// Where rendered pixels go. Writes outside the surface are dropped.
pub trait PixelSink {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn put_pixel(&mut self, x: u32, y: u32, color: Color);
}

pub struct Framebuffer {
    pub color_buffer: Vec<Color>,
    pub width: u32,
    pub height: u32,
    pub background_color: Color,
    pub current_color: Color,
}

impl PixelSink for Framebuffer {
    fn width(&self) -> u32 { self.width }
    fn height(&self) -> u32 { self.height }

    #[inline]
    fn put_pixel(&mut self, x: u32, y: u32, color: Color) {
        self.set_pixel_color(x, y, color);
    }
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        let bg = Color::BLACK;
        Self {
            color_buffer: vec![bg; size],
            width,
            height,
            background_color: bg,
            current_color: Color::WHITE,
        }
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = self.current_color;
        }
    }

    #[inline]
    pub fn set_pixel_color(&mut self, x: u32, y: u32, color: Color) {
        if x < self.width && y < self.height {
            self.color_buffer[(y * self.width + x) as usize] = color;
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        if x < self.width && y < self.height {
            return self.color_buffer[(y * self.width + x) as usize];
        }
        self.background_color
    }

    #[inline] pub fn set_current_color(&mut self, c: Color) { self.current_color = c; }

    /// Horizontal run `[x0, x1)` on row `y` in the current color.
    pub fn hline(&mut self, x0: u32, x1: u32, y: u32) {
        if y >= self.height {
            return;
        }
        let x1 = x1.min(self.width);
        for x in x0.min(x1)..x1 {
            self.color_buffer[(y * self.width + x) as usize] = self.current_color;
        }
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Color) {
        self.set_current_color(color);
        for yy in y..y.saturating_add(h) {
            self.hline(x, x.saturating_add(w), yy);
        }
    }

    /// The pixels as RGBA8 bytes, without copying.
    pub fn as_rgba_bytes(&self) -> &[u8] {
        let byte_len = self.color_buffer.len() * std::mem::size_of::<Color>();
        unsafe { std::slice::from_raw_parts(self.color_buffer.as_ptr() as *const u8, byte_len) }
    }

    /// Uploads the pixels into a persistent texture of the same size.
    pub fn upload_to_texture(&self, tex: &mut Texture2D) {
        if let Err(e) = tex.update_texture(self.as_rgba_bytes()) {
            warn!(error = %e, "framebuffer upload failed");
        }
    }
}
