//! Rendering: CPU framebuffer, textures, ray casting and the column renderer.
//!
//! Re-exports:
//! - `framebuffer`: CPU framebuffer and the pixel sink trait
//! - `textures`: Texture/pixmap manager with palette fallback
//! - `caster`: Grid ray marching and door-plane intersection
//! - `render3d`: Column projection, texture stepping and shading
//! - `hud`: Minimap overlay

pub mod framebuffer;
pub mod textures;
pub mod caster;
pub mod render3d;
pub mod hud;
