//! 3D renderer: sky and floor, then one textured wall strip per screen column.

use raylib::prelude::*;

use crate::core::doors::{DoorRegistry, Orientation};
use crate::core::grid::GridSource;
use crate::core::player::Player;
use crate::render::caster::{cast_ray, Hit, Side, Surface};
use crate::render::framebuffer::PixelSink;
use crate::render::textures::TextureSource;

/// Distances are floored to this before projecting.
const MIN_DIST: f32 = 1e-4;
/// Brightness of north/south faces relative to east/west faces.
const SIDE_SHADE: f32 = 0.7;

const SKY: Color = Color::new(60, 60, 90, 255);
const FLOOR_NEAR: u8 = 120;
const FLOOR_FAR: u8 = 40;

/// Flat colors for surfaces without a texture, indexed by id. Ids past the
/// end use the last entry.
const PALETTE: [Color; 6] = [
    Color::new(0, 0, 0, 255),       // unused
    Color::new(200, 60, 60, 255),   // red
    Color::new(60, 160, 200, 255),  // blue
    Color::new(60, 200, 120, 255),  // green
    Color::new(220, 200, 80, 255),  // yellow
    Color::new(160, 160, 180, 255), // door
];
const DOOR_BASE: Color = Color::new(150, 170, 190, 255);

#[inline]
fn scale_color(c: Color, k: f32) -> Color {
    let s = k.max(0.0);
    let mul = |v: u8| -> u8 { ((v as f32 * s).min(255.0)) as u8 };
    Color::new(mul(c.r), mul(c.g), mul(c.b), 255)
}

#[inline]
pub fn shade(c: Color, side: Side) -> Color {
    match side {
        Side::EastWest => c,
        Side::NorthSouth => scale_color(c, SIDE_SHADE),
    }
}

pub fn palette_color(id: i32) -> Color {
    PALETTE[id.clamp(0, PALETTE.len() as i32 - 1) as usize]
}

/// Untextured doors dull as they slide away.
pub fn door_color(open_fraction: f32) -> Color {
    scale_color(DOOR_BASE, 1.0 - open_fraction.clamp(0.0, 1.0) * 0.7)
}

/// Vertical extent of one projected wall strip, centered on the screen.
/// `draw_start`/`draw_end` may lie outside the screen.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Strip {
    pub line_height: f32,
    pub draw_start: i32,
    pub draw_end: i32,
}

pub fn project(distance: f32, screen_h: u32, wall_height: f32) -> Strip {
    let d = distance.max(MIN_DIST);
    let h = screen_h as f32;
    let half = wall_height * h / (2.0 * d);
    Strip {
        line_height: half * 2.0,
        draw_start: (h * 0.5 - half).floor() as i32,
        draw_end: (h * 0.5 + half).floor() as i32,
    }
}

/// Position across the hit face in `[0, 1)`. Door faces are measured from the
/// panel's current leading edge so the texture travels with the panel.
pub fn surface_u(hit: &Hit, doors: &DoorRegistry) -> f32 {
    let u = match hit.surface {
        Surface::Door { index, open_fraction } => {
            let (cx, cy) = (hit.cell.0 as f32, hit.cell.1 as f32);
            match doors.get(index).map(|d| d.orientation()) {
                Some(Orientation::SlidesIntoXWall) => hit.point.x - (cx + open_fraction),
                _ => hit.point.y - (cy + open_fraction),
            }
        }
        Surface::Wall(_) => match hit.side {
            Side::EastWest => hit.point.y,
            Side::NorthSouth => hit.point.x,
        },
    };
    u - u.floor()
}

/// Texture column for `u`, mirrored on faces seen from the back so the image
/// reads the same way from both sides.
pub fn texture_column(u: f32, tex_w: u32, side: Side, ray_dir: Vector2) -> u32 {
    let w = tex_w.max(1);
    let mut tx = ((u * w as f32) as u32).min(w - 1);
    let mirrored = match side {
        Side::EastWest => ray_dir.x > 0.0,
        Side::NorthSouth => ray_dir.y < 0.0,
    };
    if mirrored {
        tx = w - tx - 1;
    }
    tx
}

/// Texture row for screen row `y` of a strip. Depends only on the row's
/// offset into the strip, so clipped rows do not shift the rows after them.
#[inline]
pub fn texture_row(y: i32, strip: &Strip, tex_h: u32) -> u32 {
    let h = tex_h.max(1);
    let pos = (y - strip.draw_start) as f32 * h as f32 / strip.line_height.max(MIN_DIST);
    (pos.floor() as i64).rem_euclid(h as i64) as u32
}

/// Draws the strip for `hit` into column `x`.
pub fn draw_column<S, T>(
    sink: &mut S,
    x: u32,
    hit: &Hit,
    ray_dir: Vector2,
    doors: &DoorRegistry,
    textures: &T,
    wall_height: f32,
) where
    S: PixelSink + ?Sized,
    T: TextureSource + ?Sized,
{
    let screen_h = sink.height();
    let strip = project(hit.distance, screen_h, wall_height);
    let y0 = strip.draw_start.max(0);
    let y1 = strip.draw_end.min(screen_h as i32 - 1);
    if y1 < y0 {
        return;
    }

    let id = hit.surface.id();
    match textures.size(id) {
        Some((tw, th)) => {
            let tx = texture_column(surface_u(hit, doors), tw, hit.side, ray_dir);
            for y in y0..=y1 {
                let ty = texture_row(y, &strip, th);
                let c = textures.sample(id, tx, ty).unwrap_or(Color::MAGENTA);
                sink.put_pixel(x, y as u32, shade(c, hit.side));
            }
        }
        None => {
            let flat = match hit.surface {
                Surface::Door { open_fraction, .. } => door_color(open_fraction),
                Surface::Wall(id) => palette_color(id),
            };
            let c = shade(flat, hit.side);
            for y in y0..=y1 {
                sink.put_pixel(x, y as u32, c);
            }
        }
    }
}

/// Flat sky on the upper half, grey gradient floor that brightens towards the viewer.
pub fn paint_sky_and_floor<S: PixelSink + ?Sized>(sink: &mut S) {
    let w = sink.width();
    let h = sink.height();
    let hh = h / 2;
    for y in 0..hh {
        for x in 0..w {
            sink.put_pixel(x, y, SKY);
        }
    }
    let span = (h - hh).max(1) as f32;
    for y in hh..h {
        let t = (y - hh) as f32 / span;
        let v = (FLOOR_FAR as f32 + (FLOOR_NEAR - FLOOR_FAR) as f32 * t) as u8;
        let c = Color::new(v, v, v, 255);
        for x in 0..w {
            sink.put_pixel(x, y, c);
        }
    }
}

/// Renders one frame of the 3D view. Doors must already be updated for
/// this frame. Returns the hit distance per column (infinite on a miss).
pub fn render_3d<S, G, T>(
    sink: &mut S,
    grid: &G,
    doors: &DoorRegistry,
    player: &Player,
    textures: &T,
    wall_height: f32,
) -> Vec<f32>
where
    S: PixelSink + ?Sized,
    G: GridSource + ?Sized,
    T: TextureSource + ?Sized,
{
    paint_sky_and_floor(sink);

    let w = sink.width();
    let mut depth = Vec::with_capacity(w as usize);
    for x in 0..w {
        let ray_dir = player.ray_dir(x, w);
        match cast_ray(grid, doors, player.pos, ray_dir) {
            Some(hit) => {
                draw_column(sink, x, &hit, ray_dir, doors, textures, wall_height);
                depth.push(hit.distance);
            }
            None => depth.push(f32::INFINITY),
        }
    }
    depth
}
