//! Top-down minimap overlay drawn into the framebuffer.

use raylib::prelude::*;

use crate::core::doors::DoorRegistry;
use crate::core::grid::{GridSource, DOOR_TILE, EMPTY};
use crate::core::player::Player;
use crate::render::framebuffer::Framebuffer;
use crate::render::render3d::{door_color, palette_color};

const FLOOR: Color = Color::new(24, 24, 28, 255);
const MARGIN: u32 = 8;
/// Largest map side drawn; bigger maps show the window around the player.
const MAX_CELLS: i32 = 48;

#[inline]
fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let f = |x: u8, y: u8| -> u8 { ((x as f32) * (1.0 - t) + (y as f32) * t) as u8 };
    Color::new(f(a.r, b.r), f(a.g, b.g), f(a.b, b.b), 255)
}

/// Color of one map cell on the minimap. Doors fade to floor as they open.
pub fn cell_color<G: GridSource + ?Sized>(grid: &G, doors: &DoorRegistry, x: i32, y: i32) -> Color {
    match grid.at(x, y) {
        EMPTY => FLOOR,
        DOOR_TILE => {
            let open = doors.at(x, y).map_or(0.0, |d| d.open_fraction);
            lerp_color(door_color(0.0), FLOOR, open)
        }
        id => palette_color(id),
    }
}

/// First cell shown on one axis so the player stays in view.
fn window_start(player_cell: i32, size: i32) -> i32 {
    if size <= MAX_CELLS {
        0
    } else {
        (player_cell - MAX_CELLS / 2).clamp(0, size - MAX_CELLS)
    }
}

pub fn draw_minimap<G: GridSource + ?Sized>(
    fb: &mut Framebuffer,
    grid: &G,
    doors: &DoorRegistry,
    player: &Player,
    scale: u32,
) {
    let scale = scale.max(1);
    let x0 = window_start(player.pos.x.floor() as i32, grid.width());
    let y0 = window_start(player.pos.y.floor() as i32, grid.height());
    let cols = grid.width().min(MAX_CELLS);
    let rows = grid.height().min(MAX_CELLS);

    for j in 0..rows {
        for i in 0..cols {
            let c = cell_color(grid, doors, x0 + i, y0 + j);
            fb.fill_rect(MARGIN + i as u32 * scale, MARGIN + j as u32 * scale, scale, scale, c);
        }
    }

    // player dot and a short facing line
    let px = MARGIN as f32 + (player.pos.x - x0 as f32) * scale as f32;
    let py = MARGIN as f32 + (player.pos.y - y0 as f32) * scale as f32;
    fb.set_current_color(Color::WHITE);
    let reach = 3.0 * scale as f32;
    let steps = reach.ceil() as u32;
    for s in 0..steps {
        let t = s as f32;
        let lx = px + player.dir.x * t;
        let ly = py + player.dir.y * t;
        if lx >= 0.0 && ly >= 0.0 {
            fb.set_pixel(lx as u32, ly as u32);
        }
    }
    let r = (scale / 2).max(1);
    let cx = px.max(0.0) as u32;
    let cy = py.max(0.0) as u32;
    fb.fill_rect(cx.saturating_sub(r / 2), cy.saturating_sub(r / 2), r, r, Color::YELLOW);
}
