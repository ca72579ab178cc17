// main.rs
mod audio;
mod config;
mod core;
mod error;
mod logs;
mod render;

use clap::Parser;
use raylib::prelude::*;
use tracing::{debug, error, info};

use crate::audio::AudioManager;
use crate::config::{Args, Config};
use crate::core::console::{Console, ConsoleAction, ConsoleContext};
use crate::core::doors::DoorRegistry;
use crate::core::grid::{load_grid, Grid};
use crate::core::mapgen;
use crate::core::movement::process_events;
use crate::core::player::Player;
use crate::error::{GameError, Result};
use crate::render::framebuffer::Framebuffer;
use crate::render::hud::draw_minimap;
use crate::render::render3d::render_3d;
use crate::render::textures::TextureManager;

const CONSOLE_LINES: usize = 12;

/// Map precedence: `--map`, then `--demo`, then a generated map.
fn choose_map(args: &Args) -> Result<Grid> {
    if let Some(path) = &args.map {
        info!(path = %path.display(), "loading map");
        return load_grid(path);
    }
    if args.demo {
        info!("using demo map");
        return Ok(Grid::demo());
    }
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "generating map");
    Ok(mapgen::generate(seed, args.width, args.height))
}

fn run(args: Args) -> Result<()> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let grid = choose_map(&args)?;
    let (sx, sy) = grid.spawn_point()?;
    let mut doors = DoorRegistry::from_grid(&grid);
    info!(w = grid.width, h = grid.height, doors = doors.len(), "map ready");

    let mut player = Player::new(sx, sy, 0.0, cfg.fov_plane);
    let mut console = Console::default();
    let mut show_minimap = true;

    let (mut window, raylib_thread) = raylib::init()
        .size(cfg.screen_width as i32, cfg.screen_height as i32)
        .title("Doorcaster")
        .build();
    window.set_target_fps(cfg.target_fps);
    window.set_exit_key(None);

    let textures = TextureManager::load();
    info!(count = textures.len(), "textures ready");
    let audio = AudioManager::new();

    let mut framebuffer = Framebuffer::new(cfg.screen_width, cfg.screen_height);
    let blank = Image::gen_image_color(cfg.screen_width as i32, cfg.screen_height as i32, Color::BLACK);
    let mut screen = window
        .load_texture_from_image(&raylib_thread, &blank)
        .map_err(|e| GameError::Graphics(e.to_string()))?;

    while !window.window_should_close() {
        let dt = window.get_frame_time();

        let input = process_events(&window, &mut player, &grid, &doors, &cfg, dt, console.open);
        if input.toggle_console {
            console.set_open(!console.open);
        }
        if input.toggle_minimap {
            show_minimap = !show_minimap;
        }

        if console.open && !input.toggle_console {
            while let Some(c) = window.get_char_pressed() {
                if c != '`' {
                    console.push_char(c);
                }
            }
            if window.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
                console.backspace();
            }
            if window.is_key_pressed(KeyboardKey::KEY_UP) {
                console.history_up();
            }
            if window.is_key_pressed(KeyboardKey::KEY_DOWN) {
                console.history_down();
            }
            if window.is_key_pressed(KeyboardKey::KEY_ENTER) {
                let ctx = ConsoleContext { cfg: &mut cfg, player: &player, doors: &doors };
                if console.submit(ctx) == ConsoleAction::Quit {
                    info!("quit from console");
                    break;
                }
            }
        }

        if input.toggle_door {
            if let Some(index) = doors.toggle_ahead(&grid, player.pos, player.dir) {
                debug!(door = index, "door toggled");
            }
        }

        // doors settle before any ray of this frame
        let events = doors.update(player.pos, dt);
        for ev in &events {
            debug!(door = ev.index, x = ev.cell.0, y = ev.cell.1, from = ?ev.from, to = ?ev.to, "door state");
        }
        if let Some(audio) = &audio {
            audio.on_door_events(&events);
        }

        render_3d(&mut framebuffer, &grid, &doors, &player, &textures, cfg.wall_height);
        if show_minimap {
            draw_minimap(&mut framebuffer, &grid, &doors, &player, cfg.minimap_scale);
        }
        framebuffer.upload_to_texture(&mut screen);

        let fps_now = window.get_fps();
        let door_hint = doors.door_ahead(&grid, player.pos, player.dir).is_some();
        let h = cfg.screen_height as i32;

        let mut d = window.begin_drawing(&raylib_thread);
        d.clear_background(Color::BLACK);
        d.draw_texture(&screen, 0, 0, Color::WHITE);

        if cfg.show_fps {
            d.draw_text(&format!("FPS: {fps_now}"), cfg.screen_width as i32 - 100, 10, 20, Color::WHITE);
        }
        if player.sprinting {
            d.draw_text("SPRINT", cfg.screen_width as i32 - 100, 34, 20, Color::RED);
        }
        if door_hint && !console.open {
            d.draw_text("[E] door", cfg.screen_width as i32 / 2 - 40, h - 40, 20, Color::YELLOW);
        }
        if console.open {
            let lines = console.log();
            let start = lines.len().saturating_sub(CONSOLE_LINES);
            let top = h - 20 * (CONSOLE_LINES as i32 + 2);
            d.draw_rectangle(0, top, cfg.screen_width as i32, h - top, Color::new(0, 0, 0, 180));
            for (i, line) in lines[start..].iter().enumerate() {
                d.draw_text(line, 10, top + 6 + 20 * i as i32, 18, Color::LIGHTGRAY);
            }
            d.draw_text(&format!("> {}_", console.input), 10, h - 26, 18, Color::WHITE);
        }
    }

    info!("bye");
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = logs::setup_logging() {
        eprintln!("{e}");
    }
    if let Err(e) = run(args) {
        error!(error = %e, "fatal");
        std::process::exit(1);
    }
}
