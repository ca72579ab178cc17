use raylib::prelude::*;

use crate::config::Config;
use crate::core::doors::DoorRegistry;
use crate::core::grid::{GridSource, DOOR_TILE, EMPTY};
use crate::core::player::Player;

/// Whether a continuous point can be stood on. Floor always, walls never,
/// door slots once their door is open past the walkable threshold.
pub fn is_walkable<G: GridSource + ?Sized>(grid: &G, doors: &DoorRegistry, point: Vector2) -> bool {
    let cx = point.x.floor() as i32;
    let cy = point.y.floor() as i32;
    match grid.at(cx, cy) {
        EMPTY => true,
        DOOR_TILE => doors.at(cx, cy).is_some_and(|d| d.is_walkable()),
        _ => false,
    }
}

/// Moves by `(dx, dy)`, committing each axis on its own so the player slides
/// along walls. Returns false when neither axis moved.
pub fn try_move<G: GridSource + ?Sized>(
    player: &mut Player,
    grid: &G,
    doors: &DoorRegistry,
    dx: f32,
    dy: f32,
) -> bool {
    let mut moved = false;
    let next_x = player.pos.x + dx;
    if dx != 0.0 && is_walkable(grid, doors, Vector2::new(next_x, player.pos.y)) {
        player.pos.x = next_x;
        moved = true;
    }
    let next_y = player.pos.y + dy;
    if dy != 0.0 && is_walkable(grid, doors, Vector2::new(player.pos.x, next_y)) {
        player.pos.y = next_y;
        moved = true;
    }
    moved
}

/// Edge-triggered commands gathered while polling input.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameInput {
    pub toggle_door: bool,
    pub toggle_minimap: bool,
    pub toggle_console: bool,
}

/// Polls the keyboard: WASD/arrows walk and turn, Shift sprints, E or Space
/// activates the door ahead. Movement is skipped while `movement_locked`.
pub fn process_events<G: GridSource + ?Sized>(
    window: &RaylibHandle,
    player: &mut Player,
    grid: &G,
    doors: &DoorRegistry,
    cfg: &Config,
    dt: f32,
    movement_locked: bool,
) -> FrameInput {
    let input = FrameInput {
        toggle_door: !movement_locked
            && (window.is_key_pressed(KeyboardKey::KEY_E) || window.is_key_pressed(KeyboardKey::KEY_SPACE)),
        toggle_minimap: !movement_locked && window.is_key_pressed(KeyboardKey::KEY_M),
        toggle_console: window.is_key_pressed(KeyboardKey::KEY_GRAVE),
    };
    if movement_locked {
        return input;
    }

    player.sprinting = window.is_key_down(KeyboardKey::KEY_LEFT_SHIFT)
        || window.is_key_down(KeyboardKey::KEY_RIGHT_SHIFT);
    let speed = if player.sprinting { cfg.sprint_speed } else { cfg.move_speed };
    let step = speed * dt;

    let forward = window.is_key_down(KeyboardKey::KEY_W) || window.is_key_down(KeyboardKey::KEY_UP);
    let back = window.is_key_down(KeyboardKey::KEY_S) || window.is_key_down(KeyboardKey::KEY_DOWN);
    if forward {
        let (dx, dy) = (player.dir.x * step, player.dir.y * step);
        try_move(player, grid, doors, dx, dy);
    }
    if back {
        let (dx, dy) = (-player.dir.x * step, -player.dir.y * step);
        try_move(player, grid, doors, dx, dy);
    }

    let rot = cfg.rot_speed * dt;
    if window.is_key_down(KeyboardKey::KEY_A) || window.is_key_down(KeyboardKey::KEY_LEFT) {
        player.rotate(-rot);
    }
    if window.is_key_down(KeyboardKey::KEY_D) || window.is_key_down(KeyboardKey::KEY_RIGHT) {
        player.rotate(rot);
    }

    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;

    fn corridor() -> (Grid, DoorRegistry) {
        // door in the middle of a horizontal corridor
        let g = Grid::from_rows(&[
            &[1, 1, 1, 1, 1],
            &[1, 0, DOOR_TILE, 0, 1],
            &[1, 1, 1, 1, 1],
        ]);
        let doors = DoorRegistry::from_grid(&g);
        (g, doors)
    }

    #[test]
    fn floor_wall_and_door_cells() {
        let (g, mut doors) = corridor();
        assert!(is_walkable(&g, &doors, Vector2::new(1.5, 1.5)));
        assert!(!is_walkable(&g, &doors, Vector2::new(0.5, 1.5)));
        assert!(!is_walkable(&g, &doors, Vector2::new(-3.0, 1.5)));
        assert!(!is_walkable(&g, &doors, Vector2::new(2.5, 1.5)));

        doors.at_mut(2, 1).unwrap().open_fraction = 0.8;
        assert!(!is_walkable(&g, &doors, Vector2::new(2.5, 1.5)));
        doors.at_mut(2, 1).unwrap().open_fraction = 0.81;
        assert!(is_walkable(&g, &doors, Vector2::new(2.5, 1.5)));
    }

    #[test]
    fn unregistered_door_slot_blocks() {
        let (g, _) = corridor();
        let empty = DoorRegistry::default();
        let mut open = DoorRegistry::from_grid(&g);
        open.at_mut(2, 1).unwrap().open_fraction = 1.0;
        assert!(is_walkable(&g, &open, Vector2::new(2.5, 1.5)));
        assert!(!is_walkable(&g, &empty, Vector2::new(2.5, 1.5)));
    }

    #[test]
    fn slides_along_wall() {
        let (g, doors) = corridor();
        let mut p = Player::new(1.5, 1.5, 0.0, 0.66);
        // diagonal push into the top wall still moves along x
        assert!(try_move(&mut p, &g, &doors, -0.3, -0.8));
        assert!((p.pos.x - 1.2).abs() < 1e-6);
        assert!((p.pos.y - 1.5).abs() < 1e-6);
        // straight into the wall does nothing
        assert!(!try_move(&mut p, &g, &doors, -0.5, 0.0));
    }

    #[test]
    fn closed_door_blocks_movement() {
        let (g, mut doors) = corridor();
        let mut p = Player::new(1.9, 1.5, 0.0, 0.66);
        assert!(!try_move(&mut p, &g, &doors, 0.2, 0.0));
        doors.at_mut(2, 1).unwrap().open_fraction = 0.9;
        assert!(try_move(&mut p, &g, &doors, 0.2, 0.0));
        assert!(p.pos.x > 2.0);
    }
}
