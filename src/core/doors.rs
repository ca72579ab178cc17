//! Sliding doors: extraction from the grid, lookup by cell, and the
//! per-frame open/close animation.

use std::collections::HashMap;

use raylib::prelude::Vector2;

use crate::core::grid::{is_solid, GridSource, DOOR_TILE};

/// Open fraction gained or lost per second.
pub const OPEN_SPEED: f32 = 1.2;
/// Seconds a fully open, unoccupied door waits before closing by itself.
pub const AUTO_CLOSE_DELAY: f32 = 5.0;
/// From this open fraction on rays pass through the door cell untouched.
pub const RENDER_OPEN_FRACTION: f32 = 0.99;
/// Above this open fraction the door cell can be walked through.
/// Lower than [`RENDER_OPEN_FRACTION`]: a door is passable before it has fully disappeared.
pub const WALKABLE_OPEN_FRACTION: f32 = 0.8;
/// How far ahead of the player the toggle command looks for a door.
pub const TOGGLE_PROBE_DIST: f32 = 1.2;

/// Which way the door panel travels when it opens.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Walls above and below; the corridor runs along X. The panel sits on
    /// the vertical midline `x = cell_x + 0.5` and slides along Y into the
    /// wall at `y + 1`.
    SlidesIntoYWall,
    /// Walls left and right; the corridor runs along Y. The panel sits on
    /// `y = cell_y + 0.5` and slides along X into the wall at `x + 1`.
    SlidesIntoXWall,
}

/// Picks the sliding axis from the solid neighbours of `(x, y)`.
///
/// A cell walled above and below slides into Y. Anything else, including a
/// cell walled only left and right, slides into X.
pub fn derive_orientation<G: GridSource + ?Sized>(grid: &G, x: i32, y: i32) -> Orientation {
    let walls_up_down = is_solid(grid.at(x, y - 1)) && is_solid(grid.at(x, y + 1));
    if walls_up_down {
        Orientation::SlidesIntoYWall
    } else {
        Orientation::SlidesIntoXWall
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DoorState { Closed, Opening, Open, Closing }

#[derive(Clone, Debug, PartialEq)]
pub struct Door {
    cell_x: i32,
    cell_y: i32,
    orientation: Orientation,
    /// 0 closed, 1 slid completely into the wall.
    pub open_fraction: f32,
    pub target_open: bool,
    pub time_fully_open: f32,
}

impl Door {
    pub fn new(cell_x: i32, cell_y: i32, orientation: Orientation) -> Self {
        Self {
            cell_x,
            cell_y,
            orientation,
            open_fraction: 0.0,
            target_open: false,
            time_fully_open: 0.0,
        }
    }

    pub fn cell(&self) -> (i32, i32) { (self.cell_x, self.cell_y) }
    pub fn orientation(&self) -> Orientation { self.orientation }

    pub fn state(&self) -> DoorState {
        if self.open_fraction <= 0.0 {
            // commanded open but not started yet still reads as closed
            DoorState::Closed
        } else if self.open_fraction >= 1.0 {
            DoorState::Open
        } else if self.target_open {
            DoorState::Opening
        } else {
            DoorState::Closing
        }
    }

    /// Inclusive on all four edges.
    pub fn contains(&self, pos: Vector2) -> bool {
        let (x, y) = (self.cell_x as f32, self.cell_y as f32);
        pos.x >= x && pos.x <= x + 1.0 && pos.y >= y && pos.y <= y + 1.0
    }

    pub fn is_walkable(&self) -> bool {
        self.open_fraction > WALKABLE_OPEN_FRACTION
    }

    pub fn is_see_through(&self) -> bool {
        self.open_fraction >= RENDER_OPEN_FRACTION
    }

    /// Advances the animation by `dt` seconds.
    pub fn step(&mut self, player_pos: Vector2, dt: f32) {
        let dt = dt.max(0.0);
        let occupied = self.contains(player_pos);
        if occupied {
            self.target_open = true;
            self.time_fully_open = 0.0;
        }

        if self.target_open {
            self.open_fraction = (self.open_fraction + OPEN_SPEED * dt).min(1.0);
            if self.open_fraction >= 1.0 {
                self.time_fully_open += dt;
                if !occupied && self.time_fully_open >= AUTO_CLOSE_DELAY {
                    self.target_open = false;
                }
            } else {
                self.time_fully_open = 0.0;
            }
        } else {
            self.time_fully_open = 0.0;
            self.open_fraction = (self.open_fraction - OPEN_SPEED * dt).max(0.0);
        }
    }
}

/// A door whose derived state changed during an update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DoorEvent {
    pub index: usize,
    pub cell: (i32, i32),
    pub from: DoorState,
    pub to: DoorState,
}

/// Owns every door on the map. Doors live in a flat arena; cells map to
/// arena indices.
#[derive(Debug, Default)]
pub struct DoorRegistry {
    doors: Vec<Door>,
    by_cell: HashMap<(i32, i32), usize>,
}

impl DoorRegistry {
    /// Creates one closed door per door slot, in row-major order.
    pub fn from_grid<G: GridSource + ?Sized>(grid: &G) -> Self {
        let mut reg = Self::default();
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if grid.at(x, y) == DOOR_TILE {
                    let door = Door::new(x, y, derive_orientation(grid, x, y));
                    reg.by_cell.insert((x, y), reg.doors.len());
                    reg.doors.push(door);
                }
            }
        }
        reg
    }

    pub fn len(&self) -> usize { self.doors.len() }
    pub fn is_empty(&self) -> bool { self.doors.is_empty() }

    pub fn index_at(&self, x: i32, y: i32) -> Option<usize> {
        self.by_cell.get(&(x, y)).copied()
    }

    pub fn at(&self, x: i32, y: i32) -> Option<&Door> {
        self.index_at(x, y).map(|i| &self.doors[i])
    }

    pub fn at_mut(&mut self, x: i32, y: i32) -> Option<&mut Door> {
        self.index_at(x, y).map(move |i| &mut self.doors[i])
    }

    pub fn get(&self, index: usize) -> Option<&Door> {
        self.doors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Door> {
        self.doors.iter()
    }

    /// Runs one frame of the door animation. Must happen before any ray of
    /// the same frame is cast.
    pub fn update(&mut self, player_pos: Vector2, dt: f32) -> Vec<DoorEvent> {
        let mut events = Vec::new();
        for (index, door) in self.doors.iter_mut().enumerate() {
            let from = door.state();
            door.step(player_pos, dt);
            let to = door.state();
            if from != to {
                events.push(DoorEvent { index, cell: door.cell(), from, to });
            }
        }
        events
    }

    /// Door cell `TOGGLE_PROBE_DIST` ahead of `pos` along `dir`, if that cell is a door slot.
    pub fn door_ahead<G: GridSource + ?Sized>(&self, grid: &G, pos: Vector2, dir: Vector2) -> Option<usize> {
        let cx = (pos.x + dir.x * TOGGLE_PROBE_DIST).floor() as i32;
        let cy = (pos.y + dir.y * TOGGLE_PROBE_DIST).floor() as i32;
        if grid.at(cx, cy) != DOOR_TILE {
            return None;
        }
        self.index_at(cx, cy)
    }

    /// Flips the commanded state of the door ahead. Returns its index, or
    /// `None` when there is no door in range.
    pub fn toggle_ahead<G: GridSource + ?Sized>(&mut self, grid: &G, pos: Vector2, dir: Vector2) -> Option<usize> {
        let index = self.door_ahead(grid, pos, dir)?;
        let door = &mut self.doors[index];
        door.target_open = !door.target_open;
        Some(index)
    }
}
