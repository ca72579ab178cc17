//! Random room-and-corridor maps with door slots in narrow passages.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::core::grid::{Grid, GridSource, BOUNDARY, DOOR_TILE, EMPTY};

const ROOM_ATTEMPTS: u32 = 200;
const DOOR_CHANCE: f64 = 0.1;
pub const MIN_SIDE: usize = 32;
pub const MAX_SIDE: usize = 256;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct Room { x: i32, y: i32, w: i32, h: i32 }

impl Room {
    fn center(&self) -> (i32, i32) { (self.x + self.w / 2, self.y + self.h / 2) }

    fn intersects(&self, o: &Room) -> bool {
        self.x <= o.x + o.w && self.x + self.w >= o.x && self.y <= o.y + o.h && self.y + self.h >= o.y
    }

    fn grown(&self) -> Room {
        Room { x: self.x - 1, y: self.y - 1, w: self.w + 2, h: self.h + 2 }
    }
}

fn fill_rect(g: &mut Grid, x: i32, y: i32, w: i32, h: i32, code: i32) {
    for yy in y..y + h {
        for xx in x..x + w {
            g.set(xx, yy, code);
        }
    }
}

fn carve_h(g: &mut Grid, x1: i32, x2: i32, y: i32) {
    for x in x1.min(x2)..=x1.max(x2) {
        g.set(x, y, EMPTY);
    }
}

fn carve_v(g: &mut Grid, y1: i32, y2: i32, x: i32) {
    for y in y1.min(y2)..=y1.max(y2) {
        g.set(x, y, EMPTY);
    }
}

/// Floor cell pinched between two walls on one axis and open on the other.
fn valid_door_spot(g: &Grid, x: i32, y: i32) -> bool {
    if x <= 0 || y <= 0 || x >= g.width - 1 || y >= g.height - 1 {
        return false;
    }
    let (l, r, u, d) = (g.at(x - 1, y), g.at(x + 1, y), g.at(x, y - 1), g.at(x, y + 1));
    let walls_lr = l > 0 && r > 0 && u == EMPTY && d == EMPTY;
    let walls_ud = u > 0 && d > 0 && l == EMPTY && r == EMPTY;
    walls_lr || walls_ud
}

/// Map sides are drawn from `MIN_SIDE..=MAX_SIDE` unless given; given sides
/// are clamped to `8..=MAX_SIDE`.
pub fn generate(seed: u64, width: Option<usize>, height: Option<usize>) -> Grid {
    let mut rng = StdRng::seed_from_u64(seed);
    let w = width.unwrap_or_else(|| rng.gen_range(MIN_SIDE..=MAX_SIDE)).clamp(8, MAX_SIDE) as i32;
    let h = height.unwrap_or_else(|| rng.gen_range(MIN_SIDE..=MAX_SIDE)).clamp(8, MAX_SIDE) as i32;
    generate_with(&mut rng, w, h)
}

fn generate_with(rng: &mut StdRng, w: i32, h: i32) -> Grid {
    let mut g = Grid::filled(w, h, BOUNDARY);
    let mut rooms: Vec<Room> = Vec::new();

    for _ in 0..ROOM_ATTEMPTS {
        let rw = rng.gen_range(6..=14);
        let rh = rng.gen_range(6..=12);
        if rw >= w - 2 || rh >= h - 2 {
            continue;
        }
        let candidate = Room {
            x: rng.gen_range(1..=w - rw - 2),
            y: rng.gen_range(1..=h - rh - 2),
            w: rw,
            h: rh,
        };
        if rooms.iter().any(|r| candidate.grown().intersects(r)) {
            continue;
        }
        fill_rect(&mut g, candidate.x, candidate.y, candidate.w, candidate.h, EMPTY);
        // each room gets its own wall color on its rim
        let color = rng.gen_range(1..=4);
        for yy in candidate.y - 1..=candidate.y + candidate.h {
            for xx in candidate.x - 1..=candidate.x + candidate.w {
                if g.in_bounds(xx, yy) && g.at(xx, yy) == BOUNDARY {
                    g.set(xx, yy, color);
                }
            }
        }
        rooms.push(candidate);
    }

    if rooms.is_empty() {
        fill_rect(&mut g, 2, 2, w - 4, h - 4, EMPTY);
    }

    for pair in rooms.windows(2) {
        let (x1, y1) = pair[0].center();
        let (x2, y2) = pair[1].center();
        if rng.gen_bool(0.5) {
            carve_h(&mut g, x1, x2, y1);
            carve_v(&mut g, y1, y2, x2);
        } else {
            carve_v(&mut g, y1, y2, x1);
            carve_h(&mut g, x1, x2, y2);
        }
    }
    if rooms.len() >= 3 {
        for _ in 0..rooms.len() / 3 {
            let a = rng.gen_range(0..rooms.len());
            let b = rng.gen_range(0..rooms.len());
            if a == b {
                continue;
            }
            let (x1, y1) = rooms[a].center();
            let (x2, y2) = rooms[b].center();
            carve_h(&mut g, x1, x2, y1);
            carve_v(&mut g, y1, y2, x2);
        }
    }

    for x in 0..w {
        g.set(x, 0, BOUNDARY);
        g.set(x, h - 1, BOUNDARY);
    }
    for y in 0..h {
        g.set(0, y, BOUNDARY);
        g.set(w - 1, y, BOUNDARY);
    }

    // decided cell by cell in scan order, so a new door can rule out its neighbour
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            if g.at(x, y) == EMPTY && valid_door_spot(&g, x, y) && rng.gen_bool(DOOR_CHANCE) {
                g.set(x, y, DOOR_TILE);
            }
        }
    }

    if let Some(first) = rooms.first() {
        let (cx, cy) = first.center();
        g.set_spawn(cx, cy);
    }

    debug!(w, h, rooms = rooms.len(), "generated map");
    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_map() {
        let a = generate(7, Some(48), Some(40));
        let b = generate(7, Some(48), Some(40));
        assert_eq!(a, b);
        assert_eq!(a.width, 48);
        assert_eq!(a.height, 40);
    }

    #[test]
    fn border_is_solid_and_map_is_playable() {
        for seed in 0..8 {
            let g = generate(seed, Some(40), Some(40));
            for x in 0..g.width {
                assert_eq!(g.at(x, 0), BOUNDARY);
                assert_eq!(g.at(x, g.height - 1), BOUNDARY);
            }
            for y in 0..g.height {
                assert_eq!(g.at(0, y), BOUNDARY);
                assert_eq!(g.at(g.width - 1, y), BOUNDARY);
            }
            let (sx, sy) = g.spawn_point().unwrap();
            assert_eq!(g.at(sx.floor() as i32, sy.floor() as i32), EMPTY);
        }
    }

    #[test]
    fn doors_sit_between_walls() {
        for seed in 0..16 {
            let g = generate(seed, Some(64), Some(64));
            for (x, y) in g.door_slots() {
                let lr = g.at(x - 1, y) > 0 && g.at(x + 1, y) > 0;
                let ud = g.at(x, y - 1) > 0 && g.at(x, y + 1) > 0;
                assert!(lr || ud, "door at {x},{y} not in a passage");
            }
        }
    }

    #[test]
    fn random_size_in_range() {
        let g = generate(3, None, None);
        assert!((MIN_SIDE as i32..=MAX_SIDE as i32).contains(&g.width));
        assert!((MIN_SIDE as i32..=MAX_SIDE as i32).contains(&g.height));
    }

    #[test]
    fn oversized_request_is_clamped() {
        let g = generate(1, Some(1 << 20), Some(usize::MAX));
        assert_eq!(g.width, MAX_SIDE as i32);
        assert_eq!(g.height, MAX_SIDE as i32);
        let g = generate(1, Some(0), Some(3));
        assert_eq!((g.width, g.height), (8, 8));
    }

    #[test]
    fn tiny_map_falls_back_to_open_box() {
        let g = generate(1, Some(8), Some(8));
        assert_eq!(g.at(3, 3), EMPTY);
        assert_eq!(g.at(0, 0), BOUNDARY);
    }
}
