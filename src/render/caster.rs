//! Grid ray marching (DDA) with sliding-door intersection.

use raylib::prelude::Vector2;

use crate::core::doors::{Door, DoorRegistry, Orientation};
use crate::core::grid::{is_static_wall, GridSource, DOOR_TILE};

/// Rays this close to parallel with a door panel never hit it.
const PARALLEL_EPS: f32 = 1e-6;
/// Door hits nearer than this are behind or at the eye.
const MIN_HIT_T: f32 = 1e-4;

/// Grid line a ray crossed when it hit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// Crossed a vertical grid line (x = const): an east or west face.
    EastWest,
    /// Crossed a horizontal grid line (y = const): a north or south face. Drawn darker.
    NorthSouth,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Surface {
    Wall(i32),
    Door { index: usize, open_fraction: f32 },
}

impl Surface {
    /// Palette/texture id.
    pub fn id(&self) -> i32 {
        match *self {
            Surface::Wall(id) => id,
            Surface::Door { .. } => DOOR_TILE,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Hit {
    /// Along the camera's forward axis when `ray_dir` is `dir + plane * k`,
    /// Euclidean for a unit `ray_dir`.
    pub distance: f32,
    pub side: Side,
    pub surface: Surface,
    pub cell: (i32, i32),
    /// World point `origin + ray_dir * distance`.
    pub point: Vector2,
}

/// Where `ray_dir` from `origin` crosses the panel of `door`, as the ray
/// parameter and the face it shows. `None` when the ray is parallel to the
/// panel, the crossing is behind the origin, or it lands in the open part.
///
/// The panel lies on the cell midline of the non-sliding axis and covers
/// `[cell + open_fraction, cell + 1]` on the sliding axis.
pub fn door_hit(door: &Door, origin: Vector2, ray_dir: Vector2) -> Option<(f32, Side)> {
    let (cx, cy) = door.cell();
    let (cx, cy) = (cx as f32, cy as f32);
    let (plane_origin, plane_dir, along_origin, along_dir, cell_plane, cell_along, side) =
        match door.orientation() {
            Orientation::SlidesIntoYWall => {
                (origin.x, ray_dir.x, origin.y, ray_dir.y, cx, cy, Side::EastWest)
            }
            Orientation::SlidesIntoXWall => {
                (origin.y, ray_dir.y, origin.x, ray_dir.x, cy, cx, Side::NorthSouth)
            }
        };

    if plane_dir.abs() < PARALLEL_EPS {
        return None;
    }
    let t = (cell_plane + 0.5 - plane_origin) / plane_dir;
    if t <= MIN_HIT_T {
        return None;
    }
    let along = along_origin + t * along_dir;
    let min = cell_along + door.open_fraction;
    let max = cell_along + 1.0;
    (along >= min && along <= max).then_some((t, side))
}

/// Marches from `origin` along `ray_dir` one grid line at a time and returns
/// the first opaque surface: a static wall, or a door panel that is not yet
/// see-through. Out-of-bounds cells read as walls, so `None` only comes back
/// for a zero direction or a grid that never reports solid.
pub fn cast_ray<G: GridSource + ?Sized>(
    grid: &G,
    doors: &DoorRegistry,
    origin: Vector2,
    ray_dir: Vector2,
) -> Option<Hit> {
    if ray_dir.x == 0.0 && ray_dir.y == 0.0 {
        return None;
    }

    let mut map_x = origin.x.floor() as i32;
    let mut map_y = origin.y.floor() as i32;

    let delta_dist_x = if ray_dir.x == 0.0 { f32::INFINITY } else { (1.0 / ray_dir.x).abs() };
    let delta_dist_y = if ray_dir.y == 0.0 { f32::INFINITY } else { (1.0 / ray_dir.y).abs() };

    let (step_x, mut side_dist_x) = if ray_dir.x < 0.0 {
        (-1, (origin.x - map_x as f32) * delta_dist_x)
    } else {
        (1, (map_x as f32 + 1.0 - origin.x) * delta_dist_x)
    };
    let (step_y, mut side_dist_y) = if ray_dir.y < 0.0 {
        (-1, (origin.y - map_y as f32) * delta_dist_y)
    } else {
        (1, (map_y as f32 + 1.0 - origin.y) * delta_dist_y)
    };

    // one step past the far edge of the grid from anywhere inside it
    let max_steps = grid.width().unsigned_abs() as u64
        + grid.height().unsigned_abs() as u64
        + map_x.unsigned_abs() as u64
        + map_y.unsigned_abs() as u64
        + 4;

    for _ in 0..max_steps {
        let side = if side_dist_x < side_dist_y {
            side_dist_x += delta_dist_x;
            map_x = map_x.saturating_add(step_x);
            Side::EastWest
        } else {
            side_dist_y += delta_dist_y;
            map_y = map_y.saturating_add(step_y);
            Side::NorthSouth
        };

        let tile = grid.at(map_x, map_y);
        if tile == DOOR_TILE {
            let Some(index) = doors.index_at(map_x, map_y) else { continue };
            let Some(door) = doors.get(index) else { continue };
            if door.is_see_through() {
                continue;
            }
            if let Some((t, door_side)) = door_hit(door, origin, ray_dir) {
                return Some(Hit {
                    distance: t,
                    side: door_side,
                    surface: Surface::Door { index, open_fraction: door.open_fraction },
                    cell: (map_x, map_y),
                    point: Vector2::new(origin.x + ray_dir.x * t, origin.y + ray_dir.y * t),
                });
            }
            continue;
        }

        if is_static_wall(tile) {
            let distance = match side {
                Side::EastWest => side_dist_x - delta_dist_x,
                Side::NorthSouth => side_dist_y - delta_dist_y,
            };
            return Some(Hit {
                distance,
                side,
                surface: Surface::Wall(tile),
                cell: (map_x, map_y),
                point: Vector2::new(origin.x + ray_dir.x * distance, origin.y + ray_dir.y * distance),
            });
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::Grid;

    const EPS: f32 = 1e-4;

    /// Long east-west corridor ending in wall 3 at x = 9.
    fn corridor() -> Grid {
        Grid::from_rows(&[
            &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 0, 0, 0, 0, 0, 3],
            &[1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
        ])
    }

    /// Horizontal corridor with a door at (3, 1), walls above and below.
    fn door_corridor(open: f32) -> (Grid, DoorRegistry) {
        let g = Grid::from_rows(&[
            &[1, 1, 1, 1, 1, 1, 1],
            &[1, 0, 0, DOOR_TILE, 0, 0, 2],
            &[1, 1, 1, 1, 1, 1, 1],
        ]);
        let mut doors = DoorRegistry::from_grid(&g);
        doors.at_mut(3, 1).unwrap().open_fraction = open;
        (g, doors)
    }

    #[test]
    fn corridor_distance_is_analytic() {
        let g = corridor();
        let doors = DoorRegistry::default();
        let hit = cast_ray(&g, &doors, Vector2::new(1.5, 1.5), Vector2::new(1.0, 0.0)).unwrap();
        assert!((hit.distance - 7.5).abs() < EPS);
        assert_eq!(hit.side, Side::EastWest);
        assert_eq!(hit.surface, Surface::Wall(3));
        assert_eq!(hit.cell, (9, 1));
        assert!((hit.point.x - 9.0).abs() < EPS);

        let hit = cast_ray(&g, &doors, Vector2::new(4.25, 1.5), Vector2::new(0.0, -1.0)).unwrap();
        assert!((hit.distance - 0.5).abs() < EPS);
        assert_eq!(hit.side, Side::NorthSouth);
        assert_eq!(hit.surface, Surface::Wall(1));
    }

    #[test]
    fn diagonal_distance_matches_euclid() {
        let g = Grid::from_rows(&[
            &[1, 1, 1, 1, 1, 1],
            &[1, 0, 0, 0, 0, 1],
            &[1, 0, 0, 0, 0, 1],
            &[1, 0, 0, 0, 0, 1],
            &[1, 0, 0, 0, 0, 1],
            &[1, 1, 1, 1, 1, 4],
        ]);
        let doors = DoorRegistry::default();
        let d = 1.0 / 2.0_f32.sqrt();
        let origin = Vector2::new(1.25, 1.5);
        let hit = cast_ray(&g, &doors, origin, Vector2::new(d, d)).unwrap();
        // crosses y = 5 at x = 4.75, before reaching x = 5
        assert_eq!(hit.side, Side::NorthSouth);
        assert_eq!(hit.cell, (4, 5));
        let expected = ((4.75f32 - 1.25).powi(2) + (5.0f32 - 1.5).powi(2)).sqrt();
        assert!((hit.distance - expected).abs() < EPS);
    }

    #[test]
    fn out_of_bounds_acts_as_wall() {
        let g = Grid::filled(3, 3, 0);
        let doors = DoorRegistry::default();
        let hit = cast_ray(&g, &doors, Vector2::new(1.5, 1.5), Vector2::new(-1.0, 0.0)).unwrap();
        assert!((hit.distance - 1.5).abs() < EPS);
        assert_eq!(hit.cell, (-1, 1));
        assert_eq!(hit.surface, Surface::Wall(1));
    }

    #[test]
    fn far_outside_origin_stays_total() {
        let g = corridor();
        let doors = DoorRegistry::default();
        // floor() saturates to i32::MIN/MAX for these
        let hit = cast_ray(&g, &doors, Vector2::new(-1e12, 1.5), Vector2::new(1.0, 0.0)).unwrap();
        assert_eq!(hit.surface, Surface::Wall(1));
        let hit = cast_ray(&g, &doors, Vector2::new(1e12, -1e12), Vector2::new(-1.0, -1.0)).unwrap();
        assert_eq!(hit.surface, Surface::Wall(1));
    }

    #[test]
    fn zero_direction_misses() {
        let g = corridor();
        assert!(cast_ray(&g, &DoorRegistry::default(), Vector2::new(1.5, 1.5), Vector2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn closed_door_hit_at_midline() {
        let (g, doors) = door_corridor(0.0);
        let hit = cast_ray(&g, &doors, Vector2::new(1.5, 1.5), Vector2::new(1.0, 0.0)).unwrap();
        assert!((hit.distance - 2.0).abs() < EPS);
        assert_eq!(hit.side, Side::EastWest);
        assert!(matches!(hit.surface, Surface::Door { index: 0, .. }));
        assert_eq!(hit.surface.id(), DOOR_TILE);
    }

    #[test]
    fn see_through_door_is_skipped() {
        let (g, doors) = door_corridor(0.995);
        let hit = cast_ray(&g, &doors, Vector2::new(1.5, 1.5), Vector2::new(1.0, 0.0)).unwrap();
        assert_eq!(hit.surface, Surface::Wall(2));
        assert!((hit.distance - 4.5).abs() < EPS);
    }

    #[test]
    fn sliding_boundary_separates_hit_and_miss() {
        // panel at x = 3.5 covers y in [1 + f, 2]
        let f = 0.4;
        let (g, doors) = door_corridor(f);
        let origin = Vector2::new(1.5, 1.5);
        let aim = |y: f32| Vector2::new(3.5 - origin.x, y - origin.y);

        // just inside the open part: passes through to the end wall
        let miss = cast_ray(&g, &doors, origin, aim(1.0 + f - 0.01)).unwrap();
        assert!(!matches!(miss.surface, Surface::Door { .. }));

        // just inside the still-closed part
        let hit = cast_ray(&g, &doors, origin, aim(1.0 + f + 0.01)).unwrap();
        assert!(matches!(hit.surface, Surface::Door { .. }));
        assert!((hit.distance - 1.0).abs() < EPS);
        assert!((hit.point.y - (1.0 + f + 0.01)).abs() < EPS);
    }

    #[test]
    fn door_hit_rejects_parallel_and_behind() {
        let (_, doors) = door_corridor(0.0);
        let door = doors.get(0).unwrap();
        // parallel to the x = 3.5 panel
        assert!(door_hit(door, Vector2::new(3.2, 1.5), Vector2::new(0.0, 1.0)).is_none());
        // panel behind the origin
        assert!(door_hit(door, Vector2::new(4.5, 1.5), Vector2::new(1.0, 0.0)).is_none());
        // standing on the panel
        assert!(door_hit(door, Vector2::new(3.5, 1.5), Vector2::new(1.0, 0.0)).is_none());
        // from the far side
        let (t, side) = door_hit(door, Vector2::new(5.5, 1.5), Vector2::new(-1.0, 0.0)).unwrap();
        assert!((t - 2.0).abs() < EPS);
        assert_eq!(side, Side::EastWest);
    }

    #[test]
    fn door_sliding_into_x_wall() {
        // vertical corridor, door at (1, 2) with walls left and right
        let g = Grid::from_rows(&[
            &[1, 1, 1],
            &[1, 0, 1],
            &[1, DOOR_TILE, 1],
            &[1, 0, 1],
            &[1, 4, 1],
        ]);
        let mut doors = DoorRegistry::from_grid(&g);
        doors.at_mut(1, 2).unwrap().open_fraction = 0.5;
        let origin = Vector2::new(1.25, 1.1);
        // panel at y = 2.5 covers x in [1.5, 2]; straight down at x = 1.25 is open
        let hit = cast_ray(&g, &doors, origin, Vector2::new(0.0, 1.0)).unwrap();
        assert_eq!(hit.surface, Surface::Wall(4));
        let origin = Vector2::new(1.75, 1.1);
        let hit = cast_ray(&g, &doors, origin, Vector2::new(0.0, 1.0)).unwrap();
        assert!(matches!(hit.surface, Surface::Door { .. }));
        assert_eq!(hit.side, Side::NorthSouth);
        assert!((hit.distance - 1.4).abs() < EPS);
    }
}
