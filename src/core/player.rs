use raylib::prelude::Vector2;

/// Camera in grid units: position, unit facing direction and the camera
/// plane perpendicular to it. The plane length sets the field of view.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vector2,
    pub dir: Vector2,
    pub plane: Vector2,
    pub sprinting: bool,
}

impl Player {
    /// `angle` in radians, 0 faces +X.
    pub fn new(x: f32, y: f32, angle: f32, fov_plane: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            pos: Vector2::new(x, y),
            dir: Vector2::new(cos, sin),
            // plane is dir rotated a quarter turn clockwise on screen
            plane: Vector2::new(-sin * fov_plane, cos * fov_plane),
            sprinting: false,
        }
    }

    /// Rotates facing and camera plane together.
    pub fn rotate(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let rot = |v: Vector2| Vector2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
        self.dir = rot(self.dir);
        self.plane = rot(self.plane);
    }

    /// Ray direction for screen column `x` of `width`; the leftmost column maps
    /// to `dir - plane`, the rightmost to `dir + plane`.
    pub fn ray_dir(&self, x: u32, width: u32) -> Vector2 {
        let camera_x = 2.0 * x as f32 / width.max(1) as f32 - 1.0;
        Vector2::new(self.dir.x + self.plane.x * camera_x, self.dir.y + self.plane.y * camera_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn plane_is_perpendicular() {
        let p = Player::new(1.0, 1.0, 0.7, 0.66);
        let dot = p.dir.x * p.plane.x + p.dir.y * p.plane.y;
        assert!(dot.abs() < 1e-6);
        let len = (p.plane.x * p.plane.x + p.plane.y * p.plane.y).sqrt();
        assert!((len - 0.66).abs() < 1e-5);
    }

    #[test]
    fn rotate_keeps_unit_facing() {
        let mut p = Player::new(0.0, 0.0, 0.0, 0.66);
        p.rotate(FRAC_PI_2);
        assert!(p.dir.x.abs() < 1e-6);
        assert!((p.dir.y - 1.0).abs() < 1e-6);
        assert!((p.dir.y.atan2(p.dir.x) - FRAC_PI_2).abs() < 1e-6);
        for _ in 0..1000 {
            p.rotate(0.013);
        }
        let len = (p.dir.x * p.dir.x + p.dir.y * p.dir.y).sqrt();
        assert!((len - 1.0).abs() < 1e-3);
    }

    #[test]
    fn center_column_looks_straight_ahead() {
        let p = Player::new(0.0, 0.0, 0.3, 0.66);
        let d = p.ray_dir(320, 640);
        assert!((d.x - p.dir.x).abs() < 1e-6);
        assert!((d.y - p.dir.y).abs() < 1e-6);
    }
}
