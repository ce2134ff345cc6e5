pub use glam::Vec2 as Vector2;

pub trait Planar {
    /// `atan2(y, x)`, and 0 for the zero vector.
    fn direction(self) -> f32;
    /// Counter-clockwise rotation by `angle` radians.
    fn rotated(self, angle: f32) -> Vector2;
}

impl Planar for Vector2 {
    fn direction(self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            0.0
        } else {
            self.y.atan2(self.x)
        }
    }

    fn rotated(self, angle: f32) -> Vector2 {
        Vector2::from_angle(angle).rotate(self)
    }
}

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::PI;
    let a = (angle + PI).rem_euclid(2.0 * PI) - PI;
    if a <= -PI {
        a + 2.0 * PI
    } else {
        a
    }
}
