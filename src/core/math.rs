// Math utilities and conversions between glam and rapier's nalgebra types

use glam::Vec2;
use rapier2d::prelude::{Real, Vector};

/// Convert a glam vector into a rapier vector
pub fn to_rapier(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

/// Convert a rapier vector into a glam vector
pub fn from_rapier(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Linear interpolation
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Direction of a value as -1, 0 or 1
pub fn axis_sign(value: f32) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
