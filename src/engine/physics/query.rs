// Query seam between the character core and whatever hosts the level geometry

use glam::Vec2;

use super::body::ColliderHandle;
use super::collision::SurfaceTag;

/// First solid surface hit by a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Collider that was hit
    pub collider: ColliderHandle,
    /// Distance along the (normalized) ray direction
    pub distance: f32,
    /// Surface normal at the hit point
    pub normal: Vec2,
    /// Gameplay tag of the hit collider
    pub tag: SurfaceTag,
}

/// A collider overlapping a query box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub collider: ColliderHandle,
    pub tag: SurfaceTag,
}

/// Geometry queries the motion integrator and progression logic rely on
pub trait CollisionWorld {
    /// Cast a ray against solid level geometry (sensors are ignored)
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit>;

    /// List colliders (solid or sensor) overlapping an axis-aligned box
    fn overlaps(&self, center: Vec2, half_extents: Vec2) -> Vec<Overlap>;

    /// Remove a collider from the level (consumed pickups)
    fn despawn(&mut self, collider: ColliderHandle);
}
