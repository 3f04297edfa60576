// Kinematic character body and the contact state produced by integration

use glam::Vec2;

use crate::engine::physics::{Overlap, SurfaceTag};

/// Contacts found by the last integration step
///
/// Recomputed every tick; never carried over except as "the previous tick's
/// result" read by the state machines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactState {
    /// Resting on a surface whose normal points up enough
    pub grounded: bool,
    /// Head blocked by a surface above
    pub ceiling: bool,
    /// Normal of a steep wall next to an airborne body
    pub wall_normal: Option<Vec2>,
    /// Tag of the surface underfoot
    pub ground_tag: Option<SurfaceTag>,
    /// Solid colliders touched this tick (ground, walls, ceiling)
    pub contacts: Vec<Overlap>,
    /// Colliders overlapping the body box after movement (sensors included)
    pub overlaps: Vec<Overlap>,
}

impl ContactState {
    pub fn touching_wall(&self) -> bool {
        self.wall_normal.is_some()
    }

    /// Side of the wall relative to the body: 1 = right, -1 = left, 0 = none
    pub fn wall_side(&self) -> i8 {
        match self.wall_normal {
            Some(normal) if normal.x > 0.0 => -1,
            Some(normal) if normal.x < 0.0 => 1,
            _ => 0,
        }
    }

    /// Every touched or overlapped collider
    pub fn all(&self) -> impl Iterator<Item = &Overlap> {
        self.contacts.iter().chain(self.overlaps.iter())
    }

    /// Whether any touched or overlapped collider carries `tag`
    pub fn touches(&self, tag: SurfaceTag) -> bool {
        self.all().any(|overlap| overlap.tag == tag)
    }

    /// Whether any solid contact is low-friction
    pub fn on_low_friction(&self) -> bool {
        self.contacts.iter().any(|contact| contact.tag.is_low_friction())
    }
}

/// Position, velocity and facing of a character
#[derive(Debug, Clone)]
pub struct CharacterBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Half width and half height of the collision box
    pub half_extents: Vec2,
    pub facing_right: bool,
    pub contacts: ContactState,
}

impl CharacterBody {
    /// Create a body centered at `position` with the given full size
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents: size / 2.0,
            facing_right: true,
            contacts: ContactState::default(),
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.contacts.grounded
    }

    /// Move instantly, dropping velocity and contacts (respawn boundary)
    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.contacts = ContactState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body() {
        let body = CharacterBody::new(Vec2::new(1.0, 2.0), Vec2::new(0.8, 1.0));
        assert_eq!(body.half_extents, Vec2::new(0.4, 0.5));
        assert!(body.facing_right);
        assert!(!body.is_grounded());
    }

    #[test]
    fn test_teleport_clears_motion() {
        let mut body = CharacterBody::new(Vec2::ZERO, Vec2::ONE);
        body.velocity = Vec2::new(3.0, -4.0);
        body.contacts.grounded = true;

        body.teleport(Vec2::new(5.0, 5.0));
        assert_eq!(body.position, Vec2::new(5.0, 5.0));
        assert_eq!(body.velocity, Vec2::ZERO);
        assert!(!body.is_grounded());
    }

    #[test]
    fn test_wall_side_from_normal() {
        let mut contacts = ContactState::default();
        assert_eq!(contacts.wall_side(), 0);

        // Normal pointing right means the wall is on the left
        contacts.wall_normal = Some(Vec2::X);
        assert_eq!(contacts.wall_side(), -1);

        contacts.wall_normal = Some(Vec2::NEG_X);
        assert_eq!(contacts.wall_side(), 1);
    }
}
