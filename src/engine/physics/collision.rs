use rapier2d::prelude::*;
use std::sync::{Arc, Mutex};

/// Collision groups for filtering what objects can collide with each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroups {
    /// Default group - interacts with everything
    Default = 0b0000_0001,

    /// Player characters (query-only, the character body is kinematic)
    Player = 0b0000_0010,

    /// Loose dynamic props that can be knocked around (crates, enemies)
    Prop = 0b0000_0100,

    /// Static platforms and walls, including ice
    Platform = 0b0000_1000,

    /// Level hazards (spikes)
    Hazard = 0b0001_0000,

    /// Snow pickups
    Pickup = 0b0010_0000,

    /// Sensors (snow areas, trigger zones) - don't cause physical collision
    Sensor = 0b1000_0000,
}

impl CollisionGroups {
    /// Convert to rapier2d's InteractionGroups
    pub fn to_interaction_groups(self) -> InteractionGroups {
        let memberships = Group::from_bits_truncate(self as u32);

        let filter = match self {
            // Players touch level geometry and every trigger, never each other
            CollisionGroups::Player => Group::from_bits_truncate(
                CollisionGroups::Platform as u32
                    | CollisionGroups::Hazard as u32
                    | CollisionGroups::Pickup as u32
                    | CollisionGroups::Sensor as u32,
            ),

            // Props rest on platforms, get hurt by hazards and bump each other
            CollisionGroups::Prop => Group::from_bits_truncate(
                CollisionGroups::Platform as u32
                    | CollisionGroups::Hazard as u32
                    | CollisionGroups::Prop as u32,
            ),

            CollisionGroups::Platform => Group::from_bits_truncate(
                CollisionGroups::Player as u32
                    | CollisionGroups::Prop as u32
                    | CollisionGroups::Platform as u32,
            ),

            CollisionGroups::Hazard => Group::from_bits_truncate(
                CollisionGroups::Player as u32 | CollisionGroups::Prop as u32,
            ),

            // Pickups are collected by players only
            CollisionGroups::Pickup => Group::from_bits_truncate(CollisionGroups::Player as u32),

            CollisionGroups::Sensor => Group::from_bits_truncate(CollisionGroups::Player as u32),

            CollisionGroups::Default => Group::ALL,
        };

        InteractionGroups::new(memberships, filter)
    }
}

/// Gameplay meaning of a level collider, stored in the collider's `user_data`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceTag {
    /// Ordinary ground or wall
    Solid = 0,
    /// Low-friction ground that allows sliding
    Ice = 1,
    /// Damaging surface that resets the character to its spawn anchor
    Spike = 2,
    /// Pickup that advances the snow stage on contact
    SnowItem = 3,
    /// Area that advances the snow stage after continued exposure
    SnowArea = 4,
}

impl SurfaceTag {
    /// Encode into a collider's user data
    pub fn to_user_data(self) -> u128 {
        self as u128
    }

    /// Decode from a collider's user data, untagged colliders are solid
    pub fn from_user_data(data: u128) -> Self {
        match data {
            1 => Self::Ice,
            2 => Self::Spike,
            3 => Self::SnowItem,
            4 => Self::SnowArea,
            _ => Self::Solid,
        }
    }

    /// Whether this surface counts as low-friction for sliding
    pub fn is_low_friction(self) -> bool {
        self == Self::Ice
    }

    /// Collision group used for colliders carrying this tag
    pub fn collision_group(self) -> CollisionGroups {
        match self {
            Self::Solid | Self::Ice => CollisionGroups::Platform,
            Self::Spike => CollisionGroups::Hazard,
            Self::SnowItem => CollisionGroups::Pickup,
            Self::SnowArea => CollisionGroups::Sensor,
        }
    }
}

/// Custom collision event for game logic
#[derive(Debug, Clone, Copy)]
pub enum CollisionEvent {
    /// Two colliders started touching
    Started {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },

    /// Two colliders stopped touching
    Stopped {
        collider1: ColliderHandle,
        collider2: ColliderHandle,
    },
}

/// Queue for storing collision events during physics step
pub struct CollisionEventQueue {
    events: Arc<Mutex<Vec<CollisionEvent>>>,
}

impl CollisionEventQueue {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::with_capacity(32))),
        }
    }

    /// Clear all events (call at start of physics step)
    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }

    /// Get all collision events from this frame
    pub fn events(&self) -> Vec<CollisionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    fn push(&self, event: CollisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Default for CollisionEventQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for CollisionEventQueue {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: rapier2d::prelude::CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        match event {
            rapier2d::prelude::CollisionEvent::Started(h1, h2, _flags) => {
                self.push(CollisionEvent::Started {
                    collider1: h1,
                    collider2: h2,
                });
            }
            rapier2d::prelude::CollisionEvent::Stopped(h1, h2, _flags) => {
                self.push(CollisionEvent::Stopped {
                    collider1: h1,
                    collider2: h2,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collision_groups_bits() {
        let groups = [
            CollisionGroups::Default,
            CollisionGroups::Player,
            CollisionGroups::Prop,
            CollisionGroups::Platform,
            CollisionGroups::Hazard,
            CollisionGroups::Pickup,
            CollisionGroups::Sensor,
        ];

        for (i, group1) in groups.iter().enumerate() {
            for (j, group2) in groups.iter().enumerate() {
                if i != j {
                    assert_ne!(
                        *group1 as u32, *group2 as u32,
                        "Groups must have unique bits"
                    );
                }
            }
        }
    }

    #[test]
    fn test_player_doesnt_collide_with_player() {
        let player_groups = CollisionGroups::Player.to_interaction_groups();
        assert!(!player_groups.filter.contains(player_groups.memberships));
    }

    #[test]
    fn test_hazard_touches_props() {
        let hazard = CollisionGroups::Hazard.to_interaction_groups();
        let prop_bit = Group::from_bits_truncate(CollisionGroups::Prop as u32);
        assert!(hazard.filter.contains(prop_bit));
    }

    #[test]
    fn test_surface_tag_user_data() {
        for tag in [
            SurfaceTag::Solid,
            SurfaceTag::Ice,
            SurfaceTag::Spike,
            SurfaceTag::SnowItem,
            SurfaceTag::SnowArea,
        ] {
            assert_eq!(SurfaceTag::from_user_data(tag.to_user_data()), tag);
        }
        assert_eq!(SurfaceTag::from_user_data(99), SurfaceTag::Solid);
    }

    #[test]
    fn test_only_ice_is_low_friction() {
        assert!(SurfaceTag::Ice.is_low_friction());
        assert!(!SurfaceTag::Solid.is_low_friction());
        assert!(!SurfaceTag::Spike.is_low_friction());
    }
}
