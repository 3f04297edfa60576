// Damage and knockback for entities touching hazards

use std::collections::HashMap;

use glam::Vec2;
use log::{debug, info};
use rapier2d::prelude::RigidBody;

use crate::core::math::{from_rapier, to_rapier};
use crate::engine::physics::{CollisionEvent, ColliderHandle, PhysicsWorld, SurfaceTag};
use crate::game::config::HazardConfig;

/// Game-level entity id, as mapped onto physics bodies
pub type EntityId = u64;

/// Result of applying damage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    Damaged { remaining: i32 },
    /// Health reached zero; what happens next is up to the caller
    Defeated,
}

/// Anything that has health
pub trait Damageable {
    fn take_damage(&mut self, amount: i32) -> DamageOutcome;
}

/// Anything that can be pushed by an instantaneous impulse
pub trait Knockback {
    fn apply_knockback(&mut self, impulse: Vec2);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: i32,
    pub max: i32,
}

impl Health {
    pub fn new(max: i32) -> Self {
        Self { current: max, max }
    }

    pub fn is_defeated(&self) -> bool {
        self.current <= 0
    }
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        self.current -= amount;
        if self.current <= 0 {
            DamageOutcome::Defeated
        } else {
            DamageOutcome::Damaged {
                remaining: self.current,
            }
        }
    }
}

impl Knockback for RigidBody {
    fn apply_knockback(&mut self, impulse: Vec2) {
        self.apply_impulse(to_rapier(impulse), true);
    }
}

/// Impulse pushing `target` away from `hazard`, `None` when they coincide
pub fn knockback_impulse(hazard: Vec2, target: Vec2, magnitude: f32) -> Option<Vec2> {
    let away = (target - hazard).try_normalize()?;
    Some(away * magnitude)
}

/// What one hazard contact did
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HazardContact {
    pub damage: Option<DamageOutcome>,
    pub impulse: Option<Vec2>,
}

/// Apply damage and knockback independently; either receiver may be absent
pub fn apply_hazard_contact(
    config: &HazardConfig,
    hazard: Vec2,
    target: Vec2,
    damageable: Option<&mut dyn Damageable>,
    knockback: Option<&mut dyn Knockback>,
) -> HazardContact {
    let damage = damageable.map(|entity| entity.take_damage(config.damage_amount));

    let impulse = knockback.and_then(|receiver| {
        let impulse = knockback_impulse(hazard, target, config.knockback_magnitude)?;
        receiver.apply_knockback(impulse);
        Some(impulse)
    });

    HazardContact { damage, impulse }
}

/// Hazard contact reported for one entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HazardHit {
    pub entity: EntityId,
    pub contact: HazardContact,
}

/// Turns spike collision events into damage and knockback for props
#[derive(Debug, Default)]
pub struct HazardSystem {
    config: HazardConfig,
    health: HashMap<EntityId, Health>,
}

impl HazardSystem {
    pub fn new(config: HazardConfig) -> Self {
        Self {
            config,
            health: HashMap::new(),
        }
    }

    /// Give an entity health; entities without it still get knocked back
    pub fn register(&mut self, entity: EntityId, health: Health) {
        self.health.insert(entity, health);
    }

    pub fn health(&self, entity: EntityId) -> Option<&Health> {
        self.health.get(&entity)
    }

    /// Handle the collision-start events of the last physics step
    pub fn process(&mut self, physics: &mut PhysicsWorld) -> Vec<HazardHit> {
        let mut hits = Vec::new();

        for event in physics.get_collision_events() {
            let CollisionEvent::Started {
                collider1,
                collider2,
            } = event
            else {
                continue;
            };

            let pair = match (physics.tag_of(collider1), physics.tag_of(collider2)) {
                (Some(SurfaceTag::Spike), _) => (collider1, collider2),
                (_, Some(SurfaceTag::Spike)) => (collider2, collider1),
                _ => continue,
            };

            if let Some(hit) = self.resolve(physics, pair.0, pair.1) {
                hits.push(hit);
            }
        }

        hits
    }

    fn resolve(
        &mut self,
        physics: &mut PhysicsWorld,
        hazard: ColliderHandle,
        other: ColliderHandle,
    ) -> Option<HazardHit> {
        let body_handle = physics.parent_of(other)?;
        let entity = physics.get_entity_id(body_handle)?;
        let hazard_position = physics.collider_position(hazard)?;

        let body = physics.get_rigid_body_mut(body_handle)?;
        let target = from_rapier(body.translation());

        let damageable = self
            .health
            .get_mut(&entity)
            .map(|health| health as &mut dyn Damageable);
        let contact = apply_hazard_contact(
            &self.config,
            hazard_position,
            target,
            damageable,
            Some(body as &mut dyn Knockback),
        );

        match contact.damage {
            Some(DamageOutcome::Defeated) => info!("Entity {} defeated by a hazard", entity),
            Some(DamageOutcome::Damaged { remaining }) => {
                debug!("Entity {} hit by a hazard, {} health left", entity, remaining)
            }
            None => {}
        }

        Some(HazardHit { entity, contact })
    }
}
