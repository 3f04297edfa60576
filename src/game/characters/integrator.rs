// Kinematic motion integrator
//
// Moves the character box along X then Y against the level using rays cast
// from just inside the box edges, then probes the sides for walls and
// collects overlapping triggers.

use glam::Vec2;

use super::body::{CharacterBody, ContactState};
use crate::engine::physics::{CollisionWorld, Overlap, RayHit};
use crate::game::config::{PhysicsConfig, WallDetection};

/// Integrates a character body one fixed step at a time
#[derive(Debug, Clone)]
pub struct MotionIntegrator {
    config: PhysicsConfig,
}

impl MotionIntegrator {
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Advance `body` by `dt` towards `target_velocity_x`
    ///
    /// Gravity is applied only when the previous step left the body airborne.
    /// The resulting contacts replace `body.contacts`.
    pub fn advance(
        &self,
        body: &mut CharacterBody,
        target_velocity_x: f32,
        world: &impl CollisionWorld,
        dt: f32,
    ) {
        let skin = self.config.skin_width;
        let mut velocity = Vec2::new(target_velocity_x, body.velocity.y);

        if body.contacts.grounded {
            velocity.y = velocity.y.max(0.0);
        } else {
            velocity.y += self.config.gravity * self.config.gravity_scale * dt;
        }

        let mut contacts = ContactState::default();
        let mut position = body.position;
        let half = body.half_extents;

        // Horizontal pass
        let dx = velocity.x * dt;
        let mut movement_wall = None;
        if dx != 0.0 {
            let dir = dx.signum();
            match self.sweep_horizontal(world, position, half, dir, dx.abs() + skin) {
                Some(hit) => {
                    let allowed = (hit.distance - skin).clamp(0.0, dx.abs());
                    position.x += dir * allowed;
                    if allowed < dx.abs() {
                        velocity.x = 0.0;
                    }
                    if self.is_wall(&hit) {
                        movement_wall = Some(hit.normal);
                    }
                    push_contact(&mut contacts.contacts, &hit);
                }
                None => position.x += dx,
            }
        }

        // Vertical pass
        let dy = velocity.y * dt;
        if dy > 0.0 {
            match self.sweep_vertical(world, position, half, 1.0, dy + skin) {
                Some(hit) => {
                    let allowed = (hit.distance - skin).clamp(0.0, dy);
                    position.y += allowed;
                    contacts.ceiling = true;
                    velocity.y = 0.0;
                    push_contact(&mut contacts.contacts, &hit);
                }
                None => position.y += dy,
            }
        } else {
            // Probe a little past the motion so resting bodies stay grounded
            let travel = -dy;
            match self.sweep_vertical(world, position, half, -1.0, travel + skin * 2.0) {
                Some(hit) => {
                    let allowed = (hit.distance - skin).clamp(0.0, travel);
                    position.y -= allowed;
                    velocity.y = 0.0;
                    if hit.normal.y > self.config.min_ground_normal_y {
                        contacts.grounded = true;
                        contacts.ground_tag = Some(hit.tag);
                    }
                    push_contact(&mut contacts.contacts, &hit);
                }
                None => position.y += dy,
            }
        }

        // Wall probes from the resolved position
        let probe_length = match self.config.wall_detection {
            WallDetection::ContactNormal => skin * 2.0,
            WallDetection::Raycast { distance } => distance + skin,
        };
        let mut probed_wall = None;
        for dir in [-1.0, 1.0] {
            if let Some(hit) = self.sweep_horizontal(world, position, half, dir, probe_length) {
                if hit.distance <= skin * 2.0 {
                    push_contact(&mut contacts.contacts, &hit);
                }
                if self.is_wall(&hit) && probed_wall.is_none() {
                    probed_wall = Some(hit.normal);
                }
            }
        }

        if !contacts.grounded {
            contacts.wall_normal = movement_wall.or(probed_wall);
        }

        let trigger_extents = (half - Vec2::splat(skin)).max(Vec2::splat(skin));
        contacts.overlaps = world.overlaps(position, trigger_extents);

        body.position = position;
        body.velocity = velocity;
        body.contacts = contacts;
    }

    fn is_wall(&self, hit: &RayHit) -> bool {
        hit.normal.x.abs() > self.config.wall_normal_threshold
    }

    /// Nearest hit of three rays leaving the left or right edge
    fn sweep_horizontal(
        &self,
        world: &impl CollisionWorld,
        position: Vec2,
        half: Vec2,
        dir: f32,
        length: f32,
    ) -> Option<RayHit> {
        let skin = self.config.skin_width;
        let x = position.x + dir * (half.x - skin);
        let rows = [
            position.y - half.y + skin,
            position.y,
            position.y + half.y - skin,
        ];
        nearest(
            rows.iter()
                .filter_map(|&y| world.cast_ray(Vec2::new(x, y), Vec2::new(dir, 0.0), length)),
        )
    }

    /// Nearest hit of three rays leaving the bottom or top edge
    fn sweep_vertical(
        &self,
        world: &impl CollisionWorld,
        position: Vec2,
        half: Vec2,
        dir: f32,
        length: f32,
    ) -> Option<RayHit> {
        let skin = self.config.skin_width;
        let y = position.y + dir * (half.y - skin);
        let columns = [
            position.x - half.x + skin,
            position.x,
            position.x + half.x - skin,
        ];
        nearest(
            columns
                .iter()
                .filter_map(|&x| world.cast_ray(Vec2::new(x, y), Vec2::new(0.0, dir), length)),
        )
    }
}

impl Default for MotionIntegrator {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

fn nearest(hits: impl Iterator<Item = RayHit>) -> Option<RayHit> {
    hits.min_by(|a, b| a.distance.total_cmp(&b.distance))
}

fn push_contact(contacts: &mut Vec<Overlap>, hit: &RayHit) {
    if !contacts.iter().any(|contact| contact.collider == hit.collider) {
        contacts.push(Overlap {
            collider: hit.collider,
            tag: hit.tag,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{PhysicsWorld, SurfaceTag};
    use approx::assert_relative_eq;

    const DT: f32 = 1.0 / 60.0;

    fn level() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        // Floor with its top at y = 0
        world.add_block(SurfaceTag::Solid, Vec2::new(0.0, -0.5), Vec2::new(40.0, 1.0));
        // Wall with its left face at x = 3, floating above the floor
        world.add_block(SurfaceTag::Solid, Vec2::new(3.5, 6.0), Vec2::new(1.0, 10.0));
        world.step();
        world
    }

    fn body_at(x: f32, y: f32) -> CharacterBody {
        CharacterBody::new(Vec2::new(x, y), Vec2::new(0.8, 1.0))
    }

    fn settle(integrator: &MotionIntegrator, body: &mut CharacterBody, world: &PhysicsWorld) {
        for _ in 0..300 {
            integrator.advance(body, 0.0, world, DT);
            if body.is_grounded() {
                return;
            }
        }
    }

    #[test]
    fn test_falls_and_lands_on_floor() {
        let world = level();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(0.0, 2.0);

        integrator.advance(&mut body, 0.0, &world, DT);
        assert!(body.velocity.y < 0.0);
        assert!(!body.is_grounded());

        settle(&integrator, &mut body, &world);
        assert!(body.is_grounded());
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.position.y >= 0.5 - 1e-4);
        assert!(body.position.y <= 0.5 + 0.021);
        assert_eq!(body.contacts.ground_tag, Some(SurfaceTag::Solid));
    }

    #[test]
    fn test_resting_body_stays_grounded() {
        let world = level();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(0.0, 0.51);
        settle(&integrator, &mut body, &world);
        let rest_y = body.position.y;

        for _ in 0..30 {
            integrator.advance(&mut body, 3.0, &world, DT);
            assert!(body.is_grounded());
        }
        assert_relative_eq!(body.position.y, rest_y, epsilon = 1e-4);
        assert_relative_eq!(body.position.x, 3.0 * DT * 30.0, epsilon = 1e-3);
    }

    #[test]
    fn test_walks_off_ledge_and_starts_falling() {
        let mut world = PhysicsWorld::new();
        world.add_block(SurfaceTag::Solid, Vec2::new(0.0, -0.5), Vec2::new(2.0, 1.0));
        world.step();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(0.0, 0.51);
        settle(&integrator, &mut body, &world);

        for _ in 0..60 {
            integrator.advance(&mut body, 5.0, &world, DT);
        }
        assert!(!body.is_grounded());
        assert!(body.velocity.y < 0.0);
    }

    #[test]
    fn test_airborne_body_blocked_by_wall_reports_normal() {
        let world = level();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(2.0, 4.0);

        for _ in 0..30 {
            integrator.advance(&mut body, 7.0, &world, DT);
        }

        assert!(body.position.x <= 3.0 - 0.4 + 1e-4);
        assert!(body.position.x >= 3.0 - 0.4 - 0.021);
        let normal = body.contacts.wall_normal.expect("wall contact");
        assert!(normal.x < -0.9);
        assert_eq!(body.contacts.wall_side(), 1);
    }

    #[test]
    fn test_grounded_body_never_reports_wall() {
        let mut world = level();
        // Low wall standing on the floor
        world.add_block(SurfaceTag::Solid, Vec2::new(-3.5, 1.0), Vec2::new(1.0, 2.0));
        world.step();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(-2.0, 0.51);
        settle(&integrator, &mut body, &world);

        for _ in 0..40 {
            integrator.advance(&mut body, -7.0, &world, DT);
        }
        assert!(body.is_grounded());
        assert!(body.contacts.wall_normal.is_none());
        assert!(body.position.x >= -3.0 + 0.4 - 1e-4);
    }

    #[test]
    fn test_contact_normal_strategy_ignores_distant_wall() {
        let world = level();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(2.3, 6.0);

        integrator.advance(&mut body, 0.0, &world, DT);
        assert!(body.contacts.wall_normal.is_none());
    }

    #[test]
    fn test_raycast_strategy_detects_nearby_wall() {
        let world = level();
        let integrator = MotionIntegrator::new(PhysicsConfig {
            wall_detection: WallDetection::Raycast { distance: 0.5 },
            ..PhysicsConfig::default()
        });
        // Right edge at 2.7, wall face at 3.0
        let mut body = body_at(2.3, 6.0);

        integrator.advance(&mut body, 0.0, &world, DT);
        assert!(body.contacts.wall_normal.is_some());
        // Detected but not touching
        assert!(body.contacts.contacts.is_empty());
    }

    #[test]
    fn test_ceiling_stops_upward_motion() {
        let mut world = PhysicsWorld::new();
        world.add_block(SurfaceTag::Solid, Vec2::new(0.0, 2.5), Vec2::new(4.0, 1.0));
        world.step();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(0.0, 1.4);
        body.velocity.y = 10.0;

        integrator.advance(&mut body, 0.0, &world, DT);
        assert!(body.contacts.ceiling);
        assert_eq!(body.velocity.y, 0.0);
        assert!(body.position.y + 0.5 <= 2.0 + 1e-4);
    }

    #[test]
    fn test_overlaps_collect_sensors() {
        let mut world = level();
        world.add_block(SurfaceTag::SnowArea, Vec2::new(0.0, 1.0), Vec2::new(4.0, 2.0));
        world.step();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(0.0, 0.51);

        integrator.advance(&mut body, 0.0, &world, DT);
        assert!(body.contacts.touches(SurfaceTag::SnowArea));
    }

    #[test]
    fn test_ice_floor_is_low_friction_contact() {
        let mut world = PhysicsWorld::new();
        world.add_block(SurfaceTag::Ice, Vec2::new(0.0, -0.5), Vec2::new(10.0, 1.0));
        world.step();
        let integrator = MotionIntegrator::default();
        let mut body = body_at(0.0, 0.51);

        settle(&integrator, &mut body, &world);
        assert!(body.contacts.on_low_friction());
        assert_eq!(body.contacts.ground_tag, Some(SurfaceTag::Ice));
    }
}
