use glam::Vec2;
use rapier2d::prelude::*;
use std::collections::HashMap;

use super::body::presets;
use super::collision::{
    CollisionEvent as GameCollisionEvent, CollisionEventQueue, CollisionGroups, SurfaceTag,
};
use super::query::{CollisionWorld, Overlap, RayHit};
use crate::core::math::{from_rapier, to_rapier};

/// Handle to identify rigid bodies
pub type RigidBodyHandle = rapier2d::prelude::RigidBodyHandle;

/// Handle to identify colliders
pub type ColliderHandle = rapier2d::prelude::ColliderHandle;

/// Vertical gravity used by `PhysicsWorld::new`
pub const DEFAULT_GRAVITY: Real = -9.81;

/// Physics world hosting the level geometry, loose props and their queries
pub struct PhysicsWorld {
    /// Gravity vector applied to dynamic props
    gravity: Vector<Real>,

    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,

    /// Query pipeline for raycasts and overlap tests
    query_pipeline: QueryPipeline,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,

    /// Collision event handler
    collision_event_queue: CollisionEventQueue,

    /// User data mapping from handles to game entity IDs
    body_to_entity: HashMap<RigidBodyHandle, u64>,
}

impl PhysicsWorld {
    /// Create a new physics world with earth gravity
    pub fn new() -> Self {
        Self::with_gravity(DEFAULT_GRAVITY)
    }

    /// Create a new physics world with vertical `gravity` (negative is down)
    pub fn with_gravity(gravity: Real) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / 60.0;

        Self {
            gravity: Vector::new(0.0, gravity),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            collision_event_queue: CollisionEventQueue::new(),
            body_to_entity: HashMap::new(),
        }
    }

    /// Step the physics simulation forward by one timestep
    ///
    /// Also refreshes the query pipeline, so geometry added since the last
    /// step becomes visible to ray and overlap queries.
    pub fn step(&mut self) {
        self.collision_event_queue.clear();

        let event_handler = &self.collision_event_queue;

        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            event_handler,
        );
    }

    /// Add a rigid body to the physics world
    pub fn add_rigid_body(&mut self, body: RigidBody) -> RigidBodyHandle {
        self.rigid_body_set.insert(body)
    }

    /// Add a collider attached to a rigid body
    pub fn add_collider(
        &mut self,
        collider: Collider,
        parent_handle: RigidBodyHandle,
    ) -> ColliderHandle {
        self.collider_set
            .insert_with_parent(collider, parent_handle, &mut self.rigid_body_set)
    }

    /// Add a fixed, tagged level block centered at `center`
    pub fn add_block(&mut self, tag: SurfaceTag, center: Vec2, size: Vec2) -> ColliderHandle {
        let body = self.add_rigid_body(presets::block_body(center.x, center.y));
        self.add_collider(presets::block_collider(tag, size.x, size.y), body)
    }

    /// Add a dynamic prop (knockback target) and map it to a game entity
    pub fn add_prop(&mut self, center: Vec2, radius: f32, entity_id: u64) -> RigidBodyHandle {
        let body = self.add_rigid_body(presets::prop_body(center.x, center.y));
        self.add_collider(presets::prop_collider(radius), body);
        self.set_entity_mapping(body, entity_id);
        body
    }

    /// Remove a rigid body and all its attached colliders
    pub fn remove_rigid_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
        self.body_to_entity.remove(&handle);
    }

    /// Remove a collider from the physics world
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// Get a reference to a rigid body
    pub fn get_rigid_body(&self, handle: RigidBodyHandle) -> Option<&RigidBody> {
        self.rigid_body_set.get(handle)
    }

    /// Get a mutable reference to a rigid body
    pub fn get_rigid_body_mut(&mut self, handle: RigidBodyHandle) -> Option<&mut RigidBody> {
        self.rigid_body_set.get_mut(handle)
    }

    /// Get a reference to a collider
    pub fn get_collider(&self, handle: ColliderHandle) -> Option<&Collider> {
        self.collider_set.get(handle)
    }

    /// Gameplay tag carried by a collider, `None` if it no longer exists
    pub fn tag_of(&self, handle: ColliderHandle) -> Option<SurfaceTag> {
        self.collider_set
            .get(handle)
            .map(|collider| SurfaceTag::from_user_data(collider.user_data))
    }

    /// Rigid body a collider is attached to
    pub fn parent_of(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set.get(handle).and_then(|collider| collider.parent())
    }

    /// World-space position of a collider
    pub fn collider_position(&self, handle: ColliderHandle) -> Option<Vec2> {
        self.collider_set
            .get(handle)
            .map(|collider| from_rapier(collider.translation()))
    }

    /// Associate a game entity ID with a rigid body
    pub fn set_entity_mapping(&mut self, body_handle: RigidBodyHandle, entity_id: u64) {
        self.body_to_entity.insert(body_handle, entity_id);
    }

    /// Get the entity ID associated with a rigid body
    pub fn get_entity_id(&self, body_handle: RigidBodyHandle) -> Option<u64> {
        self.body_to_entity.get(&body_handle).copied()
    }

    /// Cast a ray and return the first hit
    pub fn raycast(
        &self,
        ray_origin: Vector<Real>,
        ray_dir: Vector<Real>,
        max_toi: Real,
        solid: bool,
        filter: QueryFilter,
    ) -> Option<(ColliderHandle, Real)> {
        let ray = Ray::new(Point::new(ray_origin.x, ray_origin.y), ray_dir);
        self.query_pipeline.cast_ray(
            &self.rigid_body_set,
            &self.collider_set,
            &ray,
            max_toi,
            solid,
            filter,
        )
    }

    /// Get all collision events from the last step
    pub fn get_collision_events(&self) -> Vec<GameCollisionEvent> {
        self.collision_event_queue.events()
    }

    /// Queries run as the player group against solid geometry
    fn solid_filter() -> QueryFilter<'static> {
        QueryFilter::default()
            .exclude_sensors()
            .groups(CollisionGroups::Player.to_interaction_groups())
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionWorld for PhysicsWorld {
    fn cast_ray(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> Option<RayHit> {
        let direction = direction.normalize_or_zero();
        if direction == Vec2::ZERO {
            return None;
        }

        let (collider, distance) = self.raycast(
            to_rapier(origin),
            to_rapier(direction),
            max_distance,
            true,
            Self::solid_filter(),
        )?;

        let ray = Ray::new(Point::new(origin.x, origin.y), to_rapier(direction));
        let normal = self
            .query_pipeline
            .cast_ray_and_get_normal(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                Self::solid_filter(),
            )
            .map(|(_, intersection)| from_rapier(&intersection.normal))
            .unwrap_or(-direction);

        Some(RayHit {
            collider,
            distance,
            normal,
            tag: self.tag_of(collider).unwrap_or(SurfaceTag::Solid),
        })
    }

    fn overlaps(&self, center: Vec2, half_extents: Vec2) -> Vec<Overlap> {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y);
        let shape_pos = Isometry::translation(center.x, center.y);
        let filter = QueryFilter::default().groups(CollisionGroups::Player.to_interaction_groups());

        let mut found = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &*shape,
            filter,
            |handle| {
                found.push(handle);
                true
            },
        );

        found
            .into_iter()
            .filter_map(|collider| {
                self.tag_of(collider)
                    .map(|tag| Overlap { collider, tag })
            })
            .collect()
    }

    fn despawn(&mut self, collider: ColliderHandle) {
        if let Some(parent) = self.parent_of(collider) {
            self.remove_rigid_body(parent);
        } else {
            self.remove_collider(collider);
        }
    }
}
