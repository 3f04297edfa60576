use super::collision::{CollisionGroups, SurfaceTag};
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linvel: Vector<Real>,
    gravity_scale: Real,
    can_sleep: bool,
    locked_axes: LockedAxes,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            gravity_scale: 1.0,
            can_sleep: true,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            linvel: Vector::zeros(),
            gravity_scale: 0.0,
            can_sleep: false,
            locked_axes: LockedAxes::empty(),
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the initial linear velocity
    pub fn linvel(mut self, x: Real, y: Real) -> Self {
        self.linvel = Vector::new(x, y);
        self
    }

    /// Set the gravity scale (1.0 = normal gravity, 0.0 = no gravity)
    pub fn gravity_scale(mut self, scale: Real) -> Self {
        self.gravity_scale = scale;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Lock rotation
    pub fn lock_rotation(mut self) -> Self {
        self.locked_axes = LockedAxes::ROTATION_LOCKED;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        let mut body = RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .linvel(self.linvel)
            .gravity_scale(self.gravity_scale)
            .can_sleep(self.can_sleep)
            .locked_axes(self.locked_axes)
            .build();

        if self.body_type == RigidBodyType::Dynamic {
            body.set_linear_damping(0.5);
            body.set_angular_damping(1.0);
        }

        body
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    tag: SurfaceTag,
    is_sensor: bool,
    friction: Real,
    restitution: Real,
    density: Real,
    active_events: ActiveEvents,
}

impl ColliderBuilder2D {
    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self {
            shape: SharedShape::cuboid(half_width, half_height),
            collision_groups: CollisionGroups::Default,
            tag: SurfaceTag::Solid,
            is_sensor: false,
            friction: 0.5,
            restitution: 0.0,
            density: 1.0,
            active_events: ActiveEvents::COLLISION_EVENTS,
        }
    }

    /// Create a circle-shaped collider
    pub fn circle(radius: Real) -> Self {
        Self {
            shape: SharedShape::ball(radius),
            ..Self::box_shape(radius, radius)
        }
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Tag the collider with its gameplay surface type
    pub fn tag(mut self, tag: SurfaceTag) -> Self {
        self.tag = tag;
        self
    }

    /// Make this a sensor (detects collisions but doesn't cause physical response)
    pub fn sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set density (mass will be calculated from shape volume)
    pub fn density(mut self, density: Real) -> Self {
        self.density = density;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .user_data(self.tag.to_user_data())
            .sensor(self.is_sensor)
            .friction(self.friction)
            .restitution(self.restitution)
            .density(self.density)
            .active_events(self.active_events)
            .build()
    }
}

/// Common rigid body configurations for level objects
pub mod presets {
    use super::*;

    /// Create a fixed body for a level block
    pub fn block_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Create a box collider for a level block with the given tag
    ///
    /// Snow pickups and snow areas become sensors, everything else is solid.
    pub fn block_collider(tag: SurfaceTag, width: Real, height: Real) -> Collider {
        let friction = if tag.is_low_friction() { 0.02 } else { 0.3 };
        let is_sensor = matches!(tag, SurfaceTag::SnowItem | SurfaceTag::SnowArea);

        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(tag.collision_group())
            .tag(tag)
            .sensor(is_sensor)
            .friction(friction)
            .restitution(0.0)
            .build()
    }

    /// Create a dynamic prop body that can receive knockback
    pub fn prop_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position(x, y)
            .lock_rotation()
            .can_sleep(false)
            .build()
    }

    /// Create a prop collider (circle shape)
    pub fn prop_collider(radius: Real) -> Collider {
        ColliderBuilder2D::circle(radius)
            .collision_groups(CollisionGroups::Prop)
            .friction(0.5)
            .restitution(0.0)
            .density(1.0)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::new_dynamic()
            .position(10.0, 20.0)
            .linvel(5.0, 0.0)
            .build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
    }

    #[test]
    fn test_collider_builder_box() {
        let collider = ColliderBuilder2D::box_shape(1.0, 2.0).friction(0.3).build();

        assert!(!collider.is_sensor());
        assert_eq!(collider.friction(), 0.3);
    }

    #[test]
    fn test_block_collider_tags() {
        let ice = presets::block_collider(SurfaceTag::Ice, 4.0, 1.0);
        assert_eq!(SurfaceTag::from_user_data(ice.user_data), SurfaceTag::Ice);
        assert!(!ice.is_sensor());

        let area = presets::block_collider(SurfaceTag::SnowArea, 4.0, 4.0);
        assert!(area.is_sensor());

        let item = presets::block_collider(SurfaceTag::SnowItem, 0.5, 0.5);
        assert!(item.is_sensor());
    }

    #[test]
    fn test_prop_preset() {
        let body = presets::prop_body(0.0, 0.0);
        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert!(body.is_rotation_locked());
    }
}
