// Physics layer using rapier2d
//
// The character body itself is kinematic and integrated by the game layer;
// rapier hosts level geometry, loose props and the queries run against them.

pub mod body;
mod collision;
mod query;
mod world;

pub use body::{BodyBuilder, ColliderBuilder2D, ColliderHandle, RigidBodyHandle};
pub use collision::{CollisionEvent, CollisionGroups, SurfaceTag};
pub use query::{CollisionWorld, Overlap, RayHit};
pub use world::{PhysicsWorld, DEFAULT_GRAVITY};

pub use rapier2d::prelude::{Real, Vector};
