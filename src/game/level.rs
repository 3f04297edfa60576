// Level layouts: tagged blocks, knockback props and the spawn anchor

use std::path::Path;

use glam::Vec2;
use log::info;
use serde::Deserialize;

use crate::engine::physics::{ColliderHandle, PhysicsWorld, RigidBodyHandle, SurfaceTag};
use crate::game::config::ConfigError;
use crate::game::hazard::{EntityId, Health, HazardSystem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum BlockKind {
    Solid,
    Ice,
    Spike,
    /// Snow pickup, consumed on contact
    Snow,
    /// Snow area, accretes while standing inside
    SnowArea,
}

impl BlockKind {
    pub fn tag(self) -> SurfaceTag {
        match self {
            Self::Solid => SurfaceTag::Solid,
            Self::Ice => SurfaceTag::Ice,
            Self::Spike => SurfaceTag::Spike,
            Self::Snow => SurfaceTag::SnowItem,
            Self::SnowArea => SurfaceTag::SnowArea,
        }
    }
}

/// Axis-aligned block given by its center and full size
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Block {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: BlockKind,
}

/// Loose dynamic prop that hazards can damage and push
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Prop {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    #[serde(default)]
    pub health: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct LevelLayout {
    pub blocks: Vec<Block>,
    pub props: Vec<Prop>,
    pub spawn: Option<(f32, f32)>,
}

/// Handles of everything a layout put into the physics world
#[derive(Debug, Default)]
pub struct Level {
    pub spawn: Option<Vec2>,
    pub blocks: Vec<(BlockKind, ColliderHandle)>,
    pub props: Vec<(EntityId, RigidBodyHandle)>,
}

impl Level {
    /// Colliders of one kind, in layout order
    pub fn blocks_of(&self, kind: BlockKind) -> impl Iterator<Item = ColliderHandle> + '_ {
        self.blocks
            .iter()
            .filter(move |(block_kind, _)| *block_kind == kind)
            .map(|(_, handle)| *handle)
    }
}

impl LevelLayout {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&source)
    }

    /// Built-in course: a floor with an ice strip, snow pickups, a snow
    /// area, a spike pit, a wall to slide on and one prop above the spikes
    pub fn demo() -> Self {
        let block = |x, y, w, h, kind| Block { x, y, w, h, kind };
        Self {
            blocks: vec![
                block(0.0, -0.5, 20.0, 1.0, BlockKind::Solid),
                block(14.0, -0.5, 8.0, 1.0, BlockKind::Ice),
                block(3.0, 0.5, 0.5, 0.5, BlockKind::Snow),
                block(5.0, 0.5, 0.5, 0.5, BlockKind::Snow),
                block(-6.0, 1.5, 3.0, 3.0, BlockKind::SnowArea),
                block(19.0, -0.4, 2.0, 0.8, BlockKind::Spike),
                block(-10.5, 4.0, 1.0, 10.0, BlockKind::Solid),
            ],
            props: vec![Prop {
                x: 19.0,
                y: 3.0,
                radius: 0.4,
                health: Some(3),
            }],
            spawn: Some((0.0, 0.5)),
        }
    }

    /// Insert the layout into `physics`, registering prop health with `hazards`
    ///
    /// Call `physics.step()` afterwards so queries see the new geometry.
    pub fn build(&self, physics: &mut PhysicsWorld, hazards: &mut HazardSystem) -> Level {
        let blocks = self
            .blocks
            .iter()
            .map(|block| {
                let handle = physics.add_block(
                    block.kind.tag(),
                    Vec2::new(block.x, block.y),
                    Vec2::new(block.w, block.h),
                );
                (block.kind, handle)
            })
            .collect();

        let props = self
            .props
            .iter()
            .enumerate()
            .map(|(index, prop)| {
                let entity = index as EntityId;
                let body = physics.add_prop(Vec2::new(prop.x, prop.y), prop.radius, entity);
                if let Some(health) = prop.health {
                    hazards.register(entity, Health::new(health));
                }
                (entity, body)
            })
            .collect();

        info!(
            "Built level with {} blocks and {} props",
            self.blocks.len(),
            self.props.len()
        );

        Level {
            spawn: self.spawn.map(|(x, y)| Vec2::new(x, y)),
            blocks,
            props,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::CollisionWorld;
    use crate::game::config::HazardConfig;

    #[test]
    fn test_parse_layout() {
        let layout = LevelLayout::from_ron_str(
            r#"(
                blocks: [
                    (x: 0.0, y: -0.5, w: 10.0, h: 1.0, kind: Solid),
                    (x: 2.0, y: 0.5, w: 0.5, h: 0.5, kind: Snow),
                ],
                props: [(x: 1.0, y: 3.0, radius: 0.5)],
                spawn: Some((0.0, 0.5)),
            )"#,
        )
        .unwrap();

        assert_eq!(layout.blocks.len(), 2);
        assert_eq!(layout.blocks[1].kind, BlockKind::Snow);
        assert_eq!(layout.props[0].health, None);
        assert_eq!(layout.spawn, Some((0.0, 0.5)));
    }

    #[test]
    fn test_missing_spawn_is_none() {
        let layout = LevelLayout::from_ron_str("(blocks: [])").unwrap();
        assert!(layout.spawn.is_none());
        assert!(layout.props.is_empty());
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = LevelLayout::from_ron_str("(blocks: [(x: 0.0, y: 0.0, w: 1.0, h: 1.0, kind: Lava)])");
        assert!(matches!(err, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_build_demo() {
        let mut physics = PhysicsWorld::new();
        let mut hazards = HazardSystem::new(HazardConfig::default());
        let level = LevelLayout::demo().build(&mut physics, &mut hazards);
        physics.step();

        assert_eq!(level.spawn, Some(Vec2::new(0.0, 0.5)));
        assert_eq!(level.blocks_of(BlockKind::Snow).count(), 2);
        assert_eq!(hazards.health(0).map(|h| h.current), Some(3));

        let below_spawn = physics.cast_ray(Vec2::new(0.0, 0.5), Vec2::NEG_Y, 2.0);
        assert_eq!(below_spawn.map(|hit| hit.tag), Some(SurfaceTag::Solid));
    }
}
