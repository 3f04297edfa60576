// Character entity and management

use glam::Vec2;
use log::{debug, info, warn};

use super::body::CharacterBody;
use super::events::{CharacterEvent, EventBus};
use super::integrator::MotionIntegrator;
use super::locomotion::{LocomotionContext, LocomotionStateMachine};
use super::presentation::{PresentationParams, PresentationSink};
use super::progression::ProgressionState;
use super::state::{JumpPhase, MovementMode, SnowStage};
use crate::core::math::lerp;
use crate::engine::input::InputFrame;
use crate::engine::physics::{ColliderHandle, CollisionWorld, SurfaceTag};
use crate::game::config::{ConfigError, GameConfig, LocomotionConfig};

/// Unique identifier for a character
pub type CharacterId = u32;

/// Summary of one character tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Events emitted during the tick, in order
    pub events: Vec<CharacterEvent>,
    pub phase: JumpPhase,
    pub mode: MovementMode,
    pub stage: SnowStage,
    pub presentation: PresentationParams,
}

/// A player-controlled character
#[derive(Debug)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Local player seat driving this character, if any
    pub player_index: Option<usize>,
    pub body: CharacterBody,

    integrator: MotionIntegrator,
    locomotion: LocomotionStateMachine,
    progression: ProgressionState,
    config: LocomotionConfig,
    axis_deadzone: f32,
    spawn_anchor: Option<Vec2>,

    events: EventBus,
    presentation: PresentationParams,
    sink: Option<Box<dyn PresentationSink>>,
}

impl Character {
    /// Create a character at `start`; the config is validated first
    pub fn new(
        id: CharacterId,
        name: &str,
        player_index: Option<usize>,
        config: &GameConfig,
        spawn_anchor: Option<Vec2>,
        start: Vec2,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let size = Vec2::new(config.body.width, config.body.height);
        Ok(Self {
            id,
            name: name.to_string(),
            player_index,
            body: CharacterBody::new(start, size),
            integrator: MotionIntegrator::new(config.physics.clone()),
            locomotion: LocomotionStateMachine::new(config.locomotion.clone()),
            progression: ProgressionState::new(config.progression.clone()),
            config: config.locomotion.clone(),
            axis_deadzone: config.input.axis_deadzone,
            spawn_anchor,
            events: EventBus::new(),
            presentation: PresentationParams::default(),
            sink: None,
        })
    }

    /// Forward presentation parameters to `sink` after every tick
    pub fn with_presentation_sink(mut self, sink: Box<dyn PresentationSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Listener invoked synchronously for every event
    pub fn subscribe(&mut self, listener: impl FnMut(&CharacterEvent) + 'static) {
        self.events.subscribe(listener);
    }

    /// Run one fixed step: locomotion, progression, integration, triggers
    pub fn tick(
        &mut self,
        input: &InputFrame,
        world: &mut impl CollisionWorld,
        dt: f32,
    ) -> TickReport {
        let contacts = self.body.contacts.clone();
        self.progression.begin_tick(&contacts, self.body.velocity.y);

        let wall_jump = self.progression.try_wall_jump(input.jump_pressed);
        let locomotion_input = InputFrame {
            jump_pressed: input.jump_pressed && wall_jump.is_none(),
            ..*input
        };

        let ctx = LocomotionContext {
            contacts: &contacts,
            surface: self.progression.surface(),
            stage: self.progression.stage(),
        };
        let output = self.locomotion.advance(&locomotion_input, &ctx, dt);
        for event in &output.events {
            self.events.emit(*event);
        }

        let mut velocity = self.body.velocity;

        if let Some(direction) = wall_jump {
            let impulse = self.config.wall_jump_impulse;
            velocity = Vec2::new(direction * impulse.x, impulse.y);
            self.body.facing_right = direction > 0.0;
            self.locomotion.force_airborne();
            self.events.emit(CharacterEvent::WallJumped);
            debug!("{} wall-jumped", self.name);
        }

        if self.progression.try_release(input.release_pressed) {
            velocity.y = self.config.release_launch_speed;
            self.events.emit(CharacterEvent::Released);
            self.events.emit(CharacterEvent::StageChanged(SnowStage::Bare));
        }

        if let Some(launch) = output.launch_velocity {
            velocity.y = launch;
        }
        if output.cut_jump && velocity.y > 0.0 {
            velocity.y *= self.config.jump_cut_factor;
        }
        if self.progression.is_wall_sliding() {
            velocity.y = velocity.y.max(-self.config.wall_slide_max_fall_speed);
        }

        let target_x = if self.progression.is_control_locked() {
            if contacts.grounded {
                velocity.x
            } else {
                lerp(velocity.x, 0.0, self.config.air_drag)
            }
        } else {
            self.body.facing_right = self
                .locomotion
                .resolve_facing(self.body.facing_right, output.target_x);
            output.target_x
        };

        self.body.velocity = velocity;
        self.integrator.advance(&mut self.body, target_x, world, dt);

        self.process_triggers(world, dt);
        self.update_presentation(output.mode);

        TickReport {
            events: self.events.drain(),
            phase: self.locomotion.phase(),
            mode: output.mode,
            stage: self.progression.stage(),
            presentation: self.presentation,
        }
    }

    fn process_triggers(&mut self, world: &mut impl CollisionWorld, dt: f32) {
        self.progression.settle(&self.body.contacts);
        self.progression.update_surface(&self.body.contacts);

        let mut pickups: Vec<ColliderHandle> = Vec::new();
        for overlap in self.body.contacts.all() {
            if overlap.tag == SurfaceTag::SnowItem && !pickups.contains(&overlap.collider) {
                pickups.push(overlap.collider);
            }
        }
        for pickup in pickups {
            if !self.progression.accepts_pickup() {
                break;
            }
            if self.progression.advance_stage() {
                world.despawn(pickup);
                self.events
                    .emit(CharacterEvent::StageChanged(self.progression.stage()));
            }
        }

        let in_area = self.body.contacts.touches(SurfaceTag::SnowArea);
        if self.progression.accumulate_exposure(in_area, dt) {
            self.events
                .emit(CharacterEvent::StageChanged(self.progression.stage()));
        }

        if self.body.contacts.touches(SurfaceTag::Spike) && self.progression.hazard_resets() {
            self.reset_to_spawn();
        }
    }

    /// Snap back to the spawn anchor with a bare stage and no motion
    pub fn reset_to_spawn(&mut self) {
        let Some(anchor) = self.spawn_anchor else {
            warn!("{} touched a hazard but has no spawn anchor", self.name);
            return;
        };

        let previous_stage = self.progression.stage();
        self.body.teleport(anchor);
        self.progression.reset();
        self.locomotion.reset();

        info!("{} reset to spawn at ({:.2}, {:.2})", self.name, anchor.x, anchor.y);
        self.events.emit(CharacterEvent::ResetToSpawn);
        if previous_stage != SnowStage::Bare {
            self.events.emit(CharacterEvent::StageChanged(SnowStage::Bare));
        }
    }

    fn update_presentation(&mut self, mode: MovementMode) {
        self.presentation = PresentationParams::from_state(
            mode,
            self.body.is_grounded(),
            self.progression.is_wall_sliding(),
            self.body.facing_right,
            self.progression.stage(),
        );
        if let Some(sink) = self.sink.as_deref_mut() {
            self.presentation.apply(sink);
        }
    }

    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.body.velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.body.is_grounded()
    }

    pub fn phase(&self) -> JumpPhase {
        self.locomotion.phase()
    }

    pub fn mode(&self) -> MovementMode {
        self.locomotion.mode()
    }

    pub fn is_running(&self) -> bool {
        self.locomotion.is_running()
    }

    pub fn stage(&self) -> SnowStage {
        self.progression.stage()
    }

    pub fn progression(&self) -> &ProgressionState {
        &self.progression
    }

    pub fn presentation(&self) -> &PresentationParams {
        &self.presentation
    }

    pub fn spawn_anchor(&self) -> Option<Vec2> {
        self.spawn_anchor
    }

    pub fn set_spawn_anchor(&mut self, anchor: Option<Vec2>) {
        self.spawn_anchor = anchor;
    }

    pub fn axis_deadzone(&self) -> f32 {
        self.axis_deadzone
    }
}

/// Owns every character in the level
#[derive(Debug, Default)]
pub struct CharacterManager {
    characters: Vec<Character>,
    next_id: CharacterId,
}

impl CharacterManager {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
            next_id: 0,
        }
    }

    /// Spawn a new character at the anchor (or the origin without one)
    pub fn spawn_character(
        &mut self,
        name: &str,
        player_index: Option<usize>,
        config: &GameConfig,
        spawn_anchor: Option<Vec2>,
    ) -> Result<CharacterId, ConfigError> {
        let id = self.next_id;
        let start = spawn_anchor.unwrap_or(Vec2::ZERO);
        let character = Character::new(id, name, player_index, config, spawn_anchor, start)?;

        info!("Spawned {} (id {}) at ({:.2}, {:.2})", name, id, start.x, start.y);
        self.characters.push(character);
        self.next_id += 1;
        Ok(id)
    }

    pub fn get(&self, id: CharacterId) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.iter_mut().find(|c| c.id == id)
    }

    pub fn all(&self) -> &[Character] {
        &self.characters
    }

    /// Tick every character; `frames` is indexed by player seat
    ///
    /// Characters without a seat (or without a frame) get an empty frame.
    pub fn tick_all(
        &mut self,
        frames: &[InputFrame],
        world: &mut impl CollisionWorld,
        dt: f32,
    ) -> Vec<(CharacterId, TickReport)> {
        let mut reports = Vec::with_capacity(self.characters.len());
        for character in &mut self.characters {
            let frame = character
                .player_index
                .and_then(|index| frames.get(index))
                .copied()
                .unwrap_or_default();
            reports.push((character.id, character.tick(&frame, &mut *world, dt)));
        }
        reports
    }

    pub fn remove(&mut self, id: CharacterId) -> Option<Character> {
        let pos = self.characters.iter().position(|c| c.id == id)?;
        Some(self.characters.remove(pos))
    }

    pub fn count(&self) -> usize {
        self.characters.len()
    }
}
