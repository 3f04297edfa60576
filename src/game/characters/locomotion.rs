// Movement mode, run detection and jump sequencing

use super::body::ContactState;
use super::events::CharacterEvent;
use super::progression::SurfaceType;
use super::state::{JumpPhase, JumpStateMachine, JumpTransition, MovementMode, SnowStage};
use crate::core::math::axis_sign;
use crate::engine::input::InputFrame;
use crate::game::config::LocomotionConfig;

/// What the locomotion machine reads besides input
#[derive(Debug, Clone, Copy)]
pub struct LocomotionContext<'a> {
    /// Contacts from the previous integration
    pub contacts: &'a ContactState,
    pub surface: SurfaceType,
    pub stage: SnowStage,
}

/// Result of one locomotion tick
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LocomotionOutput {
    /// Desired horizontal velocity
    pub target_x: f32,
    pub mode: MovementMode,
    /// Vertical launch speed, set on the tick the jump leaves `PreparingToJump`
    pub launch_velocity: Option<f32>,
    /// Jump button released mid-hop
    pub cut_jump: bool,
    pub events: Vec<CharacterEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tap {
    direction: i8,
    time: f32,
}

#[derive(Debug)]
pub struct LocomotionStateMachine {
    config: LocomotionConfig,
    jump: JumpStateMachine,
    /// Local simulation clock, used for double-tap timing
    clock: f32,
    last_tap: Option<Tap>,
    previous_direction: i8,
    running: bool,
    mode: MovementMode,
}

impl LocomotionStateMachine {
    pub fn new(config: LocomotionConfig) -> Self {
        Self {
            config,
            jump: JumpStateMachine::new(),
            clock: 0.0,
            last_tap: None,
            previous_direction: 0,
            running: false,
            mode: MovementMode::Idle,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    pub fn phase(&self) -> JumpPhase {
        self.jump.phase()
    }

    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    /// Run one tick of locomotion
    pub fn advance(
        &mut self,
        input: &InputFrame,
        ctx: &LocomotionContext<'_>,
        dt: f32,
    ) -> LocomotionOutput {
        self.clock += dt;
        let grounded = ctx.contacts.grounded;
        let mut output = LocomotionOutput::default();

        let transition = self.jump.update(grounded);
        match transition {
            Some(JumpTransition::Launched) => {
                output.launch_velocity =
                    Some(self.config.jump_launch_speed * self.config.jump_modifier);
            }
            Some(JumpTransition::LeftGround) => output.events.push(CharacterEvent::Jumped),
            Some(JumpTransition::Landed) => output.events.push(CharacterEvent::Landed),
            Some(JumpTransition::Settled) | None => {}
        }

        if input.jump_pressed && grounded {
            self.jump.request_jump();
        }

        // A release on the launch tick is dropped so a tap still gets a full hop
        let launched = transition == Some(JumpTransition::Launched);
        if input.jump_released && !launched && self.jump.phase().is_in_hop() {
            output.cut_jump = true;
            output.events.push(CharacterEvent::StoppedJump);
        }

        self.detect_run(input.axis);

        let (mode, speed) = self.select_speed(input, ctx);
        self.mode = mode;
        output.mode = mode;
        output.target_x = input.axis * speed;
        output
    }

    fn detect_run(&mut self, axis: f32) {
        let direction = axis_sign(axis);

        if direction == 0 {
            self.running = false;
        } else if direction != self.previous_direction {
            // Fresh press, or a reversal without passing through zero
            self.running = match self.last_tap {
                Some(tap) if self.previous_direction == 0 && tap.direction == direction => {
                    self.clock - tap.time <= self.config.double_tap_window
                }
                _ => false,
            };
            self.last_tap = Some(Tap {
                direction,
                time: self.clock,
            });
        }

        self.previous_direction = direction;
    }

    fn select_speed(&self, input: &InputFrame, ctx: &LocomotionContext<'_>) -> (MovementMode, f32) {
        if input.down_held {
            let can_slide = self.running
                && ctx.surface == SurfaceType::LowFriction
                && ctx.stage == SnowStage::Bare;
            return if can_slide {
                (MovementMode::Slide, self.config.slide_speed)
            } else {
                (MovementMode::Crouch, 0.0)
            };
        }

        if axis_sign(input.axis) == 0 {
            (MovementMode::Idle, 0.0)
        } else if self.running {
            (MovementMode::Run, self.config.max_speed)
        } else {
            (MovementMode::Walk, self.config.walk_speed)
        }
    }

    /// Facing after moving at `target_x`, unchanged inside the deadzone
    pub fn resolve_facing(&self, facing_right: bool, target_x: f32) -> bool {
        if target_x.abs() > self.config.facing_deadzone {
            target_x > 0.0
        } else {
            facing_right
        }
    }

    /// Wall-jumps skip the grounded phases
    pub fn force_airborne(&mut self) {
        self.jump.force_airborne();
    }

    /// Forget the hop and any run in progress (respawn)
    pub fn reset(&mut self) {
        self.jump.reset();
        self.running = false;
        self.last_tap = None;
        self.previous_direction = 0;
        self.mode = MovementMode::Idle;
    }
}

impl Default for LocomotionStateMachine {
    fn default() -> Self {
        Self::new(LocomotionConfig::default())
    }
}
