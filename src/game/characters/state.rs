// Character state enums and the jump phase machine

/// Lifecycle of a single jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JumpPhase {
    /// Standing or walking, ready to jump
    #[default]
    Grounded,
    /// Jump requested, launch happens on the next tick
    PreparingToJump,
    /// Launched but still touching the ground
    Jumping,
    /// Left the ground
    Airborne,
    /// Touched down this tick
    Landed,
}

impl JumpPhase {
    /// Check if the phase belongs to an in-progress hop
    pub fn is_in_hop(&self) -> bool {
        matches!(self, Self::Jumping | Self::Airborne)
    }

    /// Get the animation name for this phase
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Grounded => "grounded",
            Self::PreparingToJump => "prepare_jump",
            Self::Jumping => "jump",
            Self::Airborne => "in_flight",
            Self::Landed => "land",
        }
    }
}

/// Horizontal movement mode, recomputed every tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MovementMode {
    #[default]
    Idle,
    Walk,
    Run,
    Slide,
    Crouch,
}

impl MovementMode {
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Slide => "slide",
            Self::Crouch => "crouch",
        }
    }
}

/// Three-stage snow accretion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum SnowStage {
    /// Bare ice, the only stage that can slide
    #[default]
    Bare = 0,
    /// Coated in snow
    Coated = 1,
    /// Full snowball, shielded from hazards under the protective policy
    Snowball = 2,
}

impl SnowStage {
    pub const MAX: Self = Self::Snowball;

    /// Ordinal of the stage (0..=2)
    pub fn index(&self) -> u8 {
        *self as u8
    }

    pub fn is_max(&self) -> bool {
        *self == Self::MAX
    }

    /// Next stage, saturating at the top
    pub fn advanced(&self) -> Self {
        match self {
            Self::Bare => Self::Coated,
            Self::Coated | Self::Snowball => Self::Snowball,
        }
    }

    /// Animator controller used for this stage
    pub fn controller_name(&self) -> &'static str {
        match self {
            Self::Bare => "ice",
            Self::Coated => "snow",
            Self::Snowball => "snowball",
        }
    }
}

/// Transition reported by the jump machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTransition {
    /// PreparingToJump -> Jumping, the launch impulse must be applied
    Launched,
    /// Jumping -> Airborne
    LeftGround,
    /// Airborne -> Landed
    Landed,
    /// Landed -> Grounded
    Settled,
}

/// Drives `JumpPhase` one tick at a time
#[derive(Debug, Default)]
pub struct JumpStateMachine {
    current: JumpPhase,
}

impl JumpStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current phase
    pub fn phase(&self) -> JumpPhase {
        self.current
    }

    /// Advance the automatic transitions for this tick
    ///
    /// `grounded` is the contact state produced by the previous integration.
    pub fn update(&mut self, grounded: bool) -> Option<JumpTransition> {
        match self.current {
            JumpPhase::PreparingToJump => {
                self.current = JumpPhase::Jumping;
                Some(JumpTransition::Launched)
            }
            JumpPhase::Jumping if !grounded => {
                self.current = JumpPhase::Airborne;
                Some(JumpTransition::LeftGround)
            }
            JumpPhase::Airborne if grounded => {
                self.current = JumpPhase::Landed;
                Some(JumpTransition::Landed)
            }
            JumpPhase::Landed => {
                self.current = JumpPhase::Grounded;
                Some(JumpTransition::Settled)
            }
            _ => None,
        }
    }

    /// Request a jump, only honoured from `Grounded`
    pub fn request_jump(&mut self) -> bool {
        if self.current == JumpPhase::Grounded {
            self.current = JumpPhase::PreparingToJump;
            true
        } else {
            false
        }
    }

    /// Skip straight to `Airborne` (wall-jumps)
    pub fn force_airborne(&mut self) {
        self.current = JumpPhase::Airborne;
    }

    /// Back to `Grounded` (respawn)
    pub fn reset(&mut self) {
        self.current = JumpPhase::Grounded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_phase() {
        let sm = JumpStateMachine::new();
        assert_eq!(sm.phase(), JumpPhase::Grounded);
    }

    #[test]
    fn test_full_hop_sequence() {
        let mut sm = JumpStateMachine::new();
        assert!(sm.request_jump());
        assert_eq!(sm.phase(), JumpPhase::PreparingToJump);

        assert_eq!(sm.update(true), Some(JumpTransition::Launched));
        assert_eq!(sm.phase(), JumpPhase::Jumping);

        // Still touching the ground on the launch tick
        assert_eq!(sm.update(true), None);

        assert_eq!(sm.update(false), Some(JumpTransition::LeftGround));
        assert_eq!(sm.update(false), None);
        assert_eq!(sm.phase(), JumpPhase::Airborne);

        assert_eq!(sm.update(true), Some(JumpTransition::Landed));
        assert_eq!(sm.phase(), JumpPhase::Landed);

        assert_eq!(sm.update(true), Some(JumpTransition::Settled));
        assert_eq!(sm.phase(), JumpPhase::Grounded);
    }

    #[test]
    fn test_landed_settles_even_if_airborne_again() {
        let mut sm = JumpStateMachine::new();
        sm.force_airborne();
        sm.update(true);
        assert_eq!(sm.update(false), Some(JumpTransition::Settled));
    }

    #[test]
    fn test_jump_request_ignored_mid_hop() {
        let mut sm = JumpStateMachine::new();
        sm.force_airborne();
        assert!(!sm.request_jump());
        assert_eq!(sm.phase(), JumpPhase::Airborne);
    }

    #[test]
    fn test_snow_stage_saturates() {
        assert_eq!(SnowStage::Bare.advanced(), SnowStage::Coated);
        assert_eq!(SnowStage::Coated.advanced(), SnowStage::Snowball);
        assert_eq!(SnowStage::Snowball.advanced(), SnowStage::Snowball);
        assert!(SnowStage::MAX.is_max());
        assert_eq!(SnowStage::Coated.index(), 1);
    }

    #[test]
    fn test_names() {
        assert_eq!(MovementMode::Slide.animation_name(), "slide");
        assert_eq!(JumpPhase::Airborne.animation_name(), "in_flight");
        assert_eq!(SnowStage::Snowball.controller_name(), "snowball");
    }
}
