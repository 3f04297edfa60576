// Surface typing, snow accretion and wall interaction

use log::debug;

use super::body::ContactState;
use super::state::SnowStage;
use crate::game::config::{HazardPolicy, ProgressionConfig};

/// Exposure timers within this of the threshold count as reaching it
const TIMER_EPSILON: f32 = 1e-4;

/// Friction class of the surface under the character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SurfaceType {
    #[default]
    Normal,
    LowFriction,
}

/// Stage, exposure timer and wall flags owned by one character
#[derive(Debug, Clone)]
pub struct ProgressionState {
    config: ProgressionConfig,
    stage: SnowStage,
    exposure_timer: f32,
    surface: SurfaceType,
    wall_sliding: bool,
    /// 1 = wall on the right, -1 = wall on the left, 0 = none
    wall_side: i8,
    /// A wall-jump was used during the current airborne phase
    wall_jump_spent: bool,
    /// Horizontal input ignored until the character lands or releases
    control_locked: bool,
}

impl ProgressionState {
    pub fn new(config: ProgressionConfig) -> Self {
        Self {
            config,
            stage: SnowStage::Bare,
            exposure_timer: 0.0,
            surface: SurfaceType::Normal,
            wall_sliding: false,
            wall_side: 0,
            wall_jump_spent: false,
            control_locked: false,
        }
    }

    pub fn config(&self) -> &ProgressionConfig {
        &self.config
    }

    pub fn stage(&self) -> SnowStage {
        self.stage
    }

    pub fn exposure_timer(&self) -> f32 {
        self.exposure_timer
    }

    pub fn surface(&self) -> SurfaceType {
        self.surface
    }

    pub fn is_wall_sliding(&self) -> bool {
        self.wall_sliding
    }

    pub fn wall_side(&self) -> i8 {
        self.wall_side
    }

    pub fn has_wall_jumped(&self) -> bool {
        self.wall_jump_spent
    }

    pub fn is_control_locked(&self) -> bool {
        self.control_locked
    }

    /// Refresh the wall flags from the previous tick's contacts
    ///
    /// Landing restores the wall-jump and horizontal control.
    pub fn begin_tick(&mut self, contacts: &ContactState, vertical_velocity: f32) {
        self.settle(contacts);

        let eligible = !contacts.grounded && contacts.touching_wall();
        self.wall_side = if eligible { contacts.wall_side() } else { 0 };
        self.wall_sliding = eligible && vertical_velocity < 0.0;
    }

    /// Clear the wall-jump budget and control lock once integration lands
    pub fn settle(&mut self, contacts: &ContactState) {
        if contacts.grounded {
            self.wall_jump_spent = false;
            self.control_locked = false;
        }
    }

    /// Consume a jump press as a wall-jump when allowed
    ///
    /// Returns the horizontal kick direction, pointing away from the wall.
    pub fn try_wall_jump(&mut self, jump_pressed: bool) -> Option<f32> {
        if !jump_pressed || !self.wall_sliding || self.wall_jump_spent {
            return None;
        }

        let direction = -f32::from(self.wall_side);
        self.wall_jump_spent = true;
        self.control_locked = true;
        self.wall_sliding = false;
        debug!("Wall-jump away from side {}", self.wall_side);
        Some(direction)
    }

    /// Leave the top stage on a release edge
    pub fn try_release(&mut self, release_pressed: bool) -> bool {
        if !release_pressed || !self.stage.is_max() {
            return false;
        }

        self.stage = SnowStage::Bare;
        self.exposure_timer = 0.0;
        self.control_locked = false;
        debug!("Released from {:?}", SnowStage::MAX);
        true
    }

    /// Classify the surface from the solid contacts of the last integration
    pub fn update_surface(&mut self, contacts: &ContactState) {
        self.surface = if contacts.on_low_friction() {
            SurfaceType::LowFriction
        } else {
            SurfaceType::Normal
        };
    }

    /// Whether touching a pickup would do anything right now
    pub fn accepts_pickup(&self) -> bool {
        self.config.advancement.allows_pickup() && !self.stage.is_max()
    }

    /// Advance one stage, saturating at the top
    pub fn advance_stage(&mut self) -> bool {
        let next = self.stage.advanced();
        if next == self.stage {
            return false;
        }
        debug!("Snow stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
        self.exposure_timer = 0.0;
        true
    }

    /// Accumulate time spent inside a snow area
    ///
    /// Leaving the area resets the timer. Returns true when the stage advanced.
    pub fn accumulate_exposure(&mut self, in_area: bool, dt: f32) -> bool {
        if !self.config.advancement.allows_exposure() {
            return false;
        }
        if !in_area || self.stage.is_max() {
            self.exposure_timer = 0.0;
            return false;
        }

        self.exposure_timer += dt;
        if self.exposure_timer + TIMER_EPSILON >= self.config.exposure_duration {
            self.exposure_timer = 0.0;
            return self.advance_stage();
        }
        false
    }

    /// Whether a hazard contact resets the character
    pub fn hazard_resets(&self) -> bool {
        match self.config.hazard_policy {
            HazardPolicy::ProtectAtMax => !self.stage.is_max(),
            HazardPolicy::AlwaysReset => true,
        }
    }

    /// Back to bare ice with every flag cleared
    pub fn reset(&mut self) {
        self.stage = SnowStage::Bare;
        self.exposure_timer = 0.0;
        self.surface = SurfaceType::Normal;
        self.wall_sliding = false;
        self.wall_side = 0;
        self.wall_jump_spent = false;
        self.control_locked = false;
    }

    #[cfg(test)]
    pub(crate) fn set_stage(&mut self, stage: SnowStage) {
        self.stage = stage;
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new(ProgressionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::physics::{ColliderHandle, Overlap, SurfaceTag};
    use crate::game::config::AdvancementPolicy;
    use glam::Vec2;

    fn airborne_on_wall(normal: Vec2) -> ContactState {
        ContactState {
            wall_normal: Some(normal),
            ..ContactState::default()
        }
    }

    fn grounded() -> ContactState {
        ContactState {
            grounded: true,
            ..ContactState::default()
        }
    }

    fn with_policy(advancement: AdvancementPolicy, hazard_policy: HazardPolicy) -> ProgressionState {
        ProgressionState::new(ProgressionConfig {
            advancement,
            hazard_policy,
            ..ProgressionConfig::default()
        })
    }

    #[test]
    fn test_exposure_advances_once_at_duration() {
        let mut progression = with_policy(AdvancementPolicy::Exposure, HazardPolicy::ProtectAtMax);

        for _ in 0..5 {
            assert!(!progression.accumulate_exposure(true, 0.5));
        }
        assert!(progression.accumulate_exposure(true, 0.5));
        assert_eq!(progression.stage(), SnowStage::Coated);
        assert_eq!(progression.exposure_timer(), 0.0);
    }

    #[test]
    fn test_exposure_resets_on_exit() {
        let mut progression = with_policy(AdvancementPolicy::Exposure, HazardPolicy::ProtectAtMax);
        progression.accumulate_exposure(true, 2.5);
        progression.accumulate_exposure(false, 0.5);
        assert_eq!(progression.exposure_timer(), 0.0);

        progression.accumulate_exposure(true, 2.5);
        assert_eq!(progression.stage(), SnowStage::Bare);
    }

    #[test]
    fn test_pickup_restarts_exposure_under_combined_policy() {
        let mut progression = with_policy(AdvancementPolicy::Combined, HazardPolicy::ProtectAtMax);
        progression.accumulate_exposure(true, 2.5);
        assert!(progression.accepts_pickup());

        assert!(progression.advance_stage());
        assert_eq!(progression.stage(), SnowStage::Coated);
        assert_eq!(progression.exposure_timer(), 0.0);

        // The earlier 2.5s no longer counts toward the next stage
        assert!(!progression.accumulate_exposure(true, 0.5));
        assert_eq!(progression.stage(), SnowStage::Coated);
        for _ in 0..4 {
            progression.accumulate_exposure(true, 0.5);
        }
        assert!(progression.accumulate_exposure(true, 0.5));
        assert_eq!(progression.stage(), SnowStage::Snowball);
    }

    #[test]
    fn test_settle_restores_wall_jump_after_landing() {
        let mut progression = ProgressionState::default();
        progression.begin_tick(&airborne_on_wall(Vec2::NEG_X), -1.0);
        assert!(progression.try_wall_jump(true).is_some());

        progression.settle(&ContactState::default());
        assert!(progression.has_wall_jumped());

        progression.settle(&grounded());
        assert!(!progression.has_wall_jumped());
        assert!(!progression.is_control_locked());
    }

    #[test]
    fn test_exposure_ignored_under_pickup_policy() {
        let mut progression = with_policy(AdvancementPolicy::Pickup, HazardPolicy::ProtectAtMax);
        assert!(!progression.accumulate_exposure(true, 10.0));
        assert_eq!(progression.stage(), SnowStage::Bare);
    }

    #[test]
    fn test_stage_never_exceeds_max() {
        let mut progression = ProgressionState::default();
        assert!(progression.advance_stage());
        assert!(progression.advance_stage());
        assert!(!progression.advance_stage());
        assert_eq!(progression.stage(), SnowStage::Snowball);
        assert!(!progression.accepts_pickup());
    }

    #[test]
    fn test_wall_slide_requires_falling() {
        let mut progression = ProgressionState::default();

        progression.begin_tick(&airborne_on_wall(Vec2::NEG_X), 2.0);
        assert!(!progression.is_wall_sliding());
        assert_eq!(progression.wall_side(), 1);

        progression.begin_tick(&airborne_on_wall(Vec2::NEG_X), -2.0);
        assert!(progression.is_wall_sliding());
    }

    #[test]
    fn test_wall_jump_once_per_airborne_phase() {
        let mut progression = ProgressionState::default();
        progression.begin_tick(&airborne_on_wall(Vec2::NEG_X), -1.0);

        assert_eq!(progression.try_wall_jump(true), Some(-1.0));
        assert!(progression.is_control_locked());

        progression.begin_tick(&airborne_on_wall(Vec2::X), -1.0);
        assert_eq!(progression.try_wall_jump(true), None);

        progression.begin_tick(&grounded(), 0.0);
        assert!(!progression.has_wall_jumped());
        assert!(!progression.is_control_locked());
    }

    #[test]
    fn test_grounded_never_wall_slides() {
        let mut progression = ProgressionState::default();
        let contacts = ContactState {
            grounded: true,
            wall_normal: Some(Vec2::X),
            ..ContactState::default()
        };
        progression.begin_tick(&contacts, -1.0);
        assert!(!progression.is_wall_sliding());
    }

    #[test]
    fn test_release_only_at_max() {
        let mut progression = ProgressionState::default();
        progression.advance_stage();
        assert!(!progression.try_release(true));
        assert_eq!(progression.stage(), SnowStage::Coated);

        progression.advance_stage();
        assert!(!progression.try_release(false));
        assert!(progression.try_release(true));
        assert_eq!(progression.stage(), SnowStage::Bare);
    }

    #[test]
    fn test_hazard_policies() {
        let mut protective = with_policy(AdvancementPolicy::Pickup, HazardPolicy::ProtectAtMax);
        let mut strict = with_policy(AdvancementPolicy::Pickup, HazardPolicy::AlwaysReset);
        assert!(protective.hazard_resets());

        protective.set_stage(SnowStage::Snowball);
        strict.set_stage(SnowStage::Snowball);
        assert!(!protective.hazard_resets());
        assert!(strict.hazard_resets());
    }

    #[test]
    fn test_surface_from_contacts() {
        let mut progression = ProgressionState::default();
        let mut contacts = grounded();
        contacts.contacts.push(Overlap {
            collider: ColliderHandle::invalid(),
            tag: SurfaceTag::Ice,
        });

        progression.update_surface(&contacts);
        assert_eq!(progression.surface(), SurfaceType::LowFriction);

        progression.update_surface(&ContactState::default());
        assert_eq!(progression.surface(), SurfaceType::Normal);
    }
}
