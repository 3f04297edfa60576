// Per-player input state management

use super::action::Action;
use super::frame::{normalize_axis, InputFrame};
use std::collections::HashSet;

/// Represents the input state for a single player
#[derive(Debug)]
pub struct PlayerInput {
    /// Player ID
    player_id: usize,

    /// Actions that are currently pressed this frame
    pressed: HashSet<Action>,

    /// Actions that were just pressed this frame (press events)
    just_pressed: HashSet<Action>,

    /// Actions that were just released this frame (release events)
    just_released: HashSet<Action>,

    /// Actions that were pressed in the previous frame
    previous_pressed: HashSet<Action>,

    /// Analog horizontal axis from a stick, overrides the digital keys
    analog_axis: Option<f32>,
}

impl PlayerInput {
    /// Create a new player input state
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            previous_pressed: HashSet::new(),
            analog_axis: None,
        }
    }

    /// Get the player ID
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Check if an action is currently pressed
    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Check if an action was just pressed this frame
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    /// Check if an action was just released this frame
    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    /// Check if an action is held (pressed for multiple frames)
    pub fn is_held(&self, action: Action) -> bool {
        self.pressed.contains(&action) && self.previous_pressed.contains(&action)
    }

    /// Register an action press
    pub fn press(&mut self, action: Action) {
        if !self.pressed.contains(&action) {
            self.just_pressed.insert(action);
            self.pressed.insert(action);
        }
    }

    /// Register an action release
    pub fn release(&mut self, action: Action) {
        if self.pressed.contains(&action) {
            self.just_released.insert(action);
            self.pressed.remove(&action);
        }
    }

    /// Feed an analog stick value; `None` returns control to the keys
    pub fn set_analog_axis(&mut self, axis: Option<f32>) {
        self.analog_axis = axis;
    }

    /// Update input state for a new frame
    /// Call this once per frame after the frame's ticks consumed the edges
    pub fn update(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.previous_pressed = self.pressed.clone();
    }

    /// Horizontal direction from the digital keys (-1.0 to 1.0)
    pub fn digital_axis(&self) -> f32 {
        let mut horizontal = 0.0;
        if self.is_pressed(Action::MoveLeft) {
            horizontal -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            horizontal += 1.0;
        }
        horizontal
    }

    /// Build the normalized snapshot for the character core
    pub fn frame(&self, axis_deadzone: f32) -> InputFrame {
        let raw_axis = self.analog_axis.unwrap_or_else(|| self.digital_axis());

        InputFrame {
            axis: normalize_axis(raw_axis, axis_deadzone),
            jump_pressed: self.just_pressed(Action::Jump),
            jump_released: self.just_released(Action::Jump),
            down_held: self.is_pressed(Action::Down),
            release_pressed: self.just_pressed(Action::Release),
        }
    }
}
