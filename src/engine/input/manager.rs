// Input manager routing keyboard events to per-player state

use super::action::{Action, InputSource};
use super::config::InputConfigManager;
use super::frame::InputFrame;
use super::player::PlayerInput;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Coordinates input for every local player
pub struct InputManager {
    config: InputConfigManager,
    players: Vec<PlayerInput>,
}

impl InputManager {
    pub fn new(max_players: usize) -> Self {
        Self {
            config: InputConfigManager::new(max_players),
            players: (0..max_players).map(PlayerInput::new).collect(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.process_key(key_code, event.state, event.repeat);
        }
    }

    /// Route one key transition to every player bound to it
    ///
    /// Key repeats never produce a new press edge.
    pub fn process_key(&mut self, key_code: KeyCode, state: ElementState, repeat: bool) {
        let source = InputSource::key(key_code);

        for player in &mut self.players {
            let Some(action) = self.config.get_action(player.player_id(), source) else {
                continue;
            };
            match state {
                ElementState::Pressed if !repeat => player.press(action),
                ElementState::Pressed => {}
                ElementState::Released => player.release(action),
            }
        }
    }

    /// Snapshot for one player, `None` for an unknown id
    pub fn frame(&self, player_id: usize, axis_deadzone: f32) -> Option<InputFrame> {
        self.player(player_id).map(|player| player.frame(axis_deadzone))
    }

    /// Clear the edges of every player
    /// Call this once per frame after the frame's ticks ran
    pub fn update(&mut self) {
        for player in &mut self.players {
            player.update();
        }
    }

    pub fn player(&self, player_id: usize) -> Option<&PlayerInput> {
        self.players.get(player_id)
    }

    pub fn config(&self) -> &InputConfigManager {
        &self.config
    }

    /// Check if any player pressed a specific action this frame
    pub fn any_player_just_pressed(&self, action: Action) -> bool {
        self.players.iter().any(|p| p.just_pressed(action))
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new(2)
    }
}
