// Key binding tables and remapping

use super::action::{default_p1_bindings, default_p2_bindings, global_bindings, Action, InputSource};
use std::collections::HashMap;

/// Id used for the table that applies to every player
pub const GLOBAL_BINDINGS_ID: usize = usize::MAX;

/// Key bindings for one player
#[derive(Debug, Clone)]
pub struct InputConfig {
    player_id: usize,
    bindings: HashMap<InputSource, Action>,
}

impl InputConfig {
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            bindings: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(player_id: usize, bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new(player_id);
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Default table for a local seat: WASD for the first, arrows for the second
    pub fn for_seat(player_id: usize) -> Self {
        let defaults = match player_id {
            0 => default_p1_bindings(),
            1 => default_p2_bindings(),
            _ => Vec::new(),
        };
        Self::from_bindings(player_id, defaults)
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Bind a source, replacing whatever it was bound to before
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.bindings.insert(source, action);
    }

    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }
}

/// Binding tables for every local player plus the global table
#[derive(Debug)]
pub struct InputConfigManager {
    configs: Vec<InputConfig>,
    global_config: InputConfig,
}

impl InputConfigManager {
    pub fn new(max_players: usize) -> Self {
        Self {
            configs: (0..max_players).map(InputConfig::for_seat).collect(),
            global_config: InputConfig::from_bindings(GLOBAL_BINDINGS_ID, global_bindings()),
        }
    }

    pub fn get_config(&self, player_id: usize) -> Option<&InputConfig> {
        self.configs.get(player_id)
    }

    pub fn global_config(&self) -> &InputConfig {
        &self.global_config
    }

    /// Player-specific bindings win over global ones
    pub fn get_action(&self, player_id: usize, source: InputSource) -> Option<Action> {
        self.get_config(player_id)
            .and_then(|config| config.get_action(source))
            .or_else(|| self.global_config.get_action(source))
    }
}

impl Default for InputConfigManager {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_and_rebind() {
        let mut config = InputConfig::new(0);
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Action::MoveLeft);
        assert_eq!(config.get_action(source), Some(Action::MoveLeft));

        config.bind(source, Action::MoveRight);
        assert_eq!(config.get_action(source), Some(Action::MoveRight));
    }

    #[test]
    fn test_jump_has_two_keys_for_p1() {
        let config = InputConfig::for_seat(0);
        assert_eq!(config.get_action(InputSource::key(KeyCode::Space)), Some(Action::Jump));
        assert_eq!(config.get_action(InputSource::key(KeyCode::KeyW)), Some(Action::Jump));
    }

    #[test]
    fn test_seats_use_separate_keys() {
        let manager = InputConfigManager::new(2);
        let arrow = InputSource::key(KeyCode::ArrowLeft);

        assert_eq!(manager.get_action(1, arrow), Some(Action::MoveLeft));
        assert_eq!(manager.get_action(0, arrow), None);
    }

    #[test]
    fn test_global_bindings_apply_to_every_player() {
        let manager = InputConfigManager::new(2);
        let menu_key = InputSource::key(KeyCode::Escape);

        assert_eq!(manager.get_action(0, menu_key), Some(Action::Menu));
        assert_eq!(manager.get_action(1, menu_key), Some(Action::Menu));
    }
}
