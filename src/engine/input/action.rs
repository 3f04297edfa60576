// Game action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Represents all possible in-game actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Jump,
    Down,

    /// Leave the snowball stage voluntarily
    Release,

    // Meta actions
    Pause,
    Menu,
}

/// Represents an input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
}

impl InputSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }
}

/// Default keyboard bindings for Player 1
pub fn default_p1_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::KeyA), Action::MoveLeft),
        (InputSource::key(KeyCode::KeyD), Action::MoveRight),
        (InputSource::key(KeyCode::KeyW), Action::Jump),
        (InputSource::key(KeyCode::Space), Action::Jump),
        (InputSource::key(KeyCode::KeyS), Action::Down),
        (InputSource::key(KeyCode::KeyE), Action::Release),
    ]
}

/// Default keyboard bindings for Player 2 (arrow cluster)
pub fn default_p2_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::ArrowLeft), Action::MoveLeft),
        (InputSource::key(KeyCode::ArrowRight), Action::MoveRight),
        (InputSource::key(KeyCode::ArrowUp), Action::Jump),
        (InputSource::key(KeyCode::ArrowDown), Action::Down),
        (InputSource::key(KeyCode::Slash), Action::Release),
    ]
}

/// Global bindings (not player-specific)
pub fn global_bindings() -> Vec<(InputSource, Action)> {
    vec![
        (InputSource::key(KeyCode::Escape), Action::Menu),
        (InputSource::key(KeyCode::KeyP), Action::Pause),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_input_source_keyboard_creation() {
        let source = InputSource::key(KeyCode::KeyA);
        assert_eq!(source, InputSource::Keyboard(KeyCode::KeyA));
    }

    #[test]
    fn test_p1_bindings_cover_locomotion() {
        let actions: HashSet<_> = default_p1_bindings().into_iter().map(|(_, a)| a).collect();
        for action in [
            Action::MoveLeft,
            Action::MoveRight,
            Action::Jump,
            Action::Down,
            Action::Release,
        ] {
            assert!(actions.contains(&action), "missing {action:?}");
        }
    }

    #[test]
    fn test_no_duplicate_inputs_across_players() {
        let mut seen_sources = HashSet::new();
        for (source, _) in default_p1_bindings()
            .into_iter()
            .chain(default_p2_bindings())
            .chain(global_bindings())
        {
            assert!(seen_sources.insert(source), "Duplicate input source {source:?}");
        }
    }
}
