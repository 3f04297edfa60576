// Top-level game state, constructed once and passed to whoever needs it

use log::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Playing,
    Ending,
}

#[derive(Debug, Default)]
pub struct GameSession {
    state: GameState,
    transitions: u32,
}

impl GameSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == GameState::Playing
    }

    /// Number of state changes since creation
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    /// Switch to `next`; returns false if already there
    pub fn transition(&mut self, next: GameState) -> bool {
        if self.state == next {
            return false;
        }
        info!("Game state {:?} -> {:?}", self.state, next);
        self.state = next;
        self.transitions += 1;
        true
    }

    pub fn start(&mut self) -> bool {
        self.transition(GameState::Playing)
    }

    /// End the run; only meaningful while playing
    pub fn finish(&mut self) -> bool {
        if !self.is_playing() {
            warn!("Ignoring finish request while in {:?}", self.state);
            return false;
        }
        self.transition(GameState::Ending)
    }

    pub fn back_to_menu(&mut self) -> bool {
        self.transition(GameState::Menu)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_in_menu() {
        let session = GameSession::new();
        assert_eq!(session.state(), GameState::Menu);
        assert!(!session.is_playing());
    }

    #[test]
    fn test_full_cycle() {
        let mut session = GameSession::new();
        assert!(session.start());
        assert!(!session.start());
        assert!(session.finish());
        assert!(session.back_to_menu());
        assert_eq!(session.transitions(), 3);
    }

    #[test]
    fn test_finish_requires_playing() {
        let mut session = GameSession::new();
        assert!(!session.finish());
        assert_eq!(session.state(), GameState::Menu);
    }
}
