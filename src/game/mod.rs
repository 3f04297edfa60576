// Game logic: characters, configuration, levels, hazards, session state

pub mod characters;
pub mod config;
pub mod hazard;
pub mod level;
pub mod session;

pub use config::{ConfigError, GameConfig};
pub use level::{Level, LevelLayout};
pub use session::{GameSession, GameState};
