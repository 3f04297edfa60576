// Input handling
//
// - `action`: game actions and default key bindings
// - `config`: per-player binding tables
// - `player`: per-player pressed/edge state
// - `frame`: the normalized per-tick snapshot handed to characters
// - `manager`: routes winit keyboard events to players

pub mod action;
pub mod config;
pub mod frame;
pub mod manager;
pub mod player;

pub use action::{Action, InputSource};
pub use config::{InputConfig, InputConfigManager};
pub use frame::{normalize_axis, InputFrame};
pub use manager::InputManager;
pub use player::PlayerInput;
