// Character system
//
// - `body`: kinematic body and per-tick contact state
// - `integrator`: moves the body against the level
// - `state`: jump phase machine, movement modes and snow stages
// - `locomotion`: run detection, speed selection and jump sequencing
// - `progression`: surface typing, snow accretion and wall interaction
// - `events` / `presentation`: outputs of a tick
// - `character`: composes the above into one controllable entity

pub mod body;
pub mod character;
pub mod events;
pub mod integrator;
pub mod locomotion;
pub mod presentation;
pub mod progression;
pub mod state;

pub use body::{CharacterBody, ContactState};
pub use character::{Character, CharacterId, CharacterManager, TickReport};
pub use events::{CharacterEvent, EventBus};
pub use integrator::MotionIntegrator;
pub use locomotion::{LocomotionContext, LocomotionOutput, LocomotionStateMachine};
pub use presentation::{ParamValue, PresentationParams, PresentationSink, RecordingSink};
pub use progression::{ProgressionState, SurfaceType};
pub use state::{JumpPhase, JumpStateMachine, JumpTransition, MovementMode, SnowStage};
