//! Snowbound: a 2D platformer locomotion core.
//!
//! Characters are kinematic boxes moved by [`game::characters::MotionIntegrator`]
//! against level geometry hosted in rapier2d. Each fixed tick runs run
//! detection and jump sequencing, wall interaction and a three-stage snow
//! progression, then reports events and animator parameters.

pub mod core;
pub mod engine;
pub mod game;
