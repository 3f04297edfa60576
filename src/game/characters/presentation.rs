// Write-only parameters handed to an animator

use std::collections::HashMap;

use super::state::{MovementMode, SnowStage};

/// Receiver of named animator parameters
pub trait PresentationSink: std::fmt::Debug {
    fn set_bool(&mut self, name: &str, value: bool);
    fn set_float(&mut self, name: &str, value: f32);
    fn set_int(&mut self, name: &str, value: i32);
}

/// Snapshot of everything the animator sees for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PresentationParams {
    pub grounded: bool,
    pub walking: bool,
    pub running: bool,
    pub sliding: bool,
    pub crouching: bool,
    pub wall_sliding: bool,
    /// Discrete speed level: 0.0 idle, 0.5 walk, 1.0 run or slide
    pub velocity_x: f32,
    pub facing_right: bool,
    pub snow_stage: SnowStage,
}

impl PresentationParams {
    pub fn from_state(
        mode: MovementMode,
        grounded: bool,
        wall_sliding: bool,
        facing_right: bool,
        snow_stage: SnowStage,
    ) -> Self {
        let velocity_x = match mode {
            MovementMode::Run | MovementMode::Slide => 1.0,
            MovementMode::Walk => 0.5,
            MovementMode::Idle | MovementMode::Crouch => 0.0,
        };

        Self {
            grounded,
            walking: mode == MovementMode::Walk,
            running: mode == MovementMode::Run,
            sliding: mode == MovementMode::Slide,
            crouching: mode == MovementMode::Crouch,
            wall_sliding,
            velocity_x,
            facing_right,
            snow_stage,
        }
    }

    pub fn apply(&self, sink: &mut dyn PresentationSink) {
        sink.set_bool("grounded", self.grounded);
        sink.set_bool("walking", self.walking);
        sink.set_bool("running", self.running);
        sink.set_bool("sliding", self.sliding);
        sink.set_bool("crouching", self.crouching);
        sink.set_bool("wallSliding", self.wall_sliding);
        sink.set_float("velocityX", self.velocity_x);
        sink.set_bool("facingRight", self.facing_right);
        sink.set_int("snowStage", i32::from(self.snow_stage.index()));
    }
}

/// Parameter value as last written
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Bool(bool),
    Float(f32),
    Int(i32),
}

/// Sink that keeps the latest value of every parameter
#[derive(Debug, Default)]
pub struct RecordingSink {
    values: HashMap<String, ParamValue>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(ParamValue::Bool(value)) => Some(value),
            _ => None,
        }
    }

    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name) {
            Some(ParamValue::Float(value)) => Some(value),
            _ => None,
        }
    }
}

impl PresentationSink for RecordingSink {
    fn set_bool(&mut self, name: &str, value: bool) {
        self.values.insert(name.to_string(), ParamValue::Bool(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_string(), ParamValue::Float(value));
    }

    fn set_int(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_string(), ParamValue::Int(value));
    }
}
