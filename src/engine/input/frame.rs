// Per-tick input snapshot consumed by the character core

/// Normalized input for one simulation tick
///
/// Edges are true only on the tick the transition happened.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct InputFrame {
    /// Horizontal intent in [-1, 1], exactly 0.0 when released
    pub axis: f32,
    pub jump_pressed: bool,
    pub jump_released: bool,
    pub down_held: bool,
    /// Voluntary exit from the snowball stage
    pub release_pressed: bool,
}

impl InputFrame {
    /// Frame with only a horizontal axis value
    pub fn axis(axis: f32) -> Self {
        Self {
            axis,
            ..Self::default()
        }
    }

    /// Copy of this frame with the one-shot edges cleared
    ///
    /// Used for the extra fixed updates of a frame so edges fire once.
    pub fn held_only(&self) -> Self {
        Self {
            axis: self.axis,
            down_held: self.down_held,
            ..Self::default()
        }
    }

    /// Combine with a later frame: held state from `later`, edges from either
    pub fn merge_edges(&self, later: &InputFrame) -> Self {
        Self {
            axis: later.axis,
            jump_pressed: self.jump_pressed || later.jump_pressed,
            jump_released: self.jump_released || later.jump_released,
            down_held: later.down_held,
            release_pressed: self.release_pressed || later.release_pressed,
        }
    }
}

/// Clamp an analog axis into [-1, 1] and zero values inside the deadzone
pub fn normalize_axis(raw: f32, deadzone: f32) -> f32 {
    if !raw.is_finite() {
        return 0.0;
    }
    let value = raw.clamp(-1.0, 1.0);
    if value.abs() < deadzone {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_axis() {
        assert_eq!(normalize_axis(0.05, 0.1), 0.0);
        assert_eq!(normalize_axis(-0.5, 0.1), -0.5);
        assert_eq!(normalize_axis(3.0, 0.1), 1.0);
        assert_eq!(normalize_axis(f32::NAN, 0.1), 0.0);
    }

    #[test]
    fn test_held_only_drops_edges() {
        let frame = InputFrame {
            axis: 1.0,
            jump_pressed: true,
            jump_released: true,
            down_held: true,
            release_pressed: true,
        };
        let held = frame.held_only();
        assert_eq!(held.axis, 1.0);
        assert!(held.down_held);
        assert!(!held.jump_pressed && !held.jump_released && !held.release_pressed);
    }

    #[test]
    fn test_merge_keeps_earlier_edges() {
        let earlier = InputFrame {
            axis: 1.0,
            jump_pressed: true,
            ..InputFrame::default()
        };
        let merged = earlier.merge_edges(&InputFrame::axis(-1.0));
        assert_eq!(merged.axis, -1.0);
        assert!(merged.jump_pressed);
        assert!(!merged.down_held);
    }
}
