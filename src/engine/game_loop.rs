/// Fixed timestep scheduling
///
/// Wall-clock frame times are accumulated and consumed in fixed slices so
/// character logic always sees the same `dt`. `advance` takes the frame time
/// explicitly; `begin_frame` measures it with `Instant` for the live loop.
use std::time::{Duration, Instant};

/// Target update rate (60 updates per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Maximum number of fixed updates per frame to prevent spiral of death
const MAX_UPDATES_PER_FRAME: u32 = 5;

pub struct GameLoop {
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    frame_count: u64,
    update_count: u64,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_count: 0,
            update_count: 0,
        }
    }

    /// Measure the time since the last call and schedule updates for it
    pub fn begin_frame(&mut self) -> u32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Accumulate `frame_time`, returns the number of fixed updates to run
    ///
    /// Time beyond the per-frame cap is dropped instead of carried over.
    pub fn advance(&mut self, frame_time: Duration) -> u32 {
        self.frame_count += 1;

        if self.paused {
            return 0;
        }

        self.accumulator += frame_time;

        let mut updates = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && updates < MAX_UPDATES_PER_FRAME {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            updates += 1;
        }

        if updates == MAX_UPDATES_PER_FRAME && self.accumulator >= FIXED_TIMESTEP_DURATION {
            log::debug!(
                "Dropping {:?} of simulation time after {} updates",
                self.accumulator,
                updates
            );
            self.accumulator = Duration::ZERO;
        }

        self.update_count += updates as u64;
        updates
    }

    /// Interpolation alpha between the last two updates
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            log::info!("Game paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            // Reset accumulator to prevent update burst
            self.accumulator = Duration::ZERO;
            self.last_frame_time = Instant::now();
            log::info!("Game resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_loop_creation() {
        let game_loop = GameLoop::new();
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_one_step_per_timestep() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION), 1);
        assert_eq!(game_loop.advance(FIXED_TIMESTEP_DURATION * 3), 3);
        assert_eq!(game_loop.update_count(), 4);
    }

    #[test]
    fn test_partial_frames_accumulate() {
        let mut game_loop = GameLoop::new();
        let half = FIXED_TIMESTEP_DURATION / 2;
        assert_eq!(game_loop.advance(half), 0);
        assert!(game_loop.alpha() > 0.4 && game_loop.alpha() < 0.6);
        assert_eq!(game_loop.advance(half + Duration::from_micros(1)), 1);
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut game_loop = GameLoop::new();
        assert_eq!(game_loop.advance(Duration::from_millis(300)), MAX_UPDATES_PER_FRAME);
        // Excess time is not replayed on the next frame
        assert_eq!(game_loop.advance(Duration::ZERO), 0);
    }

    #[test]
    fn test_paused_no_updates() {
        let mut game_loop = GameLoop::new();
        game_loop.pause();
        assert_eq!(game_loop.advance(Duration::from_millis(50)), 0);
        assert_eq!(game_loop.frame_count(), 1);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = GameLoop::new();
        game_loop.toggle_pause();
        assert!(game_loop.is_paused());
        game_loop.toggle_pause();
        assert!(!game_loop.is_paused());
    }

    #[test]
    fn test_resume_clears_accumulator() {
        let mut game_loop = GameLoop::new();
        game_loop.advance(FIXED_TIMESTEP_DURATION / 2);
        game_loop.pause();
        game_loop.resume();
        assert_eq!(game_loop.alpha(), 0.0);
    }
}
