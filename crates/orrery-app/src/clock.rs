//! Variable-rate frame clock.
//!
//! Animation reads the total elapsed time, so bodies stay where the wall
//! clock says they should be. Movement integrates the per-frame delta,
//! which is clamped so a stall (window drag, breakpoint) does not throw the
//! observer across the system.

use std::time::Instant;

use tracing::warn;

/// Longest delta handed to movement integration, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25;

pub struct FrameClock {
    previous_time: Instant,
    elapsed: f64,
    delta: f32,
    frame_count: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            elapsed: 0.0,
            delta: 0.0,
            frame_count: 0,
        }
    }

    /// Measure the wall-clock time since the previous tick and advance.
    /// Returns the clamped delta.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f32();
        self.previous_time = now;
        self.advance(frame_time)
    }

    /// Advance by an explicit frame time. Elapsed time takes the full
    /// amount; the returned delta is clamped to [`MAX_FRAME_TIME`].
    pub fn advance(&mut self, frame_time: f32) -> f32 {
        let frame_time = frame_time.max(0.0);
        self.elapsed += f64::from(frame_time);

        self.delta = if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
            MAX_FRAME_TIME
        } else {
            frame_time
        };
        self.frame_count += 1;
        self.delta
    }

    /// Seconds since the clock started.
    pub fn elapsed(&self) -> f32 {
        self.elapsed as f32
    }

    pub fn delta(&self) -> f32 {
        self.delta
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
