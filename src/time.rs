//! Frame timing.
//!
//! [`FrameClock`] measures the wall-clock time between redraws and turns it
//! into the step the band simulation advances by. Steps are capped at
//! `max_delta` so a stalled frame (window drag, debugger, tab switch) does
//! not explode the Verlet integration.
//!
//! ```ignore
//! let mut clock = FrameClock::new().with_max_delta(0.033);
//!
//! // once per redraw
//! let dt = clock.tick();
//! driver.tick(dt, &mut sink)?;
//! ```

use std::time::{Duration, Instant};

/// Per-frame timing with a capped step.
#[derive(Debug)]
pub struct FrameClock {
    last_frame: Instant,
    /// Simulated seconds since creation (sum of capped steps).
    simulated_secs: f32,
    /// Step produced by the last tick.
    delta_secs: f32,
    /// Uncapped wall-clock time of the last frame.
    raw_delta_secs: f32,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    fixed_delta: Option<f32>,
    time_scale: f32,
    max_delta: f32,
}

impl FrameClock {
    /// A clock starting now with a 1/30 s cap.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            simulated_secs: 0.0,
            delta_secs: 0.0,
            raw_delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta: None,
            time_scale: 1.0,
            max_delta: 0.033,
        }
    }

    /// Cap each step at `max_delta` seconds.
    pub fn with_max_delta(mut self, max_delta: f32) -> Self {
        self.max_delta = max_delta.max(0.0);
        self
    }

    /// Advance by the time since the last tick and return the step.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(raw, now)
    }

    /// Advance by an explicit wall-clock duration. Used by `tick` and by
    /// tests that need reproducible steps.
    pub fn tick_by(&mut self, raw_delta: f32) -> f32 {
        self.advance(raw_delta, Instant::now())
    }

    fn advance(&mut self, raw_delta: f32, now: Instant) -> f32 {
        self.raw_delta_secs = raw_delta;
        if self.paused {
            self.delta_secs = 0.0;
            return 0.0;
        }

        let scaled = self.fixed_delta.unwrap_or(raw_delta) * self.time_scale;
        self.delta_secs = clamp_delta(scaled, self.max_delta);
        self.simulated_secs += self.delta_secs;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// Step produced by the last tick, after scaling and capping.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Wall-clock duration of the last frame, uncapped.
    #[inline]
    pub fn raw_delta(&self) -> f32 {
        self.raw_delta_secs
    }

    /// Sum of all steps so far.
    #[inline]
    pub fn simulated(&self) -> f32 {
        self.simulated_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn max_delta(&self) -> f32 {
        self.max_delta
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop advancing; ticks return 0 until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after a pause. The paused interval is not simulated.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_frame = Instant::now();
            self.paused = false;
        }
    }

    /// Use a constant step instead of wall-clock time. Still capped.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }

    /// Multiply every step by `scale` (clamped to be non-negative).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Cap a frame step at `max_delta`. Negative or NaN steps become 0.
pub fn clamp_delta(delta: f32, max_delta: f32) -> f32 {
    if delta.is_nan() {
        return 0.0;
    }
    delta.clamp(0.0, max_delta)
}
