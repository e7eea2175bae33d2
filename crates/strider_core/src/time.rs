//! Variable-step frame clock.
//!
//! Each rendered frame gets exactly one `elapsed` value; there is no fixed-step
//! accumulator. Long hitches are capped so a stalled frame cannot launch the
//! character across the scene.

use std::time::Instant;

const FPS_SAMPLE_COUNT: usize = 60;

pub struct FrameClock {
    pub max_frame_dt: f64,
    pub total_time: f64,
    pub frame_count: u64,
    pub elapsed: f64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            max_frame_dt: 0.25,
            total_time: 0.0,
            frame_count: 0,
            elapsed: 0.0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    /// Measure wall-clock time since the previous frame and return it (seconds).
    pub fn begin_frame(&mut self) -> f64 {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt)
    }

    /// Feed an externally supplied delta (replays, tests). Returns the capped delta.
    pub fn advance(&mut self, dt: f64) -> f64 {
        let mut dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if dt > self.max_frame_dt {
            log::warn!(
                "Frame took {:.1}ms -- capping elapsed time to {}ms",
                dt * 1000.0,
                self.max_frame_dt * 1000.0
            );
            dt = self.max_frame_dt;
        }

        self.elapsed = dt;
        self.total_time += dt;
        self.frame_count += 1;

        // FPS smoothing
        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };

        dt
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_accumulates_total_time() {
        let mut clock = FrameClock::new();
        clock.advance(0.016);
        clock.advance(0.020);
        assert_eq!(clock.frame_count, 2);
        assert!((clock.total_time - 0.036).abs() < 1e-12);
        assert!((clock.elapsed - 0.020).abs() < 1e-12);
    }

    #[test]
    fn hitch_is_capped() {
        let mut clock = FrameClock::new();
        let dt = clock.advance(3.0);
        assert!((dt - clock.max_frame_dt).abs() < 1e-12);
    }

    #[test]
    fn invalid_delta_becomes_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.advance(-1.0), 0.0);
        assert_eq!(clock.advance(f64::NAN), 0.0);
        assert_eq!(clock.advance(f64::INFINITY), 0.0);
        assert_eq!(clock.total_time, 0.0);
    }

    #[test]
    fn smoothed_fps_converges() {
        let mut clock = FrameClock::new();
        for _ in 0..FPS_SAMPLE_COUNT {
            clock.advance(1.0 / 30.0);
        }
        assert!((clock.smoothed_fps - 30.0).abs() < 1e-6);
    }
}
