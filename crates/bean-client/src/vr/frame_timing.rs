//! Frame timing statistics for the VR loop.
//!
//! Rolling window of per-frame wait/render/submit times, plus a missed
//! frame counter against the compositor's frame budget.

/// Rolling frame timing statistics.
#[derive(Debug)]
pub struct FrameTiming {
    wait_times: Vec<f64>,
    render_times: Vec<f64>,
    submit_times: Vec<f64>,
    total_times: Vec<f64>,

    /// Maximum number of samples kept.
    window_size: usize,

    /// Total frames recorded.
    pub total_frames: u64,

    /// Frames that blew the budget.
    pub missed_frames: u64,

    /// Frame budget in milliseconds (11.1 at 90 Hz).
    pub budget_ms: f64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new(1000, 11.1)
    }
}

impl FrameTiming {
    pub fn new(window_size: usize, budget_ms: f64) -> Self {
        Self {
            wait_times: Vec::with_capacity(window_size),
            render_times: Vec::with_capacity(window_size),
            submit_times: Vec::with_capacity(window_size),
            total_times: Vec::with_capacity(window_size),
            window_size,
            total_frames: 0,
            missed_frames: 0,
            budget_ms,
        }
    }

    /// Record one frame's phase timings, in milliseconds.
    pub fn record_frame(&mut self, wait_ms: f64, render_ms: f64, submit_ms: f64) {
        let total = wait_ms + render_ms + submit_ms;

        Self::push_sample(&mut self.wait_times, wait_ms, self.window_size);
        Self::push_sample(&mut self.render_times, render_ms, self.window_size);
        Self::push_sample(&mut self.submit_times, submit_ms, self.window_size);
        Self::push_sample(&mut self.total_times, total, self.window_size);

        self.total_frames += 1;
        if total > self.budget_ms {
            self.missed_frames += 1;
        }
    }

    fn push_sample(samples: &mut Vec<f64>, value: f64, window_size: usize) {
        samples.push(value);
        if samples.len() > window_size {
            samples.remove(0);
        }
    }

    /// Mean total frame time over the window, in milliseconds.
    pub fn average_total_ms(&self) -> f64 {
        if self.total_times.is_empty() {
            return 0.0;
        }
        self.total_times.iter().sum::<f64>() / self.total_times.len() as f64
    }

    /// Frames per second implied by the average total time.
    pub fn fps(&self) -> f64 {
        let avg = self.average_total_ms();
        if avg > 0.0 {
            1000.0 / avg
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_missed_frames() {
        let mut timing = FrameTiming::new(10, 11.1);
        timing.record_frame(1.0, 5.0, 1.0); // 7ms, in budget
        timing.record_frame(2.0, 9.0, 1.0); // 12ms, missed

        assert_eq!(timing.total_frames, 2);
        assert_eq!(timing.missed_frames, 1);
    }

    #[test]
    fn window_is_bounded() {
        let mut timing = FrameTiming::new(4, 11.1);
        for i in 0..10 {
            timing.record_frame(i as f64, 0.0, 0.0);
        }
        assert_eq!(timing.total_frames, 10);
        // Only the last four samples survive: 6+7+8+9.
        assert!((timing.average_total_ms() - 7.5).abs() < 1.0e-9);
    }

    #[test]
    fn fps_from_average() {
        let mut timing = FrameTiming::new(10, 11.1);
        timing.record_frame(5.0, 5.0, 0.0);
        assert!((timing.fps() - 100.0).abs() < 1.0e-9);
    }

    #[test]
    fn empty_window_is_quiet() {
        let timing = FrameTiming::default();
        assert_eq!(timing.average_total_ms(), 0.0);
        assert_eq!(timing.fps(), 0.0);
    }
}
