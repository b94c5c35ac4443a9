use log::{info, trace};
use std::time::{Duration, Instant};

// Measures frame intervals. It never sleeps: frames are paced by the display.
#[derive(Debug)]
pub struct FpsEstimator {
    last_tick_time: Instant,
    iteration_duration: Duration,
    report_interval: Duration,
    report_start: Instant,
    frames_since_report: u32,
    fps: f64,
}

impl FpsEstimator {
    // `fps` is the expected refresh rate, used to flag slow frames.
    pub fn new(fps: f64, report_interval: Duration) -> FpsEstimator {
        let now = Instant::now();
        FpsEstimator {
            last_tick_time: now,
            iteration_duration: Duration::from_secs_f64(1.0 / fps),
            report_interval,
            report_start: now,
            frames_since_report: 0,
            fps: 0.0,
        }
    }

    #[cfg(test)]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn tick(&mut self) -> Duration {
        self.tick_at(Instant::now())
    }

    pub fn tick_at(&mut self, now: Instant) -> Duration {
        let dt = now.saturating_duration_since(self.last_tick_time);
        self.last_tick_time = now;
        if let Some(over) = dt.checked_sub(self.iteration_duration) {
            trace!("Over time budget by: {:?}", over);
        }
        self.frames_since_report += 1;
        let window = now.saturating_duration_since(self.report_start);
        if window >= self.report_interval {
            self.fps = self.frames_since_report as f64 / window.as_secs_f64();
            info!("FPS: {:0.2}", self.fps);
            self.frames_since_report = 0;
            self.report_start = now;
        }
        dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimates_steady_rate() {
        let mut estimator = FpsEstimator::new(60.0, Duration::from_secs(1));
        let start = estimator.last_tick_time;
        let frame = Duration::from_secs_f64(1.0 / 50.0);
        let mut now = start;
        for _ in 0..50 {
            now += frame;
            let dt = estimator.tick_at(now);
            assert_eq!(dt, frame);
        }
        assert!((estimator.fps() - 50.0).abs() < 0.5);
    }

    #[test]
    fn no_estimate_before_first_report() {
        let mut estimator = FpsEstimator::new(60.0, Duration::from_secs(10));
        let now = estimator.last_tick_time + Duration::from_millis(16);
        estimator.tick_at(now);
        assert_eq!(estimator.fps(), 0.0);
    }
}
