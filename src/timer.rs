use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeedMark {
    /// mph
    pub threshold: f32,
    /// Simulated seconds since the car started moving.
    pub elapsed: f32,
}

#[derive(Debug, Clone)]
pub struct SpeedTimer {
    thresholds: Vec<f32>,
    pending: Vec<f32>,
    moving: bool,
    elapsed: f32,
}

impl Default for SpeedTimer {
    fn default() -> Self {
        SpeedTimer::new(vec![50.0, 100.0, 150.0, 200.0])
    }
}

impl SpeedTimer {
    /// `thresholds` in mph, ascending.
    pub fn new(thresholds: Vec<f32>) -> SpeedTimer {
        SpeedTimer {
            pending: thresholds.clone(),
            thresholds,
            moving: false,
            elapsed: 0.0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.moving
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// `speed` in km/h, `imperial_speed` in mph.
    pub fn update(&mut self, speed: f32, imperial_speed: f32, dt: f32) -> Vec<SpeedMark> {
        if !self.moving && speed > 0.0 {
            self.moving = true;
            self.elapsed = 0.0;
            self.pending = self.thresholds.clone();
            info!("started timer");
        } else if self.moving && speed == 0.0 {
            self.moving = false;
            info!("reset timer");
        }

        if !self.moving {
            return vec![];
        }
        self.elapsed += dt;

        let elapsed = self.elapsed;
        let mut marks = vec![];
        self.pending.retain(|threshold| {
            if imperial_speed > *threshold {
                info!(threshold, elapsed, "reached speed");
                marks.push(SpeedMark {
                    threshold: *threshold,
                    elapsed,
                });
                false
            } else {
                true
            }
        });
        marks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_each_threshold_once() {
        let mut timer = SpeedTimer::new(vec![10.0, 20.0]);
        assert!(timer.update(0.0, 0.0, 0.5).is_empty());
        assert!(!timer.is_running());

        assert!(timer.update(8.0, 5.0, 0.5).is_empty());
        let marks = timer.update(20.0, 12.0, 0.5);
        assert_eq!(marks, vec![SpeedMark { threshold: 10.0, elapsed: 1.0 }]);
        assert!(timer.update(20.0, 12.0, 0.5).is_empty());

        let marks = timer.update(40.0, 25.0, 0.5);
        assert_eq!(marks.len(), 1);
        assert_eq!(marks[0].threshold, 20.0);
    }

    #[test]
    fn full_stop_rearms_the_timer() {
        let mut timer = SpeedTimer::new(vec![10.0]);
        timer.update(30.0, 18.0, 1.0);
        timer.update(0.0, 0.0, 1.0);
        assert!(!timer.is_running());

        let marks = timer.update(30.0, 18.0, 0.25);
        assert_eq!(marks, vec![SpeedMark { threshold: 10.0, elapsed: 0.25 }]);
    }

    #[test]
    fn several_thresholds_in_one_tick() {
        let mut timer = SpeedTimer::default();
        let marks = timer.update(200.0, 120.0, 0.1);
        let reached: Vec<f32> = marks.iter().map(|m| m.threshold).collect();
        assert_eq!(reached, vec![50.0, 100.0]);
    }
}
