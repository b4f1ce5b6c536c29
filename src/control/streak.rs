//! Consecutive high-temperature counter with a two-threshold hysteresis band.
//!
//! ```text
//!   T > high        streak += 1   (alarm once when it reaches the trigger)
//!   low <= T <= high  unchanged   (dead zone)
//!   T < low         streak = 0
//! ```

use log::debug;

#[derive(Debug, Clone)]
pub struct StreakTracker {
    high_c: f32,
    low_c: f32,
    trigger: u8,
    count: u8,
}

impl StreakTracker {
    pub fn new(high_c: f32, low_c: f32, trigger: u8) -> Self {
        debug_assert!(high_c > low_c, "hysteresis band must not be empty");
        Self {
            high_c,
            low_c,
            trigger,
            count: 0,
        }
    }

    /// Feed one stabilized temperature.  Returns `true` exactly once per
    /// streak: on the observation that brings the count up to the trigger.
    pub fn observe(&mut self, temperature_c: f32) -> bool {
        if temperature_c > self.high_c {
            self.count = self.count.saturating_add(1);
            debug!("streak {} at {:.1} C", self.count, temperature_c);
            self.count == self.trigger
        } else {
            if temperature_c < self.low_c && self.count != 0 {
                debug!("streak reset at {:.1} C", temperature_c);
                self.count = 0;
            }
            false
        }
    }

    pub fn count(&self) -> u8 {
        self.count
    }

    /// `true` once the count has reached the trigger.
    pub fn is_triggered(&self) -> bool {
        self.count >= self.trigger
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> StreakTracker {
        StreakTracker::new(30.0, 29.5, 3)
    }

    #[test]
    fn fires_once_on_third_high_sample() {
        let mut s = tracker();
        let fired: Vec<bool> = (0..6).map(|_| s.observe(30.5)).collect();
        assert_eq!(fired, vec![false, false, true, false, false, false]);
        assert!(s.is_triggered());
    }

    #[test]
    fn dead_zone_keeps_streak() {
        let mut s = tracker();
        s.observe(31.0);
        s.observe(31.0);
        assert!(!s.observe(29.6));
        assert_eq!(s.count(), 2);
        assert!(s.observe(31.0));
    }

    #[test]
    fn below_low_resets() {
        let mut s = tracker();
        s.observe(31.0);
        s.observe(31.0);
        s.observe(29.4);
        assert_eq!(s.count(), 0);
    }

    #[test]
    fn exactly_at_thresholds_is_dead_zone() {
        let mut s = tracker();
        s.observe(30.0);
        assert_eq!(s.count(), 0);
        s.observe(31.0);
        s.observe(29.5);
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn nan_leaves_streak_alone() {
        let mut s = tracker();
        s.observe(31.0);
        s.observe(f32::NAN);
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn reset_allows_new_alarm() {
        let mut s = tracker();
        for _ in 0..3 {
            s.observe(31.0);
        }
        s.reset();
        assert!(!s.is_triggered());
        assert!(!s.observe(31.0));
        assert!(!s.observe(31.0));
        assert!(s.observe(31.0));
    }
}
