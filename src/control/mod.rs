//! Comfort evaluation: PMV table lookup and the high-temperature streak
//! tracker that gates the alarm.

pub mod pmv;
pub mod streak;

pub use pmv::compute_pmv;
pub use streak::StreakTracker;
