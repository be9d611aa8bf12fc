mod dashboard;

pub use dashboard::{study_streak, DashboardCounts, WeakSession};
