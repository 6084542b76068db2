pub mod authorization;
pub mod grading;
pub mod leaderboard;
pub mod lifecycle;
pub mod scoring;
