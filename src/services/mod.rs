// src/services/mod.rs

pub mod enricher;
pub mod feedback;
pub mod leaderboard;
pub mod report;
pub mod resolver;
pub mod statistics;
