// src/models/mod.rs

pub mod leaderboard;
