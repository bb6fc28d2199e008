pub mod config;
pub mod error;
pub mod leaderboard;
pub mod routes;
pub mod session;
pub mod state;
