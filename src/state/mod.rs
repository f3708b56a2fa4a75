//! State module for pipeline records and spider coordination
//!
//! # Components
//!
//! - `FarmStats`: The per-farm record of villager friendship scores
//! - `Villager`: The fixed set of villagers a record tracks
//! - `SpiderRunState`: Running-walk count and the shared stop flag

mod farm_stats;
mod spider_state;

// Re-export main types
pub use farm_stats::{FarmStats, Villager, MAX_SCORE};
pub use spider_state::{SpiderRunState, SpiderStatus, WalkGuard};
