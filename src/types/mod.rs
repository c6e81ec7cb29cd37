//! Type definitions for the Brawlhalla API.
//!
//! Responses are dynamically shaped records; the only static types are the
//! legend catalog and the leaderboard path segments.

pub mod legend;
pub mod rankings;
pub mod response;
pub mod text;
