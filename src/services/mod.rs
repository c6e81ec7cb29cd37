//! Service implementations for the Brawlhalla API.
//!
//! Each service maps its operations onto provider endpoints and hands them to
//! the shared [`RequestPipeline`](crate::pipeline::RequestPipeline).

mod clans;
mod legends;
mod players;
mod rankings;

pub use clans::ClansService;
pub use legends::LegendsService;
pub use players::PlayersService;
pub use rankings::RankingsService;
