//! Brawlhalla API Client Library
//!
//! An async Rust client for the Brawlhalla statistics API. Every request goes
//! through a client-side admission controller that enforces the provider's
//! two quotas (a per-second burst and a per-15-minute sustained allowance),
//! so callers sharing one client cannot overrun the key.
//!
//! # Features
//!
//! - **Players**: Steam ID search, general stats, ranked stats
//! - **Rankings**: Leaderboard pages by bracket and region, with name filter
//! - **Clans and Legends**: Clan rosters, per-legend data, the legend catalog
//! - **Admission Control**: Dual-window token buckets shared across tasks
//! - **Error Policy**: Swallow or surface 429s and upstream failures, with
//!   optional fixed-delay retries
//! - **Observability**: `tracing` spans, structured logging, request metrics
//!
//! Responses keep the provider's dynamic shape: a successful call yields a
//! [`NormalizedResponse`], which is either one [`Record`] or a list of them.
//! `Ok(None)` means the configured policy swallowed a failure.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use brawlhalla_client::{Bracket, BrawlhallaClient, Region};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BrawlhallaClient::builder()
//!         .api_key("your_api_key")
//!         .retry_on_rate_limit(true)
//!         .build()?;
//!
//!     if let Some(page) = client
//!         .rankings()
//!         .page(Bracket::OneVOne, Region::Europe, 1, None)
//!         .await?
//!     {
//!         for entry in page.records() {
//!             println!("{:?} {:?}", entry.get_str("name"), entry.get_i64("rating"));
//!         }
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod resilience;
pub mod services;
pub mod transport;
pub mod types;

// Re-exports for convenience
pub use client::{BrawlhallaClient, BrawlhallaClientBuilder};
pub use config::BrawlhallaConfig;
pub use errors::{BrawlhallaError, BrawlhallaResult};
pub use resilience::RateSnapshot;

// Type re-exports
pub use types::legend::{Legend, LegendRef};
pub use types::rankings::{Bracket, Region};
pub use types::response::{FieldValue, NormalizedResponse, Record};

/// Mock implementations for testing.
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
