//! Leaderboard path segments.

use std::fmt;
use std::str::FromStr;

use crate::errors::BrawlhallaError;

/// Ranked bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bracket {
    /// 1v1 ranked.
    OneVOne,
    /// 2v2 ranked.
    TwoVTwo,
    /// Rotating ranked queue.
    Rotating,
}

impl Bracket {
    /// Returns the path segment used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Bracket::OneVOne => "1v1",
            Bracket::TwoVTwo => "2v2",
            Bracket::Rotating => "rotating",
        }
    }
}

/// Leaderboard region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Region {
    /// Global leaderboard.
    #[default]
    All,
    /// US East.
    UsEast,
    /// Europe.
    Europe,
    /// Southeast Asia.
    SoutheastAsia,
    /// Brazil.
    Brazil,
    /// Australia.
    Australia,
    /// US West.
    UsWest,
    /// Japan.
    Japan,
    /// South Africa.
    SouthAfrica,
    /// Middle East.
    MiddleEast,
}

impl Region {
    /// Every region, global first.
    pub const ALL: &'static [Region] = &[
        Region::All,
        Region::UsEast,
        Region::Europe,
        Region::SoutheastAsia,
        Region::Brazil,
        Region::Australia,
        Region::UsWest,
        Region::Japan,
        Region::SouthAfrica,
        Region::MiddleEast,
    ];

    /// Returns the path segment used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Region::All => "all",
            Region::UsEast => "us-e",
            Region::Europe => "eu",
            Region::SoutheastAsia => "sea",
            Region::Brazil => "brz",
            Region::Australia => "aus",
            Region::UsWest => "us-w",
            Region::Japan => "jpn",
            Region::SouthAfrica => "sa",
            Region::MiddleEast => "me",
        }
    }
}

impl fmt::Display for Bracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Bracket {
    type Err = BrawlhallaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "1v1" => Ok(Bracket::OneVOne),
            "2v2" => Ok(Bracket::TwoVTwo),
            "rotating" => Ok(Bracket::Rotating),
            _ => Err(BrawlhallaError::configuration(format!(
                "Unknown bracket '{}'",
                s
            ))),
        }
    }
}

impl FromStr for Region {
    type Err = BrawlhallaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s_lower = s.to_ascii_lowercase();
        Region::ALL
            .iter()
            .copied()
            .find(|region| region.as_str() == s_lower)
            .ok_or_else(|| BrawlhallaError::configuration(format!("Unknown region '{}'", s)))
    }
}
