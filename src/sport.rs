//! Sport classification from free-text category labels.
//!
//! Picks carry whatever category label the poster typed ("NBA props",
//! "NCAAF Saturday", "tennis - ATP"). Rollups need a stable sport, so we
//! match the label against a keyword table. First matching entry wins.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sport derived from a category label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sport {
    Nba,
    Nfl,
    Mlb,
    Nhl,
    CollegeFootball,
    CollegeBasketball,
    Soccer,
    Tennis,
    Mma,
    Golf,
    Esports,
    Other,
}

struct SportKeyword {
    keywords: &'static [&'static str],
    sport: Sport,
}

// College entries come before the pro leagues so "college football" is not
// swallowed by the NFL "football" keyword.
const SPORT_KEYWORDS: &[SportKeyword] = &[
    SportKeyword { keywords: &["ncaaf", "college football", "cfb"], sport: Sport::CollegeFootball },
    SportKeyword { keywords: &["ncaab", "college basketball", "cbb", "march madness"], sport: Sport::CollegeBasketball },
    SportKeyword { keywords: &["nba", "basketball", "wnba"], sport: Sport::Nba },
    SportKeyword { keywords: &["nfl", "super bowl", "football"], sport: Sport::Nfl },
    SportKeyword { keywords: &["mlb", "baseball", "world series"], sport: Sport::Mlb },
    SportKeyword { keywords: &["nhl", "hockey", "stanley cup"], sport: Sport::Nhl },
    SportKeyword { keywords: &["soccer", "premier league", "epl", "mls", "champions league", "la liga"], sport: Sport::Soccer },
    SportKeyword { keywords: &["tennis", "atp", "wta", "wimbledon"], sport: Sport::Tennis },
    SportKeyword { keywords: &["ufc", "mma"], sport: Sport::Mma },
    SportKeyword { keywords: &["golf", "pga"], sport: Sport::Golf },
    SportKeyword { keywords: &["esports", "league of legends", "csgo", "cs2", "valorant", "dota"], sport: Sport::Esports },
];

impl Sport {
    /// Classify a category label. Unmatched labels map to `Sport::Other`.
    pub fn from_label(label: &str) -> Self {
        let l = label.to_lowercase();
        SPORT_KEYWORDS
            .iter()
            .find(|sk| sk.keywords.iter().any(|kw| l.contains(kw)))
            .map(|sk| sk.sport)
            .unwrap_or(Sport::Other)
    }

    /// Sport whose display name is `name`, ignoring case ("nba", "College
    /// Football"). `Other` is never returned.
    pub fn from_name(name: &str) -> Option<Self> {
        SPORT_KEYWORDS
            .iter()
            .map(|sk| sk.sport)
            .find(|sport| sport.to_string().eq_ignore_ascii_case(name.trim()))
    }

    /// Label keywords that classify as this sport. Empty for `Other`.
    pub fn keywords(&self) -> &'static [&'static str] {
        SPORT_KEYWORDS
            .iter()
            .find(|sk| sk.sport == *self)
            .map(|sk| sk.keywords)
            .unwrap_or(&[])
    }
}

impl fmt::Display for Sport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Sport::Nba => "NBA",
            Sport::Nfl => "NFL",
            Sport::Mlb => "MLB",
            Sport::Nhl => "NHL",
            Sport::CollegeFootball => "College Football",
            Sport::CollegeBasketball => "College Basketball",
            Sport::Soccer => "Soccer",
            Sport::Tennis => "Tennis",
            Sport::Mma => "MMA",
            Sport::Golf => "Golf",
            Sport::Esports => "Esports",
            Sport::Other => "Other",
        };
        write!(f, "{label}")
    }
}
