use core::fmt;
use std::fmt::Display;

pub enum LeagueID {
    NBA,
}

#[derive(Debug, Clone)]
pub enum Season {
    S(String),
}

pub enum PlayerID {
    ID(i64),
}

pub enum PerMode {
    Totals,
}

pub enum SeasonType {
    RegularSeason,
}

impl Season {
    /// The raw season string, e.g. "2006-07", for file names and row values.
    pub fn value(&self) -> &str {
        match self {
            Season::S(s) => s,
        }
    }
}

impl Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Season::S(season) => write!(f, "Season={}", season),
        }
    }
}

impl Display for LeagueID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LeagueID::NBA => write!(f, "LeagueID=00"),
        }
    }
}

impl Display for PlayerID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PlayerID::ID(id) => write!(f, "PlayerID={}", id),
        }
    }
}

impl Display for PerMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PerMode::Totals => write!(f, "PerMode=Totals"),
        }
    }
}

impl Display for SeasonType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SeasonType::RegularSeason => write!(f, "SeasonType=Regular%20Season"),
        }
    }
}

impl Default for LeagueID {
    fn default() -> Self {
        LeagueID::NBA
    }
}

impl Default for Season {
    fn default() -> Self {
        let current_date = chrono::Utc::now();
        let next_date = current_date - chrono::Duration::days(365);
        let first_year = next_date.format("%Y").to_string();
        let second_year = current_date.format("%y").to_string();
        Season::S(format!("{}-{}", first_year, second_year))
    }
}

impl Default for PerMode {
    fn default() -> Self {
        PerMode::Totals
    }
}

impl Default for SeasonType {
    fn default() -> Self {
        SeasonType::RegularSeason
    }
}
