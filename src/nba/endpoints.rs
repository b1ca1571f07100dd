use std::time::Duration;

use serde_json::Value;

use crate::nba::error::FetchError;
use crate::nba::params::*;
use crate::nba::recordset::{cell_to_string, RecordSet};

const NBA_BASE_URL: &str = "https://stats.nba.com/stats";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// One player in the league universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub full_name: String,
}

/// The remote stats provider, behind a trait so the fetch pipeline and the
/// PER driver can run against stubs in tests.
pub trait StatsProvider {
    /// The full player universe (`commonallplayers`).
    fn list_players(&self) -> Result<Vec<Player>, FetchError>;

    /// Per-season career totals for one player (`playercareerstats`).
    fn career_stats(&self, player_id: i64) -> Result<RecordSet, FetchError>;

    /// Game-by-game log for one player and season (`playergamelog`).
    fn game_log(&self, player_id: i64, season: &Season) -> Result<RecordSet, FetchError>;

    /// League-wide per-player totals for one season (`leaguedashplayerstats`).
    fn league_stats(&self, season: &Season) -> Result<RecordSet, FetchError>;
}

/// Production provider hitting stats.nba.com over blocking HTTP.
pub struct NbaStats {
    timeout: Duration,
}

impl NbaStats {
    pub fn new() -> Self {
        NbaStats {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl Default for NbaStats {
    fn default() -> Self {
        NbaStats::new()
    }
}

impl StatsProvider for NbaStats {
    fn list_players(&self) -> Result<Vec<Player>, FetchError> {
        let endpoint_url = format!(
            "{}/commonallplayers?{}&{}&IsOnlyCurrentSeason=0",
            NBA_BASE_URL,
            LeagueID::default(),
            Season::default(),
        );
        let json = fetch_nba_json(&endpoint_url, self.timeout)?;
        let rs = RecordSet::first_from_response(&json)?;
        players_from_record_set(&rs)
    }

    fn career_stats(&self, player_id: i64) -> Result<RecordSet, FetchError> {
        let endpoint_url = format!(
            "{}/playercareerstats?{}&{}",
            NBA_BASE_URL,
            PlayerID::ID(player_id),
            PerMode::default(),
        );
        let json = fetch_nba_json(&endpoint_url, self.timeout)?;
        RecordSet::first_from_response(&json)
    }

    fn game_log(&self, player_id: i64, season: &Season) -> Result<RecordSet, FetchError> {
        let endpoint_url = format!(
            "{}/playergamelog?{}&{}&{}",
            NBA_BASE_URL,
            PlayerID::ID(player_id),
            season,
            SeasonType::default(),
        );
        let json = fetch_nba_json(&endpoint_url, self.timeout)?;
        RecordSet::first_from_response(&json)
    }

    fn league_stats(&self, season: &Season) -> Result<RecordSet, FetchError> {
        let endpoint_url = format!(
            "{}/leaguedashplayerstats?{}&{}&{}&{}",
            NBA_BASE_URL,
            season,
            LeagueID::default(),
            PerMode::default(),
            SeasonType::default(),
        );
        let json = fetch_nba_json(&endpoint_url, self.timeout)?;
        RecordSet::first_from_response(&json)
    }
}

fn players_from_record_set(rs: &RecordSet) -> Result<Vec<Player>, FetchError> {
    let id_idx = rs
        .column_index("PERSON_ID")
        .ok_or_else(|| FetchError::Malformed("PERSON_ID column missing".into()))?;
    let name_idx = rs
        .column_index("DISPLAY_FIRST_LAST")
        .ok_or_else(|| FetchError::Malformed("DISPLAY_FIRST_LAST column missing".into()))?;
    let mut players = Vec::with_capacity(rs.rows.len());
    for row in &rs.rows {
        let id = row[id_idx]
            .as_i64()
            .ok_or_else(|| FetchError::Malformed("PERSON_ID is not an integer".into()))?;
        players.push(Player {
            id,
            full_name: cell_to_string(&row[name_idx]),
        });
    }
    Ok(players)
}

fn fetch_nba_json(endpoint_url: &str, timeout: Duration) -> Result<Value, FetchError> {
    let r = ureq::get(endpoint_url)
        .timeout(timeout)
        .set("Host", "stats.nba.com")
        .set(
            "User-Agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:72.0) Gecko/20100101 Firefox/72.0",
        )
        .set("Accept", "application/json, text/plain, */*")
        .set("Accept-Language", "en-US,en;q=0.5")
        .set("Accept-Encoding", "gzip, deflate, br")
        .set("Connection", "keep-alive")
        .set("Referer", "https://stats.nba.com/")
        .set("Pragma", "no-cache")
        .set("Cache-Control", "no-cache")
        .call()?;
    r.into_json().map_err(|e| {
        if e.kind() == std::io::ErrorKind::TimedOut || e.kind() == std::io::ErrorKind::WouldBlock {
            FetchError::Timeout
        } else {
            FetchError::Malformed(e.to_string())
        }
    })
}
