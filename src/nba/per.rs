use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;
use tabled::Tabled;

use crate::nba::endpoints::{Player, StatsProvider};
use crate::nba::error::FetchError;
use crate::nba::metrics::{self, BoxScoreTotals};
use crate::nba::params::Season;
use crate::nba::retry::{fetch_with_retry, RetryPolicy};
use crate::nba::storage;

/// Inputs for a PER computation that are not fetched: the subject team's
/// pace has no endpoint here and must come from the caller.
#[derive(Debug, Clone)]
pub struct PerOptions {
    pub team_pace: f64,
    pub retry: RetryPolicy,
    /// Where per-season game log CSVs land.
    pub game_log_dir: PathBuf,
}

impl PerOptions {
    pub fn new(team_pace: f64) -> Self {
        PerOptions {
            team_pace,
            retry: RetryPolicy::default(),
            game_log_dir: PathBuf::from("game_logs"),
        }
    }
}

/// One computed PER line, printable and CSV-serializable.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SeasonPer {
    pub player: String,
    pub season: String,
    pub per: f64,
}

/// Resolves a display name against the player universe.
pub fn find_player(provider: &impl StatsProvider, name: &str) -> Result<Player, FetchError> {
    let players = provider.list_players()?;
    players
        .into_iter()
        .find(|p| p.full_name.eq_ignore_ascii_case(name))
        .ok_or_else(|| FetchError::PlayerNotFound(name.to_string()))
}

/// Computes a player's PER for one season.
///
/// Returns `Ok(None)` when the season has no usable data: an empty game log
/// (including the retry wrapper's exhaustion sentinel), zero minutes played,
/// or empty league stats. Writes the fetched game log to
/// `<game_log_dir>/<name>_game_logs_<season>.csv` as a side artifact.
pub fn calculate_per(
    provider: &impl StatsProvider,
    player: &Player,
    season: &Season,
    opts: &PerOptions,
) -> Result<Option<f64>> {
    let game_log = fetch_with_retry(&opts.retry, "game log", || {
        provider.game_log(player.id, season)
    })?;
    log::debug!(
        "{}: {} game log rows for {}",
        game_log.name,
        game_log.rows.len(),
        player.full_name
    );
    if game_log.is_empty() {
        log::warn!(
            "no game logs found for {} in season {}",
            player.full_name,
            season.value()
        );
        return Ok(None);
    }

    let totals = BoxScoreTotals::from_record_set(&game_log);
    let uper = match totals.uper() {
        Ok(u) => u,
        Err(e) => {
            log::warn!(
                "skipping {} season {}: {}",
                player.full_name,
                season.value(),
                e
            );
            return Ok(None);
        }
    };
    log::info!("unadjusted PER for {}: {}", player.full_name, uper);

    let league = fetch_with_retry(&opts.retry, "league stats", || {
        provider.league_stats(season)
    })?;
    if league.is_empty() {
        log::warn!("no league stats found for season {}", season.value());
        return Ok(None);
    }
    let league_pace = metrics::league_pace(&league)?;
    let league_avg_uper = metrics::league_average_uper(&league)?;
    log::info!(
        "league pace: {}, league average uPER: {}",
        league_pace,
        league_avg_uper
    );

    let pace_adjusted = metrics::adjust_for_pace(uper, opts.team_pace, league_pace);
    let per = metrics::normalize_per(pace_adjusted, league_avg_uper)?;

    fs::create_dir_all(&opts.game_log_dir)
        .with_context(|| format!("creating {}", opts.game_log_dir.display()))?;
    let log_path = opts.game_log_dir.join(format!(
        "{}_game_logs_{}.csv",
        player.full_name,
        season.value()
    ));
    storage::write_record_set(&game_log, &log_path)?;

    Ok(Some(per))
}

/// Computes PER for every season of a player's career, skipping seasons
/// without usable data.
pub fn calculate_per_all_seasons(
    provider: &impl StatsProvider,
    player: &Player,
    opts: &PerOptions,
) -> Result<Vec<SeasonPer>> {
    let career = provider
        .career_stats(player.id)
        .with_context(|| format!("fetching career stats for {}", player.full_name))?;
    let seasons = career.distinct_strings("SEASON_ID");
    if seasons.is_empty() {
        log::warn!("no seasons found for {}", player.full_name);
    }

    let mut results = Vec::new();
    for season_id in seasons {
        let season = Season::S(season_id.clone());
        if let Some(per) = calculate_per(provider, player, &season, opts)? {
            log::info!("{} {} PER: {}", player.full_name, season_id, per);
            results.push(SeasonPer {
                player: player.full_name.clone(),
                season: season_id,
                per,
            });
        }
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nba::recordset::RecordSet;
    use serde_json::json;
    use std::collections::HashMap;

    struct StubProvider {
        players: Vec<Player>,
        game_logs: HashMap<String, RecordSet>,
        league: RecordSet,
        career: RecordSet,
    }

    impl StatsProvider for StubProvider {
        fn list_players(&self) -> Result<Vec<Player>, FetchError> {
            Ok(self.players.clone())
        }

        fn career_stats(&self, _player_id: i64) -> Result<RecordSet, FetchError> {
            Ok(self.career.clone())
        }

        fn game_log(&self, _player_id: i64, season: &Season) -> Result<RecordSet, FetchError> {
            Ok(self
                .game_logs
                .get(season.value())
                .cloned()
                .unwrap_or_else(RecordSet::empty))
        }

        fn league_stats(&self, _season: &Season) -> Result<RecordSet, FetchError> {
            Ok(self.league.clone())
        }
    }

    fn stat_headers() -> Vec<String> {
        ["PTS", "FGM", "FGA", "FTM", "FTA", "FG3M", "AST", "REB", "BLK", "STL", "TOV", "MIN"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    // The fixed box score whose uPER is 35/30.
    fn duncan_row() -> Vec<serde_json::Value> {
        vec![
            json!(20),
            json!(8),
            json!(18),
            json!(2),
            json!(4),
            json!(2),
            json!(5),
            json!(10),
            json!(1),
            json!(2),
            json!(3),
            json!(30),
        ]
    }

    fn provider_for(season: &str) -> StubProvider {
        let game_log = RecordSet {
            name: "PlayerGameLog".into(),
            headers: stat_headers(),
            rows: vec![duncan_row()],
        };
        // One league row with the same line plus PACE=100: the league
        // average uPER equals the player's, so normalized PER is exactly 15.
        let mut league_headers = stat_headers();
        league_headers.push("PACE".into());
        let mut league_row = duncan_row();
        league_row.push(json!(100.0));
        let league = RecordSet {
            name: "LeagueDashPlayerStats".into(),
            headers: league_headers,
            rows: vec![league_row],
        };
        let career = RecordSet {
            name: "SeasonTotalsRegularSeason".into(),
            headers: vec!["SEASON_ID".into(), "PTS".into()],
            rows: vec![vec![json!(season), json!(20)]],
        };
        let mut game_logs = HashMap::new();
        game_logs.insert(season.to_string(), game_log);
        StubProvider {
            players: vec![Player {
                id: 1495,
                full_name: "Tim Duncan".into(),
            }],
            game_logs,
            league,
            career,
        }
    }

    fn test_opts(dir: &std::path::Path) -> PerOptions {
        PerOptions {
            team_pace: 100.0,
            retry: RetryPolicy::immediate(3),
            game_log_dir: dir.join("game_logs"),
        }
    }

    #[test]
    fn unknown_player_is_a_lookup_failure() {
        let provider = provider_for("2006-07");
        let err = find_player(&provider, "Nonexistent Player").unwrap_err();
        assert!(matches!(err, FetchError::PlayerNotFound(_)));
    }

    #[test]
    fn per_is_fifteen_when_player_matches_league_average() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for("2006-07");
        let player = find_player(&provider, "Tim Duncan").unwrap();
        let per = calculate_per(&provider, &player, &Season::S("2006-07".into()), &test_opts(dir.path()))
            .unwrap()
            .unwrap();
        assert!((per - 15.0).abs() < 1e-9);
        assert!(dir
            .path()
            .join("game_logs/Tim Duncan_game_logs_2006-07.csv")
            .exists());
    }

    #[test]
    fn empty_game_log_yields_none_without_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider_for("2006-07");
        let player = provider.players[0].clone();
        let opts = test_opts(dir.path());
        let per =
            calculate_per(&provider, &player, &Season::S("1984-85".into()), &opts).unwrap();
        assert!(per.is_none());
        assert!(!opts.game_log_dir.exists());
    }

    #[test]
    fn all_seasons_collects_usable_seasons_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut provider = provider_for("2006-07");
        // Career lists a second season the game-log stub has no data for.
        provider.career.rows.push(vec![json!("2007-08"), json!(15)]);
        let player = provider.players[0].clone();
        let results =
            calculate_per_all_seasons(&provider, &player, &test_opts(dir.path())).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].season, "2006-07");
        assert_eq!(results[0].player, "Tim Duncan");
    }
}
