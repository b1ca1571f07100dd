use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::nba::endpoints::StatsProvider;
use crate::nba::recordset::RecordSet;
use crate::nba::storage;

/// Knobs for one bulk-grab run. Defaults mirror production use against the
/// stats service; tests shrink the delays to zero and point the paths at a
/// temp dir.
#[derive(Debug, Clone)]
pub struct GrabConfig {
    /// Checkpoint after this many newly fetched players.
    pub batch_size: usize,
    /// Unconditional pause after every successful fetch, to stay under the
    /// provider's rate limits.
    pub fetch_delay: Duration,
    /// Longer pause after a failed fetch before moving on.
    pub failure_cooldown: Duration,
    pub progress_path: PathBuf,
    pub output_path: PathBuf,
}

impl Default for GrabConfig {
    fn default() -> Self {
        GrabConfig {
            batch_size: 100,
            fetch_delay: Duration::from_millis(500),
            failure_cooldown: Duration::from_secs(5),
            progress_path: PathBuf::from("progress.csv"),
            output_path: PathBuf::from("combined_stats.csv"),
        }
    }
}

/// What one run accomplished.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct GrabSummary {
    /// Players fetched by this run.
    pub fetched: usize,
    /// Players carried over from a prior run's checkpoint.
    pub resumed: usize,
    /// Players that errored and were skipped; a later run picks them up.
    pub failed: usize,
}

/// Fetches career stats for every player in the league and writes them to
/// one combined CSV.
///
/// Progress checkpoints to `progress_path` every `batch_size` successes, so
/// an interrupted run resumes where it left off instead of refetching. Only
/// successes are checkpointed; a player whose fetch fails is skipped for
/// this run and retried naturally by the next one. The checkpoint is deleted
/// once the combined file is written.
pub fn run(provider: &impl StatsProvider, cfg: &GrabConfig) -> Result<GrabSummary> {
    let players = provider.list_players().context("listing players")?;

    let mut combined = RecordSet::empty();
    combined.name = "combined_stats".to_string();
    let mut processed: HashSet<String> = HashSet::new();

    if cfg.progress_path.exists() {
        let checkpoint = storage::read_record_set(&cfg.progress_path)
            .with_context(|| format!("loading checkpoint {}", cfg.progress_path.display()))?;
        for id in checkpoint.distinct_strings("PLAYER_ID") {
            processed.insert(id);
        }
        log::info!(
            "resuming from checkpoint: {} players already fetched",
            processed.len()
        );
        combined.append(checkpoint);
    }

    let mut summary = GrabSummary {
        resumed: processed.len(),
        ..GrabSummary::default()
    };

    for player in &players {
        if processed.contains(&player.id.to_string()) {
            continue;
        }
        match provider.career_stats(player.id) {
            Ok(mut record_set) => {
                record_set.tag_player(player.id, &player.full_name);
                combined.append(record_set);
                // A record set with no rows leaves no PLAYER_ID behind, so a
                // resumed run fetches that player again. It gets zero rows
                // again, so the combined file is unaffected.
                processed.insert(player.id.to_string());
                summary.fetched += 1;

                let total = summary.fetched + summary.resumed;
                log::info!(
                    "retrieved stats for {} ({} of {}, {}%)",
                    player.full_name,
                    total,
                    players.len(),
                    total * 100 / players.len().max(1)
                );

                if summary.fetched % cfg.batch_size == 0 {
                    storage::write_record_set(&combined, &cfg.progress_path)
                        .context("saving checkpoint")?;
                    log::info!("progress saved ({} rows)", combined.rows.len());
                }
                thread::sleep(cfg.fetch_delay);
            }
            Err(e) => {
                log::warn!("could not retrieve stats for {}: {}", player.full_name, e);
                summary.failed += 1;
                thread::sleep(cfg.failure_cooldown);
            }
        }
    }

    storage::write_record_set(&combined, &cfg.output_path)
        .with_context(|| format!("writing {}", cfg.output_path.display()))?;
    if cfg.progress_path.exists() {
        fs::remove_file(&cfg.progress_path)
            .with_context(|| format!("removing {}", cfg.progress_path.display()))?;
    }
    log::info!(
        "combined stats written to {} ({} rows)",
        cfg.output_path.display(),
        combined.rows.len()
    );
    Ok(summary)
}
