mod nba;

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use tabled::Table;

use nba::endpoints::{NbaStats, StatsProvider};
use nba::error::FetchError;
use nba::grab::{self, GrabConfig};
use nba::params::Season;
use nba::per::{self, PerOptions, SeasonPer};
use nba::shooting;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct HoopGrabCli {
    #[clap(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch career stats for every player into one combined CSV,
    /// checkpointing progress so an interrupted run can resume.
    Graball {
        #[clap(long, default_value_t = 100)]
        batch_size: usize,

        #[clap(long, default_value = "progress.csv")]
        progress_file: PathBuf,

        #[clap(short, long, default_value = "combined_stats.csv")]
        output: PathBuf,
    },
    /// Compute PER for one or more players, over one season or their whole
    /// career.
    Per {
        #[clap(required = true)]
        player_names: Vec<String>,

        #[clap(short, long)]
        season: Option<String>,

        /// Possessions per 48 minutes for the player's team. There is no
        /// endpoint for this here, so it must be supplied.
        #[clap(short, long)]
        team_pace: f64,

        #[clap(short, long, default_value = "game_logs")]
        game_log_dir: PathBuf,

        /// Summary CSV path; defaults to <names>_per.csv.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Derive FG%, eFG% and TS% for every row of a combined stats CSV.
    Shooting {
        #[clap(short, long, default_value = "combined_stats.csv")]
        input: PathBuf,

        #[clap(short, long, default_value = "shooting_metrics.csv")]
        output: PathBuf,
    },
    /// Find a player's id by (partial) display name.
    Lookup { player_name: String },
}

fn main() -> Result<()> {
    pretty_env_logger::init();
    let args = HoopGrabCli::parse();
    match args.cmd {
        Commands::Graball {
            batch_size,
            progress_file,
            output,
        } => {
            ensure!(batch_size > 0, "batch size must be positive");
            let cfg = GrabConfig {
                batch_size,
                progress_path: progress_file,
                output_path: output,
                ..GrabConfig::default()
            };
            let provider = NbaStats::new();
            let summary = grab::run(&provider, &cfg)?;
            println!(
                "fetched {} players ({} resumed, {} failed)",
                summary.fetched, summary.resumed, summary.failed
            );
            if summary.failed > 0 {
                println!("re-run to pick up the failed players");
            }
        }
        Commands::Per {
            player_names,
            season,
            team_pace,
            game_log_dir,
            output,
        } => {
            ensure!(team_pace > 0.0, "team pace must be positive");
            let provider = NbaStats::new();
            let mut opts = PerOptions::new(team_pace);
            opts.game_log_dir = game_log_dir;

            let mut results: Vec<SeasonPer> = Vec::new();
            for name in &player_names {
                let player = match per::find_player(&provider, name) {
                    Ok(p) => p,
                    Err(FetchError::PlayerNotFound(_)) => {
                        log::error!("player {} not found", name);
                        continue;
                    }
                    Err(e) => return Err(e).context("looking up player"),
                };
                match &season {
                    Some(s) => {
                        let season = Season::S(s.clone());
                        if let Some(per) =
                            per::calculate_per(&provider, &player, &season, &opts)?
                        {
                            results.push(SeasonPer {
                                player: player.full_name.clone(),
                                season: s.clone(),
                                per,
                            });
                        }
                    }
                    None => {
                        results.extend(per::calculate_per_all_seasons(
                            &provider, &player, &opts,
                        )?);
                    }
                }
            }

            if results.is_empty() {
                println!("no PER results");
                return Ok(());
            }
            let output = output.unwrap_or_else(|| per_output_path(&player_names));
            write_per_csv(&results, &output)?;
            let table = Table::new(results.iter().cloned()).to_string();
            println!("{}", table);
            println!("saved to {}", output.display());
        }
        Commands::Shooting { input, output } => {
            let rows = shooting::run(&input, &output)?;
            println!("shooting metrics for {} rows saved to {}", rows, output.display());
        }
        Commands::Lookup { player_name } => {
            let provider = NbaStats::new();
            let players = provider.list_players()?;
            let needle = player_name.to_lowercase();
            let mut found = false;
            for p in players {
                if p.full_name.to_lowercase().contains(&needle) {
                    println!("{}: {}", p.id, p.full_name);
                    found = true;
                }
            }
            if !found {
                println!("no players matching {}", player_name);
            }
        }
    }
    Ok(())
}

/// Default summary file name, e.g. "tim_duncan_anthony_davis_per.csv".
fn per_output_path(player_names: &[String]) -> PathBuf {
    let subjects = player_names
        .iter()
        .map(|n| n.to_lowercase().replace(' ', "_"))
        .collect::<Vec<String>>()
        .join("_");
    PathBuf::from(format!("{}_per.csv", subjects))
}

fn write_per_csv(results: &[SeasonPer], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in results {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
