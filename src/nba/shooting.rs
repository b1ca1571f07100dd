use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::nba::metrics::{effective_fg_pct, field_goal_pct, true_shooting_pct};
use crate::nba::storage;

/// Reads a combined stats CSV, appends FG%, eFG% and TS% columns, and writes
/// the result. Rows with no attempts get empty cells rather than a division
/// by zero.
pub fn run(input: &Path, output: &Path) -> Result<usize> {
    let mut stats = storage::read_record_set(input)
        .with_context(|| format!("reading {}", input.display()))?;

    let mut fg = Vec::with_capacity(stats.rows.len());
    let mut efg = Vec::with_capacity(stats.rows.len());
    let mut ts = Vec::with_capacity(stats.rows.len());
    for row in 0..stats.rows.len() {
        let pts = stats.cell_f64(row, "PTS");
        let fgm = stats.cell_f64(row, "FGM");
        let fga = stats.cell_f64(row, "FGA");
        let fg3m = stats.cell_f64(row, "FG3M");
        let fta = stats.cell_f64(row, "FTA");
        fg.push(optional_cell(field_goal_pct(fgm, fga)));
        efg.push(optional_cell(effective_fg_pct(fgm, fg3m, fga)));
        ts.push(optional_cell(true_shooting_pct(pts, fga, fta)));
    }
    stats.push_column("FG%", fg);
    stats.push_column("eFG%", efg);
    stats.push_column("TS%", ts);

    storage::write_record_set(&stats, output)
        .with_context(|| format!("writing {}", output.display()))?;
    log::info!(
        "shooting metrics for {} rows written to {}",
        stats.rows.len(),
        output.display()
    );
    Ok(stats.rows.len())
}

fn optional_cell(value: Option<f64>) -> Value {
    match value {
        Some(v) => Value::from(v),
        None => Value::Null,
    }
}
