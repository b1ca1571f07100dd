use crate::nba::error::MetricsError;
use crate::nba::recordset::RecordSet;

const REGULATION_MINUTES: f64 = 48.0;
const LEAGUE_AVERAGE_PER: f64 = 15.0;

/// Fully-populated box-score totals for one player over one span of games.
///
/// Built through an explicit normalization step: every field the formulas
/// need exists here, and columns missing from the provider's schema read as
/// zero before any computation happens.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BoxScoreTotals {
    pub pts: f64,
    pub fgm: f64,
    pub fga: f64,
    pub ftm: f64,
    pub fta: f64,
    pub fg3m: f64,
    pub ast: f64,
    pub reb: f64,
    pub oreb: f64,
    pub dreb: f64,
    pub blk: f64,
    pub stl: f64,
    pub tov: f64,
    pub min: f64,
}

impl BoxScoreTotals {
    /// Sums every row of a record set into one totals line.
    pub fn from_record_set(rs: &RecordSet) -> BoxScoreTotals {
        let mut totals = BoxScoreTotals::default();
        for row in 0..rs.rows.len() {
            totals = totals.add(&BoxScoreTotals::from_row(rs, row));
        }
        totals
    }

    /// Normalizes one row; absent columns and non-numeric cells become zero.
    pub fn from_row(rs: &RecordSet, row: usize) -> BoxScoreTotals {
        BoxScoreTotals {
            pts: rs.cell_f64(row, "PTS"),
            fgm: rs.cell_f64(row, "FGM"),
            fga: rs.cell_f64(row, "FGA"),
            ftm: rs.cell_f64(row, "FTM"),
            fta: rs.cell_f64(row, "FTA"),
            fg3m: rs.cell_f64(row, "FG3M"),
            ast: rs.cell_f64(row, "AST"),
            reb: rs.cell_f64(row, "REB"),
            oreb: rs.cell_f64(row, "OREB"),
            dreb: rs.cell_f64(row, "DREB"),
            blk: rs.cell_f64(row, "BLK"),
            stl: rs.cell_f64(row, "STL"),
            tov: rs.cell_f64(row, "TOV"),
            min: rs.cell_f64(row, "MIN"),
        }
    }

    fn add(&self, other: &BoxScoreTotals) -> BoxScoreTotals {
        BoxScoreTotals {
            pts: self.pts + other.pts,
            fgm: self.fgm + other.fgm,
            fga: self.fga + other.fga,
            ftm: self.ftm + other.ftm,
            fta: self.fta + other.fta,
            fg3m: self.fg3m + other.fg3m,
            ast: self.ast + other.ast,
            reb: self.reb + other.reb,
            oreb: self.oreb + other.oreb,
            dreb: self.dreb + other.dreb,
            blk: self.blk + other.blk,
            stl: self.stl + other.stl,
            tov: self.tov + other.tov,
            min: self.min + other.min,
        }
    }

    /// Unadjusted PER: positive contributions minus missed shots and
    /// turnovers, per minute played. Zero minutes is an explicit error, not
    /// an infinity.
    pub fn uper(&self) -> Result<f64, MetricsError> {
        if self.min == 0.0 {
            return Err(MetricsError::ZeroMinutes);
        }
        let positive =
            self.pts + self.fgm + self.ftm + self.fg3m + self.ast + self.reb + self.blk + self.stl;
        let negative = (self.fga - self.fgm) + (self.fta - self.ftm) + self.tov;
        Ok((positive - negative) / self.min)
    }
}

/// Scales uPER by relative game tempo. Team pace is a required input; it is
/// not the same thing as league pace and defaulting it would silently make
/// the adjustment a no-op.
pub fn adjust_for_pace(uper: f64, team_pace: f64, league_pace: f64) -> f64 {
    uper * (league_pace / team_pace)
}

/// Rescales so the league average lands at 15.
pub fn normalize_per(uper: f64, league_avg_uper: f64) -> Result<f64, MetricsError> {
    if league_avg_uper == 0.0 {
        return Err(MetricsError::ZeroLeagueAverage);
    }
    Ok(uper * (LEAGUE_AVERAGE_PER / league_avg_uper))
}

/// Mean league pace for a season. Uses the provider's PACE column when
/// present, otherwise estimates possessions per 48 minutes from the box
/// score: (FGA + 0.44*FTA - OREB + TOV) / MIN * 48.
pub fn league_pace(league: &RecordSet) -> Result<f64, MetricsError> {
    if league.is_empty() {
        return Err(MetricsError::NoLeagueData);
    }
    if league.has_column("PACE") {
        let sum: f64 = (0..league.rows.len())
            .map(|row| league.cell_f64(row, "PACE"))
            .sum();
        return Ok(sum / league.rows.len() as f64);
    }
    let mut paces = Vec::with_capacity(league.rows.len());
    for row in 0..league.rows.len() {
        let t = BoxScoreTotals::from_row(league, row);
        if t.min == 0.0 {
            continue;
        }
        paces.push((t.fga + 0.44 * t.fta - t.oreb + t.tov) / t.min * REGULATION_MINUTES);
    }
    if paces.is_empty() {
        return Err(MetricsError::NoLeagueData);
    }
    Ok(paces.iter().sum::<f64>() / paces.len() as f64)
}

/// Mean league efficiency for a season. Uses the provider's PER column when
/// present, otherwise averages the per-row uPER formula, skipping zero-minute
/// rows.
pub fn league_average_uper(league: &RecordSet) -> Result<f64, MetricsError> {
    if league.is_empty() {
        return Err(MetricsError::NoLeagueData);
    }
    if league.has_column("PER") {
        let sum: f64 = (0..league.rows.len())
            .map(|row| league.cell_f64(row, "PER"))
            .sum();
        return Ok(sum / league.rows.len() as f64);
    }
    let mut upers = Vec::with_capacity(league.rows.len());
    for row in 0..league.rows.len() {
        if let Ok(u) = BoxScoreTotals::from_row(league, row).uper() {
            upers.push(u);
        }
    }
    if upers.is_empty() {
        return Err(MetricsError::NoLeagueData);
    }
    Ok(upers.iter().sum::<f64>() / upers.len() as f64)
}

/// FGM / FGA; `None` when no shots were attempted.
pub fn field_goal_pct(fgm: f64, fga: f64) -> Option<f64> {
    if fga == 0.0 {
        return None;
    }
    Some(fgm / fga)
}

/// (FGM + 0.5 * FG3M) / FGA; `None` when no shots were attempted.
pub fn effective_fg_pct(fgm: f64, fg3m: f64, fga: f64) -> Option<f64> {
    if fga == 0.0 {
        return None;
    }
    Some((fgm + 0.5 * fg3m) / fga)
}

/// PTS / (2 * (FGA + 0.44 * FTA)); `None` when the denominator is zero.
pub fn true_shooting_pct(pts: f64, fga: f64, fta: f64) -> Option<f64> {
    let denominator = 2.0 * (fga + 0.44 * fta);
    if denominator == 0.0 {
        return None;
    }
    Some(pts / denominator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn duncan_totals() -> BoxScoreTotals {
        BoxScoreTotals {
            pts: 20.0,
            fgm: 8.0,
            fga: 18.0,
            ftm: 2.0,
            fta: 4.0,
            fg3m: 2.0,
            ast: 5.0,
            reb: 10.0,
            blk: 1.0,
            stl: 2.0,
            tov: 3.0,
            min: 30.0,
            ..BoxScoreTotals::default()
        }
    }

    #[test]
    fn uper_matches_hand_computed_value() {
        // (20+8+2+2+5+10+1+2 - (18-8) - (4-2) - 3) / 30 = 35/30
        let uper = duncan_totals().uper().unwrap();
        assert!((uper - 35.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn zero_minutes_is_an_explicit_error() {
        let totals = BoxScoreTotals {
            min: 0.0,
            ..duncan_totals()
        };
        assert_eq!(totals.uper(), Err(MetricsError::ZeroMinutes));
    }

    #[test]
    fn missing_columns_normalize_to_zero() {
        let rs = RecordSet {
            name: "partial".into(),
            headers: vec!["PTS".into(), "MIN".into()],
            rows: vec![vec![json!(20), json!(30)]],
        };
        let totals = BoxScoreTotals::from_record_set(&rs);
        assert_eq!(totals.pts, 20.0);
        assert_eq!(totals.fga, 0.0);
        assert_eq!(totals.tov, 0.0);
        assert_eq!(totals.uper().unwrap(), 20.0 / 30.0);
    }

    #[test]
    fn totals_sum_over_rows() {
        let rs = RecordSet {
            name: "log".into(),
            headers: vec!["PTS".into(), "MIN".into()],
            rows: vec![
                vec![json!(10), json!(20)],
                vec![json!("12"), json!("25")],
            ],
        };
        let totals = BoxScoreTotals::from_record_set(&rs);
        assert_eq!(totals.pts, 22.0);
        assert_eq!(totals.min, 45.0);
    }

    #[test]
    fn pace_adjustment_scales_by_tempo_ratio() {
        assert_eq!(adjust_for_pace(1.0, 95.0, 100.0), 100.0 / 95.0);
        // Equal paces make it a no-op, which is why team pace must be real.
        assert_eq!(adjust_for_pace(1.5, 100.0, 100.0), 1.5);
    }

    #[test]
    fn normalization_lands_league_average_at_fifteen() {
        let avg = 35.0 / 30.0;
        assert!((normalize_per(avg, avg).unwrap() - 15.0).abs() < 1e-12);
        assert_eq!(
            normalize_per(1.0, 0.0),
            Err(MetricsError::ZeroLeagueAverage)
        );
    }

    #[test]
    fn league_pace_prefers_pace_column() {
        let rs = RecordSet {
            name: "league".into(),
            headers: vec!["PACE".into(), "MIN".into()],
            rows: vec![vec![json!(98.0), json!(100)], vec![json!(102.0), json!(100)]],
        };
        assert_eq!(league_pace(&rs).unwrap(), 100.0);
    }

    #[test]
    fn league_average_prefers_per_column() {
        // A provider-supplied PER column wins over the box-score formula,
        // which would read these rows very differently.
        let rs = RecordSet {
            name: "league".into(),
            headers: vec!["PER".into(), "PTS".into(), "MIN".into()],
            rows: vec![
                vec![json!(14.0), json!(900), json!(30)],
                vec![json!(16.0), json!(0), json!(30)],
            ],
        };
        assert_eq!(league_average_uper(&rs).unwrap(), 15.0);
    }

    #[test]
    fn league_average_falls_back_to_uper_formula() {
        let rs = RecordSet {
            name: "league".into(),
            headers: vec!["PTS".into(), "MIN".into()],
            rows: vec![
                vec![json!(30), json!(30)],
                vec![json!(15), json!(30)],
                // Zero-minute rows are skipped, not averaged in.
                vec![json!(0), json!(0)],
            ],
        };
        assert_eq!(league_average_uper(&rs).unwrap(), 0.75);
    }

    #[test]
    fn league_pace_falls_back_to_box_score_estimate() {
        let rs = RecordSet {
            name: "league".into(),
            headers: vec!["FGA".into(), "FTA".into(), "OREB".into(), "TOV".into(), "MIN".into()],
            rows: vec![vec![json!(80), json!(25), json!(10), json!(14), json!(48)]],
        };
        let expected = (80.0 + 0.44 * 25.0 - 10.0 + 14.0) / 48.0 * 48.0;
        assert!((league_pace(&rs).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn shooting_metrics_handle_zero_denominators() {
        assert_eq!(field_goal_pct(8.0, 18.0), Some(8.0 / 18.0));
        assert_eq!(field_goal_pct(0.0, 0.0), None);
        assert_eq!(effective_fg_pct(8.0, 2.0, 18.0), Some(9.0 / 18.0));
        assert_eq!(effective_fg_pct(0.0, 0.0, 0.0), None);
        let ts = true_shooting_pct(20.0, 18.0, 4.0).unwrap();
        assert!((ts - 20.0 / (2.0 * (18.0 + 0.44 * 4.0))).abs() < 1e-12);
        assert_eq!(true_shooting_pct(0.0, 0.0, 0.0), None);
    }
}
