use std::collections::HashSet;

use serde::Deserialize;
use tracing::{info, warn};

use crate::config::{Config, FUN_RATING_RANGE, POSSESSION_SUM_TOLERANCE};
use crate::error::{AppError, Result};
use crate::types::{MatchDetail, MatchSummary, StatPair};

/// Demo dataset bundled into the binary.
const SEED_JSON: &str = include_str!("../data/matches.json");

/// Raw document shape: list summaries and detail records are kept apart, the
/// one-line summary shown in the list is not always the detail's.
#[derive(Debug, Clone, Deserialize)]
pub struct Dataset {
    pub summaries: Vec<MatchSummary>,
    pub details: Vec<MatchDetail>,
}

/// Values that passed validation but sit outside their conventional range.
#[derive(Debug, Default)]
pub struct LoadStats {
    pub summaries: usize,
    pub details: usize,
    pub fun_rating_out_of_range: usize,
    pub possession_off_100: usize,
}

impl Dataset {
    /// Decode and validate a dataset document.
    pub fn from_json(raw: &str) -> Result<(Self, LoadStats)> {
        let dataset: Dataset = serde_json::from_str(raw)?;
        let stats = dataset.validate()?;
        Ok((dataset, stats))
    }

    pub fn seed() -> Result<(Self, LoadStats)> {
        Self::from_json(SEED_JSON)
    }

    /// Embedded seed, or the file at `MATCH_DATA_PATH` when configured.
    pub fn load(cfg: &Config) -> Result<(Self, LoadStats)> {
        match &cfg.match_data_path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                info!("Loading match data from {path}");
                Self::from_json(&raw)
            }
            None => Self::seed(),
        }
    }

    fn validate(&self) -> Result<LoadStats> {
        let mut stats = LoadStats {
            summaries: self.summaries.len(),
            details: self.details.len(),
            ..LoadStats::default()
        };

        check_summaries(&self.summaries, &mut stats)?;

        let mut seen = HashSet::new();
        for d in &self.details {
            if !seen.insert(d.id()) {
                return Err(AppError::Malformed(format!("duplicate detail id {:?}", d.id())));
            }
            check_detail(d, &mut stats)?;
        }

        Ok(stats)
    }
}

/// Validate a list payload returned by a backend.
pub fn validate_summaries(summaries: &[MatchSummary]) -> Result<()> {
    check_summaries(summaries, &mut LoadStats::default())
}

/// Validate a single detail record, e.g. one returned by a backend.
pub fn validate_detail(detail: &MatchDetail) -> Result<()> {
    check_detail(detail, &mut LoadStats::default())
}

fn check_summaries(summaries: &[MatchSummary], stats: &mut LoadStats) -> Result<()> {
    let mut seen = HashSet::new();
    for s in summaries {
        if !seen.insert(s.id.as_str()) {
            return Err(AppError::Malformed(format!("duplicate summary id {:?}", s.id)));
        }
        check_summary(s, stats)?;
    }
    Ok(())
}

fn check_summary(s: &MatchSummary, stats: &mut LoadStats) -> Result<()> {
    if s.id.is_empty() {
        return Err(AppError::Malformed("match with empty id".to_string()));
    }
    if s.home_team.trim().is_empty() || s.away_team.trim().is_empty() {
        return Err(AppError::Malformed(format!("match {:?} has an empty team name", s.id)));
    }
    if !s.fun_rating.is_finite() {
        return Err(AppError::Malformed(format!("match {:?} fun rating is not finite", s.id)));
    }
    let (lo, hi) = FUN_RATING_RANGE;
    if s.fun_rating < lo || s.fun_rating > hi {
        warn!(
            match_id = %s.id,
            fun_rating = s.fun_rating,
            "Fun rating outside {lo}–{hi}, passing through"
        );
        stats.fun_rating_out_of_range += 1;
    }
    Ok(())
}

fn check_detail(d: &MatchDetail, stats: &mut LoadStats) -> Result<()> {
    check_summary(&d.summary, stats)?;

    for (label, pair) in d.stats.rows() {
        check_pair(d.id(), label, pair)?;
    }
    let possession_total = d.stats.possession.home + d.stats.possession.away;
    if (possession_total - 100.0).abs() > POSSESSION_SUM_TOLERANCE {
        warn!(
            match_id = %d.id(),
            possession_total,
            "Possession does not sum to 100, passing through"
        );
        stats.possession_off_100 += 1;
    }

    if d.ace_player.name.trim().is_empty() {
        return Err(AppError::Malformed(format!("match {:?} ace player has no name", d.id())));
    }
    if !d.ace_player.rating.is_finite() {
        return Err(AppError::Malformed(format!(
            "match {:?} ace player rating is not finite",
            d.id()
        )));
    }
    Ok(())
}

fn check_pair(id: &str, label: &str, pair: StatPair) -> Result<()> {
    let ok = |v: f64| v.is_finite() && v >= 0.0;
    if ok(pair.home) && ok(pair.away) {
        Ok(())
    } else {
        Err(AppError::Malformed(format!(
            "match {id:?} stat {label} must be non-negative, got {}/{}",
            pair.home, pair.away
        )))
    }
}
