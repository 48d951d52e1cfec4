//! Ordered pick filters for a single fixture.
//!
//! Each stage either returns the evidence it established or a [`Rejection`].
//! Stages run strictly in order and later evidence is only fetched once every
//! earlier stage has passed, so a rejected fixture costs as few provider calls
//! as possible.

use thiserror::Error;

use crate::api_football::FootballData;
use crate::config::FilterConfig;
use crate::error::DataError;
use crate::model::{
    Fixture, HeadToHeadMeeting, InjuryEntry, Outcome, StandingsEntry, TeamFormRecord,
    TeamStatistics,
};
use crate::odds::{ConsensusOdds, consensus};

pub const FORM_WINDOW: usize = 5;
const TREND_RECENT: usize = 3;
const SCHEDULED_STATUSES: [&str; 2] = ["NS", "TBD"];

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("league country {0} is excluded")]
    ExcludedCountry(String),

    #[error("status {0:?} is not scheduled")]
    NotScheduled(String),

    #[error("{wins} wins in last {window}, need {required}")]
    PoorForm {
        wins: usize,
        window: usize,
        required: usize,
    },

    #[error("no recent matches")]
    NoRecentMatches,

    #[error("last match was not a win")]
    LostLastMatch,

    #[error("conceding {average:.2} per match, ceiling {ceiling:.2}")]
    LeakyDefense { average: f64, ceiling: f64 },

    #[error("only {0} recent results for the trend check")]
    InsufficientHistory(usize),

    #[error("no upward trend: last-3 avg {recent:.2} vs last-5 avg {window:.2}")]
    NoUpwardTrend { recent: f64, window: f64 },

    #[error("home team not found in league standings")]
    NotInStandings,

    #[error("table position {rank} outside {min}-{max}")]
    TablePosition { rank: u32, min: u32, max: u32 },

    #[error("no 1X2 odds")]
    NoOdds,

    #[error("home side is not the market favourite (H {home:.2})")]
    NotFavorite { home: f64 },

    #[error("home odds {home:.2} below {min:.2}")]
    ShortOdds { home: f64, min: f64 },

    #[error("head-to-head home wins {wins}/{meetings} below {threshold:.2}")]
    HeadToHead {
        wins: usize,
        meetings: usize,
        threshold: f64,
    },

    #[error(transparent)]
    Data(#[from] DataError),
}

impl Rejection {
    /// Stable key used when tallying rejections per scan.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::ExcludedCountry(_) => "excluded_country",
            Rejection::NotScheduled(_) => "not_scheduled",
            Rejection::PoorForm { .. } => "poor_form",
            Rejection::NoRecentMatches => "no_recent_matches",
            Rejection::LostLastMatch => "lost_last_match",
            Rejection::LeakyDefense { .. } => "leaky_defense",
            Rejection::InsufficientHistory(_) => "insufficient_history",
            Rejection::NoUpwardTrend { .. } => "no_upward_trend",
            Rejection::NotInStandings => "not_in_standings",
            Rejection::TablePosition { .. } => "table_position",
            Rejection::NoOdds => "no_odds",
            Rejection::NotFavorite { .. } => "not_favorite",
            Rejection::ShortOdds { .. } => "short_odds",
            Rejection::HeadToHead { .. } => "head_to_head",
            Rejection::Data(DataError::Unavailable(_)) => "data_unavailable",
            Rejection::Data(DataError::Malformed(_)) => "malformed_data",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendEvidence {
    pub recent_avg: f64,
    pub window_avg: f64,
}

impl TrendEvidence {
    pub fn is_upward(&self) -> bool {
        self.recent_avg > self.window_avg
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadToHeadSummary {
    pub home_wins: usize,
    pub meetings: usize,
}

impl HeadToHeadSummary {
    pub fn ratio(&self) -> f64 {
        if self.meetings == 0 {
            0.0
        } else {
            self.home_wins as f64 / self.meetings as f64
        }
    }
}

/// A fixture that passed every filter, with the evidence that let it through.
#[derive(Debug, Clone, PartialEq)]
pub struct Pick {
    pub fixture: Fixture,
    pub recent_wins: usize,
    pub won_last_match: bool,
    pub goals_against_average: Option<f64>,
    pub trend: TrendEvidence,
    pub table_position: u32,
    pub odds: ConsensusOdds,
    pub head_to_head: HeadToHeadSummary,
    pub injuries: Vec<InjuryEntry>,
}

pub fn evaluate(
    fixture: &Fixture,
    source: &dyn FootballData,
    cfg: &FilterConfig,
) -> Result<Pick, Rejection> {
    check_scope(fixture, cfg)?;
    check_status(fixture)?;

    let form = source.recent_form(fixture.home.id, FORM_WINDOW)?;
    let recent_wins = check_form(&form, cfg)?;
    check_momentum(&form)?;

    let stats = team_statistics(fixture, source)?;
    let goals_against_average = check_defense(stats.as_ref(), cfg)?;

    let trend = check_trend(&form)?;

    let standings = league_standings(fixture, source)?;
    let table_position = check_table_position(fixture.home.id, &standings, cfg)?;

    let quotes = source.odds(fixture.id)?;
    let odds = check_market(consensus(&quotes), cfg)?;

    let meetings = source.head_to_head(fixture.home.id, fixture.away.id, cfg.h2h_sample)?;
    let head_to_head = check_head_to_head(fixture.home.id, &meetings, cfg)?;

    let injuries = injuries_for_display(fixture.home.id, source, cfg.injury_limit);

    Ok(Pick {
        fixture: fixture.clone(),
        recent_wins,
        won_last_match: true,
        goals_against_average,
        trend,
        table_position,
        odds,
        head_to_head,
        injuries,
    })
}

pub fn check_scope(fixture: &Fixture, cfg: &FilterConfig) -> Result<(), Rejection> {
    match fixture.league.country.as_deref() {
        Some(country) if cfg.is_excluded(country) => {
            Err(Rejection::ExcludedCountry(country.to_string()))
        }
        _ => Ok(()),
    }
}

pub fn check_status(fixture: &Fixture) -> Result<(), Rejection> {
    if SCHEDULED_STATUSES.contains(&fixture.status.as_str()) {
        Ok(())
    } else {
        Err(Rejection::NotScheduled(fixture.status.clone()))
    }
}

pub fn check_form(form: &TeamFormRecord, cfg: &FilterConfig) -> Result<usize, Rejection> {
    let wins = form.wins_in(FORM_WINDOW);
    if wins < cfg.min_recent_wins {
        return Err(Rejection::PoorForm {
            wins,
            window: FORM_WINDOW,
            required: cfg.min_recent_wins,
        });
    }
    Ok(wins)
}

pub fn check_momentum(form: &TeamFormRecord) -> Result<(), Rejection> {
    match form.last() {
        Some(Outcome::Win) => Ok(()),
        Some(_) => Err(Rejection::LostLastMatch),
        None => Err(Rejection::NoRecentMatches),
    }
}

/// An unknown conceding rate passes.
pub fn check_defense(
    stats: Option<&TeamStatistics>,
    cfg: &FilterConfig,
) -> Result<Option<f64>, Rejection> {
    let average = stats.and_then(|s| s.goals_against_average);
    match average {
        Some(avg) if avg > cfg.max_goals_against => Err(Rejection::LeakyDefense {
            average: avg,
            ceiling: cfg.max_goals_against,
        }),
        _ => Ok(average),
    }
}

pub fn check_trend(form: &TeamFormRecord) -> Result<TrendEvidence, Rejection> {
    let points: Vec<u32> = form
        .outcomes
        .iter()
        .take(FORM_WINDOW)
        .map(|o| o.points())
        .collect();
    if points.len() != FORM_WINDOW {
        return Err(Rejection::InsufficientHistory(points.len()));
    }
    let avg = |pts: &[u32]| pts.iter().sum::<u32>() as f64 / pts.len() as f64;
    let trend = TrendEvidence {
        recent_avg: avg(&points[..TREND_RECENT]),
        window_avg: avg(&points),
    };
    if !trend.is_upward() {
        return Err(Rejection::NoUpwardTrend {
            recent: trend.recent_avg,
            window: trend.window_avg,
        });
    }
    Ok(trend)
}

pub fn check_table_position(
    team_id: u64,
    standings: &[StandingsEntry],
    cfg: &FilterConfig,
) -> Result<u32, Rejection> {
    let rank = standings
        .iter()
        .find(|row| row.team_id == team_id)
        .map(|row| row.rank)
        .ok_or(Rejection::NotInStandings)?;
    if !(cfg.midtable_min..=cfg.midtable_max).contains(&rank) {
        return Err(Rejection::TablePosition {
            rank,
            min: cfg.midtable_min,
            max: cfg.midtable_max,
        });
    }
    Ok(rank)
}

pub fn check_market(
    odds: Option<ConsensusOdds>,
    cfg: &FilterConfig,
) -> Result<ConsensusOdds, Rejection> {
    let odds = odds.ok_or(Rejection::NoOdds)?;
    if !odds.home_favorite {
        return Err(Rejection::NotFavorite { home: odds.home });
    }
    if odds.home < cfg.min_home_odds {
        return Err(Rejection::ShortOdds {
            home: odds.home,
            min: cfg.min_home_odds,
        });
    }
    Ok(odds)
}

/// Only meetings where `home_id` hosted and won count as home wins.
pub fn check_head_to_head(
    home_id: u64,
    meetings: &[HeadToHeadMeeting],
    cfg: &FilterConfig,
) -> Result<HeadToHeadSummary, Rejection> {
    let sample = &meetings[..meetings.len().min(cfg.h2h_sample)];
    let summary = HeadToHeadSummary {
        home_wins: sample
            .iter()
            .filter(|m| m.home_id == home_id && m.home_winner == Some(true))
            .count(),
        meetings: sample.len(),
    };
    if summary.meetings > 0 && summary.ratio() < cfg.h2h_min_home_win_ratio {
        return Err(Rejection::HeadToHead {
            wins: summary.home_wins,
            meetings: summary.meetings,
            threshold: cfg.h2h_min_home_win_ratio,
        });
    }
    Ok(summary)
}

fn team_statistics(
    fixture: &Fixture,
    source: &dyn FootballData,
) -> Result<Option<TeamStatistics>, Rejection> {
    let (Some(league_id), Some(season)) = (fixture.league.id, fixture.league.season) else {
        return Ok(None);
    };
    Ok(Some(source.team_statistics(league_id, season, fixture.home.id)?))
}

fn league_standings(
    fixture: &Fixture,
    source: &dyn FootballData,
) -> Result<Vec<StandingsEntry>, Rejection> {
    let (Some(league_id), Some(season)) = (fixture.league.id, fixture.league.season) else {
        return Err(Rejection::NotInStandings);
    };
    Ok(source.standings(league_id, season)?)
}

fn injuries_for_display(team_id: u64, source: &dyn FootballData, limit: usize) -> Vec<InjuryEntry> {
    match source.injuries(team_id) {
        Ok(mut entries) => {
            entries.truncate(limit);
            entries
        }
        Err(err) => {
            tracing::debug!(team_id, error = %err, "injury lookup failed");
            Vec::new()
        }
    }
}
