#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::NaiveDate;

use home_pick::api_football::{DataResult, FootballData, WindowEntry};
use home_pick::error::{DataError, DeliveryError};
use home_pick::model::{
    Fixture, HeadToHeadMeeting, InjuryEntry, LeagueRef, OddsQuote, Outcome, StandingsEntry,
    TeamFormRecord, TeamRef, TeamStatistics,
};
use home_pick::notify::Notifier;

pub const LEAGUE_ID: u64 = 40;
pub const SEASON: i32 = 2023;

pub fn fixture(id: u64, home_id: u64, away_id: u64, country: &str) -> Fixture {
    Fixture {
        id,
        home: TeamRef {
            id: home_id,
            name: format!("Home {home_id}"),
        },
        away: TeamRef {
            id: away_id,
            name: format!("Away {away_id}"),
        },
        league: LeagueRef {
            id: Some(LEAGUE_ID),
            name: "Championship".to_string(),
            country: Some(country.to_string()),
            season: Some(SEASON),
        },
        kickoff: "2024-05-04T14:00:00+00:00".to_string(),
        status: "NS".to_string(),
    }
}

pub fn quote(home: f64, draw: f64, away: f64) -> OddsQuote {
    OddsQuote {
        bookmaker: "Book".to_string(),
        market: "Match Winner".to_string(),
        home: Some(home),
        draw: Some(draw),
        away: Some(away),
    }
}

pub fn meeting(home_id: u64, away_id: u64, home_winner: Option<bool>) -> HeadToHeadMeeting {
    HeadToHeadMeeting {
        home_id,
        away_id,
        home_winner,
    }
}

/// In-memory provider that records every call it receives.
/// Missing form, odds or standings answer with `Unavailable`.
#[derive(Default)]
pub struct FakeSource {
    pub window: Option<Vec<WindowEntry>>,
    pub form: HashMap<u64, Vec<Outcome>>,
    pub stats: HashMap<u64, TeamStatistics>,
    pub odds: HashMap<u64, Vec<OddsQuote>>,
    pub standings: HashMap<u64, Vec<StandingsEntry>>,
    pub h2h: HashMap<(u64, u64), Vec<HeadToHeadMeeting>>,
    pub injuries: HashMap<u64, Vec<InjuryEntry>>,
    pub calls: RefCell<Vec<String>>,
}

impl FakeSource {
    /// Register everything `fx` needs to pass every filter with the
    /// default thresholds: 3 wins in 5, rank 8, home odds 2.40, H2H 4/6.
    pub fn add_passing(&mut self, fx: &Fixture) {
        use Outcome::{Draw, Loss, Win};

        self.form.insert(fx.home.id, vec![Win, Win, Win, Draw, Loss]);
        self.stats.insert(
            fx.home.id,
            TeamStatistics {
                goals_against_average: Some(0.8),
            },
        );
        self.standings.entry(LEAGUE_ID).or_default().push(StandingsEntry {
            team_id: fx.home.id,
            rank: 8,
            group: None,
        });
        self.odds.insert(
            fx.id,
            vec![quote(2.3, 3.3, 3.8), quote(2.5, 3.4, 3.7)],
        );
        let (h, a) = (fx.home.id, fx.away.id);
        self.h2h.insert(
            (h, a),
            vec![
                meeting(h, a, Some(true)),
                meeting(h, a, Some(true)),
                meeting(h, a, Some(true)),
                meeting(h, a, Some(true)),
                meeting(a, h, Some(true)),
                meeting(h, a, None),
            ],
        );
        self.injuries.insert(
            fx.home.id,
            vec![InjuryEntry {
                team_id: fx.home.id,
                player: "J. Otieno".to_string(),
                reason: "Knee Injury".to_string(),
            }],
        );
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn called(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|c| c.starts_with(prefix))
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

fn missing(what: &str) -> DataError {
    DataError::unavailable(format!("no {what} registered"))
}

impl FootballData for FakeSource {
    fn fixtures_between(&self, from: NaiveDate, to: NaiveDate) -> DataResult<Vec<WindowEntry>> {
        self.record(format!("fixtures {from} {to}"));
        self.window.clone().ok_or_else(|| missing("window"))
    }

    fn recent_form(&self, team_id: u64, last: usize) -> DataResult<TeamFormRecord> {
        self.record(format!("form {team_id} {last}"));
        let outcomes = self.form.get(&team_id).ok_or_else(|| missing("form"))?;
        Ok(TeamFormRecord {
            team_id,
            outcomes: outcomes.iter().take(last).copied().collect(),
        })
    }

    fn team_statistics(
        &self,
        league_id: u64,
        season: i32,
        team_id: u64,
    ) -> DataResult<TeamStatistics> {
        self.record(format!("stats {league_id} {season} {team_id}"));
        Ok(self.stats.get(&team_id).cloned().unwrap_or_default())
    }

    fn odds(&self, fixture_id: u64) -> DataResult<Vec<OddsQuote>> {
        self.record(format!("odds {fixture_id}"));
        self.odds.get(&fixture_id).cloned().ok_or_else(|| missing("odds"))
    }

    fn standings(&self, league_id: u64, season: i32) -> DataResult<Vec<StandingsEntry>> {
        self.record(format!("standings {league_id} {season}"));
        self.standings
            .get(&league_id)
            .cloned()
            .ok_or_else(|| missing("standings"))
    }

    fn head_to_head(
        &self,
        home_id: u64,
        away_id: u64,
        last: usize,
    ) -> DataResult<Vec<HeadToHeadMeeting>> {
        self.record(format!("h2h {home_id}-{away_id} {last}"));
        Ok(self
            .h2h
            .get(&(home_id, away_id))
            .cloned()
            .unwrap_or_default())
    }

    fn injuries(&self, team_id: u64) -> DataResult<Vec<InjuryEntry>> {
        self.record(format!("injuries {team_id}"));
        self.injuries
            .get(&team_id)
            .cloned()
            .ok_or_else(|| missing("injuries"))
    }
}

/// Notifier that keeps every message and can be told to fail some sends.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: RefCell<Vec<String>>,
    pub fail_on: Vec<usize>,
    attempts: RefCell<usize>,
}

impl RecordingNotifier {
    pub fn failing_on(fail_on: Vec<usize>) -> Self {
        Self {
            fail_on,
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<String> {
        self.sent.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn send(&self, text: &str) -> Result<(), DeliveryError> {
        let attempt = {
            let mut attempts = self.attempts.borrow_mut();
            *attempts += 1;
            *attempts - 1
        };
        if self.fail_on.contains(&attempt) {
            return Err(DeliveryError::Rejected {
                status: 429,
                body: "Too Many Requests".to_string(),
            });
        }
        self.sent.borrow_mut().push(text.to_string());
        Ok(())
    }
}
