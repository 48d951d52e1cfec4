use std::cmp::Reverse;
use std::time::Duration;

use anyhow::Result;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ProviderConfig;
use crate::error::DataError;
use crate::http_client::{REQUEST_TIMEOUT, WINDOW_REQUEST_TIMEOUT, body_snippet, http_client};
use crate::model::{
    Fixture, HeadToHeadMeeting, InjuryEntry, LeagueRef, OddsQuote, Outcome, StandingsEntry,
    TeamFormRecord, TeamRef, TeamStatistics,
};
use crate::odds::{OddsBlock, extract_quotes};
use crate::stats::parse_utc;

pub type DataResult<T> = std::result::Result<T, DataError>;

/// One entry of the fixture window; bad entries are reported individually.
pub type WindowEntry = DataResult<Fixture>;

/// Everything the pick filters need from the football data provider.
pub trait FootballData {
    fn fixtures_between(&self, from: NaiveDate, to: NaiveDate) -> DataResult<Vec<WindowEntry>>;
    fn recent_form(&self, team_id: u64, last: usize) -> DataResult<TeamFormRecord>;
    fn team_statistics(
        &self,
        league_id: u64,
        season: i32,
        team_id: u64,
    ) -> DataResult<TeamStatistics>;
    fn odds(&self, fixture_id: u64) -> DataResult<Vec<OddsQuote>>;
    fn standings(&self, league_id: u64, season: i32) -> DataResult<Vec<StandingsEntry>>;
    fn head_to_head(
        &self,
        home_id: u64,
        away_id: u64,
        last: usize,
    ) -> DataResult<Vec<HeadToHeadMeeting>>;
    fn injuries(&self, team_id: u64) -> DataResult<Vec<InjuryEntry>>;
}

/// Blocking client for the API-Football v3 REST API.
pub struct ApiFootball {
    client: &'static Client,
    base_url: String,
    api_key: Option<String>,
    host: String,
}

impl ApiFootball {
    pub fn new(cfg: &ProviderConfig) -> Result<Self> {
        let base_url = cfg.base_url.trim_end_matches('/').to_string();
        let host = base_url
            .split("://")
            .nth(1)
            .unwrap_or(base_url.as_str())
            .split('/')
            .next()
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            client: http_client()?,
            base_url,
            api_key: cfg.api_key.clone(),
            host,
        })
    }

    fn get(&self, path: &str, query: &[(&str, String)], timeout: Duration) -> DataResult<String> {
        let url = format!("{}{}", self.base_url, path);
        let mut req = self
            .client
            .get(&url)
            .query(query)
            .timeout(timeout)
            .header(ACCEPT, "application/json");
        if let Some(key) = self.api_key.as_deref() {
            req = req
                .header("x-apisports-key", key)
                .header("x-rapidapi-key", key)
                .header("x-rapidapi-host", self.host.as_str());
        }

        let resp = req
            .send()
            .map_err(|e| DataError::unavailable(format!("{path} request failed: {e}")))?;
        let status = resp.status();
        if let Some(remaining) = resp
            .headers()
            .get("x-ratelimit-requests-remaining")
            .and_then(|v| v.to_str().ok())
        {
            tracing::debug!(path, remaining, "provider quota");
        }
        let body = resp
            .text()
            .map_err(|e| DataError::unavailable(format!("{path} body read failed: {e}")))?;
        if !status.is_success() {
            return Err(DataError::unavailable(format!(
                "{path} http {status}: {}",
                body_snippet(&body)
            )));
        }
        Ok(body)
    }
}

impl FootballData for ApiFootball {
    fn fixtures_between(&self, from: NaiveDate, to: NaiveDate) -> DataResult<Vec<WindowEntry>> {
        let body = self.get(
            "/fixtures",
            &[
                ("from", from.format("%Y-%m-%d").to_string()),
                ("to", to.format("%Y-%m-%d").to_string()),
            ],
            WINDOW_REQUEST_TIMEOUT,
        )?;
        parse_fixtures_json(&body)
    }

    fn recent_form(&self, team_id: u64, last: usize) -> DataResult<TeamFormRecord> {
        let body = self.get(
            "/fixtures",
            &[("team", team_id.to_string()), ("last", last.to_string())],
            REQUEST_TIMEOUT,
        )?;
        parse_form_json(&body, team_id, last)
    }

    fn team_statistics(
        &self,
        league_id: u64,
        season: i32,
        team_id: u64,
    ) -> DataResult<TeamStatistics> {
        let body = self.get(
            "/teams/statistics",
            &[
                ("league", league_id.to_string()),
                ("season", season.to_string()),
                ("team", team_id.to_string()),
            ],
            REQUEST_TIMEOUT,
        )?;
        parse_team_statistics_json(&body)
    }

    fn odds(&self, fixture_id: u64) -> DataResult<Vec<OddsQuote>> {
        let body = self.get("/odds", &[("fixture", fixture_id.to_string())], REQUEST_TIMEOUT)?;
        parse_odds_json(&body)
    }

    fn standings(&self, league_id: u64, season: i32) -> DataResult<Vec<StandingsEntry>> {
        let body = self.get(
            "/standings",
            &[("league", league_id.to_string()), ("season", season.to_string())],
            REQUEST_TIMEOUT,
        )?;
        parse_standings_json(&body)
    }

    fn head_to_head(
        &self,
        home_id: u64,
        away_id: u64,
        last: usize,
    ) -> DataResult<Vec<HeadToHeadMeeting>> {
        let body = self.get(
            "/fixtures/headtohead",
            &[("h2h", format!("{home_id}-{away_id}")), ("last", last.to_string())],
            REQUEST_TIMEOUT,
        )?;
        parse_head_to_head_json(&body)
    }

    fn injuries(&self, team_id: u64) -> DataResult<Vec<InjuryEntry>> {
        let body = self.get("/injuries", &[("team", team_id.to_string())], REQUEST_TIMEOUT)?;
        parse_injuries_json(&body)
    }
}

#[derive(Debug, Deserialize)]
struct RawFixture {
    fixture: RawFixtureInfo,
    #[serde(default)]
    league: RawLeague,
    teams: RawTeams,
}

#[derive(Debug, Deserialize)]
struct RawFixtureInfo {
    id: u64,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    status: RawStatus,
}

#[derive(Debug, Deserialize, Default)]
struct RawStatus {
    #[serde(default)]
    short: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawLeague {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    season: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct RawTeams {
    home: RawTeam,
    away: RawTeam,
}

#[derive(Debug, Deserialize)]
struct RawTeam {
    id: u64,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    winner: Option<bool>,
}

impl RawFixture {
    fn into_fixture(self) -> Fixture {
        Fixture {
            id: self.fixture.id,
            home: TeamRef {
                id: self.teams.home.id,
                name: self.teams.home.name.unwrap_or_default(),
            },
            away: TeamRef {
                id: self.teams.away.id,
                name: self.teams.away.name.unwrap_or_default(),
            },
            league: LeagueRef {
                id: self.league.id,
                name: self.league.name.unwrap_or_default(),
                country: self.league.country,
                season: self.league.season,
            },
            kickoff: self.fixture.date.unwrap_or_default(),
            status: self.fixture.status.short.unwrap_or_default(),
        }
    }

    fn outcome_for(&self, team_id: u64) -> Outcome {
        let side = if self.teams.home.id == team_id {
            &self.teams.home
        } else {
            &self.teams.away
        };
        Outcome::from_winner_flag(side.winner)
    }
}

#[derive(Debug, Deserialize)]
struct RawStandingsBlock {
    league: RawStandingsLeague,
}

#[derive(Debug, Deserialize)]
struct RawStandingsLeague {
    #[serde(default)]
    standings: Vec<Vec<RawStandingRow>>,
}

#[derive(Debug, Deserialize)]
struct RawStandingRow {
    rank: u32,
    team: RawTeamId,
    #[serde(default)]
    group: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTeamId {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RawInjury {
    #[serde(default)]
    player: RawInjuredPlayer,
    #[serde(default)]
    team: Option<RawTeamId>,
}

#[derive(Debug, Deserialize, Default)]
struct RawInjuredPlayer {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

/// Parse the fixture window. A single broken entry does not spoil the rest.
pub fn parse_fixtures_json(raw: &str) -> DataResult<Vec<WindowEntry>> {
    let entries = response_array(raw)?;
    Ok(entries
        .into_iter()
        .map(|v| {
            serde_json::from_value::<RawFixture>(v)
                .map(RawFixture::into_fixture)
                .map_err(|e| DataError::malformed(format!("fixture entry: {e}")))
        })
        .collect())
}

/// Outcomes of `team_id`'s last `last` matches, most recent first.
pub fn parse_form_json(raw: &str, team_id: u64, last: usize) -> DataResult<TeamFormRecord> {
    let mut matches: Vec<RawFixture> = response_items(raw, "form")?;
    matches.sort_by_key(|m| {
        Reverse(
            m.fixture
                .date
                .as_deref()
                .and_then(parse_utc)
                .map(|dt| dt.timestamp()),
        )
    });
    Ok(TeamFormRecord {
        team_id,
        outcomes: matches
            .iter()
            .take(last)
            .map(|m| m.outcome_for(team_id))
            .collect(),
    })
}

pub fn parse_team_statistics_json(raw: &str) -> DataResult<TeamStatistics> {
    let response = response_value(raw)?;
    if !response.is_object() {
        return Ok(TeamStatistics::default());
    }
    let average = response
        .get("goals")
        .and_then(|g| g.get("against"))
        .and_then(|a| a.get("average"))
        .and_then(|a| a.get("total"));
    Ok(TeamStatistics {
        goals_against_average: average.and_then(number_or_numeric_string),
    })
}

pub fn parse_odds_json(raw: &str) -> DataResult<Vec<OddsQuote>> {
    let blocks: Vec<OddsBlock> = response_items(raw, "odds")?;
    Ok(extract_quotes(&blocks))
}

/// Rows from every group table, in provider order.
pub fn parse_standings_json(raw: &str) -> DataResult<Vec<StandingsEntry>> {
    let blocks: Vec<RawStandingsBlock> = response_items(raw, "standings")?;
    Ok(blocks
        .into_iter()
        .flat_map(|b| b.league.standings)
        .flatten()
        .map(|row| StandingsEntry {
            team_id: row.team.id,
            rank: row.rank,
            group: row.group,
        })
        .collect())
}

pub fn parse_head_to_head_json(raw: &str) -> DataResult<Vec<HeadToHeadMeeting>> {
    let matches: Vec<RawFixture> = response_items(raw, "head-to-head")?;
    Ok(matches
        .into_iter()
        .map(|m| HeadToHeadMeeting {
            home_id: m.teams.home.id,
            away_id: m.teams.away.id,
            home_winner: m.teams.home.winner,
        })
        .collect())
}

pub fn parse_injuries_json(raw: &str) -> DataResult<Vec<InjuryEntry>> {
    let items: Vec<RawInjury> = response_items(raw, "injuries")?;
    Ok(items
        .into_iter()
        .filter_map(|it| {
            let player = it.player.name.filter(|n| !n.trim().is_empty())?;
            Some(InjuryEntry {
                team_id: it.team.map(|t| t.id).unwrap_or_default(),
                player,
                reason: it.player.reason.unwrap_or_default(),
            })
        })
        .collect())
}

/// The envelope's `response` field. Absent means no data; a populated
/// `errors` field means the provider refused the call.
fn response_value(raw: &str) -> DataResult<Value> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Value::Null);
    }
    let mut root: Value = serde_json::from_str(trimmed)
        .map_err(|e| DataError::malformed(format!("invalid provider json: {e}")))?;
    if let Some(errors) = root.get("errors") {
        let has_errors = match errors {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.trim().is_empty(),
            _ => false,
        };
        if has_errors {
            return Err(DataError::unavailable(format!(
                "provider errors: {}",
                body_snippet(&errors.to_string())
            )));
        }
    }
    Ok(root.get_mut("response").map(Value::take).unwrap_or(Value::Null))
}

fn response_array(raw: &str) -> DataResult<Vec<Value>> {
    match response_value(raw)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        other => Err(DataError::malformed(format!(
            "expected response array, got {}",
            body_snippet(&other.to_string())
        ))),
    }
}

fn response_items<T: DeserializeOwned>(raw: &str, what: &str) -> DataResult<Vec<T>> {
    let items = response_array(raw)?;
    serde_json::from_value(Value::Array(items))
        .map_err(|e| DataError::malformed(format!("{what} payload: {e}")))
}

fn number_or_numeric_string(v: &Value) -> Option<f64> {
    let n = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::{parse_fixtures_json, parse_team_statistics_json};
    use crate::error::DataError;

    #[test]
    fn provider_errors_are_unavailable() {
        let raw = r#"{"errors": {"token": "Error/Missing application key"}, "response": []}"#;
        assert!(matches!(parse_fixtures_json(raw), Err(DataError::Unavailable(_))));
    }

    #[test]
    fn empty_errors_list_is_fine() {
        let raw = r#"{"errors": [], "response": []}"#;
        assert!(parse_fixtures_json(raw).expect("parses").is_empty());
    }

    #[test]
    fn statistics_accept_numeric_average() {
        let raw = r#"{"response": {"goals": {"against": {"average": {"total": 0.75}}}}}"#;
        let stats = parse_team_statistics_json(raw).expect("parses");
        assert_eq!(stats.goals_against_average, Some(0.75));
    }

    #[test]
    fn statistics_empty_list_is_unknown() {
        let stats = parse_team_statistics_json(r#"{"response": []}"#).expect("parses");
        assert_eq!(stats.goals_against_average, None);
    }
}
