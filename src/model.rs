#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamRef {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeagueRef {
    pub id: Option<u64>,
    pub name: String,
    pub country: Option<String>,
    pub season: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub id: u64,
    pub home: TeamRef,
    pub away: TeamRef,
    pub league: LeagueRef,
    /// Raw provider timestamp, UTC.
    pub kickoff: String,
    /// Short status code: NS, TBD, 1H, FT, ...
    pub status: String,
}

impl Fixture {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home.name, self.away.name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Provider `winner` flag for the team's side; null means a draw.
    pub fn from_winner_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Outcome::Win,
            Some(false) => Outcome::Loss,
            None => Outcome::Draw,
        }
    }

    pub fn points(self) -> u32 {
        match self {
            Outcome::Win => 3,
            Outcome::Draw => 1,
            Outcome::Loss => 0,
        }
    }
}

/// Recent results for one team, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamFormRecord {
    pub team_id: u64,
    pub outcomes: Vec<Outcome>,
}

impl TeamFormRecord {
    pub fn wins_in(&self, window: usize) -> usize {
        self.outcomes
            .iter()
            .take(window)
            .filter(|o| **o == Outcome::Win)
            .count()
    }

    pub fn last(&self) -> Option<Outcome> {
        self.outcomes.first().copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamStatistics {
    pub goals_against_average: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsEntry {
    pub team_id: u64,
    pub rank: u32,
    pub group: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OddsQuote {
    pub bookmaker: String,
    pub market: String,
    pub home: Option<f64>,
    pub draw: Option<f64>,
    pub away: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadToHeadMeeting {
    pub home_id: u64,
    pub away_id: u64,
    pub home_winner: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjuryEntry {
    pub team_id: u64,
    pub player: String,
    pub reason: String,
}

impl InjuryEntry {
    pub fn display(&self) -> String {
        if self.reason.trim().is_empty() {
            self.player.clone()
        } else {
            format!("{} ({})", self.player, self.reason)
        }
    }
}
