use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::NaiveDate;

use home_pick::api_football::{DataResult, FootballData, WindowEntry, parse_odds_json};
use home_pick::config::FilterConfig;
use home_pick::model::{
    Fixture, HeadToHeadMeeting, InjuryEntry, LeagueRef, OddsQuote, Outcome, StandingsEntry,
    TeamFormRecord, TeamRef, TeamStatistics,
};
use home_pick::odds::consensus;
use home_pick::pipeline::evaluate;

struct StaticSource {
    quotes: Vec<OddsQuote>,
    standings: Vec<StandingsEntry>,
}

impl FootballData for StaticSource {
    fn fixtures_between(&self, _from: NaiveDate, _to: NaiveDate) -> DataResult<Vec<WindowEntry>> {
        Ok(Vec::new())
    }

    fn recent_form(&self, team_id: u64, _last: usize) -> DataResult<TeamFormRecord> {
        use Outcome::{Draw, Loss, Win};
        Ok(TeamFormRecord {
            team_id,
            outcomes: vec![Win, Win, Win, Draw, Loss],
        })
    }

    fn team_statistics(&self, _: u64, _: i32, _: u64) -> DataResult<TeamStatistics> {
        Ok(TeamStatistics {
            goals_against_average: Some(0.9),
        })
    }

    fn odds(&self, _fixture_id: u64) -> DataResult<Vec<OddsQuote>> {
        Ok(self.quotes.clone())
    }

    fn standings(&self, _: u64, _: i32) -> DataResult<Vec<StandingsEntry>> {
        Ok(self.standings.clone())
    }

    fn head_to_head(&self, home_id: u64, away_id: u64, _: usize) -> DataResult<Vec<HeadToHeadMeeting>> {
        Ok(vec![HeadToHeadMeeting {
            home_id,
            away_id,
            home_winner: Some(true),
        }])
    }

    fn injuries(&self, _team_id: u64) -> DataResult<Vec<InjuryEntry>> {
        Ok(Vec::new())
    }
}

fn odds_payload(bookmakers: usize) -> String {
    let books: Vec<String> = (0..bookmakers)
        .map(|idx| {
            let home = 2.2 + (idx % 5) as f64 * 0.05;
            format!(
                r#"{{"name": "Book {idx}", "bets": [
                    {{"name": "Match Winner", "values": [
                        {{"value": "Home", "odd": "{home:.2}"}},
                        {{"value": "Draw", "odd": "3.30"}},
                        {{"value": "Away", "odd": "3.90"}}
                    ]}},
                    {{"name": "Both Teams Score", "values": [
                        {{"value": "Yes", "odd": "1.80"}}
                    ]}}
                ]}}"#
            )
        })
        .collect();
    format!(
        r#"{{"errors": [], "response": [{{"bookmakers": [{}]}}]}}"#,
        books.join(",")
    )
}

fn bench_odds_consensus(c: &mut Criterion) {
    let raw = odds_payload(40);
    c.bench_function("odds_parse_and_consensus", |b| {
        b.iter(|| {
            let quotes = parse_odds_json(black_box(&raw)).unwrap();
            black_box(consensus(&quotes));
        })
    });
}

fn bench_pipeline_evaluate(c: &mut Criterion) {
    let raw = odds_payload(20);
    let source = StaticSource {
        quotes: parse_odds_json(&raw).unwrap(),
        standings: (1..=24)
            .map(|rank| StandingsEntry {
                team_id: 100 + rank as u64,
                rank,
                group: None,
            })
            .collect(),
    };
    let fixture = Fixture {
        id: 1,
        home: TeamRef {
            id: 108,
            name: "Home FC".to_string(),
        },
        away: TeamRef {
            id: 115,
            name: "Away FC".to_string(),
        },
        league: LeagueRef {
            id: Some(40),
            name: "Championship".to_string(),
            country: Some("England".to_string()),
            season: Some(2023),
        },
        kickoff: "2024-05-04T14:00:00+00:00".to_string(),
        status: "NS".to_string(),
    };
    let cfg = FilterConfig::default();

    c.bench_function("pipeline_evaluate", |b| {
        b.iter(|| {
            let pick = evaluate(black_box(&fixture), &source, &cfg).unwrap();
            black_box(pick.table_position);
        })
    });
}

criterion_group!(benches, bench_odds_consensus, bench_pipeline_evaluate);
criterion_main!(benches);
