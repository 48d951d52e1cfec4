use std::collections::BTreeMap;
use std::thread;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, Utc};

use crate::alert::format_pick;
use crate::api_football::FootballData;
use crate::config::Config;
use crate::notify::Notifier;
use crate::pipeline::{Pick, evaluate};

#[derive(Debug, Default)]
pub struct ScanReport {
    pub fixtures: usize,
    pub malformed: usize,
    pub rejections: BTreeMap<&'static str, usize>,
    pub picks: Vec<Pick>,
    pub delivered: usize,
    pub failed_deliveries: usize,
}

/// One full pass: fetch the window, filter every fixture, deliver the picks.
/// Only a failed window fetch is an error; everything else is tallied.
pub fn run_scan(
    source: &dyn FootballData,
    notifier: &dyn Notifier,
    cfg: &Config,
    now: DateTime<Utc>,
) -> Result<ScanReport> {
    let mut report = collect_picks(source, cfg, now)?;
    deliver(&mut report, notifier, cfg);
    Ok(report)
}

pub fn collect_picks(
    source: &dyn FootballData,
    cfg: &Config,
    now: DateTime<Utc>,
) -> Result<ScanReport> {
    let from = now.date_naive();
    let to = (now + ChronoDuration::hours(cfg.lookahead_hours)).date_naive();
    let window = source
        .fixtures_between(from, to)
        .with_context(|| format!("fixture window {from}..{to} unavailable"))?;

    let mut report = ScanReport {
        fixtures: window.len(),
        ..ScanReport::default()
    };

    for entry in window {
        let fixture = match entry {
            Ok(fixture) => fixture,
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed fixture");
                report.malformed += 1;
                continue;
            }
        };
        match evaluate(&fixture, source, &cfg.filters) {
            Ok(pick) => {
                tracing::info!(
                    fixture = fixture.id,
                    teams = %fixture.label(),
                    home_odds = pick.odds.home,
                    rank = pick.table_position,
                    "home pick"
                );
                report.picks.push(pick);
            }
            Err(reason) => {
                tracing::debug!(
                    fixture = fixture.id,
                    teams = %fixture.label(),
                    reason = %reason,
                    "rejected"
                );
                *report.rejections.entry(reason.code()).or_insert(0) += 1;
            }
        }
    }

    Ok(report)
}

pub fn deliver(report: &mut ScanReport, notifier: &dyn Notifier, cfg: &Config) {
    for (idx, pick) in report.picks.iter().enumerate() {
        if idx > 0 && !cfg.delivery_pause.is_zero() {
            thread::sleep(cfg.delivery_pause);
        }
        let message = format_pick(pick, &cfg.kickoff);
        match notifier.send(&message) {
            Ok(()) => report.delivered += 1,
            Err(err) => {
                tracing::warn!(fixture = pick.fixture.id, error = %err, "alert delivery failed");
                report.failed_deliveries += 1;
            }
        }
    }
}
