use std::panic::{self, AssertUnwindSafe};
use std::thread;

use anyhow::Result;
use chrono::Utc;

use home_pick::api_football::ApiFootball;
use home_pick::config::Config;
use home_pick::notify::{Notifier, StdoutNotifier, TelegramNotifier};
use home_pick::scan::run_scan;

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    home_pick::init_tracing();

    let cfg = Config::from_env();
    let source = ApiFootball::new(&cfg.provider)?;
    let notifier: Box<dyn Notifier> = match cfg.telegram.as_ref() {
        Some(tg) => Box::new(TelegramNotifier::new(tg)?),
        None => {
            tracing::warn!("TELEGRAM_BOT_TOKEN/TELEGRAM_CHAT_ID not set, printing alerts to stdout");
            Box::new(StdoutNotifier)
        }
    };
    if cfg.provider.api_key.is_none() {
        tracing::warn!("API_FOOTBALL_KEY not set, provider calls will be unauthenticated");
    }

    tracing::info!(
        every_minutes = cfg.run_every.as_secs() / 60,
        lookahead_hours = cfg.lookahead_hours,
        "starting scan loop"
    );

    loop {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            run_scan(&source, notifier.as_ref(), &cfg, Utc::now())
        }));
        match outcome {
            Ok(Ok(report)) => tracing::info!(
                fixtures = report.fixtures,
                picks = report.picks.len(),
                delivered = report.delivered,
                failed = report.failed_deliveries,
                malformed = report.malformed,
                rejections = ?report.rejections,
                "scan complete"
            ),
            Ok(Err(err)) => tracing::error!(error = %format!("{err:#}"), "scan failed"),
            Err(_) => tracing::error!("scan panicked"),
        }
        thread::sleep(cfg.run_every);
    }
}
