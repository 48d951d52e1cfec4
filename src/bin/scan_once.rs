use anyhow::Result;
use chrono::Utc;

use home_pick::api_football::ApiFootball;
use home_pick::config::Config;
use home_pick::notify::StdoutNotifier;
use home_pick::scan::run_scan;

/// Run a single scan and print the alerts instead of sending them.
fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::dotenv();
    home_pick::init_tracing();

    let mut cfg = Config::from_env();
    cfg.delivery_pause = std::time::Duration::ZERO;
    let source = ApiFootball::new(&cfg.provider)?;
    let report = run_scan(&source, &StdoutNotifier, &cfg, Utc::now())?;

    println!("Fixtures scanned: {}", report.fixtures);
    println!("Picks: {}", report.picks.len());
    if report.malformed > 0 {
        println!("Malformed fixtures: {}", report.malformed);
    }
    if !report.rejections.is_empty() {
        println!("Rejections:");
        for (reason, count) in &report.rejections {
            println!(" - {reason}: {count}");
        }
    }
    Ok(())
}
