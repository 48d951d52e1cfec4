use crate::config::KickoffZone;
use crate::pipeline::{FORM_WINDOW, Pick};
use crate::stats::localize_kickoff;

pub fn format_pick(pick: &Pick, zone: &KickoffZone) -> String {
    let fixture = &pick.fixture;
    let country = fixture.league.country.as_deref().unwrap_or("Unknown");
    let kickoff = localize_kickoff(&fixture.kickoff, zone.offset);
    let ga = pick
        .goals_against_average
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string());
    let injuries = if pick.injuries.is_empty() {
        "None".to_string()
    } else {
        pick.injuries
            .iter()
            .map(|i| i.display())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let lines = [
        "⚽️ Home Pick Alert".to_string(),
        format!("{} vs {}", fixture.home.name, fixture.away.name),
        format!("League: {} - {}", fixture.league.name, country),
        format!("Kickoff ({}): {}", zone.label, kickoff),
        String::new(),
        "Why selected:".to_string(),
        format!("• Home form: {}W in last {}", pick.recent_wins, FORM_WINDOW),
        format!("• Won last match: {}", if pick.won_last_match { "✅" } else { "❌" }),
        format!("• GA avg: {ga}"),
        format!("• Upward trend: {}", yes_no(pick.trend.is_upward())),
        format!("• Table pos: {}", pick.table_position),
        format!(
            "• Odds median H: {:.2} (favoured: {})",
            pick.odds.home,
            yes_no(pick.odds.home_favorite)
        ),
        format!(
            "• H2H home wins: {}/{}",
            pick.head_to_head.home_wins, pick.head_to_head.meetings
        ),
        format!("• Injuries / concerns: {injuries}"),
        String::new(),
        "Suggested: Home win".to_string(),
    ];
    lines.join("\n")
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}
