use std::collections::HashSet;
use std::env;
use std::time::Duration;

use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_BASE_URL: &str = "https://v3.football.api-sports.io";

const DEFAULT_RUN_EVERY_MINUTES: u64 = 60;
const DEFAULT_LOOKAHEAD_HOURS: i64 = 48;
const DEFAULT_MIN_HOME_ODDS: f64 = 2.0;
const DEFAULT_MAX_GA_PER_MATCH: f64 = 1.0;
const DEFAULT_MIN_WINS_LAST5: usize = 3;
const DEFAULT_MIDTABLE_MIN: u32 = 5;
const DEFAULT_MIDTABLE_MAX: u32 = 12;
const DEFAULT_H2H_SAMPLE: usize = 6;
const DEFAULT_H2H_HOME_WIN_PCT: f64 = 0.5;
const DEFAULT_INJURY_LIMIT: usize = 6;
const DEFAULT_KICKOFF_OFFSET_MINUTES: i32 = 180;
const DEFAULT_KICKOFF_LABEL: &str = "EAT";
const DEFAULT_DELIVERY_PAUSE_MS: u64 = 300;

const AFRICA: &[&str] = &[
    "Algeria",
    "Angola",
    "Benin",
    "Botswana",
    "Burkina Faso",
    "Burundi",
    "Cameroon",
    "Cape Verde",
    "Central African Republic",
    "Chad",
    "Comoros",
    "Congo",
    "Congo DR",
    "Côte d'Ivoire",
    "Djibouti",
    "Egypt",
    "Equatorial Guinea",
    "Eritrea",
    "Eswatini",
    "Ethiopia",
    "Gabon",
    "Gambia",
    "Ghana",
    "Guinea",
    "Guinea-Bissau",
    "Kenya",
    "Lesotho",
    "Liberia",
    "Libya",
    "Madagascar",
    "Malawi",
    "Mali",
    "Mauritania",
    "Mauritius",
    "Mayotte",
    "Morocco",
    "Mozambique",
    "Namibia",
    "Niger",
    "Nigeria",
    "Rwanda",
    "Sao Tome and Principe",
    "Senegal",
    "Seychelles",
    "Sierra Leone",
    "Somalia",
    "South Africa",
    "South Sudan",
    "Sudan",
    "Tanzania",
    "Togo",
    "Tunisia",
    "Uganda",
    "Zambia",
    "Zimbabwe",
];

const SOUTH_AMERICA: &[&str] = &[
    "Argentina",
    "Bolivia",
    "Brazil",
    "Chile",
    "Colombia",
    "Ecuador",
    "Guyana",
    "Paraguay",
    "Peru",
    "Suriname",
    "Uruguay",
    "Venezuela",
];

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: Option<String>,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
}

/// Where kickoff times are rendered for alerts.
#[derive(Debug, Clone)]
pub struct KickoffZone {
    pub offset: FixedOffset,
    pub label: String,
}

impl Default for KickoffZone {
    fn default() -> Self {
        Self {
            offset: offset_from_minutes(DEFAULT_KICKOFF_OFFSET_MINUTES),
            label: DEFAULT_KICKOFF_LABEL.to_string(),
        }
    }
}

/// Thresholds the pick filters are evaluated against.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Lower-cased, trimmed country names.
    pub excluded_countries: HashSet<String>,
    pub min_recent_wins: usize,
    pub max_goals_against: f64,
    pub midtable_min: u32,
    pub midtable_max: u32,
    pub min_home_odds: f64,
    pub h2h_sample: usize,
    pub h2h_min_home_win_ratio: f64,
    pub injury_limit: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_countries: default_excluded_countries(),
            min_recent_wins: DEFAULT_MIN_WINS_LAST5,
            max_goals_against: DEFAULT_MAX_GA_PER_MATCH,
            midtable_min: DEFAULT_MIDTABLE_MIN,
            midtable_max: DEFAULT_MIDTABLE_MAX,
            min_home_odds: DEFAULT_MIN_HOME_ODDS,
            h2h_sample: DEFAULT_H2H_SAMPLE,
            h2h_min_home_win_ratio: DEFAULT_H2H_HOME_WIN_PCT,
            injury_limit: DEFAULT_INJURY_LIMIT,
        }
    }
}

impl FilterConfig {
    pub fn is_excluded(&self, country: &str) -> bool {
        self.excluded_countries.contains(&normalize_country(country))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderConfig,
    pub telegram: Option<TelegramConfig>,
    pub filters: FilterConfig,
    pub kickoff: KickoffZone,
    pub run_every: Duration,
    pub lookahead_hours: i64,
    pub delivery_pause: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                api_key: None,
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            telegram: None,
            filters: FilterConfig::default(),
            kickoff: KickoffZone::default(),
            run_every: Duration::from_secs(DEFAULT_RUN_EVERY_MINUTES * 60),
            lookahead_hours: DEFAULT_LOOKAHEAD_HOURS,
            delivery_pause: Duration::from_millis(DEFAULT_DELIVERY_PAUSE_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Missing or unparseable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |key: &str| {
            lookup(key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };

        let provider = ProviderConfig {
            api_key: text("API_FOOTBALL_KEY"),
            base_url: text("API_FOOTBALL_BASE_URL")
                .map(|s| s.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let telegram = match (text("TELEGRAM_BOT_TOKEN"), text("TELEGRAM_CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramConfig { bot_token, chat_id }),
            _ => None,
        };

        let mut excluded_countries = default_excluded_countries();
        if let Some(extra) = text("COUNTRIES_EXCLUDE") {
            excluded_countries.extend(
                extra
                    .split(',')
                    .map(normalize_country)
                    .filter(|c| !c.is_empty()),
            );
        }

        let filters = FilterConfig {
            excluded_countries,
            min_recent_wins: parsed(&text, "MIN_WINS_LAST5", DEFAULT_MIN_WINS_LAST5),
            max_goals_against: parsed(&text, "MAX_GA_PER_MATCH", DEFAULT_MAX_GA_PER_MATCH),
            midtable_min: parsed(&text, "MIDTABLE_MIN", DEFAULT_MIDTABLE_MIN),
            midtable_max: parsed(&text, "MIDTABLE_MAX", DEFAULT_MIDTABLE_MAX),
            min_home_odds: parsed(&text, "MIN_HOME_ODDS", DEFAULT_MIN_HOME_ODDS),
            h2h_sample: parsed(&text, "H2H_SAMPLE", DEFAULT_H2H_SAMPLE),
            h2h_min_home_win_ratio: parsed(&text, "H2H_HOME_WIN_PCT", DEFAULT_H2H_HOME_WIN_PCT),
            injury_limit: parsed(&text, "INJURY_LIMIT", DEFAULT_INJURY_LIMIT),
        };

        let kickoff = KickoffZone {
            offset: offset_from_minutes(parsed(
                &text,
                "KICKOFF_UTC_OFFSET_MINUTES",
                DEFAULT_KICKOFF_OFFSET_MINUTES,
            )),
            label: text("KICKOFF_TZ_LABEL").unwrap_or_else(|| DEFAULT_KICKOFF_LABEL.to_string()),
        };

        let run_every_minutes = parsed(&text, "RUN_EVERY_MINUTES", DEFAULT_RUN_EVERY_MINUTES).max(1);
        let lookahead_hours = parsed(&text, "LOOKAHEAD_HOURS", DEFAULT_LOOKAHEAD_HOURS).clamp(1, 24 * 14);

        Self {
            provider,
            telegram,
            filters,
            kickoff,
            run_every: Duration::from_secs(run_every_minutes * 60),
            lookahead_hours,
            delivery_pause: Duration::from_millis(parsed(
                &text,
                "DELIVERY_PAUSE_MS",
                DEFAULT_DELIVERY_PAUSE_MS,
            )),
        }
    }
}

pub fn default_excluded_countries() -> HashSet<String> {
    AFRICA
        .iter()
        .chain(SOUTH_AMERICA)
        .map(|c| normalize_country(c))
        .collect()
}

fn normalize_country(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn parsed<T, F>(text: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    text(key)
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn offset_from_minutes(minutes: i32) -> FixedOffset {
    FixedOffset::east_opt(minutes.clamp(-14 * 60, 14 * 60) * 60).unwrap_or(Utc.fix())
}
