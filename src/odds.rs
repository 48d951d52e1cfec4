use serde::Deserialize;
use serde_json::Value;

use crate::model::OddsQuote;
use crate::stats::median;

const MATCH_WINNER_MARKETS: [&str; 3] = ["match winner", "1x2", "win-draw-win"];

/// One `/odds` response entry: every bookmaker quoting a fixture.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct OddsBlock {
    #[serde(default)]
    pub bookmakers: Vec<OddsBookmaker>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OddsBookmaker {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub bets: Vec<OddsBet>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OddsBet {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub values: Vec<OddsValue>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OddsValue {
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub odd: Value,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusOdds {
    pub home: f64,
    pub draw: Option<f64>,
    pub away: Option<f64>,
    pub home_favorite: bool,
    /// Home prices the median was taken over.
    pub quotes: usize,
}

pub fn is_match_winner_market(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    MATCH_WINNER_MARKETS.iter().any(|m| lower.contains(m))
}

/// Flatten every 1X2 market across bookmakers into quotes.
pub fn extract_quotes(blocks: &[OddsBlock]) -> Vec<OddsQuote> {
    let mut out = Vec::new();
    for block in blocks {
        for bookmaker in &block.bookmakers {
            for bet in &bookmaker.bets {
                let market = bet.name.as_deref().unwrap_or_default();
                if !is_match_winner_market(market) {
                    continue;
                }
                out.push(OddsQuote {
                    bookmaker: bookmaker.name.clone().unwrap_or_default(),
                    market: market.to_string(),
                    home: price_for(&bet.values, "Home", "1"),
                    draw: price_for(&bet.values, "Draw", "X"),
                    away: price_for(&bet.values, "Away", "2"),
                });
            }
        }
    }
    out
}

/// Median 1X2 price over all quotes. `None` when no quote carries a home price.
pub fn consensus(quotes: &[OddsQuote]) -> Option<ConsensusOdds> {
    let home_vals: Vec<f64> = quotes.iter().filter_map(|q| q.home).collect();
    let draw_vals: Vec<f64> = quotes.iter().filter_map(|q| q.draw).collect();
    let away_vals: Vec<f64> = quotes.iter().filter_map(|q| q.away).collect();

    let home = median(&home_vals)?;
    let draw = median(&draw_vals);
    let away = median(&away_vals);
    let home_favorite = match (draw, away) {
        (Some(d), Some(a)) => home < d && home < a,
        _ => false,
    };

    Some(ConsensusOdds {
        home,
        draw,
        away,
        home_favorite,
        quotes: home_vals.len(),
    })
}

fn price_for(values: &[OddsValue], named: &str, numeric: &str) -> Option<f64> {
    let label_price = |label: &str| {
        values
            .iter()
            .find(|v| label_text(&v.value).as_deref() == Some(label))
            .and_then(|v| parse_price(&v.odd))
    };
    label_price(named).or_else(|| label_price(numeric))
}

fn label_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_price(v: &Value) -> Option<f64> {
    let price = match v {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    (price.is_finite() && price > 0.0).then_some(price)
}
