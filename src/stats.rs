use std::cmp::Ordering;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};

/// Median of `values`, or `None` when there is nothing to take the middle of.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Render a provider UTC timestamp as `YYYY-MM-DD HH:MM` in `offset`.
/// Unparseable input comes back untouched.
pub fn localize_kickoff(utc: &str, offset: FixedOffset) -> String {
    match parse_utc(utc) {
        Some(dt) => dt.with_timezone(&offset).format("%Y-%m-%d %H:%M").to_string(),
        None => utc.to_string(),
    }
}

pub fn parse_utc(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::{localize_kickoff, median};

    fn eat() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).expect("valid offset")
    }

    #[test]
    fn median_of_empty_is_none() {
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_single_and_odd() {
        assert_eq!(median(&[3.0]), Some(3.0));
        assert_eq!(median(&[5.0, 1.0, 3.0]), Some(3.0));
    }

    #[test]
    fn median_even_averages_middle_pair() {
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn localizes_zulu_timestamp() {
        assert_eq!(localize_kickoff("2024-05-04T14:00:00Z", eat()), "2024-05-04 17:00");
    }

    #[test]
    fn localizes_offset_timestamp_across_midnight() {
        assert_eq!(
            localize_kickoff("2024-05-04T22:30:00+00:00", eat()),
            "2024-05-05 01:30"
        );
    }

    #[test]
    fn unparseable_kickoff_is_returned_verbatim() {
        assert_eq!(localize_kickoff("soon", eat()), "soon");
        assert_eq!(localize_kickoff("", eat()), "");
    }
}
