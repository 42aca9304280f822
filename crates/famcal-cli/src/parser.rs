use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Natural language is resolved against `now`, a wall-clock time in the
/// user's timezone. It is carried through `Utc` only because the parser
/// needs a `TimeZone`; no conversion happens.
fn parse_natural(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    parse_date_string(input, Utc.from_utc_datetime(&now), Dialect::Us)
        .map(|parsed| parsed.naive_utc())
        .map_err(|e| anyhow!("Failed to parse date '{}': {}", input, e))
}

/// `YYYY-MM-DD` or natural language such as "today" or "next friday".
pub fn parse_date(input: &str, now: NaiveDateTime) -> Result<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }
    parse_natural(input, now).map(|parsed| parsed.date())
}

/// A date with an optional time of day. A bare `YYYY-MM-DD` means midnight.
pub fn parse_datetime(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let trimmed = input.trim();
    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(datetime);
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    parse_natural(input, now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn now() -> NaiveDateTime {
        // A Wednesday.
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    #[rstest]
    #[case("2024-02-29", NaiveDate::from_ymd_opt(2024, 2, 29).unwrap())]
    #[case("today", NaiveDate::from_ymd_opt(2024, 1, 10).unwrap())]
    #[case("tomorrow", NaiveDate::from_ymd_opt(2024, 1, 11).unwrap())]
    fn test_parse_date(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(input, now()).unwrap(), expected);
    }

    #[rstest]
    #[case("2024-03-01 17:30", (2024, 3, 1, 17, 30))]
    #[case("2024-03-01T08:05", (2024, 3, 1, 8, 5))]
    #[case("2024-03-01", (2024, 3, 1, 0, 0))]
    fn test_parse_datetime(#[case] input: &str, #[case] expected: (i32, u32, u32, u32, u32)) {
        let (y, m, d, h, min) = expected;
        let expected = NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap();
        assert_eq!(parse_datetime(input, now()).unwrap(), expected);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_date("not a date at all", now()).is_err());
        assert!(parse_datetime("sometime soonish", now()).is_err());
    }
}
