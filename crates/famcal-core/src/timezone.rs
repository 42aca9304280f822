use crate::error::CoreError;
use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

fn parse(timezone: &str) -> Result<Tz, CoreError> {
    Tz::from_str(timezone).map_err(|_| CoreError::InvalidTimezone(timezone.to_string()))
}

/// Validate IANA timezone name
pub fn validate_timezone(timezone: &str) -> Result<(), CoreError> {
    parse(timezone).map(|_| ())
}

/// Calendar date at `now` in the given zone
pub fn today_in(timezone: &str, now: DateTime<Utc>) -> Result<NaiveDate, CoreError> {
    let tz = parse(timezone)?;
    Ok(now.with_timezone(&tz).date_naive())
}

/// Resolve an event's local wall time to UTC.
///
/// Times skipped by a DST jump resolve to the first valid instant after the
/// gap, ambiguous times to the earlier of the two.
pub fn local_to_utc(local: NaiveDateTime, timezone: &str) -> Result<DateTime<Utc>, CoreError> {
    let tz = parse(timezone)?;
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => {
            let shifted = local + chrono::Duration::hours(1);
            tz.from_local_datetime(&shifted)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .ok_or_else(|| CoreError::InvalidInput(format!("{} does not exist in {}", local, timezone)))
        }
    }
}

/// Get timezone abbreviation at a local wall time (e.g., "EST", "EDT")
pub fn abbreviation_at(local: NaiveDateTime, timezone: &str) -> Result<String, CoreError> {
    let tz = parse(timezone)?;
    let utc = local_to_utc(local, timezone)?;
    Ok(utc.with_timezone(&tz).format("%Z").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, min, 0).unwrap()
    }

    #[test]
    fn test_validate_timezone() {
        assert!(validate_timezone("UTC").is_ok());
        assert!(validate_timezone("America/New_York").is_ok());
        assert!(matches!(
            validate_timezone("Invalid/Timezone"),
            Err(CoreError::InvalidTimezone(name)) if name == "Invalid/Timezone"
        ));
    }

    #[test]
    fn test_today_in_crosses_date_line() {
        let now = local(2024, 3, 1, 23, 30).and_utc();
        assert_eq!(today_in("UTC", now).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(today_in("Asia/Tokyo", now).unwrap(), NaiveDate::from_ymd_opt(2024, 3, 2).unwrap());
    }

    #[test]
    fn test_local_to_utc_spring_forward_gap() {
        // 02:30 does not exist in New York on 2024-03-10
        let utc = local_to_utc(local(2024, 3, 10, 2, 30), "America/New_York").unwrap();
        assert_eq!(utc, local(2024, 3, 10, 7, 30).and_utc());
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(abbreviation_at(local(2024, 1, 15, 9, 0), "UTC").unwrap(), "UTC");
        assert_eq!(abbreviation_at(local(2024, 7, 15, 9, 0), "America/New_York").unwrap(), "EDT");
    }
}
