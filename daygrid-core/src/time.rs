//! Wall-clock time helpers.
//!
//! Session times are local `HH:MM` strings. Everything downstream works in
//! minutes since midnight.

use crate::error::{Error, Result};

/// Minutes in one day.
pub const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parse an `HH:MM` string into minutes since midnight.
///
/// Accepts one or two hour digits and exactly two minute digits. Minutes must
/// be below 60. Hours are not capped, so `"24:00"` parses to 1440 and can
/// mark the end of a day.
///
/// ```
/// use daygrid_core::time::to_minutes;
///
/// assert_eq!(to_minutes("05:30").unwrap(), 330);
/// assert!(to_minutes("5:3").is_err());
/// ```
pub fn to_minutes(time: &str) -> Result<u32> {
    let (hours, minutes) = time
        .split_once(':')
        .ok_or_else(|| Error::invalid_time(time))?;

    if hours.is_empty()
        || hours.len() > 2
        || minutes.len() != 2
        || !hours.bytes().all(|b| b.is_ascii_digit())
        || !minutes.bytes().all(|b| b.is_ascii_digit())
    {
        return Err(Error::invalid_time(time));
    }

    // Both halves are 1-2 ASCII digits, so these cannot overflow.
    let hours: u32 = hours.parse().map_err(|_| Error::invalid_time(time))?;
    let minutes: u32 = minutes.parse().map_err(|_| Error::invalid_time(time))?;

    if minutes >= 60 {
        return Err(Error::invalid_time(time));
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight as a zero-padded `HH:MM` label.
///
/// Out-of-range values wrap modulo one day, so `-30` is `"23:30"` and `1500`
/// is `"01:00"`. Callers that care which day a label belongs to must track
/// the date themselves.
pub fn to_time_string(minutes: i64) -> String {
    let wrapped = minutes.rem_euclid(MINUTES_PER_DAY);
    format!("{:02}:{:02}", wrapped / 60, wrapped % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_minutes() {
        assert_eq!(to_minutes("00:00").unwrap(), 0);
        assert_eq!(to_minutes("05:30").unwrap(), 330);
        assert_eq!(to_minutes("5:30").unwrap(), 330);
        assert_eq!(to_minutes("23:59").unwrap(), 1439);
        assert_eq!(to_minutes("24:00").unwrap(), 1440);
    }

    #[test]
    fn test_to_minutes_rejects_malformed() {
        for bad in [
            "", ":", "0530", "05:3", "05:300", "105:00", "05:60", "aa:bb", " 05:30", "05:30 ",
            "-1:30", "05:-1", "05:30:00", "+5:30",
        ] {
            match to_minutes(bad) {
                Err(Error::InvalidTimeFormat { value }) => assert_eq!(value, bad),
                other => panic!("expected InvalidTimeFormat for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_to_time_string() {
        assert_eq!(to_time_string(0), "00:00");
        assert_eq!(to_time_string(330), "05:30");
        assert_eq!(to_time_string(1439), "23:59");
    }

    #[test]
    fn test_to_time_string_wraps() {
        assert_eq!(to_time_string(1440), "00:00");
        assert_eq!(to_time_string(1500), "01:00");
        assert_eq!(to_time_string(-30), "23:30");
        assert_eq!(to_time_string(-1440), "00:00");
    }

    #[test]
    fn test_round_trip_whole_day() {
        for minutes in 0..MINUTES_PER_DAY {
            let label = to_time_string(minutes);
            assert_eq!(i64::from(to_minutes(&label).unwrap()), minutes, "{label}");
        }
    }
}
