//! Replay start time parsing

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{CoreError, CoreResult};

/// Parse a timezone name such as `US/Pacific`
pub fn parse_timezone(name: &str) -> CoreResult<Tz> {
    name.parse::<Tz>()
        .map_err(|_| CoreError::UnknownTimezone(name.to_string()))
}

/// Parse a replay start time of the form `YYYY-M-D-H-M` in the given zone
pub fn parse_replay_start(value: &str, timezone: &str) -> CoreResult<DateTime<Tz>> {
    let tz = parse_timezone(timezone)?;
    let invalid = |reason: &str| CoreError::InvalidReplayStartTime {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parts = value
        .split('-')
        .map(|part| part.trim().parse::<u32>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| invalid(&e.to_string()))?;

    let &[year, month, day, hour, minute] = parts.as_slice() else {
        return Err(invalid("expected five fields: year-month-day-hour-minute"));
    };

    let naive = NaiveDate::from_ymd_opt(year as i32, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or_else(|| invalid("date or time out of range"))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .ok_or_else(|| invalid("time does not exist in this timezone"))
}

/// Epoch seconds of a replay start time
pub fn replay_start_epoch(value: &str, timezone: &str) -> CoreResult<i64> {
    Ok(parse_replay_start(value, timezone)?.timestamp())
}

/// Epoch seconds of `now`, floored to the minute
pub fn epoch_minute(now: DateTime<Utc>) -> i64 {
    let seconds = now.timestamp();
    seconds - seconds.rem_euclid(60)
}
