//! Day-granular time helpers. All timestamps are unix epoch seconds.

/// Seconds in one day.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Current unix timestamp in seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// Truncate a timestamp to its day boundary (00:00 UTC).
pub fn day_of(ts: i64) -> i64 {
    ts - ts.rem_euclid(SECONDS_PER_DAY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_of() {
        // 2021-01-01T12:34:56Z
        let ts = 1_609_504_496;
        assert_eq!(day_of(ts), 1_609_459_200);
        assert_eq!(day_of(1_609_459_200), 1_609_459_200);
    }

    #[test]
    fn test_truncate_negative_timestamp() {
        // Pre-epoch timestamps still land on a day boundary at or before ts.
        let ts = -1;
        let day = day_of(ts);
        assert!(day <= ts);
        assert_eq!(day.rem_euclid(SECONDS_PER_DAY), 0);
    }
}
