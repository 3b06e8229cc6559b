use std::time::Duration;

use anyhow::{bail, Result};

/// Suffix to nanoseconds multiplier (order matters: longer suffixes first,
/// so "10 mins" is not consumed by the "ns" or "s" rules)
const UNITS: &[(&str, f64)] = &[
    ("days", 86_400_000_000_000.0),
    ("day", 86_400_000_000_000.0),
    ("mins", 60_000_000_000.0),
    ("min", 60_000_000_000.0),
    ("ms", 1_000_000.0),
    ("µs", 1_000.0),
    ("us", 1_000.0),
    ("ns", 1.0),
    ("secs", 1_000_000_000.0),
    ("sec", 1_000_000_000.0),
    ("hrs", 3_600_000_000_000.0),
    ("hr", 3_600_000_000_000.0),
    ("s", 1_000_000_000.0),
    ("h", 3_600_000_000_000.0),
    ("m", 60_000_000_000.0),
    ("d", 86_400_000_000_000.0),
];

/// Parse time period strings like "0 secs", "10 min", "1.5h", "250ms"
pub fn parse_duration(s: &str) -> Result<Duration> {
    let s = s.trim();

    for (suffix, multiplier) in UNITS {
        if let Some(val_str) = s.strip_suffix(suffix) {
            let val: f64 = val_str.trim_end().parse()?;
            return Ok(Duration::from_nanos((val * multiplier) as u64));
        }
    }

    bail!("Unknown duration format: {}", s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_zero_seconds() {
        assert_eq!(parse_duration("0 secs").unwrap(), Duration::ZERO);
        assert_eq!(parse_duration("0s").unwrap(), Duration::ZERO);
    }

    #[test]
    fn parses_minutes() {
        assert_eq!(parse_duration("10 min").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("10 mins").unwrap(), Duration::from_secs(600));
        assert_eq!(parse_duration("10m").unwrap(), Duration::from_secs(600));
    }

    #[test]
    fn parses_fractional_hours() {
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::from_secs(5400));
    }

    #[test]
    fn parses_subsecond_units() {
        assert_eq!(
            parse_duration("250ms").unwrap(),
            Duration::from_millis(250)
        );
        assert_eq!(parse_duration("16µs").unwrap(), Duration::from_micros(16));
        assert_eq!(parse_duration("16us").unwrap(), Duration::from_micros(16));
        assert_eq!(parse_duration("5ns").unwrap(), Duration::from_nanos(5));
    }

    #[test]
    fn parses_days() {
        assert_eq!(
            parse_duration("2 days").unwrap(),
            Duration::from_secs(172_800)
        );
    }

    #[test]
    fn rejects_unknown_formats() {
        assert!(parse_duration("10 fortnights").is_err());
        assert!(parse_duration("abc").is_err());
        assert!(parse_duration("").is_err());
    }
}
