//! Timeout strings used by the loader settings, e.g. `fetch_timeout: 30s`.

use std::time::Duration;

/// Unit suffixes with their length in milliseconds. `ms` must precede `m`
/// and `s` so it is matched first.
const UNITS: &[(&str, u64)] = &[("ms", 1), ("h", 3_600_000), ("m", 60_000), ("s", 1_000)];

/// Parse a duration such as `500ms`, `30s`, `5m` or `1h`.
///
/// A bare number counts as seconds. Returns `None` for anything else,
/// including values too large to represent.
///
/// ```
/// use compose_plan::config::parse_duration_string;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration_string("30s"), Some(Duration::from_secs(30)));
/// assert_eq!(parse_duration_string("1h"), Some(Duration::from_secs(3600)));
/// assert_eq!(parse_duration_string("45"), Some(Duration::from_secs(45)));
/// ```
pub fn parse_duration_string(s: &str) -> Option<Duration> {
    let s = s.trim();

    let (amount, millis_per_unit) = UNITS
        .iter()
        .find_map(|(suffix, factor)| s.strip_suffix(suffix).map(|n| (n, *factor)))
        .unwrap_or((s, 1_000));

    // `u64::from_str` accepts a leading '+', recipes should not
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    amount
        .parse::<u64>()
        .ok()
        .and_then(|n| n.checked_mul(millis_per_unit))
        .map(Duration::from_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_duration_string("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration_string("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration_string("2m"), Some(Duration::from_secs(120)));
        assert_eq!(parse_duration_string("1h"), Some(Duration::from_secs(3600)));
    }

    #[test]
    fn test_bare_number_is_seconds() {
        assert_eq!(parse_duration_string("10"), Some(Duration::from_secs(10)));
        assert_eq!(parse_duration_string(" 5s "), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_zero_parses() {
        // Rejecting a zero timeout is up to the caller
        assert_eq!(parse_duration_string("0ms"), Some(Duration::ZERO));
    }

    #[test]
    fn test_rejects_garbage() {
        for input in ["", "s", "ms", "abc", "5x", "-5s", "+5s", "1.5s", "5 s"] {
            assert_eq!(parse_duration_string(input), None, "input {:?}", input);
        }
    }

    #[test]
    fn test_overflow() {
        assert_eq!(parse_duration_string(&format!("{}h", u64::MAX)), None);
    }
}
