//! Purpose: Parse and format unit-suffixed durations (`1h30m`, `1.5s`, `500ms`).
//! Exports: `parse_duration`, `format_duration`.
//! Role: Duration grammar behind the `Duration` codec; the millisecond fallback lives in the codec.
//! Invariants: `format_duration` output always parses back to the same value.
//! Invariants: Negative non-zero inputs are rejected (`std::time::Duration` is unsigned).
//! Notes: Units are `ns`, `us` (also `µs`/`μs`), `ms`, `s`, `m`, `h`; case-sensitive.
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;
// Fraction digits past this contribute well under a nanosecond even for hours.
const MAX_FRACTION_DIGITS: usize = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3_600 * NANOS_PER_SEC),
        _ => None,
    }
}

/// Parses a sequence of `number unit` components, e.g. `1h30m` or `.5s`.
///
/// A bare `0` is accepted; any other bare number is rejected (missing unit).
pub fn parse_duration(input: &str) -> Option<Duration> {
    let (negative, mut rest) = match input.as_bytes().first() {
        Some(b'-') => (true, &input[1..]),
        Some(b'+') => (false, &input[1..]),
        _ => (false, input),
    };
    if rest == "0" {
        return Some(Duration::ZERO);
    }
    if rest.is_empty() {
        return None;
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after) = rest.split_at(int_len);
        let (frac_digits, after) = match after.strip_prefix('.') {
            Some(after) => {
                let frac_len = after.bytes().take_while(u8::is_ascii_digit).count();
                after.split_at(frac_len)
            }
            None => ("", after),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return None;
        }

        let unit_len = after
            .find(|ch: char| ch == '.' || ch.is_ascii_digit())
            .unwrap_or(after.len());
        if unit_len == 0 {
            return None;
        }
        let (unit, after) = after.split_at(unit_len);
        let scale = unit_nanos(unit)?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().ok()?
        };
        let mut component = whole.checked_mul(scale)?;
        if !frac_digits.is_empty() {
            let kept = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS)];
            let numerator: u128 = kept.parse().ok()?;
            let denominator = 10u128.pow(kept.len() as u32);
            component = component.checked_add(numerator * scale / denominator)?;
        }
        total = total.checked_add(component)?;
        rest = after;
    }

    if negative && total != 0 {
        return None;
    }
    let secs = u64::try_from(total / NANOS_PER_SEC).ok()?;
    Some(Duration::new(secs, (total % NANOS_PER_SEC) as u32))
}

/// Formats as `1h2m3.5s` for values of a second or more, else `ms`/`µs`/`ns`.
pub fn format_duration(value: Duration) -> String {
    let nanos = value.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }
    if nanos < NANOS_PER_SEC {
        return if nanos < 1_000 {
            format!("{nanos}ns")
        } else if nanos < 1_000_000 {
            format!("{}\u{b5}s", decimal(nanos, 3))
        } else {
            format!("{}ms", decimal(nanos, 6))
        };
    }

    let secs = nanos / NANOS_PER_SEC;
    let sub = nanos % NANOS_PER_SEC;
    let hours = secs / 3_600;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;

    let mut out = String::new();
    if hours > 0 {
        out.push_str(&format!("{hours}h"));
    }
    if hours > 0 || minutes > 0 {
        out.push_str(&format!("{minutes}m"));
    }
    out.push_str(&decimal(seconds * NANOS_PER_SEC + sub, 9));
    out.push('s');
    out
}

fn decimal(value: u128, places: u32) -> String {
    let scale = 10u128.pow(places);
    let whole = value / scale;
    let frac = value % scale;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{frac:0width$}", width = places as usize);
    format!("{whole}.{}", digits.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::{format_duration, parse_duration};
    use std::time::Duration;

    #[test]
    fn parse_accepts_single_and_composite_units() {
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3_600)));
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("500ms"), Some(Duration::from_millis(500)));
        assert_eq!(parse_duration("1h30m"), Some(Duration::from_secs(5_400)));
        assert_eq!(parse_duration("2m3s4ms"), Some(Duration::new(123, 4_000_000)));
        assert_eq!(parse_duration("7ns"), Some(Duration::from_nanos(7)));
        assert_eq!(parse_duration("2us"), Some(Duration::from_micros(2)));
        assert_eq!(parse_duration("2\u{b5}s"), Some(Duration::from_micros(2)));
        assert_eq!(parse_duration("2\u{3bc}s"), Some(Duration::from_micros(2)));
    }

    #[test]
    fn parse_accepts_fractions_and_signs() {
        assert_eq!(parse_duration("1.5s"), Some(Duration::from_millis(1_500)));
        assert_eq!(parse_duration(".5m"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("1.s"), Some(Duration::from_secs(1)));
        assert_eq!(parse_duration("+1m"), Some(Duration::from_secs(60)));
        assert_eq!(parse_duration("-0s"), Some(Duration::ZERO));
        assert_eq!(parse_duration("0"), Some(Duration::ZERO));
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for input in ["", "3600", "1", "s", ".s", "1x", "1H", "-1s", "1h-", "+", "1..5s"] {
            assert_eq!(parse_duration(input), None, "input {input:?}");
        }
    }

    #[test]
    fn parse_rejects_overflow() {
        assert_eq!(parse_duration("99999999999999999999999999999999999999999h"), None);
        assert_eq!(parse_duration("9999999999999999999999h"), None);
    }

    #[test]
    fn format_picks_compact_units() {
        assert_eq!(format_duration(Duration::ZERO), "0s");
        assert_eq!(format_duration(Duration::from_nanos(42)), "42ns");
        assert_eq!(format_duration(Duration::from_nanos(2_500)), "2.5\u{b5}s");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.5ms");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1_500)), "1.5s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m30s");
        assert_eq!(format_duration(Duration::from_secs(3_600)), "1h0m0s");
        assert_eq!(format_duration(Duration::new(3_723, 5)), "1h2m3.000000005s");
    }

    #[test]
    fn formatted_values_parse_back() {
        let samples = [
            Duration::from_nanos(1),
            Duration::from_nanos(999_999),
            Duration::from_millis(42),
            Duration::new(59, 999_999_999),
            Duration::from_secs(86_400 * 400),
        ];
        for sample in samples {
            assert_eq!(parse_duration(&format_duration(sample)), Some(sample));
        }
    }
}
