//! Display formatting for prices and drop statistics
//!
//! Everything here is pure and locale independent: the same input always
//! yields the same string. Values that cannot be shown become [`PLACEHOLDER`].

/// Shown in place of a missing or unusable value.
pub const PLACEHOLDER: &str = "—";

const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// A numeric value as the API hands it over: a decimal string, a number, or nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericInput<'a> {
    Absent,
    Text(&'a str),
    Number(f64),
}

impl NumericInput<'_> {
    /// Finite numeric value, if there is one. Blank text reads as zero.
    fn value(self) -> Option<f64> {
        let n = match self {
            Self::Absent => return None,
            Self::Number(n) => n,
            Self::Text(s) => {
                let s = s.trim();
                if s.is_empty() { 0.0 } else { s.parse().ok()? }
            }
        };
        n.is_finite().then_some(n)
    }
}

impl<'a> From<&'a str> for NumericInput<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for NumericInput<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for NumericInput<'_> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i64> for NumericInput<'_> {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl<'a, T> From<Option<T>> for NumericInput<'a>
where
    T: Into<NumericInput<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Into::into)
    }
}

/// Compact human-readable number: `999`, `12.5`, `1.5K`, `2M`.
///
/// Below 1000 the value is shown with up to two decimals. From 1000 on it is
/// scaled by the largest of T/B/M/K not exceeding its magnitude and shown the
/// same way with the unit appended.
pub fn compact_number<'a>(input: impl Into<NumericInput<'a>>) -> String {
    let Some(n) = input.into().value() else {
        return PLACEHOLDER.to_string();
    };

    let magnitude = n.abs();
    if magnitude < 1000.0 {
        return trim_decimals(&to_fixed(n, 2));
    }

    let (divisor, suffix) = UNITS
        .iter()
        .copied()
        .find(|(unit, _)| magnitude >= *unit)
        .unwrap_or(UNITS[UNITS.len() - 1]);

    format!("{}{suffix}", trim_decimals(&to_fixed(n / divisor, 2)))
}

/// Fixed-point formatting that rounds exact halfway values away from zero
/// (`1.125` → `1.13`, `-1.125` → `-1.13`). Plain `{:.N}` rounds those to even.
fn to_fixed(x: f64, digits: usize) -> String {
    // Enough extra digits to print any finite f64 at or above a halfway
    // point exactly.
    const EXACT_DIGITS: usize = 80;

    let exact = format!("{:.*}", digits + EXACT_DIGITS, x);
    let rest = &exact[exact.len() - EXACT_DIGITS..];
    let is_tie = rest.starts_with('5') && rest[1..].bytes().all(|b| b == b'0');

    if is_tie {
        // One ulp further from zero tips the tie the right way.
        format!("{:.*}", digits, f64::from_bits(x.to_bits() + 1))
    } else {
        format!("{:.*}", digits, x)
    }
}

/// Drops trailing zeros and a dangling decimal point: `12.50` → `12.5`, `12.00` → `12`.
fn trim_decimals(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

/// Drop chance rendered two ways.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncientOdds {
    /// e.g. `0.1000%`
    pub percentage: String,
    /// e.g. `1 in 1000`
    pub one_in: String,
}

/// Formats an ancient drop probability as a percentage and as "1 in N".
///
/// A missing or non-finite chance yields placeholders for both. A chance of
/// zero or below still gets a percentage but no "1 in N".
pub fn ancient_odds(chance: Option<f64>) -> AncientOdds {
    let Some(chance) = chance.filter(|c| c.is_finite()) else {
        return AncientOdds {
            percentage: PLACEHOLDER.to_string(),
            one_in: PLACEHOLDER.to_string(),
        };
    };

    let percentage = format!("{}%", to_fixed(chance * 100.0, 4));
    let one_in = if chance > 0.0 {
        format!("1 in {}", (1.0 / chance).round())
    } else {
        PLACEHOLDER.to_string()
    };

    AncientOdds { percentage, one_in }
}

/// `T1`, `T2`, ... or the placeholder.
pub fn tier_label(tier: Option<i64>) -> String {
    tier.map_or_else(|| PLACEHOLDER.to_string(), |t| format!("T{t}"))
}

/// Average orb cost with thousands separators and up to three decimals.
pub fn avg_orbs_display(avg: Option<f64>) -> String {
    let Some(avg) = avg.filter(|a| a.is_finite()) else {
        return PLACEHOLDER.to_string();
    };

    let fixed = trim_decimals(&format!("{:.3}", avg.abs()));
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if avg < 0.0 && fixed != "0" { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_numbers_keep_two_decimals_at_most() {
        assert_eq!(compact_number(999.0), "999");
        assert_eq!(compact_number(12.5), "12.5");
        assert_eq!(compact_number("12.00"), "12");
        assert_eq!(compact_number("12.50"), "12.5");
        assert_eq!(compact_number("0.014"), "0.01");
        assert_eq!(compact_number(0.0), "0");
        assert_eq!(compact_number(-3.25), "-3.25");
    }

    #[test]
    fn large_numbers_get_a_unit() {
        assert_eq!(compact_number(1000.0), "1K");
        assert_eq!(compact_number(1500.0), "1.5K");
        assert_eq!(compact_number(1_000_000.0), "1M");
        assert_eq!(compact_number(2_000_000.0), "2M");
        assert_eq!(compact_number(1_250_000_000.0), "1.25B");
        assert_eq!(compact_number(3e12), "3T");
        assert_eq!(compact_number(-1500.0), "-1.5K");
        assert_eq!(compact_number("123456.78"), "123.46K");
        assert_eq!(compact_number(42_i64), "42");
    }

    #[test]
    fn halfway_values_round_away_from_zero() {
        assert_eq!(compact_number("1125"), "1.13K");
        assert_eq!(compact_number("12.125"), "12.13");
        assert_eq!(compact_number(0.125), "0.13");
        assert_eq!(compact_number(-1125.0), "-1.13K");
        assert_eq!(compact_number("2375.00"), "2.38K");
        assert_eq!(to_fixed(0.03125, 4), "0.0313");
        assert_eq!(to_fixed(-0.03125, 4), "-0.0313");
    }

    #[test]
    fn near_halfway_values_are_not_ties() {
        // 1.005 is stored just below the halfway point.
        assert_eq!(compact_number(1.005), "1");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(2.675, 2), "2.67");
    }

    #[test]
    fn unusable_input_is_placeholder() {
        assert_eq!(compact_number(None::<f64>), PLACEHOLDER);
        assert_eq!(compact_number(None::<&str>), PLACEHOLDER);
        assert_eq!(compact_number(NumericInput::Absent), PLACEHOLDER);
        assert_eq!(compact_number(f64::NAN), PLACEHOLDER);
        assert_eq!(compact_number(f64::INFINITY), PLACEHOLDER);
        assert_eq!(compact_number("abc"), PLACEHOLDER);
        assert_eq!(compact_number("inf"), PLACEHOLDER);
    }

    #[test]
    fn optional_strings_pass_through() {
        let price = Some("1500.00".to_string());
        assert_eq!(compact_number(price.as_ref()), "1.5K");
        assert_eq!(compact_number(" 7 "), "7");
        assert_eq!(compact_number(""), "0");
    }

    #[test]
    fn odds_for_one_in_a_thousand() {
        let odds = ancient_odds(Some(0.001));
        assert_eq!(odds.percentage, "0.1000%");
        assert_eq!(odds.one_in, "1 in 1000");
    }

    #[test]
    fn odds_round_to_nearest() {
        let odds = ancient_odds(Some(0.3));
        assert_eq!(odds.percentage, "30.0000%");
        assert_eq!(odds.one_in, "1 in 3");

        assert_eq!(ancient_odds(Some(1.0)).one_in, "1 in 1");
    }

    #[test]
    fn odds_without_chance_are_placeholders() {
        let odds = ancient_odds(None);
        assert_eq!(odds.percentage, PLACEHOLDER);
        assert_eq!(odds.one_in, PLACEHOLDER);

        let odds = ancient_odds(Some(0.0));
        assert_eq!(odds.percentage, "0.0000%");
        assert_eq!(odds.one_in, PLACEHOLDER);
    }

    #[test]
    fn tiers_and_averages() {
        assert_eq!(tier_label(Some(2)), "T2");
        assert_eq!(tier_label(None), PLACEHOLDER);

        assert_eq!(avg_orbs_display(Some(1234567.0)), "1,234,567");
        assert_eq!(avg_orbs_display(Some(412.5)), "412.5");
        assert_eq!(avg_orbs_display(Some(1000.125)), "1,000.125");
        assert_eq!(avg_orbs_display(None), PLACEHOLDER);
    }
}
