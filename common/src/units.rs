use std::fmt;
use std::str::FromStr;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::AmountError;

/// Number of decimal places between ETH and wei.
pub const ETHER_DECIMALS: usize = 18;

/// 10^18 wei.
pub const WEI_PER_ETHER: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);

/// Denomination the user types amounts in. Contract calls always take wei.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    Eth,
    Wei,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Eth => write!(f, "ETH"),
            Unit::Wei => write!(f, "WEI"),
        }
    }
}

impl FromStr for Unit {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" => Ok(Unit::Eth),
            "wei" => Ok(Unit::Wei),
            _ => Err(AmountError::UnknownUnit(s.to_string())),
        }
    }
}

impl Unit {
    pub fn all() -> &'static [Unit] {
        &[Unit::Eth, Unit::Wei]
    }

    /// Value used for `<option value=..>` and round-tripped through `FromStr`.
    pub fn key(&self) -> &'static str {
        match self {
            Unit::Eth => "eth",
            Unit::Wei => "wei",
        }
    }
}

/// A decimal amount split into its digit runs. Signs, exponents and
/// separators other than a single `.` are rejected.
struct Decimal<'a> {
    whole: &'a str,
    fraction: &'a str,
}

fn split_decimal(raw: &str) -> Result<Decimal<'_>, AmountError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }
    if trimmed.starts_with('-') {
        return Err(AmountError::NotPositive);
    }
    let (whole, fraction) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !all_digits(whole) || !all_digits(fraction) {
        return Err(AmountError::NotANumber(trimmed.to_string()));
    }
    Ok(Decimal { whole, fraction })
}

/// Whether the raw input reads as a plain non-negative decimal number.
pub fn is_numeric(raw: &str) -> bool {
    split_decimal(raw).is_ok()
}

/// Whether the raw input is numeric and strictly greater than zero.
pub fn is_positive(raw: &str) -> bool {
    match split_decimal(raw) {
        Ok(d) => d.whole.bytes().chain(d.fraction.bytes()).any(|b| b != b'0'),
        Err(_) => false,
    }
}

/// Convert a decimal ETH string to wei using exact integer scaling.
pub fn parse_ether(raw: &str) -> Result<U256, AmountError> {
    let Decimal { whole, fraction } = split_decimal(raw)?;
    if fraction.len() > ETHER_DECIMALS {
        return Err(AmountError::TooManyDecimals {
            max: ETHER_DECIMALS,
        });
    }
    // whole * 10^18 + fraction, computed by concatenating the padded digit runs
    let mut digits = String::with_capacity(whole.len() + ETHER_DECIMALS);
    digits.push_str(whole);
    digits.push_str(fraction);
    digits.extend(std::iter::repeat('0').take(ETHER_DECIMALS - fraction.len()));
    U256::from_str_radix(&digits, 10).map_err(|_| AmountError::Overflow)
}

/// Read an integral wei amount with no scaling.
pub fn parse_wei(raw: &str) -> Result<U256, AmountError> {
    let Decimal { whole, fraction } = split_decimal(raw)?;
    if fraction.bytes().any(|b| b != b'0') {
        return Err(AmountError::FractionalWei);
    }
    if whole.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(whole, 10).map_err(|_| AmountError::Overflow)
}

/// Convert user input in the given unit to the wei value a contract call takes.
pub fn to_wei(raw: &str, unit: Unit) -> Result<U256, AmountError> {
    match unit {
        Unit::Eth => parse_ether(raw),
        Unit::Wei => parse_wei(raw),
    }
}

/// Format wei as a decimal ETH string, e.g. `1500000000000000000` → `"1.5"`.
/// Always keeps at least one fractional digit (`"2.0"`).
pub fn format_ether(wei: U256) -> String {
    let whole = wei / WEI_PER_ETHER;
    let remainder = wei % WEI_PER_ETHER;
    let fraction = format!("{:0>width$}", remainder.to_string(), width = ETHER_DECIMALS);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_ether_is_ten_to_the_eighteen() {
        assert_eq!(parse_ether("1").unwrap(), U256::from(10u64).pow(U256::from(18u64)));
        assert_eq!(to_wei("1", Unit::Eth).unwrap(), WEI_PER_ETHER);
    }

    #[test]
    fn test_wei_is_not_scaled() {
        assert_eq!(to_wei("500", Unit::Wei).unwrap(), U256::from(500u64));
        assert_eq!(to_wei("500.000", Unit::Wei).unwrap(), U256::from(500u64));
        assert_eq!(to_wei("1.5", Unit::Wei), Err(AmountError::FractionalWei));
    }

    #[test]
    fn test_fractional_ether() {
        assert_eq!(
            parse_ether("0.000000000000000001").unwrap(),
            U256::from(1u64)
        );
        assert_eq!(
            parse_ether("1.5").unwrap(),
            U256::from(1_500_000_000_000_000_000u64)
        );
        assert_eq!(parse_ether(".5").unwrap(), U256::from(500_000_000_000_000_000u64));
        assert_eq!(parse_ether("2.").unwrap(), U256::from(2_000_000_000_000_000_000u64));
    }

    #[test]
    fn test_beyond_float_precision() {
        // 2^53 + 1 ether does not survive an f64 round trip
        let wei = parse_ether("9007199254740993").unwrap();
        assert_eq!(
            wei,
            U256::from(9_007_199_254_740_993u64) * WEI_PER_ETHER
        );
        assert_eq!(format_ether(wei), "9007199254740993.0");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(parse_ether(""), Err(AmountError::Empty));
        assert_eq!(parse_ether("   "), Err(AmountError::Empty));
        assert_eq!(parse_ether("-1"), Err(AmountError::NotPositive));
        assert!(matches!(parse_ether("abc"), Err(AmountError::NotANumber(_))));
        assert!(matches!(parse_ether("1e3"), Err(AmountError::NotANumber(_))));
        assert!(matches!(parse_ether("1.2.3"), Err(AmountError::NotANumber(_))));
        assert!(matches!(parse_ether("."), Err(AmountError::NotANumber(_))));
        assert_eq!(
            parse_ether("0.0000000000000000001"),
            Err(AmountError::TooManyDecimals { max: 18 })
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = "9".repeat(80);
        assert_eq!(parse_wei(&huge), Err(AmountError::Overflow));
        assert_eq!(parse_ether(&"9".repeat(70)), Err(AmountError::Overflow));
    }

    #[test]
    fn test_positive_and_numeric_predicates() {
        assert!(is_numeric("0"));
        assert!(is_numeric(" 12.5 "));
        assert!(!is_numeric(""));
        assert!(!is_numeric("twelve"));
        assert!(is_positive("0.01"));
        assert!(!is_positive("0"));
        assert!(!is_positive("0.000"));
        assert!(!is_positive("-3"));
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0.0");
        assert_eq!(format_ether(WEI_PER_ETHER), "1.0");
        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(
            format_ether(U256::from(1_230_000_000_000_000_000u64)),
            "1.23"
        );
    }

    #[test]
    fn test_round_trip_is_exact() {
        for input in [
            "0.0",
            "1.0",
            "0.1",
            "123456789.123456789123456789",
            "0.000000000000000001",
            "115792089237316195423570985008687907853269.984665640564039457",
        ] {
            let wei = parse_ether(input).unwrap();
            assert_eq!(format_ether(wei), input, "round trip of {input}");
            assert_eq!(parse_ether(&format_ether(wei)).unwrap(), wei);
        }
    }

    #[test]
    fn test_unit_keys_parse_back() {
        for unit in Unit::all() {
            assert_eq!(unit.key().parse::<Unit>().unwrap(), *unit);
        }
    }
}
