//! Currency normalization: raw text to `$1,234,567`

use crate::error::NormalizationError;
use lexfill_domain::PlaceholderKind;
use regex::Regex;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use std::sync::LazyLock;

static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^(us\$|usd|\$)").unwrap());

static AMOUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+(?:\.\d+)?)([a-z]*)$").unwrap());

/// Normalize a currency amount to whole dollars
///
/// Accepts an optional `$`, `US$` or `USD` prefix, thousands separators,
/// and a multiplier suffix (`k`, `thousand`, `m`, `mn`, `million`, `b`,
/// `bn`, `billion`, `t`, `trillion`). Fractions are rounded half away from zero.
///
/// # Examples
///
/// ```
/// use lexfill_engine::normalizer::normalize_currency;
///
/// assert_eq!(normalize_currency("1.25m").unwrap(), "$1,250,000");
/// assert_eq!(normalize_currency("$10,000,000").unwrap(), "$10,000,000");
/// ```
pub fn normalize_currency(raw: &str) -> Result<String, NormalizationError> {
    let fail = |reason: &str| NormalizationError::new(PlaceholderKind::Currency, raw, reason);

    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(fail("value is empty"));
    }

    let unprefixed = PREFIX_RE.replace(&compact, "");
    if unprefixed.starts_with('-') || unprefixed.starts_with('(') {
        return Err(fail("negative amounts are not accepted"));
    }

    let digits = unprefixed.replace(',', "");
    let caps = AMOUNT_RE
        .captures(&digits)
        .ok_or_else(|| fail("not a number"))?;

    let mantissa = Decimal::from_str(&caps[1]).map_err(|_| fail("number is out of range"))?;
    let multiplier = multiplier(&caps[2].to_ascii_lowercase())
        .ok_or_else(|| fail("unknown multiplier suffix"))?;
    let amount = mantissa
        .checked_mul(multiplier)
        .ok_or_else(|| fail("amount is too large"))?;

    let whole = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Ok(format!("${}", group_thousands(&whole.trunc().to_string())))
}

fn multiplier(suffix: &str) -> Option<Decimal> {
    let factor: u64 = match suffix {
        "" => 1,
        "k" | "thousand" => 1_000,
        "m" | "mn" | "million" => 1_000_000,
        "b" | "bn" | "billion" => 1_000_000_000,
        "t" | "trillion" => 1_000_000_000_000,
        _ => return None,
    };
    Some(Decimal::from(factor))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
