//! Numeric formatting for the wire.
//!
//! Hyperliquid accepts sizes and prices only as canonical plain-decimal
//! strings. This module owns the two rounding modes the server expects and
//! the big-integer scalings used elsewhere for signing digests. Everything
//! here is pure: no I/O, no async, no client state.

use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};

use super::error::Error;

/// Formats a size: truncate toward zero to `sz_decimals` places, absolute
/// value (a leading minus is a caller error elsewhere, not this layer's
/// concern), trailing zeros stripped.
///
/// # Errors
///
/// Never fails on a valid `Decimal`; the `Result` exists so callers that
/// parse a raw string first get a uniform [`Error::BadNumber`] path.
pub fn format_size(size: Decimal, sz_decimals: u32) -> Result<String, Error> {
    let truncated = size.abs().trunc_with_scale(sz_decimals);
    Ok(truncated.normalize().to_string())
}

/// Formats a price: round half-up to 5 significant digits, then round
/// half-up again to `max_decimals` places, clamped at zero. Trailing zeros
/// are stripped but the decimal point is kept when the result still has a
/// fractional part.
///
/// `max_decimals` is `8 - sz_decimals` for spot assets and `6 - sz_decimals`
/// for perp assets, per the exchange's fixed precision budget.
///
/// # Errors
///
/// Returns [`Error::BadNumber`] for zero or negative prices, which have no
/// well-defined significant-digit count.
pub fn format_price(price: Decimal, max_decimals: i64) -> Result<String, Error> {
    if price.is_sign_negative() || price.is_zero() {
        return Err(Error::BadNumber(format!("non-positive price: {price}")));
    }

    let integer_digits = integer_digit_count(price);
    let sig_fig_decimals = (5 - integer_digits).max(0);
    let rounded = price.round_dp_with_strategy(sig_fig_decimals as u32, RoundingStrategy::MidpointAwayFromZero);

    let final_decimals = sig_fig_decimals.min(max_decimals).max(0) as u32;
    let rounded = rounded.round_dp_with_strategy(final_decimals, RoundingStrategy::MidpointAwayFromZero);
    let rounded = rounded.normalize();

    // A value with no precision budget at all (`szDecimals` eating the whole
    // fixed decimal allowance) renders bare. Otherwise the 5-sig-fig round
    // may have collapsed the fractional part entirely (e.g. "12346") even
    // though the asset's decimal budget allows more; the wire form still
    // shows at least one decimal digit in that case.
    if max_decimals == 0 {
        return Ok(rounded.trunc().to_string());
    }
    if rounded.scale() == 0 {
        return Ok(format!("{rounded}.0"));
    }
    Ok(rounded.to_string())
}

/// Number of digits left of the decimal point in a positive decimal.
///
/// `123.45` has 3; `0.0042` has 0 (treated as zero integer digits, matching
/// the exchange's 5-significant-digit convention for sub-one prices).
fn integer_digit_count(value: Decimal) -> i64 {
    let truncated = value.trunc();
    if truncated.is_zero() {
        0
    } else {
        truncated.to_string().trim_start_matches('-').len() as i64
    }
}

/// Scales a decimal by 10^6 and truncates to an integer, as the exchange's
/// USD-denominated integer fields require.
pub fn float_to_usd_int(value: Decimal) -> Result<i64, Error> {
    scale_and_truncate(value, 6)
}

/// Scales a decimal by 10^9 and truncates to an integer, used for the
/// integer representation fed into some signing digests.
pub fn float_to_int_for_hashing(value: Decimal) -> Result<i64, Error> {
    scale_and_truncate(value, 9)
}

fn scale_and_truncate(value: Decimal, exponent: u32) -> Result<i64, Error> {
    let scale = Decimal::from_i128_with_scale(10i128.pow(exponent), 0);
    let scaled = (value * scale).trunc();
    scaled
        .to_i64()
        .ok_or_else(|| Error::BadNumber(format!("scaled value out of range: {value}")))
}

/// Parses a user-supplied decimal string, classifying failures as
/// [`Error::BadNumber`] rather than letting a raw parse error escape.
pub fn parse_decimal(input: &str) -> Result<Decimal, Error> {
    input
        .trim()
        .parse::<Decimal>()
        .map_err(|err| Error::BadNumber(format!("{input}: {err}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn size_truncates_toward_zero_and_strips_zeros() {
        assert_eq!(format_size(dec!(0.0335), 4).unwrap(), "0.0335");
        assert_eq!(format_size(dec!(0.01), 4).unwrap(), "0.01");
        assert_eq!(format_size(dec!(-1.23456), 2).unwrap(), "1.23");
        assert_eq!(format_size(dec!(2.000), 4).unwrap(), "2");
    }

    #[test]
    fn price_scenario_market_open() {
        // mid 3000 * 1.05 = 3150.0, szDecimals 4 on a perp -> max_decimals = 6 - 4 = 2
        let synthesized = dec!(3000.0) * (dec!(1) + dec!(0.05));
        assert_eq!(format_price(synthesized, 2).unwrap(), "3150.0");
    }

    #[test]
    fn price_scenario_limit_rounding() {
        // BTC szDecimals 5 -> max_decimals = 6 - 5 = 1
        assert_eq!(format_price(dec!(12345.678912), 1).unwrap(), "12346.0");
    }

    #[test]
    fn price_scenario_close_market_inference() {
        // mid 2986.3 * 1.05 = 3135.615, 5 sig figs -> 3135.6, szDecimals 4 -> max_decimals 2
        let synthesized = dec!(2986.3) * (dec!(1) + dec!(0.05));
        assert_eq!(format_price(synthesized, 2).unwrap(), "3135.6");
    }

    #[test]
    fn price_idempotent_after_formatting() {
        let once = format_price(dec!(12345.678912), 1).unwrap();
        let again = format_price(once.parse().unwrap(), 1).unwrap();
        assert_eq!(once, again);
    }

    #[test]
    fn rejects_non_positive_price() {
        assert!(format_price(dec!(0), 2).is_err());
        assert!(format_price(dec!(-1), 2).is_err());
    }

    #[test]
    fn usd_int_scaling_truncates() {
        assert_eq!(float_to_usd_int(dec!(1.23456789)).unwrap(), 1_234_567);
        assert_eq!(float_to_int_for_hashing(dec!(1.23456789)).unwrap(), 1_234_567_890);
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        assert!(parse_decimal("not-a-number").is_err());
        assert_eq!(parse_decimal("3.14").unwrap(), dec!(3.14));
    }
}
