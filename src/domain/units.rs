//! Lossless conversion between raw base units and decimal token quantities.
//!
//! Decimal arithmetic is done with [`rust_decimal`] so repeated conversions
//! never accumulate binary floating point error. A `Decimal` carries at most
//! 28 fractional digits and a 96-bit mantissa; quantities outside that range
//! are rejected with [`NumericError::Overflow`] instead of being rounded.

use std::str::FromStr;

use alloy_primitives::U256;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::error::NumericError;

/// Largest decimal precision a `Decimal` can represent exactly.
pub const MAX_DECIMALS: u8 = 28;

/// `10^decimals` as a `Decimal`.
fn scale_factor(decimals: u8) -> Result<Decimal, NumericError> {
    if decimals > MAX_DECIMALS {
        return Err(NumericError::InvalidInput {
            input: decimals.to_string(),
            reason: format!("decimals must be at most {MAX_DECIMALS}"),
        });
    }
    Decimal::try_from_i128_with_scale(10_i128.pow(u32::from(decimals)), 0).map_err(|_| {
        NumericError::Overflow {
            value: "scale factor".into(),
            decimals,
        }
    })
}

/// Convert a decimal quantity to integer base units, truncating any digits
/// beyond `decimals` places.
///
/// # Errors
///
/// Returns [`NumericError::InvalidInput`] for negative values or unsupported
/// precision, and [`NumericError::Overflow`] if the scaled value does not fit.
pub fn to_base_units(value: Decimal, decimals: u8) -> Result<U256, NumericError> {
    if value < Decimal::ZERO {
        return Err(NumericError::InvalidInput {
            input: value.to_string(),
            reason: "quantity must be non-negative".into(),
        });
    }

    let scaled = value
        .checked_mul(scale_factor(decimals)?)
        .ok_or_else(|| NumericError::Overflow {
            value: value.to_string(),
            decimals,
        })?;

    let units = scaled.trunc().to_u128().ok_or_else(|| NumericError::Overflow {
        value: value.to_string(),
        decimals,
    })?;

    Ok(U256::from(units))
}

/// Convert integer base units to a decimal quantity with `decimals` places.
///
/// # Errors
///
/// Returns [`NumericError::Overflow`] if the raw value exceeds what a
/// `Decimal` can hold at the requested precision.
pub fn from_base_units(raw: U256, decimals: u8) -> Result<Decimal, NumericError> {
    if decimals > MAX_DECIMALS {
        return Err(NumericError::InvalidInput {
            input: decimals.to_string(),
            reason: format!("decimals must be at most {MAX_DECIMALS}"),
        });
    }

    let overflow = || NumericError::Overflow {
        value: raw.to_string(),
        decimals,
    };

    let units = u128::try_from(raw).map_err(|_| overflow())?;
    let units = i128::try_from(units).map_err(|_| overflow())?;
    let value =
        Decimal::try_from_i128_with_scale(units, u32::from(decimals)).map_err(|_| overflow())?;

    Ok(value.normalize())
}

/// Parse user-supplied text into a non-negative decimal quantity.
///
/// Plain (`"1.25"`) and scientific (`"5e18"`) notation are both accepted.
///
/// # Errors
///
/// Returns [`NumericError::InvalidInput`] for anything that is not a finite,
/// non-negative number.
pub fn parse_decimal(input: &str) -> Result<Decimal, NumericError> {
    let trimmed = input.trim();
    let invalid = |reason: &str| NumericError::InvalidInput {
        input: input.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("empty input"));
    }

    let value = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| invalid("not a finite decimal number"))?;

    if value < Decimal::ZERO {
        return Err(invalid("quantity must be non-negative"));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn wei(n: u128) -> U256 {
        U256::from(n)
    }

    #[test]
    fn to_base_units_scales_by_decimals() {
        assert_eq!(to_base_units(dec!(5), 18).unwrap(), wei(5_000_000_000_000_000_000));
        assert_eq!(to_base_units(dec!(1.5), 6).unwrap(), wei(1_500_000));
        assert_eq!(to_base_units(dec!(0), 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn to_base_units_truncates_extra_digits() {
        // 1.1234567 with 6 decimals drops the trailing 7
        assert_eq!(to_base_units(dec!(1.1234567), 6).unwrap(), wei(1_123_456));
        assert_eq!(to_base_units(dec!(0.9999999), 6).unwrap(), wei(999_999));
    }

    #[test]
    fn to_base_units_rejects_negative_input() {
        let err = to_base_units(dec!(-1), 18).unwrap_err();
        assert!(matches!(err, NumericError::InvalidInput { .. }));
    }

    #[test]
    fn to_base_units_rejects_unsupported_precision() {
        let err = to_base_units(dec!(1), 29).unwrap_err();
        assert!(matches!(err, NumericError::InvalidInput { .. }));
    }

    #[test]
    fn to_base_units_reports_overflow() {
        let err = to_base_units(Decimal::MAX, 18).unwrap_err();
        assert!(matches!(err, NumericError::Overflow { .. }));
    }

    #[test]
    fn from_base_units_divides_by_decimals() {
        assert_eq!(from_base_units(wei(5_000_000_000_000_000_000), 18).unwrap(), dec!(5));
        assert_eq!(from_base_units(wei(1), 18).unwrap(), dec!(0.000000000000000001));
        assert_eq!(from_base_units(wei(250_000), 6).unwrap(), dec!(0.25));
        assert_eq!(from_base_units(U256::ZERO, 18).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn from_base_units_rejects_values_beyond_decimal_range() {
        let err = from_base_units(U256::MAX, 18).unwrap_err();
        assert!(matches!(err, NumericError::Overflow { .. }));
    }

    #[test]
    fn conversions_round_trip_at_token_precision() {
        let cases = [
            (dec!(123.456789), 6),
            (dec!(0.000000000000000001), 18),
            (dec!(42), 0),
            (dec!(31415.926535897932384626), 18),
        ];
        for (value, decimals) in cases {
            let raw = to_base_units(value, decimals).unwrap();
            assert_eq!(from_base_units(raw, decimals).unwrap(), value, "{value} @ {decimals}");
        }
    }

    #[test]
    fn parse_decimal_accepts_plain_and_scientific() {
        assert_eq!(parse_decimal("1.25").unwrap(), dec!(1.25));
        assert_eq!(parse_decimal(" 3 ").unwrap(), dec!(3));
        assert_eq!(parse_decimal("5e2").unwrap(), dec!(500));
    }

    #[test]
    fn parse_decimal_rejects_garbage() {
        for input in ["", "abc", "NaN", "inf", "-2"] {
            assert!(
                matches!(parse_decimal(input), Err(NumericError::InvalidInput { .. })),
                "{input:?} should be rejected"
            );
        }
    }
}
