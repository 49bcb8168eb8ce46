//! Conversion between human-readable amounts and base units

use kokka_primitives::{Quantity, U256};

use crate::SdkError;

/// Largest decimals value whose scale factor fits in a U256
pub const MAX_DECIMALS: u8 = 77;

/// Convert a decimal string such as `"2.5"` to base units, multiplying by
/// `10^decimals`. Fractional digits beyond `decimals` are truncated.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, SdkError> {
    if decimals > MAX_DECIMALS {
        return Err(SdkError::InvalidArgument(format!(
            "decimals {} exceeds {}",
            decimals, MAX_DECIMALS
        )));
    }

    let amount = amount.trim();
    let (whole, fraction) = match amount.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (amount, ""),
    };
    let is_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(SdkError::InvalidArgument(format!("invalid amount {:?}", amount)));
    }

    let decimals = decimals as usize;
    let mut digits = String::with_capacity(whole.len() + decimals);
    digits.push_str(whole);
    if fraction.len() >= decimals {
        digits.push_str(&fraction[..decimals]);
    } else {
        digits.push_str(fraction);
        digits.extend(std::iter::repeat('0').take(decimals - fraction.len()));
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_dec_str(digits)
        .map_err(|_| SdkError::InvalidArgument(format!("amount {:?} overflows 256 bits", amount)))
}

/// Render base units as a decimal string with trailing zeros removed
pub fn format_units(value: U256, decimals: u8) -> String {
    let digits = value.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = decimals + 1);
    let (whole, fraction) = padded.split_at(padded.len() - decimals);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}

/// Parse a raw base-unit amount given as `0x` hex or a decimal integer
pub fn parse_amount(amount: &str) -> Result<U256, SdkError> {
    let amount = amount.trim();
    if amount.starts_with("0x") {
        return U256::from_quantity(amount)
            .map_err(|e| SdkError::InvalidArgument(format!("amount {:?}: {}", amount, e)));
    }
    if amount.is_empty() || !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SdkError::InvalidArgument(format!("invalid amount {:?}", amount)));
    }
    U256::from_dec_str(amount)
        .map_err(|_| SdkError::InvalidArgument(format!("amount {:?} overflows 256 bits", amount)))
}
