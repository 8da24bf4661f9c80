use std::fmt;

/// Money is represented as whole currency units. The demo bank has no
/// fractional amounts, so ₹500 = 500 units.
pub type Units = i64;

/// Default currency symbol shown in balances and messages.
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Format units for display next to a label.
/// Example: 500 -> "₹ 500"
pub fn format_units(units: Units, symbol: &str) -> String {
    format!("{} {}", symbol, units)
}

/// Compact form used inside result messages.
/// Example: 500 -> "₹500"
pub fn format_units_compact(units: Units, symbol: &str) -> String {
    format!("{}{}", symbol, units)
}

/// Parse a free-text amount into units.
/// Only strictly positive whole numbers are accepted: "500" -> 500,
/// " 42 " -> 42. "0", "-5", "12.5", "" and "abc" are all rejected.
pub fn parse_amount(input: &str) -> Result<Units, ParseAmountError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(ParseAmountError::Missing);
    }

    let units: Units = input
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat)?;

    if units <= 0 {
        return Err(ParseAmountError::NotPositive);
    }
    Ok(units)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    Missing,
    InvalidFormat,
    NotPositive,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::Missing => write!(f, "amount is missing"),
            ParseAmountError::InvalidFormat => write!(f, "amount is not a whole number"),
            ParseAmountError::NotPositive => write!(f, "amount must be greater than zero"),
        }
    }
}

impl std::error::Error for ParseAmountError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_units() {
        assert_eq!(format_units(500, "₹"), "₹ 500");
        assert_eq!(format_units(0, "$"), "$ 0");
        assert_eq!(format_units_compact(1000, "₹"), "₹1000");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("500"), Ok(500));
        assert_eq!(parse_amount(" 42 "), Ok(42));
        assert_eq!(parse_amount("+7"), Ok(7));
        assert_eq!(parse_amount("1"), Ok(1));
    }

    #[test]
    fn test_parse_amount_invalid() {
        assert_eq!(parse_amount(""), Err(ParseAmountError::Missing));
        assert_eq!(parse_amount("   "), Err(ParseAmountError::Missing));
        assert_eq!(parse_amount("abc"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("12.5"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("1 000"), Err(ParseAmountError::InvalidFormat));
        assert_eq!(parse_amount("0"), Err(ParseAmountError::NotPositive));
        assert_eq!(parse_amount("-5"), Err(ParseAmountError::NotPositive));
    }

    #[test]
    fn test_parse_amount_overflow_is_invalid() {
        assert_eq!(
            parse_amount("99999999999999999999999"),
            Err(ParseAmountError::InvalidFormat)
        );
    }
}
