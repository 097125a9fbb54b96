use budget_core::normalize;
use rust_decimal::Decimal;
use thiserror::Error;

/// Error returned when a string cannot be used as a money amount.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDecimalError {
    #[error("invalid amount '{0}'")]
    Invalid(String),

    #[error("amount '{0}' must not be negative")]
    Negative(String),
}

/// Parses a string into a [`Decimal`] using the same amount grammar as goal
/// records (`$`, thousands commas, exponents).
///
/// Empty or whitespace-only input is treated as 0.
pub fn parse_decimal(s: &str) -> Result<Decimal, ParseDecimalError> {
    if s.trim().is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalize::parse_amount(s).ok_or_else(|| {
        tracing::debug!(input = %s, "invalid decimal");
        ParseDecimalError::Invalid(s.to_string())
    })
}

/// Like [`parse_decimal`] but rejects negative amounts. Used for command-line
/// money arguments.
pub fn parse_amount(s: &str) -> Result<Decimal, ParseDecimalError> {
    let value = parse_decimal(s)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ParseDecimalError::Negative(s.to_string()));
    }
    Ok(value)
}
