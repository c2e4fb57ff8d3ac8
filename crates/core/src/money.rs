//! Budget normalization and display formatting.
//!
//! Budgets arrive either as plain numbers or as currency-formatted strings
//! (`"$1,200"`), are stored as a positive `f64`, and are re-formatted with a
//! currency symbol for presentation. Normalization is idempotent: feeding a
//! formatted budget back through [`sanitize_budget`] yields the same number.

use serde::{Deserialize, Serialize};

/// A budget as supplied by a caller: either a bare number or a
/// currency-formatted string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BudgetInput {
    Number(f64),
    Text(String),
}

impl BudgetInput {
    /// Normalize to a positive numeric amount.
    pub fn normalize(&self) -> Result<f64, String> {
        match self {
            BudgetInput::Number(n) => validate_amount(*n),
            BudgetInput::Text(s) => sanitize_budget(s),
        }
    }
}

/// Parse a currency-formatted string into a positive numeric amount.
///
/// Strips a leading currency symbol, thousands separators, and whitespace.
///
/// # Examples
///
/// ```
/// use reachly_core::money::sanitize_budget;
/// assert_eq!(sanitize_budget("$1,200").unwrap(), 1200.0);
/// assert_eq!(sanitize_budget("500").unwrap(), 500.0);
/// assert!(sanitize_budget("free").is_err());
/// ```
pub fn sanitize_budget(raw: &str) -> Result<f64, String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();

    if cleaned.is_empty() {
        return Err("budget is empty".to_string());
    }

    let amount: f64 = cleaned
        .parse()
        .map_err(|_| format!("budget '{raw}' is not a number"))?;

    validate_amount(amount)
}

/// Validate that an already-numeric amount is usable as a budget.
fn validate_amount(amount: f64) -> Result<f64, String> {
    if !amount.is_finite() {
        return Err("budget must be a finite number".to_string());
    }
    if amount <= 0.0 {
        return Err(format!("budget must be positive, got {amount}"));
    }
    Ok(amount)
}

/// Format a stored budget for display.
///
/// Whole amounts render without decimals (`"$1200"`); fractional amounts
/// keep two decimal places (`"$99.50"`).
pub fn format_budget(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("${amount:.0}")
    } else {
        format!("${amount:.2}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- sanitize_budget -----------------------------------------------------

    #[test]
    fn parses_currency_string_with_thousands_separator() {
        assert_eq!(sanitize_budget("$1,200").unwrap(), 1200.0);
    }

    #[test]
    fn parses_bare_number_string() {
        assert_eq!(sanitize_budget("500").unwrap(), 500.0);
    }

    #[test]
    fn parses_fractional_amount() {
        assert_eq!(sanitize_budget("$99.50").unwrap(), 99.5);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(sanitize_budget("  $2,500 ").unwrap(), 2500.0);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(sanitize_budget("").is_err());
        assert!(sanitize_budget("$").is_err());
        assert!(sanitize_budget("   ").is_err());
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(sanitize_budget("free").is_err());
        assert!(sanitize_budget("$12x").is_err());
    }

    #[test]
    fn rejects_zero_and_negative() {
        assert!(sanitize_budget("0").is_err());
        assert!(sanitize_budget("$0").is_err());
        assert!(sanitize_budget("-100").is_err());
    }

    #[test]
    fn rejects_non_finite_number_input() {
        assert!(BudgetInput::Number(f64::NAN).normalize().is_err());
        assert!(BudgetInput::Number(f64::INFINITY).normalize().is_err());
    }

    // -- format_budget -------------------------------------------------------

    #[test]
    fn formats_whole_amount_without_decimals() {
        assert_eq!(format_budget(1200.0), "$1200");
    }

    #[test]
    fn formats_fractional_amount_with_two_decimals() {
        assert_eq!(format_budget(99.5), "$99.50");
    }

    // -- round trip (normalization is idempotent) ----------------------------

    #[test]
    fn sanitize_format_round_trip() {
        let amount = sanitize_budget("$1,200").unwrap();
        let display = format_budget(amount);
        assert_eq!(display, "$1200");
        assert_eq!(sanitize_budget(&display).unwrap(), amount);
    }

    #[test]
    fn budget_input_variants_agree() {
        let from_text = BudgetInput::Text("$750".to_string()).normalize().unwrap();
        let from_number = BudgetInput::Number(750.0).normalize().unwrap();
        assert_eq!(from_text, from_number);
    }
}
