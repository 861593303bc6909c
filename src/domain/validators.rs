use regex::Regex;
use std::sync::LazyLock;

/// Message rendered next to the card number field when validation fails.
pub const CARD_NUMBER_MESSAGE: &str = "Invalid card number format";
/// Message rendered next to the CVV field when validation fails.
pub const CVV_MESSAGE: &str = "CVV must be 3 digits";
/// Message rendered next to any empty required field.
pub const REQUIRED_MESSAGE: &str = "This field is required";

static CARD_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("card number pattern"));
static CVV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{3}$").expect("cvv pattern"));

/// Returns true iff `digits` is exactly 16 decimal digits.
pub fn card_number(digits: &str) -> bool {
    CARD_NUMBER_RE.is_match(digits)
}

/// Returns true iff `digits` is exactly 3 decimal digits.
pub fn cvv(digits: &str) -> bool {
    CVV_RE.is_match(digits)
}

/// Returns true iff `value` is non-empty after trimming.
pub fn required(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Strips every non-digit character from `raw`.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Groups the digits of `raw` into blocks of 4 separated by single spaces.
///
/// Non-digit characters are stripped first, so formatting an
/// already-formatted value yields the same value. No trailing space is
/// ever produced.
pub fn format_card_number(raw: &str) -> String {
    let digits = digits_only(raw);
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 4);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            formatted.push(' ');
        }
        formatted.push(ch);
    }
    formatted
}

/// Strips non-digits from `raw` and truncates the result to 3 digits.
///
/// Extra digits are dropped from the live value rather than rejected.
pub fn sanitize_cvv(raw: &str) -> String {
    let mut digits = digits_only(raw);
    digits.truncate(3);
    digits
}
