//! Small coercion helpers used by the mapping engine's `numbers_only` /
//! `char_to_bit` / `extract_numeric` chain steps. These aren't
//! expression-language functions (they're not callable from an expression
//! source string) but live next to the function registry since both are
//! "safe value coercions with no I/O," the same category of thing.

/// Strips every non-digit character, for mapping steps that automatically
/// extract digits when raw input contains non-digits for an integer target
/// column.
pub fn extract_digits(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() { None } else { Some(digits) }
}

/// `char_to_bit`: maps truthy tokens (`Y`,`YES`,`TRUE`,`T`,`1`) to `1`,
/// anything else to `0`, matching `add_indicator`'s truthiness rule.
pub fn char_to_bit(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_uppercase().as_str(),
        "Y" | "YES" | "TRUE" | "T" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_digits_pulls_digits_only() {
        assert_eq!(extract_digits("SSN: 123-45-6789").as_deref(), Some("123456789"));
        assert_eq!(extract_digits("none"), None);
    }

    #[test]
    fn char_to_bit_recognizes_truthy_tokens() {
        assert!(char_to_bit("y"));
        assert!(char_to_bit("TRUE"));
        assert!(!char_to_bit("n"));
        assert!(!char_to_bit(""));
    }
}
