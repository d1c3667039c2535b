//! Masking of secret values for display

use serde::Serializer;

/// Number of characters kept visible at each end of a long value
const VISIBLE: usize = 4;

/// Mask a value for display, preserving its length in characters
///
/// Values of eight characters or fewer are fully masked. Longer values keep
/// their first and last four characters.
pub fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let len = chars.len();

    if len <= VISIBLE * 2 {
        return "*".repeat(len);
    }

    let head: String = chars[..VISIBLE].iter().collect();
    let tail: String = chars[len - VISIBLE..].iter().collect();
    format!("{}{}{}", head, "*".repeat(len - VISIBLE * 2), tail)
}

/// Serialize a secret as its masked display copy
pub(crate) fn serialize_masked<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&mask(value))
}

pub(crate) fn serialize_masked_opt<S: Serializer>(
    value: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&mask(v)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_values_fully_masked() {
        assert_eq!(mask(""), "");
        assert_eq!(mask("abc"), "***");
        assert_eq!(mask("12345678"), "********");
    }

    #[test]
    fn test_long_values_keep_ends() {
        assert_eq!(mask("123456789"), "1234*6789");
        assert_eq!(mask("tok_abcdefgh1234"), "tok_********1234");
    }

    #[test]
    fn test_mask_preserves_length() {
        for s in ["a", "abcdefgh", "abcdefghi", "libsql://acme-prod.turso.io", "ünïcødé-välüé"] {
            let masked = mask(s);
            let n = s.chars().count();
            assert_eq!(masked.chars().count(), n, "length changed for {s}");
            if n <= 8 {
                assert!(masked.chars().all(|c| c == '*'));
            } else {
                let chars: Vec<char> = s.chars().collect();
                let head: String = chars[..4].iter().collect();
                let tail: String = chars[n - 4..].iter().collect();
                assert!(masked.starts_with(&head));
                assert!(masked.ends_with(&tail));
                assert!(masked.chars().skip(4).take(n - 8).all(|c| c == '*'));
            }
        }
    }
}
