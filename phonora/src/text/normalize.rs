/// Trailing characters dropped from a word before it is shown back to the learner.
const DISPLAY_TRIM: &[char] = &['.', ',', '!', '?'];

/// Reduces a token to its lookup key: lower-cased, alphabetic characters only.
///
/// Digits, punctuation and whitespace are deleted rather than replaced, so
/// `"don't"` becomes `"dont"` and `"5pm"` becomes `"pm"`. Every dictionary
/// lookup and word comparison goes through this function first.
pub fn normalize_word(token: &str) -> String {
    token
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphabetic())
        .collect()
}

/// Surface form used for display: lower-cased with trailing `.,!?` removed.
pub fn display_word(token: &str) -> String {
    token.to_lowercase().trim_end_matches(DISPLAY_TRIM).to_string()
}

/// Splits a sentence on whitespace, keeping every token in its original order.
pub fn tokenize(sentence: &str) -> Vec<&str> {
    sentence.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_non_letters() {
        assert_eq!(normalize_word("don't"), "dont");
        assert_eq!(normalize_word("5pm"), "pm");
        assert_eq!(normalize_word("Dog,"), "dog");
        assert_eq!(normalize_word("xyzzy123"), "xyzzy");
        assert_eq!(normalize_word("42"), "");
    }

    #[test]
    fn normalize_keeps_non_ascii_letters() {
        assert_eq!(normalize_word("Café!"), "café");
    }

    #[test]
    fn normalize_is_idempotent() {
        for token in ["Hello,", "it's", "A.M.", "ÉCOLE", "x1y2z3", "", "--", "Straße"] {
            let once = normalize_word(token);
            assert_eq!(normalize_word(&once), once, "token {token:?}");
        }
    }

    #[test]
    fn surface_forms_share_a_key() {
        assert_eq!(normalize_word("Dog,"), normalize_word("dog"));
    }

    #[test]
    fn display_trims_only_trailing_sentence_punctuation() {
        assert_eq!(display_word("Sat."), "sat");
        assert_eq!(display_word("really?!"), "really");
        assert_eq!(display_word("don't"), "don't");
        assert_eq!(display_word("\"quoted\","), "\"quoted\"");
    }

    #[test]
    fn tokenize_preserves_order_and_count() {
        assert_eq!(tokenize("  the  cat\tsat\n"), vec!["the", "cat", "sat"]);
        assert!(tokenize("   ").is_empty());
    }
}
