use std::borrow::Cow;

use super::tokenizer::TokenMode;

/// Lowercases a token.  Tokens that are already lowercase are returned
/// borrowed.  Characters produced by lowercasing that are not token
/// characters themselves (such as the combining dot of `İ`) are dropped.
/// ```rust
///   use wordcount_core::analyzer::{normalize, TokenMode};
///
///   assert_eq!(normalize("Hello", TokenMode::Ascii), "hello");
///   assert_eq!(normalize("ÉTÉ", TokenMode::Unicode), "été");
/// ```
pub fn normalize(token: &str, mode: TokenMode) -> Cow<'_, str> {
    match mode {
        TokenMode::Ascii => {
            if token.bytes().any(|b| b.is_ascii_uppercase()) {
                Cow::Owned(token.to_ascii_lowercase())
            } else {
                Cow::Borrowed(token)
            }
        }
        TokenMode::Unicode => {
            if token.chars().all(lowercases_to_itself) {
                Cow::Borrowed(token)
            } else {
                Cow::Owned(
                    token
                        .to_lowercase()
                        .chars()
                        .filter(|c| mode.is_token_char(*c))
                        .collect(),
                )
            }
        }
    }
}

fn lowercases_to_itself(c: char) -> bool {
    let mut lower = c.to_lowercase();
    lower.next() == Some(c) && lower.next().is_none()
}

#[cfg(test)]
mod test_normalizer {
    use super::*;

    #[test]
    fn test_borrows_lowercase() {
        match normalize("already", TokenMode::Ascii) {
            Cow::Borrowed(s) => assert_eq!(s, "already"),
            Cow::Owned(_) => panic!("should not allocate"),
        }
        match normalize("déjà", TokenMode::Unicode) {
            Cow::Borrowed(s) => assert_eq!(s, "déjà"),
            Cow::Owned(_) => panic!("should not allocate"),
        }
    }

    #[test]
    fn test_lowercases() {
        assert_eq!(normalize("WoRd", TokenMode::Ascii), "word");
        assert_eq!(normalize("ΣΟΦΙΑ", TokenMode::Unicode), "σοφια");
    }

    #[test]
    fn test_lowercase_keeps_only_token_chars() {
        // U+0130 lowercases to 'i' followed by U+0307 COMBINING DOT ABOVE
        let word = normalize("İstanbul", TokenMode::Unicode);
        assert_eq!(word, "istanbul");
        assert!(word.chars().all(|c| TokenMode::Unicode.is_token_char(c)));
    }
}
