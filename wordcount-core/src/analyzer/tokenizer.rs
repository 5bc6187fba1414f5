use serde_derive::{Deserialize, Serialize};

/// Which characters make up a token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenMode {
    /// ASCII letters `a-z` and `A-Z` only
    #[default]
    Ascii,

    /// Any Unicode alphabetic character
    Unicode,
}

impl TokenMode {
    /// Returns true if `c` belongs inside a token
    #[inline]
    pub fn is_token_char(self, c: char) -> bool {
        match self {
            TokenMode::Ascii => c.is_ascii_alphabetic(),
            TokenMode::Unicode => c.is_alphabetic(),
        }
    }
}

/// Splits lines on runs of non-alphabetic characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tokenizer {
    mode: TokenMode,
}

impl Tokenizer {
    /// Creates a new tokenizer
    pub fn new(mode: TokenMode) -> Self {
        Tokenizer { mode }
    }

    /// Token mode of this tokenizer
    pub fn mode(&self) -> TokenMode {
        self.mode
    }

    /// Iterates over the tokens of `line`, as slices of it
    /// ```rust
    ///   use wordcount_core::analyzer::{Tokenizer, TokenMode};
    ///
    ///   let toks: Vec<_> = Tokenizer::new(TokenMode::Ascii).tokens("1st of May!").collect();
    ///   assert_eq!(toks, vec!["st", "of", "May"]);
    /// ```
    pub fn tokens<'a>(&self, line: &'a str) -> Tokens<'a> {
        Tokens {
            rest: line,
            mode: self.mode,
        }
    }
}

/// Iterator returned by [`Tokenizer::tokens`]
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    rest: &'a str,
    mode: TokenMode,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let mode = self.mode;
        let start = match self.rest.find(|c: char| mode.is_token_char(c)) {
            Some(start) => start,
            None => {
                self.rest = "";
                return None;
            }
        };
        let tail = &self.rest[start..];
        let len = tail
            .find(|c: char| !mode.is_token_char(c))
            .unwrap_or(tail.len());
        self.rest = &tail[len..];
        Some(&tail[..len])
    }
}

#[cfg(test)]
mod test_tokenizer {
    use super::*;

    fn toks(line: &str) -> Vec<&str> {
        Tokenizer::new(TokenMode::Ascii).tokens(line).collect()
    }

    #[test]
    fn test_maximal_runs() {
        assert_eq!(toks("abc def"), vec!["abc", "def"]);
        assert_eq!(toks("abc...def"), vec!["abc", "def"]);
        assert_eq!(toks("ab1cd"), vec!["ab", "cd"]);
    }

    #[test]
    fn test_leading_and_trailing_separators() {
        // No empty token for a line starting with a separator
        assert_eq!(toks("  (hello) "), vec!["hello"]);
        assert_eq!(toks("42"), Vec::<&str>::new());
    }

    #[test]
    fn test_crlf() {
        assert_eq!(toks("one two\r\n"), vec!["one", "two"]);
    }

    #[test]
    fn test_non_ascii_is_separator_in_ascii_mode() {
        assert_eq!(toks("naïve"), vec!["na", "ve"]);
        let uni: Vec<_> = Tokenizer::new(TokenMode::Unicode).tokens("naïve").collect();
        assert_eq!(uni, vec!["naïve"]);
    }

    #[test]
    fn test_exhausted_iterator_stays_empty() {
        let mut it = Tokenizer::default().tokens("x");
        assert_eq!(it.next(), Some("x"));
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }
}
