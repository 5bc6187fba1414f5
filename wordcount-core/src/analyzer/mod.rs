//! Text analysis: turning raw lines into normalized words.
//!
//! Analysis happens in two steps. The [`tokenizer`] pulls maximal runs of
//! alphabetic characters out of a line, treating everything else as a
//! separator, and the [`normalizer`] lowercases each token so that "The" and
//! "the" count as the same word.
//!
//! ```rust
//! use wordcount_core::analyzer::{Analyzer, TokenMode};
//!
//! let analyzer = Analyzer::new(TokenMode::Ascii);
//! let mut words = Vec::new();
//! analyzer.analyze("The cat's hat, the END.", |w| words.push(w.into_owned()));
//! assert_eq!(words, vec!["the", "cat", "s", "hat", "the", "end"]);
//! ```

/// Splits lines into alphabetic tokens
pub mod tokenizer;

/// Case folding for tokens
pub mod normalizer;

use std::borrow::Cow;

pub use self::normalizer::normalize;
pub use self::tokenizer::{TokenMode, Tokenizer};

/// Tokenizes and normalizes lines with a single token mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Analyzer {
    tokenizer: Tokenizer,
}

impl Analyzer {
    /// Creates an analyzer for the given mode
    pub fn new(mode: TokenMode) -> Self {
        Analyzer {
            tokenizer: Tokenizer::new(mode),
        }
    }

    /// Returns the token mode in use
    pub fn mode(&self) -> TokenMode {
        self.tokenizer.mode()
    }

    /// Emits every normalized word found in `line`.  Words that are already
    /// lowercase are borrowed from the line.
    pub fn analyze<'a, F: FnMut(Cow<'a, str>)>(&self, line: &'a str, mut f: F) {
        let mode = self.mode();
        for token in self.tokenizer.tokens(line) {
            let word = normalize(token, mode);
            if !word.is_empty() {
                f(word);
            }
        }
    }
}
